//! # Listener trait for stateful async consumers.
//!
//! Provides [`Listen`], an extension point for plugging custom value handlers into
//! the emitter when a closure is not enough (shared clients, counters, etc.).
//!
//! ## Rules
//! - Values are delivered per channel in publish order; the next delivery waits
//!   until this one settles or the wait limit elapses.
//! - Errors are returned, not panicked; both are caught and logged anyway.
//! - A slow `on_value` is never cancelled. After the wait limit the emitter moves
//!   on and the future keeps running in its own task.
//!
//! ## Example
//! ```rust
//! use std::sync::Arc;
//! use std::sync::atomic::{AtomicU64, Ordering};
//! use async_trait::async_trait;
//! use eventvisor::{Listen, Listener, ListenerResult};
//!
//! #[derive(Default)]
//! struct Totals(AtomicU64);
//!
//! #[async_trait]
//! impl Listen<u64> for Totals {
//!     async fn on_value(&self, value: u64) -> ListenerResult {
//!         self.0.fetch_add(value, Ordering::Relaxed);
//!         Ok(())
//!     }
//!
//!     fn name(&self) -> &'static str { "totals" }
//! }
//!
//! let listener = Listener::<u64>::from_listen(Arc::new(Totals::default()));
//! assert_eq!(listener.name(), "totals");
//! ```

use async_trait::async_trait;

use crate::listeners::ListenerResult;

/// Async consumer of channel values.
///
/// ### Implementation requirements
/// - Use async I/O; avoid blocking the executor.
/// - Return `Err` for failures; the emitter logs them as rejections.
#[async_trait]
pub trait Listen<P: Send + 'static>: Send + Sync + 'static {
    /// Handles a single published value.
    async fn on_value(&self, value: P) -> ListenerResult;

    /// Returns the listener name used in log records.
    ///
    /// The default uses `type_name::<Self>()`, which can be verbose - override it when possible.
    fn name(&self) -> &'static str {
        std::any::type_name::<Self>()
    }
}
