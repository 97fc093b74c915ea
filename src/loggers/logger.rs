//! # Logger contract.
//!
//! The emitter never surfaces listener faults or control misuse to callers.
//! Every such condition is passed to a [`Logger`] exactly once.
//!
//! ## Example
//! ```rust
//! use std::sync::{Arc, Mutex};
//! use eventvisor::{Config, Emitter, EmitterError, Logger};
//!
//! #[derive(Default)]
//! struct Collect(Mutex<Vec<&'static str>>);
//!
//! impl Logger for Collect {
//!     fn error(&self, err: &EmitterError) {
//!         self.0.lock().unwrap().push(err.as_label());
//!     }
//! }
//!
//! let sink = Arc::new(Collect::default());
//! let emitter = Emitter::builder(Config::default())
//!     .with_logger(Arc::clone(&sink))
//!     .build();
//!
//! emitter.resume();
//! assert_eq!(*sink.0.lock().unwrap(), vec!["emitter_not_paused"]);
//! ```

use std::sync::Arc;

use crate::error::EmitterError;

/// Sink for errors reported by the emitter.
///
/// Called outside the emitter's internal lock, so implementations may call back
/// into the emitter. Calls can come from any Tokio worker thread.
pub trait Logger: Send + Sync + 'static {
    /// Records one reported condition.
    fn error(&self, err: &EmitterError);
}

impl<L: Logger + ?Sized> Logger for Arc<L> {
    fn error(&self, err: &EmitterError) {
        (**self).error(err)
    }
}
