//! # Listeners registered on channels.
//!
//! ## Listener types
//! - **Sync consumers**: run inside `publish` (or inside the flush that replays
//!   buffered values) and settle as soon as they return.
//! - **Async consumers**: hand back a future; the emitter waits for it (bounded by
//!   the configured limit) before the next delivery on the same channel.
//!
//! ## Failures
//! ```text
//! sync  Err / panic       ──► EmitterError::ListenerFailed / ListenerPanicked
//! async Err / panic       ──► EmitterError::ListenerRejected
//! async exceeds the limit ──► EmitterError::ListenerTimedOut (work keeps running)
//! ```

mod listen;
mod listener;

pub use listen::Listen;
pub use listener::{Listener, ListenerId, ListenerRef};

pub(crate) use listener::Call;

/// Error returned by a listener.
pub type ListenerError = Box<dyn std::error::Error + Send + Sync>;

/// Result returned by a listener.
pub type ListenerResult = Result<(), ListenerError>;
