//! Log sinks for conditions the emitter reports.
//!
//! ## Contents
//! - [`Logger`] the sink contract, one call per reported [`EmitterError`](crate::EmitterError)
//! - [`TracingLogger`] default sink, forwards to `tracing::error!`

mod logger;
mod trace;

pub use logger::Logger;
pub use trace::TracingLogger;
