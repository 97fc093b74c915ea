//! # `tracing` sink.
//!
//! [`TracingLogger`] forwards every reported condition to `tracing::error!` with
//! structured fields:
//!
//! ```text
//! ERROR eventvisor::loggers::trace: listener #3 (audit) on channel `orders` failed: boom label="listener_failed" channel=Some("orders")
//! ```

use crate::error::EmitterError;
use crate::loggers::Logger;

/// Default logger: emits one `tracing` error event per reported condition.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingLogger;

impl Logger for TracingLogger {
    fn error(&self, err: &EmitterError) {
        tracing::error!(label = err.as_label(), channel = ?err.channel(), "{err}");
    }
}
