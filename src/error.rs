//! Error types reported by the emitter.
//!
//! [`EmitterError`] covers every condition the dispatcher detects at runtime:
//! listener faults (sync failure, panic, async rejection, timeout), misuse of
//! the pause/resume/drain controls, and a missing Tokio runtime.
//!
//! None of these are ever returned to a publisher. Each one is handed to the
//! configured [`Logger`](crate::Logger) and the operation carries on.

use std::time::Duration;
use thiserror::Error;

use crate::listeners::ListenerRef;

/// # Conditions reported by the emitter.
///
/// Listener-scoped variants carry the channel name and a [`ListenerRef`]
/// identifying which listener misbehaved.
#[non_exhaustive]
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum EmitterError {
    /// A synchronous listener returned an error.
    #[error("listener {listener} on channel `{channel}` failed: {reason}")]
    ListenerFailed {
        /// Channel the value was published to.
        channel: &'static str,
        /// Listener that failed.
        listener: ListenerRef,
        /// The error message.
        reason: String,
    },

    /// A listener panicked while being invoked.
    #[error("listener {listener} on channel `{channel}` panicked: {reason}")]
    ListenerPanicked {
        /// Channel the value was published to.
        channel: &'static str,
        /// Listener that panicked.
        listener: ListenerRef,
        /// Panic payload rendered as text.
        reason: String,
    },

    /// The future returned by an async listener resolved to an error or panicked.
    #[error("listener {listener} on channel `{channel}` returned a future that was rejected: {reason}")]
    ListenerRejected {
        /// Channel the value was published to.
        channel: &'static str,
        /// Listener whose future was rejected.
        listener: ListenerRef,
        /// The error or panic message.
        reason: String,
    },

    /// An async listener did not settle within the configured wait.
    ///
    /// The listener's work is not cancelled; only the dispatcher stops waiting.
    #[error("listener {listener} on channel `{channel}` took more than {limit:?} to settle")]
    ListenerTimedOut {
        /// Channel the value was published to.
        channel: &'static str,
        /// Listener that exceeded the limit.
        listener: ListenerRef,
        /// The configured wait limit.
        limit: Duration,
    },

    /// `pause` was called while the emitter was already paused.
    #[error("pause called while the emitter was already paused")]
    AlreadyPaused,

    /// `resume` was called while the emitter was not paused.
    #[error("resume called while the emitter was not paused")]
    NotPaused,

    /// `drain` was called while the emitter was paused; nothing can make progress.
    #[error("drain called while the emitter is paused")]
    DrainWhilePaused,

    /// An async listener needed a Tokio runtime and none was available.
    #[error("no tokio runtime available to drive listener {listener} on channel `{channel}`")]
    NoRuntime {
        /// Channel the value was published to.
        channel: &'static str,
        /// Listener that could not be driven.
        listener: ListenerRef,
    },
}

impl EmitterError {
    /// Returns a short stable label (snake_case) for use in logs/metrics.
    ///
    /// # Example
    /// ```
    /// use eventvisor::EmitterError;
    ///
    /// assert_eq!(EmitterError::AlreadyPaused.as_label(), "emitter_already_paused");
    /// ```
    pub fn as_label(&self) -> &'static str {
        match self {
            EmitterError::ListenerFailed { .. } => "listener_failed",
            EmitterError::ListenerPanicked { .. } => "listener_panicked",
            EmitterError::ListenerRejected { .. } => "listener_rejected",
            EmitterError::ListenerTimedOut { .. } => "listener_timed_out",
            EmitterError::AlreadyPaused => "emitter_already_paused",
            EmitterError::NotPaused => "emitter_not_paused",
            EmitterError::DrainWhilePaused => "emitter_drain_while_paused",
            EmitterError::NoRuntime { .. } => "emitter_no_runtime",
        }
    }

    /// Returns the channel name for listener-scoped errors.
    pub fn channel(&self) -> Option<&'static str> {
        match self {
            EmitterError::ListenerFailed { channel, .. }
            | EmitterError::ListenerPanicked { channel, .. }
            | EmitterError::ListenerRejected { channel, .. }
            | EmitterError::ListenerTimedOut { channel, .. }
            | EmitterError::NoRuntime { channel, .. } => Some(*channel),
            EmitterError::AlreadyPaused
            | EmitterError::NotPaused
            | EmitterError::DrainWhilePaused => None,
        }
    }

    /// Indicates whether the error was caused by the caller misusing the controls
    /// rather than by a listener.
    pub fn is_misuse(&self) -> bool {
        matches!(
            self,
            EmitterError::AlreadyPaused | EmitterError::NotPaused | EmitterError::DrainWhilePaused
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::listeners::ListenerId;

    fn listener() -> ListenerRef {
        ListenerRef::new(ListenerId::from_raw(7), "audit")
    }

    #[test]
    fn test_timeout_message_names_listener_and_limit() {
        let err = EmitterError::ListenerTimedOut {
            channel: "orders",
            listener: listener(),
            limit: Duration::from_millis(10),
        };
        assert_eq!(
            err.to_string(),
            "listener #7 (audit) on channel `orders` took more than 10ms to settle"
        );
        assert_eq!(err.as_label(), "listener_timed_out");
        assert_eq!(err.channel(), Some("orders"));
    }

    #[test]
    fn test_misuse_errors_have_no_channel() {
        for err in [
            EmitterError::AlreadyPaused,
            EmitterError::NotPaused,
            EmitterError::DrainWhilePaused,
        ] {
            assert!(err.is_misuse(), "{err} should be misuse");
            assert_eq!(err.channel(), None);
        }
    }

    #[test]
    fn test_listener_errors_are_not_misuse() {
        let err = EmitterError::ListenerFailed {
            channel: "orders",
            listener: listener(),
            reason: "boom".into(),
        };
        assert!(!err.is_misuse());
    }
}
