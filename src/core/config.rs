//! # Emitter configuration.
//!
//! Provides [`Config`] centralized settings for the dispatcher.
//!
//! ## Sentinel values
//! - `max_listener_wait = 0s` → no bound (wait for every async listener to settle)

use std::time::Duration;

/// Configuration for an [`Emitter`](crate::Emitter).
///
/// ## Field semantics
/// - `queue_if_no_listeners`: buffer values published to a channel that has no listeners yet
/// - `wait_listener_result`: serialize async listeners per channel (`true`) or fire-and-forget (`false`)
/// - `max_listener_wait`: per-invocation wait bound for async listeners (`0s` = unbounded)
///
/// ## Notes
/// All fields are public for flexibility. Prefer [`Config::listener_wait`] over
/// checking the `0s` sentinel directly.
#[derive(Clone, Debug)]
pub struct Config {
    /// Buffer values published while a channel has zero listeners.
    ///
    /// Buffered values are replayed, in order, when the first listener subscribes.
    /// When `false`, such values are dropped.
    pub queue_if_no_listeners: bool,

    /// Wait for async listener results before the next delivery on the same channel.
    ///
    /// - `true`: deliveries on one channel are strictly serialized, each bounded by
    ///   `max_listener_wait`
    /// - `false`: listeners are invoked back to back; their futures run detached and
    ///   only failures are observed
    pub wait_listener_result: bool,

    /// Maximum time to wait for one async listener before moving on.
    ///
    /// The listener is not cancelled when the limit elapses; a
    /// `ListenerTimedOut` error is logged and its future keeps running.
    pub max_listener_wait: Duration,
}

impl Config {
    /// Returns the per-invocation wait bound as an `Option`.
    ///
    /// - `None` → wait until the listener settles
    /// - `Some(d)` → stop waiting after `d`
    #[inline]
    pub fn listener_wait(&self) -> Option<Duration> {
        if self.max_listener_wait == Duration::ZERO {
            None
        } else {
            Some(self.max_listener_wait)
        }
    }
}

impl Default for Config {
    /// Default configuration:
    ///
    /// - `queue_if_no_listeners = true`
    /// - `wait_listener_result = true`
    /// - `max_listener_wait = 1s`
    fn default() -> Self {
        Self {
            queue_if_no_listeners: true,
            wait_listener_result: true,
            max_listener_wait: Duration::from_millis(1000),
        }
    }
}
