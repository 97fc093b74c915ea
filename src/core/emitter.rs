//! # Emitter: typed channels with buffered, serialized delivery.
//!
//! The [`Emitter`] owns a registry of channels and a global [`RunState`]. A published
//! value is either **buffered** on its channel or **dispatched** to every listener
//! registered on that channel at publish time.
//!
//! ## Publish flow
//! ```text
//! publish::<C>(value)
//!     │
//!     ├─ gate closed (paused or guard held)       ──► buffer
//!     ├─ no listeners && queue_if_no_listeners    ──► buffer
//!     ├─ no listeners                             ──► drop
//!     └─ for listener in snapshot(listeners):
//!            dispatch unit (see `dispatch`)
//! ```
//!
//! ## Buffer replay
//! Buffered values are replayed through `publish` in FIFO order when:
//! - a listener subscribes to the channel;
//! - the gate reopens after a guard window and no publish is iterating (every channel);
//! - `drain` is called for the channel.
//!
//! Replay stops as soon as the gate closes again; the remaining values stay buffered
//! in order.
//!
//! Only one replay loop runs at a time. A replay requested while one is running
//! (typically from the tail of a `publish` made by that loop) is folded into the
//! running loop's next pass, so replay depth stays constant however many values
//! are buffered or re-published.
//!
//! ## Rules
//! - `publish`, `subscribe`, `unsubscribe`, `pause`, `resume` never fail and never panic
//!   on listener faults; problems are reported to the [`Logger`](crate::Logger).
//! - Listeners subscribed while a publish iterates are not visited by that publish.
//! - Listeners run outside the internal lock and may publish, subscribe or
//!   unsubscribe re-entrantly.

use std::fmt;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use super::builder::EmitterBuilder;
use super::config::Config;
use super::gate::{Gate, RunState};
use super::registry::{Chain, Registry};
use crate::channels::{Channel, ChannelId};
use crate::error::EmitterError;
use crate::listeners::Listener;
use crate::loggers::Logger;

pub(super) struct State {
    pub(super) gate: Gate,
    pub(super) registry: Registry,
    /// Publish calls currently iterating their listener snapshot.
    publishing: usize,
    /// A value was left buffered while a guard window was held.
    stalled: bool,
    /// A replay loop is running.
    replaying: bool,
    /// Channels requested while the replay loop was busy (empty = every channel).
    requested: Option<Vec<ChannelId>>,
}

impl State {
    /// Closes a guard window. Returns true when buffered values should be replayed now.
    ///
    /// Replay waits while a publish is still iterating, so every listener of that
    /// publish sees its value before the next buffered one.
    pub(super) fn leave_guard(&mut self) -> bool {
        self.gate.leave() && self.publishing == 0 && std::mem::take(&mut self.stalled)
    }

    /// Ends a publish iteration. Returns true when a deferred replay should run now.
    fn finish_publish(&mut self) -> bool {
        self.publishing -= 1;
        self.publishing == 0 && self.gate.is_open() && std::mem::take(&mut self.stalled)
    }

    /// Records that a value stays buffered until the current guard windows close.
    fn note_stalled(&mut self) {
        if self.gate.is_guarded() {
            self.stalled = true;
        }
    }

    /// Claims the replay loop. Returns false if it is already running; the
    /// request is then merged into the loop's next pass.
    fn begin_replay(&mut self, channels: &[ChannelId]) -> bool {
        if !self.replaying {
            self.replaying = true;
            return true;
        }
        let merged = match self.requested.take() {
            None => channels.to_vec(),
            Some(all) if all.is_empty() => all,
            Some(_) if channels.is_empty() => Vec::new(),
            Some(mut ids) => {
                for id in channels {
                    if !ids.contains(id) {
                        ids.push(*id);
                    }
                }
                ids
            }
        };
        self.requested = Some(merged);
        false
    }

    /// Returns the channels for the next pass, or releases the replay loop.
    fn next_replay(&mut self) -> Option<Vec<ChannelId>> {
        let next = self.requested.take();
        if next.is_none() {
            self.replaying = false;
        }
        next
    }
}

pub(super) struct Inner {
    pub(super) cfg: Config,
    logger: Option<Arc<dyn Logger>>,
    state: Mutex<State>,
}

/// In-process publish/subscribe dispatcher.
///
/// Cheap to clone; clones share the same channels and run state.
///
/// ### Properties
/// - **Buffered**: values published before the first listener (or while stopped) are kept and replayed in order.
/// - **Serialized**: with [`Config::wait_listener_result`], one dispatch unit per channel is in flight at a time.
/// - **Bounded wait**: async listeners are awaited at most [`Config::max_listener_wait`], never cancelled.
/// - **Reentrant-safe**: a listener publishing during its own invocation has the value buffered and replayed after it returns.
///
/// Async listeners need a Tokio runtime; sync listeners do not.
#[derive(Clone)]
pub struct Emitter {
    pub(super) inner: Arc<Inner>,
}

impl Emitter {
    /// Creates an emitter with the default [`TracingLogger`](crate::TracingLogger).
    pub fn new(cfg: Config) -> Self {
        EmitterBuilder::new(cfg).build()
    }

    /// Returns a builder for customizing the logger.
    pub fn builder(cfg: Config) -> EmitterBuilder {
        EmitterBuilder::new(cfg)
    }

    pub(super) fn from_parts(cfg: Config, logger: Option<Arc<dyn Logger>>) -> Self {
        Self {
            inner: Arc::new(Inner {
                cfg,
                logger,
                state: Mutex::new(State {
                    gate: Gate::default(),
                    registry: Registry::default(),
                    publishing: 0,
                    stalled: false,
                    replaying: false,
                    requested: None,
                }),
            }),
        }
    }

    /// Returns the configuration this emitter was built with.
    pub fn config(&self) -> &Config {
        &self.inner.cfg
    }

    /// Adds `listener` to channel `C` and replays the channel's buffered values.
    ///
    /// Subscribing the same handle (or a clone of it) twice is a no-op.
    /// Replay happens before this returns for sync listeners; it stops early if the
    /// emitter is stopped, leaving the rest buffered.
    pub fn subscribe<C: Channel>(&self, listener: Listener<C::Payload>) -> &Self {
        {
            let mut state = self.lock();
            let channel = state.registry.resolve::<C>().typed::<C>();
            if !channel.listeners.contains(&listener) {
                tracing::trace!(channel = C::NAME, listener = %listener.id(), "listener subscribed");
                channel.listeners.push(listener);
            }
        }
        self.replay(&[ChannelId::of::<C>()]);
        self
    }

    /// Removes `listener` (matched by identity) from channel `C`.
    ///
    /// Dispatch units already chained for it still run.
    pub fn unsubscribe<C: Channel>(&self, listener: &Listener<C::Payload>) {
        let mut state = self.lock();
        state
            .registry
            .resolve::<C>()
            .typed::<C>()
            .listeners
            .retain(|l| l != listener);
    }

    /// Publishes `value` on channel `C`.
    ///
    /// Buffers when the emitter is stopped or the channel has no listeners
    /// (unless [`Config::queue_if_no_listeners`] is off, in which case the value is dropped).
    /// Otherwise runs one dispatch unit per listener, in registration order.
    pub fn publish<C: Channel>(&self, value: C::Payload) {
        let queue_if_empty = self.inner.cfg.queue_if_no_listeners;
        let listeners = {
            let mut guard = self.lock();
            let state = &mut *guard;
            let open = state.gate.is_open();
            let channel = state.registry.resolve::<C>().typed::<C>();

            if !open {
                channel.buffered.push_back(value);
                tracing::trace!(channel = C::NAME, buffered = channel.buffered.len(), "emitter stopped, value buffered");
                state.note_stalled();
                return;
            }
            if channel.listeners.is_empty() {
                if queue_if_empty {
                    channel.buffered.push_back(value);
                    tracing::trace!(channel = C::NAME, buffered = channel.buffered.len(), "no listeners, value buffered");
                } else {
                    tracing::trace!(channel = C::NAME, "no listeners, value dropped");
                }
                return;
            }
            let listeners = channel.listeners.clone();
            state.publishing += 1;
            listeners
        };

        for listener in listeners {
            self.dispatch::<C>(listener, value.clone());
        }

        let replay = self.lock().finish_publish();
        if replay {
            self.replay(&[]);
        }
    }

    /// Replays buffered values for the selected channels, then waits until their
    /// dispatch chains settle.
    ///
    /// An empty `channels` selects every known channel. Units chained while waiting
    /// (e.g. replays after a guard window) are awaited too.
    ///
    /// When the emitter is paused this logs [`EmitterError::DrainWhilePaused`] and
    /// returns without waiting. Awaiting the channel of the listener currently running
    /// from inside that listener waits until its wait limit elapses.
    pub async fn drain(&self, channels: &[ChannelId]) {
        self.replay(channels);

        if self.is_paused() {
            self.report(EmitterError::DrainWhilePaused);
            return;
        }

        let mut awaited: Vec<Chain> = Vec::new();
        loop {
            let tails = self.lock().registry.tails(channels);
            // A tail that already resolved but is still registered belongs to a unit
            // that never settled (its task was dropped); waiting on it again would spin.
            if tails
                .iter()
                .all(|tail| awaited.iter().any(|seen| seen.ptr_eq(tail)))
            {
                break;
            }
            for tail in &tails {
                tail.clone().await;
            }
            awaited = tails;
        }
    }

    /// [`drain`](Self::drain) over every channel.
    pub async fn drain_all(&self) {
        self.drain(&[]).await
    }

    /// Stops dispatching: subsequent publishes are buffered until [`resume`](Self::resume)
    /// and a flush (subscribe, drain, or the end of a guard window).
    ///
    /// Logs [`EmitterError::AlreadyPaused`] if already paused.
    pub fn pause(&self) {
        let res = self.lock().gate.pause();
        if let Err(err) = res {
            self.report(err);
        }
    }

    /// Re-enables dispatching. Buffered values are not replayed until the next flush.
    ///
    /// Logs [`EmitterError::NotPaused`] if not paused.
    pub fn resume(&self) {
        let res = self.lock().gate.resume();
        if let Err(err) = res {
            self.report(err);
        }
    }

    /// Returns the current run state (stopped while paused or while a guard window is held).
    pub fn run_state(&self) -> RunState {
        self.lock().gate.state()
    }

    /// Returns true if [`pause`](Self::pause) is in effect.
    pub fn is_paused(&self) -> bool {
        self.lock().gate.is_paused()
    }

    /// Number of listeners on channel `C`.
    pub fn listener_count<C: Channel>(&self) -> usize {
        self.lock()
            .registry
            .get::<C>()
            .and_then(|slot| slot.typed_ref::<C>())
            .map_or(0, |channel| channel.listeners.len())
    }

    /// Number of values currently buffered on channel `C`.
    pub fn buffered_len<C: Channel>(&self) -> usize {
        self.lock()
            .registry
            .get::<C>()
            .and_then(|slot| slot.typed_ref::<C>())
            .map_or(0, |channel| channel.buffered.len())
    }

    /// Replays buffered values of `C` while the gate is open and the channel can dispatch.
    pub(super) fn flush<C: Channel>(&self) {
        let queue_if_empty = self.inner.cfg.queue_if_no_listeners;
        loop {
            let value = {
                let mut guard = self.lock();
                let state = &mut *guard;
                if !state.gate.is_open() {
                    state.note_stalled();
                    return;
                }
                let channel = state.registry.resolve::<C>().typed::<C>();
                if channel.listeners.is_empty() && queue_if_empty {
                    return;
                }
                match channel.buffered.pop_front() {
                    Some(value) => value,
                    None => return,
                }
            };
            self.publish::<C>(value);
        }
    }

    /// Replays buffered values of the selected channels (empty = every channel).
    ///
    /// Runs the replay loop, or hands the request to the loop already running.
    pub(super) fn replay(&self, channels: &[ChannelId]) {
        if !self.lock().begin_replay(channels) {
            return;
        }
        let mut selected = channels.to_vec();
        loop {
            let flushers = self.lock().registry.flushers(&selected);
            for flush in flushers {
                flush(self);
            }
            let next = self.lock().next_replay();
            match next {
                Some(ids) => selected = ids,
                None => return,
            }
        }
    }

    pub(super) fn lock(&self) -> MutexGuard<'_, State> {
        self.inner.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Hands `err` to the logger. Never called with the state lock held.
    pub(super) fn report(&self, err: EmitterError) {
        if let Some(logger) = &self.inner.logger {
            logger.error(&err);
        }
    }
}

impl fmt::Debug for Emitter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Emitter")
            .field("cfg", &self.inner.cfg)
            .field("run_state", &self.run_state())
            .finish_non_exhaustive()
    }
}
