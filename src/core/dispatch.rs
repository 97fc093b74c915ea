//! # Dispatch units: one listener invocation for one published value.
//!
//! ## Serialized (`wait_listener_result = true`)
//! ```text
//! dispatch ─► chain onto channel tail
//!   ├─ chain idle ─► run prologue inline (inside publish)
//!   └─ chain busy ─► spawn: await previous tail ─► run prologue
//!
//! prologue:  gate.enter() ─► listener.call(value)
//!              ├─ sync result  ─► finish
//!              └─ future ─► spawn(observed future)
//!                           race with timeout(max_listener_wait)
//!                             ├─ settled first ─► finish
//!                             └─ timer first   ─► log ListenerTimedOut ─► finish
//!                                                 (future keeps running)
//! finish:    settle slot ─► gate.leave() ─► signal tail ─► flush all if reopened and idle
//! ```
//!
//! ## Fire-and-forget (`wait_listener_result = false`)
//! ```text
//! gate.enter() ─► listener.call(value) ─► spawn(observed future), chain it for drain
//!              ─► gate.leave()
//! (the enclosing publish replays buffered values once it has visited every listener)
//! ```
//!
//! ## Rules
//! - The guard window covers the listener call and, when serialized, its settle-or-timeout race.
//! - Faults never escape: sync errors/panics and async rejections are reported and
//!   the unit settles normally.
//! - A timed-out future is detached, not dropped: its eventual rejection is still reported.

use std::any::Any;
use std::panic::{self, AssertUnwindSafe};

use futures::FutureExt;
use futures::future::BoxFuture;
use tokio::runtime::Handle;
use tokio::sync::oneshot;
use tokio::time;

use super::emitter::Emitter;
use super::registry::Chain;
use crate::channels::Channel;
use crate::error::EmitterError;
use crate::listeners::{Call, Listener, ListenerRef, ListenerResult};

/// Outcome of a listener call.
enum Invocation {
    Settled,
    Pending(BoxFuture<'static, ListenerResult>),
}

/// Completion signal of a chained unit, paired with the tail it resolves.
fn completion() -> (oneshot::Sender<()>, Chain) {
    let (tx, rx) = oneshot::channel::<()>();
    (tx, rx.map(|_| ()).boxed().shared())
}

impl Emitter {
    pub(super) fn dispatch<C: Channel>(&self, listener: Listener<C::Payload>, value: C::Payload) {
        if self.inner.cfg.wait_listener_result {
            self.dispatch_serialized::<C>(listener, value);
        } else {
            self.dispatch_detached::<C>(listener, value);
        }
    }

    fn dispatch_serialized<C: Channel>(&self, listener: Listener<C::Payload>, value: C::Payload) {
        let (done, tail) = completion();
        let previous = self.lock().registry.resolve::<C>().chain(tail);

        let Some(previous) = previous else {
            match self.begin_unit::<C>(&listener, value) {
                None => self.finish_unit::<C>(done),
                Some(wait) => match Handle::try_current() {
                    Ok(rt) => {
                        let this = self.clone();
                        rt.spawn(async move {
                            wait.await;
                            this.finish_unit::<C>(done);
                        });
                    }
                    Err(_) => {
                        self.report(EmitterError::NoRuntime {
                            channel: C::NAME,
                            listener: listener.describe(),
                        });
                        self.finish_unit::<C>(done);
                    }
                },
            }
            return;
        };

        match Handle::try_current() {
            Ok(rt) => {
                let this = self.clone();
                rt.spawn(async move {
                    previous.await;
                    if let Some(wait) = this.begin_unit::<C>(&listener, value) {
                        wait.await;
                    }
                    this.finish_unit::<C>(done);
                });
            }
            Err(_) => {
                self.report(EmitterError::NoRuntime {
                    channel: C::NAME,
                    listener: listener.describe(),
                });
                self.lock().registry.resolve::<C>().settle();
                let _ = done.send(());
            }
        }
    }

    fn dispatch_detached<C: Channel>(&self, listener: Listener<C::Payload>, value: C::Payload) {
        self.lock().gate.enter();
        if let Invocation::Pending(fut) = self.invoke::<C>(&listener, value) {
            self.track_detached::<C>(listener.describe(), fut);
        }
        // Always runs inside a publish iteration. Values buffered during this window
        // are replayed when that publish ends, for every channel, not after each listener.
        self.lock().gate.leave();
    }

    /// Spawns a fire-and-forget listener future and chains it so `drain` can wait for it.
    fn track_detached<C: Channel>(&self, listener: ListenerRef, fut: BoxFuture<'static, ListenerResult>) {
        let rt = match Handle::try_current() {
            Ok(rt) => rt,
            Err(_) => {
                self.report(EmitterError::NoRuntime {
                    channel: C::NAME,
                    listener,
                });
                return;
            }
        };

        let work = rt.spawn(self.observe(C::NAME, listener, fut));
        let (done, tail) = completion();
        let previous = self.lock().registry.resolve::<C>().chain(tail);
        let this = self.clone();
        rt.spawn(async move {
            let _ = work.await;
            if let Some(previous) = previous {
                previous.await;
            }
            this.lock().registry.resolve::<C>().settle();
            let _ = done.send(());
        });
    }

    /// Opens the guard window and calls the listener.
    ///
    /// Returns the bounded wait to run before the unit may finish, if any.
    fn begin_unit<C: Channel>(
        &self,
        listener: &Listener<C::Payload>,
        value: C::Payload,
    ) -> Option<BoxFuture<'static, ()>> {
        self.lock().gate.enter();
        match self.invoke::<C>(listener, value) {
            Invocation::Settled => None,
            Invocation::Pending(fut) => Some(self.bounded_wait::<C>(listener.describe(), fut)),
        }
    }

    /// Settles the unit, closes its guard window and releases the next unit on the chain.
    fn finish_unit<C: Channel>(&self, done: oneshot::Sender<()>) {
        let replay = {
            let mut state = self.lock();
            state.registry.resolve::<C>().settle();
            state.leave_guard()
        };
        let _ = done.send(());
        if replay {
            self.replay(&[]);
        }
    }

    /// Calls the listener, reporting sync failures and panics.
    fn invoke<C: Channel>(&self, listener: &Listener<C::Payload>, value: C::Payload) -> Invocation {
        match panic::catch_unwind(AssertUnwindSafe(|| listener.call(value))) {
            Ok(Call::Returned(Ok(()))) => Invocation::Settled,
            Ok(Call::Returned(Err(err))) => {
                self.report(EmitterError::ListenerFailed {
                    channel: C::NAME,
                    listener: listener.describe(),
                    reason: err.to_string(),
                });
                Invocation::Settled
            }
            Ok(Call::Pending(fut)) => Invocation::Pending(fut),
            Err(payload) => {
                self.report(EmitterError::ListenerPanicked {
                    channel: C::NAME,
                    listener: listener.describe(),
                    reason: panic_message(payload.as_ref()),
                });
                Invocation::Settled
            }
        }
    }

    /// Races the listener future against the configured wait limit.
    ///
    /// The future runs in its own task, so losing the race does not cancel it.
    fn bounded_wait<C: Channel>(
        &self,
        listener: ListenerRef,
        fut: BoxFuture<'static, ListenerResult>,
    ) -> BoxFuture<'static, ()> {
        let limit = self.inner.cfg.listener_wait();
        let observed = self.observe(C::NAME, listener.clone(), fut);
        let this = self.clone();
        async move {
            let work = tokio::spawn(observed);
            match limit {
                Some(limit) => {
                    if time::timeout(limit, work).await.is_err() {
                        this.report(EmitterError::ListenerTimedOut {
                            channel: C::NAME,
                            listener,
                            limit,
                        });
                    }
                }
                None => {
                    let _ = work.await;
                }
            }
        }
        .boxed()
    }

    /// Wraps a listener future so that errors and panics are reported instead of propagated.
    fn observe(
        &self,
        channel: &'static str,
        listener: ListenerRef,
        fut: BoxFuture<'static, ListenerResult>,
    ) -> BoxFuture<'static, ()> {
        let this = self.clone();
        async move {
            let reason = match AssertUnwindSafe(fut).catch_unwind().await {
                Ok(Ok(())) => return,
                Ok(Err(err)) => err.to_string(),
                Err(payload) => panic_message(payload.as_ref()),
            };
            this.report(EmitterError::ListenerRejected {
                channel,
                listener,
                reason,
            });
        }
        .boxed()
    }
}

/// Renders a panic payload as text.
fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(msg) = payload.downcast_ref::<&'static str>() {
        (*msg).to_string()
    } else if let Some(msg) = payload.downcast_ref::<String>() {
        msg.clone()
    } else {
        "unknown panic".to_string()
    }
}
