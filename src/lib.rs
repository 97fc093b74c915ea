//! # eventvisor
//!
//! **Eventvisor** is an in-process, typed publish/subscribe primitive for Rust.
//!
//! Callers declare typed channels, register listeners per channel and publish values.
//! Listeners can be plain functions or return futures. The emitter decides when a value
//! is buffered versus delivered, serializes deliveries per channel, guards against
//! re-entrant publication and bounds how long it waits for slow listeners without
//! cancelling them.
//!
//! ## Architecture
//! ### Overview
//! ```text
//!   publish::<C>(v)        subscribe::<C>(l)        drain(&[ids])      pause()/resume()
//!        │                       │                        │                  │
//!        ▼                       ▼                        ▼                  ▼
//! ┌───────────────────────────────────────────────────────────────────────────────┐
//! │  Emitter                                                                      │
//! │  - Gate (RunState: external pause + guard count, global)                      │
//! │  - Registry (ChannelId → Slot, created lazily)                                │
//! │      Slot { listeners, buffered values, chain tail, in-flight count }         │
//! │  - Logger (EmitterError sink, TracingLogger by default)                       │
//! └──────┬──────────────────────────────┬─────────────────────────────────────────┘
//!        │ gate closed / no listeners   │ gate open
//!        ▼                              ▼
//!   buffered (FIFO)           one dispatch unit per listener
//!        ▲                              │
//!        │ replay on subscribe,         ├─ sync  listener ─► settled on return
//!        │ guard release, drain         └─ async listener ─► spawned, raced with
//!        │                                                   max_listener_wait
//!        └──── re-entrant publishes during a guard window ◄───┘
//! ```
//!
//! ### Dispatch unit
//! ```text
//! chain onto channel tail ─► wait for previous unit
//!   ├─► gate.enter()                      (publishes now buffer)
//!   ├─► listener.call(value)              (Err / panic ─► logged)
//!   ├─► await result or timeout           (timeout ─► logged, work continues)
//!   ├─► gate.leave()
//!   └─► replay buffered values
//! ```
//!
//! ## Features
//! | Area              | Description                                                  | Key types / traits                    |
//! |-------------------|--------------------------------------------------------------|---------------------------------------|
//! | **Channels**      | Typed channel markers and runtime ids.                       | [`Channel`], [`ChannelId`], [`channel!`] |
//! | **Listeners**     | Sync or async consumers with stable identity.                | [`Listener`], [`Listen`]              |
//! | **Dispatch**      | Buffering, serialization, bounded waits, pause/resume/drain. | [`Emitter`], [`RunState`]             |
//! | **Errors**        | Every fault is logged, never returned.                       | [`EmitterError`], [`Logger`]          |
//! | **Configuration** | Queueing, waiting and wait limits.                           | [`Config`], [`EmitterBuilder`]        |
//!
//! ## Example
//! ```rust
//! use std::sync::{Arc, Mutex};
//! use eventvisor::{channel, Config, Emitter, Listener};
//!
//! channel!(Temperature: f32);
//!
//! let emitter = Emitter::new(Config::default());
//!
//! // No listener yet: the value is buffered.
//! emitter.publish::<Temperature>(21.5);
//!
//! let seen = Arc::new(Mutex::new(Vec::new()));
//! let sink = Arc::clone(&seen);
//! emitter.subscribe::<Temperature>(Listener::new(move |t: &f32| {
//!     sink.lock().unwrap().push(*t);
//! }));
//!
//! // Replayed on subscribe; later values are delivered directly.
//! emitter.publish::<Temperature>(22.0);
//! assert_eq!(*seen.lock().unwrap(), vec![21.5, 22.0]);
//! ```
mod channels;
mod core;
mod error;
mod listeners;
mod loggers;

// ---- Public re-exports ----

pub use channels::{Channel, ChannelId};
// Prefixed so the local `core` module is not confused with the `core` crate.
pub use crate::core::{Config, Emitter, EmitterBuilder, RunState};
pub use error::EmitterError;
pub use listeners::{Listen, Listener, ListenerError, ListenerId, ListenerRef, ListenerResult};
pub use loggers::{Logger, TracingLogger};
