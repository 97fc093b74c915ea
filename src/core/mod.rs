//! Dispatcher core: channel registry, run state and dispatch units.
//!
//! The only public types from this module are [`Emitter`], its [`EmitterBuilder`],
//! [`Config`] and [`RunState`].
//!
//! Internal modules:
//! - [`gate`]: run state and the coarse reentrancy guard;
//! - [`registry`]: lazily created per-channel slots (listeners, buffer, chain tail);
//! - [`emitter`]: public operations (subscribe, publish, drain, pause/resume);
//! - [`dispatch`]: one listener invocation with its guard window, timeout race and logging.

mod builder;
mod config;
mod dispatch;
mod emitter;
mod gate;
mod registry;


pub use builder::EmitterBuilder;
pub use config::Config;
pub use emitter::Emitter;
pub use gate::RunState;
