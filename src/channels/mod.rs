//! Typed channels.
//!
//! A channel is a named stream with a fixed payload type. Each channel is a
//! zero-sized marker type implementing [`Channel`]; the set of marker types a
//! program declares is its event map.
//!
//! ## Contents
//! - [`Channel`] name + payload type of one channel
//! - [`ChannelId`] runtime identity used to select channels for `drain`
//! - [`channel!`](crate::channel) declares a marker type in one line

mod channel;

pub use channel::{Channel, ChannelId};
