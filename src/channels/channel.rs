//! # Channel marker types.
//!
//! ## Example
//! ```rust
//! use eventvisor::{channel, Channel, ChannelId};
//!
//! channel!(pub OrderPlaced: u64);
//!
//! assert_eq!(OrderPlaced::NAME, "OrderPlaced");
//! assert_eq!(ChannelId::of::<OrderPlaced>().name(), "OrderPlaced");
//! ```

use std::any::TypeId;
use std::fmt;

/// A named stream with a fixed payload type.
///
/// Implementors are usually zero-sized markers declared with [`channel!`](crate::channel).
/// Payloads are cloned once per listener, so keep them cheap to clone
/// (wrap large values in `Arc`).
pub trait Channel: 'static {
    /// Value carried by this channel.
    type Payload: Clone + Send + 'static;

    /// Name used in log records.
    const NAME: &'static str;
}

/// Runtime identity of a channel.
///
/// Two ids are equal only if they come from the same marker type.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct ChannelId {
    type_id: TypeId,
    name: &'static str,
}

impl ChannelId {
    /// Returns the id of channel `C`.
    #[inline]
    pub fn of<C: Channel>() -> Self {
        Self {
            type_id: TypeId::of::<C>(),
            name: C::NAME,
        }
    }

    /// Returns the channel name.
    #[inline]
    pub fn name(&self) -> &'static str {
        self.name
    }
}

impl fmt::Display for ChannelId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name)
    }
}

/// Declares a channel marker type.
///
/// ```rust
/// use eventvisor::channel;
///
/// channel!(
///     /// Temperature readings in °C.
///     pub Temperature: f32
/// );
/// ```
#[macro_export]
macro_rules! channel {
    ($(#[$meta:meta])* $vis:vis $name:ident : $payload:ty) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
        $vis struct $name;

        impl $crate::Channel for $name {
            type Payload = $payload;
            const NAME: &'static str = stringify!($name);
        }
    };
}

#[cfg(test)]
mod tests {
    use super::*;

    crate::channel!(Alpha: u32);
    crate::channel!(Beta: u32);

    struct Renamed;

    impl Channel for Renamed {
        type Payload = String;
        const NAME: &'static str = "Alpha";
    }

    #[test]
    fn test_ids_differ_per_marker_type() {
        assert_eq!(ChannelId::of::<Alpha>(), ChannelId::of::<Alpha>());
        assert_ne!(ChannelId::of::<Alpha>(), ChannelId::of::<Beta>());
    }

    #[test]
    fn test_same_name_different_type_is_distinct() {
        assert_ne!(ChannelId::of::<Alpha>(), ChannelId::of::<Renamed>());
        assert_eq!(ChannelId::of::<Renamed>().to_string(), "Alpha");
    }
}
