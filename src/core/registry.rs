//! # Channel registry.
//!
//! Maps [`ChannelId`] → [`Slot`]. Slots are created lazily on first reference and
//! never removed. Registration order is kept so flushes visit channels
//! deterministically.
//!
//! ## Slot layout
//! ```text
//! Slot
//!  ├─ state: ChannelState<P>   (type-erased: listeners + buffered values)
//!  ├─ flush: fn(&Emitter)      (replays this channel's buffer)
//!  ├─ pending: Option<Chain>   (tail of the serialized dispatch chain)
//!  └─ in_flight: usize         (units chained and not yet settled)
//! ```

use std::any::Any;
use std::collections::{HashMap, VecDeque};

use futures::future::{BoxFuture, Shared};

use super::emitter::Emitter;
use crate::channels::{Channel, ChannelId};
use crate::listeners::Listener;

/// Tail of a channel's dispatch chain; resolves when the last chained unit settles.
pub(super) type Chain = Shared<BoxFuture<'static, ()>>;

/// Typed per-channel state.
pub(super) struct ChannelState<P> {
    pub(super) listeners: Vec<Listener<P>>,
    pub(super) buffered: VecDeque<P>,
}

impl<P> Default for ChannelState<P> {
    fn default() -> Self {
        Self {
            listeners: Vec::new(),
            buffered: VecDeque::new(),
        }
    }
}

pub(super) struct Slot {
    state: Box<dyn Any + Send>,
    flush: fn(&Emitter),
    pub(super) pending: Option<Chain>,
    pub(super) in_flight: usize,
}

impl Slot {
    fn new<C: Channel>() -> Self {
        Self {
            state: Box::new(ChannelState::<C::Payload>::default()),
            flush: flush_channel::<C>,
            pending: None,
            in_flight: 0,
        }
    }

    /// Returns the typed state. The slot is keyed by `C`'s `TypeId`.
    pub(super) fn typed<C: Channel>(&mut self) -> &mut ChannelState<C::Payload> {
        match self.state.downcast_mut::<ChannelState<C::Payload>>() {
            Some(state) => state,
            None => unreachable!("slot for `{}` holds a foreign payload type", C::NAME),
        }
    }

    pub(super) fn typed_ref<C: Channel>(&self) -> Option<&ChannelState<C::Payload>> {
        self.state.downcast_ref::<ChannelState<C::Payload>>()
    }

    /// Registers one more unit on the chain and makes `tail` the new tail.
    ///
    /// Returns the previous tail, or `None` when the chain was idle.
    pub(super) fn chain(&mut self, tail: Chain) -> Option<Chain> {
        self.in_flight += 1;
        let previous = self.pending.replace(tail);
        if self.in_flight == 1 { None } else { previous }
    }

    /// Marks one chained unit as settled.
    pub(super) fn settle(&mut self) {
        self.in_flight = self.in_flight.saturating_sub(1);
        if self.in_flight == 0 {
            self.pending = None;
        }
    }
}

fn flush_channel<C: Channel>(emitter: &Emitter) {
    emitter.flush::<C>();
}

#[derive(Default)]
pub(super) struct Registry {
    slots: HashMap<ChannelId, Slot>,
    order: Vec<ChannelId>,
}

impl Registry {
    /// Returns the slot for `C`, creating it on first use.
    pub(super) fn resolve<C: Channel>(&mut self) -> &mut Slot {
        let id = ChannelId::of::<C>();
        let order = &mut self.order;
        self.slots.entry(id).or_insert_with(|| {
            order.push(id);
            Slot::new::<C>()
        })
    }

    pub(super) fn get<C: Channel>(&self) -> Option<&Slot> {
        self.slots.get(&ChannelId::of::<C>())
    }

    /// Returns the known channels among `ids` in registration order.
    ///
    /// An empty `ids` selects every known channel.
    pub(super) fn select(&self, ids: &[ChannelId]) -> Vec<ChannelId> {
        self.order
            .iter()
            .filter(|id| ids.is_empty() || ids.contains(id))
            .copied()
            .collect()
    }

    pub(super) fn flushers(&self, ids: &[ChannelId]) -> Vec<fn(&Emitter)> {
        self.select(ids)
            .iter()
            .filter_map(|id| self.slots.get(id).map(|slot| slot.flush))
            .collect()
    }

    pub(super) fn tails(&self, ids: &[ChannelId]) -> Vec<Chain> {
        self.select(ids)
            .iter()
            .filter_map(|id| self.slots.get(id).and_then(|slot| slot.pending.clone()))
            .collect()
    }
}
