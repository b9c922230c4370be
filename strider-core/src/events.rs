//! Typed publish/subscribe for gameplay events.
//!
//! Subscribers register per [`CustomEventKind`] and are invoked in
//! registration order. A handler returns [`Delivery::Unsubscribe`] to act as
//! a one-shot monitor. Handlers run with the bus unlocked, so they may raise
//! or subscribe from inside a callback. An event raised while another is
//! being delivered is queued and delivered, in order, once the current
//! delivery finishes.

use std::collections::{HashMap, VecDeque};

use parking_lot::Mutex;
use tracing::trace;

use crate::rest_area::RestAreaId;
use crate::types::CharacterId;

/// Kinds of gameplay events.
///
/// Elders raise `SomethingFound` when they claim a rest area. The pursuit
/// kinds belong to chasing creatures, which live on the host side; the
/// bus only carries them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CustomEventKind {
    /// The raiser found something of interest (e.g. a free rest area).
    SomethingFound,
    /// The raiser started chasing its target.
    PursuitStarted,
    /// The raiser gave up or finished a chase.
    PursuitEnded,
}

/// What an event is about.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EventTarget {
    /// Another character.
    Character(CharacterId),
    /// A rest area.
    RestArea(RestAreaId),
}

/// A raised event.
#[derive(Debug, Clone, PartialEq)]
pub struct CustomEvent {
    /// Event kind.
    pub kind: CustomEventKind,
    /// Who raised it.
    pub raiser: CharacterId,
    /// Optional subject.
    pub target: Option<EventTarget>,
    /// Free-form payload.
    pub value: f32,
}

/// Whether a handler stays subscribed after a delivery.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Delivery {
    /// Keep receiving events.
    Keep,
    /// Drop the subscription.
    Unsubscribe,
}

/// Handle returned by [`EventBus::subscribe`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u64);

type Handler = Box<dyn FnMut(&CustomEvent) -> Delivery + Send>;

#[derive(Default)]
struct BusInner {
    next_id: u64,
    subscribers: HashMap<CustomEventKind, Vec<(SubscriptionId, Handler)>>,
    raised: u64,
    delivering: bool,
    queued: VecDeque<CustomEvent>,
}

/// Thread-safe event bus, shared by reference with every character.
#[derive(Default)]
pub struct EventBus {
    inner: Mutex<BusInner>,
}

impl EventBus {
    /// An empty bus.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `handler` for events of `kind`.
    pub fn subscribe<F>(&self, kind: CustomEventKind, handler: F) -> SubscriptionId
    where
        F: FnMut(&CustomEvent) -> Delivery + Send + 'static,
    {
        let mut inner = self.inner.lock();
        let id = SubscriptionId(inner.next_id);
        inner.next_id += 1;
        inner
            .subscribers
            .entry(kind)
            .or_default()
            .push((id, Box::new(handler)));
        id
    }

    /// Remove a subscription. Returns whether it existed.
    ///
    /// A subscription cannot remove itself this way while its own kind is
    /// being delivered; return [`Delivery::Unsubscribe`] instead.
    pub fn unsubscribe(&self, id: SubscriptionId) -> bool {
        let mut inner = self.inner.lock();
        for handlers in inner.subscribers.values_mut() {
            if let Some(pos) = handlers.iter().position(|(sid, _)| *sid == id) {
                handlers.remove(pos);
                return true;
            }
        }
        false
    }

    /// Deliver `event` to every subscriber of its kind. Returns how many
    /// handlers saw it.
    ///
    /// Raised from inside a handler (or from another thread mid-delivery),
    /// the event is queued behind the one being delivered and `0` is
    /// returned; it reaches every subscriber of its kind, including the
    /// handler that raised it, before the outer `raise` returns.
    pub fn raise(&self, event: &CustomEvent) -> usize {
        {
            let mut inner = self.inner.lock();
            inner.raised += 1;
            if inner.delivering {
                trace!(kind = ?event.kind, raiser = %event.raiser, "Event queued behind delivery");
                inner.queued.push_back(event.clone());
                return 0;
            }
            inner.delivering = true;
        }

        let delivered = self.deliver(event);
        loop {
            let next = {
                let mut inner = self.inner.lock();
                let next = inner.queued.pop_front();
                if next.is_none() {
                    inner.delivering = false;
                }
                next
            };
            let Some(next) = next else { break };
            self.deliver(&next);
        }
        delivered
    }

    fn deliver(&self, event: &CustomEvent) -> usize {
        let mut handlers = self.inner.lock().subscribers.remove(&event.kind).unwrap_or_default();
        let delivered = handlers.len();
        handlers.retain_mut(|(_, handler)| handler(event) == Delivery::Keep);

        let mut inner = self.inner.lock();
        let slot = inner.subscribers.entry(event.kind).or_default();
        // Subscriptions made during delivery go after the survivors.
        let added = std::mem::replace(slot, handlers);
        slot.extend(added);
        trace!(kind = ?event.kind, raiser = %event.raiser, delivered, "Event raised");
        delivered
    }

    /// Number of live subscriptions for `kind`.
    #[must_use]
    pub fn subscriber_count(&self, kind: CustomEventKind) -> usize {
        self.inner
            .lock()
            .subscribers
            .get(&kind)
            .map_or(0, Vec::len)
    }

    /// Total events raised since creation.
    #[must_use]
    pub fn raised(&self) -> u64 {
        self.inner.lock().raised
    }
}

impl std::fmt::Debug for EventBus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let inner = self.inner.lock();
        f.debug_struct("EventBus")
            .field("kinds", &inner.subscribers.len())
            .field("raised", &inner.raised)
            .field("queued", &inner.queued.len())
            .finish()
    }
}
