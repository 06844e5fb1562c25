//! Event bus for overlay and toast lifecycle events.
//!
//! Hosts subscribe here to learn when surfaces mount, move or close and
//! when toasts come and go, without polling the runtime.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, PoisonError};

use crate::domain::{OverlayId, ToastId};
use crate::overlay::{CloseReason, OverlayKind, SurfaceLayout};

/// Lifecycle events.
#[derive(Debug, Clone, PartialEq)]
pub enum OverlayEvent {
    /// A surface finished opening.
    Opened { id: OverlayId, kind: OverlayKind },
    /// A surface finished closing.
    Closed {
        id: OverlayId,
        kind: OverlayKind,
        reason: CloseReason,
    },
    /// An open surface was placed again.
    Repositioned { id: OverlayId, layout: SurfaceLayout },
    /// A toast entered the queue.
    ToastShown(ToastId),
    /// A toast left the queue.
    ToastRemoved { id: ToastId, reason: ToastRemoval },
}

/// Why a toast left the queue.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToastRemoval {
    Expired,
    Dismissed,
    Cleared,
    /// Pushed again under the same id.
    Replaced,
    /// Pushed out by the visible-count limit.
    Trimmed,
}

/// Subscriber ID for unsubscribing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriberId(u64);

type EventHandler = Arc<dyn Fn(&OverlayEvent) + Send + Sync>;

/// Publish-subscribe hub.
///
/// Cheap to clone; clones share subscribers. Handlers run outside the
/// internal lock, so they may subscribe or publish themselves.
#[derive(Clone)]
pub struct EventBus {
    handlers: Arc<Mutex<HashMap<u64, EventHandler>>>,
    next_id: Arc<Mutex<u64>>,
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new()
    }
}

impl EventBus {
    pub fn new() -> Self {
        Self {
            handlers: Arc::new(Mutex::new(HashMap::new())),
            next_id: Arc::new(Mutex::new(0)),
        }
    }

    /// Subscribe to all events.
    ///
    /// Returns a subscriber ID that can be used to unsubscribe.
    pub fn subscribe<F>(&self, handler: F) -> SubscriberId
    where
        F: Fn(&OverlayEvent) + Send + Sync + 'static,
    {
        let id = {
            let mut next_id = self.next_id.lock().unwrap_or_else(PoisonError::into_inner);
            let id = *next_id;
            *next_id += 1;
            id
        };

        self.handlers
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(id, Arc::new(handler));

        SubscriberId(id)
    }

    pub fn unsubscribe(&self, subscriber_id: SubscriberId) {
        self.handlers
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .remove(&subscriber_id.0);
    }

    /// Publish an event to all subscribers.
    pub fn publish(&self, event: OverlayEvent) {
        let handlers: Vec<EventHandler> = self
            .handlers
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .values()
            .cloned()
            .collect();
        for handler in handlers {
            handler(&event);
        }
    }

    pub fn subscriber_count(&self) -> usize {
        self.handlers
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }
}

impl std::fmt::Debug for EventBus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EventBus")
            .field("subscriber_count", &self.subscriber_count())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[test]
    fn subscribe_and_publish() {
        let bus = EventBus::new();
        let counter = Arc::new(AtomicUsize::new(0));

        let counter_clone = Arc::clone(&counter);
        let _sub = bus.subscribe(move |_event| {
            counter_clone.fetch_add(1, Ordering::SeqCst);
        });

        bus.publish(OverlayEvent::ToastShown(ToastId::from("a")));
        bus.publish(OverlayEvent::ToastRemoved {
            id: ToastId::from("a"),
            reason: ToastRemoval::Dismissed,
        });

        assert_eq!(counter.load(Ordering::SeqCst), 2);
    }

    #[test]
    fn unsubscribe() {
        let bus = EventBus::new();
        let counter = Arc::new(AtomicUsize::new(0));

        let counter_clone = Arc::clone(&counter);
        let sub_id = bus.subscribe(move |_event| {
            counter_clone.fetch_add(1, Ordering::SeqCst);
        });

        bus.publish(OverlayEvent::ToastShown(ToastId::from("a")));
        bus.unsubscribe(sub_id);
        bus.publish(OverlayEvent::ToastShown(ToastId::from("b")));

        assert_eq!(counter.load(Ordering::SeqCst), 1);
        assert_eq!(bus.subscriber_count(), 0);
    }

    #[test]
    fn handlers_may_publish() {
        let bus = EventBus::new();
        let seen = Arc::new(Mutex::new(Vec::new()));

        let inner = bus.clone();
        let sink = Arc::clone(&seen);
        bus.subscribe(move |event| {
            sink.lock().unwrap().push(event.clone());
            if let OverlayEvent::ToastShown(id) = event {
                inner.publish(OverlayEvent::ToastRemoved {
                    id: id.clone(),
                    reason: ToastRemoval::Expired,
                });
            }
        });

        bus.publish(OverlayEvent::ToastShown(ToastId::from("x")));

        assert_eq!(seen.lock().unwrap().len(), 2);
    }
}
