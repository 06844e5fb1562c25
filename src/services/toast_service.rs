//! Toast queue service.
//!
//! Provides:
//! - An ordered, newest-first queue of toasts
//! - Independent auto-dismiss timers per toast
//! - Action activation
//! - A cloneable [`Toaster`] handle shared by the runtime, the timer driver
//!   and the global bridge
//!
//! All queue mutation happens under one mutex. Event handlers and toast
//! action handlers run after it is released.

use std::collections::VecDeque;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Instant;

use crate::app::events::{EventBus, OverlayEvent, ToastRemoval};
use crate::config::ToastSettings;
use crate::domain::{ToastId, ToastItem, ToastOptions, ToastPosition};
use crate::overlay::{Clock, TimerPurpose, TimerRegistry};

/// The queue itself. Only reachable through [`Toaster`].
#[derive(Debug)]
struct ToastQueue {
    items: VecDeque<ToastItem>,
    timers: TimerRegistry<ToastId>,
    default_duration_ms: u64,
    max_visible: Option<usize>,
    position: ToastPosition,
    /// Events produced by the current operation, published after unlock.
    outbox: Vec<OverlayEvent>,
}

impl ToastQueue {
    fn remove(&mut self, id: &ToastId, reason: ToastRemoval) -> bool {
        self.timers.cancel(id, TimerPurpose::AutoDismiss);
        let Some(pos) = self.items.iter().position(|t| &t.id == id) else {
            return false;
        };
        self.items.remove(pos);
        self.outbox.push(OverlayEvent::ToastRemoved {
            id: id.clone(),
            reason,
        });
        true
    }

    fn push(&mut self, options: ToastOptions) -> ToastId {
        let item = ToastItem::from_options(options, self.default_duration_ms);
        let id = item.id.clone();

        if self.remove(&id, ToastRemoval::Replaced) {
            tracing::debug!(%id, "toast replaced");
        }
        if let Some(delay) = item.auto_dismiss() {
            self.timers
                .schedule(id.clone(), TimerPurpose::AutoDismiss, delay);
        }
        self.items.push_front(item);
        self.outbox.push(OverlayEvent::ToastShown(id.clone()));

        if let Some(max) = self.max_visible {
            while self.items.len() > max {
                let Some(oldest) = self.items.back().map(|t| t.id.clone()) else {
                    break;
                };
                self.remove(&oldest, ToastRemoval::Trimmed);
            }
        }
        id
    }

    fn clear(&mut self) -> usize {
        let count = self.items.len();
        for item in self.items.drain(..) {
            self.outbox.push(OverlayEvent::ToastRemoved {
                id: item.id,
                reason: ToastRemoval::Cleared,
            });
        }
        self.timers.cancel_all();
        count
    }

    fn advance(&mut self, now: Instant) -> Vec<ToastId> {
        let mut expired = Vec::new();
        for (id, _) in self.timers.advance(now) {
            if self.remove(&id, ToastRemoval::Expired) {
                expired.push(id);
            }
        }
        expired
    }
}

/// Shared handle to a toast queue.
///
/// Clones refer to the same queue.
#[derive(Debug, Clone)]
pub struct Toaster {
    queue: Arc<Mutex<ToastQueue>>,
    events: Option<EventBus>,
}

impl Toaster {
    pub fn new(clock: Arc<dyn Clock>, settings: &ToastSettings) -> Self {
        Self {
            queue: Arc::new(Mutex::new(ToastQueue {
                items: VecDeque::new(),
                timers: TimerRegistry::new(clock),
                default_duration_ms: settings.default_duration_ms,
                max_visible: settings.visible_limit(),
                position: settings.position,
                outbox: Vec::new(),
            })),
            events: None,
        }
    }

    /// Publishes queue changes on `events`.
    pub fn with_events(mut self, events: EventBus) -> Self {
        self.events = Some(events);
        self
    }

    /// Runs `f` under the lock and publishes what it produced afterwards.
    fn with_queue<T>(&self, f: impl FnOnce(&mut ToastQueue) -> T) -> T {
        let (result, outbox) = {
            let mut queue = self.lock();
            let result = f(&mut queue);
            (result, std::mem::take(&mut queue.outbox))
        };
        if let Some(events) = &self.events {
            for event in outbox {
                events.publish(event);
            }
        }
        result
    }

    fn lock(&self) -> MutexGuard<'_, ToastQueue> {
        self.queue.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Adds a toast at the head of the queue.
    pub fn push(&self, options: ToastOptions) -> ToastId {
        let id = self.with_queue(|q| q.push(options));
        tracing::debug!(%id, "toast pushed");
        id
    }

    /// Shorthand for a toast with only a title.
    pub fn toast(&self, title: impl Into<String>) -> ToastId {
        self.push(ToastOptions::message(title))
    }

    /// Removes a toast and cancels its timer. Unknown ids are ignored.
    pub fn dismiss(&self, id: &ToastId) -> bool {
        self.with_queue(|q| q.remove(id, ToastRemoval::Dismissed))
    }

    /// Removes every toast and cancels every timer.
    pub fn clear(&self) -> usize {
        self.with_queue(ToastQueue::clear)
    }

    /// Expires toasts whose timers are due at `now`.
    pub fn advance(&self, now: Instant) -> Vec<ToastId> {
        let expired = self.with_queue(|q| q.advance(now));
        if !expired.is_empty() {
            tracing::debug!(count = expired.len(), "toasts expired");
        }
        expired
    }

    pub fn next_deadline(&self) -> Option<Instant> {
        self.lock().timers.next_deadline()
    }

    /// Current time on the queue's clock.
    pub fn now(&self) -> Instant {
        self.lock().timers.now()
    }

    /// Invokes a toast's action handler with its id.
    ///
    /// The handler runs without the queue locked, so it may dismiss the
    /// toast or push new ones.
    pub fn activate_action(&self, id: &ToastId) -> bool {
        let action = self
            .lock()
            .items
            .iter()
            .find(|t| &t.id == id)
            .and_then(|t| t.action.clone());
        match action {
            Some(action) => {
                (action.on_activate)(id);
                true
            }
            None => false,
        }
    }

    /// Snapshot of the queue, newest first.
    pub fn items(&self) -> Vec<ToastItem> {
        self.lock().items.iter().cloned().collect()
    }

    pub fn get(&self, id: &ToastId) -> Option<ToastItem> {
        self.lock().items.iter().find(|t| &t.id == id).cloned()
    }

    pub fn len(&self) -> usize {
        self.lock().items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().items.is_empty()
    }

    /// Number of auto-dismiss timers still pending.
    pub fn pending_timers(&self) -> usize {
        self.lock().timers.pending_count()
    }

    pub fn position(&self) -> ToastPosition {
        self.lock().position
    }

    /// Whether both handles share one queue.
    pub fn same_queue(&self, other: &Toaster) -> bool {
        Arc::ptr_eq(&self.queue, &other.queue)
    }
}
