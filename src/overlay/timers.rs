//! Cancellable timers keyed by owner and purpose.
//!
//! The registry does not run callbacks. It records deadlines and hands back
//! the keys that came due on [`TimerRegistry::advance`]; the owner of the
//! registry routes each key to its action. This keeps firing order
//! explicit and lets a fired action schedule or cancel other timers
//! without re-entering the registry.

use std::collections::HashMap;
use std::fmt;
use std::hash::Hash;
use std::sync::{Arc, Mutex, PoisonError};
use std::time::{Duration, Instant};

/// Source of the current time.
pub trait Clock: Send + Sync {
    fn now(&self) -> Instant;
}

/// Wall clock.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> Instant {
        Instant::now()
    }
}

/// Clock that only moves when told to.
#[derive(Debug, Clone)]
pub struct ManualClock {
    now: Arc<Mutex<Instant>>,
}

impl ManualClock {
    pub fn new() -> Self {
        Self {
            now: Arc::new(Mutex::new(Instant::now())),
        }
    }

    /// Moves the clock forward.
    pub fn advance(&self, by: Duration) {
        let mut now = self.now.lock().unwrap_or_else(PoisonError::into_inner);
        *now += by;
    }
}

impl Default for ManualClock {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock for ManualClock {
    fn now(&self) -> Instant {
        *self.now.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

/// Clock backed by tokio's time source.
///
/// Follows tokio's paused clock in tests.
#[derive(Debug, Clone, Copy, Default)]
pub struct TokioClock;

impl Clock for TokioClock {
    fn now(&self) -> Instant {
        tokio::time::Instant::now().into_std()
    }
}

/// Why a timer exists.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum TimerPurpose {
    /// Hover-intent delay before opening.
    HoverOpen,
    /// Hover-intent delay before closing.
    HoverClose,
    /// Auto-dismiss of a transient item.
    AutoDismiss,
}

/// Outcome of [`TimerRegistry::schedule`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Scheduled {
    /// Zero delay: the caller must run the action now.
    Immediate,
    /// The timer is pending until `deadline`.
    Pending { deadline: Instant },
}

#[derive(Debug, Clone, Copy)]
struct Pending {
    deadline: Instant,
    seq: u64,
}

/// Pending timers, at most one per (owner, purpose) pair.
pub struct TimerRegistry<K> {
    clock: Arc<dyn Clock>,
    pending: HashMap<(K, TimerPurpose), Pending>,
    seq: u64,
}

impl<K> TimerRegistry<K>
where
    K: Clone + Eq + Hash + fmt::Debug,
{
    pub fn new(clock: Arc<dyn Clock>) -> Self {
        Self {
            clock,
            pending: HashMap::new(),
            seq: 0,
        }
    }

    /// Current time according to the registry's clock.
    pub fn now(&self) -> Instant {
        self.clock.now()
    }

    /// Schedules a timer, replacing any pending one for the same pair.
    pub fn schedule(&mut self, owner: K, purpose: TimerPurpose, delay: Duration) -> Scheduled {
        let key = (owner, purpose);
        if self.pending.remove(&key).is_some() {
            tracing::trace!(owner = ?key.0, ?purpose, "superseded pending timer");
        }
        if delay.is_zero() {
            return Scheduled::Immediate;
        }

        let deadline = self.clock.now() + delay;
        self.seq += 1;
        self.pending.insert(
            key,
            Pending {
                deadline,
                seq: self.seq,
            },
        );
        Scheduled::Pending { deadline }
    }

    /// Cancels the pending timer for a pair. Returns whether one existed.
    pub fn cancel(&mut self, owner: &K, purpose: TimerPurpose) -> bool {
        self.pending.remove(&(owner.clone(), purpose)).is_some()
    }

    /// Cancels every timer belonging to `owner`.
    pub fn cancel_owner(&mut self, owner: &K) -> usize {
        let before = self.pending.len();
        self.pending.retain(|(k, _), _| k != owner);
        before - self.pending.len()
    }

    /// Cancels everything.
    pub fn cancel_all(&mut self) {
        self.pending.clear();
    }

    pub fn is_pending(&self, owner: &K, purpose: TimerPurpose) -> bool {
        self.pending.contains_key(&(owner.clone(), purpose))
    }

    pub fn pending_count(&self) -> usize {
        self.pending.len()
    }

    /// Earliest pending deadline.
    pub fn next_deadline(&self) -> Option<Instant> {
        self.pending.values().map(|p| p.deadline).min()
    }

    /// Removes and returns every timer due at `now`, earliest first.
    ///
    /// Timers sharing a deadline come back in scheduling order.
    pub fn advance(&mut self, now: Instant) -> Vec<(K, TimerPurpose)> {
        let mut due: Vec<((K, TimerPurpose), Pending)> = Vec::new();
        self.pending.retain(|key, pending| {
            if pending.deadline <= now {
                due.push((key.clone(), *pending));
                false
            } else {
                true
            }
        });
        due.sort_by_key(|(_, p)| (p.deadline, p.seq));
        due.into_iter().map(|(key, _)| key).collect()
    }

    /// [`TimerRegistry::advance`] using the registry's own clock.
    pub fn advance_to_now(&mut self) -> Vec<(K, TimerPurpose)> {
        let now = self.clock.now();
        self.advance(now)
    }
}

impl<K: fmt::Debug> fmt::Debug for TimerRegistry<K> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TimerRegistry")
            .field("pending", &self.pending.len())
            .finish()
    }
}
