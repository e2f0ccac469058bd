//! Shared tick source with scoped subscriptions.
//!
//! A mounted day screen holds one [`TickSubscription`]. Dropping it (screen
//! teardown, early return, panic unwind) removes it from the source, so no
//! tick is ever delivered to a disposed screen.
//!
//! Single-threaded by construction: the source is `Rc`-based and `!Send`.

use std::cell::RefCell;
use std::collections::BTreeMap;
use std::rc::{Rc, Weak};

use tracing::trace;

#[derive(Debug)]
struct Slot {
    interval_ms: u64,
    next_due_ms: u64,
}

#[derive(Debug, Default)]
struct Registry {
    next_id: u64,
    slots: BTreeMap<u64, Slot>,
}

/// Hands out tick subscriptions and tracks which are still alive.
#[derive(Debug, Clone, Default)]
pub struct TickSource {
    registry: Rc<RefCell<Registry>>,
}

impl TickSource {
    pub fn new() -> Self {
        Self::default()
    }

    /// Subscribe to a fixed-interval tick starting at `now_ms`.
    ///
    /// An interval of 0 is treated as 1 ms.
    pub fn subscribe(&self, interval_ms: u64, now_ms: u64) -> TickSubscription {
        let interval_ms = interval_ms.max(1);
        let mut registry = self.registry.borrow_mut();
        let id = registry.next_id;
        registry.next_id += 1;
        registry.slots.insert(
            id,
            Slot {
                interval_ms,
                next_due_ms: now_ms + interval_ms,
            },
        );
        trace!(id, interval_ms, "tick subscription acquired");
        TickSubscription {
            id,
            interval_ms,
            registry: Rc::downgrade(&self.registry),
        }
    }

    /// Number of live subscriptions.
    pub fn active_subscriptions(&self) -> usize {
        self.registry.borrow().slots.len()
    }
}

/// Guard for one subscription. Released on drop.
#[derive(Debug)]
pub struct TickSubscription {
    id: u64,
    interval_ms: u64,
    registry: Weak<RefCell<Registry>>,
}

impl TickSubscription {
    pub fn interval_ms(&self) -> u64 {
        self.interval_ms
    }

    /// Timestamps of every tick that fell due up to `now_ms`, oldest first.
    ///
    /// Each tick is handed out once. Returns nothing if the source is gone.
    pub fn due(&self, now_ms: u64) -> DueTicks {
        let Some(registry) = self.registry.upgrade() else {
            return DueTicks::empty();
        };
        let mut registry = registry.borrow_mut();
        let Some(slot) = registry.slots.get_mut(&self.id) else {
            return DueTicks::empty();
        };
        if now_ms < slot.next_due_ms {
            return DueTicks::empty();
        }
        let count = (now_ms - slot.next_due_ms) / slot.interval_ms + 1;
        let first = slot.next_due_ms;
        slot.next_due_ms += count * slot.interval_ms;
        DueTicks {
            next: first,
            remaining: count,
            interval_ms: slot.interval_ms,
        }
    }
}

impl Drop for TickSubscription {
    fn drop(&mut self) {
        if let Some(registry) = self.registry.upgrade() {
            registry.borrow_mut().slots.remove(&self.id);
            trace!(id = self.id, "tick subscription released");
        }
    }
}

/// Iterator over due tick timestamps.
#[derive(Debug, Clone)]
pub struct DueTicks {
    next: u64,
    remaining: u64,
    interval_ms: u64,
}

impl DueTicks {
    fn empty() -> Self {
        Self {
            next: 0,
            remaining: 0,
            interval_ms: 1,
        }
    }
}

impl Iterator for DueTicks {
    type Item = u64;

    fn next(&mut self) -> Option<u64> {
        if self.remaining == 0 {
            return None;
        }
        let at = self.next;
        self.next += self.interval_ms;
        self.remaining -= 1;
        Some(at)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let n = usize::try_from(self.remaining).unwrap_or(usize::MAX);
        (n, Some(n))
    }
}
