//! # Fixed-capacity listener table.
//!
//! Subscriptions live in a slot array sized at construction. The slot index
//! doubles as the [`ListenerHandle`]; subscribe takes the lowest free slot,
//! unsubscribe clears it, and fan-out walks the slots in index order — which
//! is what makes delivery order across listeners stable and lets a logging
//! listener run deterministically before or after an executing one.
//!
//! Fan-out never runs user code under the table lock: matching listeners
//! are snapshotted (cheap `Arc` clones) and invoked afterwards, so handlers
//! may freely publish, subscribe, or unsubscribe while a fan-out is in
//! progress, and table mutation is atomic with respect to it.

use std::sync::Arc;

use parking_lot::Mutex;

use crate::error::BusError;
use crate::events::{bit, Event, Topic, TopicMask, FAST_TOPICS, MASK_ALL};

/// Listener callback. Runs on whichever thread performs the fan-out.
pub type HandlerFn = Arc<dyn Fn(&Event) + Send + Sync>;

/// Delivery predicate; the listener receives the event iff this is true.
pub type PredicateFn = Arc<dyn Fn(&Event) -> bool + Send + Sync>;

/// Stable identifier of a subscription, valid until unsubscribed.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct ListenerHandle(pub(crate) usize);

#[derive(Clone)]
pub(crate) struct Listener {
    pub(crate) handler: HandlerFn,
    pub(crate) mask: TopicMask,
    pub(crate) predicate: Option<PredicateFn>,
}

impl Listener {
    /// Mask-level acceptance; predicates are evaluated later, by the
    /// fan-out, outside the table lock.
    fn accepts(&self, topic: Topic) -> bool {
        if topic < FAST_TOPICS {
            self.mask & bit(topic) != 0
        } else {
            self.mask == MASK_ALL || self.predicate.is_some()
        }
    }
}

pub(crate) struct ListenerTable {
    slots: Mutex<Vec<Option<Listener>>>,
}

impl ListenerTable {
    pub(crate) fn new(capacity: usize) -> Self {
        Self {
            slots: Mutex::new(vec![None; capacity.max(1)]),
        }
    }

    /// Installs a listener in the lowest free slot.
    pub(crate) fn subscribe(
        &self,
        mask: TopicMask,
        predicate: Option<PredicateFn>,
        handler: HandlerFn,
    ) -> Result<ListenerHandle, BusError> {
        let mut slots = self.slots.lock();
        match slots.iter_mut().enumerate().find(|(_, s)| s.is_none()) {
            Some((idx, slot)) => {
                *slot = Some(Listener {
                    handler,
                    mask,
                    predicate,
                });
                Ok(ListenerHandle(idx))
            }
            None => Err(BusError::RegistryFull {
                capacity: slots.len(),
            }),
        }
    }

    /// Clears a slot. Unknown or stale handles are ignored.
    pub(crate) fn unsubscribe(&self, handle: ListenerHandle) {
        let mut slots = self.slots.lock();
        if let Some(slot) = slots.get_mut(handle.0) {
            *slot = None;
        }
    }

    /// Snapshot of mask-matching listeners in slot order.
    pub(crate) fn matching(&self, topic: Topic) -> Vec<(usize, Listener)> {
        let slots = self.slots.lock();
        slots
            .iter()
            .enumerate()
            .filter_map(|(idx, slot)| slot.as_ref().map(|l| (idx, l)))
            .filter(|(_, l)| l.accepts(topic))
            .map(|(idx, l)| (idx, l.clone()))
            .collect()
    }

    #[cfg(test)]
    pub(crate) fn occupied(&self) -> usize {
        self.slots.lock().iter().filter(|s| s.is_some()).count()
    }
}
