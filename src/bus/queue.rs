//! # Bounded dispatch queue with drop-oldest overflow.
//!
//! The queue sits between producers on arbitrary threads and the single
//! dispatcher task. [`DispatchQueue::enqueue`] never blocks: when the queue
//! is full, the oldest event is displaced to make room and its payload is
//! released right there in the enqueue path. Drop-oldest (rather than
//! drop-newest) is deliberate — the newest event usually reflects the
//! freshest state, and stalling on it would wedge every flow downstream.
//!
//! ## Rules
//! - Single consumer: only the dispatcher calls [`DispatchQueue::recv`].
//! - Displaced events are released before any later event is delivered.
//! - Producers are woken-free: enqueue takes one short lock and one notify.

use std::collections::VecDeque;
use std::sync::atomic::{AtomicU64, Ordering};

use parking_lot::Mutex;
use tokio::sync::Notify;

use crate::events::Event;

/// Point-in-time queue counters, for monitoring and tests.
#[derive(Clone, Copy, Debug)]
pub struct QueueStats {
    /// Events currently waiting for the dispatcher.
    pub depth: usize,
    /// Fixed capacity.
    pub capacity: usize,
    /// Total events displaced by drop-oldest since construction.
    pub dropped: u64,
}

/// Bounded FIFO of [`Event`]s between producers and the dispatcher.
pub(crate) struct DispatchQueue {
    events: Mutex<VecDeque<Event>>,
    capacity: usize,
    notify: Notify,
    dropped: AtomicU64,
}

impl DispatchQueue {
    pub(crate) fn new(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            events: Mutex::new(VecDeque::with_capacity(capacity)),
            capacity,
            notify: Notify::new(),
            dropped: AtomicU64::new(0),
        }
    }

    /// Adds an event, displacing the oldest one when full. Never blocks.
    ///
    /// Safe to call from any thread, inside or outside the runtime.
    pub(crate) fn enqueue(&self, event: Event) {
        let displaced = {
            let mut q = self.events.lock();
            let displaced = if q.len() == self.capacity {
                q.pop_front()
            } else {
                None
            };
            q.push_back(event);
            displaced
        };
        if displaced.is_some() {
            self.dropped.fetch_add(1, Ordering::Relaxed);
        }
        // The displaced event is already unreachable to the dispatcher;
        // dropping it here runs the payload release outside the lock.
        drop(displaced);
        self.notify.notify_one();
    }

    /// Waits for the next event. Single-consumer.
    pub(crate) async fn recv(&self) -> Event {
        loop {
            if let Some(ev) = self.events.lock().pop_front() {
                return ev;
            }
            self.notify.notified().await;
        }
    }

    pub(crate) fn stats(&self) -> QueueStats {
        QueueStats {
            depth: self.events.lock().len(),
            capacity: self.capacity,
            dropped: self.dropped.load(Ordering::Relaxed),
        }
    }
}
