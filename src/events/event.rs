//! # The event record.
//!
//! An [`Event`] carries a [`Topic`], a small inline scalar for codes,
//! counts, or pin numbers, and an optional owned [`Payload`].
//!
//! Events are move-only. While an event is being delivered, every listener
//! sees the same `&Event`; the payload sits in a claimable cell so that one
//! listener (or flow) can take ownership with [`Event::take_payload`]. The
//! first claim wins, later claims see `None`, and whoever holds the payload
//! when it goes out of scope runs its release by dropping it. An unclaimed
//! payload is released when the event itself is dropped, which happens at
//! the end of delivery, or in the queue's drop-oldest path.

use std::fmt;

use parking_lot::Mutex;

use super::payload::Payload;
use super::topic::Topic;

/// A bus event: topic id, inline scalar, optional owned payload.
pub struct Event {
    /// Channel identifier. Topics `0..32` are mask-filterable.
    pub topic: Topic,
    /// Inline scratch value (status code, count, pin number).
    pub scalar: i32,
    /// Claimable payload slot.
    payload: Mutex<Option<Payload>>,
}

impl Event {
    /// Creates an event without a payload.
    pub fn new(topic: Topic, scalar: i32) -> Self {
        Self {
            topic,
            scalar,
            payload: Mutex::new(None),
        }
    }

    /// Attaches a payload.
    pub fn with_payload(self, payload: Payload) -> Self {
        *self.payload.lock() = Some(payload);
        self
    }

    /// Claims the payload, transferring the release obligation to the
    /// caller. Subsequent claims (and the event's own drop) see nothing.
    pub fn take_payload(&self) -> Option<Payload> {
        self.payload.lock().take()
    }

    /// Reads the payload in place without claiming it.
    ///
    /// Returns `None` if the payload is absent or already claimed.
    pub fn read_payload<R>(&self, f: impl FnOnce(&Payload) -> R) -> Option<R> {
        self.payload.lock().as_ref().map(f)
    }

    /// Releases the payload immediately, ahead of the event's own drop.
    /// A no-op when the payload is absent or already claimed.
    pub fn release_payload(&self) {
        drop(self.take_payload());
    }

    /// True while an unclaimed payload is present.
    pub fn has_payload(&self) -> bool {
        self.payload.lock().is_some()
    }
}

impl fmt::Debug for Event {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Event")
            .field("topic", &self.topic)
            .field("scalar", &self.scalar)
            .field("payload", &*self.payload.lock())
            .finish()
    }
}
