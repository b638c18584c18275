//! # The event bus.
//!
//! [`Bus`] is a cheaply cloneable handle over shared state: the listener
//! table, the bounded dispatch queue, and the dispatcher task's lifecycle.
//!
//! Two publish paths exist:
//! - [`Bus::publish`] fans out synchronously on the calling thread; every
//!   matching listener has run by the time it returns. Listeners may
//!   publish further events (recursive fan-out) and may mutate the table.
//! - [`Bus::publish_queued`] enqueues without blocking, from any thread —
//!   the interrupt-context path of the original design. The dispatcher
//!   task drains the queue and performs the same fan-out.
//!
//! ## Architecture
//! ```text
//! producers ── publish() ───────────► fan-out (caller thread)
//! producers ── publish_queued() ──► [queue] ──► dispatcher task ──► fan-out
//!                                 drop-oldest       │
//!                                 + release         └─► event dropped,
//!                                                       payload released
//! ```
//!
//! ## Rules
//! - Fan-out order is slot order; see [`registry`](super::registry).
//! - The dispatcher isolates listener panics; task-context publish lets
//!   them propagate to the caller.
//! - One dispatcher per bus; [`Bus::start`] twice is an error.

use std::future::Future;
use std::panic::{catch_unwind, AssertUnwindSafe};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, OnceLock};

use tokio::runtime::Handle;
use tokio_util::sync::CancellationToken;

use crate::config::BusConfig;
use crate::error::BusError;
use crate::events::{Event, TopicMask};

use super::queue::{DispatchQueue, QueueStats};
use super::registry::{HandlerFn, ListenerHandle, ListenerTable, PredicateFn};

/// Shared-handle event bus with a bounded dispatch queue.
#[derive(Clone)]
pub struct Bus {
    inner: Arc<BusInner>,
}

struct BusInner {
    table: ListenerTable,
    queue: DispatchQueue,
    started: AtomicBool,
    cancel: CancellationToken,
    runtime: OnceLock<Handle>,
}

impl Bus {
    /// Creates a bus with the given capacities. Nothing runs until
    /// [`Bus::start`].
    pub fn new(cfg: BusConfig) -> Self {
        Self {
            inner: Arc::new(BusInner {
                table: ListenerTable::new(cfg.max_listeners),
                queue: DispatchQueue::new(cfg.queue_capacity),
                started: AtomicBool::new(false),
                cancel: CancellationToken::new(),
                runtime: OnceLock::new(),
            }),
        }
    }

    /// Spawns the dispatcher task on the current tokio runtime.
    ///
    /// Must be called from within a runtime. The handle is retained so
    /// async flows can spawn workers from any thread afterwards.
    pub fn start(&self) -> Result<(), BusError> {
        let handle = Handle::try_current().map_err(|_| BusError::NoRuntime)?;
        if self.inner.started.swap(true, Ordering::SeqCst) {
            return Err(BusError::AlreadyStarted);
        }
        let _ = self.inner.runtime.set(handle.clone());

        let bus = self.clone();
        handle.spawn(async move {
            loop {
                tokio::select! {
                    _ = bus.inner.cancel.cancelled() => break,
                    ev = bus.inner.queue.recv() => {
                        bus.deliver_isolated(&ev);
                        // `ev` drops here: unclaimed payload released at
                        // end of delivery.
                    }
                }
            }
        });
        Ok(())
    }

    /// Stops the dispatcher task. Queued events are released when the last
    /// bus handle is dropped.
    pub fn shutdown(&self) {
        self.inner.cancel.cancel();
    }

    /// Installs a listener filtered by `mask`.
    pub fn subscribe<F>(&self, mask: TopicMask, handler: F) -> Result<ListenerHandle, BusError>
    where
        F: Fn(&Event) + Send + Sync + 'static,
    {
        self.inner
            .table
            .subscribe(mask, None, Arc::new(handler) as HandlerFn)
    }

    /// Installs a listener gated by `mask` and a predicate.
    ///
    /// The predicate also opts the listener into topics `>= 32`, which the
    /// mask cannot express.
    pub fn subscribe_filtered<P, F>(
        &self,
        mask: TopicMask,
        predicate: P,
        handler: F,
    ) -> Result<ListenerHandle, BusError>
    where
        P: Fn(&Event) -> bool + Send + Sync + 'static,
        F: Fn(&Event) + Send + Sync + 'static,
    {
        self.inner.table.subscribe(
            mask,
            Some(Arc::new(predicate) as PredicateFn),
            Arc::new(handler) as HandlerFn,
        )
    }

    /// Removes a listener. Unknown or stale handles are ignored.
    pub fn unsubscribe(&self, handle: ListenerHandle) {
        self.inner.table.unsubscribe(handle);
    }

    /// Synchronous fan-out on the calling thread.
    ///
    /// All matching listeners have completed when this returns; the
    /// event's unclaimed payload is released on return.
    pub fn publish(&self, event: Event) {
        self.deliver(&event);
    }

    /// Non-blocking enqueue for the dispatcher task, callable from any
    /// thread. When the queue is full the oldest event is displaced and
    /// its payload released before the new event is admitted.
    pub fn publish_queued(&self, event: Event) {
        self.inner.queue.enqueue(event);
    }

    /// Queue depth, capacity, and drop-oldest count.
    pub fn queue_stats(&self) -> QueueStats {
        self.inner.queue.stats()
    }

    fn deliver(&self, event: &Event) {
        for (_, l) in self.inner.table.matching(event.topic) {
            if l.predicate.as_ref().map_or(true, |p| p(event)) {
                (l.handler)(event);
            }
        }
    }

    /// Dispatcher-side fan-out: one panicking listener must not take down
    /// the dispatch loop or starve the listeners after it.
    fn deliver_isolated(&self, event: &Event) {
        for (slot, l) in self.inner.table.matching(event.topic) {
            let outcome = catch_unwind(AssertUnwindSafe(|| {
                if l.predicate.as_ref().map_or(true, |p| p(event)) {
                    (l.handler)(event);
                }
            }));
            if outcome.is_err() {
                eprintln!(
                    "[eventflow] listener {slot} panicked while handling topic {}",
                    event.topic
                );
            }
        }
    }

    /// Spawns a future on the runtime captured at [`Bus::start`], falling
    /// back to the caller's runtime context.
    pub(crate) fn spawn(&self, fut: impl Future<Output = ()> + Send + 'static) {
        match self.inner.runtime.get() {
            Some(handle) => {
                handle.spawn(fut);
            }
            None => {
                tokio::spawn(fut);
            }
        }
    }
}
