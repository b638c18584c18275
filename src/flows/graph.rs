//! # FlowGraph: installed flows and async continuation routing.
//!
//! A [`FlowGraph`] owns the flows it installs: [`FlowGraph::when`]
//! subscribes a flow to a topic and keeps the handle so that dropping the
//! graph tears every subscription down again. The graph also owns the one
//! internal listener on [`ASYNC_RESULT`] that resumes async flows.
//!
//! ## Async continuation protocol
//! ```text
//! trigger ──► async_blocking flow ──► spawn worker (blocking pool)
//!                                          │ WorkerResult
//!                                          ▼
//!                 ASYNC_RESULT event ◄── publish_queued (worker side)
//!                        │
//!                        ▼ dispatcher task
//!                router claims ResultPack
//!                        │ builds shadow event (trigger seed + output)
//!                        ▼
//!                on_ok(shadow) / on_err(shadow)
//! ```
//!
//! The result always travels the queued path, so continuations run on the
//! dispatcher task — never on the worker — and may publish freely.
//!
//! ## Rules
//! - All async workers must have completed before the graph is dropped;
//!   a result arriving after teardown finds no router and its pack is
//!   released unrun by normal event destruction.
//! - User code must not publish on [`ASYNC_RESULT`].

use parking_lot::Mutex;
use std::sync::Arc;
use tokio::task;

use crate::bus::{Bus, ListenerHandle};
use crate::error::BusError;
use crate::events::{bit, Event, Payload, Topic, ASYNC_RESULT, FAST_TOPICS};

use super::flow::Flow;
use super::worker::{AsyncContext, ResultPack, WorkerResult};

/// Owner of installed flow subscriptions and the async-result router.
pub struct FlowGraph {
    bus: Bus,
    router: ListenerHandle,
    subs: Mutex<Vec<ListenerHandle>>,
}

impl FlowGraph {
    /// Creates a graph on `bus` and installs its continuation router.
    pub fn new(bus: &Bus) -> Result<Self, BusError> {
        let router_bus = bus.clone();
        let router = bus.subscribe(bit(ASYNC_RESULT), move |e| Self::route(e, &router_bus))?;
        Ok(Self {
            bus: bus.clone(),
            router,
            subs: Mutex::new(Vec::new()),
        })
    }

    /// Installs `flow` as a subscriber of `topic`.
    ///
    /// Fast topics filter by mask bit; topics `>= 32` are matched by an
    /// exact-topic predicate. The graph keeps the handle and releases the
    /// subscription (and the flow stored in it) on drop.
    pub fn when(&self, topic: Topic, flow: Flow) -> Result<ListenerHandle, BusError> {
        let bus = self.bus.clone();
        let handler = move |e: &Event| flow(e, &bus);
        let handle = if topic < FAST_TOPICS {
            self.bus.subscribe(bit(topic), handler)?
        } else {
            self.bus
                .subscribe_filtered(0, move |e: &Event| e.topic == topic, handler)?
        };
        self.subs.lock().push(handle);
        Ok(handle)
    }

    /// Builds a flow that runs `worker` on the blocking pool and resumes
    /// with `on_ok` or `on_err` on the dispatcher task.
    ///
    /// The shadow event handed to the chosen branch carries the trigger's
    /// topic and scalar with the worker's payload. `name` is used in
    /// diagnostics only.
    pub fn async_blocking<W>(
        &self,
        name: &'static str,
        worker: W,
        on_ok: Flow,
        on_err: Flow,
    ) -> Flow
    where
        W: Fn() -> WorkerResult + Send + Sync + 'static,
    {
        let bus = self.bus.clone();
        let worker = Arc::new(worker);
        Arc::new(move |trigger, _| {
            let ctx = AsyncContext {
                on_ok: Arc::clone(&on_ok),
                on_err: Arc::clone(&on_err),
                topic: trigger.topic,
                scalar: trigger.scalar,
            };
            let worker = Arc::clone(&worker);
            let bus = bus.clone();
            bus.clone().spawn(async move {
                match task::spawn_blocking(move || worker()).await {
                    Ok(verdict) => post_result(&bus, verdict, ctx),
                    Err(err) => abandon(name, err),
                }
            });
        })
    }

    /// [`FlowGraph::async_blocking`], but the worker receives the trigger
    /// event — topic, scalar, and claimed payload — for workers whose
    /// behavior depends on it (connecting to the hostname an earlier
    /// lookup produced).
    pub fn async_blocking_with_event<W>(
        &self,
        name: &'static str,
        worker: W,
        on_ok: Flow,
        on_err: Flow,
    ) -> Flow
    where
        W: Fn(&Event) -> WorkerResult + Send + Sync + 'static,
    {
        let bus = self.bus.clone();
        let worker = Arc::new(worker);
        Arc::new(move |trigger, _| {
            let ctx = AsyncContext {
                on_ok: Arc::clone(&on_ok),
                on_err: Arc::clone(&on_err),
                topic: trigger.topic,
                scalar: trigger.scalar,
            };
            let mut input = Event::new(trigger.topic, trigger.scalar);
            if let Some(p) = trigger.take_payload() {
                input = input.with_payload(p);
            }
            let worker = Arc::clone(&worker);
            let bus = bus.clone();
            bus.clone().spawn(async move {
                match task::spawn_blocking(move || worker(&input)).await {
                    Ok(verdict) => post_result(&bus, verdict, ctx),
                    Err(err) => abandon(name, err),
                }
            });
        })
    }

    /// The `ASYNC_RESULT` listener: claims the pack, rebuilds the shadow
    /// event, and invokes exactly one branch.
    ///
    /// With several graphs on one bus, every router receives the event but
    /// only the first claims the pack; the pack is self-contained, so any
    /// router routes any graph's continuation correctly.
    fn route(event: &Event, bus: &Bus) {
        let Some(payload) = event.take_payload() else {
            return;
        };
        let pack = match payload {
            Payload::AsyncResult(pack) => pack,
            other => {
                eprintln!("[eventflow] unexpected payload on the async-result topic: {other:?}");
                return;
            }
        };

        let ResultPack { output, ctx } = pack;
        let mut shadow = Event::new(ctx.topic, ctx.scalar);
        if let Some(p) = output {
            shadow = shadow.with_payload(*p);
        }
        let branch = if event.scalar == 1 { ctx.on_ok } else { ctx.on_err };
        branch(&shadow, bus);
        // Shadow drops here: an unclaimed worker payload is released once
        // the continuation returns.
    }
}

impl Drop for FlowGraph {
    fn drop(&mut self) {
        self.bus.unsubscribe(self.router);
        for handle in self.subs.lock().drain(..) {
            self.bus.unsubscribe(handle);
        }
    }
}

/// Posts the worker outcome on the reserved topic, through the queue so
/// the router runs on the dispatcher task.
fn post_result(bus: &Bus, verdict: WorkerResult, ctx: AsyncContext) {
    let (ok, output) = verdict.into_parts();
    let pack = ResultPack {
        output: output.map(Box::new),
        ctx,
    };
    bus.publish_queued(
        Event::new(ASYNC_RESULT, ok as i32).with_payload(Payload::AsyncResult(pack)),
    );
}

/// Worker task never reported back: panic is fatal to the flow invocation
/// and resurfaced; cancellation (runtime teardown) drops the continuation.
fn abandon(name: &'static str, err: task::JoinError) {
    if err.is_panic() {
        eprintln!("[eventflow] worker '{name}' panicked; its continuation will not run");
        std::panic::resume_unwind(err.into_panic());
    }
    eprintln!("[eventflow] worker '{name}' cancelled; its continuation will not run");
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::time::Duration;

    use super::super::flow::{publish, tap};
    use super::*;
    use crate::config::BusConfig;

    async fn settle(check: impl Fn() -> bool) {
        for _ in 0..400 {
            if check() {
                return;
            }
            tokio::time::sleep(Duration::from_millis(5)).await;
        }
        panic!("condition not reached in time");
    }

    fn started_bus() -> Bus {
        let bus = Bus::new(BusConfig::default());
        bus.start().unwrap();
        bus
    }

    #[tokio::test]
    async fn when_fires_flow_on_matching_topic_only() {
        let bus = started_bus();
        let graph = FlowGraph::new(&bus).unwrap();
        let hits = Arc::new(AtomicUsize::new(0));
        let hits2 = Arc::clone(&hits);
        graph
            .when(
                4,
                tap(move |_| {
                    hits2.fetch_add(1, Ordering::SeqCst);
                }),
            )
            .unwrap();

        bus.publish(Event::new(4, 0));
        bus.publish(Event::new(5, 0));
        assert_eq!(hits.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn when_matches_slow_topics_exactly() {
        let bus = started_bus();
        let graph = FlowGraph::new(&bus).unwrap();
        let hits = Arc::new(AtomicUsize::new(0));
        let hits2 = Arc::clone(&hits);
        graph
            .when(
                2001,
                tap(move |_| {
                    hits2.fetch_add(1, Ordering::SeqCst);
                }),
            )
            .unwrap();

        bus.publish(Event::new(2001, 0));
        bus.publish(Event::new(2002, 0));
        assert_eq!(hits.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn success_routes_ok_branch_with_worker_payload() {
        let bus = started_bus();
        let graph = FlowGraph::new(&bus).unwrap();

        let seen = Arc::new(parking_lot::Mutex::new(Vec::new()));
        let sink = Arc::clone(&seen);
        bus.subscribe(bit(7), move |e| {
            sink.lock()
                .push((e.scalar, e.read_payload(|p| p.as_hostname().map(str::to_owned))));
        })
        .unwrap();

        graph
            .when(
                1,
                graph.async_blocking(
                    "lookup",
                    || WorkerResult::Success(Some(Payload::Hostname("10.0.0.161".into()))),
                    publish(7, 1),
                    publish(8, 0),
                ),
            )
            .unwrap();

        bus.publish(Event::new(1, 0));
        settle(|| !seen.lock().is_empty()).await;
        assert_eq!(
            *seen.lock(),
            vec![(1, Some(Some("10.0.0.161".to_owned())))]
        );
    }

    #[tokio::test]
    async fn failure_routes_err_branch_only() {
        let bus = started_bus();
        let graph = FlowGraph::new(&bus).unwrap();

        let ok_hits = Arc::new(AtomicUsize::new(0));
        let err_hits = Arc::new(AtomicUsize::new(0));
        let ok2 = Arc::clone(&ok_hits);
        let err2 = Arc::clone(&err_hits);
        bus.subscribe(bit(7), move |_| {
            ok2.fetch_add(1, Ordering::SeqCst);
        })
        .unwrap();
        bus.subscribe(bit(8), move |_| {
            err2.fetch_add(1, Ordering::SeqCst);
        })
        .unwrap();

        graph
            .when(
                1,
                graph.async_blocking(
                    "lookup",
                    || WorkerResult::Failure(None),
                    publish(7, 1),
                    publish(8, 0),
                ),
            )
            .unwrap();

        bus.publish(Event::new(1, 0));
        settle(|| err_hits.load(Ordering::SeqCst) == 1).await;
        assert_eq!(ok_hits.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn with_event_worker_sees_trigger_payload() {
        let bus = started_bus();
        let graph = FlowGraph::new(&bus).unwrap();

        let done = Arc::new(AtomicUsize::new(0));
        let done2 = Arc::clone(&done);
        bus.subscribe(bit(7), move |_| {
            done2.fetch_add(1, Ordering::SeqCst);
        })
        .unwrap();

        graph
            .when(
                2,
                graph.async_blocking_with_event(
                    "connect",
                    |trigger: &Event| {
                        let host = trigger
                            .read_payload(|p| p.as_hostname().map(str::to_owned))
                            .flatten();
                        match host.as_deref() {
                            Some("10.0.0.161") => WorkerResult::Success(None),
                            _ => WorkerResult::Failure(None),
                        }
                    },
                    publish(7, 1),
                    publish(8, 0),
                ),
            )
            .unwrap();

        bus.publish(Event::new(2, 0).with_payload(Payload::Hostname("10.0.0.161".into())));
        settle(|| done.load(Ordering::SeqCst) == 1).await;
    }

    #[tokio::test]
    async fn drop_unsubscribes_everything() {
        let bus = Bus::new(BusConfig {
            max_listeners: 2,
            ..BusConfig::default()
        });
        bus.start().unwrap();
        let hits = Arc::new(AtomicUsize::new(0));

        {
            // Router + one flow fill the two-slot table completely.
            let graph = FlowGraph::new(&bus).unwrap();
            let hits2 = Arc::clone(&hits);
            graph
                .when(
                    3,
                    tap(move |_| {
                        hits2.fetch_add(1, Ordering::SeqCst);
                    }),
                )
                .unwrap();
            bus.publish(Event::new(3, 0));
            assert_eq!(hits.load(Ordering::SeqCst), 1);
        }

        bus.publish(Event::new(3, 0));
        assert_eq!(hits.load(Ordering::SeqCst), 1, "flow fired after teardown");

        // Both slots are free again: a fresh graph plus flow fits.
        let replacement = FlowGraph::new(&bus).unwrap();
        replacement.when(3, tap(|_| {})).unwrap();
    }
}
