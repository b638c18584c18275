//! # eventflow
//!
//! **Eventflow** is a small embedded-style event bus with a declarative
//! flow combinator layer on top.
//!
//! It lets an application express reactive, multi-stage I/O pipelines —
//! "when event E happens, run worker W off the dispatch thread; on success
//! publish S with the worker's payload, on failure publish F" — as short
//! declarative wiring instead of hand-rolled callback state machines.
//!
//! ## Features
//!
//! | Area | Description | Key types |
//! |------|-------------|-----------|
//! | **Events**  | Topic + scalar + owned payload, released exactly once.     | [`Event`], [`Payload`], [`Topic`]      |
//! | **Bus**     | Fixed listener table, mask/predicate filtering, bounded drop-oldest queue, single dispatcher task. | [`Bus`], [`BusConfig`], [`QueueStats`] |
//! | **Flows**   | Composable steps: publish, seq, filter, branch, tap.       | [`Flow`], [`flows`]                    |
//! | **Async**   | Blocking workers resumed on the dispatcher with ok/err branches. | [`FlowGraph`], [`WorkerResult`]  |
//! | **Errors**  | Typed setup errors with stable labels.                     | [`BusError`]                           |
//!
//! ## Optional features
//! - `logging`: exports [`LogListener`], a catch-all println listener
//!   _(demo/reference only)_.
//!
//! ```no_run
//! use eventflow::flows::{publish, seq};
//! use eventflow::{Bus, BusConfig, Event, FlowGraph, Payload, WorkerResult};
//!
//! const WIFI_CONNECTED: u16 = 0;
//! const MDNS_FOUND: u16 = 2;
//! const MDNS_FAILED: u16 = 3;
//! const SYSTEM_ERROR: u16 = 13;
//!
//! #[tokio::main(flavor = "current_thread")]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let bus = Bus::new(BusConfig::default());
//!     bus.start()?;
//!
//!     let graph = FlowGraph::new(&bus)?;
//!     graph.when(
//!         WIFI_CONNECTED,
//!         graph.async_blocking(
//!             "mdns",
//!             || WorkerResult::Success(Some(Payload::Hostname("10.0.0.161".into()))),
//!             publish(MDNS_FOUND, 0),
//!             seq(publish(MDNS_FAILED, 0), publish(SYSTEM_ERROR, 6)),
//!         ),
//!     )?;
//!
//!     bus.publish(Event::new(WIFI_CONNECTED, 0));
//!     Ok(())
//! }
//! ```
//!
//! ---

mod bus;
mod config;
mod error;
mod events;
pub mod flows;

#[cfg(feature = "logging")]
mod listeners;

// ---- Public re-exports ----

pub use bus::{Bus, HandlerFn, ListenerHandle, PredicateFn, QueueStats};
pub use config::BusConfig;
pub use error::BusError;
pub use events::{
    bit, Event, OpaquePayload, Payload, Topic, TopicMask, ASYNC_RESULT, FAST_TOPICS, MASK_ALL,
};
pub use flows::{Flow, FlowGraph, WorkerResult};

// Optional: expose a simple built-in catch-all printer (demo/reference).
// Enable with: `--features logging`
#[cfg(feature = "logging")]
pub use listeners::LogListener;
