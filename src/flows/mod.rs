//! Declarative flow layer: combinators, the flow graph, and the async
//! continuation machinery.
//!
//! ## Contents
//! - [`Flow`] and the combinators [`publish`], [`publish_with`], [`seq`],
//!   [`tee`], [`filter`], [`branch`], [`tap`]
//! - [`FlowGraph`] — owns installed flows; `when`, `async_blocking`,
//!   `async_blocking_with_event`, and the internal result router
//! - [`WorkerResult`], [`ResultPack`] — the worker contract and the
//!   routing payload it travels in
//!
//! ## Example
//! ```no_run
//! use eventflow::flows::publish;
//! use eventflow::{Bus, BusConfig, Event, FlowGraph, Payload, WorkerResult};
//!
//! const WIFI_CONNECTED: u16 = 0;
//! const MDNS_FOUND: u16 = 2;
//! const MDNS_FAILED: u16 = 3;
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
//!             publish(MDNS_FAILED, 0),
//!         ),
//!     )?;
//!
//!     bus.publish(Event::new(WIFI_CONNECTED, 0));
//!     Ok(())
//! }
//! ```

mod flow;
mod graph;
mod worker;

pub use flow::{branch, filter, publish, publish_with, seq, tap, tee, Flow};
pub use graph::FlowGraph;
pub use worker::{ResultPack, WorkerResult};
