//! Bus runtime: listener table, dispatch queue, and the dispatcher task.
//!
//! ## Contents
//! - [`Bus`] — cloneable handle; publish paths, subscriptions, lifecycle
//! - [`ListenerHandle`], [`HandlerFn`], [`PredicateFn`] — subscription types
//! - [`QueueStats`] — dispatch queue observability
//!
//! ## Quick reference
//! - **Producers**: any thread via [`Bus::publish_queued`]; runtime
//!   contexts may also fan out inline via [`Bus::publish`].
//! - **Consumer**: the single dispatcher task spawned by [`Bus::start`].

#[allow(clippy::module_inception)]
mod bus;
mod queue;
mod registry;

pub use bus::Bus;
pub use queue::QueueStats;
pub use registry::{HandlerFn, ListenerHandle, PredicateFn};
