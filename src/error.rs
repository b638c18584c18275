//! # Error types for the bus and flow layers.
//!
//! [`BusError`] covers the only failures that surface to callers —
//! dispatcher startup problems and listener-table exhaustion. Everything
//! else in the system is policy (queue overflow) or data (worker failure),
//! and never raises.
//!
//! `as_label` gives a short stable snake_case tag for logs and metrics.

use thiserror::Error;

/// Errors raised by bus setup and subscription.
#[non_exhaustive]
#[derive(Error, Debug)]
pub enum BusError {
    /// Every listener slot is taken; the table never grows.
    #[error("listener table full ({capacity} slots)")]
    RegistryFull {
        /// Configured table capacity.
        capacity: usize,
    },

    /// The dispatcher task is already running for this bus.
    #[error("dispatcher already started")]
    AlreadyStarted,

    /// `start` was called outside a tokio runtime.
    #[error("no tokio runtime available to start the dispatcher")]
    NoRuntime,
}

impl BusError {
    /// Returns a short stable label (snake_case) for use in logs/metrics.
    pub fn as_label(&self) -> &'static str {
        match self {
            BusError::RegistryFull { .. } => "bus_registry_full",
            BusError::AlreadyStarted => "bus_already_started",
            BusError::NoRuntime => "bus_no_runtime",
        }
    }
}
