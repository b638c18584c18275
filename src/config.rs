//! # Bus configuration.
//!
//! [`BusConfig`] fixes the two capacities of the system: the listener
//! table size and the dispatch queue length. Both are set at construction
//! and never grow; overflow behavior is drop-oldest on the queue and
//! [`RegistryFull`](crate::BusError::RegistryFull) on the table.
//!
//! # Example
//! ```
//! use eventflow::BusConfig;
//!
//! let mut cfg = BusConfig::default();
//! cfg.queue_capacity = 64;
//!
//! assert_eq!(cfg.max_listeners, 16);
//! assert_eq!(cfg.queue_capacity, 64);
//! ```

/// Capacities for a [`Bus`](crate::Bus).
#[derive(Clone, Copy, Debug)]
pub struct BusConfig {
    /// Number of listener slots in the subscription table.
    pub max_listeners: usize,
    /// Dispatch queue length before drop-oldest kicks in.
    pub queue_capacity: usize,
}

impl Default for BusConfig {
    /// Provides a default configuration:
    /// - `max_listeners = 16`
    /// - `queue_capacity = 32`
    fn default() -> Self {
        Self {
            max_listeners: 16,
            queue_capacity: 32,
        }
    }
}
