//! # LogListener — simple event printer
//!
//! A minimal catch-all listener that prints every event to stdout.
//! Use it for tests or demos.
//!
//! ## Example output
//! ```text
//! [evt] topic=0 scalar=0
//! [evt] topic=31 scalar=1 payload=AsyncResult(..)
//! [evt] topic=2 scalar=0 payload=Hostname("10.0.0.161")
//! [evt] topic=4 scalar=1
//! ```

use crate::bus::{Bus, ListenerHandle};
use crate::error::BusError;
use crate::events::MASK_ALL;

/// Catch-all printing listener.
pub struct LogListener;

impl LogListener {
    /// Subscribes the printer to every topic on `bus`.
    pub fn attach(bus: &Bus) -> Result<ListenerHandle, BusError> {
        bus.subscribe(MASK_ALL, |e| {
            match e.read_payload(|p| format!("{p:?}")) {
                Some(payload) => {
                    println!("[evt] topic={} scalar={} payload={payload}", e.topic, e.scalar);
                }
                None => println!("[evt] topic={} scalar={}", e.topic, e.scalar),
            }
        })
    }
}
