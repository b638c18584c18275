//! Shared fixtures for the integration suites: the device topic table,
//! an ALL-mask recorder, and drop-accounting payload probes.

// Each test binary compiles its own copy; not all of them use every helper.
#![allow(dead_code)]

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use eventflow::{Bus, Event, Payload, Topic, MASK_ALL};

// Topic table of the device pipeline the flows wire together. The bus only
// reserves ASYNC_RESULT (31); everything else is application protocol.
pub const WIFI_CONNECTED: Topic = 0;
pub const MDNS_FOUND: Topic = 2;
pub const MDNS_FAILED: Topic = 3;
pub const MQTT_CONNECTED: Topic = 4;
pub const MQTT_DISCONNECTED: Topic = 5;
pub const SYSTEM_ERROR: Topic = 13;
pub const TIMER: Topic = 15;

/// One observed delivery: topic, scalar, and the hostname payload if the
/// event carried one (read in place, never claimed).
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Observed {
    pub topic: Topic,
    pub scalar: i32,
    pub hostname: Option<String>,
}

/// ALL-mask subscriber recording every delivery in arrival order.
#[derive(Clone)]
pub struct Recorder {
    seen: Arc<parking_lot::Mutex<Vec<Observed>>>,
}

impl Recorder {
    /// Subscribes the recorder to every topic. Call before installing
    /// flows so the recorder's slot precedes theirs and observation runs
    /// first.
    pub fn attach(bus: &Bus) -> Self {
        Self::attach_masked(bus, MASK_ALL)
    }

    /// Subscribes the recorder with a delivery mask.
    pub fn attach_masked(bus: &Bus, mask: eventflow::TopicMask) -> Self {
        let recorder = Self::detached();
        let sink = recorder.clone();
        bus.subscribe(mask, move |e: &Event| sink.record(e))
            .expect("recorder subscription");
        recorder
    }

    /// A recorder with no subscription; feed it manually via `record`.
    pub fn detached() -> Self {
        Self {
            seen: Arc::new(parking_lot::Mutex::new(Vec::new())),
        }
    }

    /// Records one delivery, reading the payload in place.
    pub fn record(&self, e: &Event) {
        self.seen.lock().push(Observed {
            topic: e.topic,
            scalar: e.scalar,
            hostname: e
                .read_payload(|p| p.as_hostname().map(str::to_owned))
                .flatten(),
        });
    }

    pub fn snapshot(&self) -> Vec<Observed> {
        self.seen.lock().clone()
    }

    pub fn topics(&self) -> Vec<Topic> {
        self.seen.lock().iter().map(|o| o.topic).collect()
    }

    pub fn len(&self) -> usize {
        self.seen.lock().len()
    }

    /// Waits until `n` deliveries have been observed.
    pub async fn wait_len(&self, n: usize) {
        for _ in 0..400 {
            if self.len() >= n {
                return;
            }
            tokio::time::sleep(Duration::from_millis(5)).await;
        }
        panic!(
            "recorder stalled at {} of {n} events: {:?}",
            self.len(),
            self.topics()
        );
    }
}

/// Counter handle observing probe drops.
#[derive(Clone)]
pub struct ReleaseCount(Arc<AtomicUsize>);

impl ReleaseCount {
    pub fn get(&self) -> usize {
        self.0.load(Ordering::SeqCst)
    }

    pub async fn wait_for(&self, n: usize) {
        for _ in 0..400 {
            if self.get() >= n {
                return;
            }
            tokio::time::sleep(Duration::from_millis(5)).await;
        }
        panic!("release count stalled at {} of {n}", self.get());
    }
}

/// Guard whose drop increments a shared counter; its drop is the payload
/// release the tests account for.
pub struct DropProbe(Arc<AtomicUsize>);

impl Drop for DropProbe {
    fn drop(&mut self) {
        self.0.fetch_add(1, Ordering::SeqCst);
    }
}

/// A family of probes sharing one release counter.
pub fn probes() -> (ProbeFactory, ReleaseCount) {
    let counter = Arc::new(AtomicUsize::new(0));
    (ProbeFactory(Arc::clone(&counter)), ReleaseCount(counter))
}

#[derive(Clone)]
pub struct ProbeFactory(Arc<AtomicUsize>);

impl ProbeFactory {
    pub fn payload(&self) -> Payload {
        Payload::opaque(DropProbe(Arc::clone(&self.0)))
    }
}
