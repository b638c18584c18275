//! Device monitor demo.
//!
//! Simulates the classic device bring-up pipeline as declarative wiring:
//! WiFi connects → mDNS lookup resolves the broker → MQTT connects, with
//! failure branches publishing error events instead.
//!
//! What it shows:
//! - Installing flows with `FlowGraph::when`
//! - `async_blocking` for a fire-and-forget lookup
//! - `async_blocking_with_event` when the worker needs the trigger payload
//! - The `LogListener` catch-all printer
//!
//! Run with:
//! `cargo run --example device_monitor --features logging`

use std::time::Duration;

use eventflow::flows::{publish, seq, tap};
use eventflow::{
    Bus, BusConfig, Event, FlowGraph, LogListener, Payload, Topic, WorkerResult,
};

const WIFI_CONNECTED: Topic = 0;
const MDNS_FOUND: Topic = 2;
const MDNS_FAILED: Topic = 3;
const MQTT_CONNECTED: Topic = 4;
const MQTT_DISCONNECTED: Topic = 5;
const SYSTEM_ERROR: Topic = 13;

/// Pretend mDNS query: blocks briefly, then "finds" the broker.
fn mdns_lookup() -> WorkerResult {
    std::thread::sleep(Duration::from_millis(150));
    WorkerResult::Success(Some(Payload::Hostname("10.0.0.161".into())))
}

/// Pretend MQTT connect: needs the hostname the lookup produced.
fn mqtt_connect(trigger: &Event) -> WorkerResult {
    let host = trigger
        .read_payload(|p| p.as_hostname().map(str::to_owned))
        .flatten();
    match host {
        Some(host) => {
            println!("[mqtt] connecting to {host}:1883 ...");
            std::thread::sleep(Duration::from_millis(100));
            WorkerResult::Success(Some(Payload::Connection { host, port: 1883 }))
        }
        None => WorkerResult::Failure(Some(Payload::ErrorCode(6))),
    }
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let bus = Bus::new(BusConfig::default());
    bus.start()?;

    // Print everything that moves on the bus.
    LogListener::attach(&bus)?;

    let graph = FlowGraph::new(&bus)?;

    graph.when(
        WIFI_CONNECTED,
        graph.async_blocking(
            "mdns",
            mdns_lookup,
            publish(MDNS_FOUND, 0),
            publish(MDNS_FAILED, 0),
        ),
    )?;

    graph.when(
        MDNS_FOUND,
        graph.async_blocking_with_event(
            "mqtt",
            mqtt_connect,
            publish(MQTT_CONNECTED, 1),
            seq(publish(MQTT_DISCONNECTED, 0), publish(SYSTEM_ERROR, 6)),
        ),
    )?;

    graph.when(
        MQTT_CONNECTED,
        tap(|_| println!("[app] pipeline complete, device online")),
    )?;

    println!("[app] wifi up, starting discovery");
    bus.publish(Event::new(WIFI_CONNECTED, 0));

    // Let the async stages run out before tearing down.
    tokio::time::sleep(Duration::from_secs(1)).await;
    bus.shutdown();
    Ok(())
}
