//! Queued producers demo.
//!
//! Shows the interrupt-context publish path: plain OS threads burst
//! sensor readings into the bounded queue faster than the dispatcher
//! drains them, and the drop-oldest policy keeps the freshest readings.
//!
//! Run with:
//! `cargo run --example queued_producers`

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use eventflow::{Bus, BusConfig, Event, Topic};

const SENSOR_READING: Topic = 15;

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let bus = Bus::new(BusConfig {
        queue_capacity: 16,
        ..BusConfig::default()
    });

    let delivered = Arc::new(AtomicUsize::new(0));
    let count = Arc::clone(&delivered);
    bus.subscribe(eventflow::bit(SENSOR_READING), move |e| {
        println!("[sink] reading #{}", e.scalar);
        count.fetch_add(1, Ordering::SeqCst);
    })?;

    // Burst 3×16 readings from foreign threads before the dispatcher runs,
    // the way an ISR outpaces a busy main loop.
    let mut producers = Vec::new();
    for p in 0..3 {
        let bus = bus.clone();
        producers.push(std::thread::spawn(move || {
            for i in 0..16 {
                bus.publish_queued(Event::new(SENSOR_READING, p * 16 + i));
            }
        }));
    }
    for handle in producers {
        handle.join().expect("producer thread");
    }

    let stats = bus.queue_stats();
    println!(
        "[app] queued={} capacity={} dropped={}",
        stats.depth, stats.capacity, stats.dropped
    );

    bus.start()?;
    tokio::time::sleep(Duration::from_millis(200)).await;

    println!(
        "[app] delivered {} readings, dropped {} oldest",
        delivered.load(Ordering::SeqCst),
        bus.queue_stats().dropped
    );
    bus.shutdown();
    Ok(())
}
