//! # Example: slow_listener
//!
//! Shows serialized async delivery and the bounded wait.
//!
//! Demonstrates how to:
//! - Register async listeners with [`Listener::future`].
//! - Observe that units on one channel run one at a time.
//! - See a listener exceed `max_listener_wait`: the timeout is logged, the next unit
//!   starts, and the slow work still finishes in the background.
//!
//! ## Flow
//! ```text
//! publish::<Jobs>(1..=3)
//!   ├─► [fast] job 1 ─► [slow] job 1 (timeout after 200ms, keeps running)
//!   ├─► [fast] job 2 ─► [slow] job 2 ...
//!   └─► [fast] job 3 ─► [slow] job 3 ...
//! drain_all() ─► waits for every unit to settle or time out
//! ```
//!
//! ## Run
//! ```bash
//! RUST_LOG=eventvisor=trace cargo run --example slow_listener
//! ```

use std::time::Duration;

use eventvisor::{Config, Emitter, Listener, ListenerResult, channel};

channel!(Jobs: u32);

#[tokio::main(flavor = "current_thread")]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    // 1. Wait at most 200ms for each async listener
    let cfg = Config {
        max_listener_wait: Duration::from_millis(200),
        ..Config::default()
    };
    let emitter = Emitter::new(cfg);

    // 2. A quick listener and one that overruns the limit
    let fast = Listener::future(|job: u32| async move {
        tokio::time::sleep(Duration::from_millis(50)).await;
        println!("[fast] job {job} done");
        ListenerResult::Ok(())
    })
    .named("fast");

    let slow = Listener::future(|job: u32| async move {
        println!("[slow] job {job} started");
        tokio::time::sleep(Duration::from_millis(500)).await;
        println!("[slow] job {job} finally done");
        ListenerResult::Ok(())
    })
    .named("slow");

    emitter.subscribe::<Jobs>(fast).subscribe::<Jobs>(slow);

    // 3. Publish a few jobs; later ones buffer while earlier units run
    for job in 1..=3 {
        emitter.publish::<Jobs>(job);
    }

    // 4. Drain returns once every unit settled or timed out
    emitter.drain_all().await;
    println!("[main] drained");

    // 5. Give the detached slow work time to complete
    tokio::time::sleep(Duration::from_millis(600)).await;
    println!("[main] exit");
}
