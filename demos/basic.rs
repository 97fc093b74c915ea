//! # Example: basic
//!
//! Minimal publish/subscribe with buffering and replay.
//!
//! Demonstrates how to:
//! - Declare typed channels with [`channel!`].
//! - Publish before anyone listens and get the values replayed on [`Emitter::subscribe`].
//! - Pause, publish, resume and [`Emitter::drain_all`] to flush the backlog.
//!
//! ## Flow
//! ```text
//! publish::<Orders>(1, 2)        (no listener: buffered)
//! subscribe::<Orders>(print)     (replays 1, 2)
//! pause() ─► publish(3)          (stopped: buffered)
//! resume() ─► drain_all()        (replays 3)
//! ```
//!
//! ## Run
//! ```bash
//! cargo run --example basic
//! ```

use eventvisor::{Config, Emitter, Listener, channel};

channel!(Orders: u64);
channel!(Notices: String);

#[tokio::main(flavor = "current_thread")]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    // 1. Default config: queue without listeners, serialize, wait up to 1s
    let emitter = Emitter::new(Config::default());

    // 2. Nobody listens yet, values are buffered
    emitter.publish::<Orders>(1);
    emitter.publish::<Orders>(2);
    println!("[main] buffered before subscribe: {}", emitter.buffered_len::<Orders>());

    // 3. Subscribing replays the backlog in order
    emitter
        .subscribe::<Orders>(Listener::new(|id: &u64| println!("[orders] order #{id}")))
        .subscribe::<Notices>(Listener::new(|msg: &String| println!("[notices] {msg}")));

    // 4. While paused, publishes are held back
    emitter.pause();
    emitter.publish::<Orders>(3);
    emitter.publish::<Notices>("maintenance window".to_string());
    println!("[main] paused, run state: {:?}", emitter.run_state());

    // 5. Resume and drain to deliver what was held
    emitter.resume();
    emitter.drain_all().await;
    println!("[main] drained, run state: {:?}", emitter.run_state());

    // 6. Misuse is logged, not returned
    emitter.resume();
}
