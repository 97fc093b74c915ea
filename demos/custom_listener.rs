//! # Example: custom_listener
//!
//! Demonstrates a stateful listener and a custom error sink.
//!
//! Shows how to:
//! - Implement the [`Listen`] trait for a struct.
//! - Implement [`Logger`] to route [`EmitterError`]s somewhere other than `tracing`.
//! - Wire both through [`Emitter::builder`].
//!
//! ## Flow
//! ```text
//! publish::<Payments>(amount)
//!   └─► Ledger::on_value()
//!         ├─► ok        ─► balance updated
//!         └─► Err(...)  ─► ConsoleLogger::error(ListenerRejected)
//! ```
//!
//! ## Run
//! ```bash
//! cargo run --example custom_listener
//! ```

use std::sync::Arc;
use std::sync::atomic::{AtomicI64, Ordering};

use async_trait::async_trait;
use eventvisor::{Config, Emitter, EmitterError, Listen, Listener, ListenerResult, Logger, channel};

channel!(Payments: i64);

/// Keeps a running balance and refuses to go negative.
#[derive(Default)]
struct Ledger {
    balance: AtomicI64,
}

#[async_trait]
impl Listen<i64> for Ledger {
    async fn on_value(&self, amount: i64) -> ListenerResult {
        let current = self.balance.load(Ordering::SeqCst);
        if current + amount < 0 {
            return Err(format!("payment {amount} would overdraw balance {current}").into());
        }
        self.balance.fetch_add(amount, Ordering::SeqCst);
        println!("[ledger] applied {amount:+}, balance {}", current + amount);
        Ok(())
    }

    fn name(&self) -> &'static str {
        "ledger"
    }
}

/// Prints every reported fault with its stable label.
struct ConsoleLogger;

impl Logger for ConsoleLogger {
    fn error(&self, err: &EmitterError) {
        println!("[logger] {}: {err}", err.as_label());
    }
}

#[tokio::main(flavor = "current_thread")]
async fn main() {
    let ledger = Arc::new(Ledger::default());

    let emitter = Emitter::builder(Config::default())
        .with_logger(ConsoleLogger)
        .build();
    emitter.subscribe::<Payments>(Listener::<i64>::from_listen(ledger.clone()));

    for amount in [100, -30, -200, 50] {
        emitter.publish::<Payments>(amount);
    }
    emitter.drain_all().await;

    println!("[main] final balance {}", ledger.balance.load(Ordering::SeqCst));
}
