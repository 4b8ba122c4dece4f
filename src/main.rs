//! sideband demo host.
//!
//! Binds the command channel with a log-only executor so the endpoint can
//! be exercised end to end:
//!
//! ```text
//! curl -X POST localhost:8085 -d '{"command":"say hi"}'
//! ```
//!
//! Real hosts embed the library instead and provide their own
//! `CommandExecutor` adapter plus a scheduler to drive `Listener::tick`.

use sideband::config::Config;
use sideband::executor::{CommandExecutor, CommandGate};
use sideband::listener::{Listener, TICK_INTERVAL};
use std::sync::Arc;
use std::thread;
use tracing::info;
use tracing_subscriber::EnvFilter;

/// Stand-in executor: logs what a host adapter would run.
struct LogExecutor;

impl CommandExecutor for LogExecutor {
    fn execute(&self, command: &str) {
        info!(command, "Host would execute");
    }
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Load configuration
    let config = Config::load()?;

    // Initialize logging
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.log_level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .init();

    info!(
        host = %config.host,
        port = config.port,
        max_request_size = config.max_request_size,
        "Starting sideband command channel"
    );

    let gate = CommandGate::new(Arc::new(LogExecutor));
    let mut listener = Listener::new(config, gate);
    listener.start();

    // Stand-in for a host scheduler: drive ticks at a fixed cadence until
    // the channel disables itself.
    while listener.is_running() {
        listener.tick();
        thread::sleep(TICK_INTERVAL);
    }

    Ok(())
}
