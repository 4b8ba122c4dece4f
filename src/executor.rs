//! Host command dispatch.
//!
//! The channel never touches host internals: everything it runs goes
//! through the narrow `CommandExecutor` seam, implemented by a
//! host-specific adapter. `CommandGate` is the shared handle the listener
//! and in-process callers dispatch through.

use std::sync::Arc;
use tracing::info;

/// Host-side command dispatch capability.
///
/// Implementations must not panic across this boundary; the host catches
/// and logs its own dispatch failures. Dispatch is fire-and-forget: the
/// caller learns that the command was handed over, not whether it worked.
pub trait CommandExecutor: Send + Sync {
    /// Run one trimmed, non-empty command.
    fn execute(&self, command: &str);
}

/// Shared dispatch handle.
#[derive(Clone)]
pub struct CommandGate {
    executor: Arc<dyn CommandExecutor>,
}

impl CommandGate {
    pub fn new(executor: Arc<dyn CommandExecutor>) -> Self {
        CommandGate { executor }
    }

    /// Hand a validated command to the host.
    pub fn dispatch(&self, command: &str) {
        self.executor.execute(command);
        info!(command, "Dispatched command");
    }

    /// Direct in-process submission, bypassing the network path.
    ///
    /// Applies the same validation as the HTTP endpoint: the command is
    /// trimmed and must be non-empty. Returns whether it was dispatched.
    pub fn submit(&self, raw: &str) -> bool {
        let command = raw.trim();
        if command.is_empty() {
            return false;
        }
        self.dispatch(command);
        true
    }
}
