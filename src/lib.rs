//! sideband: an HTTP command channel for host applications
//!
//! Exposes a single POST endpoint over plain TCP that accepts a
//! JSON-encoded command and hands it to the embedding host:
//! - Non-blocking listener driven by a scheduler tick, one request per tick
//! - One-shot connections, closed after a single response
//! - Host dispatch behind a narrow `CommandExecutor` trait
//! - Direct in-process submission path bypassing the network
//! - Configuration via CLI arguments or TOML file

pub mod config;
pub mod executor;
pub mod handler;
pub mod http;
pub mod listener;

pub use executor::{CommandExecutor, CommandGate};
pub use listener::{Listener, ListenerWorker};
