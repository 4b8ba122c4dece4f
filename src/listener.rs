//! Tick-driven TCP listener for the command endpoint.
//!
//! The listener never blocks the host: each tick makes one non-blocking
//! accept attempt, services at most one connection to completion, and
//! returns. The socket is bound lazily on the first tick and released
//! exactly once on stop. A bind failure disables the channel instead of
//! retrying every tick.

use crate::config::Config;
use crate::executor::CommandGate;
use crate::handler;
use std::io::{self, Read};
use std::net::{SocketAddr, TcpListener, TcpStream};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::Duration;
use tracing::{debug, error, info};

/// Cadence at which `ListenerWorker` drives ticks.
pub const TICK_INTERVAL: Duration = Duration::from_millis(50);

/// Upper bound on the single read of an accepted connection.
const READ_TIMEOUT: Duration = Duration::from_millis(50);

/// One command channel listener.
///
/// Owns the socket lifecycle exclusively. Drive it either from a
/// host-provided scheduler calling [`Listener::tick`] on a fixed cadence,
/// or through [`ListenerWorker`] for a self-contained worker thread.
pub struct Listener {
    config: Config,
    gate: CommandGate,
    socket: Option<TcpListener>,
    running: bool,
}

impl Listener {
    pub fn new(config: Config, gate: CommandGate) -> Self {
        Listener {
            config,
            gate,
            socket: None,
            running: false,
        }
    }

    /// Whether the channel is accepting ticks.
    pub fn is_running(&self) -> bool {
        self.running
    }

    /// Mark the channel running. The socket is bound on the next tick.
    pub fn start(&mut self) {
        self.running = true;
    }

    /// Stop the channel and release the socket.
    pub fn stop(&mut self) {
        self.running = false;
        if self.socket.take().is_some() {
            info!("Command channel stopped");
        }
    }

    /// One poll cycle: lazy bind, a single non-blocking accept, a single
    /// request serviced to completion.
    ///
    /// Never blocks beyond the bounded connection read; with no pending
    /// connection it returns immediately. Connection-level faults abandon
    /// that connection only and leave the channel running.
    pub fn tick(&mut self) {
        if !self.running {
            return;
        }

        if self.socket.is_none() {
            match bind_listener(&self.config.host, self.config.port) {
                Ok(listener) => {
                    info!(
                        host = %self.config.host,
                        port = self.config.port,
                        "Command channel listening"
                    );
                    self.socket = Some(listener);
                }
                Err(e) => {
                    // Fail fast: disable the channel rather than retry the bind.
                    error!(
                        port = self.config.port,
                        error = %e,
                        "Bind failed, disabling command channel"
                    );
                    self.running = false;
                    return;
                }
            }
        }

        let Some(socket) = self.socket.as_ref() else {
            return;
        };

        let stream = match socket.accept() {
            Ok((stream, peer)) => {
                debug!(peer = %peer, "Accepted connection");
                stream
            }
            Err(ref e) if e.kind() == io::ErrorKind::WouldBlock => return,
            Err(e) => {
                debug!(error = %e, "Accept error");
                return;
            }
        };

        // Connection is closed on drop whatever the outcome.
        if let Err(e) = self.serve(stream) {
            debug!(error = %e, "Connection abandoned");
        }
    }

    /// Service one accepted connection: read, handle, respond.
    fn serve(&self, mut stream: TcpStream) -> io::Result<()> {
        stream.set_nonblocking(false)?;
        stream.set_read_timeout(Some(READ_TIMEOUT))?;

        let mut buf = vec![0u8; self.config.max_request_size];
        let n = match stream.read(&mut buf) {
            Ok(0) => return Ok(()),
            Ok(n) => n,
            Err(e) => return Err(e),
        };

        let response = handler::handle(&buf[..n], &self.gate);
        response.write_to(&mut stream);
        Ok(())
    }
}

/// Build the listening socket: reuse-addr, non-blocking, bound and listening.
fn bind_listener(host: &str, port: u16) -> io::Result<TcpListener> {
    let addr: SocketAddr = format!("{host}:{port}")
        .parse()
        .map_err(|e| io::Error::new(io::ErrorKind::InvalidInput, e))?;

    let socket = socket2::Socket::new(
        match addr {
            SocketAddr::V4(_) => socket2::Domain::IPV4,
            SocketAddr::V6(_) => socket2::Domain::IPV6,
        },
        socket2::Type::STREAM,
        Some(socket2::Protocol::TCP),
    )?;

    socket.set_reuse_address(true)?;
    socket.set_nonblocking(true)?;
    socket.bind(&addr.into())?;
    socket.listen(64)?;

    Ok(socket.into())
}

/// Dedicated worker thread driving a [`Listener`] at a fixed cadence.
///
/// The self-contained alternative to wiring `tick` into a host scheduler.
/// The thread exits when stopped or when the listener disables itself.
pub struct ListenerWorker {
    stop: Arc<AtomicBool>,
    handle: Option<JoinHandle<()>>,
}

impl ListenerWorker {
    /// Spawn the worker. The listener starts immediately; the socket binds
    /// on the first tick.
    pub fn spawn(config: Config, gate: CommandGate) -> io::Result<Self> {
        let stop = Arc::new(AtomicBool::new(false));
        let stop_flag = Arc::clone(&stop);

        let handle = thread::Builder::new()
            .name("sideband-listener".to_string())
            .spawn(move || {
                let mut listener = Listener::new(config, gate);
                listener.start();

                while !stop_flag.load(Ordering::Relaxed) && listener.is_running() {
                    listener.tick();
                    thread::sleep(TICK_INTERVAL);
                }

                listener.stop();
            })?;

        Ok(ListenerWorker {
            stop,
            handle: Some(handle),
        })
    }

    /// Signal the worker and wait for it to release the socket.
    pub fn stop(&mut self) {
        self.stop.store(true, Ordering::Relaxed);
        if let Some(handle) = self.handle.take() {
            let _ = handle.join();
        }
    }
}

impl Drop for ListenerWorker {
    fn drop(&mut self) {
        self.stop();
    }
}
