use std::io;
use std::net::{SocketAddr, TcpStream, ToSocketAddrs};
use std::panic::{self, AssertUnwindSafe};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::Duration;
use tracing::{debug, error, info, warn};

use super::request::{from_tiny_request, into_tiny_response, plain_response};
use crate::config::DEFAULT_WORKERS;
use crate::dispatcher::Engine;
use crate::middleware::panic_message;

/// How often idle workers check the stop flag
const POLL_INTERVAL: Duration = Duration::from_millis(100);

/// Serves a configured [`Engine`] over HTTP/1.1.
///
/// A fixed pool of worker threads pulls requests from one `tiny_http`
/// listener. The engine is shared read-only between them.
pub struct HttpServer {
    engine: Arc<Engine>,
    workers: usize,
}

/// Handle to a running HTTP server
///
/// Provides methods for waiting until the server is ready, stopping it
/// gracefully, or joining the worker threads.
pub struct ServerHandle {
    addr: SocketAddr,
    shutdown: ShutdownHandle,
    workers: Vec<JoinHandle<()>>,
}

/// Cloneable trigger that stops a running server from any thread.
#[derive(Clone)]
pub struct ShutdownHandle {
    stop: Arc<AtomicBool>,
    server: Arc<tiny_http::Server>,
}

impl ShutdownHandle {
    /// Ask every worker to exit after its current request.
    pub fn shutdown(&self) {
        if !self.stop.swap(true, Ordering::AcqRel) {
            info!("Server shutdown requested");
            self.server.unblock();
        }
    }

    /// Whether shutdown has been requested
    #[must_use]
    pub fn is_shutdown(&self) -> bool {
        self.stop.load(Ordering::Acquire)
    }
}

impl ServerHandle {
    /// Address the listener is bound to
    #[must_use]
    pub fn addr(&self) -> SocketAddr {
        self.addr
    }

    /// Trigger usable after the handle has been moved into `join`
    #[must_use]
    pub fn shutdown_handle(&self) -> ShutdownHandle {
        self.shutdown.clone()
    }

    /// Wait for the server to be ready to accept connections
    ///
    /// # Errors
    ///
    /// Returns `TimedOut` if no connection succeeds within ~250ms
    /// (50 attempts × 5ms).
    pub fn wait_ready(&self) -> io::Result<()> {
        for _ in 0..50 {
            if TcpStream::connect(self.addr).is_ok() {
                return Ok(());
            }
            thread::sleep(Duration::from_millis(5));
        }
        Err(io::Error::new(io::ErrorKind::TimedOut, "server not ready"))
    }

    /// Stop the server and wait for all workers to exit.
    pub fn stop(self) {
        self.shutdown.shutdown();
        if let Err(payload) = self.join() {
            error!(
                panic_message = %panic_message(payload.as_ref()),
                "Server worker panicked"
            );
        }
    }

    /// Block until every worker has exited.
    ///
    /// Workers only exit after a shutdown request, so this runs until some
    /// other thread calls [`ShutdownHandle::shutdown`].
    ///
    /// # Errors
    ///
    /// Returns the panic payload of the first worker that panicked.
    pub fn join(self) -> thread::Result<()> {
        let mut result = Ok(());
        for worker in self.workers {
            if let Err(payload) = worker.join() {
                if result.is_ok() {
                    result = Err(payload);
                }
            }
        }
        result
    }
}

impl HttpServer {
    /// Serve `engine` with the default worker count.
    #[must_use]
    pub fn new(engine: Arc<Engine>) -> Self {
        Self {
            engine,
            workers: DEFAULT_WORKERS,
        }
    }

    /// Set the number of worker threads (at least one).
    #[must_use]
    pub fn with_workers(mut self, workers: usize) -> Self {
        self.workers = workers.max(1);
        self
    }

    /// Bind `addr` and start the workers.
    ///
    /// Binding port `0` picks a free port; read it back with
    /// [`ServerHandle::addr`].
    ///
    /// # Errors
    ///
    /// Returns an error if the address is invalid or cannot be bound.
    pub fn start<A: ToSocketAddrs>(self, addr: A) -> io::Result<ServerHandle> {
        let requested = addr
            .to_socket_addrs()?
            .next()
            .ok_or_else(|| io::Error::new(io::ErrorKind::InvalidInput, "invalid address"))?;
        let server = Arc::new(tiny_http::Server::http(requested).map_err(io::Error::other)?);
        let addr = server.server_addr().to_ip().unwrap_or(requested);

        let shutdown = ShutdownHandle {
            stop: Arc::new(AtomicBool::new(false)),
            server: Arc::clone(&server),
        };

        let mut workers = Vec::with_capacity(self.workers);
        for id in 0..self.workers {
            let engine = Arc::clone(&self.engine);
            let shutdown = shutdown.clone();
            let worker = thread::Builder::new()
                .name(format!("tinyroute-worker-{id}"))
                .spawn(move || worker_loop(id, &engine, &shutdown))?;
            workers.push(worker);
        }

        info!(addr = %addr, workers = self.workers, "HTTP server listening");
        Ok(ServerHandle {
            addr,
            shutdown,
            workers,
        })
    }
}

fn worker_loop(id: usize, engine: &Engine, shutdown: &ShutdownHandle) {
    debug!(worker = id, "Worker started");
    while !shutdown.is_shutdown() {
        match shutdown.server.recv_timeout(POLL_INTERVAL) {
            Ok(Some(request)) => serve_one(engine, request),
            Ok(None) => {}
            Err(err) => {
                error!(worker = id, error = %err, "Listener failed");
                break;
            }
        }
    }
    debug!(worker = id, "Worker stopped");
}

fn serve_one(engine: &Engine, mut request: tiny_http::Request) {
    let response = match from_tiny_request(&mut request) {
        Ok(req) => match panic::catch_unwind(AssertUnwindSafe(|| engine.handle(req))) {
            Ok(resp) => into_tiny_response(resp),
            Err(payload) => {
                error!(
                    panic_message = %panic_message(payload.as_ref()),
                    "Handler panicked outside recovery middleware"
                );
                plain_response(500, "500 INTERNAL SERVER ERROR\n")
            }
        },
        Err(err) => {
            warn!(url = %request.url(), error = %format!("{err:#}"), "Rejecting malformed request");
            plain_response(400, "400 BAD REQUEST\n")
        }
    };
    if let Err(err) = request.respond(response) {
        debug!(error = %err, "Client went away before the response was written");
    }
}
