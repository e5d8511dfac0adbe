//! Blocking HTTP transport for an [`Engine`](crate::dispatcher::Engine).
//!
//! The engine itself is transport-agnostic; this module accepts connections
//! with `tiny_http`, converts each request to `http::Request<Vec<u8>>`,
//! dispatches it on a worker thread and writes the response back.

pub mod http_server;
pub mod request;

pub use http_server::{HttpServer, ServerHandle, ShutdownHandle};
pub use request::{from_tiny_request, into_tiny_response};
