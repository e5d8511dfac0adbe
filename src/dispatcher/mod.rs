//! # Dispatcher Module
//!
//! The dispatcher turns a request into a response by running an ordered chain
//! of handlers over a per-request [`Context`].
//!
//! ## Overview
//!
//! - [`Engine`] owns the route groups, the [`Router`](crate::router::Router)
//!   and the HTML templates
//! - [`RouterGroup`] is a path prefix with its own middleware list
//! - [`Context`] carries the request, the buffered response and the chain cursor
//!
//! ## Request Flow
//!
//! 1. Every group whose prefix is a string prefix of the request path adds its
//!    middleware, groups in creation order (root first)
//! 2. The router resolves (method, path) to a handler and path parameters
//! 3. The route handler (or a `404 NOT FOUND: <path>` writer) is appended last
//! 4. [`Context::next`] runs the chain from the start
//!
//! ## Middleware
//!
//! A middleware is an ordinary [`HandlerFunc`]. Code before its `c.next()` call
//! runs on the way in, code after it on the way out:
//!
//! ```rust
//! use std::sync::{Arc, Mutex};
//! use tinyroute::dispatcher::{handler, Engine};
//!
//! let trace = Arc::new(Mutex::new(Vec::new()));
//! let mut engine = Engine::new();
//! for name in ["A", "B"] {
//!     let trace = Arc::clone(&trace);
//!     engine.use_middleware([handler(move |c| {
//!         trace.lock().unwrap().push(format!("{name} in"));
//!         c.next();
//!         trace.lock().unwrap().push(format!("{name} out"));
//!     })]);
//! }
//! let t = Arc::clone(&trace);
//! engine.get("/", move |c| {
//!     t.lock().unwrap().push("H".to_string());
//!     c.string(200, "ok");
//! });
//!
//! let resp = engine.handle(http::Request::get("/").body(Vec::new()).unwrap());
//! assert_eq!(resp.status(), 200);
//! assert_eq!(*trace.lock().unwrap(), ["A in", "B in", "H", "B out", "A out"]);
//! ```
//!
//! A middleware that wants to stop the request calls [`Context::fail`].
//! Returning without calling `next` does not stop anything: the executor moves
//! on to the following handler once the middleware returns.
//!
//! ## Error Handling
//!
//! - Unmatched routes become a `404` response, never an error value
//! - `fail(code, message)` answers `code` with `{"message": message}`
//! - JSON encoding errors become a `500` carrying the encoder's message
//! - Panics are left to the [`recovery`](crate::middleware::recovery) middleware

mod context;
mod core;
mod group;
mod response;

pub use context::{handler, ChainState, Context, HandlerFunc};
pub use core::Engine;
pub use group::RouterGroup;
pub use response::ResponseWriter;
