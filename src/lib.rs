//! # tinyroute
//!
//! **tinyroute** is a small, embeddable HTTP request dispatcher: a per-method
//! segment trie for routing, prefix-scoped route groups with their own
//! middleware, and an onion-ordered handler chain driven through a
//! per-request [`Context`].
//!
//! ## Overview
//!
//! ```rust
//! use tinyroute::{logger, recovery, Engine};
//!
//! let mut engine = Engine::new();
//! engine.use_middleware([logger(), recovery()]);
//! engine.get("/", |c| c.html(200, "<h1>Hello</h1>"));
//!
//! let mut v1 = engine.group("/v1");
//! v1.get("/hello/:name", |c| {
//!     let body = format!("hello {}\n", c.param("name"));
//!     c.string(200, body);
//! });
//! v1.get("/assets/*filepath", |c| {
//!     let body = serde_json::json!({ "filepath": c.param("filepath") });
//!     c.json(200, &body);
//! });
//!
//! let req = http::Request::get("/v1/hello/ferris").body(Vec::new()).unwrap();
//! let resp = engine.handle(req);
//! assert_eq!(resp.status(), 200);
//! assert_eq!(resp.body(), b"hello ferris\n");
//! ```
//!
//! ## Architecture
//!
//! - **[`router`]** - segment trie per method plus the `METHOD-pattern` handler table
//! - **[`dispatcher`]** - [`Engine`], [`RouterGroup`], [`Context`] and the response sink
//! - **[`middleware`]** - built-in request logging and panic recovery
//! - **[`templates`]** - named HTML templates rendered with `minijinja`
//! - **[`static_files`]** - directory serving behind a wildcard route
//! - **[`server`]** - blocking HTTP/1.1 transport over `tiny_http`
//! - **[`config`]** / **[`logging`]** / **[`cli`]** - the `tinyroute` binary
//!
//! ## Patterns
//!
//! | Segment  | Matches                                   | Binds              |
//! |----------|-------------------------------------------|--------------------|
//! | `users`  | exactly `users`                           | nothing            |
//! | `:id`    | any one segment                           | `id` = the segment |
//! | `*path`  | the rest of the path (one or more parts)  | `path` = `a/b/c`   |
//!
//! Static and `:` siblings are tried in insertion order, so the first
//! registered child that leads to a full match wins. Nothing after a `*`
//! segment is kept.
//!
//! ## Lifecycle
//!
//! Registration takes `&mut Engine`; [`Engine::handle`] takes `&Engine`.
//! Once configured, an engine can be wrapped in `Arc` and served from many
//! threads (see [`server::HttpServer`]) with no locking on the request path.

pub mod cli;
pub mod config;
pub mod demo;
pub mod dispatcher;
pub mod ids;
pub mod logging;
pub mod middleware;
pub mod router;
pub mod server;
pub mod static_files;
pub mod templates;

pub use dispatcher::{handler, Context, Engine, HandlerFunc, RouterGroup};
pub use middleware::{logger, recovery};
pub use router::Router;
