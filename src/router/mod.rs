//! # Router Module
//!
//! Path matching and route resolution for tinyroute.
//!
//! ## Overview
//!
//! The router is responsible for:
//! - Keeping one segment trie per HTTP method
//! - Keeping the route table that maps `(method, pattern)` to a handler
//! - Matching incoming request paths to registered patterns
//! - Extracting `:name` and `*name` path parameters
//!
//! ## Pattern syntax
//!
//! | Segment     | Matches                                        |
//! |-------------|------------------------------------------------|
//! | `users`     | exactly `users`                                |
//! | `:id`       | any single segment, captured as `id`           |
//! | `*filepath` | all remaining segments joined by `/` (last only) |
//!
//! ## Example
//!
//! ```rust
//! use http::Method;
//! use tinyroute::dispatcher::handler;
//! use tinyroute::router::Router;
//!
//! let mut router = Router::new();
//! router.add_route(Method::GET, "/p/:lang/doc", handler(|c| c.string(200, "doc")));
//!
//! let matched = router.find(&Method::GET, "/p/go/doc").unwrap();
//! assert_eq!(matched.pattern, "/p/:lang/doc");
//! assert_eq!(matched.get_path_param("lang"), Some("go"));
//! ```
//!
//! ## Ambiguous registrations
//!
//! Siblings are tried in registration order and a capture matches anything, so
//! an earlier `:name` or `*name` segment shadows a literal registered after it.
//! See [`trie`] for the details.

mod core;
pub mod trie;
#[cfg(test)]
mod tests;

pub use core::{validate_pattern, ParamVec, RouteError, RouteMatch, Router, MAX_INLINE_PARAMS};
