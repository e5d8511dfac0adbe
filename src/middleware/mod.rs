//! Built-in middleware.
//!
//! Both are plain [`HandlerFunc`](crate::dispatcher::HandlerFunc)s, attached
//! with `use_middleware` like any user middleware:
//!
//! ```rust
//! use tinyroute::dispatcher::Engine;
//! use tinyroute::middleware::{logger, recovery};
//!
//! let mut engine = Engine::new();
//! engine.use_middleware([logger(), recovery()]);
//! ```

mod logger;
mod recovery;

pub use logger::logger;
pub use recovery::recovery;
pub(crate) use recovery::panic_message;
