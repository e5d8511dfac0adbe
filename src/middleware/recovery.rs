use std::any::Any;
use std::panic::{self, AssertUnwindSafe};
use tracing::error;

use crate::dispatcher::{handler, HandlerFunc};

/// Turns a panic anywhere downstream into `500 {"message":"Internal Server Error"}`.
///
/// Register it before the middleware it should protect. Requires the default
/// `panic = "unwind"` strategy.
#[must_use]
pub fn recovery() -> HandlerFunc {
    handler(|c| {
        let outcome = panic::catch_unwind(AssertUnwindSafe(|| c.next()));
        if let Err(payload) = outcome {
            let panic_message = panic_message(payload.as_ref());
            let backtrace = std::backtrace::Backtrace::capture();
            error!(
                request_id = %c.request_id,
                method = %c.method,
                path = %c.path,
                panic_message = %panic_message,
                backtrace = %backtrace,
                "Handler panicked"
            );
            c.fail(500, "Internal Server Error");
        }
    })
}

pub(crate) fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "unknown panic payload".to_string()
    }
}
