use std::time::Instant;
use tracing::info;

use crate::dispatcher::{handler, HandlerFunc};

/// Access log middleware.
///
/// Runs the rest of the chain, then logs one line per request with the final
/// status and the time spent downstream.
#[must_use]
pub fn logger() -> HandlerFunc {
    handler(|c| {
        let start = Instant::now();
        c.next();
        info!(
            request_id = %c.request_id,
            method = %c.method,
            uri = %c.request().uri(),
            status = c.status_code(),
            latency_us = start.elapsed().as_micros() as u64,
            "Request completed"
        );
    })
}
