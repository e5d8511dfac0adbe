use http::header::{HeaderName, HeaderValue};
use http::{HeaderMap, Response, StatusCode};
use tracing::{debug, warn};

/// Buffered response sink owned by a request [`Context`](super::Context).
///
/// Behaves like a streaming HTTP writer: the first status written is the one
/// sent, headers set after that are dropped, and writing a body without a
/// status commits `200`.
#[derive(Debug, Default)]
pub struct ResponseWriter {
    status: Option<u16>,
    headers: HeaderMap,
    body: Vec<u8>,
}

impl ResponseWriter {
    /// Create an empty writer with nothing committed
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Commit the status line. Later calls are ignored.
    pub fn write_header(&mut self, code: u16) {
        if let Some(existing) = self.status {
            debug!(existing, ignored = code, "Superfluous write_header call");
            return;
        }
        self.status = Some(code);
    }

    /// Set (replace) a header. Dropped once the status is committed.
    pub fn set_header(&mut self, key: &str, value: &str) {
        if self.status.is_some() {
            debug!(header = %key, "Header set after status was written; ignored");
            return;
        }
        let name = match HeaderName::from_bytes(key.as_bytes()) {
            Ok(name) => name,
            Err(err) => {
                warn!(header = %key, error = %err, "Invalid header name");
                return;
            }
        };
        let value = match HeaderValue::from_str(value) {
            Ok(value) => value,
            Err(err) => {
                warn!(header = %key, error = %err, "Invalid header value");
                return;
            }
        };
        self.headers.insert(name, value);
    }

    /// Append body bytes, committing `200` if no status was written yet
    pub fn write(&mut self, bytes: &[u8]) {
        if self.status.is_none() {
            self.write_header(200);
        }
        self.body.extend_from_slice(bytes);
    }

    /// Committed status, if any
    #[inline]
    #[must_use]
    pub fn status(&self) -> Option<u16> {
        self.status
    }

    /// Response headers written so far
    #[inline]
    #[must_use]
    pub fn headers(&self) -> &HeaderMap {
        &self.headers
    }

    /// Body bytes written so far
    #[inline]
    #[must_use]
    pub fn body(&self) -> &[u8] {
        &self.body
    }

    /// True once a status has been committed
    #[inline]
    #[must_use]
    pub fn written(&self) -> bool {
        self.status.is_some()
    }

    /// Convert into an `http::Response`; an untouched writer becomes an empty `200`.
    #[must_use]
    pub fn into_response(self) -> Response<Vec<u8>> {
        let status = match self.status {
            None => StatusCode::OK,
            Some(code) => StatusCode::from_u16(code).unwrap_or_else(|err| {
                warn!(status = code, error = %err, "Invalid status code; sending 200");
                StatusCode::OK
            }),
        };
        let mut response = Response::new(self.body);
        *response.status_mut() = status;
        *response.headers_mut() = self.headers;
        response
    }
}
