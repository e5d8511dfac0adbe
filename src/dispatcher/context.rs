use http::{header, Method, Request, Response};
use percent_encoding::percent_decode_str;
use serde::Serialize;
use std::fmt::{self, Display};
use std::sync::Arc;
use tracing::{debug, warn};

use super::response::ResponseWriter;
use crate::ids::RequestId;
use crate::router::ParamVec;
use crate::templates::Templates;

/// A request handler or middleware.
///
/// Handlers take the per-request [`Context`] and return nothing; every effect
/// goes through the context (response writes, [`Context::next`], [`Context::fail`]).
pub type HandlerFunc = Arc<dyn Fn(&mut Context<'_>) + Send + Sync>;

/// Wrap a closure as a [`HandlerFunc`].
///
/// ```rust
/// use tinyroute::dispatcher::handler;
///
/// let hello = handler(|c| c.string(200, format_args!("hello {}\n", c.query("name"))));
/// # let _ = hello;
/// ```
pub fn handler<F>(f: F) -> HandlerFunc
where
    F: Fn(&mut Context<'_>) + Send + Sync + 'static,
{
    Arc::new(f)
}

/// Where a context's chain cursor stands
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChainState {
    /// `next()` has not been called yet
    NotStarted,
    /// A handler is being (or is about to be) invoked
    Running,
    /// Every handler ran, or `fail()` cut the chain short
    Done,
}

/// Per-request state handed to every handler in the chain.
///
/// Owns the request, the buffered response and the ordered handler list with
/// its cursor. A context is never shared between requests.
pub struct Context<'a> {
    request: Request<Vec<u8>>,
    /// Percent-decoded request path (without query string)
    pub path: String,
    /// Request method
    pub method: Method,
    /// Parameters captured by the matched route
    pub params: ParamVec,
    /// Id used to correlate log lines for this request
    pub request_id: RequestId,
    response: ResponseWriter,
    handlers: Vec<HandlerFunc>,
    index: isize,
    templates: Option<&'a Templates>,
}

impl<'a> Context<'a> {
    /// Build a context for `request` with an empty chain and no templates.
    #[must_use]
    pub fn new(request: Request<Vec<u8>>) -> Self {
        Self {
            path: decode_path(request.uri().path()),
            method: request.method().clone(),
            request_id: RequestId::from_request(&request),
            request,
            params: ParamVec::new(),
            response: ResponseWriter::new(),
            handlers: Vec::new(),
            index: -1,
            templates: None,
        }
    }

    /// Build a context whose chain starts as `handlers`.
    #[must_use]
    pub fn with_handlers(request: Request<Vec<u8>>, handlers: Vec<HandlerFunc>) -> Self {
        let mut c = Self::new(request);
        c.handlers = handlers;
        c
    }

    pub(crate) fn set_templates(&mut self, templates: &'a Templates) {
        self.templates = Some(templates);
    }

    /// Append a handler to the end of the chain
    pub fn push_handler(&mut self, handler: HandlerFunc) {
        self.handlers.push(handler);
    }

    /// Number of handlers in the chain
    #[must_use]
    pub fn handler_count(&self) -> usize {
        self.handlers.len()
    }

    /// Current cursor state
    #[must_use]
    pub fn state(&self) -> ChainState {
        match usize::try_from(self.index) {
            Err(_) => ChainState::NotStarted,
            Ok(i) if i < self.handlers.len() => ChainState::Running,
            Ok(_) => ChainState::Done,
        }
    }

    /// Run the rest of the chain.
    ///
    /// Advances the cursor and keeps invoking handlers until it runs off the
    /// end. A middleware that calls `next()` has therefore drained everything
    /// after it when the call returns, which gives the usual onion order.
    pub fn next(&mut self) {
        self.index += 1;
        while let Some(handler) = self.current_handler() {
            handler(self);
            self.index += 1;
        }
    }

    fn current_handler(&self) -> Option<HandlerFunc> {
        usize::try_from(self.index)
            .ok()
            .and_then(|i| self.handlers.get(i))
            .map(Arc::clone)
    }

    /// Stop the chain and answer `code` with `{"message": message}`.
    ///
    /// Handlers still unwinding after this call find the chain exhausted.
    pub fn fail(&mut self, code: u16, message: &str) {
        self.index = isize::try_from(self.handlers.len()).unwrap_or(isize::MAX);
        self.json(code, &serde_json::json!({ "message": message }));
    }

    /// The underlying request
    #[must_use]
    pub fn request(&self) -> &Request<Vec<u8>> {
        &self.request
    }

    /// Request header value, if present and valid UTF-8
    #[must_use]
    pub fn header(&self, name: &str) -> Option<&str> {
        self.request
            .headers()
            .get(name)
            .and_then(|v| v.to_str().ok())
    }

    /// Path parameter `key`, or `""` when the route did not capture it
    #[must_use]
    pub fn param(&self, key: &str) -> &str {
        self.params
            .iter()
            .rfind(|(k, _)| k.as_ref() == key)
            .map(|(_, v)| v.as_str())
            .unwrap_or("")
    }

    /// First query-string value for `key`, or `""`
    #[must_use]
    pub fn query(&self, key: &str) -> String {
        self.request
            .uri()
            .query()
            .and_then(|q| first_value(q.as_bytes(), key))
            .unwrap_or_default()
    }

    /// Form value for `key`: an urlencoded body field first, then the query string
    #[must_use]
    pub fn post_form(&self, key: &str) -> String {
        let is_form = self
            .header(header::CONTENT_TYPE.as_str())
            .is_some_and(|ct| ct.starts_with("application/x-www-form-urlencoded"));
        if is_form {
            if let Some(value) = first_value(self.request.body(), key) {
                return value;
            }
        }
        self.query(key)
    }

    /// Write the status line (only the first call takes effect)
    pub fn status(&mut self, code: u16) {
        self.response.write_header(code);
    }

    /// Status that will be sent; `200` when nothing was written
    #[must_use]
    pub fn status_code(&self) -> u16 {
        self.response.status().unwrap_or(200)
    }

    /// Set a response header
    pub fn set_header(&mut self, key: &str, value: &str) {
        self.response.set_header(key, value);
    }

    /// Plain text response
    pub fn string(&mut self, code: u16, body: impl Display) {
        self.set_header("Content-Type", "text/plain");
        self.status(code);
        self.response.write(body.to_string().as_bytes());
    }

    /// JSON response.
    ///
    /// An encoding failure turns into a `500` carrying the encoder's message.
    pub fn json<T: Serialize + ?Sized>(&mut self, code: u16, obj: &T) {
        match serde_json::to_vec(obj) {
            Ok(body) => {
                self.set_header("Content-Type", "application/json");
                self.status(code);
                self.response.write(&body);
            }
            Err(err) => {
                warn!(request_id = %self.request_id, path = %self.path, error = %err, "JSON encoding failed");
                self.set_header("Content-Type", "text/plain; charset=utf-8");
                self.status(500);
                self.response.write(err.to_string().as_bytes());
            }
        }
    }

    /// Raw bytes response
    pub fn data(&mut self, code: u16, data: impl AsRef<[u8]>) {
        self.status(code);
        self.response.write(data.as_ref());
    }

    /// HTML response from a ready string
    pub fn html(&mut self, code: u16, html: &str) {
        self.set_header("Content-Type", "text/html");
        self.status(code);
        self.response.write(html.as_bytes());
    }

    /// Render the engine template `name` with `data` as an HTML response.
    ///
    /// Missing templates and render errors fail the chain with `500`.
    pub fn html_template<S: Serialize>(&mut self, code: u16, name: &str, data: S) {
        let Some(templates) = self.templates else {
            self.fail(500, "no templates are loaded");
            return;
        };
        match templates.render(name, data) {
            Ok(body) => self.html(code, &body),
            Err(err) => {
                debug!(request_id = %self.request_id, template = %name, error = %err, "Template render failed");
                self.fail(500, &err.to_string());
            }
        }
    }

    /// Response written so far
    #[must_use]
    pub fn response(&self) -> &ResponseWriter {
        &self.response
    }

    /// Finish the request and hand back the response
    #[must_use]
    pub fn into_response(self) -> Response<Vec<u8>> {
        self.response.into_response()
    }
}

/// Percent-decode a request path.
///
/// Routing, group prefixes and parameters all see the decoded form. A path
/// that does not decode to UTF-8 is kept as received.
pub(crate) fn decode_path(raw: &str) -> String {
    match percent_decode_str(raw).decode_utf8() {
        Ok(decoded) => decoded.into_owned(),
        Err(err) => {
            debug!(path = %raw, error = %err, "Path is not UTF-8 once decoded; routing on the raw form");
            raw.to_string()
        }
    }
}

fn first_value(input: &[u8], key: &str) -> Option<String> {
    url::form_urlencoded::parse(input)
        .find(|(k, _)| k == key)
        .map(|(_, v)| v.into_owned())
}

impl fmt::Debug for Context<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Context")
            .field("request_id", &self.request_id)
            .field("method", &self.method)
            .field("path", &self.path)
            .field("params", &self.params)
            .field("handlers", &self.handlers.len())
            .field("index", &self.index)
            .field("status", &self.response.status())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decode_path() {
        assert_eq!(decode_path("/p/hello%20world"), "/p/hello world");
        assert_eq!(decode_path("/caf%C3%A9"), "/café");
        assert_eq!(decode_path("/a%2Fb"), "/a/b");
        assert_eq!(decode_path("/plain"), "/plain");
        assert_eq!(decode_path("/x%FF"), "/x%FF");
    }
}
