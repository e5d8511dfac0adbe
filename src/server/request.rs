use anyhow::{Context, Result};
use std::io::Cursor;
use tiny_http::{Header, StatusCode};
use tracing::warn;

/// Convert an incoming `tiny_http` request into an `http::Request`.
///
/// Reads the whole body. Fails when the method, target or a header cannot be
/// represented by the `http` types, or when reading the body fails.
pub fn from_tiny_request(req: &mut tiny_http::Request) -> Result<http::Request<Vec<u8>>> {
    let method = http::Method::from_bytes(req.method().to_string().as_bytes())
        .context("invalid request method")?;
    let mut builder = http::Request::builder()
        .method(method)
        .uri(req.url());
    for header in req.headers() {
        builder = builder.header(header.field.as_str().as_str(), header.value.as_str());
    }

    let mut body = Vec::new();
    req.as_reader()
        .read_to_end(&mut body)
        .context("failed to read request body")?;

    builder.body(body).context("invalid request")
}

/// Convert a dispatched response into a `tiny_http` response.
///
/// `tiny_http` computes `Content-Length` itself, so any such header on
/// `resp` is dropped. Headers `tiny_http` cannot carry are skipped.
pub fn into_tiny_response(resp: http::Response<Vec<u8>>) -> tiny_http::Response<Cursor<Vec<u8>>> {
    let (parts, body) = resp.into_parts();
    let mut out = tiny_http::Response::from_data(body).with_status_code(StatusCode(parts.status.as_u16()));
    for (name, value) in &parts.headers {
        if name == http::header::CONTENT_LENGTH {
            continue;
        }
        match Header::from_bytes(name.as_str().as_bytes(), value.as_bytes()) {
            Ok(header) => out.add_header(header),
            Err(()) => warn!(header = %name, "Dropping header not representable on the wire"),
        }
    }
    out
}

/// Plain-text response used when a request cannot be dispatched at all.
pub(crate) fn plain_response(code: u16, body: &str) -> tiny_http::Response<Cursor<Vec<u8>>> {
    let mut out =
        tiny_http::Response::from_data(body.as_bytes().to_vec()).with_status_code(StatusCode(code));
    if let Ok(header) = Header::from_bytes(&b"Content-Type"[..], &b"text/plain"[..]) {
        out.add_header(header);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_into_tiny_response_keeps_status_and_headers() {
        let resp = http::Response::builder()
            .status(201)
            .header("Content-Type", "application/json")
            .header("Content-Length", "99")
            .body(b"{}".to_vec())
            .unwrap();
        let out = into_tiny_response(resp);
        assert_eq!(out.status_code(), StatusCode(201));
        let names: Vec<String> = out
            .headers()
            .iter()
            .map(|h| h.field.as_str().as_str().to_ascii_lowercase())
            .collect();
        assert!(names.contains(&"content-type".to_string()));
        assert!(!names.contains(&"content-length".to_string()));
        assert_eq!(out.data_length(), Some(2));
    }
}
