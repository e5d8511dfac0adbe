#![allow(dead_code)]

use http::{Method, Request, Response};
use std::io::{Read, Write};
use std::net::{SocketAddr, TcpStream};
use std::time::Duration;
use tinyroute::Engine;

/// Dispatch a bodiless request straight through the engine.
pub fn call(engine: &Engine, method: Method, uri: &str) -> Response<Vec<u8>> {
    let req = Request::builder()
        .method(method)
        .uri(uri)
        .body(Vec::new())
        .unwrap();
    engine.handle(req)
}

pub fn get(engine: &Engine, uri: &str) -> Response<Vec<u8>> {
    call(engine, Method::GET, uri)
}

pub fn body_str(resp: &Response<Vec<u8>>) -> &str {
    std::str::from_utf8(resp.body()).unwrap()
}

pub fn content_type(resp: &Response<Vec<u8>>) -> Option<&str> {
    resp.headers()
        .get(http::header::CONTENT_TYPE)
        .map(|v| v.to_str().unwrap())
}

/// Write a raw HTTP/1.1 request and read until the server closes.
pub fn send_request(addr: &SocketAddr, req: &str) -> String {
    let mut stream = TcpStream::connect(addr).unwrap();
    stream.write_all(req.as_bytes()).unwrap();
    stream
        .set_read_timeout(Some(Duration::from_millis(1000)))
        .unwrap();
    let mut buf = Vec::new();
    loop {
        let mut tmp = [0u8; 1024];
        match stream.read(&mut tmp) {
            Ok(0) => break,
            Ok(n) => buf.extend_from_slice(&tmp[..n]),
            Err(ref e)
                if e.kind() == std::io::ErrorKind::WouldBlock
                    || e.kind() == std::io::ErrorKind::TimedOut =>
            {
                break
            }
            Err(e) => panic!("read error: {:?}", e),
        }
    }
    String::from_utf8_lossy(&buf).to_string()
}

/// Status, content type and body of a raw response.
pub fn parse_response_parts(resp: &str) -> (u16, String, String) {
    let (headers, body) = resp.split_once("\r\n\r\n").unwrap_or((resp, ""));
    let mut status = 0;
    let mut content_type = String::new();
    for line in headers.lines() {
        if line.starts_with("HTTP/1.") {
            status = line
                .split_whitespace()
                .nth(1)
                .unwrap_or("0")
                .parse()
                .unwrap();
        } else if let Some((name, val)) = line.split_once(':') {
            if name.eq_ignore_ascii_case("content-type") {
                content_type = val.trim().to_string();
            }
        }
    }
    (status, content_type, body.to_string())
}
