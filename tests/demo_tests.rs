//! The sample application wired up by `tinyroute serve`.

mod common;

use common::{body_str, content_type, get};
use http::{Method, Request};
use std::fs;
use tinyroute::config::ServerConfig;
use tinyroute::demo::build_engine;

fn engine_with(config: &ServerConfig) -> tinyroute::Engine {
    build_engine(config).unwrap()
}

#[test]
fn test_template_routes() {
    let engine = engine_with(&ServerConfig::default());

    let resp = get(&engine, "/date");
    assert_eq!(resp.status(), 200);
    assert!(body_str(&resp).contains("Date: 2022-05-19"));

    let resp = get(&engine, "/students");
    let body = body_str(&resp);
    assert!(body.contains("0: alice is 20 years old"));
    assert!(body.contains("1: bob is 22 years old"));

    let resp = get(&engine, "/");
    assert_eq!(content_type(&resp), Some("text/html"));
}

#[test]
fn test_group_routes() {
    let engine = engine_with(&ServerConfig::default());

    let resp = get(&engine, "/v1/hello?name=ferris");
    assert_eq!(body_str(&resp), "hello ferris, you're at /v1/hello\n");

    let resp = get(&engine, "/v2/hello/ferris");
    assert_eq!(body_str(&resp), "hello ferris, you're at /v2/hello/ferris\n");

    let resp = get(&engine, "/v2/files/a/b.txt");
    assert_eq!(body_str(&resp), r#"{"filepath":"a/b.txt"}"#);

    let req = Request::builder()
        .method(Method::POST)
        .uri("/v2/login")
        .header("Content-Type", "application/x-www-form-urlencoded")
        .body(b"username=ferris&password=1234".to_vec())
        .unwrap();
    let resp = engine.handle(req);
    let json: serde_json::Value = serde_json::from_slice(resp.body()).unwrap();
    assert_eq!(json["username"], "ferris");
    assert_eq!(json["password"], "1234");
}

#[test]
fn test_panic_route_is_recovered() {
    let engine = engine_with(&ServerConfig::default());
    let resp = get(&engine, "/panic");
    assert_eq!(resp.status(), 500);
}

#[test]
fn test_configured_directories() {
    let static_dir = tempfile::tempdir().unwrap();
    fs::create_dir(static_dir.path().join("css")).unwrap();
    fs::write(static_dir.path().join("css/style.css"), "p {}").unwrap();

    let templates_dir = tempfile::tempdir().unwrap();
    fs::write(templates_dir.path().join("css.tmpl"), "<p>custom index</p>").unwrap();

    let config = ServerConfig {
        static_dir: Some(static_dir.path().to_path_buf()),
        templates_dir: Some(templates_dir.path().to_path_buf()),
        ..ServerConfig::default()
    };
    let engine = engine_with(&config);

    let resp = get(&engine, "/assets/css/style.css");
    assert_eq!(resp.status(), 200);
    assert_eq!(body_str(&resp), "p {}");

    let resp = get(&engine, "/");
    assert_eq!(body_str(&resp), "<p>custom index</p>");
}

#[test]
fn test_bad_templates_dir_is_an_error() {
    let config = ServerConfig {
        templates_dir: Some("/definitely/not/here".into()),
        ..ServerConfig::default()
    };
    assert!(build_engine(&config).is_err());
}
