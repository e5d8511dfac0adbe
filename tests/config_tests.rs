use std::fs;
use tinyroute::config::{ServerConfig, DEFAULT_ADDR};

#[test]
fn test_load_from_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("tinyroute.yaml");
    fs::write(
        &path,
        "addr: 127.0.0.1:9999\nworkers: 2\ntemplates_dir: ./templates\n",
    )
    .unwrap();

    let config = ServerConfig::load(&path).unwrap();
    assert_eq!(config.addr, "127.0.0.1:9999");
    assert_eq!(config.workers, 2);
    assert_eq!(
        config.templates_dir.as_deref(),
        Some(std::path::Path::new("./templates"))
    );
    assert!(config.static_dir.is_none());
}

#[test]
fn test_missing_file_is_an_error() {
    let dir = tempfile::tempdir().unwrap();
    let err = ServerConfig::load(&dir.path().join("absent.yaml")).unwrap_err();
    assert!(format!("{err:#}").contains("failed to read config file"));
}

#[test]
fn test_unknown_types_are_rejected() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("bad.yaml");
    fs::write(&path, "workers: [1, 2]\n").unwrap();
    assert!(ServerConfig::load(&path).is_err());
}

#[test]
fn test_defaults_without_file() {
    let config = ServerConfig::default();
    assert_eq!(config.addr, DEFAULT_ADDR);
    assert_eq!(config.log.level, "info");
}
