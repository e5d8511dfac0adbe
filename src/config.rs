//! # Configuration Module
//!
//! Server configuration loaded from an optional YAML file and then overridden
//! by environment variables.
//!
//! ## File format
//!
//! ```yaml
//! addr: 127.0.0.1:8080
//! workers: 4
//! static_dir: ./static
//! templates_dir: ./templates
//! log:
//!   level: info
//!   format: pretty
//! ```
//!
//! Every key is optional.
//!
//! ## Environment Variables
//!
//! | Variable               | Overrides      |
//! |------------------------|----------------|
//! | `TINYROUTE_ADDR`       | `addr`         |
//! | `TINYROUTE_WORKERS`    | `workers`      |
//! | `TINYROUTE_LOG_LEVEL`  | `log.level`    |
//! | `TINYROUTE_LOG_FORMAT` | `log.format`   |
//!
//! `TINYROUTE_WORKERS` accepts decimal or `0x`-prefixed hexadecimal; values
//! that do not parse are ignored with a warning.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::env;
use std::path::{Path, PathBuf};
use tracing::warn;

/// Default listen address
pub const DEFAULT_ADDR: &str = "127.0.0.1:8080";
/// Default number of request worker threads
pub const DEFAULT_WORKERS: usize = 4;

/// Logging section of the configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LogSettings {
    /// `EnvFilter` directive, e.g. `info` or `tinyroute=debug`
    pub level: String,
    /// `json` or `pretty`
    pub format: String,
}

impl Default for LogSettings {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: "pretty".to_string(),
        }
    }
}

/// Configuration for the bundled server binary
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Address to listen on
    pub addr: String,
    /// Number of request worker threads
    pub workers: usize,
    /// Directory served under `/assets`
    pub static_dir: Option<PathBuf>,
    /// Directory whose files are loaded as HTML templates
    pub templates_dir: Option<PathBuf>,
    /// Logging settings
    pub log: LogSettings,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            addr: DEFAULT_ADDR.to_string(),
            workers: DEFAULT_WORKERS,
            static_dir: None,
            templates_dir: None,
            log: LogSettings::default(),
        }
    }
}

impl ServerConfig {
    /// Parse a YAML document
    pub fn from_yaml(content: &str) -> Result<Self> {
        serde_yaml::from_str(content).context("invalid server configuration")
    }

    /// Read and parse a YAML file
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read config file {}", path.display()))?;
        Self::from_yaml(&content).with_context(|| format!("in {}", path.display()))
    }

    /// File (if any) plus environment overrides
    pub fn from_sources(path: Option<&Path>) -> Result<Self> {
        let mut config = match path {
            Some(path) => Self::load(path)?,
            None => Self::default(),
        };
        config.apply_env();
        Ok(config)
    }

    /// Apply `TINYROUTE_*` environment overrides
    pub fn apply_env(&mut self) {
        self.apply_overrides(|key| env::var(key).ok());
    }

    pub(crate) fn apply_overrides<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(addr) = lookup("TINYROUTE_ADDR") {
            self.addr = addr;
        }
        if let Some(val) = lookup("TINYROUTE_WORKERS") {
            match parse_usize(&val) {
                Some(workers) if workers > 0 => self.workers = workers,
                _ => warn!(value = %val, "Ignoring invalid TINYROUTE_WORKERS"),
            }
        }
        if let Some(level) = lookup("TINYROUTE_LOG_LEVEL") {
            self.log.level = level;
        }
        if let Some(format) = lookup("TINYROUTE_LOG_FORMAT") {
            self.log.format = format;
        }
    }
}

fn parse_usize(val: &str) -> Option<usize> {
    match val.strip_prefix("0x") {
        Some(hex) => usize::from_str_radix(hex, 16).ok(),
        None => val.parse().ok(),
    }
}
