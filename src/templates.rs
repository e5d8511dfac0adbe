//! HTML template support backed by `minijinja`.
//!
//! The engine owns one [`Templates`] set. Helper functions are registered on
//! the underlying environment before templates are loaded, and handlers render
//! by name through [`Context::html_template`](crate::dispatcher::Context::html_template).

use anyhow::{Context as _, Result};
use minijinja::{AutoEscape, Environment};
use serde::Serialize;
use std::fs;
use std::path::Path;
use tracing::{debug, info};

/// Named HTML templates plus their helper functions
#[derive(Debug)]
pub struct Templates {
    env: Environment<'static>,
}

impl Default for Templates {
    fn default() -> Self {
        Self::new()
    }
}

impl Templates {
    /// Empty set with the builtin filters; every template is HTML-escaped
    /// regardless of its file extension.
    #[must_use]
    pub fn new() -> Self {
        let mut env = Environment::new();
        env.set_auto_escape_callback(|_| AutoEscape::Html);
        Self { env }
    }

    /// Environment for registering functions, filters and globals.
    pub fn env_mut(&mut self) -> &mut Environment<'static> {
        &mut self.env
    }

    /// Add (or replace) a template from source.
    pub fn add(&mut self, name: impl Into<String>, source: impl Into<String>) -> Result<()> {
        let name = name.into();
        self.env
            .add_template_owned(name.clone(), source.into())
            .with_context(|| format!("failed to parse template '{name}'"))
    }

    /// Load every regular file in `dir` as a template named after its file name.
    ///
    /// Returns the number of templates loaded.
    pub fn load_dir(&mut self, dir: impl AsRef<Path>) -> Result<usize> {
        let dir = dir.as_ref();
        let mut paths = Vec::new();
        for entry in fs::read_dir(dir)
            .with_context(|| format!("failed to read template directory {}", dir.display()))?
        {
            let path = entry?.path();
            if path.is_file() {
                paths.push(path);
            }
        }
        paths.sort();

        for path in &paths {
            let Some(name) = path.file_name().and_then(|n| n.to_str()) else {
                debug!(path = %path.display(), "Skipping template with non UTF-8 name");
                continue;
            };
            let source = fs::read_to_string(path)
                .with_context(|| format!("failed to read template {}", path.display()))?;
            self.add(name, source)?;
        }
        info!(dir = %dir.display(), count = paths.len(), "Templates loaded");
        Ok(paths.len())
    }

    /// Render the template `name` with `ctx`.
    pub fn render<S: Serialize>(&self, name: &str, ctx: S) -> Result<String, minijinja::Error> {
        self.env.get_template(name)?.render(ctx)
    }

    /// True when a template with this name is loaded
    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.env.get_template(name).is_ok()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_render_with_function() {
        let mut templates = Templates::new();
        templates
            .env_mut()
            .add_function("shout", |s: String| s.to_uppercase());
        templates.add("hello.tmpl", "<h1>{{ shout(name) }}</h1>").unwrap();
        let out = templates.render("hello.tmpl", json!({ "name": "ferris" })).unwrap();
        assert_eq!(out, "<h1>FERRIS</h1>");
    }

    #[test]
    fn test_values_are_html_escaped() {
        let mut templates = Templates::new();
        templates.add("x.tmpl", "<p>{{ v }}</p>").unwrap();
        let out = templates.render("x.tmpl", json!({ "v": "<b>" })).unwrap();
        assert_eq!(out, "<p>&lt;b&gt;</p>");
    }

    #[test]
    fn test_missing_template_is_an_error() {
        let templates = Templates::new();
        assert!(!templates.contains("nope"));
        assert!(templates.render("nope", json!({})).is_err());
    }

    #[test]
    fn test_load_dir() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("a.tmpl"), "A{{ x }}").unwrap();
        fs::write(dir.path().join("b.tmpl"), "B").unwrap();
        fs::create_dir(dir.path().join("nested")).unwrap();

        let mut templates = Templates::new();
        assert_eq!(templates.load_dir(dir.path()).unwrap(), 2);
        assert_eq!(templates.render("a.tmpl", json!({ "x": 1 })).unwrap(), "A1");
        assert!(templates.contains("b.tmpl"));
    }
}
