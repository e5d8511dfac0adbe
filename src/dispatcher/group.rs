use http::Method;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::debug;

use super::context::{handler, Context, HandlerFunc};
use super::core::Engine;
use crate::router::RouteError;
use crate::static_files::StaticFiles;

/// Handle on one route group of an [`Engine`].
///
/// A group is a path prefix (its ancestors' prefixes plus its own suffix) with
/// its own middleware list. Groups live in the engine for its whole lifetime;
/// this handle only borrows the engine while configuring.
///
/// ```rust
/// use tinyroute::dispatcher::{handler, Engine};
///
/// let mut engine = Engine::new();
/// let mut v1 = engine.group("/v1");
/// v1.use_middleware([handler(|c| c.next())]);
/// v1.get("/hello", |c| c.string(200, "hello"));
/// let admin = v1.group("/admin");
/// assert_eq!(admin.prefix(), "/v1/admin");
/// ```
pub struct RouterGroup<'e> {
    engine: &'e mut Engine,
    index: usize,
}

impl<'e> RouterGroup<'e> {
    pub(crate) fn new(engine: &'e mut Engine, index: usize) -> Self {
        Self { engine, index }
    }

    /// Full prefix of this group
    #[must_use]
    pub fn prefix(&self) -> &str {
        &self.engine.group_data(self.index).prefix
    }

    /// Create a nested group with prefix `self.prefix() + suffix`.
    pub fn group(&mut self, suffix: &str) -> RouterGroup<'_> {
        let index = self.engine.add_group(self.index, suffix);
        RouterGroup::new(self.engine, index)
    }

    /// Handle on the group this one was created from (`None` for the root).
    #[must_use]
    pub fn parent(self) -> Option<RouterGroup<'e>> {
        let parent = self.engine.group_data(self.index).parent?;
        Some(RouterGroup::new(self.engine, parent))
    }

    /// Append middleware to this group.
    ///
    /// It runs for every request whose path starts with this group's prefix,
    /// whether or not the matched route was registered through this group.
    pub fn use_middleware<I>(&mut self, middlewares: I)
    where
        I: IntoIterator<Item = HandlerFunc>,
    {
        let group = self.engine.group_data_mut(self.index);
        let before = group.middlewares.len();
        group.middlewares.extend(middlewares);
        debug!(
            prefix = %group.prefix,
            added = group.middlewares.len() - before,
            total = group.middlewares.len(),
            "Middleware attached"
        );
    }

    fn full_pattern(&self, comp: &str) -> String {
        format!("{}{}", self.prefix(), comp)
    }

    /// Register `handler` for `method` at `prefix + comp`.
    pub fn add_route(&mut self, method: Method, comp: &str, handler: HandlerFunc) {
        let pattern = self.full_pattern(comp);
        self.engine.router_mut().add_route(method, &pattern, handler);
    }

    /// Like [`add_route`](Self::add_route) but rejects invalid patterns.
    pub fn try_add_route(
        &mut self,
        method: Method,
        comp: &str,
        handler: HandlerFunc,
    ) -> Result<(), RouteError> {
        let pattern = self.full_pattern(comp);
        self.engine
            .router_mut()
            .try_add_route(method, &pattern, handler)
    }

    /// `GET` route
    pub fn get<F>(&mut self, comp: &str, f: F)
    where
        F: Fn(&mut Context<'_>) + Send + Sync + 'static,
    {
        self.add_route(Method::GET, comp, handler(f));
    }

    /// `POST` route
    pub fn post<F>(&mut self, comp: &str, f: F)
    where
        F: Fn(&mut Context<'_>) + Send + Sync + 'static,
    {
        self.add_route(Method::POST, comp, handler(f));
    }

    /// `PUT` route
    pub fn put<F>(&mut self, comp: &str, f: F)
    where
        F: Fn(&mut Context<'_>) + Send + Sync + 'static,
    {
        self.add_route(Method::PUT, comp, handler(f));
    }

    /// `DELETE` route
    pub fn delete<F>(&mut self, comp: &str, f: F)
    where
        F: Fn(&mut Context<'_>) + Send + Sync + 'static,
    {
        self.add_route(Method::DELETE, comp, handler(f));
    }

    /// `PATCH` route
    pub fn patch<F>(&mut self, comp: &str, f: F)
    where
        F: Fn(&mut Context<'_>) + Send + Sync + 'static,
    {
        self.add_route(Method::PATCH, comp, handler(f));
    }

    /// `HEAD` route
    pub fn head<F>(&mut self, comp: &str, f: F)
    where
        F: Fn(&mut Context<'_>) + Send + Sync + 'static,
    {
        self.add_route(Method::HEAD, comp, handler(f));
    }

    /// `OPTIONS` route
    pub fn options<F>(&mut self, comp: &str, f: F)
    where
        F: Fn(&mut Context<'_>) + Send + Sync + 'static,
    {
        self.add_route(Method::OPTIONS, comp, handler(f));
    }

    /// Serve the files below `root` under `relative`.
    ///
    /// Registers `GET relative/*filepath`. Missing files (and paths that try to
    /// leave `root`) get a bare `404`.
    pub fn static_dir(&mut self, relative: &str, root: impl Into<PathBuf>) {
        let files = Arc::new(StaticFiles::new(root));
        let pattern = format!("{}/*filepath", relative.trim_end_matches('/'));
        self.get(&pattern, move |c| {
            let file = c.param("filepath").to_string();
            match files.load(&file) {
                Ok((bytes, content_type)) => {
                    c.set_header("Content-Type", content_type);
                    c.data(200, bytes);
                }
                Err(err) => {
                    debug!(request_id = %c.request_id, file = %file, error = %err, "Static file not served");
                    c.status(404);
                }
            }
        });
    }
}
