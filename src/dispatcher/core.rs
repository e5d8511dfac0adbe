//! Dispatcher core module - hot path for request dispatch.
//!
//! Per request: percent-decode the path, collect middleware from every group
//! whose prefix the decoded path starts with, look the route up, append the terminal handler and run the
//! chain from the start.

use http::{Method, Request, Response};
use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::debug;

use super::context::{handler, Context, HandlerFunc};
use super::group::RouterGroup;
use crate::router::{RouteError, Router};
use crate::templates::Templates;

pub(crate) struct GroupData {
    pub(crate) prefix: String,
    pub(crate) middlewares: Vec<HandlerFunc>,
    pub(crate) parent: Option<usize>,
}

/// The request dispatcher.
///
/// Owns the flat group registry (root group first), the router and the HTML
/// templates. Configure it through `&mut self` (groups, middleware, routes),
/// then serve through `&self`: [`Engine::handle`] never mutates, so a
/// configured engine can be shared across request threads without locks.
pub struct Engine {
    groups: Vec<GroupData>,
    router: Router,
    templates: Templates,
    not_found: HandlerFunc,
}

impl Default for Engine {
    fn default() -> Self {
        Self::new()
    }
}

impl Engine {
    /// Create an engine with an empty root group (prefix `""`).
    #[must_use]
    pub fn new() -> Self {
        Engine {
            groups: vec![GroupData {
                prefix: String::new(),
                middlewares: Vec::new(),
                parent: None,
            }],
            router: Router::new(),
            templates: Templates::new(),
            not_found: handler(|c| {
                let body = format!("404 NOT FOUND: {}\n", c.path);
                c.string(404, body);
            }),
        }
    }

    /// Handle on the root group
    pub fn root(&mut self) -> RouterGroup<'_> {
        RouterGroup::new(self, 0)
    }

    /// Create a group below the root; shorthand for `root().group(prefix)`.
    pub fn group(&mut self, prefix: &str) -> RouterGroup<'_> {
        let index = self.add_group(0, prefix);
        RouterGroup::new(self, index)
    }

    pub(crate) fn add_group(&mut self, parent: usize, suffix: &str) -> usize {
        let prefix = format!("{}{}", self.groups[parent].prefix, suffix);
        debug!(prefix = %prefix, "Route group created");
        self.groups.push(GroupData {
            prefix,
            middlewares: Vec::new(),
            parent: Some(parent),
        });
        self.groups.len() - 1
    }

    pub(crate) fn group_data(&self, index: usize) -> &GroupData {
        &self.groups[index]
    }

    pub(crate) fn group_data_mut(&mut self, index: usize) -> &mut GroupData {
        &mut self.groups[index]
    }

    pub(crate) fn router_mut(&mut self) -> &mut Router {
        &mut self.router
    }

    /// Append middleware to the root group (applies to every request)
    pub fn use_middleware<I>(&mut self, middlewares: I)
    where
        I: IntoIterator<Item = HandlerFunc>,
    {
        self.root().use_middleware(middlewares);
    }

    /// Register a handler on the root group
    pub fn add_route(&mut self, method: Method, pattern: &str, handler: HandlerFunc) {
        self.root().add_route(method, pattern, handler);
    }

    /// Register a handler on the root group, rejecting invalid patterns
    pub fn try_add_route(
        &mut self,
        method: Method,
        pattern: &str,
        handler: HandlerFunc,
    ) -> Result<(), RouteError> {
        self.root().try_add_route(method, pattern, handler)
    }

    /// `GET` route on the root group
    pub fn get<F>(&mut self, pattern: &str, f: F)
    where
        F: Fn(&mut Context<'_>) + Send + Sync + 'static,
    {
        self.root().get(pattern, f);
    }

    /// `POST` route on the root group
    pub fn post<F>(&mut self, pattern: &str, f: F)
    where
        F: Fn(&mut Context<'_>) + Send + Sync + 'static,
    {
        self.root().post(pattern, f);
    }

    /// `PUT` route on the root group
    pub fn put<F>(&mut self, pattern: &str, f: F)
    where
        F: Fn(&mut Context<'_>) + Send + Sync + 'static,
    {
        self.root().put(pattern, f);
    }

    /// `DELETE` route on the root group
    pub fn delete<F>(&mut self, pattern: &str, f: F)
    where
        F: Fn(&mut Context<'_>) + Send + Sync + 'static,
    {
        self.root().delete(pattern, f);
    }

    /// `PATCH` route on the root group
    pub fn patch<F>(&mut self, pattern: &str, f: F)
    where
        F: Fn(&mut Context<'_>) + Send + Sync + 'static,
    {
        self.root().patch(pattern, f);
    }

    /// Serve files below `root` at `relative/*filepath` on the root group
    pub fn static_dir(&mut self, relative: &str, root: impl Into<PathBuf>) {
        self.root().static_dir(relative, root);
    }

    /// Templates available to [`Context::html_template`]
    pub fn templates_mut(&mut self) -> &mut Templates {
        &mut self.templates
    }

    /// Load every file of `dir` as an HTML template
    pub fn load_html_dir(&mut self, dir: impl AsRef<Path>) -> anyhow::Result<usize> {
        self.templates.load_dir(dir)
    }

    /// The route table and tries
    #[must_use]
    pub fn router(&self) -> &Router {
        &self.router
    }

    /// Every registered (method, pattern)
    #[must_use]
    pub fn routes(&self) -> Vec<(Method, String)> {
        self.router.all_routes()
    }

    /// Prefixes of all groups in registration order (root first)
    #[must_use]
    pub fn group_prefixes(&self) -> Vec<&str> {
        self.groups.iter().map(|g| g.prefix.as_str()).collect()
    }

    /// Middleware applying to `path`: every group whose prefix `path` starts
    /// with contributes its list, in registry order.
    #[must_use]
    pub fn middlewares_for(&self, path: &str) -> Vec<HandlerFunc> {
        self.groups
            .iter()
            .filter(|group| path.starts_with(&group.prefix))
            .flat_map(|group| group.middlewares.iter().map(Arc::clone))
            .collect()
    }

    /// Dispatch one request and return its response.
    pub fn handle(&self, req: Request<Vec<u8>>) -> Response<Vec<u8>> {
        let mut c = Context::new(req);
        for middleware in self.middlewares_for(&c.path) {
            c.push_handler(middleware);
        }
        c.set_templates(&self.templates);
        self.dispatch(&mut c);
        c.into_response()
    }

    /// Resolve the terminal handler for `c` and run its chain.
    pub fn dispatch(&self, c: &mut Context<'_>) {
        let middleware_count = c.handler_count();
        match self.router.find(&c.method, &c.path) {
            Some(route) => {
                debug!(
                    request_id = %c.request_id,
                    method = %c.method,
                    path = %c.path,
                    pattern = %route.pattern,
                    middlewares = middleware_count,
                    "Route matched"
                );
                c.params = route.path_params;
                c.push_handler(Arc::clone(route.handler));
            }
            None => {
                debug!(
                    request_id = %c.request_id,
                    method = %c.method,
                    path = %c.path,
                    middlewares = middleware_count,
                    "No route matched"
                );
                c.push_handler(Arc::clone(&self.not_found));
            }
        }
        c.next();
    }
}

impl fmt::Debug for Engine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Engine")
            .field("groups", &self.group_prefixes())
            .field("router", &self.router)
            .finish_non_exhaustive()
    }
}
