//! Router core module - hot path for request routing.
//!
//! Holds the per-method trie roots and the route table. Registration writes
//! both; lookup walks the trie and then fetches the handler for the exact
//! pattern that was found.

use http::Method;
use smallvec::SmallVec;
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;
use tracing::{debug, info, warn};

use super::trie::{parse_pattern, Node};
use crate::dispatcher::HandlerFunc;

/// Maximum number of path parameters before heap allocation.
pub const MAX_INLINE_PARAMS: usize = 8;

/// Captured path parameters, in pattern order.
///
/// Names are `Arc<str>` and values are per-request `String`s. Lookups scan from
/// the end, so a name repeated inside one pattern resolves to its last capture.
pub type ParamVec = SmallVec<[(Arc<str>, String); MAX_INLINE_PARAMS]>;

/// Reason a pattern was rejected by [`Router::try_add_route`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RouteError {
    /// Pattern does not start with `/`
    MissingLeadingSlash {
        /// The offending pattern
        pattern: String,
    },
    /// A `*name` segment is followed by more segments
    SegmentsAfterWildcard {
        /// The offending pattern
        pattern: String,
    },
}

impl fmt::Display for RouteError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RouteError::MissingLeadingSlash { pattern } => {
                write!(f, "route pattern '{}' must begin with '/'", pattern)
            }
            RouteError::SegmentsAfterWildcard { pattern } => {
                write!(
                    f,
                    "route pattern '{}' has segments after its '*' wildcard; \
                    a wildcard must be the last segment",
                    pattern
                )
            }
        }
    }
}

impl std::error::Error for RouteError {}

/// Check a pattern against the registration rules.
pub fn validate_pattern(pattern: &str) -> Result<(), RouteError> {
    if !pattern.starts_with('/') {
        return Err(RouteError::MissingLeadingSlash {
            pattern: pattern.to_string(),
        });
    }
    let mut segments = pattern.split('/').filter(|s| !s.is_empty());
    if segments.any(|s| s.starts_with('*')) && segments.next().is_some() {
        return Err(RouteError::SegmentsAfterWildcard {
            pattern: pattern.to_string(),
        });
    }
    Ok(())
}

/// Result of matching a request against the router
#[derive(Clone)]
pub struct RouteMatch<'r> {
    /// The registered pattern that matched (e.g. `/p/:lang/doc`)
    pub pattern: &'r str,
    /// Handler registered for (method, pattern)
    pub handler: &'r HandlerFunc,
    /// Parameters captured from the request path
    pub path_params: ParamVec,
}

impl RouteMatch<'_> {
    /// Get a path parameter by name (last capture wins)
    #[inline]
    #[must_use]
    pub fn get_path_param(&self, name: &str) -> Option<&str> {
        self.path_params
            .iter()
            .rfind(|(k, _)| k.as_ref() == name)
            .map(|(_, v)| v.as_str())
    }
}

impl fmt::Debug for RouteMatch<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RouteMatch")
            .field("pattern", &self.pattern)
            .field("path_params", &self.path_params)
            .finish_non_exhaustive()
    }
}

/// Route table plus one segment trie per HTTP method
#[derive(Default)]
pub struct Router {
    roots: HashMap<Method, Node>,
    handlers: HashMap<String, HandlerFunc>,
}

fn route_key(method: &Method, pattern: &str) -> String {
    format!("{}-{}", method, pattern)
}

impl Router {
    /// Create an empty router
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `handler` for (method, pattern).
    ///
    /// Registering the same (method, pattern) again replaces only the handler;
    /// the trie already holds the chain. Patterns that break the registration
    /// rules are logged and inserted anyway, with anything after a wildcard
    /// ignored by the trie.
    pub fn add_route(&mut self, method: Method, pattern: &str, handler: HandlerFunc) {
        if let Err(err) = validate_pattern(pattern) {
            warn!(method = %method, pattern = %pattern, error = %err, "Questionable route pattern");
        }
        self.insert(method, pattern, handler);
    }

    /// Register `handler` for (method, pattern), rejecting invalid patterns.
    pub fn try_add_route(
        &mut self,
        method: Method,
        pattern: &str,
        handler: HandlerFunc,
    ) -> Result<(), RouteError> {
        validate_pattern(pattern)?;
        self.insert(method, pattern, handler);
        Ok(())
    }

    fn insert(&mut self, method: Method, pattern: &str, handler: HandlerFunc) {
        let parts = parse_pattern(pattern);
        let key = route_key(&method, pattern);

        self.roots
            .entry(method.clone())
            .or_insert_with(Node::root)
            .insert(pattern, &parts, 0);

        if self.handlers.insert(key, handler).is_some() {
            warn!(method = %method, pattern = %pattern, "Replaced existing route handler");
        } else {
            info!(method = %method, pattern = %pattern, "Route registered");
        }
    }

    /// Resolve (method, path) to its handler and captured parameters.
    #[must_use]
    pub fn find(&self, method: &Method, path: &str) -> Option<RouteMatch<'_>> {
        let search_parts = parse_pattern(path);
        let root = self.roots.get(method)?;
        let node = root.search(&search_parts, 0)?;
        let pattern = node.pattern();

        let mut path_params = ParamVec::new();
        for (index, part) in parse_pattern(pattern).into_iter().enumerate() {
            if let Some(name) = part.strip_prefix(':') {
                if let Some(value) = search_parts.get(index) {
                    path_params.push((Arc::from(name), (*value).to_string()));
                }
            }
            if let Some(name) = part.strip_prefix('*') {
                if !name.is_empty() {
                    let rest = search_parts.get(index..).unwrap_or_default().join("/");
                    path_params.push((Arc::from(name), rest));
                }
                break;
            }
        }

        let Some(handler) = self.handlers.get(&route_key(method, pattern)) else {
            debug!(method = %method, pattern = %pattern, "Trie node without a route table entry");
            return None;
        };

        Some(RouteMatch {
            pattern,
            handler,
            path_params,
        })
    }

    /// Handler stored for the exact (method, pattern) key
    #[must_use]
    pub fn handler(&self, method: &Method, pattern: &str) -> Option<&HandlerFunc> {
        self.handlers.get(&route_key(method, pattern))
    }

    /// Registered patterns for one method, in trie (depth-first) order
    #[must_use]
    pub fn routes(&self, method: &Method) -> Vec<&str> {
        self.roots
            .get(method)
            .map(|root| root.travel().into_iter().map(Node::pattern).collect())
            .unwrap_or_default()
    }

    /// Every registered (method, pattern), sorted by method then trie order
    #[must_use]
    pub fn all_routes(&self) -> Vec<(Method, String)> {
        let mut methods: Vec<&Method> = self.roots.keys().collect();
        methods.sort_by(|a, b| a.as_str().cmp(b.as_str()));
        methods
            .into_iter()
            .flat_map(|method| {
                self.routes(method)
                    .into_iter()
                    .map(move |pattern| (method.clone(), pattern.to_string()))
            })
            .collect()
    }

    /// Number of entries in the route table
    #[must_use]
    pub fn len(&self) -> usize {
        self.handlers.len()
    }

    /// True when nothing has been registered
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.handlers.is_empty()
    }
}

impl fmt::Debug for Router {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Router")
            .field("routes", &self.all_routes())
            .finish()
    }
}
