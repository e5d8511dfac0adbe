//! Segment trie used for HTTP route matching
//!
//! One tree is kept per HTTP method. Every node stands for a single `/`-delimited
//! segment of a registered pattern:
//!
//! - Literal segments (e.g. `users`) match a request segment exactly
//! - `:name` segments match any single request segment
//! - `*name` segments match every remaining request segment and must be last
//!
//! Only the node that terminates a registered pattern carries that pattern; the
//! intermediate nodes along the way keep an empty one.
//!
//! ## Child ordering
//!
//! Children are kept in first-insertion order and both insertion and lookup scan
//! them in that order, taking the first child that is either an exact literal
//! match or a capture. A capture created before a literal sibling therefore
//! wins over it, for later insertions and for lookups alike:
//!
//! ```text
//! register  /p/:lang      ->  p ─ :lang
//! register  /p/go/doc     ->  p ─ :lang ─ doc      (reuses :lang, no `go` node)
//! request   /p/rust/doc   ->  pattern /p/go/doc
//! ```
//!
//! The router relies on this ordering; it is not a most-specific-match router.

/// Split a pattern or request path into its non-empty segments.
///
/// Parsing stops after the first segment starting with `*`, so anything that
/// follows a wildcard is ignored.
#[must_use]
pub fn parse_pattern(pattern: &str) -> Vec<&str> {
    let mut parts = Vec::new();
    for item in pattern.split('/') {
        if item.is_empty() {
            continue;
        }
        parts.push(item);
        if item.starts_with('*') {
            break;
        }
    }
    parts
}

/// Returns true for `:name` and `*name` segments.
#[inline]
#[must_use]
pub fn is_capture(part: &str) -> bool {
    part.starts_with(':') || part.starts_with('*')
}

/// Node in the segment trie
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Node {
    /// Full registered pattern; non-empty only on terminal nodes
    pattern: String,
    /// The segment this node stands for (`users`, `:id`, `*filepath`)
    part: String,
    /// Children in first-insertion order
    children: Vec<Node>,
    /// True when `part` starts with `:` or `*`
    is_wild: bool,
}

impl Node {
    /// Create an empty root node
    #[must_use]
    pub fn root() -> Self {
        Self::default()
    }

    fn with_part(part: &str) -> Self {
        Self {
            pattern: String::new(),
            part: part.to_string(),
            children: Vec::new(),
            is_wild: is_capture(part),
        }
    }

    /// Registered pattern terminating at this node (empty if none)
    #[inline]
    #[must_use]
    pub fn pattern(&self) -> &str {
        &self.pattern
    }

    /// Segment text this node represents
    #[inline]
    #[must_use]
    pub fn part(&self) -> &str {
        &self.part
    }

    /// Whether this node captures a parameter
    #[inline]
    #[must_use]
    pub fn is_wild(&self) -> bool {
        self.is_wild
    }

    /// Insert `parts[height..]` below this node, marking the last node with `pattern`.
    ///
    /// Existing chains are reused, so inserting the same pattern twice does not
    /// create new nodes.
    pub fn insert(&mut self, pattern: &str, parts: &[&str], height: usize) {
        if parts.len() == height {
            self.pattern = pattern.to_string();
            return;
        }

        let part = parts[height];
        let position = match self.match_child(part) {
            Some(position) => position,
            None => {
                self.children.push(Node::with_part(part));
                self.children.len() - 1
            }
        };
        self.children[position].insert(pattern, parts, height + 1);
    }

    /// Find the terminal node matching `parts[height..]`.
    ///
    /// A `*` node consumes everything that is left, so there is no backtracking
    /// once one is reached.
    #[must_use]
    pub fn search(&self, parts: &[&str], height: usize) -> Option<&Node> {
        if parts.len() == height || self.part.starts_with('*') {
            if self.pattern.is_empty() {
                return None;
            }
            return Some(self);
        }

        let part = parts[height];
        self.children
            .iter()
            .filter(|child| child.part == part || child.is_wild)
            .find_map(|child| child.search(parts, height + 1))
    }

    /// Depth-first list of every terminal node below (and including) this one
    #[must_use]
    pub fn travel(&self) -> Vec<&Node> {
        let mut list = Vec::new();
        self.collect(&mut list);
        list
    }

    fn collect<'n>(&'n self, list: &mut Vec<&'n Node>) {
        if !self.pattern.is_empty() {
            list.push(self);
        }
        for child in &self.children {
            child.collect(list);
        }
    }

    // First child that is an exact match or a capture.
    fn match_child(&self, part: &str) -> Option<usize> {
        self.children
            .iter()
            .position(|child| child.part == part || child.is_wild)
    }
}

impl std::fmt::Display for Node {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "node{{pattern={}, part={}, is_wild={}}}",
            self.pattern, self.part, self.is_wild
        )
    }
}
