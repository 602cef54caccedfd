//! Navigation node model.

use serde::Serialize;

/// One entry in the site's hierarchical navigation structure.
///
/// Parents exclusively own their children; the tree of root nodes is the
/// sole ownership structure. Children are always sorted by `order`, with
/// lexicographic title tie-break.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct NavNode {
    /// Stable identifier derived from the source file path.
    pub id: String,
    /// Display title.
    pub title: String,
    /// URL path (normalized, leading slash).
    pub url_path: String,
    /// Sibling order; lower sorts first. Either explicit from metadata or
    /// assigned from alphabetical rank.
    pub order: i64,
    /// Distance from the root level (0 for roots).
    pub depth: usize,
    /// Parent node id, `None` for roots.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub parent_id: Option<String>,
    /// Hidden nodes stay in the tree for breadcrumb correctness but are
    /// excluded from visible-children listings.
    pub hidden: bool,
    /// Source modification time (Unix seconds).
    pub last_modified: i64,
    /// Child nodes, sorted.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<NavNode>,
}

impl NavNode {
    /// Children that should appear in rendered navigation.
    pub fn visible_children(&self) -> impl Iterator<Item = &NavNode> {
        self.children.iter().filter(|child| !child.hidden)
    }
}

/// Breadcrumb entry: the display slice of an active-trail node.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct Breadcrumb {
    /// Display title.
    pub title: String,
    /// Link target path.
    pub url_path: String,
}

/// Render-local navigation view with per-request flags.
///
/// Produced by [`NavTree::annotate`](crate::NavTree::annotate); the shared
/// tree is never mutated, each request gets fresh copies. Hidden nodes are
/// already filtered out.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct AnnotatedNode {
    /// Display title.
    pub title: String,
    /// Link target path.
    pub url_path: String,
    /// Whether this node matches the currently rendered page.
    pub active: bool,
    /// Whether this node lies on the active trail (ancestor-or-self of
    /// the current page).
    pub in_trail: bool,
    /// Visible children, annotated recursively.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<AnnotatedNode>,
}

/// Derive a stable node id from a source file path.
///
/// Lowercases and collapses every non-alphanumeric run to a single hyphen:
/// `blog/posts/My-Post.md` becomes `blog-posts-my-post-md`. The same path
/// always yields the same id.
#[must_use]
pub fn node_id(file_path: &str) -> String {
    let mut out = String::with_capacity(file_path.len());
    let mut pending_hyphen = false;
    for ch in file_path.chars() {
        if ch.is_ascii_alphanumeric() {
            if pending_hyphen && !out.is_empty() {
                out.push('-');
            }
            pending_hyphen = false;
            out.extend(ch.to_lowercase());
        } else {
            pending_hyphen = true;
        }
    }
    out
}

/// Normalize a URL path: leading slash, no trailing slash, `/` for root.
#[must_use]
pub fn normalize_path(path: &str) -> String {
    let trimmed = path.trim().trim_matches('/');
    if trimmed.is_empty() {
        return "/".to_owned();
    }
    format!("/{trimmed}")
}

/// Parent candidate of a normalized path: `/a/b/c` -> `/a/b`, `/a` -> `/`,
/// `/` -> `None`.
#[must_use]
pub fn parent_path(path: &str) -> Option<String> {
    if path == "/" {
        return None;
    }
    match path.rsplit_once('/') {
        Some(("", _)) => Some("/".to_owned()),
        Some((parent, _)) => Some(parent.to_owned()),
        None => None,
    }
}
