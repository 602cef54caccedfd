//! Immutable navigation tree with derived, non-owning views.
//!
//! A [`NavTree`] is built once per build cycle from a fresh content
//! listing and never mutated afterwards, so concurrent page renders can
//! share it without locking. Per-request state (active flags, breadcrumb
//! trails) is computed into fresh values by [`NavTree::active_trail`],
//! [`NavTree::breadcrumbs`] and [`NavTree::annotate`], never written back
//! onto shared nodes.

use std::collections::{HashMap, HashSet};

use crate::node::{normalize_path, AnnotatedNode, Breadcrumb, NavNode};

/// Location of a node in the tree: root index, then child indices.
pub(crate) type NodePath = Vec<usize>;

/// The canonical navigation structure for one build.
///
/// `roots` is the sole ownership structure; the id and URL indexes store
/// child-index paths, not nodes, so they never own and only look up.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct NavTree {
    roots: Vec<NavNode>,
    ids: HashMap<String, NodePath>,
    urls: HashMap<String, NodePath>,
}

impl NavTree {
    /// Assemble a tree from materialized root nodes, indexing every node
    /// by id and URL path.
    pub(crate) fn from_roots(roots: Vec<NavNode>) -> Self {
        let mut ids = HashMap::new();
        let mut urls = HashMap::new();
        let mut stack: Vec<NodePath> = (0..roots.len()).map(|i| vec![i]).collect();

        while let Some(path) = stack.pop() {
            let node = node_at(&roots, &path);
            ids.insert(node.id.clone(), path.clone());
            urls.insert(node.url_path.clone(), path.clone());
            for child in 0..node.children.len() {
                let mut child_path = path.clone();
                child_path.push(child);
                stack.push(child_path);
            }
        }

        Self { roots, ids, urls }
    }

    /// Top-level nodes, sorted.
    #[must_use]
    pub fn roots(&self) -> &[NavNode] {
        &self.roots
    }

    /// Total number of nodes in the tree.
    #[must_use]
    pub fn len(&self) -> usize {
        self.ids.len()
    }

    /// Whether the tree has no nodes.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.roots.is_empty()
    }

    /// Look up a node by its stable id.
    #[must_use]
    pub fn get(&self, id: &str) -> Option<&NavNode> {
        self.ids.get(id).map(|path| node_at(&self.roots, path))
    }

    /// Look up a node by URL path (normalized before lookup).
    #[must_use]
    pub fn get_by_url(&self, url_path: &str) -> Option<&NavNode> {
        self.urls
            .get(&normalize_path(url_path))
            .map(|path| node_at(&self.roots, path))
    }

    /// The path from a root down to the node matching `current_path`,
    /// root-first, including the matching node itself.
    ///
    /// Empty when `current_path` matches no node.
    #[must_use]
    pub fn active_trail(&self, current_path: &str) -> Vec<&NavNode> {
        let Some(path) = self.urls.get(&normalize_path(current_path)) else {
            return Vec::new();
        };

        let mut trail = Vec::with_capacity(path.len());
        let mut nodes: &[NavNode] = &self.roots;
        for &index in path {
            let node = &nodes[index];
            trail.push(node);
            nodes = &node.children;
        }
        trail
    }

    /// The active trail exposed as ordered title/URL pairs for display.
    ///
    /// Hidden ancestors are included: a breadcrumb trail with gaps would
    /// misrepresent the hierarchy.
    #[must_use]
    pub fn breadcrumbs(&self, current_path: &str) -> Vec<Breadcrumb> {
        self.active_trail(current_path)
            .into_iter()
            .map(|node| Breadcrumb {
                title: node.title.clone(),
                url_path: node.url_path.clone(),
            })
            .collect()
    }

    /// Produce a render-local annotated view for `current_path`.
    ///
    /// Returns fresh copies carrying `active`/`in_trail` flags; the shared
    /// tree is left untouched. Hidden nodes are excluded, since this view
    /// feeds rendered navigation.
    #[must_use]
    pub fn annotate(&self, current_path: &str) -> Vec<AnnotatedNode> {
        let current = normalize_path(current_path);
        let trail_ids: HashSet<&str> = self
            .active_trail(&current)
            .into_iter()
            .map(|node| node.id.as_str())
            .collect();

        self.roots
            .iter()
            .filter(|node| !node.hidden)
            .map(|node| annotate_node(node, &current, &trail_ids))
            .collect()
    }
}

/// Walk a child-index path down from the root list.
///
/// Index paths always hold at least the root position.
fn node_at<'a>(roots: &'a [NavNode], path: &[usize]) -> &'a NavNode {
    let (&first, rest) = path
        .split_first()
        .unwrap_or_else(|| unreachable!("index paths hold at least the root position"));
    rest.iter()
        .fold(&roots[first], |node, &index| &node.children[index])
}

fn annotate_node(node: &NavNode, current: &str, trail_ids: &HashSet<&str>) -> AnnotatedNode {
    AnnotatedNode {
        title: node.title.clone(),
        url_path: node.url_path.clone(),
        active: node.url_path == current,
        in_trail: trail_ids.contains(node.id.as_str()),
        children: node
            .visible_children()
            .map(|child| annotate_node(child, current, trail_ids))
            .collect(),
    }
}
