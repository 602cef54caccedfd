//! Navigation tree construction from discovered content records.
//!
//! Hierarchy is inferred from URL paths (a record's parent is the nearest
//! discovered ancestor path) and can be overridden per record with an
//! explicit `parent` declaration. Construction is all-or-nothing: any
//! structural problem aborts the build and no tree is returned.

use std::collections::HashMap;

use crate::error::TreeError;
use crate::node::{node_id, normalize_path, parent_path, NavNode};
use crate::record::ContentRecord;
use crate::tree::NavTree;

impl NavTree {
    /// Build a navigation tree from a flat list of content records.
    ///
    /// - Parent inference: strip path segments until a discovered ancestor
    ///   is found; records with no discovered ancestor become roots.
    /// - An explicit `parent` override wins, but must name a discovered
    ///   record.
    /// - Explicit `order` values take precedence; unordered siblings are
    ///   sorted alphabetically by title and assigned ranks after the
    ///   highest explicit order, so re-runs over unchanged content produce
    ///   identical order numbers.
    /// - Records sharing a URL path are skipped after the first, with a
    ///   warning.
    ///
    /// # Errors
    ///
    /// - [`TreeError::DanglingParent`] if a declared parent is not in the
    ///   discovered set.
    /// - [`TreeError::CyclicHierarchy`] if parent declarations form a
    ///   cycle.
    pub fn build(records: &[ContentRecord]) -> Result<Self, TreeError> {
        let mut slots: Vec<&ContentRecord> = Vec::with_capacity(records.len());
        let mut paths: Vec<String> = Vec::with_capacity(records.len());
        let mut index: HashMap<String, usize> = HashMap::with_capacity(records.len());

        for record in records {
            let path = normalize_path(&record.url_path);
            if index.contains_key(&path) {
                tracing::warn!(
                    url_path = %path,
                    file_path = %record.file_path,
                    "duplicate URL path, record skipped"
                );
                continue;
            }
            index.insert(path.clone(), slots.len());
            slots.push(record);
            paths.push(path);
        }

        let parents = assign_parents(&slots, &paths, &index)?;
        let depths = compute_depths(&parents, &paths)?;
        let (orders, children, roots_order) = assign_orders(&slots, &parents);
        let ids = assign_ids(&slots);

        let arena = Arena {
            slots: &slots,
            paths: &paths,
            ids: &ids,
            orders: &orders,
            depths: &depths,
            children: &children,
        };
        let roots = roots_order
            .iter()
            .map(|&i| arena.materialize(i, None))
            .collect();

        Ok(Self::from_roots(roots))
    }
}

/// Resolve each record's parent index.
fn assign_parents(
    slots: &[&ContentRecord],
    paths: &[String],
    index: &HashMap<String, usize>,
) -> Result<Vec<Option<usize>>, TreeError> {
    let mut parents = Vec::with_capacity(slots.len());

    for (i, record) in slots.iter().enumerate() {
        let parent = if let Some(declared) = &record.parent {
            let declared = normalize_path(declared);
            match index.get(&declared) {
                Some(&parent_idx) => Some(parent_idx),
                None => {
                    return Err(TreeError::DanglingParent {
                        node: paths[i].clone(),
                        declared_parent: declared,
                    });
                }
            }
        } else {
            nearest_ancestor(&paths[i], index)
        };
        parents.push(parent);
    }

    Ok(parents)
}

/// Nearest discovered ancestor of a path, if any.
fn nearest_ancestor(path: &str, index: &HashMap<String, usize>) -> Option<usize> {
    let mut candidate = parent_path(path);
    while let Some(ancestor) = candidate {
        if let Some(&idx) = index.get(&ancestor) {
            return Some(idx);
        }
        candidate = parent_path(&ancestor);
    }
    None
}

/// Compute node depths by walking parent chains.
///
/// Chains are walked once each with in-progress marking, so a parent cycle
/// is detected rather than looping forever.
fn compute_depths(parents: &[Option<usize>], paths: &[String]) -> Result<Vec<usize>, TreeError> {
    const UNVISITED: u8 = 0;
    const IN_PROGRESS: u8 = 1;
    const DONE: u8 = 2;

    let mut state = vec![UNVISITED; parents.len()];
    let mut depths = vec![0usize; parents.len()];

    for start in 0..parents.len() {
        if state[start] == DONE {
            continue;
        }

        let mut chain: Vec<usize> = Vec::new();
        let mut current = start;
        let base_depth = loop {
            if state[current] == DONE {
                break depths[current] + 1;
            }
            if state[current] == IN_PROGRESS {
                // Revisited a node on the current chain: parent cycle.
                let pos = chain
                    .iter()
                    .position(|&n| n == current)
                    .unwrap_or_default();
                let mut cycle: Vec<String> =
                    chain[pos..].iter().map(|&n| paths[n].clone()).collect();
                cycle.push(paths[current].clone());
                return Err(TreeError::CyclicHierarchy { cycle });
            }
            state[current] = IN_PROGRESS;
            chain.push(current);
            match parents[current] {
                Some(parent) => current = parent,
                None => break 0,
            }
        };

        let mut depth = base_depth;
        for &node in chain.iter().rev() {
            depths[node] = depth;
            state[node] = DONE;
            depth += 1;
        }
    }

    Ok(depths)
}

/// Assign sibling orders and build sorted child lists.
///
/// Returns `(orders, children, root_order)` where `children[i]` and
/// `root_order` are already in final display order.
fn assign_orders(
    slots: &[&ContentRecord],
    parents: &[Option<usize>],
) -> (Vec<i64>, Vec<Vec<usize>>, Vec<usize>) {
    let mut groups: HashMap<Option<usize>, Vec<usize>> = HashMap::new();
    for (i, &parent) in parents.iter().enumerate() {
        groups.entry(parent).or_default().push(i);
    }

    let mut orders = vec![0i64; slots.len()];
    let mut children = vec![Vec::new(); slots.len()];
    let mut root_order = Vec::new();

    for (parent, members) in groups {
        let mut explicit: Vec<(i64, usize)> = Vec::new();
        let mut implicit: Vec<usize> = Vec::new();
        for &i in &members {
            match slots[i].order {
                Some(order) => explicit.push((order, i)),
                None => implicit.push(i),
            }
        }

        explicit.sort_by(|a, b| a.0.cmp(&b.0).then_with(|| slots[a.1].title.cmp(&slots[b.1].title)));
        implicit.sort_by(|&a, &b| slots[a].title.cmp(&slots[b].title));

        // Auto-assigned ranks continue after the highest explicit order,
        // keeping the "sorted by order, title tie-break" invariant intact.
        let base = explicit
            .iter()
            .map(|&(order, _)| order)
            .max()
            .map_or(0, |m| m.saturating_add(1));
        for (explicit_order, i) in &explicit {
            orders[*i] = *explicit_order;
        }
        for (rank, &i) in implicit.iter().enumerate() {
            let rank = i64::try_from(rank).unwrap_or(i64::MAX);
            orders[i] = base.saturating_add(rank);
        }

        let sorted: Vec<usize> = explicit
            .into_iter()
            .map(|(_, i)| i)
            .chain(implicit)
            .collect();
        match parent {
            Some(parent_idx) => children[parent_idx] = sorted,
            None => root_order = sorted,
        }
    }

    (orders, children, root_order)
}

/// Derive unique node ids, disambiguating slug collisions with a numeric
/// suffix in input order.
fn assign_ids(slots: &[&ContentRecord]) -> Vec<String> {
    let mut seen: HashMap<String, usize> = HashMap::new();
    let mut ids = Vec::with_capacity(slots.len());

    for record in slots {
        let base = node_id(&record.file_path);
        let count = seen.entry(base.clone()).or_insert(0);
        *count += 1;
        if *count == 1 {
            ids.push(base);
        } else {
            tracing::warn!(
                file_path = %record.file_path,
                id = %base,
                "node id collision, disambiguating with suffix"
            );
            ids.push(format!("{base}-{count}"));
        }
    }

    ids
}

/// Borrowed view over the build arrays used during materialization.
struct Arena<'a> {
    slots: &'a [&'a ContentRecord],
    paths: &'a [String],
    ids: &'a [String],
    orders: &'a [i64],
    depths: &'a [usize],
    children: &'a [Vec<usize>],
}

impl Arena<'_> {
    /// Recursively build the owning node for arena index `i`.
    fn materialize(&self, i: usize, parent_id: Option<&str>) -> NavNode {
        let record = self.slots[i];
        NavNode {
            id: self.ids[i].clone(),
            title: record.title.clone(),
            url_path: self.paths[i].clone(),
            order: self.orders[i],
            depth: self.depths[i],
            parent_id: parent_id.map(ToOwned::to_owned),
            hidden: record.hidden,
            last_modified: record.last_modified,
            children: self.children[i]
                .iter()
                .map(|&child| self.materialize(child, Some(&self.ids[i])))
                .collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn test_path_hierarchy_with_depths() {
        let tree = NavTree::build(&[
            ContentRecord::new("a.md", "/a", "A"),
            ContentRecord::new("a/b.md", "/a/b", "B"),
            ContentRecord::new("a/b/c.md", "/a/b/c", "C"),
        ])
        .unwrap();

        assert_eq!(tree.roots().len(), 1);
        let a = &tree.roots()[0];
        assert_eq!((a.url_path.as_str(), a.depth), ("/a", 0));
        let b = &a.children[0];
        assert_eq!((b.url_path.as_str(), b.depth), ("/a/b", 1));
        assert_eq!(b.parent_id.as_deref(), Some("a-md"));
        let c = &b.children[0];
        assert_eq!((c.url_path.as_str(), c.depth), ("/a/b/c", 2));
        assert!(c.children.is_empty());
    }

    #[test]
    fn test_missing_intermediate_attaches_to_nearest_ancestor() {
        let tree = NavTree::build(&[
            ContentRecord::new("a.md", "/a", "A"),
            ContentRecord::new("a/b/c.md", "/a/b/c", "C"),
        ])
        .unwrap();

        // "/a/b" was never discovered, so "/a/b/c" attaches to "/a".
        let a = &tree.roots()[0];
        assert_eq!(a.children.len(), 1);
        assert_eq!(a.children[0].url_path, "/a/b/c");
        assert_eq!(a.children[0].depth, 1);
    }

    #[test]
    fn test_record_without_ancestor_becomes_root() {
        let tree = NavTree::build(&[
            ContentRecord::new("a.md", "/a", "A"),
            ContentRecord::new("x/y.md", "/x/y", "Y"),
        ])
        .unwrap();

        let roots: Vec<_> = tree.roots().iter().map(|n| n.url_path.as_str()).collect();
        assert_eq!(roots, ["/a", "/x/y"]);
    }

    #[test]
    fn test_explicit_parent_overrides_path_derivation() {
        let tree = NavTree::build(&[
            ContentRecord::new("a.md", "/a", "A"),
            ContentRecord::new("b.md", "/b", "B").with_parent("/a"),
        ])
        .unwrap();

        assert_eq!(tree.roots().len(), 1);
        let a = &tree.roots()[0];
        assert_eq!(a.children[0].url_path, "/b");
        assert_eq!(a.children[0].depth, 1);
    }

    #[test]
    fn test_dangling_parent_fails_whole_build() {
        let result = NavTree::build(&[
            ContentRecord::new("a.md", "/a", "A"),
            ContentRecord::new("b.md", "/b", "B").with_parent("/nonexistent"),
        ]);

        let err = result.unwrap_err();
        assert!(matches!(
            err,
            TreeError::DanglingParent { node, declared_parent }
                if node == "/b" && declared_parent == "/nonexistent"
        ));
    }

    #[test]
    fn test_parent_cycle_detected() {
        let result = NavTree::build(&[
            ContentRecord::new("a.md", "/a", "A").with_parent("/b"),
            ContentRecord::new("b.md", "/b", "B").with_parent("/a"),
        ]);

        let err = result.unwrap_err();
        let TreeError::CyclicHierarchy { cycle } = err else {
            panic!("expected cycle, got {err:?}");
        };
        assert_eq!(cycle.first(), cycle.last());
        assert!(cycle.len() >= 3);
    }

    #[test]
    fn test_self_parent_cycle_detected() {
        let result =
            NavTree::build(&[ContentRecord::new("a.md", "/a", "A").with_parent("/a")]);

        assert!(matches!(result, Err(TreeError::CyclicHierarchy { .. })));
    }

    #[test]
    fn test_explicit_order_wins_over_input_order() {
        let tree = NavTree::build(&[
            ContentRecord::new("second.md", "/second", "Second").with_order(2),
            ContentRecord::new("first.md", "/first", "First").with_order(1),
        ])
        .unwrap();

        let roots: Vec<_> = tree.roots().iter().map(|n| (n.url_path.as_str(), n.order)).collect();
        assert_eq!(roots, [("/first", 1), ("/second", 2)]);
    }

    #[test]
    fn test_unordered_siblings_sorted_alphabetically() {
        let tree = NavTree::build(&[
            ContentRecord::new("zebra.md", "/zebra", "Zebra"),
            ContentRecord::new("apple.md", "/apple", "Apple"),
            ContentRecord::new("mango.md", "/mango", "Mango"),
        ])
        .unwrap();

        let roots: Vec<_> = tree.roots().iter().map(|n| (n.title.as_str(), n.order)).collect();
        assert_eq!(roots, [("Apple", 0), ("Mango", 1), ("Zebra", 2)]);
    }

    #[test]
    fn test_auto_orders_continue_after_explicit() {
        let tree = NavTree::build(&[
            ContentRecord::new("pinned.md", "/pinned", "Pinned").with_order(5),
            ContentRecord::new("beta.md", "/beta", "Beta"),
            ContentRecord::new("alpha.md", "/alpha", "Alpha"),
        ])
        .unwrap();

        let roots: Vec<_> = tree.roots().iter().map(|n| (n.title.as_str(), n.order)).collect();
        assert_eq!(roots, [("Pinned", 5), ("Alpha", 6), ("Beta", 7)]);
    }

    #[test]
    fn test_auto_orders_saturate_at_extreme_explicit_order() {
        let tree = NavTree::build(&[
            ContentRecord::new("pinned.md", "/pinned", "Pinned").with_order(i64::MAX),
            ContentRecord::new("beta.md", "/beta", "Beta"),
            ContentRecord::new("alpha.md", "/alpha", "Alpha"),
        ])
        .unwrap();

        // Auto-assigned orders clamp at i64::MAX instead of wrapping,
        // keeping the sibling sequence intact.
        let roots: Vec<_> = tree.roots().iter().map(|n| (n.title.as_str(), n.order)).collect();
        assert_eq!(
            roots,
            [
                ("Pinned", i64::MAX),
                ("Alpha", i64::MAX),
                ("Beta", i64::MAX),
            ]
        );
    }

    #[test]
    fn test_order_assignment_is_stable_across_rebuilds() {
        let records = vec![
            ContentRecord::new("b.md", "/b", "B"),
            ContentRecord::new("a.md", "/a", "A"),
        ];

        let first = NavTree::build(&records).unwrap();
        let second = NavTree::build(&records).unwrap();

        assert_eq!(first, second);
    }

    #[test]
    fn test_equal_orders_tie_break_by_title() {
        let tree = NavTree::build(&[
            ContentRecord::new("b.md", "/b", "Bravo").with_order(1),
            ContentRecord::new("a.md", "/a", "Alpha").with_order(1),
        ])
        .unwrap();

        let titles: Vec<_> = tree.roots().iter().map(|n| n.title.as_str()).collect();
        assert_eq!(titles, ["Alpha", "Bravo"]);
    }

    #[test]
    fn test_duplicate_url_path_skipped_first_wins() {
        let tree = NavTree::build(&[
            ContentRecord::new("a.md", "/a", "Original"),
            ContentRecord::new("other/a.md", "/a", "Duplicate"),
        ])
        .unwrap();

        assert_eq!(tree.len(), 1);
        assert_eq!(tree.get_by_url("/a").unwrap().title, "Original");
    }

    #[test]
    fn test_hidden_records_stay_in_tree() {
        let tree = NavTree::build(&[
            ContentRecord::new("docs.md", "/docs", "Docs"),
            ContentRecord::new("docs/internal.md", "/docs/internal", "Internal")
                .with_hidden(true),
        ])
        .unwrap();

        let docs = tree.get_by_url("/docs").unwrap();
        assert_eq!(docs.children.len(), 1);
        assert!(docs.children[0].hidden);
        assert_eq!(docs.visible_children().count(), 0);
    }

    #[test]
    fn test_empty_records_build_empty_tree() {
        let tree = NavTree::build(&[]).unwrap();

        assert!(tree.is_empty());
        assert_eq!(tree.len(), 0);
    }

    #[test]
    fn test_last_modified_carried_through() {
        let tree = NavTree::build(&[
            ContentRecord::new("a.md", "/a", "A").with_last_modified(1_700_000_000),
        ])
        .unwrap();

        assert_eq!(tree.roots()[0].last_modified, 1_700_000_000);
    }

    #[test]
    fn test_root_index_page_collects_children() {
        let tree = NavTree::build(&[
            ContentRecord::new("index.md", "/", "Home"),
            ContentRecord::new("guide.md", "/guide", "Guide"),
        ])
        .unwrap();

        assert_eq!(tree.roots().len(), 1);
        let home = &tree.roots()[0];
        assert_eq!(home.url_path, "/");
        assert_eq!(home.children[0].url_path, "/guide");
    }
}
