//! Tree construction errors.
//!
//! Builder failures abort the entire tree construction: downstream
//! navigation partials assume structural completeness, so a partially
//! built tree is never returned.

/// Error raised while building a navigation tree.
#[derive(Debug, thiserror::Error)]
pub enum TreeError {
    /// A record declared a `parent` that is not in the discovered set.
    ///
    /// Declared parents are never silently replaced with a path-derived
    /// guess; ambiguous intent is surfaced instead.
    #[error("record '{node}' declares parent '{declared_parent}' which does not exist")]
    DanglingParent {
        /// URL path of the offending record.
        node: String,
        /// The declared parent path that matched nothing.
        declared_parent: String,
    },

    /// Parent declarations form a cycle, so depth cannot be computed.
    #[error("cyclic parent hierarchy: {}", cycle.join(" -> "))]
    CyclicHierarchy {
        /// URL paths along the cycle; first and last entries are the same.
        cycle: Vec<String>,
    },
}
