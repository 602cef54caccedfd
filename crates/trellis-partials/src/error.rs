//! Error types for partial registration and rendering.

use trellis_schema::Issue;

/// Error raised during the registration phase.
///
/// All variants are fatal to startup. A failed registration leaves the
/// registry unchanged; there is no partially-valid state.
#[derive(Debug, thiserror::Error)]
pub enum RegistryError {
    /// A partial with this name is already registered.
    ///
    /// Registration rejects duplicates rather than overwriting, so the
    /// first registration always wins and silent overrides are impossible.
    #[error("a partial named '{name}' is already registered")]
    DuplicateName {
        /// Name of the rejected partial.
        name: String,
    },

    /// The partial's metadata violates its invariants.
    #[error("invalid metadata for partial '{name}': {reason}")]
    InvalidMetadata {
        /// Name of the rejected partial.
        name: String,
        /// Which invariant was violated.
        reason: String,
    },

    /// The partial's styles contain a selector that would leak globally.
    #[error("partial '{name}' styles contain unscoped global selector '{selector}'")]
    InvalidCss {
        /// Name of the rejected partial.
        name: String,
        /// The offending top-level selector.
        selector: String,
    },

    /// A declared dependency is not registered.
    #[error("partial '{name}' depends on unregistered partial '{missing}'")]
    MissingDependency {
        /// Partial declaring the dependency.
        name: String,
        /// The unregistered dependency name.
        missing: String,
    },

    /// The declared dependency graph contains a cycle.
    #[error("cyclic partial dependency: {}", cycle.join(" -> "))]
    CyclicDependency {
        /// The cycle path; first and last entries are the same partial.
        cycle: Vec<String>,
    },

    /// The named partial is not registered.
    #[error("unknown partial '{name}'")]
    UnknownPartial {
        /// The unresolved name.
        name: String,
    },
}

/// Error raised while rendering.
///
/// [`RenderError::Validation`] is recoverable per call (bad input data);
/// the remaining variants indicate a broken composition and should be
/// surfaced loudly rather than swallowed.
#[derive(Debug, thiserror::Error)]
pub enum RenderError {
    /// The named partial is not registered.
    #[error("partial '{name}' is not registered")]
    NotFound {
        /// The unresolved name.
        name: String,
    },

    /// The supplied props failed schema validation.
    ///
    /// The engine never partially renders with invalid data.
    #[error("invalid props for partial '{name}': {}", format_issues(issues))]
    Validation {
        /// Partial whose schema rejected the props.
        name: String,
        /// Individual field violations.
        issues: Vec<Issue>,
    },

    /// A partial rendered a nested partial it never declared.
    ///
    /// Undeclared nested renders are rejected to keep the dependency graph
    /// an accurate picture of which partials can reach which.
    #[error("partial '{parent}' rendered '{name}' without declaring it as a dependency")]
    UndeclaredDependency {
        /// The partial that attempted the nested render.
        parent: String,
        /// The undeclared partial name.
        name: String,
    },

    /// Partial nesting exceeded the configured maximum depth.
    #[error("partial nesting exceeded max depth {max_depth}: {}", chain.join(" -> "))]
    MaxDepthExceeded {
        /// The configured depth limit.
        max_depth: usize,
        /// The chain of entered partials, outermost first.
        chain: Vec<String>,
    },

    /// Dependency resolution failed at render time.
    #[error(transparent)]
    Registry(#[from] RegistryError),
}

fn format_issues(issues: &[Issue]) -> String {
    issues
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}
