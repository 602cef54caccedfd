//! Registry of partial definitions.
//!
//! The registry is the authoritative collection of partials for a build.
//! It is mutated only during the startup registration phase (sequential by
//! contract) and treated as read-only during rendering, so concurrent
//! render calls can share `&PartialRegistry` freely.
//!
//! Registration either fully succeeds or rejects the definition with the
//! registry unchanged; every validity check runs before any mutation.

use std::collections::HashMap;

use crate::definition::PartialDefinition;
use crate::error::RegistryError;
use crate::styles;

/// Opaque handle to a successfully registered partial.
///
/// Obtainable only through [`PartialRegistry::register`], so holding one
/// proves the partial passed registration-time validation.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct PartialId(usize);

/// Three-color DFS marking for cycle detection.
#[derive(Clone, Copy, PartialEq, Eq)]
enum Mark {
    InProgress,
    Done,
}

/// Process-wide mapping from partial name to definition.
#[derive(Default)]
pub struct PartialRegistry {
    partials: Vec<PartialDefinition>,
    by_name: HashMap<String, usize>,
}

impl PartialRegistry {
    /// Create an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a partial definition.
    ///
    /// Returns an opaque [`PartialId`] handle on success. On any failure
    /// the registry is left unchanged.
    ///
    /// # Errors
    ///
    /// - [`RegistryError::DuplicateName`] if the name is taken; the first
    ///   registration wins and is never silently overridden.
    /// - [`RegistryError::InvalidMetadata`] if the definition has no usage
    ///   examples, or none of their props validate against the schema.
    /// - [`RegistryError::InvalidCss`] if the styles contain a bare global
    ///   selector (`body`, `html`, `*`, or a bare element selector).
    pub fn register(
        &mut self,
        definition: PartialDefinition,
    ) -> Result<PartialId, RegistryError> {
        let name = definition.name().to_owned();

        if self.by_name.contains_key(&name) {
            return Err(RegistryError::DuplicateName { name });
        }

        let examples = &definition.metadata().usage_examples;
        if examples.is_empty() {
            return Err(RegistryError::InvalidMetadata {
                name,
                reason: "no usage examples".to_owned(),
            });
        }
        if !examples
            .iter()
            .any(|example| definition.schema().validate(&example.props).is_ok())
        {
            return Err(RegistryError::InvalidMetadata {
                name,
                reason: "no usage example props validate against the schema".to_owned(),
            });
        }

        if let Err(selector) = styles::validate_styles(definition.styles()) {
            return Err(RegistryError::InvalidCss { name, selector });
        }

        tracing::debug!(partial = %name, "registered partial");

        let idx = self.partials.len();
        self.partials.push(definition);
        self.by_name.insert(name, idx);
        Ok(PartialId(idx))
    }

    /// Look up a partial by name.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&PartialDefinition> {
        self.by_name.get(name).map(|&i| &self.partials[i])
    }

    /// Look up a partial by registration handle.
    #[must_use]
    pub fn get_by_id(&self, id: PartialId) -> &PartialDefinition {
        &self.partials[id.0]
    }

    /// Number of registered partials.
    #[must_use]
    pub fn len(&self) -> usize {
        self.partials.len()
    }

    /// Whether the registry is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.partials.is_empty()
    }

    /// Iterate over registered definitions in registration order.
    pub fn iter(&self) -> impl Iterator<Item = &PartialDefinition> {
        self.partials.iter()
    }

    /// Registered names in registration order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.partials.iter().map(PartialDefinition::name)
    }

    /// Resolve the transitive dependency closure of a partial.
    ///
    /// Returns dependency names (excluding the partial itself) in
    /// deterministic depth-first, first-declared-first order.
    ///
    /// # Errors
    ///
    /// - [`RegistryError::UnknownPartial`] if `name` is not registered.
    /// - [`RegistryError::MissingDependency`] if a declared dependency is
    ///   not registered.
    /// - [`RegistryError::CyclicDependency`] if the graph reachable from
    ///   `name` contains a cycle; the reported path is the back-edge plus
    ///   the DFS stack at the point of detection.
    pub fn resolve_dependencies(&self, name: &str) -> Result<Vec<String>, RegistryError> {
        if !self.by_name.contains_key(name) {
            return Err(RegistryError::UnknownPartial {
                name: name.to_owned(),
            });
        }

        let mut marks: HashMap<String, Mark> = HashMap::new();
        let mut stack: Vec<String> = Vec::new();
        let mut resolved: Vec<String> = Vec::new();
        self.visit(name, &mut marks, &mut stack, &mut resolved)?;
        Ok(resolved)
    }

    /// Validate the whole dependency graph.
    ///
    /// Run at the end of the registration phase: checks that every declared
    /// dependency is registered and the induced graph is acyclic.
    ///
    /// # Errors
    ///
    /// First [`RegistryError::MissingDependency`] or
    /// [`RegistryError::CyclicDependency`] found, in registration order.
    pub fn validate_graph(&self) -> Result<(), RegistryError> {
        for definition in &self.partials {
            self.resolve_dependencies(definition.name())?;
        }
        Ok(())
    }

    /// Depth-first visit with three-color marking.
    ///
    /// Dependencies are appended to `resolved` in pre-order, first declared
    /// first, each name at most once.
    fn visit(
        &self,
        name: &str,
        marks: &mut HashMap<String, Mark>,
        stack: &mut Vec<String>,
        resolved: &mut Vec<String>,
    ) -> Result<(), RegistryError> {
        marks.insert(name.to_owned(), Mark::InProgress);
        stack.push(name.to_owned());

        let definition = self
            .get(name)
            .unwrap_or_else(|| unreachable!("callers check membership before visiting"));

        for dep in definition.dependencies() {
            match marks.get(dep.as_str()) {
                Some(Mark::InProgress) => {
                    // Back edge: the cycle is the stack from the first
                    // occurrence of `dep`, closed with `dep` itself.
                    let start = stack.iter().position(|n| n == dep).unwrap_or(0);
                    let mut cycle: Vec<String> = stack[start..].to_vec();
                    cycle.push(dep.clone());
                    return Err(RegistryError::CyclicDependency { cycle });
                }
                Some(Mark::Done) => {}
                None => {
                    if !self.by_name.contains_key(dep.as_str()) {
                        return Err(RegistryError::MissingDependency {
                            name: name.to_owned(),
                            missing: dep.clone(),
                        });
                    }
                    resolved.push(dep.clone());
                    self.visit(dep, marks, stack, resolved)?;
                }
            }
        }

        stack.pop();
        marks.insert(name.to_owned(), Mark::Done);
        Ok(())
    }
}

impl std::fmt::Debug for PartialRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PartialRegistry")
            .field("partials", &self.names().collect::<Vec<_>>())
            .finish()
    }
}
