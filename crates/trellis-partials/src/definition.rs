//! Partial definitions and metadata.
//!
//! A [`PartialDefinition`] bundles everything a template component needs:
//! a data contract ([`Schema`]), a pure render function, CSS scoped at
//! render time, optional progressive-enhancement script, declared
//! dependencies, and descriptive metadata for tooling.
//!
//! Definitions are created once at registration time and immutable
//! thereafter; the registry holds the sole owned copy and callers only
//! ever see `&PartialDefinition`.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use trellis_schema::Schema;

use crate::error::RenderError;
use crate::helpers::Helpers;

/// Render function signature.
///
/// Must be pure: no I/O, no shared mutable state. Receives only props that
/// already passed schema validation, plus the helper bundle for nested
/// renders and text utilities. Identical inputs must produce identical
/// output.
pub type RenderFn = Box<dyn Fn(&Value, &Helpers<'_>) -> Result<String, RenderError> + Send + Sync>;

/// Functional category of a partial, used by tooling to group components.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    /// Page scaffolding (headers, footers, grids).
    Layout,
    /// Body content components (cards, callouts, prose blocks).
    Content,
    /// Images, video, embeds.
    Media,
    /// Menus, breadcrumbs, pagination.
    Navigation,
    /// Components carrying client behavior.
    Interactive,
    /// Small helpers (badges, icons, separators).
    Utility,
}

/// A worked example of valid props for a partial.
///
/// At least one example per partial must validate against the schema; this
/// keeps documentation honest and gives tests a known-good input.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct UsageExample {
    /// Short label describing the example.
    pub label: String,
    /// Example props; expected to validate against the partial's schema.
    pub props: Value,
}

/// Descriptive metadata attached to a partial.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct PartialMetadata {
    /// What the partial renders.
    pub description: String,
    /// Functional category.
    pub category: Category,
    /// Search keywords for tooling.
    #[serde(default)]
    pub keywords: Vec<String>,
    /// Worked prop examples. Must contain at least one entry that
    /// validates against the partial's schema.
    #[serde(default)]
    pub usage_examples: Vec<UsageExample>,
}

impl PartialMetadata {
    /// Create metadata with a description and category.
    #[must_use]
    pub fn new(description: impl Into<String>, category: Category) -> Self {
        Self {
            description: description.into(),
            category,
            keywords: Vec::new(),
            usage_examples: Vec::new(),
        }
    }

    /// Add search keywords.
    #[must_use]
    pub fn with_keywords<I, S>(mut self, keywords: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.keywords = keywords.into_iter().map(Into::into).collect();
        self
    }

    /// Add a usage example.
    #[must_use]
    pub fn with_example(mut self, label: impl Into<String>, props: Value) -> Self {
        self.usage_examples.push(UsageExample {
            label: label.into(),
            props,
        });
        self
    }
}

/// An immutable, self-describing template component.
///
/// Constructed with [`PartialDefinition::new`] and configured through
/// `with_*` methods before registration. After registration the registry
/// owns the definition exclusively.
pub struct PartialDefinition {
    name: String,
    schema: Schema,
    render: RenderFn,
    styles: String,
    script: Option<String>,
    dependencies: Vec<String>,
    metadata: PartialMetadata,
}

impl PartialDefinition {
    /// Create a definition with the required pieces: name, data contract,
    /// and render function.
    ///
    /// Metadata defaults to an empty `Utility` entry and must be replaced
    /// via [`with_metadata`](Self::with_metadata) before registration,
    /// since registration requires at least one valid usage example.
    #[must_use]
    pub fn new<F>(name: impl Into<String>, schema: Schema, render: F) -> Self
    where
        F: Fn(&Value, &Helpers<'_>) -> Result<String, RenderError> + Send + Sync + 'static,
    {
        Self {
            name: name.into(),
            schema,
            render: Box::new(render),
            styles: String::new(),
            script: None,
            dependencies: Vec::new(),
            metadata: PartialMetadata::new(String::new(), Category::Utility),
        }
    }

    /// Attach CSS text.
    ///
    /// Selectors are validated at registration time and prefixed with the
    /// partial's scope class at render time.
    #[must_use]
    pub fn with_styles(mut self, styles: impl Into<String>) -> Self {
        self.styles = styles.into();
        self
    }

    /// Attach progressive-enhancement script text.
    ///
    /// Opaque passthrough; the engine never inspects or executes it.
    #[must_use]
    pub fn with_script(mut self, script: impl Into<String>) -> Self {
        self.script = Some(script.into());
        self
    }

    /// Declare the partials this one's render function may invoke via
    /// [`Helpers::render_partial`].
    #[must_use]
    pub fn with_dependencies<I, S>(mut self, dependencies: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.dependencies = dependencies.into_iter().map(Into::into).collect();
        self
    }

    /// Attach descriptive metadata.
    #[must_use]
    pub fn with_metadata(mut self, metadata: PartialMetadata) -> Self {
        self.metadata = metadata;
        self
    }

    /// Partial name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Data contract for this partial's props.
    #[must_use]
    pub fn schema(&self) -> &Schema {
        &self.schema
    }

    /// Unscoped CSS text.
    #[must_use]
    pub fn styles(&self) -> &str {
        &self.styles
    }

    /// Progressive-enhancement script, if any.
    #[must_use]
    pub fn script(&self) -> Option<&str> {
        self.script.as_deref()
    }

    /// Declared direct dependencies, in declaration order.
    #[must_use]
    pub fn dependencies(&self) -> &[String] {
        &self.dependencies
    }

    /// Check whether `name` is a declared direct dependency.
    #[must_use]
    pub fn declares_dependency(&self, name: &str) -> bool {
        self.dependencies.iter().any(|d| d == name)
    }

    /// Descriptive metadata.
    #[must_use]
    pub fn metadata(&self) -> &PartialMetadata {
        &self.metadata
    }

    /// Invoke the render function with validated props.
    pub(crate) fn invoke(
        &self,
        props: &Value,
        helpers: &Helpers<'_>,
    ) -> Result<String, RenderError> {
        (self.render)(props, helpers)
    }
}

impl std::fmt::Debug for PartialDefinition {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PartialDefinition")
            .field("name", &self.name)
            .field("dependencies", &self.dependencies)
            .field("category", &self.metadata.category)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;
    use trellis_schema::FieldType;

    use super::*;

    #[test]
    fn test_definition_builder_chain() {
        let schema = Schema::builder()
            .required("label", FieldType::String, "Badge label")
            .build();
        let def = PartialDefinition::new("badge", schema, |props, _| {
            Ok(format!("<span>{}</span>", props["label"]))
        })
        .with_styles(".badge { color: red; }")
        .with_script("console.log('badge');")
        .with_dependencies(["icon"])
        .with_metadata(
            PartialMetadata::new("A badge", Category::Utility)
                .with_keywords(["badge", "label"])
                .with_example("basic", json!({"label": "New"})),
        );

        assert_eq!(def.name(), "badge");
        assert_eq!(def.styles(), ".badge { color: red; }");
        assert_eq!(def.script(), Some("console.log('badge');"));
        assert_eq!(def.dependencies(), ["icon"]);
        assert!(def.declares_dependency("icon"));
        assert!(!def.declares_dependency("card"));
        assert_eq!(def.metadata().usage_examples.len(), 1);
    }

    #[test]
    fn test_metadata_example_validates() {
        let schema = Schema::builder()
            .required("label", FieldType::String, "Badge label")
            .build();
        let meta = PartialMetadata::new("A badge", Category::Utility)
            .with_example("basic", json!({"label": "New"}));

        let example = &meta.usage_examples[0];
        assert!(schema.validate(&example.props).is_ok());
    }

    #[test]
    fn test_category_serde_names() {
        let json = serde_json::to_value(Category::Interactive).unwrap();
        assert_eq!(json, json!("interactive"));
    }
}
