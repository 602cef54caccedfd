//! Partial rendering engine.
//!
//! [`Renderer`] composes registered partials into markup: it looks up the
//! definition, validates props against its schema, hands the render
//! function a [`Helpers`](crate::Helpers) bundle for nested composition,
//! and returns the markup together with the scoped styles and transitive
//! dependency names for the whole composition.
//!
//! Rendering is a pure function of `(registry, name, props, context)`:
//! identical inputs produce byte-identical output, so caching layers built
//! on top can rely on determinism.
//!
//! # Thread Safety
//!
//! The registry is frozen before rendering starts, so independent render
//! calls may run concurrently; each call carries its own recursion state
//! and never mutates shared data.

use serde_json::Value;

use crate::error::RenderError;
use crate::helpers::Helpers;
use crate::registry::PartialRegistry;
use crate::styles;

/// Engine configuration.
#[derive(Clone, Debug)]
pub struct RenderOptions {
    /// Maximum partial nesting depth, counting the top-level partial.
    ///
    /// Guards against compositions that are cyclic only through dynamic
    /// partial names, which the static dependency check cannot see.
    pub max_depth: usize,
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self { max_depth: 10 }
    }
}

/// Caller-supplied page context, passed through to render functions.
#[derive(Clone, Debug, Default)]
pub struct RenderContext {
    /// URL path of the page being rendered (e.g. `/guide/setup`).
    pub current_path: String,
    /// Opaque page data made available to render functions.
    pub data: Value,
}

impl RenderContext {
    /// Context for a page at `current_path` with no extra data.
    #[must_use]
    pub fn new(current_path: impl Into<String>) -> Self {
        Self {
            current_path: current_path.into(),
            data: Value::Null,
        }
    }

    /// Attach opaque page data.
    #[must_use]
    pub fn with_data(mut self, data: Value) -> Self {
        self.data = data;
        self
    }
}

/// Result of a successful render.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RenderResult {
    /// Rendered markup.
    pub html: String,
    /// Scoped CSS for the partial and its transitive dependencies, in
    /// resolution order, each block prefixed with its owner's scope class.
    pub scoped_styles: String,
    /// Transitive dependency names in deterministic resolution order.
    pub dependencies: Vec<String>,
}

/// Partial rendering engine.
#[derive(Clone, Debug, Default)]
pub struct Renderer {
    options: RenderOptions,
}

impl Renderer {
    /// Create an engine with default options.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Override the maximum nesting depth.
    #[must_use]
    pub fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.options.max_depth = max_depth;
        self
    }

    /// Engine options.
    #[must_use]
    pub fn options(&self) -> &RenderOptions {
        &self.options
    }

    /// Render a partial with raw props.
    ///
    /// # Errors
    ///
    /// - [`RenderError::NotFound`] if `name` is not registered; unresolved
    ///   strings are rejected here at the boundary, never deeper in.
    /// - [`RenderError::Validation`] if `raw_props` fail the schema; the
    ///   engine never partially renders with invalid data.
    /// - [`RenderError::Registry`] if dependency resolution fails, which
    ///   indicates the registration phase skipped
    ///   [`PartialRegistry::validate_graph`].
    /// - Nested failures ([`RenderError::UndeclaredDependency`],
    ///   [`RenderError::MaxDepthExceeded`]) propagated out of
    ///   [`Helpers::render_partial`](crate::Helpers::render_partial).
    pub fn render(
        &self,
        registry: &PartialRegistry,
        name: &str,
        raw_props: &Value,
        context: &RenderContext,
    ) -> Result<RenderResult, RenderError> {
        let definition = registry.get(name).ok_or_else(|| RenderError::NotFound {
            name: name.to_owned(),
        })?;

        let props = definition
            .schema()
            .validate(raw_props)
            .map_err(|issues| RenderError::Validation {
                name: name.to_owned(),
                issues,
            })?;

        let dependencies = registry.resolve_dependencies(name)?;

        let helpers = Helpers::root(registry, context, &self.options, definition);
        let html = definition.invoke(&props, &helpers)?;

        let scoped_styles = collect_scoped_styles(registry, definition.name(), &dependencies);

        Ok(RenderResult {
            html,
            scoped_styles,
            dependencies,
        })
    }
}

/// Aggregate scoped styles for a partial and its resolved dependencies.
///
/// The rendered partial's block comes first, followed by dependency blocks
/// in resolution order. Dependency lists are already deduplicated, so each
/// partial contributes at most one block.
fn collect_scoped_styles(
    registry: &PartialRegistry,
    name: &str,
    dependencies: &[String],
) -> String {
    let mut blocks = Vec::new();

    let mut push_block = |partial: &str| {
        if let Some(def) = registry.get(partial) {
            if !def.styles().is_empty() {
                blocks.push(styles::scope_styles(
                    def.styles(),
                    &styles::scope_class(partial),
                ));
            }
        }
    };

    push_block(name);
    for dep in dependencies {
        push_block(dep);
    }

    blocks.join("\n")
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use serde_json::json;
    use trellis_schema::{FieldType, Schema};

    use crate::definition::{Category, PartialDefinition, PartialMetadata};

    use super::*;

    // One engine may serve renders across threads.
    static_assertions::assert_impl_all!(Renderer: Send, Sync);

    fn metadata(example_props: Value) -> PartialMetadata {
        PartialMetadata::new("test partial", Category::Content)
            .with_example("example", example_props)
    }

    fn icon_partial() -> PartialDefinition {
        let schema = Schema::builder()
            .required("glyph", FieldType::String, "Icon glyph name")
            .build();
        PartialDefinition::new("icon", schema, |props, helpers| {
            let glyph = props["glyph"].as_str().unwrap_or_default();
            Ok(format!(
                r#"<i class="{} icon-{}"></i>"#,
                helpers.scope_class(),
                helpers.escape_html(glyph)
            ))
        })
        .with_styles(".icon-star { color: gold; }")
        .with_metadata(metadata(json!({"glyph": "star"})))
    }

    fn card_partial() -> PartialDefinition {
        let schema = Schema::builder()
            .required("title", FieldType::String, "Card title")
            .defaulted("glyph", FieldType::String, json!("star"), "Icon glyph")
            .build();
        PartialDefinition::new("card", schema, |props, helpers| {
            let title = props["title"].as_str().unwrap_or_default();
            let icon = helpers.render_partial("icon", &json!({"glyph": props["glyph"]}))?;
            Ok(format!(
                r#"<div class="{}">{}<h2>{}</h2></div>"#,
                helpers.scope_class(),
                icon,
                helpers.escape_html(title)
            ))
        })
        .with_styles(".card-body { padding: 1rem; }")
        .with_dependencies(["icon"])
        .with_metadata(metadata(json!({"title": "Hello"})))
    }

    fn registry_with_card() -> PartialRegistry {
        let mut registry = PartialRegistry::new();
        registry.register(icon_partial()).unwrap();
        registry.register(card_partial()).unwrap();
        registry.validate_graph().unwrap();
        registry
    }

    #[test]
    fn test_render_composes_nested_partial() {
        let registry = registry_with_card();
        let renderer = Renderer::new();

        let result = renderer
            .render(
                &registry,
                "card",
                &json!({"title": "Greetings"}),
                &RenderContext::new("/"),
            )
            .unwrap();

        assert!(result.html.contains("<h2>Greetings</h2>"));
        assert!(result.html.contains("icon-star"));
        assert_eq!(result.dependencies, ["icon"]);
    }

    #[test]
    fn test_render_escapes_untrusted_content() {
        let registry = registry_with_card();
        let renderer = Renderer::new();

        let result = renderer
            .render(
                &registry,
                "card",
                &json!({"title": "<script>alert(1)</script>"}),
                &RenderContext::default(),
            )
            .unwrap();

        assert!(!result.html.contains("<script>"));
        assert!(result.html.contains("&lt;script&gt;"));
    }

    #[test]
    fn test_render_not_found() {
        let registry = PartialRegistry::new();
        let renderer = Renderer::new();

        let err = renderer
            .render(&registry, "ghost", &json!({}), &RenderContext::default())
            .unwrap_err();

        assert!(matches!(err, RenderError::NotFound { name } if name == "ghost"));
    }

    #[test]
    fn test_render_invalid_props_never_partially_renders() {
        let registry = registry_with_card();
        let renderer = Renderer::new();

        let err = renderer
            .render(&registry, "card", &json!({}), &RenderContext::default())
            .unwrap_err();

        let RenderError::Validation { name, issues } = err else {
            panic!("expected validation error");
        };
        assert_eq!(name, "card");
        assert_eq!(issues[0].path, "title");
    }

    #[test]
    fn test_render_applies_schema_defaults() {
        let registry = registry_with_card();
        let renderer = Renderer::new();

        // No glyph supplied; the schema default "star" flows into the icon.
        let result = renderer
            .render(
                &registry,
                "card",
                &json!({"title": "T"}),
                &RenderContext::default(),
            )
            .unwrap();

        assert!(result.html.contains("icon-star"));
    }

    #[test]
    fn test_render_is_deterministic() {
        let registry = registry_with_card();
        let renderer = Renderer::new();
        let props = json!({"title": "Same"});

        let a = renderer
            .render(&registry, "card", &props, &RenderContext::new("/x"))
            .unwrap();
        let b = renderer
            .render(&registry, "card", &props, &RenderContext::new("/x"))
            .unwrap();

        assert_eq!(a, b);
    }

    #[test]
    fn test_render_aggregates_scoped_styles_in_order() {
        let registry = registry_with_card();
        let renderer = Renderer::new();

        let result = renderer
            .render(
                &registry,
                "card",
                &json!({"title": "T"}),
                &RenderContext::default(),
            )
            .unwrap();

        let card_pos = result.scoped_styles.find(".trellis-card .card-body").unwrap();
        let icon_pos = result.scoped_styles.find(".trellis-icon .icon-star").unwrap();
        assert!(card_pos < icon_pos);
    }

    #[test]
    fn test_undeclared_nested_render_rejected() {
        let mut registry = PartialRegistry::new();
        registry.register(icon_partial()).unwrap();
        let sneaky = PartialDefinition::new("sneaky", Schema::empty(), |_, helpers| {
            helpers.render_partial("icon", &json!({"glyph": "star"}))
        })
        .with_metadata(metadata(json!({})));
        registry.register(sneaky).unwrap();
        let renderer = Renderer::new();

        let err = renderer
            .render(&registry, "sneaky", &json!({}), &RenderContext::default())
            .unwrap_err();

        assert!(matches!(
            err,
            RenderError::UndeclaredDependency { parent, name }
                if parent == "sneaky" && name == "icon"
        ));
    }

    #[test]
    fn test_max_depth_exceeded_on_deep_chain() {
        // A linear chain longer than the depth limit: level0 -> level1 -> ...
        let mut registry = PartialRegistry::new();
        let levels = 5;
        for i in 0..levels {
            let name = format!("level{i}");
            let next = format!("level{}", i + 1);
            let deps = if i + 1 < levels {
                vec![next.clone()]
            } else {
                Vec::new()
            };
            let def = PartialDefinition::new(name, Schema::empty(), move |_, helpers| {
                if deps.is_empty() {
                    Ok("<span>leaf</span>".to_owned())
                } else {
                    helpers.render_partial(&deps[0], &json!({}))
                }
            })
            .with_dependencies(if i + 1 < levels { vec![next] } else { Vec::new() })
            .with_metadata(metadata(json!({})));
            registry.register(def).unwrap();
        }
        let renderer = Renderer::new().with_max_depth(3);

        let err = renderer
            .render(&registry, "level0", &json!({}), &RenderContext::default())
            .unwrap_err();

        let RenderError::MaxDepthExceeded { max_depth, chain } = err else {
            panic!("expected max depth error");
        };
        assert_eq!(max_depth, 3);
        assert_eq!(chain, ["level0", "level1", "level2", "level3"]);
    }

    #[test]
    fn test_deep_chain_within_limit_renders() {
        let mut registry = PartialRegistry::new();
        let levels = 5;
        for i in 0..levels {
            let name = format!("level{i}");
            let next = format!("level{}", i + 1);
            let deps = if i + 1 < levels {
                vec![next.clone()]
            } else {
                Vec::new()
            };
            let def = PartialDefinition::new(name, Schema::empty(), move |_, helpers| {
                if deps.is_empty() {
                    Ok("<span>leaf</span>".to_owned())
                } else {
                    helpers.render_partial(&deps[0], &json!({}))
                }
            })
            .with_dependencies(if i + 1 < levels { vec![next] } else { Vec::new() })
            .with_metadata(metadata(json!({})));
            registry.register(def).unwrap();
        }
        let renderer = Renderer::new();

        let result = renderer
            .render(&registry, "level0", &json!({}), &RenderContext::default())
            .unwrap();

        assert_eq!(result.html, "<span>leaf</span>");
    }

    #[test]
    fn test_all_usage_examples_render_nonempty() {
        let registry = registry_with_card();
        let renderer = Renderer::new();
        let context = RenderContext::default();

        for definition in registry.iter() {
            for example in &definition.metadata().usage_examples {
                if definition.schema().validate(&example.props).is_err() {
                    continue;
                }
                let result = renderer
                    .render(&registry, definition.name(), &example.props, &context)
                    .unwrap();
                assert!(!result.html.is_empty());
                assert!(result.html.contains('<'), "output has a structural tag");
            }
        }
    }

    #[test]
    fn test_concurrent_renders_share_registry() {
        use std::sync::Arc;
        use std::thread;

        let registry = Arc::new(registry_with_card());
        let renderer = Arc::new(Renderer::new());

        let handles: Vec<_> = (0..8)
            .map(|i| {
                let registry = Arc::clone(&registry);
                let renderer = Arc::clone(&renderer);
                thread::spawn(move || {
                    let props = json!({"title": format!("Page {i}")});
                    let result = renderer
                        .render(&registry, "card", &props, &RenderContext::default())
                        .unwrap();
                    assert!(result.html.contains(&format!("Page {i}")));
                })
            })
            .collect();

        for handle in handles {
            handle.join().unwrap();
        }
    }
}
