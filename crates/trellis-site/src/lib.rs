//! Site assembly for Trellis.
//!
//! Wires the independent pieces together: configuration drives the
//! rendering engine, the navigation tree feeds the builtin `nav_menu` and
//! `breadcrumbs` partials, and [`register_builtins`] installs those
//! partials into a registry during the startup phase.
//!
//! # Architecture
//!
//! A build cycle is: load [`Config`], build a
//! [`NavTree`](trellis_nav::NavTree) from discovered content, populate a
//! [`PartialRegistry`] (builtins first, then site-specific partials),
//! freeze it, then render pages concurrently with a shared
//! [`Renderer`].

mod builtins;

pub use builtins::{breadcrumb_props, menu_props, register_builtins};

use trellis_config::Config;
use trellis_partials::Renderer;

/// Create a rendering engine configured from loaded configuration.
#[must_use]
pub fn renderer_for(config: &Config) -> Renderer {
    Renderer::new().with_max_depth(config.render.max_depth)
}

#[cfg(test)]
mod tests {
    use serde_json::json;
    use trellis_nav::{ContentRecord, NavTree};
    use trellis_partials::{
        Category, FieldType, PartialDefinition, PartialMetadata, PartialRegistry, RenderContext,
        Schema,
    };

    use super::*;

    #[test]
    fn test_renderer_for_uses_configured_depth() {
        let mut config = Config::default();
        config.render.max_depth = 4;

        let renderer = renderer_for(&config);

        assert_eq!(renderer.options().max_depth, 4);
    }

    // A site partial composing a builtin: page chrome around the menu.
    fn sidebar_partial() -> PartialDefinition {
        let schema = Schema::builder()
            .required("menu", FieldType::Object, "Props for the nav_menu partial")
            .build();
        PartialDefinition::new("sidebar", schema, |props, helpers| {
            let menu = helpers.render_partial("nav_menu", &props["menu"])?;
            Ok(format!(
                r#"<aside class="{}">{menu}</aside>"#,
                helpers.scope_class(),
            ))
        })
        .with_dependencies(["nav_menu"])
        .with_metadata(
            PartialMetadata::new("Page sidebar wrapping the site menu", Category::Layout)
                .with_example("empty menu", json!({"menu": {"items": []}})),
        )
    }

    #[test]
    fn test_full_build_cycle_renders_navigation() {
        let config = Config::default();
        let tree = NavTree::build(&[
            ContentRecord::new("guide.md", "/guide", "Guide").with_order(1),
            ContentRecord::new("guide/install.md", "/guide/install", "Install"),
            ContentRecord::new("blog.md", "/blog", "Blog").with_order(2),
        ])
        .unwrap();

        let mut registry = PartialRegistry::new();
        register_builtins(&mut registry).unwrap();
        registry.register(sidebar_partial()).unwrap();
        registry.validate_graph().unwrap();

        let renderer = renderer_for(&config);
        let current = "/guide/install";
        let result = renderer
            .render(
                &registry,
                "sidebar",
                &json!({"menu": menu_props(&tree, current)}),
                &RenderContext::new(current),
            )
            .unwrap();

        assert!(result.html.starts_with(r#"<aside class="trellis-sidebar">"#));
        assert!(result.html.contains(r#"href="/guide/install""#));
        assert!(result.html.contains(r#"aria-current="page""#));
        assert_eq!(result.dependencies, ["nav_menu"]);
        // The builtin's styles ride along, scoped to its own class.
        assert!(result.scoped_styles.contains(".trellis-nav-menu .menu-list"));
    }

    #[test]
    fn test_menu_order_flows_into_markup() {
        let tree = NavTree::build(&[
            ContentRecord::new("b.md", "/b", "Second").with_order(2),
            ContentRecord::new("a.md", "/a", "First").with_order(1),
        ])
        .unwrap();
        let mut registry = PartialRegistry::new();
        register_builtins(&mut registry).unwrap();

        let result = renderer_for(&Config::default())
            .render(
                &registry,
                "nav_menu",
                &menu_props(&tree, "/a"),
                &RenderContext::new("/a"),
            )
            .unwrap();

        let first = result.html.find("First").unwrap();
        let second = result.html.find("Second").unwrap();
        assert!(first < second);
    }
}
