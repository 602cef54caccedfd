//! Builtin navigation partials.
//!
//! Bridges the navigation tree into the partial engine: [`menu_props`] and
//! [`breadcrumb_props`] turn a [`NavTree`] view into validated props, and
//! [`register_builtins`] installs the `nav_menu` and `breadcrumbs` partials
//! that consume them.

use serde_json::{json, Value};
use trellis_nav::{AnnotatedNode, NavTree};
use trellis_partials::{
    Category, FieldType, PartialDefinition, PartialMetadata, PartialRegistry, RegistryError,
    Schema,
};

/// Register the builtin navigation partials into a registry.
///
/// # Errors
///
/// Returns [`RegistryError`] if a partial with the same name is already
/// registered.
pub fn register_builtins(registry: &mut PartialRegistry) -> Result<(), RegistryError> {
    registry.register(nav_menu_partial())?;
    registry.register(breadcrumbs_partial())?;
    Ok(())
}

/// Build `nav_menu` props for the page at `current_path`.
///
/// The returned object matches the partial's schema exactly; pass it to
/// the renderer unchanged.
#[must_use]
pub fn menu_props(tree: &NavTree, current_path: &str) -> Value {
    let items: Vec<Value> = tree
        .annotate(current_path)
        .iter()
        .map(annotated_to_value)
        .collect();
    json!({ "items": items })
}

/// Build `breadcrumbs` props for the page at `current_path`.
#[must_use]
pub fn breadcrumb_props(tree: &NavTree, current_path: &str) -> Value {
    let trail: Vec<Value> = tree
        .breadcrumbs(current_path)
        .iter()
        .map(|crumb| json!({ "title": crumb.title, "url_path": crumb.url_path }))
        .collect();
    json!({ "trail": trail })
}

fn annotated_to_value(node: &AnnotatedNode) -> Value {
    json!({
        "title": node.title,
        "url_path": node.url_path,
        "active": node.active,
        "in_trail": node.in_trail,
        "children": node.children.iter().map(annotated_to_value).collect::<Vec<_>>(),
    })
}

/// Hierarchical site menu rendered from annotated navigation nodes.
fn nav_menu_partial() -> PartialDefinition {
    let schema = Schema::builder()
        .required("items", FieldType::Array, "Annotated navigation nodes")
        .defaulted(
            "aria_label",
            FieldType::String,
            json!("Main navigation"),
            "Accessible label for the nav landmark",
        )
        .build();

    PartialDefinition::new("nav_menu", schema, |props, helpers| {
        let label = props["aria_label"].as_str().unwrap_or_default();
        let items = props["items"].as_array().map_or(&[][..], Vec::as_slice);
        Ok(format!(
            r#"<nav class="{}" aria-label="{}">{}</nav>"#,
            helpers.scope_class(),
            helpers.escape_html(label),
            render_menu_list(items, helpers),
        ))
    })
    .with_styles(
        r".menu-list { list-style: none; margin: 0; padding: 0; }
.menu-list .menu-list { padding-left: 1rem; }
.menu-item.active > a { font-weight: 600; }
.menu-item.in-trail > a { text-decoration: underline; }",
    )
    .with_metadata(
        PartialMetadata::new("Hierarchical site navigation menu", Category::Navigation)
            .with_keywords(["menu", "navigation", "sidebar"])
            .with_example(
                "single section",
                json!({
                    "items": [{
                        "title": "Guide",
                        "url_path": "/guide",
                        "active": true,
                        "in_trail": true,
                        "children": [],
                    }],
                }),
            ),
    )
}

fn render_menu_list(items: &[Value], helpers: &trellis_partials::Helpers<'_>) -> String {
    if items.is_empty() {
        return String::new();
    }

    let mut out = String::from(r#"<ul class="menu-list">"#);
    for item in items {
        let title = item["title"].as_str().unwrap_or_default();
        let url_path = item["url_path"].as_str().unwrap_or_default();
        let active = item["active"].as_bool().unwrap_or_default();
        let in_trail = item["in_trail"].as_bool().unwrap_or_default();
        let children = item["children"].as_array().map_or(&[][..], Vec::as_slice);

        let classes = helpers.class_names(&[
            ("menu-item", true),
            ("active", active),
            ("in-trail", in_trail),
        ]);
        let current = if active { r#" aria-current="page""# } else { "" };
        out.push_str(&format!(
            r#"<li class="{}"><a href="{}"{}>{}</a>{}</li>"#,
            classes,
            helpers.escape_html(url_path),
            current,
            helpers.escape_html(title),
            render_menu_list(children, helpers),
        ));
    }
    out.push_str("</ul>");
    out
}

/// Breadcrumb trail for the current page, root first.
fn breadcrumbs_partial() -> PartialDefinition {
    let schema = Schema::builder()
        .required("trail", FieldType::Array, "Breadcrumb entries, root first")
        .defaulted(
            "separator",
            FieldType::String,
            json!("/"),
            "Text placed between entries",
        )
        .build();

    PartialDefinition::new("breadcrumbs", schema, |props, helpers| {
        let trail = props["trail"].as_array().map_or(&[][..], Vec::as_slice);
        if trail.is_empty() {
            return Ok(String::new());
        }
        let separator = props["separator"].as_str().unwrap_or_default();

        let mut entries = String::new();
        for (i, crumb) in trail.iter().enumerate() {
            let title = item_str(crumb, "title");
            let url_path = item_str(crumb, "url_path");
            if i > 0 {
                entries.push_str(&format!(
                    r#"<li class="crumb-sep" aria-hidden="true">{}</li>"#,
                    helpers.escape_html(separator),
                ));
            }
            if i + 1 == trail.len() {
                // Current page: plain text, no self-link.
                entries.push_str(&format!(
                    r#"<li class="crumb"><span aria-current="page">{}</span></li>"#,
                    helpers.escape_html(title),
                ));
            } else {
                entries.push_str(&format!(
                    r#"<li class="crumb"><a href="{}">{}</a></li>"#,
                    helpers.escape_html(url_path),
                    helpers.escape_html(title),
                ));
            }
        }

        Ok(format!(
            r#"<nav class="{}" aria-label="Breadcrumb"><ol class="crumb-list">{}</ol></nav>"#,
            helpers.scope_class(),
            entries,
        ))
    })
    .with_styles(
        r".crumb-list { list-style: none; display: flex; gap: 0.5rem; margin: 0; padding: 0; }
.crumb-sep { color: gray; }",
    )
    .with_metadata(
        PartialMetadata::new("Breadcrumb trail for the current page", Category::Navigation)
            .with_keywords(["breadcrumbs", "trail", "navigation"])
            .with_example(
                "two levels",
                json!({
                    "trail": [
                        { "title": "Guide", "url_path": "/guide" },
                        { "title": "Install", "url_path": "/guide/install" },
                    ],
                }),
            ),
    )
}

fn item_str<'a>(value: &'a Value, key: &str) -> &'a str {
    value[key].as_str().unwrap_or_default()
}
