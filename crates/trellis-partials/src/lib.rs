//! Schema-validated partial registry and composition engine for Trellis.
//!
//! This crate provides:
//! - [`PartialDefinition`]: an immutable template component bundling a data
//!   contract, a pure render function, scoped styles, and metadata
//! - [`PartialRegistry`]: the authoritative collection of partials for a
//!   build, with duplicate rejection and dependency-graph validation
//! - [`Renderer`]: the composition engine, which validates props, executes
//!   render functions with a [`Helpers`] bundle, and aggregates scoped
//!   styles across the dependency closure
//!
//! # Architecture
//!
//! The registry is populated during a sequential startup phase and frozen
//! before rendering begins. Rendering is a pure function of
//! `(registry, name, props, context)`; nested composition goes through
//! [`Helpers::render_partial`], which admits only declared dependencies and
//! enforces a maximum nesting depth.
//!
//! # Example
//!
//! ```
//! use serde_json::json;
//! use trellis_partials::{
//!     Category, PartialDefinition, PartialMetadata, PartialRegistry, RenderContext, Renderer,
//! };
//! use trellis_schema::{FieldType, Schema};
//!
//! let schema = Schema::builder()
//!     .required("text", FieldType::String, "Badge text")
//!     .build();
//! let badge = PartialDefinition::new("badge", schema, |props, helpers| {
//!     let text = props["text"].as_str().unwrap_or_default();
//!     Ok(format!(
//!         r#"<span class="{}">{}</span>"#,
//!         helpers.scope_class(),
//!         helpers.escape_html(text)
//!     ))
//! })
//! .with_styles(".label { font-weight: bold; }")
//! .with_metadata(
//!     PartialMetadata::new("A small badge", Category::Utility)
//!         .with_example("basic", json!({"text": "New"})),
//! );
//!
//! let mut registry = PartialRegistry::new();
//! registry.register(badge)?;
//! registry.validate_graph()?;
//!
//! let result = Renderer::new().render(
//!     &registry,
//!     "badge",
//!     &json!({"text": "New"}),
//!     &RenderContext::new("/"),
//! )?;
//! assert!(result.html.contains("New"));
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

mod definition;
mod engine;
mod error;
pub mod helpers;
mod registry;
pub mod styles;

pub use definition::{Category, PartialDefinition, PartialMetadata, RenderFn, UsageExample};
pub use engine::{RenderContext, RenderOptions, RenderResult, Renderer};
pub use error::{RegistryError, RenderError};
pub use helpers::Helpers;
pub use registry::{PartialId, PartialRegistry};

// Re-export the schema types partial authors need.
pub use trellis_schema::{FieldType, Issue, Schema};
