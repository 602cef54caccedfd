//! Content-driven navigation tree construction and traversal.
//!
//! Builds a site's hierarchical navigation from a flat list of discovered
//! content records: hierarchy from URL paths (with explicit per-record
//! parent overrides), deterministic sibling ordering, and derived
//! per-request views (active trails, breadcrumbs, annotated menus).
//!
//! # Architecture
//!
//! - [`ContentRecord`] is the input model, produced by an external
//!   content-discovery step. This crate never reads the filesystem.
//! - [`NavTree::build`] validates and assembles the tree in one shot;
//!   structural problems ([`TreeError`]) abort the whole build.
//! - The built [`NavTree`] is immutable. Request-scoped state is computed
//!   into fresh values ([`Breadcrumb`], [`AnnotatedNode`]), never written
//!   onto shared nodes.
//!
//! # Thread Safety
//!
//! [`NavTree`] is `Send + Sync` and designed to be shared across
//! concurrent page renders behind an `Arc` without locking.
//!
//! # Example
//!
//! ```
//! use trellis_nav::{ContentRecord, NavTree};
//!
//! let tree = NavTree::build(&[
//!     ContentRecord::new("guide.md", "/guide", "Guide"),
//!     ContentRecord::new("guide/install.md", "/guide/install", "Install"),
//! ])?;
//!
//! let crumbs = tree.breadcrumbs("/guide/install");
//! assert_eq!(crumbs.len(), 2);
//! # Ok::<(), trellis_nav::TreeError>(())
//! ```

mod builder;
mod error;
mod node;
mod record;
mod tree;

pub use error::TreeError;
pub use node::{node_id, normalize_path, AnnotatedNode, Breadcrumb, NavNode};
pub use record::ContentRecord;
pub use tree::NavTree;
