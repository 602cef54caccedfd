//! Content record input model.
//!
//! A [`ContentRecord`] is the minimal structured representation of a
//! discovered content file, supplied by an external content-discovery
//! component that reads frontmatter and filesystem metadata. This crate
//! never touches the filesystem itself.

use serde::{Deserialize, Serialize};

/// One discovered content file.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContentRecord {
    /// Source file path relative to the content root (e.g.
    /// `blog/posts/my-post.md`). Node ids are derived from this.
    pub file_path: String,
    /// URL path the file maps to (e.g. `/blog/posts/my-post`).
    pub url_path: String,
    /// Display title from frontmatter or filename.
    pub title: String,
    /// Explicit sibling order from frontmatter; lower sorts first.
    /// Absent means alphabetical placement after explicitly ordered
    /// siblings.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub order: Option<i64>,
    /// Hidden nodes stay in the tree (breadcrumbs need them) but are
    /// excluded from visible-children listings.
    #[serde(default)]
    pub hidden: bool,
    /// Explicit parent URL path override from frontmatter. Must name a
    /// discovered record; otherwise tree construction fails.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parent: Option<String>,
    /// Source file modification time (Unix seconds).
    #[serde(default)]
    pub last_modified: i64,
}

impl ContentRecord {
    /// Create a record with the required fields.
    #[must_use]
    pub fn new(
        file_path: impl Into<String>,
        url_path: impl Into<String>,
        title: impl Into<String>,
    ) -> Self {
        Self {
            file_path: file_path.into(),
            url_path: url_path.into(),
            title: title.into(),
            order: None,
            hidden: false,
            parent: None,
            last_modified: 0,
        }
    }

    /// Set an explicit sibling order.
    #[must_use]
    pub fn with_order(mut self, order: i64) -> Self {
        self.order = Some(order);
        self
    }

    /// Mark the record hidden.
    #[must_use]
    pub fn with_hidden(mut self, hidden: bool) -> Self {
        self.hidden = hidden;
        self
    }

    /// Set an explicit parent URL path.
    #[must_use]
    pub fn with_parent(mut self, parent: impl Into<String>) -> Self {
        self.parent = Some(parent.into());
        self
    }

    /// Set the modification time (Unix seconds).
    #[must_use]
    pub fn with_last_modified(mut self, last_modified: i64) -> Self {
        self.last_modified = last_modified;
        self
    }
}
