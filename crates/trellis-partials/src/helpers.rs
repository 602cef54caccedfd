//! Helper bundle passed to every render function.
//!
//! [`Helpers`] carries the capabilities a partial may use while rendering:
//! nested partial composition via [`Helpers::render_partial`], HTML
//! escaping, and small text/URL utilities. It also carries the recursion
//! state (the chain of entered partials), so nested renders are depth
//! limited and undeclared nesting is rejected at the call site.
//!
//! All helpers are pure; anything requiring I/O belongs to the caller.

use serde_json::Value;

use crate::definition::PartialDefinition;
use crate::engine::{RenderContext, RenderOptions};
use crate::error::RenderError;
use crate::registry::PartialRegistry;
use crate::styles;

/// Escape text for safe interpolation into HTML content or attributes.
///
/// Untrusted content must pass through here before landing in markup;
/// structural HTML can only come from render functions themselves.
#[must_use]
pub fn escape_html(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for ch in text.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(ch),
        }
    }
    out
}

/// Format a Unix timestamp (seconds) with a strftime-style format string.
///
/// Returns an empty string for out-of-range timestamps.
#[must_use]
pub fn format_date(epoch_secs: i64, format: &str) -> String {
    chrono::DateTime::<chrono::Utc>::from_timestamp(epoch_secs, 0)
        .map(|dt| dt.format(format).to_string())
        .unwrap_or_default()
}

/// Truncate text to at most `max_chars` characters, appending an ellipsis
/// when anything was cut. Operates on characters, never splitting a
/// multi-byte sequence.
#[must_use]
pub fn truncate(text: &str, max_chars: usize) -> String {
    if text.chars().count() <= max_chars {
        return text.to_owned();
    }
    let mut out: String = text.chars().take(max_chars.saturating_sub(1)).collect();
    out.push('…');
    out
}

/// Slugify text for URLs and identifiers: lowercase ASCII alphanumerics,
/// everything else collapsed to single hyphens.
#[must_use]
pub fn slugify(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut pending_hyphen = false;
    for ch in text.chars() {
        if ch.is_ascii_alphanumeric() {
            if pending_hyphen && !out.is_empty() {
                out.push('-');
            }
            pending_hyphen = false;
            out.extend(ch.to_lowercase());
        } else {
            pending_hyphen = true;
        }
    }
    out
}

/// Join a base URL and a path segment with exactly one slash.
#[must_use]
pub fn url_join(base: &str, path: &str) -> String {
    let base = base.trim_end_matches('/');
    let path = path.trim_start_matches('/');
    if path.is_empty() {
        return base.to_owned();
    }
    if base.is_empty() {
        return format!("/{path}");
    }
    format!("{base}/{path}")
}

/// Build a class attribute value from conditionally enabled names.
#[must_use]
pub fn class_names(candidates: &[(&str, bool)]) -> String {
    candidates
        .iter()
        .filter(|(_, enabled)| *enabled)
        .map(|(name, _)| *name)
        .collect::<Vec<_>>()
        .join(" ")
}

/// Capability bundle handed to render functions.
///
/// One `Helpers` value exists per entered partial; nested renders get a
/// fresh bundle with the recursion chain extended. The bundle borrows the
/// frozen registry and the caller's page context, so it is cheap to build
/// and render functions cannot mutate shared state through it.
pub struct Helpers<'a> {
    registry: &'a PartialRegistry,
    context: &'a RenderContext,
    options: &'a RenderOptions,
    current: &'a PartialDefinition,
    /// Entered partials, outermost first. Length is the current depth.
    chain: Vec<String>,
}

impl<'a> Helpers<'a> {
    pub(crate) fn root(
        registry: &'a PartialRegistry,
        context: &'a RenderContext,
        options: &'a RenderOptions,
        current: &'a PartialDefinition,
    ) -> Self {
        Self {
            registry,
            context,
            options,
            current,
            chain: vec![current.name().to_owned()],
        }
    }

    /// The caller-supplied page context.
    #[must_use]
    pub fn context(&self) -> &RenderContext {
        self.context
    }

    /// Current nesting depth (1 for a top-level render).
    #[must_use]
    pub fn depth(&self) -> usize {
        self.chain.len()
    }

    /// Scope class of the partial currently rendering, for use on its
    /// root element so scoped styles apply.
    #[must_use]
    pub fn scope_class(&self) -> String {
        styles::scope_class(self.current.name())
    }

    /// Render a declared dependency with the given props.
    ///
    /// # Errors
    ///
    /// - [`RenderError::UndeclaredDependency`] if the current partial did
    ///   not declare `name` as a dependency. Only declared dependencies are
    ///   renderable, so the static graph stays an accurate picture of
    ///   runtime composition.
    /// - [`RenderError::MaxDepthExceeded`] once nesting reaches the
    ///   configured limit; this catches compositions that are cyclic only
    ///   through dynamic partial names.
    /// - [`RenderError::NotFound`] / [`RenderError::Validation`] as for a
    ///   top-level render.
    pub fn render_partial(&self, name: &str, props: &Value) -> Result<String, RenderError> {
        if !self.current.declares_dependency(name) {
            return Err(RenderError::UndeclaredDependency {
                parent: self.current.name().to_owned(),
                name: name.to_owned(),
            });
        }

        if self.chain.len() >= self.options.max_depth {
            let mut chain = self.chain.clone();
            chain.push(name.to_owned());
            return Err(RenderError::MaxDepthExceeded {
                max_depth: self.options.max_depth,
                chain,
            });
        }

        let definition = self
            .registry
            .get(name)
            .ok_or_else(|| RenderError::NotFound {
                name: name.to_owned(),
            })?;

        let props = definition
            .schema()
            .validate(props)
            .map_err(|issues| RenderError::Validation {
                name: name.to_owned(),
                issues,
            })?;

        let mut chain = self.chain.clone();
        chain.push(name.to_owned());
        let nested = Helpers {
            registry: self.registry,
            context: self.context,
            options: self.options,
            current: definition,
            chain,
        };
        definition.invoke(&props, &nested)
    }

    /// See [`escape_html`].
    #[must_use]
    pub fn escape_html(&self, text: &str) -> String {
        escape_html(text)
    }

    /// See [`format_date`].
    #[must_use]
    pub fn format_date(&self, epoch_secs: i64, format: &str) -> String {
        format_date(epoch_secs, format)
    }

    /// See [`truncate`].
    #[must_use]
    pub fn truncate(&self, text: &str, max_chars: usize) -> String {
        truncate(text, max_chars)
    }

    /// See [`slugify`].
    #[must_use]
    pub fn slugify(&self, text: &str) -> String {
        slugify(text)
    }

    /// See [`url_join`].
    #[must_use]
    pub fn url_join(&self, base: &str, path: &str) -> String {
        url_join(base, path)
    }

    /// See [`class_names`].
    #[must_use]
    pub fn class_names(&self, candidates: &[(&str, bool)]) -> String {
        class_names(candidates)
    }
}
