//! CSS scoping and selector validation.
//!
//! Partial styles are written against plain selectors and scoped at render
//! time by prefixing every top-level selector with the partial's scope
//! class. Styles are parsed into (selector list, declaration block) rules
//! and prefixed programmatically rather than rewritten with regex, which
//! keeps the "no bare global selector" check precise.
//!
//! `@media` and `@supports` blocks are recursed into; `@keyframes` and
//! `@font-face` pass through untouched.

use std::fmt::Write;
use std::sync::OnceLock;

use regex::Regex;

/// Deterministic scope class for a partial name.
///
/// The same name always yields the same class, so repeated renders emit
/// identical style blocks.
#[must_use]
pub fn scope_class(name: &str) -> String {
    format!("trellis-{}", crate::helpers::slugify(name))
}

/// A parsed top-level CSS construct.
enum Rule<'a> {
    /// `selectors { block }`
    Style { selectors: &'a str, block: &'a str },
    /// `@prelude { block }`
    AtBlock { prelude: &'a str, block: &'a str },
    /// `@prelude;`
    AtStatement { prelude: &'a str },
}

/// Split CSS text into top-level rules by brace matching.
///
/// Nested braces (inside `@media`, `@keyframes`) stay inside the block of
/// their outer rule.
fn split_rules(css: &str) -> Vec<Rule<'_>> {
    let mut rules = Vec::new();
    let mut depth = 0usize;
    let mut start = 0;
    let mut block_start = 0;
    let mut prelude = "";

    for (i, ch) in css.char_indices() {
        match ch {
            '{' => {
                if depth == 0 {
                    prelude = css[start..i].trim();
                    block_start = i + 1;
                }
                depth += 1;
            }
            '}' => {
                depth = depth.saturating_sub(1);
                if depth == 0 {
                    let block = &css[block_start..i];
                    if !prelude.is_empty() {
                        if prelude.starts_with('@') {
                            rules.push(Rule::AtBlock { prelude, block });
                        } else {
                            rules.push(Rule::Style {
                                selectors: prelude,
                                block,
                            });
                        }
                    }
                    start = i + 1;
                }
            }
            ';' if depth == 0 => {
                let prelude = css[start..i].trim();
                if !prelude.is_empty() && prelude.starts_with('@') {
                    rules.push(Rule::AtStatement { prelude });
                }
                start = i + 1;
            }
            _ => {}
        }
    }

    rules
}

/// Whether an at-rule prelude wraps nested style rules that need scoping.
fn is_conditional_at_rule(prelude: &str) -> bool {
    prelude.starts_with("@media") || prelude.starts_with("@supports")
}

fn bare_element_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^[a-zA-Z][a-zA-Z0-9-]*$").expect("valid selector regex"))
}

/// Check whether a single selector would leak styles globally.
///
/// High-risk selectors are the universal selector and bare element
/// selectors (which include `body` and `html`); anything carrying a class,
/// id, attribute, or pseudo part is considered scoped enough to prefix.
fn is_global_selector(selector: &str) -> bool {
    selector == "*" || bare_element_re().is_match(selector)
}

/// Validate CSS text against the "no bare global selector" invariant.
///
/// # Errors
///
/// Returns the first offending top-level selector. Selectors inside
/// `@media`/`@supports` are checked too, since they end up at top level
/// once the condition matches.
pub fn validate_styles(css: &str) -> Result<(), String> {
    for rule in split_rules(css) {
        match rule {
            Rule::Style { selectors, .. } => {
                for selector in selectors.split(',') {
                    let selector = selector.trim();
                    if is_global_selector(selector) {
                        return Err(selector.to_owned());
                    }
                }
            }
            Rule::AtBlock { prelude, block } if is_conditional_at_rule(prelude) => {
                validate_styles(block)?;
            }
            Rule::AtBlock { .. } | Rule::AtStatement { .. } => {}
        }
    }
    Ok(())
}

/// Prefix every top-level selector in `css` with `.{class}`.
///
/// Declaration blocks are preserved verbatim; only selector lists are
/// rewritten. The output is deterministic for identical input.
#[must_use]
pub fn scope_styles(css: &str, class: &str) -> String {
    let mut out = String::with_capacity(css.len() + 64);

    for rule in split_rules(css) {
        match rule {
            Rule::Style { selectors, block } => {
                let scoped = selectors
                    .split(',')
                    .map(|s| format!(".{class} {}", s.trim()))
                    .collect::<Vec<_>>()
                    .join(", ");
                let _ = writeln!(out, "{scoped} {{{block}}}");
            }
            Rule::AtBlock { prelude, block } if is_conditional_at_rule(prelude) => {
                let inner = scope_styles(block, class);
                let _ = writeln!(out, "{prelude} {{\n{inner}}}");
            }
            Rule::AtBlock { prelude, block } => {
                let _ = writeln!(out, "{prelude} {{{block}}}");
            }
            Rule::AtStatement { prelude } => {
                let _ = writeln!(out, "{prelude};");
            }
        }
    }

    out
}
