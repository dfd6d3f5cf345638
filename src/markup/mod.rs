//! Markup renderer for message display
//!
//! Converts the restricted markup the model replies in to an HTML fragment.
//! The input is escaped first, so the output is safe to inject as-is.
//!
//! Supports:
//! - Headings (`# `, `## `, `### ` at line start)
//! - Block quotes (`> ` at line start)
//! - Bold (`**x**`) and italic (`*x*`)
//! - Fenced code blocks (```` ``` ````) and inline code (`` `x` ``)
//! - Newlines, rendered as `<br />` outside code blocks
//!
//! Code contents are never touched by the other rules.
//!
//! Includes a memoization layer (`MarkupCache`) keyed by content hash, since
//! a streaming reply re-renders the same finished messages many times.

mod cache;
mod rules;

pub use cache::MarkupCache;

use rules::{escape_html, ProtectedCode, RULES};

/// Maximum number of entries in the markup cache before eviction
pub const MARKUP_CACHE_MAX_ENTRIES: usize = 500;

/// Render markup text to an HTML fragment.
///
/// Pure and total: every input produces output, unmatched markers are left
/// as literal text.
///
/// # Example
///
/// ```
/// use omnicore::markup::render_markup;
///
/// assert_eq!(render_markup("**hi**\nthere"), "<strong>hi</strong><br />there");
/// ```
pub fn render_markup(text: &str) -> String {
    // Line rules anchor on `\n` only
    let escaped = escape_html(&text.replace("\r\n", "\n"));

    let mut code = ProtectedCode::default();
    let mut html = code.extract(&escaped);

    for rule in RULES.iter() {
        html = rule.pattern.replace_all(&html, rule.replacement).into_owned();
    }

    code.restore(&html)
}
