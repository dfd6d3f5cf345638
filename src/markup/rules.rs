//! Ordered substitution rules for the markup renderer.
//!
//! Code is lifted out first and replaced with sentinel placeholders so the
//! heading, quote and emphasis rules never see its contents.

use once_cell::sync::Lazy;
use regex::{Captures, Regex};

/// Placeholder delimiter. Input NULs are replaced during escaping, so a
/// sentinel can only come from code extraction.
const SENTINEL: char = '\u{0}';

/// A line-level or inline substitution applied to escaped text.
pub(crate) struct Rule {
    pub name: &'static str,
    pub pattern: Regex,
    pub replacement: &'static str,
}

fn rule(name: &'static str, pattern: &str, replacement: &'static str) -> Rule {
    Rule {
        name,
        pattern: Regex::new(pattern).expect("Invalid markup rule pattern"),
        replacement,
    }
}

/// Fenced code block, may span lines
static CODE_BLOCK_REGEX: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"```([\s\S]*?)```").expect("Invalid code block regex pattern"));

/// Inline code span, single line
static INLINE_CODE_REGEX: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"`([^`\n]*?)`").expect("Invalid inline code regex pattern"));

static PLACEHOLDER_REGEX: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\x00(\d+)\x00").expect("Invalid placeholder regex pattern"));

/// Rules run in order on text with code already extracted. Headings go
/// deepest first so `### ` is not read as `# `.
pub(crate) static RULES: Lazy<Vec<Rule>> = Lazy::new(|| {
    vec![
        rule("h3", r"(?m)^### (.*)$", "<h3>$1</h3>"),
        rule("h2", r"(?m)^## (.*)$", "<h2>$1</h2>"),
        rule("h1", r"(?m)^# (.*)$", "<h1>$1</h1>"),
        // `>` is already escaped when this runs
        rule("blockquote", r"(?m)^&gt; (.*)$", "<blockquote>$1</blockquote>"),
        rule("bold", r"\*\*(.*?)\*\*", "<strong>$1</strong>"),
        rule("italic", r"\*(.*?)\*", "<em>$1</em>"),
        rule("newline", r"\n", "<br />"),
    ]
});

/// Escape HTML special characters and drop NULs.
pub(crate) fn escape_html(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            SENTINEL => out.push('\u{FFFD}'),
            c => out.push(c),
        }
    }
    out
}

/// Code fragments lifted out of the text, indexed by placeholder number.
#[derive(Debug, Default)]
pub(crate) struct ProtectedCode {
    fragments: Vec<String>,
}

impl ProtectedCode {
    fn protect(&mut self, html: String) -> String {
        let index = self.fragments.len();
        self.fragments.push(html);
        format!("{SENTINEL}{index}{SENTINEL}")
    }

    /// Replace code blocks then inline spans with placeholders.
    pub fn extract(&mut self, text: &str) -> String {
        let without_blocks = CODE_BLOCK_REGEX
            .replace_all(text, |caps: &Captures| {
                self.protect(format!("<pre><code>{}</code></pre>", &caps[1]))
            })
            .into_owned();

        INLINE_CODE_REGEX
            .replace_all(&without_blocks, |caps: &Captures| {
                self.protect(format!("<code>{}</code>", &caps[1]))
            })
            .into_owned()
    }

    /// Put the rendered code back in place of its placeholders.
    pub fn restore(&self, text: &str) -> String {
        if self.fragments.is_empty() {
            return text.to_string();
        }
        PLACEHOLDER_REGEX
            .replace_all(text, |caps: &Captures| {
                caps[1]
                    .parse::<usize>()
                    .ok()
                    .and_then(|i| self.fragments.get(i))
                    .cloned()
                    .unwrap_or_default()
            })
            .into_owned()
    }
}
