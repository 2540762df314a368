//! Markdown document parsing and rendering.
//!
//! This module handles:
//! - Parsing chat-message markdown with comrak
//! - Rendering typed nodes to HTML fragments
//! - Alert directive detection in blockquotes
//!
//! [`render_message`] is the entry point callers should use: it
//! composes rendering with allow-list sanitization so the result is
//! safe to inject into a page.

mod alerts;
mod render;

pub use alerts::{detect as detect_alert, AlertKind, AlertMatch};
pub use render::render_fragment;

use crate::highlight::{self, HighlightBackground};
use crate::sanitize;

/// Render an untrusted message body to sanitized HTML.
///
/// A pure function of its input: no state crosses calls apart from the
/// lazily loaded grammar set. Never fails; adversarial input degrades
/// to literal text.
///
/// # Example
///
/// ```
/// use chatdown::document::render_message;
///
/// let html = render_message("**hi** <script>alert(1)</script>");
/// assert!(html.contains("<strong>hi</strong>"));
/// assert!(!html.contains("<script>"));
/// ```
pub fn render_message(source: &str) -> String {
    sanitize::sanitize(&render_fragment(source))
}

/// Base layout rules for the fragment's structural classes.
const BASE_STYLES: &str = "\
body { max-width: 46rem; margin: 2rem auto; padding: 0 1rem; font-family: sans-serif; line-height: 1.5; }
.code-block { border: 1px solid #8884; border-radius: 6px; margin: 1em 0; }
.code-header { display: flex; justify-content: space-between; padding: 0.3em 0.8em; border-bottom: 1px solid #8884; }
.code-lang { font-size: 0.8em; opacity: 0.7; }
.code-copy { cursor: pointer; }
.code-block pre { margin: 0; padding: 0.8em; overflow-x: auto; }
.alert { border-left: 4px solid #888; border-radius: 4px; padding: 0.5em 1em; margin: 1em 0; }
.alert-title { font-weight: bold; margin: 0 0 0.3em; }
.alert-icon { margin-right: 0.4em; }
.alert-note { border-color: #4493f8; }
.alert-tip { border-color: #3fb950; }
.alert-important { border-color: #ab7df8; }
.alert-warning { border-color: #d29922; }
.alert-caution { border-color: #f85149; }
.external-link-icon { font-size: 0.8em; margin-left: 0.15em; }
blockquote { border-left: 3px solid #8886; margin-left: 0; padding-left: 1em; opacity: 0.9; }
table { border-collapse: collapse; }
th, td { border: 1px solid #8886; padding: 0.3em 0.7em; }
";

/// Wrap a sanitized fragment in a minimal standalone page with the
/// highlight stylesheet embedded.
pub fn page(fragment: &str, title: &str, mode: HighlightBackground) -> String {
    format!(
        "<!DOCTYPE html>\n<html>\n<head>\n<meta charset=\"utf-8\">\n<title>{}</title>\n\
         <style>\n{}\n{}</style>\n</head>\n<body>\n{}</body>\n</html>\n",
        highlight::escape_html(title),
        BASE_STYLES,
        highlight::stylesheet(mode),
        fragment
    )
}
