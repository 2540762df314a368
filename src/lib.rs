// Only allow lints that are either transitive-dependency noise or
// genuinely opinionated style choices that don't indicate real issues.
#![allow(
    // Transitive dependency version mismatches we can't control
    clippy::multiple_crate_versions,
    // module_name_repetitions is pure style preference (e.g. sanitize::SanitizePolicy)
    clippy::module_name_repetitions
)]

//! # Chatdown
//!
//! Renders untrusted chat-message markdown into sanitized HTML.
//!
//! Message bodies arriving from users or models are treated as hostile
//! input. Chatdown converts them into HTML that is safe to inject into a
//! page:
//! - Syntax-highlighted code blocks with copy-to-clipboard affordances
//! - GitHub-style alert directives (`[!NOTE]`, `[!WARNING]`, ...)
//! - External-link marking with `target`/`rel` hardening
//! - Allow-list sanitization as the last line of defense
//!
//! ## Pipeline
//!
//! Raw text flows through a single synchronous pass:
//! parse (comrak) → render per node kind → sanitize (allow-list) →
//! final HTML. Copy affordances are bound afterwards from the rendered
//! output.
//!
//! ## Modules
//!
//! - [`document`]: Markdown parsing and HTML rendering
//! - [`highlight`]: Syntax highlighting for code blocks
//! - [`sanitize`]: Allow-list HTML sanitization
//! - [`clipboard`]: Copy affordance extraction and clipboard writes
//! - [`config`]: Persisted CLI defaults

pub mod clipboard;
pub mod config;
pub mod document;
pub mod highlight;
pub mod sanitize;

/// Re-export commonly used types
pub mod prelude {
    pub use crate::clipboard::{copy_targets, CopyTarget};
    pub use crate::document::{render_fragment, render_message};
    pub use crate::sanitize::sanitize;
}
