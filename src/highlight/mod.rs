//! Syntax highlighting for code blocks.
//!
//! Uses syntect with Sublime Text syntax definitions, emitting
//! class-annotated HTML spans so the page stylesheet controls colors.
//! Every path through [`highlight`] returns escaped markup; unknown
//! languages and grammar failures fall back to escaped plaintext.

use std::sync::OnceLock;

use syntect::highlighting::{Theme, ThemeSet};
use syntect::html::{css_for_theme_with_class_style, ClassStyle, ClassedHTMLGenerator};
use syntect::parsing::SyntaxSet;
use syntect::util::LinesWithEndings;

/// Sentinel language for empty or unresolvable tags.
pub const PLAINTEXT: &str = "plaintext";

/// Short-tag aliases resolved before grammar lookup.
///
/// Ordered for readability only; keys are disjoint so lookup order
/// doesn't matter.
const LANGUAGE_ALIASES: &[(&str, &str)] = &[
    ("js", "javascript"),
    ("jsx", "javascript"),
    ("ts", "typescript"),
    ("tsx", "typescript"),
    ("py", "python"),
    ("rb", "ruby"),
    ("rs", "rust"),
    ("sh", "bash"),
    ("shell", "bash"),
    ("zsh", "bash"),
    ("yml", "yaml"),
    ("md", "markdown"),
    ("kt", "kotlin"),
    ("cs", "csharp"),
    ("golang", "go"),
    ("docker", "dockerfile"),
    ("text", PLAINTEXT),
    ("txt", PLAINTEXT),
    ("plain", PLAINTEXT),
];

/// Human-readable labels for the language header on code blocks.
const DISPLAY_NAMES: &[(&str, &str)] = &[
    ("javascript", "JavaScript"),
    ("typescript", "TypeScript"),
    ("python", "Python"),
    ("ruby", "Ruby"),
    ("rust", "Rust"),
    ("bash", "Bash"),
    ("yaml", "YAML"),
    ("json", "JSON"),
    ("html", "HTML"),
    ("css", "CSS"),
    ("markdown", "Markdown"),
    ("kotlin", "Kotlin"),
    ("csharp", "C#"),
    ("cpp", "C++"),
    ("c", "C"),
    ("go", "Go"),
    ("java", "Java"),
    ("php", "PHP"),
    ("sql", "SQL"),
    ("swift", "Swift"),
    ("dockerfile", "Dockerfile"),
    ("toml", "TOML"),
    ("xml", "XML"),
    (PLAINTEXT, "Code"),
];

/// Resolve a fence tag to its canonical grammar key.
///
/// Matching is case-insensitive; empty tags resolve to the plaintext
/// sentinel and unknown tags pass through lowercased.
pub fn normalize_language(tag: &str) -> String {
    let lower = tag.trim().to_ascii_lowercase();
    if lower.is_empty() {
        return PLAINTEXT.to_string();
    }
    for (alias, canonical) in LANGUAGE_ALIASES {
        if *alias == lower {
            return (*canonical).to_string();
        }
    }
    lower
}

/// Human-readable label for a fence tag.
///
/// Falls back to uppercasing the raw tag when neither the alias table
/// nor the display table knows it, so the header never shows markup.
pub fn display_name(tag: &str) -> String {
    let canonical = normalize_language(tag);
    for (key, label) in DISPLAY_NAMES {
        if *key == canonical {
            return (*label).to_string();
        }
    }
    tag.trim().to_ascii_uppercase()
}

/// Highlight source text for a fence tag.
///
/// Returns the inner markup for a code element: class-annotated spans
/// when a grammar is registered for the normalized tag, escaped
/// plaintext otherwise. Grammar-internal failures are logged and fall
/// back to the escaped path; the result never contains unescaped user
/// text.
pub fn highlight(text: &str, tag: &str) -> String {
    let canonical = normalize_language(tag);
    let syntax_set = syntax_set();
    let Some(syntax) = syntax_set.find_syntax_by_token(&canonical) else {
        return escape_html(text);
    };

    let mut generator =
        ClassedHTMLGenerator::new_with_class_style(syntax, syntax_set, ClassStyle::Spaced);
    for line in LinesWithEndings::from(text) {
        if let Err(err) = generator.parse_html_for_line_which_includes_newline(line) {
            tracing::warn!(language = %canonical, error = %err, "highlighting failed, falling back to plaintext");
            return escape_html(text);
        }
    }
    generator.finalize()
}

/// Escape text for embedding in HTML content or attribute values.
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

fn syntax_set() -> &'static SyntaxSet {
    static SYNTAX_SET: OnceLock<SyntaxSet> = OnceLock::new();
    SYNTAX_SET.get_or_init(SyntaxSet::load_defaults_newlines)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HighlightBackground {
    Light,
    Dark,
}

/// CSS for the class-annotated spans emitted by [`highlight`].
///
/// Picks a bundled syntect theme matching the requested background and
/// converts it to class-based rules. An empty string on conversion
/// failure leaves code readable but uncolored.
pub fn stylesheet(mode: HighlightBackground) -> String {
    match css_for_theme_with_class_style(theme(mode), ClassStyle::Spaced) {
        Ok(css) => css,
        Err(err) => {
            tracing::warn!(error = %err, "failed to generate highlight stylesheet");
            String::new()
        }
    }
}

fn theme(mode: HighlightBackground) -> &'static Theme {
    static DARK: OnceLock<Theme> = OnceLock::new();
    static LIGHT: OnceLock<Theme> = OnceLock::new();
    let (cell, preferred): (&OnceLock<Theme>, &[&str]) = match mode {
        HighlightBackground::Dark => (
            &DARK,
            &[
                "Monokai Extended",
                "Monokai Extended Bright",
                "Dracula",
                "Solarized (dark)",
                "base16-ocean.dark",
            ],
        ),
        HighlightBackground::Light => (
            &LIGHT,
            &["InspiredGitHub", "Solarized (light)", "base16-ocean.light"],
        ),
    };

    cell.get_or_init(|| {
        let theme_set = ThemeSet::load_defaults();
        for name in preferred {
            if let Some(theme) = theme_set.themes.get(*name) {
                return theme.clone();
            }
        }
        theme_set
            .themes
            .values()
            .next()
            .cloned()
            .unwrap_or_default()
    })
}
