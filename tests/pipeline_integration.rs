//! End-to-end properties of the parse → render → sanitize pipeline.

use chatdown::clipboard::copy_targets;
use chatdown::document::{render_fragment, render_message};
use chatdown::highlight::highlight;
use chatdown::sanitize::sanitize;

#[test]
fn test_script_body_never_survives_pipeline() {
    let cases = [
        "<script>alert(1)</script>",
        "text with <script>alert(1)</script> inline",
        "```html\n<script>alert(1)</script>\n```",
        "> <script>alert(1)</script>",
        "[x](javascript:alert(1))",
    ];
    for case in cases {
        let html = render_message(case);
        assert!(!html.contains("<script"), "case {case:?} leaked: {html}");
        assert!(!html.to_lowercase().contains("javascript:"), "case {case:?} leaked: {html}");
    }
}

#[test]
fn test_event_handler_attributes_never_survive_pipeline() {
    // Raw markup in a message is escaped to literal text, so the words
    // may appear in prose; what must never survive is the tag itself.
    let html = render_message(r#"<img src="x" onerror="alert(1)"> and <div onclick="x()">hi</div>"#);
    assert!(!html.contains("<img"), "raw tag must not survive: {html}");
    assert!(!html.contains("<div"), "raw tag must not survive: {html}");
}

#[test]
fn test_unknown_language_highlight_is_escaped() {
    assert_eq!(highlight("<b>hi</b>", "unknownlang"), "&lt;b&gt;hi&lt;/b&gt;");
}

#[test]
fn test_alias_and_canonical_highlight_agree() {
    let code = "def f():\n    return 1\n";
    assert_eq!(highlight(code, "py"), highlight(code, "python"));
}

#[test]
fn test_warning_alert_end_to_end() {
    let html = render_message("> [!WARNING] mind the gap");
    assert!(html.contains("alert-warning"), "got: {html}");
    assert!(html.contains("Warning"), "localized title: {html}");
    assert!(!html.contains("[!WARNING]"), "marker stripped from body: {html}");
}

#[test]
fn test_sanitize_idempotent_on_rendered_output() {
    let md = "# Hi\n\n```rust\nlet x = 1;\n```\n\n> [!TIP] tip\n\n| a | b |\n|---|---|\n| 1 |\n";
    let once = sanitize(&render_fragment(md));
    assert_eq!(sanitize(&once), once);
}

#[test]
fn test_external_and_internal_links_end_to_end() {
    let html = render_message("[ext](https://example.com) and [int](/local)");
    let ext = html.split("</a>").next().unwrap_or("");
    assert!(ext.contains("target=\"_blank\""), "got: {html}");
    assert!(ext.contains("rel=\"noopener noreferrer\""), "got: {html}");
    let int = html.split("</a>").nth(1).unwrap_or("");
    assert!(!int.contains("target="), "got: {html}");
    assert!(!int.contains("rel="), "got: {html}");
}

#[test]
fn test_table_short_row_renders_empty_cell_after_sanitize() {
    let md = "| a | b | c |\n|---|---|---|\n| 1 | 2 |\n";
    let html = render_message(md);
    let body = html.split("<tbody>").nth(1).unwrap_or("");
    assert_eq!(body.matches("<td>").count(), 3, "got: {html}");
}

#[test]
fn test_copy_payload_round_trips_through_sanitized_html() {
    let source = "echo \"hello & goodbye\" > out.txt\n";
    let html = render_message(&format!("```sh\n{source}```"));
    let targets = copy_targets(&html);
    assert_eq!(targets.len(), 1, "got: {html}");
    assert_eq!(targets[0].payload().unwrap(), source);
}

#[test]
fn test_adversarial_attribute_breakout_attempt() {
    // A fence tag crafted to break out of the class attribute
    let html = render_message("```\"><script>alert(1)</script>\nx\n```");
    assert!(!html.contains("<script"), "got: {html}");
}

#[test]
fn test_pipeline_never_panics_on_junk() {
    let cases = [
        "",
        "\u{0}\u{1}\u{2}",
        "><><><",
        "``` \n```",
        "| | |\n|---|\n",
        "> [!",
        "[](<>)",
        &"#".repeat(500),
    ];
    for case in cases {
        let _ = render_message(case);
    }
}
