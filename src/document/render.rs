//! HTML rendering of parsed markdown nodes.
//!
//! Walks the comrak AST and emits an HTML fragment per node kind via a
//! closed dispatch. Custom handling covers code blocks (highlighting +
//! copy affordance), blockquotes (alert directives), tables (positional
//! columns), and links (external marking). Raw HTML from the source is
//! always shown as literal text. Everything else falls through to
//! comrak's own formatter.

use comrak::nodes::{AstNode, ListType, NodeCodeBlock, NodeLink, NodeValue};
use comrak::{format_html, parse_document, Arena, Options};

use super::alerts;
use crate::highlight::{self, escape_html};

/// Render markdown source to an unsanitized HTML fragment.
///
/// Never fails: malformed content degrades to plain or literal text.
/// Callers injecting the result into a page should pass it through
/// [`crate::sanitize::sanitize`] (or use
/// [`crate::document::render_message`], which composes both).
pub fn render_fragment(source: &str) -> String {
    let arena = Arena::new();
    let options = create_options();
    let root = parse_document(&arena, source, &options);

    let mut out = String::new();
    for child in root.children() {
        render_node(child, &options, &mut out);
    }
    out
}

fn create_options() -> Options {
    let mut options = Options::default();

    // GFM extensions used in chat messages
    options.extension.strikethrough = true;
    options.extension.table = true;
    options.extension.autolink = true;
    options.extension.tasklist = true;

    // Chat convention: a single newline is a line break
    options.render.hardbreaks = true;

    options
}

fn render_node<'a>(node: &'a AstNode<'a>, options: &Options, out: &mut String) {
    let value = node.data.borrow().value.clone();
    match value {
        NodeValue::Document => {
            for child in node.children() {
                render_node(child, options, out);
            }
        }

        NodeValue::Paragraph => {
            out.push_str("<p>");
            render_inline_children(node, options, out);
            out.push_str("</p>\n");
        }

        NodeValue::Heading(heading) => {
            let level = heading.level.clamp(1, 6);
            out.push_str(&format!("<h{level}>"));
            render_inline_children(node, options, out);
            out.push_str(&format!("</h{level}>\n"));
        }

        NodeValue::CodeBlock(ref code_block) => render_code_block(code_block, out),

        NodeValue::BlockQuote => render_blockquote(node, options, out),

        NodeValue::Table(_) => render_table(node, options, out),

        NodeValue::List(list) => {
            let (open, close) = match list.list_type {
                ListType::Bullet => ("<ul>".to_string(), "</ul>"),
                ListType::Ordered => {
                    if list.start == 1 {
                        ("<ol>".to_string(), "</ol>")
                    } else {
                        (format!("<ol start=\"{}\">", list.start), "</ol>")
                    }
                }
            };
            out.push_str(&open);
            out.push('\n');
            for item in node.children() {
                render_node(item, options, out);
            }
            out.push_str(close);
            out.push('\n');
        }

        NodeValue::Item(_) => {
            out.push_str("<li>");
            render_list_item_children(node, options, out);
            out.push_str("</li>\n");
        }

        NodeValue::TaskItem(symbol) => {
            out.push_str("<li class=\"task-item\">");
            if symbol.is_some() {
                out.push_str("<input type=\"checkbox\" disabled checked /> ");
            } else {
                out.push_str("<input type=\"checkbox\" disabled /> ");
            }
            render_list_item_children(node, options, out);
            out.push_str("</li>\n");
        }

        NodeValue::ThematicBreak => out.push_str("<hr />\n"),

        // Raw HTML is shown, never executed
        NodeValue::HtmlBlock(ref block) => {
            out.push_str("<p>");
            out.push_str(&escape_html(block.literal.trim_end()));
            out.push_str("</p>\n");
        }

        _ => render_default(node, options, out),
    }
}

/// Tight list items hoist their paragraph content directly into the
/// `<li>`; nested blocks render normally.
fn render_list_item_children<'a>(node: &'a AstNode<'a>, options: &Options, out: &mut String) {
    for child in node.children() {
        if matches!(child.data.borrow().value, NodeValue::Paragraph) {
            render_inline_children(child, options, out);
        } else {
            render_node(child, options, out);
        }
    }
}

fn render_code_block(code_block: &NodeCodeBlock, out: &mut String) {
    let tag = code_block.info.split_whitespace().next().unwrap_or("");
    let canonical = highlight::normalize_language(tag);
    let label = highlight::display_name(tag);
    // The copy payload is the original source, not the highlighted
    // markup, percent-encoded for attribute embedding.
    let payload = urlencoding::encode(&code_block.literal);

    out.push_str("<div class=\"code-block\"><div class=\"code-header\"><span class=\"code-lang\">");
    out.push_str(&escape_html(&label));
    out.push_str("</span><button class=\"code-copy\" type=\"button\" data-code=\"");
    out.push_str(&payload);
    out.push_str("\">Copy</button></div><pre><code class=\"language-");
    out.push_str(&escape_html(&canonical));
    out.push_str("\">");
    out.push_str(&highlight::highlight(&code_block.literal, tag));
    out.push_str("</code></pre></div>\n");
}

fn render_blockquote<'a>(node: &'a AstNode<'a>, options: &Options, out: &mut String) {
    if let Some(matched) = leading_text(node).as_deref().and_then(alerts::detect) {
        strip_directive(node, matched.strip_len);
        let kind = matched.kind;
        out.push_str(&format!("<div class=\"alert {}\">", kind.css_class()));
        out.push_str(&format!(
            "<p class=\"alert-title\"><span class=\"alert-icon\">{}</span>{}</p>\n",
            kind.icon(),
            kind.title()
        ));
        for child in node.children() {
            render_node(child, options, out);
        }
        out.push_str("</div>\n");
    } else {
        out.push_str("<blockquote>\n");
        for child in node.children() {
            render_node(child, options, out);
        }
        out.push_str("</blockquote>\n");
    }
}

/// The literal of the blockquote's leading text node, where an alert
/// directive would sit.
fn leading_text<'a>(node: &'a AstNode<'a>) -> Option<String> {
    leading_text_node(node).map(|text_node| match &text_node.data.borrow().value {
        NodeValue::Text(t) => t.clone(),
        _ => String::new(),
    })
}

/// A directive only counts at the start of the quote: the first child
/// must be a paragraph and its first inline must be plain text.
fn leading_text_node<'a>(node: &'a AstNode<'a>) -> Option<&'a AstNode<'a>> {
    let paragraph = node.first_child()?;
    if !matches!(paragraph.data.borrow().value, NodeValue::Paragraph) {
        return None;
    }
    let lead = paragraph.first_child()?;
    if matches!(lead.data.borrow().value, NodeValue::Text(_)) {
        Some(lead)
    } else {
        None
    }
}

/// Remove a matched directive marker from the blockquote's leading text
/// node, along with a now-leading line break when the marker stood on
/// its own line.
fn strip_directive<'a>(node: &'a AstNode<'a>, strip_len: usize) {
    let Some(text_node) = leading_text_node(node) else {
        return;
    };
    let remainder = {
        let ast = text_node.data.borrow();
        match &ast.value {
            NodeValue::Text(t) => t.get(strip_len..).unwrap_or("").to_string(),
            _ => return,
        }
    };
    if remainder.is_empty() {
        if let Some(next) = text_node.next_sibling() {
            if matches!(
                next.data.borrow().value,
                NodeValue::SoftBreak | NodeValue::LineBreak
            ) {
                next.detach();
            }
        }
        text_node.detach();
    } else {
        text_node.data.borrow_mut().value = NodeValue::Text(remainder);
    }
}

/// Header cell *i* labels column *i* for every row: the header fixes
/// the column count, missing cells render empty, excess cells drop.
fn render_table<'a>(node: &'a AstNode<'a>, options: &Options, out: &mut String) {
    let mut columns = 0;
    let mut in_body = false;
    out.push_str("<table>");
    for row in node.children() {
        let is_header = match row.data.borrow().value {
            NodeValue::TableRow(header) => header,
            _ => continue,
        };
        let cells: Vec<&AstNode> = row
            .children()
            .filter(|cell| matches!(cell.data.borrow().value, NodeValue::TableCell))
            .collect();

        if is_header {
            columns = cells.len();
            out.push_str("<thead><tr>");
            for cell in &cells {
                out.push_str("<th>");
                render_inline_children(cell, options, out);
                out.push_str("</th>");
            }
            out.push_str("</tr></thead>");
        } else {
            if !in_body {
                out.push_str("<tbody>");
                in_body = true;
            }
            out.push_str("<tr>");
            for index in 0..columns {
                out.push_str("<td>");
                if let Some(cell) = cells.get(index) {
                    render_inline_children(cell, options, out);
                }
                out.push_str("</td>");
            }
            out.push_str("</tr>");
        }
    }
    if in_body {
        out.push_str("</tbody>");
    }
    out.push_str("</table>\n");
}

fn render_inline_children<'a>(node: &'a AstNode<'a>, options: &Options, out: &mut String) {
    for child in node.children() {
        render_inline(child, options, out);
    }
}

fn render_inline<'a>(node: &'a AstNode<'a>, options: &Options, out: &mut String) {
    let value = node.data.borrow().value.clone();
    match value {
        NodeValue::Text(ref text) => out.push_str(&escape_html(text)),

        // Inline code is plaintext only; highlighting grammars expect
        // preformatted blocks and would bleed styles here.
        NodeValue::Code(ref code) => {
            out.push_str("<code>");
            out.push_str(&escape_html(&code.literal));
            out.push_str("</code>");
        }

        NodeValue::Emph => {
            out.push_str("<em>");
            render_inline_children(node, options, out);
            out.push_str("</em>");
        }

        NodeValue::Strong => {
            out.push_str("<strong>");
            render_inline_children(node, options, out);
            out.push_str("</strong>");
        }

        NodeValue::Strikethrough => {
            out.push_str("<del>");
            render_inline_children(node, options, out);
            out.push_str("</del>");
        }

        NodeValue::Link(ref link) => render_link(node, link, options, out),

        NodeValue::Image(ref link) => {
            let mut alt = String::new();
            for child in node.children() {
                extract_text_recursive(child, &mut alt);
            }
            out.push_str("<img src=\"");
            out.push_str(&escape_html(&link.url));
            out.push_str("\" alt=\"");
            out.push_str(&escape_html(&alt));
            if link.title.is_empty() {
                out.push_str("\" />");
            } else {
                out.push_str("\" title=\"");
                out.push_str(&escape_html(&link.title));
                out.push_str("\" />");
            }
        }

        NodeValue::SoftBreak | NodeValue::LineBreak => out.push_str("<br />\n"),

        // Raw inline HTML is shown, never executed
        NodeValue::HtmlInline(ref raw) => out.push_str(&escape_html(raw)),

        _ => render_default(node, options, out),
    }
}

fn render_link<'a>(node: &'a AstNode<'a>, link: &NodeLink, options: &Options, out: &mut String) {
    let external = is_external(&link.url);
    out.push_str("<a href=\"");
    out.push_str(&escape_html(&link.url));
    out.push('"');
    if !link.title.is_empty() {
        out.push_str(" title=\"");
        out.push_str(&escape_html(&link.title));
        out.push('"');
    }
    if external {
        out.push_str(" target=\"_blank\" rel=\"noopener noreferrer\"");
    }
    out.push('>');
    render_inline_children(node, options, out);
    if external {
        out.push_str("<span class=\"external-link-icon\">↗</span>");
    }
    out.push_str("</a>");
}

fn is_external(url: &str) -> bool {
    let lower = url.trim_start().to_ascii_lowercase();
    lower.starts_with("http://") || lower.starts_with("https://")
}

/// Fall through to comrak's own HTML formatter for node kinds without
/// custom handling. The options keep raw HTML disabled, so this path is
/// escaped as well.
fn render_default<'a>(node: &'a AstNode<'a>, options: &Options, out: &mut String) {
    let mut buffer = Vec::new();
    if format_html(node, options, &mut buffer).is_ok() {
        out.push_str(&String::from_utf8_lossy(&buffer));
    }
}

fn extract_text_recursive<'a>(node: &'a AstNode<'a>, text: &mut String) {
    match &node.data.borrow().value {
        NodeValue::Text(t) => text.push_str(t),
        NodeValue::Code(code) => text.push_str(&code.literal),
        NodeValue::SoftBreak | NodeValue::LineBreak => text.push(' '),
        _ => {
            for child in node.children() {
                extract_text_recursive(child, text);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_paragraph_renders_with_escaped_text() {
        let html = render_fragment("a < b & c");
        assert!(html.contains("<p>a &lt; b &amp; c</p>"), "got: {html}");
    }

    #[test]
    fn test_single_newline_becomes_line_break() {
        let html = render_fragment("line one\nline two");
        assert!(html.contains("<br />"), "chat convention needs hardbreaks: {html}");
    }

    #[test]
    fn test_heading_renders_structurally() {
        let html = render_fragment("## Title");
        assert!(html.contains("<h2>Title</h2>"), "got: {html}");
    }

    #[test]
    fn test_code_block_has_label_payload_and_highlight_wrapper() {
        let html = render_fragment("```rust\nlet x = 1;\n```");
        assert!(html.contains("code-lang\">Rust</span>"), "display name: {html}");
        assert!(
            html.contains("data-code=\"let%20x%20%3D%201%3B%0A\""),
            "percent-encoded original source: {html}"
        );
        assert!(html.contains("<code class=\"language-rust\">"), "got: {html}");
    }

    #[test]
    fn test_code_block_alias_tag_labels_and_classes() {
        let html = render_fragment("```py\nx = 1\n```");
        assert!(html.contains("code-lang\">Python</span>"), "got: {html}");
        assert!(html.contains("language-python"), "alias resolves class: {html}");
    }

    #[test]
    fn test_code_block_unknown_language_escapes_source() {
        let html = render_fragment("```nosuchlang\n<b>hi</b>\n```");
        assert!(html.contains("&lt;b&gt;hi&lt;/b&gt;"), "got: {html}");
        assert!(html.contains("code-lang\">NOSUCHLANG</span>"), "got: {html}");
    }

    #[test]
    fn test_inline_code_is_plaintext() {
        let html = render_fragment("use `let x = <y>` here");
        assert!(html.contains("<code>let x = &lt;y&gt;</code>"), "got: {html}");
    }

    #[test]
    fn test_blockquote_without_directive_is_plain() {
        let html = render_fragment("> just a quote");
        assert!(html.contains("<blockquote>"), "got: {html}");
        assert!(!html.contains("alert"), "got: {html}");
    }

    #[test]
    fn test_blockquote_warning_directive_renders_card() {
        let html = render_fragment("> [!WARNING] mind the gap");
        assert!(html.contains("alert alert-warning"), "got: {html}");
        assert!(html.contains("Warning"), "localized title: {html}");
        assert!(!html.contains("[!WARNING]"), "marker must be stripped: {html}");
        assert!(html.contains("mind the gap"), "got: {html}");
    }

    #[test]
    fn test_blockquote_directive_on_own_line() {
        let html = render_fragment("> [!NOTE]\n> body text");
        assert!(html.contains("alert alert-note"), "got: {html}");
        assert!(!html.contains("[!NOTE]"), "got: {html}");
        assert!(html.contains("body text"), "got: {html}");
        assert!(
            !html.contains("<p><br />"),
            "stripped marker should not leave a leading break: {html}"
        );
    }

    #[test]
    fn test_directive_after_leading_block_stays_plain() {
        let html = render_fragment("> ```\n> x\n> ```\n> [!NOTE] later");
        assert!(html.contains("<blockquote>"), "got: {html}");
        assert!(!html.contains("alert-note"), "directive must open the quote: {html}");
        assert!(html.contains("[!NOTE]"), "text shown literally: {html}");
    }

    #[test]
    fn test_styled_marker_is_not_a_directive() {
        let html = render_fragment("> **[!NOTE]** x");
        assert!(html.contains("<blockquote>"), "got: {html}");
        assert!(!html.contains("alert-note"), "got: {html}");
    }

    #[test]
    fn test_blockquote_partial_marker_stays_plain() {
        let html = render_fragment("> [!WARN] not a directive");
        assert!(html.contains("<blockquote>"), "got: {html}");
        assert!(html.contains("[!WARN]"), "text shown literally: {html}");
    }

    #[test]
    fn test_external_link_gets_target_rel_and_icon() {
        let html = render_fragment("[site](https://example.com)");
        assert!(html.contains("target=\"_blank\""), "got: {html}");
        assert!(html.contains("rel=\"noopener noreferrer\""), "got: {html}");
        assert!(html.contains("external-link-icon"), "got: {html}");
    }

    #[test]
    fn test_internal_link_gets_neither() {
        let html = render_fragment("[local](/local)");
        assert!(!html.contains("target="), "got: {html}");
        assert!(!html.contains("rel="), "got: {html}");
        assert!(!html.contains("external-link-icon"), "got: {html}");
    }

    #[test]
    fn test_link_href_is_attribute_escaped() {
        let html = render_fragment("[x](/a\"b)");
        assert!(!html.contains("href=\"/a\"b\""), "quote must be escaped: {html}");
    }

    #[test]
    fn test_table_missing_cell_renders_empty_not_shifted() {
        let md = "| a | b | c |\n|---|---|---|\n| 1 | 2 |\n";
        let html = render_fragment(md);
        assert!(html.contains("<th>a</th><th>b</th><th>c</th>"), "got: {html}");
        let row = html.split("<tbody>").nth(1).unwrap_or("");
        assert_eq!(row.matches("<td>").count(), 3, "three positional cells: {html}");
        assert!(row.contains("<td></td>"), "missing cell renders empty: {html}");
    }

    #[test]
    fn test_table_excess_cells_dropped() {
        let md = "| a | b |\n|---|---|\n| 1 | 2 | 3 |\n";
        let html = render_fragment(md);
        let row = html.split("<tbody>").nth(1).unwrap_or("");
        assert_eq!(row.matches("<td>").count(), 2, "header fixes column count: {html}");
    }

    #[test]
    fn test_raw_html_block_shown_literally() {
        let html = render_fragment("<script>alert(1)</script>");
        assert!(!html.contains("<script>"), "got: {html}");
        assert!(html.contains("&lt;script&gt;"), "literal text: {html}");
    }

    #[test]
    fn test_raw_inline_html_shown_literally() {
        let html = render_fragment("hello <img onerror=x> world");
        assert!(!html.contains("<img"), "got: {html}");
        assert!(html.contains("&lt;img"), "literal text: {html}");
    }

    #[test]
    fn test_task_list_renders_checkboxes() {
        let html = render_fragment("- [x] done\n- [ ] todo");
        assert!(html.contains("type=\"checkbox\" disabled checked"), "got: {html}");
        assert!(html.contains("type=\"checkbox\" disabled />"), "got: {html}");
    }

    #[test]
    fn test_ordered_list_start_preserved() {
        let html = render_fragment("3. three\n4. four");
        assert!(html.contains("<ol start=\"3\">"), "got: {html}");
    }

    #[test]
    fn test_is_external_scheme_check() {
        assert!(is_external("https://example.com"));
        assert!(is_external("HTTP://EXAMPLE.COM"));
        assert!(!is_external("/local"));
        assert!(!is_external("ftp://example.com"));
        assert!(!is_external("mailto:a@b.c"));
    }
}
