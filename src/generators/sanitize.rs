//! Allowlist HTML sanitizer for heading markup
//!
//! Keeps a small set of inline formatting tags with every attribute removed,
//! drops script/style/comments, and re-escapes all text.

use once_cell::sync::Lazy;
use regex::Regex;
use tree_sitter::Node;

use super::rendered::parse_html;
use super::Sanitizer;

static TAG_REGEX: Lazy<Regex> = Lazy::new(|| Regex::new(r"<[^>]*>").expect("valid tag regex"));

/// Inline tags that survive sanitizing (attributes are always dropped)
const ALLOWED_TAGS: &[&str] = &[
    "b", "code", "del", "em", "i", "kbd", "mark", "s", "span", "strong", "sub", "sup",
];

#[derive(Debug, Clone, Copy, Default)]
pub struct DefaultSanitizer;

impl Sanitizer for DefaultSanitizer {
    fn sanitize(&self, html: &str) -> String {
        let Some(tree) = parse_html(html) else {
            return html_escape::encode_text(html).into_owned();
        };
        let mut out = String::with_capacity(html.len());
        emit(tree.root_node(), html, &mut out);
        out.trim().to_string()
    }
}

fn emit(node: Node, source: &str, out: &mut String) {
    match node.kind() {
        "text" | "entity" => {
            let raw = node.utf8_text(source.as_bytes()).unwrap_or_default();
            let decoded = html_escape::decode_html_entities(raw);
            out.push_str(&html_escape::encode_text(&decoded));
        }
        "element" => {
            let tag = element_tag_name(node, source).map(|t| t.to_ascii_lowercase());
            let allowed = tag
                .as_deref()
                .filter(|t| ALLOWED_TAGS.contains(t));
            if let Some(tag) = allowed {
                out.push('<');
                out.push_str(tag);
                out.push('>');
            }
            emit_children(node, source, out);
            if let Some(tag) = allowed {
                out.push_str("</");
                out.push_str(tag);
                out.push('>');
            }
        }
        "script_element" | "style_element" | "comment" | "doctype" | "erroneous_end_tag" => {}
        _ => emit_children(node, source, out),
    }
}

/// Emit element content, keeping the whitespace tree-sitter leaves between nodes
fn emit_children(node: Node, source: &str, out: &mut String) {
    let mut cursor = node.walk();
    let mut prev_end: Option<usize> = None;
    for child in node.children(&mut cursor) {
        if let Some(end) = prev_end {
            let gap = source.get(end..child.start_byte()).unwrap_or_default();
            if !gap.is_empty() && gap.chars().all(char::is_whitespace) {
                out.push(' ');
            }
        }
        prev_end = Some(child.end_byte());

        match child.kind() {
            "start_tag" | "end_tag" | "self_closing_tag" => {}
            _ => emit(child, source, out),
        }
    }
}

/// Tag name of an element node ("h2", "strong", ...)
pub(crate) fn element_tag_name<'a>(element: Node, source: &'a str) -> Option<&'a str> {
    let mut cursor = element.walk();
    let tag = element
        .children(&mut cursor)
        .find(|c| c.kind() == "start_tag" || c.kind() == "self_closing_tag")?;
    let mut tag_cursor = tag.walk();
    let name = tag
        .children(&mut tag_cursor)
        .find(|c| c.kind() == "tag_name")?;
    name.utf8_text(source.as_bytes()).ok()
}

/// Plain text of (sanitized) HTML: tags removed, entities decoded,
/// whitespace collapsed
pub fn plain_text(html: &str) -> String {
    let stripped = TAG_REGEX.replace_all(html, "");
    let decoded = html_escape::decode_html_entities(&stripped);
    decoded.split_whitespace().collect::<Vec<_>>().join(" ")
}
