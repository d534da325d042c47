//! Rendered-markdown generator
//!
//! Walks the already-rendered HTML for `h1`..`h6` elements in document
//! order. Each heading is addressed by its `id` attribute, or by a
//! positional id (`toc-heading-N`) when the renderer did not assign one.

use std::collections::HashSet;

use tree_sitter::{Language, Node, Parser, Tree};

use super::sanitize::element_tag_name;
use super::{finish, heading_from_html, Generator, GeneratorOptions, SignalKind};
use crate::error::{Result, TocError};
use crate::model::{Widget, WidgetContent};
use crate::outline::{Heading, HeadingTarget};

use super::markdown::MARKDOWN_MIME_TYPES;

const NAME: &str = "rendered-markdown";

/// Prefix for ids assigned to headings that have none
pub const GENERATED_ID_PREFIX: &str = "toc-heading-";

/// Parse an HTML document or fragment
pub(crate) fn parse_html(source: &str) -> Option<Tree> {
    let language: Language = tree_sitter_html::LANGUAGE.into();
    let mut parser = Parser::new();
    parser.set_language(&language).ok()?;
    parser.parse(source, None)
}

/// A heading element found in rendered HTML
struct HeadingElement<'a> {
    level: u8,
    /// Empty until a positional id is assigned
    id: String,
    inner_html: &'a str,
}

fn heading_level(tag: &str) -> Option<u8> {
    match tag.to_ascii_lowercase().as_str() {
        "h1" => Some(1),
        "h2" => Some(2),
        "h3" => Some(3),
        "h4" => Some(4),
        "h5" => Some(5),
        "h6" => Some(6),
        _ => None,
    }
}

fn attribute_value<'a>(start_tag: Node, source: &'a str, wanted: &str) -> Option<&'a str> {
    let mut cursor = start_tag.walk();
    for attribute in start_tag.children(&mut cursor) {
        if attribute.kind() != "attribute" {
            continue;
        }
        let mut attr_cursor = attribute.walk();
        let mut name_matches = false;
        for part in attribute.children(&mut attr_cursor) {
            match part.kind() {
                "attribute_name" => {
                    name_matches = part
                        .utf8_text(source.as_bytes())
                        .is_ok_and(|n| n.eq_ignore_ascii_case(wanted));
                }
                "attribute_value" if name_matches => {
                    return part.utf8_text(source.as_bytes()).ok();
                }
                "quoted_attribute_value" if name_matches => {
                    let mut quoted_cursor = part.walk();
                    let value = part
                        .children(&mut quoted_cursor)
                        .find(|c| c.kind() == "attribute_value");
                    // `id=""` has no value node
                    return Some(
                        value
                            .and_then(|v| v.utf8_text(source.as_bytes()).ok())
                            .unwrap_or(""),
                    );
                }
                _ => {}
            }
        }
    }
    None
}

fn collect_heading_elements<'a>(node: Node, source: &'a str, found: &mut Vec<HeadingElement<'a>>) {
    let mut cursor = node.walk();
    for child in node.children(&mut cursor) {
        if child.kind() != "element" {
            if child.child_count() > 0 && child.kind() != "script_element" {
                collect_heading_elements(child, source, found);
            }
            continue;
        }

        let level = element_tag_name(child, source).and_then(heading_level);
        let Some(level) = level else {
            collect_heading_elements(child, source, found);
            continue;
        };

        let mut inner = child.walk();
        let parts: Vec<Node> = child.children(&mut inner).collect();
        let start_tag = parts.iter().find(|p| p.kind() == "start_tag");
        let end_tag = parts.iter().find(|p| p.kind() == "end_tag");

        let content_start = start_tag.map_or(child.start_byte(), |t| t.end_byte());
        let content_end = end_tag.map_or(child.end_byte(), |t| t.start_byte());
        let id = start_tag
            .and_then(|t| attribute_value(*t, source, "id"))
            .unwrap_or_default()
            .to_string();

        found.push(HeadingElement {
            level,
            id,
            inner_html: source.get(content_start..content_end).unwrap_or_default(),
        });
    }
}

fn heading_elements(html: &str) -> Option<Vec<HeadingElement<'_>>> {
    let tree = parse_html(html)?;
    let mut found = Vec::new();
    collect_heading_elements(tree.root_node(), html, &mut found);

    // Positional ids step past any id the document already uses
    let mut taken: HashSet<String> = found
        .iter()
        .filter(|e| !e.id.is_empty())
        .map(|e| e.id.clone())
        .collect();
    for (position, element) in found.iter_mut().enumerate() {
        if !element.id.is_empty() {
            continue;
        }
        let id = (position..)
            .map(|n| format!("{}{}", GENERATED_ID_PREFIX, n))
            .find(|id| !taken.contains(id))
            .unwrap_or_default();
        taken.insert(id.clone());
        element.id = id;
    }
    Some(found)
}

/// Whether a heading element with `id` exists in the rendered HTML
pub fn find_heading_element(html: &str, id: &str) -> bool {
    heading_elements(html).is_some_and(|elements| elements.iter().any(|e| e.id == id))
}

pub struct RenderedMarkdownGenerator {
    options: GeneratorOptions,
}

impl RenderedMarkdownGenerator {
    pub fn new(options: GeneratorOptions) -> Self {
        Self { options }
    }
}

impl Generator for RenderedMarkdownGenerator {
    fn name(&self) -> &str {
        NAME
    }

    fn is_enabled(&self, widget: &Widget) -> bool {
        match &widget.content {
            WidgetContent::Rendered(doc) => MARKDOWN_MIME_TYPES.contains(&doc.mime_type.as_str()),
            _ => false,
        }
    }

    fn generate(
        &self,
        content: &WidgetContent,
        options: &GeneratorOptions,
    ) -> Result<Vec<Heading>> {
        let WidgetContent::Rendered(doc) = content else {
            return Err(TocError::extraction(NAME, "expected rendered content"));
        };

        let elements = heading_elements(&doc.html)
            .ok_or_else(|| TocError::extraction(NAME, "html parser unavailable"))?;

        let headings = elements
            .into_iter()
            .filter_map(|element| {
                heading_from_html(
                    element.level,
                    element.inner_html,
                    HeadingTarget::Element { id: element.id },
                    options,
                )
            })
            .collect();

        Ok(finish(headings, options))
    }

    fn change_signal(&self, _widget: &Widget) -> Option<SignalKind> {
        Some(SignalKind::Rendered)
    }

    fn options(&self) -> &GeneratorOptions {
        &self.options
    }
}
