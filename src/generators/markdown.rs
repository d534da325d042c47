//! Markdown heading detection and the markdown-editor generator
//!
//! Detection walks the tree-sitter markdown block tree, so ATX (`## Title`)
//! and Setext (`Title` over `===`/`---`) headings are found while `#` lines
//! inside fenced code blocks are not. The same scanner runs over whole
//! editor buffers and over individual notebook cells.

use tree_sitter::{Language, Node, Parser};

use super::{finish, heading_from_html, Generator, GeneratorOptions, SignalKind};
use crate::error::{Result, TocError};
use crate::markdown::heading_fragment_html;
use crate::model::{Widget, WidgetContent};
use crate::outline::{Heading, HeadingTarget};

const NAME: &str = "markdown";

/// Mime types treated as markdown source
pub const MARKDOWN_MIME_TYPES: &[&str] = &[
    "text/markdown",
    "text/x-markdown",
    "text/x-gfm",
    "text/x-ipythongfm",
];

/// A heading found in raw markdown, before rendering/sanitizing
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawHeading {
    pub level: u8,
    /// Raw markdown of the heading text
    pub fragment: String,
    /// 0-based `\n`-delimited line of the heading within the scanned text
    pub line: usize,
    /// Byte offset where the heading block starts
    pub start_byte: usize,
}

/// Find all top-level headings in a markdown text, in document order
pub fn scan_headings(source: &str) -> Result<Vec<RawHeading>> {
    let language: Language = tree_sitter_md::LANGUAGE.into();
    let mut parser = Parser::new();
    parser
        .set_language(&language)
        .map_err(|e| TocError::extraction(NAME, e.to_string()))?;
    let tree = parser
        .parse(source, None)
        .ok_or_else(|| TocError::extraction(NAME, "markdown parse was cancelled"))?;

    let mut headings = Vec::new();
    let mut pending = vec![tree.root_node()];
    while let Some(node) = pending.pop() {
        match node.kind() {
            "atx_heading" | "setext_heading" => {
                if let Some((level, fragment)) = heading_of(node, source) {
                    headings.push(RawHeading {
                        level,
                        fragment,
                        line: node.start_position().row,
                        start_byte: node.start_byte(),
                    });
                }
            }
            // Headings only appear directly under the document or a section
            "document" | "section" => {
                let mut cursor = node.walk();
                let children: Vec<Node> = node.children(&mut cursor).collect();
                pending.extend(children.into_iter().rev());
            }
            _ => {}
        }
    }
    Ok(headings)
}

fn node_text<'a>(node: &Node, source: &'a str) -> Option<&'a str> {
    node.utf8_text(source.as_bytes()).ok()
}

/// Level from an ATX marker (`atx_h3_marker`) or a Setext underline
fn marker_level(kind: &str) -> Option<u8> {
    match kind {
        "setext_h1_underline" => Some(1),
        "setext_h2_underline" => Some(2),
        _ => kind
            .strip_prefix("atx_h")?
            .strip_suffix("_marker")?
            .parse()
            .ok(),
    }
}

/// Level and raw text of a heading node; None for empty headings
fn heading_of(node: Node, source: &str) -> Option<(u8, String)> {
    let mut level = None;
    let mut content = None;

    let mut cursor = node.walk();
    for child in node.children(&mut cursor) {
        match child.kind() {
            "inline" | "paragraph" | "heading_content" => content = Some(child),
            kind => level = marker_level(kind).or(level),
        }
    }

    let text = match content {
        Some(child) => node_text(&child, source)?.trim(),
        None => node_text(&node, source)?.trim().trim_start_matches('#').trim(),
    };
    (!text.is_empty()).then(|| (level.unwrap_or(1).clamp(1, 6), text.to_string()))
}

/// Render and sanitize a raw heading into a display heading
pub(crate) fn display_heading(
    raw: &RawHeading,
    target: HeadingTarget,
    options: &GeneratorOptions,
) -> Option<Heading> {
    let html = heading_fragment_html(&raw.fragment);
    heading_from_html(raw.level, &html, target, options)
}

/// Generator for plain text editors holding markdown
pub struct MarkdownGenerator {
    options: GeneratorOptions,
}

impl MarkdownGenerator {
    pub fn new(options: GeneratorOptions) -> Self {
        Self { options }
    }
}

impl Generator for MarkdownGenerator {
    fn name(&self) -> &str {
        NAME
    }

    fn is_enabled(&self, widget: &Widget) -> bool {
        match &widget.content {
            WidgetContent::Editor(doc) => MARKDOWN_MIME_TYPES.contains(&doc.mime_type.as_str()),
            _ => false,
        }
    }

    fn generate(
        &self,
        content: &WidgetContent,
        options: &GeneratorOptions,
    ) -> Result<Vec<Heading>> {
        let WidgetContent::Editor(doc) = content else {
            return Err(TocError::extraction(NAME, "expected editor content"));
        };

        let source = doc.buffer.to_string();
        let headings = scan_headings(&source)?
            .iter()
            .filter_map(|raw| {
                // Line space follows the rope, which also breaks on U+2028,
                // form feeds and lone carriage returns
                let start = doc.buffer.try_byte_to_char(raw.start_byte).ok()?;
                let line = doc.buffer.char_to_line(start);
                let target = HeadingTarget::Line {
                    line,
                    offset: doc.buffer.line_to_char(line),
                };
                display_heading(raw, target, options)
            })
            .collect();

        Ok(finish(headings, options))
    }

    fn change_signal(&self, _widget: &Widget) -> Option<SignalKind> {
        Some(SignalKind::ContentChanged)
    }

    fn options(&self) -> &GeneratorOptions {
        &self.options
    }
}
