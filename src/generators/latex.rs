//! LaTeX generator
//!
//! Scans raw LaTeX for sectioning commands and maps them to fixed levels
//! (`\part` = 1 through `\paragraph` = 6). A `%` without a backslash right
//! before it comments out the rest of its line.
//!
//! LaTeX views have no live change signal: the outline is extracted once on
//! activation and again only when explicitly refreshed.

use once_cell::sync::Lazy;
use regex::Regex;

use super::{finish, Generator, GeneratorOptions};
use crate::error::{Result, TocError};
use crate::model::{Widget, WidgetContent};
use crate::outline::{Heading, HeadingTarget};

const NAME: &str = "latex";

pub const LATEX_MIME_TYPES: &[&str] = &["text/x-latex", "text/x-stex"];

static SECTION_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"\\(part|chapter|section|subsection|subsubsection|paragraph)\*?\s*(?:\[[^\]]*\])?\s*\{",
    )
    .expect("valid sectioning regex")
});

fn command_level(command: &str) -> u8 {
    match command {
        "part" => 1,
        "chapter" => 2,
        "section" => 3,
        "subsection" => 4,
        "subsubsection" => 5,
        _ => 6,
    }
}

/// The part of a line before any unescaped `%`
fn strip_comment(line: &str) -> &str {
    let mut prev = None;
    for (idx, ch) in line.char_indices() {
        if ch == '%' && prev != Some('\\') {
            return &line[..idx];
        }
        prev = Some(ch);
    }
    line
}

/// Body of a brace group whose `{` was already consumed. Nested braces
/// are kept; an unclosed group runs to the end of the line.
fn braced_argument(text: &str) -> &str {
    let mut depth = 1usize;
    for (idx, ch) in text.char_indices() {
        match ch {
            '{' => depth += 1,
            '}' => {
                depth -= 1;
                if depth == 0 {
                    return &text[..idx];
                }
            }
            _ => {}
        }
    }
    text
}

/// Sectioning commands in `source` as (level, title, byte offset of the command)
pub fn scan_sections(source: &str) -> Vec<(u8, String, usize)> {
    let mut sections = Vec::new();
    let mut line_start = 0;
    for line in source.split_inclusive('\n') {
        let code = strip_comment(line.trim_end_matches(['\n', '\r']));
        for captures in SECTION_REGEX.captures_iter(code) {
            let (Some(whole), Some(command)) = (captures.get(0), captures.get(1)) else {
                continue;
            };
            let title = braced_argument(&code[whole.end()..]);
            let title = title.split_whitespace().collect::<Vec<_>>().join(" ");
            if title.is_empty() {
                continue;
            }
            let level = command_level(command.as_str());
            sections.push((level, title, line_start + whole.start()));
        }
        line_start += line.len();
    }
    sections
}

pub struct LatexGenerator {
    options: GeneratorOptions,
}

impl LatexGenerator {
    pub fn new(options: GeneratorOptions) -> Self {
        Self { options }
    }
}

impl Generator for LatexGenerator {
    fn name(&self) -> &str {
        NAME
    }

    fn is_enabled(&self, widget: &Widget) -> bool {
        match &widget.content {
            WidgetContent::Editor(doc) => LATEX_MIME_TYPES.contains(&doc.mime_type.as_str()),
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
        let headings = scan_sections(&source)
            .into_iter()
            .filter_map(|(level, title, byte)| {
                let line = doc.buffer.char_to_line(doc.buffer.try_byte_to_char(byte).ok()?);
                let offset = doc.buffer.line_to_char(line);
                Some(Heading::new(
                    level,
                    title,
                    HeadingTarget::Line { line, offset },
                ))
            })
            .collect();

        Ok(finish(headings, options))
    }

    fn options(&self) -> &GeneratorOptions {
        &self.options
    }
}
