//! Widget model - the documents the panel can track
//!
//! A widget is one open document view in the host: a notebook, a plain
//! text editor, or a rendered (HTML) markdown view. Generators only ever see
//! a cloned `WidgetContent` snapshot, never the widget itself.

use std::fmt;
use std::path::{Path, PathBuf};

use ropey::Rope;

use super::notebook::Notebook;
use crate::error::Result;
use crate::generators::rendered::find_heading_element;
use crate::markdown::markdown_to_html;
use crate::outline::{HeadingTarget, Location};

/// Unique identifier for a widget
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct WidgetId(pub u64);

impl fmt::Display for WidgetId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

// ============================================================================
// Content kinds
// ============================================================================

pub const MIME_MARKDOWN: &str = "text/markdown";
pub const MIME_LATEX: &str = "text/x-latex";
pub const MIME_STEX: &str = "text/x-stex";
pub const MIME_PLAIN: &str = "text/plain";

/// Guess an editor mime type from a file extension
pub fn mime_for_path(path: &Path) -> &'static str {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_ascii_lowercase());
    match ext.as_deref() {
        Some("md") | Some("markdown") => MIME_MARKDOWN,
        Some("tex") | Some("latex") => MIME_LATEX,
        Some("sty") | Some("cls") => MIME_STEX,
        _ => MIME_PLAIN,
    }
}

/// Plain text editor content
#[derive(Debug, Clone)]
pub struct EditorDocument {
    pub path: Option<PathBuf>,
    pub mime_type: String,
    pub buffer: Rope,
}

impl EditorDocument {
    pub fn with_text(text: &str, mime_type: &str) -> Self {
        Self {
            path: None,
            mime_type: mime_type.to_string(),
            buffer: Rope::from(text),
        }
    }
}

/// Markdown displayed as rendered HTML
#[derive(Debug, Clone)]
pub struct RenderedDocument {
    pub path: Option<PathBuf>,
    pub mime_type: String,
    pub html: String,
}

impl RenderedDocument {
    pub fn from_markdown(markdown: &str) -> Self {
        Self {
            path: None,
            mime_type: MIME_MARKDOWN.to_string(),
            html: markdown_to_html(markdown),
        }
    }
}

#[derive(Debug, Clone)]
pub enum WidgetContent {
    Notebook(Notebook),
    Editor(EditorDocument),
    Rendered(RenderedDocument),
}

impl WidgetContent {
    /// Short name of the content kind, for logs
    pub fn kind_name(&self) -> &'static str {
        match self {
            WidgetContent::Notebook(_) => "notebook",
            WidgetContent::Editor(_) => "editor",
            WidgetContent::Rendered(_) => "rendered",
        }
    }
}

// ============================================================================
// Widget
// ============================================================================

#[derive(Debug, Clone)]
pub struct Widget {
    pub id: WidgetId,
    pub title: String,
    pub content: WidgetContent,
    /// Content revision counter (incremented on each change)
    /// Used for staleness checking of debounced extraction
    pub revision: u64,
    pub disposed: bool,
    /// Last reported cursor or scroll position
    pub cursor: Option<Location>,
    /// Last heading target scrolled into view
    pub revealed: Option<HeadingTarget>,
}

impl Widget {
    pub fn new(id: WidgetId, title: impl Into<String>, content: WidgetContent) -> Self {
        Self {
            id,
            title: title.into(),
            content,
            revision: 0,
            disposed: false,
            cursor: None,
            revealed: None,
        }
    }

    /// Open a file as a widget
    ///
    /// `.ipynb` files become notebooks; everything else becomes an editor,
    /// or a rendered view when `rendered` is set and the file is markdown.
    pub fn open_file(id: WidgetId, path: &Path, rendered: bool) -> Result<Self> {
        let text = std::fs::read_to_string(path)?;
        let title = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.display().to_string());
        Ok(Self::new(id, title, content_for_path(path, &text, rendered)?))
    }

    /// Replace the whole content (file reload, host edit)
    pub fn set_content(&mut self, content: WidgetContent) {
        self.content = content;
        self.revision += 1;
    }

    /// Replace the text of an editor widget; other kinds are left alone
    pub fn set_text(&mut self, text: &str) {
        if let WidgetContent::Editor(doc) = &mut self.content {
            doc.buffer = Rope::from(text);
            self.revision += 1;
        }
    }

    /// Immutable copy of the content for extraction
    pub fn snapshot(&self) -> WidgetContent {
        self.content.clone()
    }

    /// Close the widget, releasing its content
    ///
    /// The entry stays behind so late messages for the id resolve to a
    /// disposed widget rather than an unknown one.
    pub fn dispose(&mut self) {
        self.disposed = true;
        self.content = WidgetContent::Editor(EditorDocument::with_text("", MIME_PLAIN));
        self.cursor = None;
        self.revealed = None;
    }

    /// Scroll the heading target into view
    ///
    /// Returns false when the target no longer resolves against the current
    /// content (the document changed since extraction).
    pub fn reveal(&mut self, target: &HeadingTarget) -> bool {
        if self.disposed || !self.resolves(target) {
            return false;
        }
        self.revealed = Some(target.clone());
        true
    }

    fn resolves(&self, target: &HeadingTarget) -> bool {
        match (&self.content, target) {
            (WidgetContent::Notebook(nb), HeadingTarget::Cell { cell, line }) => nb
                .cells
                .get(*cell)
                .is_some_and(|c| *line < c.line_count()),
            (WidgetContent::Editor(doc), HeadingTarget::Line { line, .. }) => {
                *line < doc.buffer.len_lines()
            }
            (WidgetContent::Rendered(doc), HeadingTarget::Element { id }) => {
                find_heading_element(&doc.html, id)
            }
            _ => false,
        }
    }
}

/// Build widget content for a file's text
pub fn content_for_path(path: &Path, text: &str, rendered: bool) -> Result<WidgetContent> {
    let is_notebook = path
        .extension()
        .is_some_and(|e| e.eq_ignore_ascii_case("ipynb"));
    if is_notebook {
        return Ok(WidgetContent::Notebook(Notebook::from_ipynb(text)?));
    }

    let mime_type = mime_for_path(path);
    if rendered && mime_type == MIME_MARKDOWN {
        let mut doc = RenderedDocument::from_markdown(text);
        doc.path = Some(path.to_path_buf());
        return Ok(WidgetContent::Rendered(doc));
    }

    let mut doc = EditorDocument::with_text(text, mime_type);
    doc.path = Some(path.to_path_buf());
    Ok(WidgetContent::Editor(doc))
}
