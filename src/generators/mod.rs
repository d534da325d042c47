//! Table-of-contents generators
//!
//! A generator is a content-type-specific extraction adapter. It decides
//! whether it can handle a widget, extracts the current heading list from a
//! content snapshot, and tells the panel which change signal to follow.
//!
//! ## Extraction pipeline
//!
//! ```text
//! raw text ─▶ heading detection ─▶ heading fragment ─▶ inline HTML
//!          ─▶ sanitizer ─▶ Heading { html, text } ─▶ numbering
//! ```
//!
//! Detection always works on raw text; only the extracted fragment is
//! sanitized for display.

pub mod latex;
pub mod markdown;
pub mod notebook;
pub mod rendered;
mod sanitize;

use std::fmt;
use std::sync::Arc;

pub use latex::LatexGenerator;
pub use markdown::MarkdownGenerator;
pub use notebook::NotebookGenerator;
pub use rendered::RenderedMarkdownGenerator;
pub use sanitize::{plain_text, DefaultSanitizer};

use crate::error::Result;
use crate::model::{Widget, WidgetContent};
use crate::outline::{apply_numbering, Heading, HeadingTarget};

/// Turns untrusted HTML into HTML that is safe to display
pub trait Sanitizer: Send + Sync {
    fn sanitize(&self, html: &str) -> String;
}

impl<F> Sanitizer for F
where
    F: Fn(&str) -> String + Send + Sync,
{
    fn sanitize(&self, html: &str) -> String {
        self(html)
    }
}

/// Which widget event should trigger re-extraction
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SignalKind {
    /// The document text or cell list changed
    ContentChanged,
    /// The rendering pipeline produced new output (content or theme change)
    Rendered,
}

/// Per-generator render options
#[derive(Clone)]
pub struct GeneratorOptions {
    /// Compute ordinal prefixes ("1.2")
    pub numbering: bool,
    /// Headings may be individually collapsed in the view
    pub collapsible: bool,
    pub sanitizer: Arc<dyn Sanitizer>,
}

impl Default for GeneratorOptions {
    fn default() -> Self {
        Self {
            numbering: false,
            collapsible: true,
            sanitizer: Arc::new(DefaultSanitizer),
        }
    }
}

impl fmt::Debug for GeneratorOptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GeneratorOptions")
            .field("numbering", &self.numbering)
            .field("collapsible", &self.collapsible)
            .finish_non_exhaustive()
    }
}

/// The capability contract every content-type adapter implements
pub trait Generator: Send + Sync {
    /// Identity used by the registry to reject duplicates
    fn name(&self) -> &str;

    /// Whether this generator can extract headings from `widget`.
    /// Must be free of side effects.
    fn is_enabled(&self, widget: &Widget) -> bool;

    /// Extract the ordered heading list from a content snapshot.
    ///
    /// Safe to call repeatedly; partially parseable content yields whatever
    /// headings could be found.
    fn generate(&self, content: &WidgetContent, options: &GeneratorOptions)
        -> Result<Vec<Heading>>;

    /// Signal the panel should follow for live updates.
    /// `None` means extraction only happens on activation or on demand.
    fn change_signal(&self, _widget: &Widget) -> Option<SignalKind> {
        None
    }

    fn options(&self) -> &GeneratorOptions;
}

/// Build a display heading from a markup fragment
///
/// Returns `None` when nothing displayable is left after sanitizing.
pub(crate) fn heading_from_html(
    level: u8,
    raw_html: &str,
    target: HeadingTarget,
    options: &GeneratorOptions,
) -> Option<Heading> {
    let html = options.sanitizer.sanitize(raw_html);
    let text = plain_text(&html);
    if text.is_empty() {
        return None;
    }
    Some(Heading::new(level, text, target).with_html(html))
}

/// Post-processing shared by all generators
pub(crate) fn finish(mut headings: Vec<Heading>, options: &GeneratorOptions) -> Vec<Heading> {
    if options.numbering {
        apply_numbering(&mut headings);
    }
    headings
}
