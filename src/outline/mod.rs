//! Heading outline model
//!
//! Plain data describing table-of-contents entries, plus the helpers that
//! derive numbering, nesting and identity from a flat, ordered heading list.
//! Generators produce `Vec<Heading>`; everything else is computed from it.

mod numbering;
mod tree;

pub use numbering::apply_numbering;
pub use tree::{build_heading_tree, has_children, visible_headings, HeadingNode, VisibleHeading};

/// Deepest heading level any generator emits
pub const MAX_LEVEL: u8 = 6;

/// Locator for scrolling the source document back to a heading
///
/// Targets are resolved against the widget's current content at navigation
/// time, so a target that no longer points anywhere is simply ignored.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum HeadingTarget {
    /// Notebook heading: cell index and line within the cell (0-based)
    Cell { cell: usize, line: usize },
    /// Text buffer heading: 0-based line and char offset of that line
    Line { line: usize, offset: usize },
    /// Rendered heading element, addressed by its id attribute
    Element { id: String },
}

/// Cursor or scroll position reported by a widget
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Location {
    Cell { cell: usize, line: usize },
    Line(usize),
    Element(String),
}

impl HeadingTarget {
    /// Whether the heading starts at or before `location`.
    ///
    /// Returns `None` when the coordinates are not comparable (element ids
    /// carry no ordering, and mixed kinds never match).
    pub fn is_at_or_before(&self, location: &Location) -> Option<bool> {
        match (self, location) {
            (HeadingTarget::Cell { cell, line }, Location::Cell { cell: c, line: l }) => {
                Some((*cell, *line) <= (*c, *l))
            }
            (HeadingTarget::Line { line, .. }, Location::Line(l)) => Some(line <= l),
            _ => None,
        }
    }
}

/// A single table-of-contents entry
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Heading {
    /// Plain display text (derived from sanitized markup)
    pub text: String,
    /// Sanitized inline markup, when the source had any
    pub html: Option<String>,
    /// Nesting depth, 1 = top level
    pub level: u8,
    pub target: HeadingTarget,
    /// Ordinal prefix such as "2.3", present when numbering is enabled
    pub numbering: Option<String>,
    /// View-level collapse state; generators always emit `false`
    pub collapsed: bool,
    /// Heading lives in a notebook cell whose source is currently collapsed
    pub in_collapsed_cell: bool,
}

impl Heading {
    pub fn new(level: u8, text: impl Into<String>, target: HeadingTarget) -> Self {
        Self {
            text: text.into(),
            html: None,
            level: level.clamp(1, MAX_LEVEL),
            target,
            numbering: None,
            collapsed: false,
            in_collapsed_cell: false,
        }
    }

    pub fn with_html(mut self, html: impl Into<String>) -> Self {
        self.html = Some(html.into());
        self
    }

    /// Text prefixed with the numbering, if any ("1.2 Setup")
    pub fn label(&self) -> String {
        match &self.numbering {
            Some(prefix) => format!("{} {}", prefix, self.text),
            None => self.text.clone(),
        }
    }
}

/// Identity of a heading across re-extractions
///
/// Documents carry no durable heading ids, so two headings are "the same"
/// when level, text and rank among same-level headings all agree.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct HeadingKey {
    pub level: u8,
    pub text: String,
    pub ordinal: usize,
}

/// Compute the identity key of every heading, in order
pub fn heading_keys(headings: &[Heading]) -> Vec<HeadingKey> {
    let mut seen = [0usize; MAX_LEVEL as usize];
    headings
        .iter()
        .map(|heading| {
            let slot = usize::from(heading.level.clamp(1, MAX_LEVEL) - 1);
            let ordinal = seen[slot];
            seen[slot] += 1;
            HeadingKey {
                level: heading.level,
                text: heading.text.clone(),
                ordinal,
            }
        })
        .collect()
}

/// Index of the heading nearest to (at or before) `location`
pub fn active_heading_index(headings: &[Heading], location: &Location) -> Option<usize> {
    if let Location::Element(id) = location {
        return headings.iter().position(|h| match &h.target {
            HeadingTarget::Element { id: target_id } => target_id == id,
            _ => false,
        });
    }

    let mut active = None;
    for (idx, heading) in headings.iter().enumerate() {
        match heading.target.is_at_or_before(location) {
            Some(true) => active = Some(idx),
            Some(false) => break,
            None => {}
        }
    }
    active
}
