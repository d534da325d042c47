//! Markdown rendering helpers
//!
//! Renders whole documents for the rendered-markdown view and single heading
//! fragments for display in the outline.

mod renderer;

pub use renderer::{heading_fragment_html, markdown_to_html};
