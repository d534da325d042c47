//! Panel view
//!
//! Turns the panel state into flattened rows and renders them as an
//! indented text outline or a nested HTML list. Collapse only affects
//! what is shown here; the heading list itself is always complete.

use crate::model::{AppModel, TocPanelState};
use crate::outline::visible_headings;
use crate::panel::TOC_PANEL_CAPTION;

/// Shown when there is nothing to outline
pub const EMPTY_TEXT: &str = "No table of contents available";

/// One visible line of the outline
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TocRow {
    /// Index into `TocPanelState::headings`
    pub heading_index: usize,
    /// Nesting depth, 0 = top level
    pub depth: usize,
    /// Numbering plus text
    pub label: String,
    pub collapsed: bool,
    pub has_children: bool,
    /// Nearest heading to the widget cursor
    pub active: bool,
    pub selected: bool,
    /// Rendered de-emphasized (heading in a collapsed notebook cell)
    pub muted: bool,
}

/// Flatten the visible outline
pub fn toc_rows(toc: &TocPanelState) -> Vec<TocRow> {
    visible_headings(&toc.headings)
        .into_iter()
        .map(|visible| {
            let heading = &toc.headings[visible.index];
            TocRow {
                heading_index: visible.index,
                depth: visible.depth,
                label: heading.label(),
                collapsed: heading.collapsed,
                has_children: visible.has_children,
                active: toc.active_index == Some(visible.index),
                selected: toc.selected_index == Some(visible.index),
                muted: heading.in_collapsed_cell,
            }
        })
        .collect()
}

/// Render the panel as plain text
///
/// ```text
/// Table of Contents: notes.md
///  ▾ 1 Intro
///      1.1 Setup
/// *▸ 2 Usage
/// ```
pub fn render_text(model: &AppModel) -> String {
    let mut out = match model.tracked_widget() {
        Some(widget) => format!("{}: {}\n", TOC_PANEL_CAPTION, widget.title),
        None => format!("{}\n", TOC_PANEL_CAPTION),
    };

    let rows = toc_rows(&model.toc);
    if rows.is_empty() {
        out.push_str(EMPTY_TEXT);
        out.push('\n');
        return out;
    }

    let collapsible = model.toc.is_collapsible();
    for row in rows {
        let gutter = match (row.selected, row.active) {
            (true, _) => '>',
            (false, true) => '*',
            _ => ' ',
        };
        let marker = match (collapsible && row.has_children, row.collapsed) {
            (true, true) => '▸',
            (true, false) => '▾',
            _ => ' ',
        };
        out.push(gutter);
        out.push_str(&"  ".repeat(row.depth));
        out.push(marker);
        out.push(' ');
        if row.muted {
            out.push_str(&format!("({})", row.label));
        } else {
            out.push_str(&row.label);
        }
        out.push('\n');
    }
    out
}

/// Render the visible outline as nested `<ul>` lists
///
/// Heading markup is already sanitized; plain-text headings are escaped.
pub fn render_html(toc: &TocPanelState) -> String {
    let rows = toc_rows(toc);
    if rows.is_empty() {
        return format!("<p class=\"toc-empty\">{}</p>", EMPTY_TEXT);
    }

    let mut out = String::new();
    let mut open_depth = 0usize;
    let mut first = true;
    for row in rows {
        if first {
            out.push_str("<ul class=\"toc\">");
            first = false;
        } else if row.depth > open_depth {
            out.push_str("<ul>");
        } else {
            out.push_str("</li>");
            for _ in row.depth..open_depth {
                out.push_str("</ul></li>");
            }
        }
        open_depth = row.depth;

        let heading = &toc.headings[row.heading_index];
        let mut classes = vec![format!("toc-level-{}", heading.level)];
        if row.active {
            classes.push("toc-active".to_string());
        }
        if row.collapsed {
            classes.push("toc-collapsed".to_string());
        }
        if row.muted {
            classes.push("toc-muted".to_string());
        }
        out.push_str(&format!("<li class=\"{}\">", classes.join(" ")));
        if let Some(numbering) = &heading.numbering {
            out.push_str(&format!(
                "<span class=\"toc-numbering\">{}</span> ",
                html_escape::encode_text(numbering)
            ));
        }
        match &heading.html {
            Some(html) => out.push_str(html),
            None => out.push_str(&html_escape::encode_text(&heading.text)),
        }
    }

    out.push_str("</li>");
    for _ in 0..open_depth {
        out.push_str("</ul></li>");
    }
    out.push_str("</ul>");
    out
}
