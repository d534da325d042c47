//! Notebook generator
//!
//! Markdown cells are scanned with the markdown heading detector; code and
//! raw cells never contribute headings (a `#` there is a comment, not
//! markdown). Headings from collapsed cells are still listed, flagged so
//! the view can de-emphasize them.

use super::markdown::{display_heading, scan_headings};
use super::{finish, Generator, GeneratorOptions, SignalKind};
use crate::error::{Result, TocError};
use crate::model::{CellKind, Widget, WidgetContent};
use crate::outline::{Heading, HeadingTarget};

const NAME: &str = "notebook";

pub struct NotebookGenerator {
    options: GeneratorOptions,
}

impl NotebookGenerator {
    pub fn new(options: GeneratorOptions) -> Self {
        Self { options }
    }
}

impl Generator for NotebookGenerator {
    fn name(&self) -> &str {
        NAME
    }

    fn is_enabled(&self, widget: &Widget) -> bool {
        matches!(widget.content, WidgetContent::Notebook(_))
    }

    fn generate(
        &self,
        content: &WidgetContent,
        options: &GeneratorOptions,
    ) -> Result<Vec<Heading>> {
        let WidgetContent::Notebook(notebook) = content else {
            return Err(TocError::extraction(NAME, "expected notebook content"));
        };

        let mut headings = Vec::new();
        for (cell_index, cell) in notebook.cells.iter().enumerate() {
            if cell.kind != CellKind::Markdown {
                continue;
            }

            // One unparseable cell must not empty the whole outline
            let raw_headings = match scan_headings(&cell.source) {
                Ok(raw) => raw,
                Err(e) => {
                    tracing::warn!("Skipping notebook cell {}: {}", cell_index, e);
                    continue;
                }
            };

            for raw in &raw_headings {
                let target = HeadingTarget::Cell {
                    cell: cell_index,
                    line: raw.line,
                };
                if let Some(mut heading) = display_heading(raw, target, options) {
                    heading.in_collapsed_cell = cell.collapsed;
                    headings.push(heading);
                }
            }
        }

        Ok(finish(headings, options))
    }

    fn change_signal(&self, _widget: &Widget) -> Option<SignalKind> {
        Some(SignalKind::ContentChanged)
    }

    fn options(&self) -> &GeneratorOptions {
        &self.options
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Cell, EditorDocument, Notebook, WidgetId};

    fn generate(cells: Vec<Cell>) -> Vec<Heading> {
        let generator = NotebookGenerator::new(GeneratorOptions::default());
        generator
            .generate(
                &WidgetContent::Notebook(Notebook::new(cells)),
                generator.options(),
            )
            .unwrap()
    }

    #[test]
    fn test_code_cell_comments_are_not_headings() {
        let headings = generate(vec![
            Cell::code("# this is a comment\nx = 1"),
            Cell::markdown("# Real heading"),
        ]);
        assert_eq!(headings.len(), 1);
        assert_eq!(headings[0].text, "Real heading");
        assert_eq!(headings[0].target, HeadingTarget::Cell { cell: 1, line: 0 });
    }

    #[test]
    fn test_raw_cells_are_skipped() {
        let headings = generate(vec![Cell::raw("# not markdown")]);
        assert!(headings.is_empty());
    }

    #[test]
    fn test_targets_use_line_within_cell() {
        let headings = generate(vec![
            Cell::markdown("intro text\n\n## Second"),
            Cell::markdown("### Third"),
        ]);
        assert_eq!(headings[0].target, HeadingTarget::Cell { cell: 0, line: 2 });
        assert_eq!(headings[1].target, HeadingTarget::Cell { cell: 1, line: 0 });
        assert_eq!(headings[0].level, 2);
        assert_eq!(headings[1].level, 3);
    }

    #[test]
    fn test_collapsed_cells_still_contribute_marked_headings() {
        let headings = generate(vec![
            Cell::markdown("# Open"),
            Cell::markdown("# Hidden").collapsed(),
        ]);
        assert_eq!(headings.len(), 2);
        assert!(!headings[0].in_collapsed_cell);
        assert!(headings[1].in_collapsed_cell);
    }

    #[test]
    fn test_numbering_spans_cells() {
        let generator = NotebookGenerator::new(GeneratorOptions {
            numbering: true,
            ..GeneratorOptions::default()
        });
        let notebook = Notebook::new(vec![
            Cell::markdown("# A\n## B"),
            Cell::code("# nope"),
            Cell::markdown("## C\n# D"),
        ]);
        let headings = generator
            .generate(&WidgetContent::Notebook(notebook), generator.options())
            .unwrap();
        let numbering: Vec<&str> = headings
            .iter()
            .map(|h| h.numbering.as_deref().unwrap_or(""))
            .collect();
        assert_eq!(numbering, vec!["1", "1.1", "1.2", "2"]);
    }

    #[test]
    fn test_enabled_only_for_notebooks() {
        let generator = NotebookGenerator::new(GeneratorOptions::default());
        let nb = Widget::new(
            WidgetId(1),
            "a.ipynb",
            WidgetContent::Notebook(Notebook::default()),
        );
        let md = Widget::new(
            WidgetId(2),
            "a.md",
            WidgetContent::Editor(EditorDocument::with_text("# A", "text/markdown")),
        );
        assert!(generator.is_enabled(&nb));
        assert!(!generator.is_enabled(&md));
    }
}
