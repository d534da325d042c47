//! Table-of-contents update handlers
//!
//! Extraction lifecycle (debounce → run → apply), collapse state and
//! navigation back into the tracked widget.

use crate::commands::{Cmd, ExtractJob};
use crate::error::TocError;
use crate::messages::TocMsg;
use crate::model::AppModel;
use crate::outline::{has_children, visible_headings};

/// Handle table-of-contents messages
pub fn update_toc(model: &mut AppModel, msg: TocMsg) -> Option<Cmd> {
    match msg {
        TocMsg::ExtractReady {
            widget_id,
            revision,
            sequence,
        } => {
            tracing::debug!(
                "update_toc: ExtractReady received for widget={} rev={} seq={}",
                widget_id,
                revision,
                sequence
            );

            if model.toc.tracked_widget() != Some(widget_id) {
                tracing::debug!("Skipping extraction for untracked widget {}", widget_id);
                return None;
            }

            // A later signal opened a newer debounce window
            if !model.toc.is_latest_debounce(sequence) {
                tracing::debug!("Skipping superseded debounce seq={}", sequence);
                return None;
            }

            let widget = model.widget(widget_id)?;
            if widget.revision != revision {
                tracing::debug!(
                    "Skipping stale extraction request: widget revision {} != request revision {}",
                    widget.revision,
                    revision
                );
                return None;
            }

            start_extraction(model)
        }

        TocMsg::ExtractCompleted {
            ticket,
            headings,
            error,
        } => {
            tracing::debug!(
                "update_toc: ExtractCompleted for widget={} gen={} ({} headings)",
                ticket.widget_id,
                ticket.generation,
                headings.len()
            );

            if error.is_some() {
                model.toc.stats.failed += 1;
            }

            if !model.toc.accepts(&ticket) {
                model.toc.stats.discarded += 1;
                tracing::debug!(
                    "Discarding stale extraction gen={} for widget {}",
                    ticket.generation,
                    ticket.widget_id
                );
                return None;
            }

            if !model.is_open(ticket.widget_id) {
                model.toc.stats.discarded += 1;
                tracing::debug!(
                    "Discarding extraction: {}",
                    TocError::DisposedWidget(ticket.widget_id)
                );
                return None;
            }

            model.toc.apply(&ticket, headings);
            let cursor = model.tracked_widget().and_then(|w| w.cursor.clone());
            model.toc.update_active(cursor.as_ref());

            tracing::debug!(
                "Applied {} headings for widget {} (gen {})",
                model.toc.headings.len(),
                ticket.widget_id,
                ticket.generation
            );
            Some(Cmd::Redraw)
        }

        TocMsg::Refresh => start_extraction(model),

        TocMsg::ToggleCollapsed(index) => {
            model.toc.toggle_collapsed(index).map(|_| Cmd::Redraw)
        }

        TocMsg::CollapseAll => set_all_collapsed(model, true),
        TocMsg::ExpandAll => set_all_collapsed(model, false),

        TocMsg::ActivateHeading(index) => activate_heading(model, index),

        TocMsg::SelectPrevious => move_selection(model, -1),
        TocMsg::SelectNext => move_selection(model, 1),

        TocMsg::ExpandSelected => {
            let selected = model.toc.selected_index?;
            model.toc.set_collapsed(selected, false).map(|_| Cmd::Redraw)
        }

        TocMsg::CollapseSelected => {
            let selected = model.toc.selected_index?;
            let headings = &model.toc.headings;
            if has_children(headings, selected) && !headings[selected].collapsed {
                return model.toc.set_collapsed(selected, true).map(|_| Cmd::Redraw);
            }
            // Leaf or already collapsed: move to the parent row
            let level = headings.get(selected)?.level;
            let parent = (0..selected).rev().find(|&i| headings[i].level < level)?;
            model.toc.selected_index = Some(parent);
            Some(Cmd::Redraw)
        }

        TocMsg::ActivateSelected => {
            let selected = model.toc.selected_index?;
            activate_heading(model, selected)
        }
    }
}

/// Snapshot the tracked widget and start an extraction
///
/// Any extraction still in flight is cancelled first; only the one started
/// here can reach the view.
pub(crate) fn start_extraction(model: &mut AppModel) -> Option<Cmd> {
    let tracking = model.toc.current.as_ref()?;
    let generator = tracking.generator.clone();
    let widget = model
        .widgets
        .get(&tracking.widget_id)
        .filter(|w| !w.disposed)?;
    let widget_id = widget.id;
    let revision = widget.revision;
    let content = widget.snapshot();

    model.toc.cancel_in_flight();
    let ticket = model.toc.begin_extraction(widget_id, revision);
    tracing::debug!(
        "Starting `{}` extraction for widget {} rev={} gen={}",
        generator.name(),
        widget_id,
        revision,
        ticket.generation
    );

    Some(Cmd::RunExtraction {
        ticket,
        job: ExtractJob { generator, content },
    })
}

fn set_all_collapsed(model: &mut AppModel, collapsed: bool) -> Option<Cmd> {
    if !model.toc.is_collapsible() || model.toc.headings.is_empty() {
        return None;
    }
    model.toc.set_all_collapsed(collapsed);
    Some(Cmd::Redraw)
}

/// Scroll the tracked widget to a heading
fn activate_heading(model: &mut AppModel, index: usize) -> Option<Cmd> {
    let target = model.toc.headings.get(index)?.target.clone();
    let widget_id = model.toc.tracked_widget()?;
    let widget = model.widget_mut(widget_id)?;

    if !widget.reveal(&target) {
        tracing::debug!(
            "Heading target {:?} no longer resolves in widget {}",
            target,
            widget_id
        );
        return None;
    }

    model.toc.select(index);
    Some(Cmd::Redraw)
}

/// Move the keyboard selection by `delta` visible rows
fn move_selection(model: &mut AppModel, delta: isize) -> Option<Cmd> {
    let visible = visible_headings(&model.toc.headings);
    if visible.is_empty() {
        return None;
    }

    let position = model
        .toc
        .selected_index
        .and_then(|selected| visible.iter().position(|v| v.index == selected));

    let next = match position {
        Some(pos) => pos
            .saturating_add_signed(delta)
            .min(visible.len() - 1),
        None if delta < 0 => visible.len() - 1,
        None => 0,
    };

    let index = visible[next].index;
    if model.toc.selected_index == Some(index) {
        return None;
    }
    model.toc.selected_index = Some(index);
    Some(Cmd::Redraw)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::TocConfig;
    use crate::messages::ShellMsg;
    use crate::model::{EditorDocument, ExtractTicket, WidgetContent, WidgetId, MIME_MARKDOWN};
    use crate::outline::{Heading, HeadingTarget};
    use crate::update::update_shell;

    const DOC: &str = "# A\n\n## B\n\n### C\n\n# D\n";

    /// Track a markdown widget and run its first extraction inline
    fn tracked_model(text: &str) -> (AppModel, WidgetId) {
        let mut model = AppModel::new(TocConfig::default());
        let id = model.open_widget(
            "doc.md",
            WidgetContent::Editor(EditorDocument::with_text(text, MIME_MARKDOWN)),
        );
        let cmd = update_shell(&mut model, ShellMsg::CurrentChanged(Some(id)));
        run_inline(&mut model, cmd);
        (model, id)
    }

    fn run_inline(model: &mut AppModel, cmd: Option<Cmd>) {
        match cmd {
            Some(Cmd::RunExtraction { ticket, job }) => {
                let (headings, error) = job.run();
                update_toc(
                    model,
                    TocMsg::ExtractCompleted {
                        ticket,
                        headings,
                        error,
                    },
                );
            }
            Some(Cmd::Batch(cmds)) => {
                for cmd in cmds {
                    run_inline(model, Some(cmd));
                }
            }
            _ => {}
        }
    }

    fn ticket_cmd(cmd: Option<Cmd>) -> (ExtractTicket, ExtractJob) {
        match cmd {
            Some(Cmd::RunExtraction { ticket, job }) => (ticket, job),
            other => panic!("Expected RunExtraction, got {:?}", other),
        }
    }

    #[test]
    fn test_activation_extracts_headings() {
        let (model, _) = tracked_model(DOC);
        let texts: Vec<&str> = model.toc.headings.iter().map(|h| h.text.as_str()).collect();
        assert_eq!(texts, vec!["A", "B", "C", "D"]);
        assert_eq!(model.toc.stats.applied, 1);
    }

    #[test]
    fn test_extract_ready_skips_stale_revision() {
        let (mut model, id) = tracked_model(DOC);
        model.widget_mut(id).unwrap().set_text("# Changed");
        let sequence = model.toc.next_debounce();

        let cmd = update_toc(
            &mut model,
            TocMsg::ExtractReady {
                widget_id: id,
                revision: 0,
                sequence,
            },
        );
        assert!(cmd.is_none(), "Stale ExtractReady should produce no command");
    }

    #[test]
    fn test_extract_ready_skips_superseded_sequence() {
        let (mut model, id) = tracked_model(DOC);
        let first = model.toc.next_debounce();
        let _second = model.toc.next_debounce();
        let cmd = update_toc(
            &mut model,
            TocMsg::ExtractReady {
                widget_id: id,
                revision: 0,
                sequence: first,
            },
        );
        assert!(cmd.is_none());
    }

    #[test]
    fn test_extract_ready_snapshots_current_content() {
        let (mut model, id) = tracked_model(DOC);
        model.widget_mut(id).unwrap().set_text("# New");
        let sequence = model.toc.next_debounce();
        let cmd = update_toc(
            &mut model,
            TocMsg::ExtractReady {
                widget_id: id,
                revision: 1,
                sequence,
            },
        );
        let (ticket, job) = ticket_cmd(cmd);
        assert_eq!(ticket.revision, 1);
        match job.content {
            WidgetContent::Editor(doc) => assert_eq!(doc.buffer.to_string(), "# New"),
            _ => panic!("Expected editor snapshot"),
        }
    }

    #[test]
    fn test_older_extraction_completing_late_is_discarded() {
        let (mut model, _) = tracked_model(DOC);
        let (older, _) = ticket_cmd(update_toc(&mut model, TocMsg::Refresh));
        let (newer, job) = ticket_cmd(update_toc(&mut model, TocMsg::Refresh));

        let (headings, error) = job.run();
        update_toc(
            &mut model,
            TocMsg::ExtractCompleted {
                ticket: newer,
                headings,
                error,
            },
        );
        let cmd = update_toc(
            &mut model,
            TocMsg::ExtractCompleted {
                ticket: older,
                headings: vec![Heading::new(
                    1,
                    "Stale",
                    HeadingTarget::Line { line: 0, offset: 0 },
                )],
                error: None,
            },
        );
        assert!(cmd.is_none());
        assert_eq!(model.toc.headings[0].text, "A");
        assert_eq!(model.toc.stats.discarded, 1);
    }

    #[test]
    fn test_result_for_disposed_widget_is_discarded() {
        let (mut model, id) = tracked_model(DOC);
        let (ticket, job) = ticket_cmd(update_toc(&mut model, TocMsg::Refresh));
        update_shell(&mut model, ShellMsg::WidgetDisposed(id));

        let (headings, error) = job.run();
        let cmd = update_toc(
            &mut model,
            TocMsg::ExtractCompleted {
                ticket,
                headings,
                error,
            },
        );
        assert!(cmd.is_none());
        assert!(model.toc.headings.is_empty());
        assert!(update_toc(&mut model, TocMsg::Refresh).is_none());
    }

    #[test]
    fn test_toggle_and_collapse_all() {
        let (mut model, _) = tracked_model(DOC);
        assert!(update_toc(&mut model, TocMsg::ToggleCollapsed(0)).is_some());
        assert!(model.toc.headings[0].collapsed);

        update_toc(&mut model, TocMsg::ExpandAll);
        assert!(model.toc.headings.iter().all(|h| !h.collapsed));

        update_toc(&mut model, TocMsg::CollapseAll);
        // Only headings with children collapse
        let collapsed: Vec<bool> = model.toc.headings.iter().map(|h| h.collapsed).collect();
        assert_eq!(collapsed, vec![true, true, false, false]);
    }

    #[test]
    fn test_activate_heading_reveals_target() {
        let (mut model, id) = tracked_model(DOC);
        assert!(update_toc(&mut model, TocMsg::ActivateHeading(2)).is_some());
        assert_eq!(
            model.widget(id).unwrap().revealed,
            Some(HeadingTarget::Line { line: 4, offset: 11 })
        );
        assert_eq!(model.toc.selected_index, Some(2));
    }

    #[test]
    fn test_activate_hidden_heading_selects_visible_ancestor() {
        let (mut model, id) = tracked_model(DOC);
        update_toc(&mut model, TocMsg::ToggleCollapsed(0));
        assert!(update_toc(&mut model, TocMsg::ActivateHeading(2)).is_some());
        assert_eq!(
            model.widget(id).unwrap().revealed,
            Some(HeadingTarget::Line { line: 4, offset: 11 })
        );
        assert_eq!(model.toc.selected_index, Some(0));
    }

    #[test]
    fn test_activate_stale_target_is_ignored() {
        let (mut model, id) = tracked_model(DOC);
        model.widget_mut(id).unwrap().set_text("# Short");
        assert!(update_toc(&mut model, TocMsg::ActivateHeading(3)).is_none());
        assert!(model.widget(id).unwrap().revealed.is_none());
    }

    #[test]
    fn test_keyboard_selection_skips_hidden_rows() {
        let (mut model, _) = tracked_model(DOC);
        update_toc(&mut model, TocMsg::SelectNext);
        assert_eq!(model.toc.selected_index, Some(0));

        update_toc(&mut model, TocMsg::CollapseSelected);
        assert!(model.toc.headings[0].collapsed);
        update_toc(&mut model, TocMsg::SelectNext);
        assert_eq!(model.toc.selected_index, Some(3));

        update_toc(&mut model, TocMsg::SelectPrevious);
        update_toc(&mut model, TocMsg::ExpandSelected);
        update_toc(&mut model, TocMsg::SelectNext);
        assert_eq!(model.toc.selected_index, Some(1));
    }

    #[test]
    fn test_collapse_selected_leaf_moves_to_parent() {
        let (mut model, _) = tracked_model(DOC);
        model.toc.selected_index = Some(2);
        update_toc(&mut model, TocMsg::CollapseSelected);
        assert_eq!(model.toc.selected_index, Some(1));
    }
}
