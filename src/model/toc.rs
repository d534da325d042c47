//! Table-of-contents panel state
//!
//! Owns the current `{widget, generator}` pair, the last applied heading
//! list, per-widget collapse state, and the generation counters that keep
//! stale or cancelled extractions out of the view.

use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use super::WidgetId;
use crate::generators::{Generator, SignalKind};
use crate::outline::{
    active_heading_index, has_children, heading_keys, visible_headings, Heading, HeadingKey,
    Location,
};

/// Stamp attached to every extraction when it starts
///
/// Results are applied last-writer-wins by `generation` (start order), and
/// only while the panel still tracks `widget_id` and the ticket has not been
/// cancelled.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExtractTicket {
    pub widget_id: WidgetId,
    /// Widget revision the extraction snapshot was taken at
    pub revision: u64,
    pub generation: u64,
}

/// A live connection between the panel and one widget signal
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Subscription {
    pub widget_id: WidgetId,
    pub signal: SignalKind,
}

/// The widget the panel is following and the generator serving it
#[derive(Clone)]
pub struct Tracking {
    pub widget_id: WidgetId,
    pub generator: Arc<dyn Generator>,
    /// `None` for generators without a live change signal
    pub subscription: Option<Subscription>,
}

impl std::fmt::Debug for Tracking {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Tracking")
            .field("widget_id", &self.widget_id)
            .field("generator", &self.generator.name())
            .field("subscription", &self.subscription)
            .finish()
    }
}

/// Counters for diagnostics and tests
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ExtractionStats {
    /// Extractions started
    pub started: u64,
    /// Results applied to the view
    pub applied: u64,
    /// Results dropped as stale or cancelled
    pub discarded: u64,
    /// Generator calls that failed and produced zero headings
    pub failed: u64,
}

#[derive(Debug)]
pub struct TocPanelState {
    pub current: Option<Tracking>,
    /// Headings from the last applied extraction, collapse flags applied
    pub headings: Vec<Heading>,
    /// Index of the heading nearest the widget's cursor
    pub active_index: Option<usize>,
    /// Heading index of the keyboard selection; always a visible row
    pub selected_index: Option<usize>,
    pub stats: ExtractionStats,
    collapsed: HashMap<WidgetId, HashSet<HeadingKey>>,
    next_generation: u64,
    applied_generation: u64,
    /// Tickets below this generation were cancelled
    cancel_floor: u64,
    /// Latest debounce timer; earlier timers are ignored when they fire
    debounce_sequence: u64,
}

impl Default for TocPanelState {
    fn default() -> Self {
        Self {
            current: None,
            headings: Vec::new(),
            active_index: None,
            selected_index: None,
            stats: ExtractionStats::default(),
            collapsed: HashMap::new(),
            next_generation: 1,
            applied_generation: 0,
            cancel_floor: 1,
            debounce_sequence: 0,
        }
    }
}

impl TocPanelState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_idle(&self) -> bool {
        self.current.is_none()
    }

    pub fn tracked_widget(&self) -> Option<WidgetId> {
        self.current.as_ref().map(|t| t.widget_id)
    }

    /// Whether `signal` from `widget_id` should trigger re-extraction
    pub fn is_subscribed(&self, widget_id: WidgetId, signal: SignalKind) -> bool {
        self.current
            .as_ref()
            .and_then(|t| t.subscription)
            .is_some_and(|s| s.widget_id == widget_id && s.signal == signal)
    }

    /// Start following a widget. Drops the previous subscription and
    /// cancels anything in flight for the previous widget.
    pub fn track(&mut self, tracking: Tracking) {
        self.cancel_in_flight();
        self.headings.clear();
        self.active_index = None;
        self.selected_index = None;
        self.current = Some(tracking);
    }

    /// Return to the idle state
    pub fn stop_tracking(&mut self) {
        self.cancel_in_flight();
        self.current = None;
        self.headings.clear();
        self.active_index = None;
        self.selected_index = None;
    }

    /// Forget collapse state for a widget that is gone
    pub fn forget_widget(&mut self, widget_id: WidgetId) {
        self.collapsed.remove(&widget_id);
    }

    /// Invalidate every extraction started so far
    pub fn cancel_in_flight(&mut self) {
        self.cancel_floor = self.next_generation;
    }

    /// Start a new debounce window, superseding any pending one
    pub fn next_debounce(&mut self) -> u64 {
        self.debounce_sequence += 1;
        self.debounce_sequence
    }

    pub fn is_latest_debounce(&self, sequence: u64) -> bool {
        sequence == self.debounce_sequence
    }

    /// Stamp a new extraction for the tracked widget
    pub fn begin_extraction(&mut self, widget_id: WidgetId, revision: u64) -> ExtractTicket {
        let generation = self.next_generation;
        self.next_generation += 1;
        self.stats.started += 1;
        ExtractTicket {
            widget_id,
            revision,
            generation,
        }
    }

    /// Whether a finished extraction may still reach the view
    pub fn accepts(&self, ticket: &ExtractTicket) -> bool {
        self.tracked_widget() == Some(ticket.widget_id)
            && ticket.generation >= self.cancel_floor
            && ticket.generation > self.applied_generation
    }

    /// Replace the shown headings with an accepted extraction result
    pub fn apply(&mut self, ticket: &ExtractTicket, mut headings: Vec<Heading>) {
        if let Some(collapsed) = self.collapsed.get(&ticket.widget_id) {
            let keys = heading_keys(&headings);
            for (heading, key) in headings.iter_mut().zip(keys) {
                heading.collapsed = collapsed.contains(&key);
            }
        }
        self.headings = headings;
        self.applied_generation = ticket.generation;
        self.stats.applied += 1;
        if self
            .selected_index
            .is_some_and(|idx| idx >= self.headings.len())
        {
            self.selected_index = None;
        }
        self.keep_selection_visible();
    }

    /// Recompute the active heading from a cursor location
    ///
    /// Returns true when the active heading changed.
    pub fn update_active(&mut self, location: Option<&Location>) -> bool {
        let active = location.and_then(|loc| active_heading_index(&self.headings, loc));
        let changed = active != self.active_index;
        self.active_index = active;
        changed
    }

    /// Whether headings of the tracked widget may be collapsed
    pub fn is_collapsible(&self) -> bool {
        self.current
            .as_ref()
            .is_some_and(|t| t.generator.options().collapsible)
    }

    /// Collapse or expand one heading; returns the new state
    pub fn set_collapsed(&mut self, index: usize, collapsed: bool) -> Option<bool> {
        let widget_id = self.tracked_widget()?;
        if !self.is_collapsible() || !has_children(&self.headings, index) {
            return None;
        }
        let key = heading_keys(&self.headings).swap_remove(index);
        let set = self.collapsed.entry(widget_id).or_default();
        if collapsed {
            set.insert(key);
        } else {
            set.remove(&key);
        }
        self.headings[index].collapsed = collapsed;
        self.keep_selection_visible();
        Some(collapsed)
    }

    /// Move a selection hidden by a collapse up to its visible ancestor
    fn keep_selection_visible(&mut self) {
        let Some(selected) = self.selected_index else {
            return;
        };
        let visible = visible_headings(&self.headings);
        if visible.iter().any(|v| v.index == selected) {
            return;
        }
        self.selected_index = visible
            .iter()
            .rev()
            .find(|v| v.index < selected)
            .map(|v| v.index);
    }

    pub fn toggle_collapsed(&mut self, index: usize) -> Option<bool> {
        let current = self.headings.get(index)?.collapsed;
        self.set_collapsed(index, !current)
    }

    /// Collapse or expand every heading that has children
    pub fn set_all_collapsed(&mut self, collapsed: bool) {
        let Some(widget_id) = self.tracked_widget() else {
            return;
        };
        if !self.is_collapsible() {
            return;
        }
        let keys = heading_keys(&self.headings);
        let set = self.collapsed.entry(widget_id).or_default();
        for (index, key) in keys.into_iter().enumerate() {
            if !has_children(&self.headings, index) {
                continue;
            }
            if collapsed {
                set.insert(key);
            } else {
                set.remove(&key);
            }
            self.headings[index].collapsed = collapsed;
        }
        self.keep_selection_visible();
    }

    /// Select a heading, or its nearest visible ancestor when it is hidden
    pub fn select(&mut self, index: usize) {
        self.selected_index = (index < self.headings.len()).then_some(index);
        self.keep_selection_visible();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::generators::{GeneratorOptions, MarkdownGenerator};
    use crate::outline::HeadingTarget;

    fn tracking(widget_id: WidgetId) -> Tracking {
        Tracking {
            widget_id,
            generator: Arc::new(MarkdownGenerator::new(GeneratorOptions::default())),
            subscription: Some(Subscription {
                widget_id,
                signal: SignalKind::ContentChanged,
            }),
        }
    }

    fn outline(entries: &[(u8, &str)]) -> Vec<Heading> {
        entries
            .iter()
            .enumerate()
            .map(|(i, (level, text))| {
                Heading::new(*level, *text, HeadingTarget::Line { line: i, offset: 0 })
            })
            .collect()
    }

    #[test]
    fn test_newer_ticket_wins_over_older_completion() {
        let mut toc = TocPanelState::new();
        toc.track(tracking(WidgetId(1)));
        let older = toc.begin_extraction(WidgetId(1), 1);
        let newer = toc.begin_extraction(WidgetId(1), 2);

        assert!(toc.accepts(&newer));
        toc.apply(&newer, outline(&[(1, "New")]));
        assert!(!toc.accepts(&older));
        assert_eq!(toc.headings[0].text, "New");
    }

    #[test]
    fn test_switching_widgets_cancels_in_flight() {
        let mut toc = TocPanelState::new();
        toc.track(tracking(WidgetId(1)));
        let ticket = toc.begin_extraction(WidgetId(1), 0);
        toc.track(tracking(WidgetId(2)));
        assert!(!toc.accepts(&ticket));

        // Coming back does not revive the cancelled ticket
        toc.track(tracking(WidgetId(1)));
        assert!(!toc.accepts(&ticket));
    }

    #[test]
    fn test_collapse_survives_reextraction() {
        let mut toc = TocPanelState::new();
        toc.track(tracking(WidgetId(1)));
        let first = toc.begin_extraction(WidgetId(1), 0);
        toc.apply(&first, outline(&[(1, "A"), (2, "B"), (1, "C"), (2, "D")]));
        assert_eq!(toc.set_collapsed(2, true), Some(true));

        // A heading inserted before C keeps C's (level, text, ordinal)
        let second = toc.begin_extraction(WidgetId(1), 1);
        toc.apply(
            &second,
            outline(&[(1, "A"), (2, "B"), (2, "New"), (1, "C"), (2, "D")]),
        );
        assert!(toc.headings[3].collapsed);
        assert!(!toc.headings[0].collapsed);
    }

    #[test]
    fn test_leaf_cannot_collapse() {
        let mut toc = TocPanelState::new();
        toc.track(tracking(WidgetId(1)));
        let ticket = toc.begin_extraction(WidgetId(1), 0);
        toc.apply(&ticket, outline(&[(1, "A"), (2, "B")]));
        assert_eq!(toc.set_collapsed(1, true), None);
        assert_eq!(toc.toggle_collapsed(0), Some(true));
        assert_eq!(toc.toggle_collapsed(0), Some(false));
    }

    #[test]
    fn test_collapse_moves_hidden_selection_to_ancestor() {
        let mut toc = TocPanelState::new();
        toc.track(tracking(WidgetId(1)));
        let ticket = toc.begin_extraction(WidgetId(1), 0);
        toc.apply(&ticket, outline(&[(1, "A"), (2, "B"), (3, "C")]));
        toc.selected_index = Some(2);
        toc.set_collapsed(0, true);
        assert_eq!(toc.selected_index, Some(0));
    }

    #[test]
    fn test_collapse_all_persists_and_keeps_selection_visible() {
        let mut toc = TocPanelState::new();
        toc.track(tracking(WidgetId(1)));
        let first = toc.begin_extraction(WidgetId(1), 0);
        toc.apply(&first, outline(&[(1, "A"), (2, "B"), (3, "C"), (1, "D")]));
        toc.selected_index = Some(2);

        toc.set_all_collapsed(true);
        let collapsed: Vec<bool> = toc.headings.iter().map(|h| h.collapsed).collect();
        assert_eq!(collapsed, vec![true, true, false, false]);
        assert_eq!(toc.selected_index, Some(0));

        // Both collapses are remembered for the next extraction
        let second = toc.begin_extraction(WidgetId(1), 1);
        toc.apply(&second, outline(&[(1, "A"), (2, "B"), (3, "C"), (1, "D")]));
        assert!(toc.headings[0].collapsed && toc.headings[1].collapsed);

        toc.set_all_collapsed(false);
        assert!(toc.headings.iter().all(|h| !h.collapsed));
        assert!(toc.collapsed[&WidgetId(1)].is_empty());
    }

    #[test]
    fn test_select_hidden_heading_lands_on_ancestor() {
        let mut toc = TocPanelState::new();
        toc.track(tracking(WidgetId(1)));
        let ticket = toc.begin_extraction(WidgetId(1), 0);
        toc.apply(&ticket, outline(&[(1, "A"), (2, "B"), (1, "C")]));
        toc.set_collapsed(0, true);

        toc.select(1);
        assert_eq!(toc.selected_index, Some(0));
        toc.select(2);
        assert_eq!(toc.selected_index, Some(2));
        toc.select(9);
        assert_eq!(toc.selected_index, None);
    }

    #[test]
    fn test_debounce_sequence_supersedes() {
        let mut toc = TocPanelState::new();
        let first = toc.next_debounce();
        let second = toc.next_debounce();
        assert!(!toc.is_latest_debounce(first));
        assert!(toc.is_latest_debounce(second));
    }

    #[test]
    fn test_stop_tracking_clears_view() {
        let mut toc = TocPanelState::new();
        toc.track(tracking(WidgetId(1)));
        let ticket = toc.begin_extraction(WidgetId(1), 0);
        toc.apply(&ticket, outline(&[(1, "A")]));
        toc.stop_tracking();
        assert!(toc.is_idle());
        assert!(toc.headings.is_empty());
        assert!(!toc.is_subscribed(WidgetId(1), SignalKind::ContentChanged));
    }
}
