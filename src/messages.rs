//! Message types for the Elm-style architecture
//!
//! All state changes flow through these message types.

use crate::model::{ExtractTicket, WidgetId};
use crate::outline::{Heading, Location};

/// Messages coming from the host shell
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ShellMsg {
    /// The shell's active widget changed (`None` when nothing is focused)
    CurrentChanged(Option<WidgetId>),
    /// A widget was closed; its content is gone for good
    WidgetDisposed(WidgetId),
}

/// Signals emitted by a single widget
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WidgetMsg {
    /// Text or cell structure changed
    ContentChanged(WidgetId),
    /// The rendering pipeline produced new output
    Rendered(WidgetId),
    /// Cursor or scroll position moved
    CursorMoved {
        widget_id: WidgetId,
        location: Location,
    },
}

/// Table-of-contents panel messages
#[derive(Debug, Clone)]
pub enum TocMsg {
    /// Debounce window elapsed (sent by the runtime)
    ExtractReady {
        widget_id: WidgetId,
        revision: u64,
        sequence: u64,
    },
    /// Worker finished an extraction
    ExtractCompleted {
        ticket: ExtractTicket,
        headings: Vec<Heading>,
        /// Contained generator failure, already logged
        error: Option<String>,
    },
    /// Re-extract the tracked widget now
    Refresh,
    ToggleCollapsed(usize),
    CollapseAll,
    ExpandAll,
    /// Navigate the tracked widget to a heading (click)
    ActivateHeading(usize),

    // === Keyboard navigation over visible rows ===
    SelectPrevious,
    SelectNext,
    ExpandSelected,
    CollapseSelected,
    ActivateSelected,
}

/// Top-level message type
#[derive(Debug, Clone)]
pub enum Msg {
    Shell(ShellMsg),
    Widget(WidgetMsg),
    Toc(TocMsg),
}

// Convenience constructors for common messages
impl Msg {
    pub fn current_changed(widget_id: Option<WidgetId>) -> Self {
        Msg::Shell(ShellMsg::CurrentChanged(widget_id))
    }

    pub fn disposed(widget_id: WidgetId) -> Self {
        Msg::Shell(ShellMsg::WidgetDisposed(widget_id))
    }

    pub fn content_changed(widget_id: WidgetId) -> Self {
        Msg::Widget(WidgetMsg::ContentChanged(widget_id))
    }

    pub fn rendered(widget_id: WidgetId) -> Self {
        Msg::Widget(WidgetMsg::Rendered(widget_id))
    }
}
