//! Update functions for the Elm-style architecture
//!
//! All state transformations flow through these functions.

mod shell;
mod toc;
mod widget;

use crate::commands::Cmd;
use crate::messages::Msg;
use crate::model::AppModel;
use crate::tracing::PanelSnapshot;

pub use shell::{register_generator, update_shell};
pub use toc::update_toc;
pub use widget::{schedule_extraction, update_widget};

/// Main update function - dispatches to sub-handlers
pub fn update(model: &mut AppModel, msg: Msg) -> Option<Cmd> {
    let _span = tracing::debug_span!("update", msg = %msg_type_name(&msg)).entered();

    let before = PanelSnapshot::from_panel(&model.toc);

    let result = match msg {
        Msg::Shell(m) => shell::update_shell(model, m),
        Msg::Widget(m) => widget::update_widget(model, m),
        Msg::Toc(m) => toc::update_toc(model, m),
    };

    if let Some(diff) = before.diff(&PanelSnapshot::from_panel(&model.toc)) {
        tracing::debug!(target: "panel", %diff, "state changed");
    }

    result
}

/// Get a display name for a message type
///
/// Extraction results are summarized so heading lists don't flood the log.
fn msg_type_name(msg: &Msg) -> String {
    use crate::messages::TocMsg;

    match msg {
        Msg::Shell(m) => format!("Shell::{:?}", m),
        Msg::Widget(m) => format!("Widget::{:?}", m),
        Msg::Toc(TocMsg::ExtractCompleted {
            ticket, headings, ..
        }) => format!(
            "Toc::ExtractCompleted(widget={} gen={} headings={})",
            ticket.widget_id,
            ticket.generation,
            headings.len()
        ),
        Msg::Toc(m) => format!("Toc::{:?}", m),
    }
}

/// Fold optional commands into one
pub(crate) fn combine(cmds: impl IntoIterator<Item = Option<Cmd>>) -> Option<Cmd> {
    let mut cmds: Vec<Cmd> = cmds
        .into_iter()
        .flatten()
        .filter(|c| !matches!(c, Cmd::None))
        .collect();
    match cmds.len() {
        0 => None,
        1 => cmds.pop(),
        _ => Some(Cmd::batch(cmds)),
    }
}
