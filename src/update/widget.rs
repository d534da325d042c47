//! Widget signal update handlers
//!
//! Content and render signals only matter while the panel is subscribed to
//! them; each one opens a fresh debounce window.

use crate::commands::Cmd;
use crate::generators::SignalKind;
use crate::messages::WidgetMsg;
use crate::model::{AppModel, WidgetId};

/// Handle signals emitted by widgets
pub fn update_widget(model: &mut AppModel, msg: WidgetMsg) -> Option<Cmd> {
    match msg {
        WidgetMsg::ContentChanged(widget_id) => {
            schedule_extraction(model, widget_id, SignalKind::ContentChanged)
        }
        WidgetMsg::Rendered(widget_id) => {
            schedule_extraction(model, widget_id, SignalKind::Rendered)
        }
        WidgetMsg::CursorMoved {
            widget_id,
            location,
        } => {
            let widget = model.widget_mut(widget_id)?;
            widget.cursor = Some(location.clone());
            if model.toc.tracked_widget() != Some(widget_id) {
                return None;
            }
            model
                .toc
                .update_active(Some(&location))
                .then_some(Cmd::Redraw)
        }
    }
}

/// Schedule a debounced re-extraction after a widget signal
///
/// Cancels any extraction still in flight and supersedes pending timers.
///
/// Returns `None` when the panel is not subscribed to `signal` on this
/// widget (not tracked, disposed, or a generator without live updates).
pub fn schedule_extraction(
    model: &mut AppModel,
    widget_id: WidgetId,
    signal: SignalKind,
) -> Option<Cmd> {
    if !model.toc.is_subscribed(widget_id, signal) {
        tracing::trace!("Ignoring {:?} from unsubscribed widget {}", signal, widget_id);
        return None;
    }
    let revision = model.widget(widget_id).filter(|w| !w.disposed)?.revision;
    // Whatever is in flight describes content that no longer exists
    model.toc.cancel_in_flight();
    let sequence = model.toc.next_debounce();
    let delay_ms = model.config.debounce_ms;

    tracing::debug!(
        "Scheduling extraction for widget {} rev={} seq={} in {}ms",
        widget_id,
        revision,
        sequence,
        delay_ms
    );

    Some(Cmd::DebouncedExtract {
        widget_id,
        revision,
        sequence,
        delay_ms,
    })
}
