//! Host shell update handlers
//!
//! Drives the panel state machine: Idle until the active widget has a
//! generator, Tracking until that widget is disposed.

use std::sync::Arc;

use super::{combine, toc::start_extraction};
use crate::commands::Cmd;
use crate::error::{Result, TocError};
use crate::generators::Generator;
use crate::messages::ShellMsg;
use crate::model::{AppModel, Subscription, Tracking, WidgetId};

/// Handle messages from the host shell
pub fn update_shell(model: &mut AppModel, msg: ShellMsg) -> Option<Cmd> {
    match msg {
        ShellMsg::CurrentChanged(None) => {
            // Nothing focused: keep showing what we had
            model.active_widget = None;
            tracing::debug!("Active widget cleared, panel unchanged");
            None
        }

        ShellMsg::CurrentChanged(Some(widget_id)) => {
            model.active_widget = Some(widget_id);
            evaluate_active(model)
        }

        ShellMsg::WidgetDisposed(widget_id) => {
            if let Some(widget) = model.widget_mut(widget_id) {
                widget.dispose();
            }
            model.toc.forget_widget(widget_id);
            if model.active_widget == Some(widget_id) {
                model.active_widget = None;
            }

            if model.toc.tracked_widget() != Some(widget_id) {
                return None;
            }

            tracing::info!("Tracked widget {} disposed, panel idle", widget_id);
            model.toc.stop_tracking();
            combine([Some(Cmd::Redraw), evaluate_active(model)])
        }
    }
}

/// Register a generator while the application is running
///
/// An idle panel re-evaluates the active widget, which the new generator
/// may now support. A tracking panel keeps its current generator.
pub fn register_generator(
    model: &mut AppModel,
    generator: Arc<dyn Generator>,
) -> Result<Option<Cmd>> {
    model.registry.add_generator(generator)?;
    if model.toc.is_idle() {
        return Ok(evaluate_active(model));
    }
    Ok(None)
}

/// Re-evaluate the shell's active widget against the registry
fn evaluate_active(model: &mut AppModel) -> Option<Cmd> {
    let widget_id = model.active_widget?;
    if model.toc.tracked_widget() == Some(widget_id) {
        return None;
    }

    match model.generator_for(widget_id) {
        Ok(generator) => {
            track(model, widget_id, generator);
            combine([Some(Cmd::Redraw), start_extraction(model)])
        }
        Err(TocError::UnsupportedWidget(_)) => {
            if let Some(tracked) = model.toc.tracked_widget() {
                if model.is_open(tracked) {
                    tracing::debug!(
                        "No generator for widget {}, staying on {}",
                        widget_id,
                        tracked
                    );
                    return None;
                }
            }
            tracing::debug!("No generator for widget {}, panel idle", widget_id);
            let was_idle = model.toc.is_idle();
            model.toc.stop_tracking();
            (!was_idle).then_some(Cmd::Redraw)
        }
        Err(err) => {
            tracing::debug!("Ignoring activation: {}", err);
            None
        }
    }
}

fn track(model: &mut AppModel, widget_id: WidgetId, generator: Arc<dyn Generator>) {
    let Some(widget) = model.widget(widget_id) else {
        return;
    };
    let subscription = generator
        .change_signal(widget)
        .map(|signal| Subscription { widget_id, signal });

    tracing::info!(
        "Tracking widget {} '{}' with generator `{}`",
        widget_id,
        widget.title,
        generator.name()
    );
    if subscription.is_none() {
        tracing::debug!(
            "Generator `{}` has no change signal; refresh manually",
            generator.name()
        );
    }

    model.toc.track(Tracking {
        widget_id,
        generator,
        subscription,
    });
    let cursor = model.widget(widget_id).and_then(|w| w.cursor.clone());
    model.toc.update_active(cursor.as_ref());
}
