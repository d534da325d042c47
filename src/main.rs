use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{Context, Result};
use clap::Parser;

use tocpanel::cli::{CliArgs, StartupConfig};
use tocpanel::fs_watcher::{canonical, FileWatcher};
use tocpanel::messages::{Msg, TocMsg};
use tocpanel::model::{content_for_path, AppModel, Widget, WidgetContent, WidgetId};
use tocpanel::{view, Runtime, TocConfig};

/// Longest we wait for timers and workers before printing anyway
const SETTLE_TIMEOUT: Duration = Duration::from_secs(10);

/// Coalescing window for file system events
const WATCH_DELAY: Duration = Duration::from_millis(100);

fn main() -> Result<()> {
    tocpanel::tracing::init();

    let startup = CliArgs::parse()
        .into_config()
        .map_err(anyhow::Error::msg)?;

    let mut config = TocConfig::load();
    startup.apply_to(&mut config);
    let mut runtime = Runtime::new(AppModel::new(config));

    let mut opened: HashMap<PathBuf, WidgetId> = HashMap::new();
    let mut order = Vec::with_capacity(startup.paths.len());
    for path in &startup.paths {
        let id = runtime.model_mut().next_widget_id();
        let widget = Widget::open_file(id, path, startup.rendered)
            .with_context(|| format!("Failed to open {}", path.display()))?;
        runtime.model_mut().insert_widget(widget);
        opened.insert(canonical(path), id);
        order.push(id);
    }

    let shown = if startup.all {
        order.as_slice()
    } else {
        &order[..order.len().min(1)]
    };
    for id in shown {
        runtime.dispatch(Msg::current_changed(Some(*id)));
        settle(&mut runtime);
        print_outline(&runtime, &startup);
    }

    if startup.watch {
        watch(&mut runtime, &startup, &opened)?;
    }
    Ok(())
}

/// Re-print the outline whenever a watched file changes
fn watch(
    runtime: &mut Runtime,
    startup: &StartupConfig,
    opened: &HashMap<PathBuf, WidgetId>,
) -> Result<()> {
    let watcher =
        FileWatcher::new(&startup.paths, WATCH_DELAY).context("Failed to start file watcher")?;
    tracing::info!("Watching {} files", opened.len());

    loop {
        for path in watcher.poll_events() {
            if let Some(id) = opened.get(&path) {
                reload(runtime, *id, &path, startup.rendered);
            }
        }

        runtime.wait_for_message(WATCH_DELAY);
        if runtime.pump() {
            print_outline(runtime, startup);
        }
    }
}

/// Replace a widget's content from disk and emit its change signal
fn reload(runtime: &mut Runtime, id: WidgetId, path: &Path, rendered: bool) {
    let content = match std::fs::read_to_string(path)
        .map_err(tocpanel::TocError::from)
        .and_then(|text| content_for_path(path, &text, rendered))
    {
        Ok(content) => content,
        Err(e) => {
            tracing::warn!("Failed to reload {}: {}", path.display(), e);
            return;
        }
    };

    let signal = match &content {
        WidgetContent::Rendered(_) => Msg::rendered(id),
        _ => Msg::content_changed(id),
    };
    let Some(widget) = runtime.model_mut().widget_mut(id) else {
        return;
    };
    widget.set_content(content);
    tracing::debug!("Reloaded {} (rev {})", path.display(), widget.revision);

    let model = runtime.model();
    let unsubscribed = model
        .toc
        .current
        .as_ref()
        .is_some_and(|t| t.widget_id == id && t.subscription.is_none());

    if unsubscribed {
        // No live signal for this kind of document: refresh by hand
        runtime.dispatch(Msg::Toc(TocMsg::Refresh));
    } else {
        runtime.dispatch(signal);
    }
}

fn settle(runtime: &mut Runtime) {
    if !runtime.run_until_idle(SETTLE_TIMEOUT) {
        tracing::warn!("Extraction did not finish within {:?}", SETTLE_TIMEOUT);
    }
    // The caller prints right after settling
    runtime.take_redraw();
}

fn print_outline(runtime: &Runtime, startup: &StartupConfig) {
    let model = runtime.model();
    if startup.html {
        println!("{}", view::render_html(&model.toc));
    } else {
        println!("{}", view::render_text(model));
    }
}
