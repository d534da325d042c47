//! Tracing infrastructure for diagnostics
//!
//! Provides structured logging of panel state transitions, extraction
//! scheduling and contained generator failures.
//!
//! # Usage
//!
//! Configure via RUST_LOG environment variable:
//! - `RUST_LOG=debug` - all debug logs
//! - `RUST_LOG=panel=debug` - panel state diffs only
//! - `RUST_LOG=tocpanel::update=debug` - module-level filtering
//!
//! # Log Files
//!
//! Logs are written to `~/.config/tocpanel/logs/tocpanel.log` with daily rotation.
//! File logging uses debug level by default for more verbose troubleshooting.

use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Layer};

use crate::model::{TocPanelState, WidgetId};

/// Initialize tracing subscriber with console and file logging
///
/// Console output respects RUST_LOG env var (default `warn`).
/// File logging writes to `~/.config/tocpanel/logs/tocpanel.log` with daily rotation.
pub fn init() {
    let console_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));

    // Console layer - respects RUST_LOG; stderr keeps stdout for the outline
    let console_layer = fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(true)
        .with_line_number(true)
        .with_filter(console_filter);

    // File layer - always debug level for troubleshooting
    let file_layer = match crate::config_paths::ensure_logs_dir() {
        Ok(logs_dir) => {
            let file_appender = tracing_appender::rolling::daily(logs_dir, "tocpanel.log");
            Some(
                fmt::layer()
                    .with_writer(file_appender)
                    .with_ansi(false)
                    .with_target(true)
                    .with_line_number(true)
                    .with_filter(EnvFilter::new("debug")),
            )
        }
        Err(e) => {
            eprintln!("Warning: Could not initialize file logging: {}", e);
            None
        }
    };

    tracing_subscriber::registry()
        .with(console_layer)
        .with(file_layer)
        .init();
}

/// Lightweight snapshot of panel state for diffing
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PanelSnapshot {
    pub tracked: Option<WidgetId>,
    pub heading_count: usize,
    pub collapsed_count: usize,
    pub active_index: Option<usize>,
    pub selected_index: Option<usize>,
}

impl PanelSnapshot {
    pub fn from_panel(toc: &TocPanelState) -> Self {
        Self {
            tracked: toc.tracked_widget(),
            heading_count: toc.headings.len(),
            collapsed_count: toc.headings.iter().filter(|h| h.collapsed).count(),
            active_index: toc.active_index,
            selected_index: toc.selected_index,
        }
    }

    /// Generate a diff description between two snapshots
    pub fn diff(&self, other: &PanelSnapshot) -> Option<String> {
        let mut changes = Vec::new();

        if self.tracked != other.tracked {
            changes.push(format!(
                "tracked: {} → {}",
                describe(self.tracked),
                describe(other.tracked)
            ));
        }
        if self.heading_count != other.heading_count {
            changes.push(format!(
                "headings: {} → {}",
                self.heading_count, other.heading_count
            ));
        }
        if self.collapsed_count != other.collapsed_count {
            changes.push(format!(
                "collapsed: {} → {}",
                self.collapsed_count, other.collapsed_count
            ));
        }
        if self.active_index != other.active_index {
            changes.push(format!(
                "active: {:?} → {:?}",
                self.active_index, other.active_index
            ));
        }
        if self.selected_index != other.selected_index {
            changes.push(format!(
                "selected: {:?} → {:?}",
                self.selected_index, other.selected_index
            ));
        }

        if changes.is_empty() {
            None
        } else {
            Some(changes.join("; "))
        }
    }
}

fn describe(widget: Option<WidgetId>) -> String {
    match widget {
        Some(id) => id.to_string(),
        None => "idle".to_string(),
    }
}
