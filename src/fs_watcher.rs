//! File watching for opened documents
//!
//! Uses the `notify` crate with debouncing to detect edits to the files the
//! CLI opened, so their widgets can be reloaded and re-outlined.

use notify_debouncer_mini::{new_debouncer, DebouncedEventKind, Debouncer};
use std::collections::HashSet;
use std::path::{Path, PathBuf};
use std::sync::mpsc::{self, Receiver};
use std::time::Duration;

/// Watches a fixed set of files
///
/// Parent directories are watched non-recursively (editors often replace
/// files on save, which drops a watch on the file itself) and events are
/// filtered down to the watched paths.
pub struct FileWatcher {
    /// The debouncer handles watching and event coalescing
    _debouncer: Debouncer<notify::RecommendedWatcher>,
    /// Receiver for debounced events
    rx: Receiver<Result<Vec<notify_debouncer_mini::DebouncedEvent>, notify::Error>>,
    /// Canonical paths of the watched files
    files: HashSet<PathBuf>,
}

impl FileWatcher {
    /// Watch `paths`, coalescing bursts of writes within `delay`
    pub fn new(paths: &[PathBuf], delay: Duration) -> Result<Self, notify::Error> {
        let (tx, rx) = mpsc::channel();
        let mut debouncer = new_debouncer(delay, tx)?;

        let mut files = HashSet::new();
        let mut dirs = HashSet::new();
        for path in paths {
            let canonical = canonical(path);
            if let Some(parent) = canonical.parent() {
                dirs.insert(parent.to_path_buf());
            }
            files.insert(canonical);
        }

        for dir in &dirs {
            debouncer
                .watcher()
                .watch(dir, notify::RecursiveMode::NonRecursive)?;
        }

        tracing::info!(
            "Started file watcher for {} files in {} directories",
            files.len(),
            dirs.len()
        );

        Ok(Self {
            _debouncer: debouncer,
            rx,
            files,
        })
    }

    /// Whether `path` is one of the watched files
    pub fn is_watched(&self, path: &Path) -> bool {
        self.files.contains(&canonical(path))
    }

    /// Poll for changed files (non-blocking)
    ///
    /// Returns canonical paths, each at most once.
    pub fn poll_events(&self) -> Vec<PathBuf> {
        let mut changed = Vec::new();

        // Drain all pending events from the channel
        while let Ok(result) = self.rx.try_recv() {
            match result {
                Ok(debounced_events) => {
                    for event in debounced_events {
                        if event.kind == DebouncedEventKind::AnyContinuous {
                            // Continuous events during active changes - skip to avoid spam
                            continue;
                        }
                        let path = canonical(&event.path);
                        if self.files.contains(&path) && !changed.contains(&path) {
                            changed.push(path);
                        }
                    }
                }
                Err(e) => {
                    tracing::warn!("File watcher error: {:?}", e);
                }
            }
        }

        if !changed.is_empty() {
            tracing::debug!("File watcher detected {} changed files", changed.len());
        }

        changed
    }
}

/// Canonical form used to compare event paths with watched paths
pub fn canonical(path: &Path) -> PathBuf {
    std::fs::canonicalize(path).unwrap_or_else(|_| path.to_path_buf())
}
