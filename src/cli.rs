//! Command-line argument parsing for the table-of-contents viewer
//!
//! Supports:
//! - Opening notebooks, markdown and LaTeX files as widgets
//! - Numbering and rendered-markdown toggles
//! - Printing every file's outline, as text or HTML
//! - Watch mode that re-prints the outline as files change

use clap::Parser;
use std::path::PathBuf;

use crate::config::TocConfig;

/// Print a live table of contents for documents
#[derive(Parser, Debug)]
#[command(
    name = "tocpanel",
    version,
    about = "Print a live table of contents for notebooks, markdown and LaTeX files"
)]
pub struct CliArgs {
    /// Files to open; the first one becomes the active widget
    #[arg(value_name = "PATHS")]
    pub paths: Vec<PathBuf>,

    /// Number headings ("1.2 Setup")
    #[arg(short = 'n', long)]
    pub numbering: bool,

    /// Open markdown files as rendered views instead of editors
    #[arg(short = 'r', long)]
    pub rendered: bool,

    /// Activate every file in turn and print each outline
    #[arg(short = 'a', long)]
    pub all: bool,

    /// Print the outline as nested HTML lists
    #[arg(long)]
    pub html: bool,

    /// Keep running and re-print the outline when files change
    #[arg(short = 'w', long)]
    pub watch: bool,

    /// Debounce window for change signals, in milliseconds
    #[arg(long, value_name = "MS")]
    pub debounce_ms: Option<u64>,
}

/// Configuration derived from CLI arguments
#[derive(Debug, Clone)]
pub struct StartupConfig {
    pub paths: Vec<PathBuf>,
    pub rendered: bool,
    pub all: bool,
    pub html: bool,
    pub watch: bool,
    /// Command-line numbering switch (only ever turns numbering on)
    pub numbering: bool,
    pub debounce_ms: Option<u64>,
}

impl CliArgs {
    /// Convert parsed CLI args into startup configuration
    pub fn into_config(self) -> Result<StartupConfig, String> {
        if self.paths.is_empty() {
            return Err("No files given".to_string());
        }
        if let Some(dir) = self.paths.iter().find(|p| p.is_dir()) {
            return Err(format!("{} is a directory", dir.display()));
        }

        Ok(StartupConfig {
            paths: self.paths,
            rendered: self.rendered,
            all: self.all,
            html: self.html,
            watch: self.watch,
            numbering: self.numbering,
            debounce_ms: self.debounce_ms,
        })
    }
}

impl StartupConfig {
    /// Layer command-line overrides on top of the persisted config
    pub fn apply_to(&self, config: &mut TocConfig) {
        if self.numbering {
            config.numbering = true;
            config.notebook_numbering = true;
        }
        if let Some(ms) = self.debounce_ms {
            config.debounce_ms = ms;
        }
    }
}
