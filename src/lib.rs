//! tocpanel - live table of contents for notebooks, markdown and LaTeX
//!
//! This crate provides the core types and logic for a table-of-contents
//! panel implementing the Elm Architecture pattern: content-specific
//! generators extract heading outlines, and a reactive panel follows the
//! host's active widget.

pub mod cli;
pub mod commands;
pub mod config;
pub mod config_paths;
pub mod error;
pub mod fs_watcher;
pub mod generators;
pub mod markdown;
pub mod messages;
pub mod model;
pub mod outline;
pub mod panel;
pub mod registry;
pub mod runtime;
pub mod tracing;
pub mod update;
pub mod view;

// Re-export commonly used types
pub use commands::Cmd;
pub use config::TocConfig;
pub use error::{Result, TocError};
pub use generators::{Generator, GeneratorOptions, SignalKind};
pub use messages::Msg;
pub use model::AppModel;
pub use outline::{Heading, HeadingTarget};
pub use registry::GeneratorRegistry;
pub use runtime::Runtime;
