//! Error types for the table-of-contents core
//!
//! Only registry misuse is meant to reach callers. Per-document failures
//! are contained where the generator is called and logged there.

use thiserror::Error;

use crate::model::WidgetId;

#[derive(Debug, Error)]
pub enum TocError {
    /// No registered generator accepts the widget
    #[error("no table of contents generator supports widget {0}")]
    UnsupportedWidget(WidgetId),

    /// A generator failed to parse the document content
    #[error("{generator} generator failed: {message}")]
    Extraction {
        generator: String,
        message: String,
    },

    /// A generator with the same identity is already registered
    #[error("generator `{0}` is already registered")]
    DuplicateGenerator(String),

    /// The widget vanished while work for it was in flight
    #[error("widget {0} was disposed")]
    DisposedWidget(WidgetId),

    #[error("invalid notebook: {0}")]
    Notebook(#[from] serde_json::Error),

    #[error("configuration error: {0}")]
    Config(String),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl TocError {
    pub fn extraction(generator: &str, message: impl Into<String>) -> Self {
        TocError::Extraction {
            generator: generator.to_string(),
            message: message.into(),
        }
    }
}

pub type Result<T, E = TocError> = std::result::Result<T, E>;
