//! Command types for the Elm-style architecture
//!
//! Commands represent side effects that should be performed after an update.

use std::fmt;
use std::panic::{catch_unwind, AssertUnwindSafe};
use std::sync::Arc;

use crate::generators::Generator;
use crate::model::{ExtractTicket, WidgetContent, WidgetId};
use crate::outline::Heading;

/// Commands returned by update functions
#[derive(Debug, Default)]
pub enum Cmd {
    /// No command - do nothing
    #[default]
    None,
    /// The panel view changed and should be re-rendered
    Redraw,
    /// Execute multiple commands
    Batch(Vec<Cmd>),

    // === Extraction Commands ===
    /// Start debounce timer for extraction
    /// After delay_ms, sends Msg::Toc(ExtractReady)
    DebouncedExtract {
        widget_id: WidgetId,
        revision: u64,
        sequence: u64,
        delay_ms: u64,
    },
    /// Run a generator in a background worker
    /// Sends Msg::Toc(ExtractCompleted) when done
    RunExtraction { ticket: ExtractTicket, job: ExtractJob },
}

impl Cmd {
    /// Create a batch of commands
    pub fn batch(cmds: Vec<Cmd>) -> Self {
        Cmd::Batch(cmds)
    }

    /// Check if this command requires a redraw
    pub fn needs_redraw(&self) -> bool {
        match self {
            Cmd::None => false,
            Cmd::Redraw => true,
            Cmd::Batch(cmds) => cmds.iter().any(|c| c.needs_redraw()),
            // ExtractCompleted triggers the redraw
            Cmd::DebouncedExtract { .. } => false,
            Cmd::RunExtraction { .. } => false,
        }
    }
}

/// One generator call over an immutable content snapshot
pub struct ExtractJob {
    pub generator: Arc<dyn Generator>,
    pub content: WidgetContent,
}

impl fmt::Debug for ExtractJob {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ExtractJob")
            .field("generator", &self.generator.name())
            .field("content", &self.content.kind_name())
            .finish()
    }
}

impl ExtractJob {
    /// Run the generator, containing any failure
    ///
    /// Errors and panics become zero headings plus a message; they never
    /// escape this call.
    pub fn run(&self) -> (Vec<Heading>, Option<String>) {
        let name = self.generator.name();
        let options = self.generator.options();
        let outcome = catch_unwind(AssertUnwindSafe(|| {
            self.generator.generate(&self.content, options)
        }));

        match outcome {
            Ok(Ok(headings)) => (headings, None),
            Ok(Err(err)) => {
                tracing::warn!("Generator '{}' failed: {}", name, err);
                (Vec::new(), Some(err.to_string()))
            }
            Err(panic) => {
                let message = panic
                    .downcast_ref::<&str>()
                    .map(|s| s.to_string())
                    .or_else(|| panic.downcast_ref::<String>().cloned())
                    .unwrap_or_else(|| "generator panicked".to_string());
                tracing::warn!("Generator '{}' panicked: {}", name, message);
                (Vec::new(), Some(message))
            }
        }
    }
}
