//! Panel docking and session restoration
//!
//! The table-of-contents panel docks on the left at a fixed rank. Session
//! restoration only recreates an idle panel; the outline itself is rebuilt
//! when the shell reports its active widget again.

mod dock;

pub use dock::{Dock, PanelRegistration};

use crate::model::TocPanelState;

pub const TOC_PANEL_ID: &str = "table-of-contents";
pub const TOC_PANEL_CAPTION: &str = "Table of Contents";
pub const TOC_PANEL_RANK: u32 = 700;
pub const TOC_RESTORE_KEY: &str = "jupyterlab-toc";

/// Registration of the table-of-contents panel
pub fn toc_panel() -> PanelRegistration {
    PanelRegistration {
        id: TOC_PANEL_ID.to_string(),
        caption: TOC_PANEL_CAPTION.to_string(),
        rank: TOC_PANEL_RANK,
        restore_key: TOC_RESTORE_KEY.to_string(),
    }
}

/// Recreate a panel from its restore key
///
/// Returns an idle panel for the table-of-contents key, `None` for keys
/// this crate does not own.
pub fn restore_panel(restore_key: &str) -> Option<TocPanelState> {
    if restore_key != TOC_RESTORE_KEY {
        return None;
    }
    tracing::debug!("Restoring table of contents panel as idle");
    Some(TocPanelState::new())
}
