//! Left-area dock the panel registers into
//!
//! Panels sort by rank, lower ranks first; equal ranks keep registration
//! order.

/// How a panel is presented in the shell's left area
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PanelRegistration {
    /// Unique panel id
    pub id: String,
    /// Tab caption
    pub caption: String,
    /// Sort key within the dock
    pub rank: u32,
    /// Key the session restorer uses to recreate the panel
    pub restore_key: String,
}

#[derive(Debug, Clone, Default)]
pub struct Dock {
    /// Panels in rank order
    pub panels: Vec<PanelRegistration>,

    /// Currently active panel index (None if dock has no panels)
    pub active_index: Option<usize>,
}

impl Dock {
    /// Get the active panel, if any
    pub fn active_panel(&self) -> Option<&PanelRegistration> {
        self.active_index.and_then(|i| self.panels.get(i))
    }

    /// Register a panel, keeping rank order
    ///
    /// Returns false if a panel with the same id is already docked.
    pub fn register_panel(&mut self, panel: PanelRegistration) -> bool {
        if self.panels.iter().any(|p| p.id == panel.id) {
            return false;
        }
        let active_id = self.active_panel().map(|p| p.id.clone());
        let at = self
            .panels
            .iter()
            .position(|p| p.rank > panel.rank)
            .unwrap_or(self.panels.len());
        self.panels.insert(at, panel);

        self.active_index = match active_id {
            Some(id) => self.panels.iter().position(|p| p.id == id),
            // First panel becomes active
            None => Some(0),
        };
        true
    }
}
