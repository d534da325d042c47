//! Table-of-contents configuration persistence
//!
//! Stores user preferences in `~/.config/tocpanel/config.yaml`

use std::path::Path;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::error::TocError;
use crate::generators::{DefaultSanitizer, GeneratorOptions};

/// Default quiescence window before re-extracting after an edit
pub const DEFAULT_DEBOUNCE_MS: u64 = 300;

/// Panel configuration that persists across sessions
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TocConfig {
    /// Number headings ("1.2") in markdown, rendered markdown and LaTeX views
    #[serde(default)]
    pub numbering: bool,
    /// Number headings in notebooks
    #[serde(default = "default_true")]
    pub notebook_numbering: bool,
    /// Allow collapsing individual headings
    #[serde(default = "default_true")]
    pub collapsible: bool,
    /// Debounce window for content-change signals, in milliseconds
    #[serde(default = "default_debounce_ms")]
    pub debounce_ms: u64,
}

fn default_true() -> bool {
    true
}

fn default_debounce_ms() -> u64 {
    DEFAULT_DEBOUNCE_MS
}

impl Default for TocConfig {
    fn default() -> Self {
        Self {
            numbering: false,
            notebook_numbering: default_true(),
            collapsible: default_true(),
            debounce_ms: default_debounce_ms(),
        }
    }
}

impl TocConfig {
    /// Load config from disk, or return defaults if not found
    pub fn load() -> Self {
        let Some(path) = crate::config_paths::config_file() else {
            tracing::debug!("No config directory available, using defaults");
            return Self::default();
        };
        Self::load_from(&path)
    }

    /// Load config from a specific file, falling back to defaults
    pub fn load_from(path: &Path) -> Self {
        if !path.exists() {
            tracing::debug!(
                "Config file not found at {}, using defaults",
                path.display()
            );
            return Self::default();
        }

        match std::fs::read_to_string(path) {
            Ok(content) => match Self::from_yaml(&content) {
                Ok(config) => {
                    tracing::info!("Loaded config from {}", path.display());
                    config
                }
                Err(e) => {
                    tracing::warn!("Failed to parse config at {}: {}", path.display(), e);
                    Self::default()
                }
            },
            Err(e) => {
                tracing::warn!("Failed to read config at {}: {}", path.display(), e);
                Self::default()
            }
        }
    }

    /// Parse a YAML document; missing keys take their defaults
    pub fn from_yaml(content: &str) -> crate::error::Result<Self> {
        serde_yaml::from_str(content).map_err(|e| TocError::Config(e.to_string()))
    }

    /// Save config to disk
    ///
    /// Creates the config directory if it doesn't exist.
    pub fn save(&self) -> Result<(), String> {
        let path = crate::config_paths::config_file()
            .ok_or_else(|| "No config directory available".to_string())?;
        self.save_to(&path)
    }

    pub fn save_to(&self, path: &Path) -> Result<(), String> {
        // Ensure parent directory exists
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)
                .map_err(|e| format!("Failed to create config directory: {}", e))?;
        }

        let content = serde_yaml::to_string(self)
            .map_err(|e| format!("Failed to serialize config: {}", e))?;

        std::fs::write(path, content)
            .map_err(|e| format!("Failed to write config to {}: {}", path.display(), e))?;

        tracing::info!("Saved config to {}", path.display());
        Ok(())
    }

    /// Options for the markdown, rendered-markdown and LaTeX generators
    pub fn generator_options(&self) -> GeneratorOptions {
        GeneratorOptions {
            numbering: self.numbering,
            collapsible: self.collapsible,
            sanitizer: Arc::new(DefaultSanitizer),
        }
    }

    /// Options for the notebook generator
    pub fn notebook_options(&self) -> GeneratorOptions {
        GeneratorOptions {
            numbering: self.notebook_numbering,
            ..self.generator_options()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_yaml_fills_defaults() {
        let config = TocConfig::from_yaml("numbering: true\n").unwrap();
        assert!(config.numbering);
        assert!(config.collapsible);
        assert!(config.notebook_numbering);
        assert_eq!(config.debounce_ms, DEFAULT_DEBOUNCE_MS);
    }

    #[test]
    fn test_from_yaml_rejects_bad_types() {
        let err = TocConfig::from_yaml("debounce_ms: soon\n").unwrap_err();
        assert!(matches!(err, TocError::Config(_)));
    }

    #[test]
    fn test_notebook_options_use_notebook_numbering() {
        let config = TocConfig {
            numbering: false,
            notebook_numbering: true,
            ..TocConfig::default()
        };
        assert!(!config.generator_options().numbering);
        assert!(config.notebook_options().numbering);
    }
}
