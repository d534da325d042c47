//! Configuration system tests
//!
//! Tests for config paths and panel config loading and saving.

use tocpanel::config::{TocConfig, DEFAULT_DEBOUNCE_MS};
use tocpanel::config_paths;
use tocpanel::TocError;

// ========================================================================
// Config Paths Tests
// ========================================================================

#[test]
fn test_config_dir_returns_some() {
    assert!(config_paths::config_dir().is_some());
}

#[test]
fn test_config_dir_contains_app_name() {
    let dir = config_paths::config_dir().unwrap();
    assert!(dir.to_string_lossy().contains("tocpanel"));
}

#[test]
fn test_config_file_ends_with_yaml() {
    let path = config_paths::config_file().unwrap();
    assert!(path.to_string_lossy().ends_with("config.yaml"));
}

#[test]
fn test_logs_dir_is_inside_config_dir() {
    let dir = config_paths::config_dir().unwrap();
    let logs = config_paths::logs_dir().unwrap();
    assert!(logs.starts_with(&dir));
}

// ========================================================================
// TocConfig Tests
// ========================================================================

#[test]
fn test_defaults() {
    let config = TocConfig::default();
    assert!(!config.numbering);
    assert!(config.notebook_numbering);
    assert!(config.collapsible);
    assert_eq!(config.debounce_ms, DEFAULT_DEBOUNCE_MS);
}

#[test]
fn test_partial_yaml_fills_defaults() {
    let config = TocConfig::from_yaml("numbering: true\n").unwrap();
    assert!(config.numbering);
    assert!(config.notebook_numbering);
    assert_eq!(config.debounce_ms, DEFAULT_DEBOUNCE_MS);
}

#[test]
fn test_invalid_yaml_is_config_error() {
    let err = TocConfig::from_yaml("debounce_ms: soon\n").unwrap_err();
    assert!(matches!(err, TocError::Config(_)));
}

#[test]
fn test_save_and_load_roundtrip() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("nested").join("config.yaml");
    let config = TocConfig {
        numbering: true,
        collapsible: false,
        debounce_ms: 50,
        ..TocConfig::default()
    };

    config.save_to(&path).unwrap();
    assert_eq!(TocConfig::load_from(&path), config);
}

#[test]
fn test_missing_file_loads_defaults() {
    let dir = tempfile::tempdir().unwrap();
    let config = TocConfig::load_from(&dir.path().join("absent.yaml"));
    assert_eq!(config, TocConfig::default());
}

#[test]
fn test_unparseable_file_loads_defaults() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("config.yaml");
    std::fs::write(&path, "numbering: [not, a, bool]\n").unwrap();
    assert_eq!(TocConfig::load_from(&path), TocConfig::default());
}
