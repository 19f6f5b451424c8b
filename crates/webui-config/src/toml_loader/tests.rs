//! Tests for TOML config loading, creation, and path resolution.

use super::template::default_config_toml;
use super::*;
use crate::schema::WebUiSettings;
use std::path::Path;
use webui_common::{BorderMode, ConfigError};

#[test]
fn load_from_nonexistent_returns_file_not_found() {
    let result = load_from_path(Path::new("/tmp/nonexistent_webui_config.toml"));
    assert!(matches!(result, Err(ConfigError::FileNotFound(_))));
}

#[test]
fn load_valid_partial_toml() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("config.toml");
    std::fs::write(
        &path,
        r##"
[window]
title = "Counter"
width = 320
height = 240
border = "none"

[content]
url = "https://example.com"
"##,
    )
    .unwrap();

    let settings = load_from_path(&path).unwrap();
    assert_eq!(settings.window.title, "Counter");
    assert_eq!(settings.window.width, 320);
    assert_eq!(settings.window.border, BorderMode::None);
    assert_eq!(settings.content.url, "https://example.com");
    // Defaults preserved
    assert!(!settings.engine.debug);
    assert_eq!(settings.logging.level, "info");
}

#[test]
fn load_invalid_toml_returns_parse_error() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("config.toml");
    std::fs::write(&path, "this is not valid toml {{{").unwrap();

    let result = load_from_path(&path);
    assert!(matches!(result, Err(ConfigError::ParseError(_))));
}

#[test]
fn load_out_of_range_values_returns_validation_error() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("config.toml");
    std::fs::write(&path, "[window]\nheight = 0\n").unwrap();

    let result = load_from_path(&path);
    assert!(matches!(result, Err(ConfigError::ValidationError(_))));
}

#[test]
fn create_and_load_default_config() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("webui").join("config.toml");

    create_default_config(&path).unwrap();
    assert!(path.exists());

    let settings = load_from_path(&path).unwrap();
    assert_eq!(settings.window.title, "WebUI");
}

#[test]
fn default_config_toml_is_valid() {
    let settings: WebUiSettings = toml::from_str(default_config_toml()).unwrap();
    assert!(crate::validate(&settings).is_ok());
}

#[test]
fn default_config_path_is_reasonable() {
    if let Ok(path) = default_config_path() {
        let path_str = path.to_string_lossy();
        assert!(path_str.contains("webui"));
        assert!(path_str.ends_with("config.toml"));
    }
}
