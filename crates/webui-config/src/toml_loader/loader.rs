//! Core TOML config loading: read from path or platform default.

use crate::schema::WebUiSettings;
use crate::validation;
use std::path::Path;
use tracing::info;
use webui_common::ConfigError;

use super::paths::{create_default_config, default_config_path};

/// Load settings from a specific TOML file path.
///
/// Missing fields take their serde defaults. The result is validated and
/// a validation failure is returned as an error.
pub fn load_from_path(path: &Path) -> Result<WebUiSettings, ConfigError> {
    if !path.exists() {
        return Err(ConfigError::FileNotFound(path.to_path_buf()));
    }

    let content = std::fs::read_to_string(path)
        .map_err(|e| ConfigError::ParseError(format!("failed to read {}: {e}", path.display())))?;

    let settings: WebUiSettings = toml::from_str(&content)
        .map_err(|e| ConfigError::ParseError(format!("failed to parse TOML: {e}")))?;

    validation::validate(&settings)?;

    info!("loaded settings from {}", path.display());
    Ok(settings)
}

/// Load settings from the platform-specific default path.
///
/// On macOS: `~/Library/Application Support/webui/config.toml`
/// On Linux: `~/.config/webui/config.toml`
///
/// If the file does not exist, creates a commented default file and returns
/// defaults.
pub fn load_default() -> Result<WebUiSettings, ConfigError> {
    let path = default_config_path()?;

    if !path.exists() {
        info!("no config found at {}, creating default", path.display());
        create_default_config(&path)?;
        return Ok(WebUiSettings::default());
    }

    load_from_path(&path)
}
