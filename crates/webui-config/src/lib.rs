//! WebUI settings.
//!
//! TOML-based configuration for a webview instance: window geometry and
//! chrome, initial content, engine options, and logging. Every section
//! uses serde defaults so partial files work out of the box.
//!
//! ```rust,no_run
//! let settings = webui_config::load_from_str("[window]\ntitle = \"Demo\"").unwrap();
//! assert_eq!(settings.window.title, "Demo");
//! ```

pub mod schema;
pub mod toml_loader;
pub mod validation;

pub use schema::{ContentSettings, EngineSettings, LoggingSettings, WebUiSettings, WindowSettings};
pub use toml_loader::{create_default_config, default_config_path, load_default, load_from_path};
pub use validation::validate;

use webui_common::ConfigError;

/// Parse settings from TOML text and validate them.
pub fn load_from_str(text: &str) -> Result<WebUiSettings, ConfigError> {
    let settings: WebUiSettings = toml::from_str(text)
        .map_err(|e| ConfigError::ParseError(format!("failed to parse TOML: {e}")))?;
    validation::validate(&settings)?;
    Ok(settings)
}
