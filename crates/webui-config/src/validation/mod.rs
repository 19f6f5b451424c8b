//! Settings validation.
//!
//! Each section has its own check; this orchestrator runs them all and
//! collects the errors into a single `ConfigError`.

mod content;
mod window;


use crate::schema::WebUiSettings;
use webui_common::ConfigError;

const LOG_LEVELS: &[&str] = &["trace", "debug", "info", "warn", "error"];

/// Run all validations on a settings value, collecting all errors.
pub fn validate(settings: &WebUiSettings) -> Result<(), ConfigError> {
    let mut errors: Vec<String> = Vec::new();

    window::validate_window(&mut errors, settings);
    content::validate_content(&mut errors, settings);

    let level = settings.logging.level.to_ascii_lowercase();
    if !LOG_LEVELS.contains(&level.as_str()) {
        errors.push(format!(
            "logging.level = {:?} is not one of {}",
            settings.logging.level,
            LOG_LEVELS.join(", ")
        ));
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(ConfigError::ValidationError(errors.join("; ")))
    }
}
