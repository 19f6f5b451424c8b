use std::path::PathBuf;
use std::time::Duration;

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("config file not found: {0}")]
    FileNotFound(PathBuf),

    #[error("config parse error: {0}")]
    ParseError(String),

    #[error("config validation error: {0}")]
    ValidationError(String),
}

/// Every failure a webview instance reports to its caller.
///
/// Backends never surface their own error codes; they are translated into
/// one of these kinds where the engine hands control back to the core.
#[derive(Debug, thiserror::Error)]
pub enum WebUiError {
    /// The toolkit or engine could not start. Returned only from `init`.
    #[error("platform init error: {0}")]
    PlatformInit(String),

    /// Operation called after the instance was closed, or while it is
    /// shutting down.
    #[error("invalid state: {0}")]
    InvalidState(String),

    /// The engine reported a script exception. Carries its diagnostic text.
    #[error("script error: {0}")]
    Script(String),

    #[error("script evaluation timed out after {0:?}")]
    Timeout(Duration),

    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl WebUiError {
    pub fn is_recoverable(&self) -> bool {
        matches!(
            self,
            WebUiError::InvalidState(_) | WebUiError::Script(_) | WebUiError::Timeout(_)
        )
    }
}
