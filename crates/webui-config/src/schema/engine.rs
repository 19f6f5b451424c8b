use std::time::Duration;

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineSettings {
    /// Enable developer tools and console forwarding.
    pub debug: bool,
    /// Upper bound on one script evaluation. 0 waits forever.
    pub eval_timeout_ms: u64,
}

impl EngineSettings {
    pub fn eval_timeout(&self) -> Option<Duration> {
        (self.eval_timeout_ms > 0).then(|| Duration::from_millis(self.eval_timeout_ms))
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingSettings {
    /// trace, debug, info, warn or error.
    pub level: String,
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self {
            level: "info".into(),
        }
    }
}
