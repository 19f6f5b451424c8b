//! Window configuration types.

use serde::{Deserialize, Serialize};
use webui_common::BorderMode;

/// Window geometry and chrome.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct WindowSettings {
    pub title: String,
    pub width: u32,
    pub height: u32,
    /// Zero in both dimensions leaves resizing unconstrained.
    pub min_width: u32,
    pub min_height: u32,
    pub border: BorderMode,
    pub fullscreen: bool,
    /// `#rrggbb` or `#rrggbbaa`.
    pub background: Option<String>,
}

impl Default for WindowSettings {
    fn default() -> Self {
        Self {
            title: "WebUI".into(),
            width: 640,
            height: 480,
            min_width: 0,
            min_height: 0,
            border: BorderMode::Sizable,
            fullscreen: false,
            background: None,
        }
    }
}
