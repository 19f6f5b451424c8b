//! Configuration schema types.
//!
//! All structs use `serde(default)` so partial configs work correctly.

mod content;
mod engine;
mod window;

pub use content::*;
pub use engine::*;
pub use window::*;

use serde::{Deserialize, Serialize};
use webui_common::{Color, Content, Size};

/// Root settings for one webview instance.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct WebUiSettings {
    pub window: WindowSettings,
    pub content: ContentSettings,
    pub engine: EngineSettings,
    pub logging: LoggingSettings,
}

impl WebUiSettings {
    /// Settings that open `url`.
    pub fn with_url(url: impl Into<String>) -> Self {
        let mut settings = Self::default();
        settings.content.url = url.into();
        settings
    }

    /// Settings that render an inline document.
    pub fn with_html(html: impl Into<String>) -> Self {
        let mut settings = Self::default();
        settings.content.html = html.into();
        settings
    }

    pub fn title(mut self, title: impl Into<String>) -> Self {
        self.window.title = title.into();
        self
    }

    pub fn size(&self) -> Size {
        Size::new(self.window.width, self.window.height)
    }

    pub fn min_size(&self) -> Size {
        Size::new(self.window.min_width, self.window.min_height)
    }

    pub fn content(&self) -> Content {
        self.content.resolve()
    }

    pub fn background(&self) -> Option<Color> {
        self.window.background.as_deref().and_then(Color::from_hex)
    }
}
