use serde::{Deserialize, Serialize};
use webui_common::Content;

/// Initial document. `url` and `html` are mutually exclusive; leaving both
/// empty loads the built-in placeholder page.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ContentSettings {
    pub url: String,
    pub html: String,
}

impl ContentSettings {
    pub fn resolve(&self) -> Content {
        if !self.html.is_empty() {
            Content::Html(self.html.clone())
        } else {
            Content::from_url(&self.url)
        }
    }
}
