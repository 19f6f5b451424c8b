use serde::{Deserialize, Serialize};

/// Window chrome and resizability policy. Fixed for an instance's lifetime.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum BorderMode {
    /// Decorated and resizable.
    #[default]
    Sizable,
    /// Decorated, fixed size.
    Dialog,
    /// Undecorated, fixed size.
    None,
}

impl BorderMode {
    pub fn resizable(self) -> bool {
        matches!(self, BorderMode::Sizable)
    }

    pub fn decorated(self) -> bool {
        !matches!(self, BorderMode::None)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct Size {
    pub width: u32,
    pub height: u32,
}

impl Size {
    pub const fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    /// A zero minimum size means "no constraint".
    pub fn is_unset(&self) -> bool {
        self.width == 0 && self.height == 0
    }

    pub fn fits_within(&self, other: Size) -> bool {
        self.width <= other.width && self.height <= other.height
    }
}

/// Blank HTML5 document with an empty `#app` mount point, loaded when no
/// content is configured.
pub const PLACEHOLDER_PAGE: &str = "<!DOCTYPE html>\n<html lang=\"en\">\n<head><meta charset=\"utf-8\"><meta http-equiv=\"X-UA-Compatible\" content=\"IE=edge\"></head>\n<body><div id=\"app\"></div><script type=\"text/javascript\"></script></body>\n</html>";

/// What the engine should navigate to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Content {
    Url(String),
    Html(String),
}

impl Content {
    pub fn placeholder() -> Self {
        Content::Html(PLACEHOLDER_PAGE.to_string())
    }

    pub fn from_url(url: &str) -> Self {
        if url.trim().is_empty() {
            Self::placeholder()
        } else {
            Content::Url(url.to_string())
        }
    }

    /// Best-effort location string for logging.
    pub fn location(&self) -> &str {
        match self {
            Content::Url(url) => url,
            Content::Html(_) => "about:blank",
        }
    }
}
