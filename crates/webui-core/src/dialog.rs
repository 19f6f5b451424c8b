//! Modal dialog requests, answered by the platform.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DialogKind {
    /// File (or directory) open chooser.
    Open,
    /// File save chooser.
    Save,
    /// Message box with a single OK button.
    Alert,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AlertLevel {
    #[default]
    Plain,
    Info,
    Warning,
    Error,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct DialogFlags {
    /// `Open` picks a directory instead of a file.
    pub directory: bool,
    /// Icon for `Alert`.
    pub level: AlertLevel,
}

impl DialogFlags {
    pub fn directory() -> Self {
        Self {
            directory: true,
            ..Self::default()
        }
    }

    pub fn alert(level: AlertLevel) -> Self {
        Self {
            level,
            ..Self::default()
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DialogRequest {
    pub kind: DialogKind,
    pub flags: DialogFlags,
    pub title: String,
    /// Alert body text. Unused by file choosers.
    pub arg: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MessageButtons {
    #[default]
    Ok,
    OkCancel,
    YesNo,
    YesNoCancel,
}

impl MessageButtons {
    /// Responses this button set can produce, in display order.
    pub fn responses(self) -> &'static [MessageResponse] {
        match self {
            MessageButtons::Ok => &[MessageResponse::Ok],
            MessageButtons::OkCancel => &[MessageResponse::Ok, MessageResponse::Cancel],
            MessageButtons::YesNo => &[MessageResponse::Yes, MessageResponse::No],
            MessageButtons::YesNoCancel => &[
                MessageResponse::Yes,
                MessageResponse::No,
                MessageResponse::Cancel,
            ],
        }
    }

    /// What closing the box without pressing a button means.
    pub fn dismissed(self) -> MessageResponse {
        match self {
            MessageButtons::Ok => MessageResponse::Ok,
            MessageButtons::YesNo => MessageResponse::No,
            MessageButtons::OkCancel | MessageButtons::YesNoCancel => MessageResponse::Cancel,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MessageResponse {
    Ok,
    Cancel,
    Yes,
    No,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MessageBoxRequest {
    pub level: AlertLevel,
    pub buttons: MessageButtons,
    pub title: String,
    pub text: String,
}
