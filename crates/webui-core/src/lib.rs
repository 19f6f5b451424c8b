//! Engine-agnostic webview host runtime.
//!
//! Sits between the caller and a native rendering backend:
//! - Readiness/teardown state machine (`lifecycle`)
//! - Synchronous script evaluation over an asynchronous engine (`eval`)
//! - One-way messages from the document to the host (`invoke`)
//! - Cross-thread work dispatch onto the loop thread (`dispatch`)
//! - Script-literal escaping for injected content (`encode`)
//! - Host objects exposed to the document (`bind`)
//! - Modal file choosers and message boxes (`dialog`)
//!
//! Backends plug in through the `RenderEngine` and `Platform` traits.

pub mod bind;
pub mod dialog;
pub mod dispatch;
pub mod encode;
pub mod engine;
pub mod eval;
pub mod events;
pub mod instance;
pub mod invoke;
pub mod lifecycle;

#[cfg(test)]
mod testing;

pub use bind::Binding;
pub use dialog::{
    AlertLevel, DialogFlags, DialogKind, DialogRequest, MessageBoxRequest, MessageButtons,
    MessageResponse,
};
pub use dispatch::{DispatchQueue, Dispatcher, Task};
pub use engine::{LoopWaker, Platform, RenderEngine};
pub use events::{EngineEvent, EvalId, EventSink};
pub use instance::{open, CloseResponse, WebUi};
pub use lifecycle::{EngineState, Lifecycle};

pub use webui_common::{BorderMode, Color, ConfigError, Content, Result, Size, WebUiError};
pub use webui_config::WebUiSettings;
