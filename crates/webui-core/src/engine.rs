//! Backend capability traits.
//!
//! A backend is two objects: a process-scoped `Platform` that knows how to
//! open windows, and one `RenderEngine` per window. The core never looks
//! inside either.

use std::sync::Arc;
use std::time::Duration;

use webui_common::{Color, Content, Result, Size};
use webui_config::WebUiSettings;

use crate::dialog::{DialogRequest, MessageBoxRequest, MessageResponse};
use crate::events::{EvalId, EventSink};

/// Interrupts a blocked `pump`. Callable from any thread.
pub trait LoopWaker: Send + Sync {
    fn wake(&self);
}

/// One embedded engine inside one native window.
///
/// Callbacks are reported by pushing into the `EventSink` handed to
/// `Platform::create`:
/// - load progress as `LoadStarted` / `LoadFinished`
/// - `run_script` completions as `ScriptCompleted` with the same id
/// - `external.invoke` calls as `Message`
/// - window close requests as `CloseRequested`, destruction as `Destroyed`
pub trait RenderEngine {
    /// Start navigating to `content`. The document must get an
    /// `external.invoke` capability (see `invoke::bridge_script`).
    fn load(&mut self, content: &Content) -> Result<()>;

    /// Run `source` asynchronously. The completion value is the script's
    /// result converted to a string.
    fn run_script(&mut self, id: EvalId, source: &str) -> Result<()>;

    /// Process one unit of the event loop. `None` waits for an event,
    /// `Some(Duration::ZERO)` returns at once, otherwise wait at most that
    /// long.
    fn pump(&mut self, timeout: Option<Duration>);

    fn waker(&self) -> Arc<dyn LoopWaker>;

    fn set_title(&mut self, title: &str) -> Result<()>;

    fn set_fullscreen(&mut self, fullscreen: bool) -> Result<()>;

    fn set_background(&mut self, color: Color) -> Result<()>;

    fn set_min_size(&mut self, size: Size) -> Result<()>;

    /// Modal file chooser or alert. Returns the chosen path, or an empty
    /// string when cancelled or for alerts.
    fn dialog(&mut self, request: &DialogRequest) -> Result<String>;

    fn message_box(&mut self, request: &MessageBoxRequest) -> Result<MessageResponse>;

    /// Release the engine and its window. Called once.
    fn close(&mut self);
}

/// Process-scoped toolkit state. Set up once by the outermost caller and
/// passed to every `WebUi::init`.
pub trait Platform {
    /// Open a window sized and decorated per `settings` and embed an engine
    /// in it. Nothing is loaded yet.
    fn create(&mut self, settings: &WebUiSettings, sink: EventSink)
        -> Result<Box<dyn RenderEngine>>;
}
