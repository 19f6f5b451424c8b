//! The webview instance.
//!
//! `WebUi` owns one engine and everything hanging off it: the lifecycle
//! state machine, the dispatch queue, the eval and invoke bridges, and
//! the host's handlers. It lives on the thread that created it; other
//! threads reach it only through `Dispatcher`.

mod ops;
mod pump;


use std::any::Any;
use std::sync::Arc;

use tracing::info;
use webui_common::{Result, WebUiError};
use webui_config::WebUiSettings;

use crate::bind::Binding;
use crate::dispatch::DispatchQueue;
use crate::engine::{LoopWaker, Platform, RenderEngine};
use crate::eval::EvalBridge;
use crate::events::{EngineEvent, EventSink};
use crate::invoke::InvokeBridge;
use crate::lifecycle::{EngineState, Lifecycle};

/// Answer of a close handler to a user's close request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CloseResponse {
    Allow,
    Deny,
}

pub type CloseHandler = Box<dyn FnMut(&mut WebUi) -> CloseResponse>;

/// One window with one embedded engine.
pub struct WebUi {
    pub(crate) settings: WebUiSettings,
    pub(crate) engine: Option<Box<dyn RenderEngine>>,
    pub(crate) sink: EventSink,
    pub(crate) lifecycle: Lifecycle,
    pub(crate) queue: Arc<DispatchQueue<WebUi>>,
    pub(crate) eval: EvalBridge,
    pub(crate) invoke: InvokeBridge,
    pub(crate) close_handler: Option<CloseHandler>,
    /// Set while the close handler runs.
    pub(crate) deciding_close: bool,
    pub(crate) bindings: Vec<Binding>,
    user_data: Option<Box<dyn Any>>,
}

/// Marks the sink before waking the engine, so the pump that returns
/// drains the dispatch queue.
struct SinkWaker {
    sink: EventSink,
    inner: Arc<dyn LoopWaker>,
}

impl LoopWaker for SinkWaker {
    fn wake(&self) {
        self.sink.push(EngineEvent::Wake);
        self.inner.wake();
    }
}

impl WebUi {
    /// Validate `settings`, open a window through `platform` and start
    /// loading the configured content.
    ///
    /// Returns before the document is ready; `eval` waits for it.
    pub fn init<P: Platform + ?Sized>(platform: &mut P, settings: WebUiSettings) -> Result<Self> {
        webui_config::validate(&settings)?;

        let sink = EventSink::new();
        let mut engine = platform
            .create(&settings, sink.clone())
            .map_err(|e| match e {
                WebUiError::PlatformInit(_) => e,
                other => WebUiError::PlatformInit(other.to_string()),
            })?;

        if let Err(e) = Self::prepare(engine.as_mut(), &settings) {
            engine.close();
            return Err(e);
        }

        let waker: Arc<dyn LoopWaker> = Arc::new(SinkWaker {
            sink: sink.clone(),
            inner: engine.waker(),
        });
        let mut lifecycle = Lifecycle::new();
        lifecycle.begin_load();

        info!(
            title = %settings.window.title,
            width = settings.window.width,
            height = settings.window.height,
            content = settings.content().location(),
            "webview initialized"
        );

        Ok(Self {
            eval: EvalBridge::new(settings.engine.eval_timeout()),
            settings,
            engine: Some(engine),
            sink,
            lifecycle,
            queue: Arc::new(DispatchQueue::new(waker)),
            invoke: InvokeBridge::default(),
            close_handler: None,
            deciding_close: false,
            bindings: Vec::new(),
            user_data: None,
        })
    }

    fn prepare(engine: &mut dyn RenderEngine, settings: &WebUiSettings) -> Result<()> {
        if let Some(color) = settings.background() {
            engine.set_background(color)?;
        }
        if settings.window.fullscreen {
            engine.set_fullscreen(true)?;
        }
        let content = settings.content();
        engine.load(&content).map_err(|e| {
            WebUiError::PlatformInit(format!("failed to load {}: {e}", content.location()))
        })
    }

    pub fn state(&self) -> EngineState {
        self.lifecycle.state()
    }

    /// Current settings, including changes made through the setters.
    pub fn settings(&self) -> &WebUiSettings {
        &self.settings
    }

    pub fn is_closed(&self) -> bool {
        self.lifecycle.is_closed()
    }

    /// Attach arbitrary host data, replacing any previous value.
    pub fn set_user_data<T: Any>(&mut self, data: T) {
        self.user_data = Some(Box::new(data));
    }

    pub fn user_data<T: Any>(&self) -> Option<&T> {
        self.user_data.as_ref()?.downcast_ref()
    }

    pub fn user_data_mut<T: Any>(&mut self) -> Option<&mut T> {
        self.user_data.as_mut()?.downcast_mut()
    }

    pub(crate) fn ensure_open(&self, op: &str) -> Result<()> {
        if self.lifecycle.is_closed() {
            return Err(WebUiError::InvalidState(format!("{op}: instance is closed")));
        }
        Ok(())
    }

    pub(crate) fn engine_mut(&mut self, op: &str) -> Result<&mut (dyn RenderEngine + 'static)> {
        self.ensure_open(op)?;
        self.engine
            .as_deref_mut()
            .ok_or_else(|| WebUiError::InvalidState(format!("{op}: engine released")))
    }
}

impl Drop for WebUi {
    fn drop(&mut self) {
        self.exit();
    }
}

/// Open a window with `settings` and run its loop until it closes.
pub fn open<P: Platform + ?Sized>(platform: &mut P, settings: WebUiSettings) -> Result<()> {
    let mut ui = WebUi::init(platform, settings)?;
    ui.run()
}
