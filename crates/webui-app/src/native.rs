//! Native backend: a winit window with a wry webview inside, rfd for the
//! modal dialogs.
//!
//! All windows share the platform's one event loop, pumped by whichever
//! instance is currently waiting. Window events are only routed to the
//! instance doing the pumping; on Linux the webview needs X11.

use std::cell::RefCell;
use std::rc::Rc;
use std::sync::{Arc, Mutex, PoisonError};
use std::time::{Duration, Instant};

use tracing::{debug, info, warn};
use winit::application::ApplicationHandler;
use winit::dpi::LogicalSize;
use winit::event::WindowEvent;
use winit::event_loop::{ActiveEventLoop, EventLoop, EventLoopProxy};
use winit::platform::pump_events::{EventLoopExtPumpEvents, PumpStatus};
use winit::window::{Fullscreen, Window, WindowId};
use wry::{PageLoadEvent, WebView, WebViewBuilder};

use webui_common::{Color, Content, Result, Size, WebUiError};
use webui_config::WebUiSettings;
use webui_core::invoke::bridge_script;
use webui_core::{
    AlertLevel, DialogKind, DialogRequest, EngineEvent, EvalId, EventSink, LoopWaker,
    MessageBoxRequest, MessageButtons, MessageResponse, Platform, RenderEngine,
};

/// How long `create` waits for the toolkit to hand out a window.
const CREATE_TIMEOUT: Duration = Duration::from_secs(5);

#[derive(Debug, Clone, Copy)]
pub enum UserEvent {
    Wake,
}

struct ProxyWaker(Mutex<EventLoopProxy<UserEvent>>);

impl LoopWaker for ProxyWaker {
    fn wake(&self) {
        let proxy = self.0.lock().unwrap_or_else(PoisonError::into_inner);
        // Fails only once the loop is gone, when there is nothing to wake.
        let _ = proxy.send_event(UserEvent::Wake);
    }
}

/// Owns the process's event loop.
pub struct NativePlatform {
    event_loop: Rc<RefCell<EventLoop<UserEvent>>>,
}

impl NativePlatform {
    pub fn new() -> Result<Self> {
        let event_loop = EventLoop::<UserEvent>::with_user_event()
            .build()
            .map_err(|e| WebUiError::PlatformInit(format!("event loop: {e}")))?;
        Ok(Self {
            event_loop: Rc::new(RefCell::new(event_loop)),
        })
    }
}

impl Platform for NativePlatform {
    fn create(
        &mut self,
        settings: &WebUiSettings,
        sink: EventSink,
    ) -> Result<Box<dyn RenderEngine>> {
        let mut host = WindowHost::new(settings.clone(), sink);
        let proxy = {
            let mut event_loop = self
                .event_loop
                .try_borrow_mut()
                .map_err(|_| WebUiError::PlatformInit("event loop is busy".into()))?;
            let deadline = Instant::now() + CREATE_TIMEOUT;
            while !host.opened {
                let status =
                    event_loop.pump_app_events(Some(Duration::from_millis(10)), &mut host);
                if let PumpStatus::Exit(code) = status {
                    return Err(WebUiError::PlatformInit(format!(
                        "event loop exited with code {code}"
                    )));
                }
                if Instant::now() >= deadline {
                    return Err(WebUiError::PlatformInit(
                        "timed out waiting for the window".into(),
                    ));
                }
            }
            event_loop.create_proxy()
        };
        if let Some(error) = host.error.take() {
            return Err(WebUiError::PlatformInit(error));
        }
        Ok(Box::new(NativeEngine {
            event_loop: Rc::clone(&self.event_loop),
            host,
            waker: Arc::new(ProxyWaker(Mutex::new(proxy))),
        }))
    }
}

/// Receives the event loop's callbacks for one window.
struct WindowHost {
    settings: WebUiSettings,
    sink: EventSink,
    window: Option<Window>,
    webview: Option<WebView>,
    /// Set once the window was attempted, whether or not it worked.
    opened: bool,
    error: Option<String>,
    destroyed: bool,
}

impl WindowHost {
    fn new(settings: WebUiSettings, sink: EventSink) -> Self {
        Self {
            settings,
            sink,
            window: None,
            webview: None,
            opened: false,
            error: None,
            destroyed: false,
        }
    }

    fn ensure_window(&mut self, event_loop: &ActiveEventLoop) {
        if self.opened {
            return;
        }
        self.opened = true;
        match self.open(event_loop) {
            Ok((window, webview)) => {
                info!(title = %self.settings.window.title, "native window created");
                self.window = Some(window);
                self.webview = Some(webview);
            }
            Err(e) => self.error = Some(e),
        }
    }

    fn open(&self, event_loop: &ActiveEventLoop) -> std::result::Result<(Window, WebView), String> {
        let window = &self.settings.window;
        let size = self.settings.size();
        let mut attributes = Window::default_attributes()
            .with_title(window.title.clone())
            .with_inner_size(LogicalSize::new(size.width, size.height))
            .with_resizable(window.border.resizable())
            .with_decorations(window.border.decorated());
        let min = self.settings.min_size();
        if !min.is_unset() {
            attributes = attributes.with_min_inner_size(LogicalSize::new(min.width, min.height));
        }
        let window = event_loop
            .create_window(attributes)
            .map_err(|e| format!("window: {e}"))?;

        let ipc_sink = self.sink.clone();
        let load_sink = self.sink.clone();
        let webview = WebViewBuilder::new()
            .with_devtools(self.settings.engine.debug)
            .with_initialization_script(&bridge_script("window.ipc.postMessage"))
            .with_ipc_handler(move |request| {
                ipc_sink.push(EngineEvent::Message(request.body().to_string()));
            })
            .with_on_page_load_handler(move |event, url| {
                debug!(url = %url, "page load");
                load_sink.push(match event {
                    PageLoadEvent::Started => EngineEvent::LoadStarted,
                    PageLoadEvent::Finished => EngineEvent::LoadFinished,
                });
            })
            .build(&window)
            .map_err(|e| format!("webview: {e}"))?;
        Ok((window, webview))
    }

    fn mark_destroyed(&mut self) {
        if !self.destroyed {
            self.destroyed = true;
            self.sink.push(EngineEvent::Destroyed);
        }
    }
}

impl ApplicationHandler<UserEvent> for WindowHost {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        self.ensure_window(event_loop);
    }

    // The event loop resumes only once per process, so later windows are
    // opened from here.
    fn about_to_wait(&mut self, event_loop: &ActiveEventLoop) {
        self.ensure_window(event_loop);
    }

    fn user_event(&mut self, _event_loop: &ActiveEventLoop, _event: UserEvent) {
        // Wake events only interrupt the pump; the sink already holds the
        // matching marker.
    }

    fn window_event(&mut self, _event_loop: &ActiveEventLoop, id: WindowId, event: WindowEvent) {
        if self.window.as_ref().map(Window::id) != Some(id) {
            return;
        }
        match event {
            WindowEvent::CloseRequested => self.sink.push(EngineEvent::CloseRequested),
            WindowEvent::Destroyed => self.mark_destroyed(),
            _ => {}
        }
    }
}

pub struct NativeEngine {
    event_loop: Rc<RefCell<EventLoop<UserEvent>>>,
    host: WindowHost,
    waker: Arc<ProxyWaker>,
}

impl NativeEngine {
    fn window(&self) -> Result<&Window> {
        self.host
            .window
            .as_ref()
            .ok_or_else(|| WebUiError::InvalidState("native window is gone".into()))
    }

    fn webview(&self) -> Result<&WebView> {
        self.host
            .webview
            .as_ref()
            .ok_or_else(|| WebUiError::InvalidState("webview is gone".into()))
    }

    fn file_dialog(&self, title: &str) -> rfd::FileDialog {
        let dialog = rfd::FileDialog::new();
        let dialog = if title.is_empty() {
            dialog
        } else {
            dialog.set_title(title)
        };
        match &self.host.window {
            Some(window) => dialog.set_parent(window),
            None => dialog,
        }
    }

    fn message_dialog(&self, level: AlertLevel, title: &str, text: &str) -> rfd::MessageDialog {
        let dialog = rfd::MessageDialog::new()
            .set_level(message_level(level))
            .set_title(title)
            .set_description(text);
        match &self.host.window {
            Some(window) => dialog.set_parent(window),
            None => dialog,
        }
    }
}

fn message_level(level: AlertLevel) -> rfd::MessageLevel {
    match level {
        AlertLevel::Plain | AlertLevel::Info => rfd::MessageLevel::Info,
        AlertLevel::Warning => rfd::MessageLevel::Warning,
        AlertLevel::Error => rfd::MessageLevel::Error,
    }
}

fn rfd_buttons(buttons: MessageButtons) -> rfd::MessageButtons {
    match buttons {
        MessageButtons::Ok => rfd::MessageButtons::Ok,
        MessageButtons::OkCancel => rfd::MessageButtons::OkCancel,
        MessageButtons::YesNo => rfd::MessageButtons::YesNo,
        MessageButtons::YesNoCancel => rfd::MessageButtons::YesNoCancel,
    }
}

impl RenderEngine for NativeEngine {
    fn load(&mut self, content: &Content) -> Result<()> {
        let webview = self.webview()?;
        let loaded = match content {
            Content::Url(url) => webview.load_url(url),
            Content::Html(html) => webview.load_html(html),
        };
        loaded.map_err(|e| WebUiError::PlatformInit(format!("load {}: {e}", content.location())))
    }

    fn run_script(&mut self, id: EvalId, source: &str) -> Result<()> {
        let sink = self.host.sink.clone();
        self.webview()?
            .evaluate_script_with_callback(source, move |result| {
                sink.push(EngineEvent::ScriptCompleted {
                    id,
                    result: Ok(result),
                });
            })
            .map_err(|e| WebUiError::Script(e.to_string()))
    }

    fn pump(&mut self, timeout: Option<Duration>) {
        let Ok(mut event_loop) = self.event_loop.try_borrow_mut() else {
            warn!("event loop is already being pumped");
            return;
        };
        if let PumpStatus::Exit(code) = event_loop.pump_app_events(timeout, &mut self.host) {
            debug!(code, "event loop exited");
            self.host.mark_destroyed();
        }
    }

    fn waker(&self) -> Arc<dyn LoopWaker> {
        self.waker.clone()
    }

    fn set_title(&mut self, title: &str) -> Result<()> {
        self.window()?.set_title(title);
        Ok(())
    }

    fn set_fullscreen(&mut self, fullscreen: bool) -> Result<()> {
        self.window()?
            .set_fullscreen(fullscreen.then_some(Fullscreen::Borderless(None)));
        Ok(())
    }

    fn set_background(&mut self, color: Color) -> Result<()> {
        self.webview()?
            .set_background_color(color.as_tuple())
            .map_err(|e| WebUiError::InvalidState(format!("background color: {e}")))
    }

    fn set_min_size(&mut self, size: Size) -> Result<()> {
        let min = (!size.is_unset()).then(|| LogicalSize::new(size.width, size.height));
        self.window()?.set_min_inner_size(min);
        Ok(())
    }

    fn dialog(&mut self, request: &DialogRequest) -> Result<String> {
        let picked = match request.kind {
            DialogKind::Open if request.flags.directory => {
                self.file_dialog(&request.title).pick_folder()
            }
            DialogKind::Open => self.file_dialog(&request.title).pick_file(),
            DialogKind::Save => self.file_dialog(&request.title).save_file(),
            DialogKind::Alert => {
                self.message_dialog(request.flags.level, &request.title, &request.arg)
                    .set_buttons(rfd::MessageButtons::Ok)
                    .show();
                None
            }
        };
        Ok(picked.map(|p| p.display().to_string()).unwrap_or_default())
    }

    fn message_box(&mut self, request: &MessageBoxRequest) -> Result<MessageResponse> {
        let result = self
            .message_dialog(request.level, &request.title, &request.text)
            .set_buttons(rfd_buttons(request.buttons))
            .show();
        Ok(match result {
            rfd::MessageDialogResult::Ok => MessageResponse::Ok,
            rfd::MessageDialogResult::Cancel => MessageResponse::Cancel,
            rfd::MessageDialogResult::Yes => MessageResponse::Yes,
            rfd::MessageDialogResult::No => MessageResponse::No,
            rfd::MessageDialogResult::Custom(label) => {
                debug!(label = %label, "custom message box button");
                request.buttons.dismissed()
            }
        })
    }

    fn close(&mut self) {
        self.host.webview = None;
        if self.host.window.take().is_some() {
            debug!("native window closed");
        }
    }
}
