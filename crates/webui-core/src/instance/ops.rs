//! Host-facing operations on a running instance.

use std::sync::Arc;
use std::time::Duration;

use tracing::{debug, info, warn};
use webui_common::{Color, ConfigError, Result, Size};

use super::{CloseResponse, WebUi};
use crate::dialog::{
    AlertLevel, DialogFlags, DialogKind, DialogRequest, MessageBoxRequest, MessageButtons,
    MessageResponse,
};
use crate::dispatch::Dispatcher;
use crate::encode::css_injection_script;

impl WebUi {
    /// Pump one unit of the loop. Returns true once the instance should
    /// stop being driven.
    pub fn loop_once(&mut self, blocking: bool) -> Result<bool> {
        self.ensure_open("loop_once")?;
        if !self.lifecycle.should_exit() {
            self.pump_once(if blocking { None } else { Some(Duration::ZERO) });
        }
        Ok(self.lifecycle.should_exit())
    }

    /// Drive the loop until a close is accepted, then release everything.
    pub fn run(&mut self) -> Result<()> {
        while !self.loop_once(true)? {}
        self.exit();
        Ok(())
    }

    /// Stop the loop without consulting the close handler.
    pub fn terminate(&mut self) -> Result<()> {
        self.ensure_open("terminate")?;
        if self.lifecycle.terminate() {
            info!("termination requested");
        }
        Ok(())
    }

    /// Release the window and engine. Safe to call more than once.
    ///
    /// Work still sitting in the dispatch queue is dropped without running.
    pub fn exit(&mut self) {
        if self.lifecycle.is_closed() {
            return;
        }
        if self.lifecycle.terminate() {
            warn!("exit while the loop was still running, forcing termination");
        }

        let dropped = self.queue.close();
        if dropped > 0 {
            warn!(dropped, "discarding undelivered dispatch work");
        }
        if let Some(mut engine) = self.engine.take() {
            engine.close();
        }
        self.eval.reset();
        self.lifecycle.close();

        let pending = self.sink.drain();
        if !pending.is_empty() {
            debug!(count = pending.len(), "dropping engine events at exit");
        }
        let (delivered, discarded) = self.invoke.counts();
        info!(delivered, discarded, "webview closed");
    }

    pub fn set_title(&mut self, title: &str) -> Result<()> {
        self.engine_mut("set_title")?.set_title(title)?;
        self.settings.window.title = title.to_string();
        Ok(())
    }

    pub fn set_fullscreen(&mut self, fullscreen: bool) -> Result<()> {
        self.engine_mut("set_fullscreen")?.set_fullscreen(fullscreen)?;
        self.settings.window.fullscreen = fullscreen;
        Ok(())
    }

    /// Window background, visible before the document paints.
    pub fn set_color(&mut self, color: Color) -> Result<()> {
        self.engine_mut("set_color")?.set_background(color)?;
        self.settings.window.background = Some(color.to_hex());
        Ok(())
    }

    /// Constrain future resizes. Must fit within the configured window size.
    pub fn set_min_size(&mut self, size: Size) -> Result<()> {
        self.ensure_open("set_min_size")?;
        let window = self.settings.size();
        if !size.fits_within(window) {
            return Err(ConfigError::ValidationError(format!(
                "minimum size {}x{} exceeds window size {}x{}",
                size.width, size.height, window.width, window.height
            ))
            .into());
        }
        self.engine_mut("set_min_size")?.set_min_size(size)?;
        self.settings.window.min_width = size.width;
        self.settings.window.min_height = size.height;
        Ok(())
    }

    /// Append a `<style>` element holding `css` to the document head.
    pub fn inject_css(&mut self, css: &str) -> Result<()> {
        self.eval(&css_injection_script(css))?;
        debug!(len = css.len(), "stylesheet injected");
        Ok(())
    }

    /// Queue `work` to run on the loop thread during a later pump.
    pub fn dispatch(&self, work: impl FnOnce(&mut WebUi) + Send + 'static) -> Result<()> {
        self.queue.post(Box::new(work))
    }

    /// Cloneable, `Send` handle for posting work from other threads.
    pub fn dispatcher(&self) -> Dispatcher<WebUi> {
        Dispatcher::new(Arc::clone(&self.queue))
    }

    /// Receive `external.invoke(text)` calls that no binding claims.
    pub fn set_invoke_handler(
        &mut self,
        handler: impl FnMut(&mut WebUi, &str) + 'static,
    ) -> Result<()> {
        self.ensure_open("set_invoke_handler")?;
        self.invoke.set_handler(Some(Box::new(handler)));
        Ok(())
    }

    pub fn clear_invoke_handler(&mut self) -> Result<()> {
        self.ensure_open("clear_invoke_handler")?;
        self.invoke.set_handler(None);
        Ok(())
    }

    /// Consulted when the user asks to close the window. Without one,
    /// every request is allowed.
    pub fn set_close_handler(
        &mut self,
        handler: impl FnMut(&mut WebUi) -> CloseResponse + 'static,
    ) -> Result<()> {
        self.ensure_open("set_close_handler")?;
        self.close_handler = Some(Box::new(handler));
        Ok(())
    }

    /// Show a file chooser or alert. Returns the chosen path, or an empty
    /// string on cancel and for alerts.
    pub fn dialog(
        &mut self,
        kind: DialogKind,
        flags: DialogFlags,
        title: &str,
        arg: &str,
    ) -> Result<String> {
        let request = DialogRequest {
            kind,
            flags,
            title: title.to_string(),
            arg: arg.to_string(),
        };
        debug!(?kind, title, "opening dialog");
        self.engine_mut("dialog")?.dialog(&request)
    }

    /// Modal message box. An answer outside `buttons` counts as a dismissal.
    pub fn message_box(
        &mut self,
        level: AlertLevel,
        buttons: MessageButtons,
        title: &str,
        text: &str,
    ) -> Result<MessageResponse> {
        let request = MessageBoxRequest {
            level,
            buttons,
            title: title.to_string(),
            text: text.to_string(),
        };
        let response = self.engine_mut("message_box")?.message_box(&request)?;
        if buttons.responses().contains(&response) {
            Ok(response)
        } else {
            warn!(?response, ?buttons, "message box answer outside its button set");
            Ok(buttons.dismissed())
        }
    }
}
