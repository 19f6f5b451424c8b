//! `RenderEngine` over an embedded script interpreter.

use std::sync::Arc;
use std::time::Duration;

use boa_engine::{Context, Source};
use tracing::{debug, info, trace, warn};
use webui_common::{Color, Content, Result, Size, WebUiError};
use webui_core::invoke::bridge_script;
use webui_core::{
    DialogKind, DialogRequest, EngineEvent, EvalId, EventSink, LoopWaker, MessageBoxRequest,
    MessageResponse, RenderEngine,
};

use crate::controller::{lock, Job, Shared};
use crate::document::{decode_data_url, Document};
use crate::dom::{drain_console_script, drain_outbox_script, DOM_SHIM, MOUNT, OUTBOX};

/// One headless "window". Each load gets a fresh script context; work is
/// processed one job per pump.
pub struct HeadlessEngine {
    shared: Arc<Shared>,
    sink: EventSink,
    context: Option<Context>,
    /// Forward `console.*` at info level instead of trace.
    console: bool,
}

impl HeadlessEngine {
    pub(crate) fn new(shared: Arc<Shared>, sink: EventSink, console: bool) -> Self {
        Self {
            shared,
            sink,
            context: None,
            console,
        }
    }

    fn run_job(&mut self, job: Job) {
        match job {
            Job::Load(content) => self.load_document(&content),
            Job::RunScript(id, source) => {
                let result = self.run_in_document(&source);
                self.flush();
                self.sink.push(EngineEvent::ScriptCompleted { id, result });
            }
            Job::RequestClose => self.sink.push(EngineEvent::CloseRequested),
            Job::Destroy => {
                self.teardown();
                self.sink.push(EngineEvent::Destroyed);
            }
        }
    }

    fn load_document(&mut self, content: &Content) {
        self.sink.push(EngineEvent::LoadStarted);
        let html = match content {
            Content::Html(html) => html.clone(),
            Content::Url(url) => decode_data_url(url).unwrap_or_else(|| {
                debug!(%url, "no network access, loading an empty document");
                String::new()
            }),
        };

        let document = Document::parse(&html);
        let tree = serde_json::json!({ "head": document.head, "body": document.body });

        let mut context = Context::default();
        let mut setup = vec![
            DOM_SHIM.to_string(),
            bridge_script(&format!("{OUTBOX}.push")),
            format!("{MOUNT}({tree});"),
        ];
        if let Some(title) = &document.title {
            let literal = serde_json::to_string(title).unwrap_or_else(|_| "\"\"".into());
            setup.push(format!("document.title={literal};"));
        }
        for js in &setup {
            if let Err(e) = context.eval(Source::from_bytes(js)) {
                warn!(error = %e, "failed to prepare document environment");
            }
        }
        self.context = Some(context);

        trace!(count = document.scripts.len(), "running inline scripts");
        for script in &document.scripts {
            if let Err(e) = self.run_in_document(script) {
                warn!(error = %e, "inline script failed");
            }
            self.flush();
        }

        {
            let mut window = lock(&self.shared.window);
            window.location = content.location().to_string();
            window.loads += 1;
        }
        debug!(location = content.location(), "document loaded");
        self.sink.push(EngineEvent::LoadFinished);
    }

    /// Evaluate `source` and stringify its completion value.
    fn run_in_document(&mut self, source: &str) -> std::result::Result<String, String> {
        let Some(context) = self.context.as_mut() else {
            return Err("no document loaded".into());
        };
        let value = context
            .eval(Source::from_bytes(source))
            .map_err(|e| e.to_string())?;
        value
            .to_string(context)
            .map(|s| s.to_std_string_escaped())
            .map_err(|e| e.to_string())
    }

    /// Deliver what the last script turn queued: `external.invoke` calls
    /// as messages, console output as log lines.
    fn flush(&mut self) {
        if self.context.is_none() {
            return;
        }
        let messages = self
            .run_in_document(&drain_outbox_script())
            .ok()
            .and_then(|json| serde_json::from_str::<Vec<String>>(&json).ok())
            .unwrap_or_default();
        for text in messages {
            trace!(len = text.len(), "external.invoke");
            self.sink.push(EngineEvent::Message(text));
        }

        let lines = self
            .run_in_document(&drain_console_script())
            .ok()
            .and_then(|json| serde_json::from_str::<Vec<(String, String)>>(&json).ok())
            .unwrap_or_default();
        for (level, text) in lines {
            if self.console {
                info!(target: "webui::console", %level, "{text}");
            } else {
                trace!(target: "webui::console", %level, "{text}");
            }
        }
    }

    fn teardown(&mut self) {
        self.context = None;
        lock(&self.shared.jobs).clear();
        lock(&self.shared.window).closed = true;
    }

    fn ensure_alive(&self, op: &str) -> Result<()> {
        if lock(&self.shared.window).closed {
            return Err(WebUiError::InvalidState(format!("{op}: window destroyed")));
        }
        Ok(())
    }
}

impl RenderEngine for HeadlessEngine {
    fn load(&mut self, content: &Content) -> Result<()> {
        self.ensure_alive("load")?;
        self.shared.push(Job::Load(content.clone()));
        Ok(())
    }

    fn run_script(&mut self, id: EvalId, source: &str) -> Result<()> {
        self.ensure_alive("run_script")?;
        self.shared.push(Job::RunScript(id, source.to_string()));
        Ok(())
    }

    fn pump(&mut self, timeout: Option<Duration>) {
        if let Some(job) = self.shared.next_job() {
            self.run_job(job);
            return;
        }
        if timeout != Some(Duration::ZERO) {
            self.shared.signal.wait(timeout);
        }
        if let Some(job) = self.shared.next_job() {
            self.run_job(job);
        }
    }

    fn waker(&self) -> Arc<dyn LoopWaker> {
        self.shared.signal.clone()
    }

    fn set_title(&mut self, title: &str) -> Result<()> {
        lock(&self.shared.window).title = title.to_string();
        Ok(())
    }

    fn set_fullscreen(&mut self, fullscreen: bool) -> Result<()> {
        lock(&self.shared.window).fullscreen = fullscreen;
        Ok(())
    }

    fn set_background(&mut self, color: Color) -> Result<()> {
        lock(&self.shared.window).background = Some(color);
        Ok(())
    }

    fn set_min_size(&mut self, size: Size) -> Result<()> {
        lock(&self.shared.window).min_size = size;
        Ok(())
    }

    fn dialog(&mut self, request: &DialogRequest) -> Result<String> {
        lock(&self.shared.window).dialogs.push(request.clone());
        if request.kind == DialogKind::Alert {
            return Ok(String::new());
        }
        Ok(lock(&self.shared.dialog_answers)
            .pop_front()
            .unwrap_or_default())
    }

    fn message_box(&mut self, request: &MessageBoxRequest) -> Result<MessageResponse> {
        lock(&self.shared.window)
            .message_boxes
            .push(request.clone());
        Ok(lock(&self.shared.message_answers)
            .pop_front()
            .unwrap_or(request.buttons.dismissed()))
    }

    fn close(&mut self) {
        self.teardown();
        debug!("headless window closed");
    }
}
