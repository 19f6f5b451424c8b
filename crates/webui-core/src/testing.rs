//! Scriptable in-memory engine for unit tests.

use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Duration;

use webui_common::{Color, Content, Result, Size, WebUiError};
use webui_config::WebUiSettings;

use crate::dialog::{DialogRequest, MessageBoxRequest, MessageResponse};
use crate::engine::{LoopWaker, Platform, RenderEngine};
use crate::events::{EngineEvent, EvalId, EventSink};

#[derive(Default)]
pub(crate) struct CountingWaker {
    pub wakes: AtomicUsize,
}

impl LoopWaker for CountingWaker {
    fn wake(&self) {
        self.wakes.fetch_add(1, Ordering::SeqCst);
    }
}

/// Everything the mock saw, plus what it will answer.
#[derive(Default)]
pub(crate) struct MockState {
    /// Emitted into the sink one per pump.
    pub pending: VecDeque<EngineEvent>,
    /// Raw completions handed to successive `run_script` calls. When empty
    /// the script never completes.
    pub responses: VecDeque<std::result::Result<String, String>>,
    pub scripts: Vec<(EvalId, String)>,
    pub loads: Vec<Content>,
    pub titles: Vec<String>,
    pub fullscreen: Option<bool>,
    pub background: Option<Color>,
    pub min_size: Option<Size>,
    pub dialogs: Vec<DialogRequest>,
    pub dialog_answer: String,
    pub message_answer: Option<MessageResponse>,
    pub pumps: usize,
    pub closed: usize,
    pub fail_create: bool,
}

#[derive(Clone, Default)]
pub(crate) struct Mock {
    pub state: Arc<Mutex<MockState>>,
    pub waker: Arc<CountingWaker>,
}

impl Mock {
    pub fn state(&self) -> MutexGuard<'_, MockState> {
        self.state.lock().unwrap()
    }

    pub fn respond(&self, raw: &str) {
        self.state().responses.push_back(Ok(raw.to_string()));
    }

    pub fn emit(&self, event: EngineEvent) {
        self.state().pending.push_back(event);
    }

    pub fn wakes(&self) -> usize {
        self.waker.wakes.load(Ordering::SeqCst)
    }
}

impl Platform for Mock {
    fn create(
        &mut self,
        _settings: &WebUiSettings,
        sink: EventSink,
    ) -> Result<Box<dyn RenderEngine>> {
        if self.state().fail_create {
            return Err(WebUiError::PlatformInit("no display".into()));
        }
        Ok(Box::new(MockEngine {
            mock: self.clone(),
            sink,
        }))
    }
}

pub(crate) struct MockEngine {
    mock: Mock,
    sink: EventSink,
}

impl RenderEngine for MockEngine {
    fn load(&mut self, content: &Content) -> Result<()> {
        let mut state = self.mock.state();
        state.loads.push(content.clone());
        state.pending.push_back(EngineEvent::LoadStarted);
        state.pending.push_back(EngineEvent::LoadFinished);
        Ok(())
    }

    fn run_script(&mut self, id: EvalId, source: &str) -> Result<()> {
        let mut state = self.mock.state();
        state.scripts.push((id, source.to_string()));
        if let Some(result) = state.responses.pop_front() {
            state
                .pending
                .push_back(EngineEvent::ScriptCompleted { id, result });
        }
        Ok(())
    }

    fn pump(&mut self, timeout: Option<Duration>) {
        let next = {
            let mut state = self.mock.state();
            state.pumps += 1;
            state.pending.pop_front()
        };
        match next {
            Some(event) => self.sink.push(event),
            None => {
                if let Some(timeout) = timeout {
                    std::thread::sleep(timeout.min(Duration::from_millis(5)));
                }
            }
        }
    }

    fn waker(&self) -> Arc<dyn LoopWaker> {
        self.mock.waker.clone()
    }

    fn set_title(&mut self, title: &str) -> Result<()> {
        self.mock.state().titles.push(title.to_string());
        Ok(())
    }

    fn set_fullscreen(&mut self, fullscreen: bool) -> Result<()> {
        self.mock.state().fullscreen = Some(fullscreen);
        Ok(())
    }

    fn set_background(&mut self, color: Color) -> Result<()> {
        self.mock.state().background = Some(color);
        Ok(())
    }

    fn set_min_size(&mut self, size: Size) -> Result<()> {
        self.mock.state().min_size = Some(size);
        Ok(())
    }

    fn dialog(&mut self, request: &DialogRequest) -> Result<String> {
        let mut state = self.mock.state();
        state.dialogs.push(request.clone());
        Ok(state.dialog_answer.clone())
    }

    fn message_box(&mut self, request: &MessageBoxRequest) -> Result<MessageResponse> {
        Ok(self
            .mock
            .state()
            .message_answer
            .unwrap_or(request.buttons.dismissed()))
    }

    fn close(&mut self) {
        self.mock.state().closed += 1;
    }
}
