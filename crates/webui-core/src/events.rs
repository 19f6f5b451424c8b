//! Engine callbacks, delivered as values.
//!
//! Backends push `EngineEvent`s into the instance's `EventSink` from their
//! native callbacks; the instance pops them one at a time after each pump,
//! so a nested pump (from a reentrant `eval`) continues in order.

use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

/// Identifies one script submission.
pub type EvalId = u64;

/// Something the engine or window reported.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EngineEvent {
    /// A navigation started.
    LoadStarted,
    /// The document finished loading.
    LoadFinished,
    /// A `run_script` request completed. `Err` carries the engine's own
    /// failure text, before translation.
    ScriptCompleted {
        id: EvalId,
        result: Result<String, String>,
    },
    /// The document called `external.invoke(text)`.
    Message(String),
    /// The user asked the window to close.
    CloseRequested,
    /// The native window is gone.
    Destroyed,
    /// The dispatch queue has work.
    Wake,
}

/// Shared FIFO of engine events.
#[derive(Debug, Clone, Default)]
pub struct EventSink {
    inner: Arc<Mutex<VecDeque<EngineEvent>>>,
}

impl EventSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&self, event: EngineEvent) {
        if let Ok(mut events) = self.inner.lock() {
            events.push_back(event);
        }
    }

    pub fn pop(&self) -> Option<EngineEvent> {
        self.inner.lock().ok()?.pop_front()
    }

    /// Remove and return everything queued.
    pub fn drain(&self) -> Vec<EngineEvent> {
        match self.inner.lock() {
            Ok(mut events) => events.drain(..).collect(),
            Err(_) => Vec::new(),
        }
    }

    pub fn len(&self) -> usize {
        self.inner.lock().map(|events| events.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
