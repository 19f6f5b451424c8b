//! Event pumping: one engine turn, then every event it produced.

use std::sync::Arc;
use std::time::{Duration, Instant};

use tracing::{debug, info, trace};
use webui_common::{Result, WebUiError};

use super::{CloseResponse, WebUi};
use crate::events::EngineEvent;

impl WebUi {
    /// Run one unit of the engine's loop and handle the resulting events.
    ///
    /// Events already waiting in the sink turn a blocking pump into a poll
    /// so they are not held up behind the next native event.
    pub(crate) fn pump_once(&mut self, timeout: Option<Duration>) {
        let timeout = if self.sink.is_empty() {
            timeout
        } else {
            Some(Duration::ZERO)
        };
        if let Some(engine) = self.engine.as_deref_mut() {
            engine.pump(timeout);
        }
        self.process_events();
    }

    /// Pump until `ready` yields an outcome, the deadline passes or the
    /// instance closes.
    pub(crate) fn pump_until<T>(
        &mut self,
        deadline: Option<Instant>,
        mut ready: impl FnMut(&mut WebUi) -> Option<Result<T>>,
    ) -> Result<T> {
        loop {
            if let Some(outcome) = ready(self) {
                return outcome;
            }
            if self.lifecycle.is_closed() || self.engine.is_none() {
                return Err(WebUiError::InvalidState(
                    "instance closed while waiting on the engine".into(),
                ));
            }
            let timeout = match deadline {
                None => None,
                Some(deadline) => {
                    let now = Instant::now();
                    if now >= deadline {
                        return Err(WebUiError::Timeout(self.eval.timeout().unwrap_or_default()));
                    }
                    Some(deadline - now)
                }
            };
            self.pump_once(timeout);
        }
    }

    // Events are popped one at a time: a handler may pump again (nested
    // eval), and the inner pump must continue with the next event.
    fn process_events(&mut self) {
        while let Some(event) = self.sink.pop() {
            self.handle_event(event);
            if self.lifecycle.is_closed() {
                break;
            }
        }
    }

    fn handle_event(&mut self, event: EngineEvent) {
        match event {
            EngineEvent::LoadStarted => {
                self.lifecycle.begin_load();
            }
            EngineEvent::LoadFinished => {
                if self.lifecycle.load_finished() {
                    debug!("document ready");
                    self.schedule_binding_reinstall();
                }
            }
            EngineEvent::ScriptCompleted { id, result } => {
                trace!(id, ok = result.is_ok(), "script completion");
                self.eval.complete(id, result);
            }
            EngineEvent::Message(text) => self.deliver_message(text),
            EngineEvent::CloseRequested => self.handle_close_request(),
            EngineEvent::Destroyed => {
                if self.lifecycle.terminate() {
                    info!("window destroyed");
                }
                self.eval.fail_pending("window destroyed");
                self.eval.forget_abandoned();
            }
            EngineEvent::Wake => {
                let queue = Arc::clone(&self.queue);
                let ran = queue.drain(self);
                if ran > 0 {
                    trace!(ran, "dispatch queue drained");
                }
            }
        }
    }

    // A handler that pumps (say, through `eval`) may surface another
    // message. It queues behind the current one and is delivered by the
    // outermost call, so messages reach the host in send order.
    fn deliver_message(&mut self, text: String) {
        if !self.invoke.enqueue(text) {
            return;
        }
        while let Some(text) = self.invoke.next_message() {
            if self.lifecycle.is_closed() {
                let dropped = self.invoke.abort() + 1;
                debug!(dropped, "instance closed, queued messages discarded");
                return;
            }
            if self.dispatch_binding(&text) {
                continue;
            }
            if let Some(mut handler) = self.invoke.take_handler() {
                handler(self, &text);
                self.invoke.restore_handler(handler);
            }
        }
    }

    fn handle_close_request(&mut self) {
        if self.lifecycle.should_exit() {
            return;
        }
        // The handler may pump while deciding; a second request arriving
        // then is answered by the decision already underway.
        if self.deciding_close {
            debug!("close request ignored, handler still deciding");
            return;
        }
        let response = match self.close_handler.take() {
            Some(mut handler) => {
                self.deciding_close = true;
                let response = handler(self);
                self.deciding_close = false;
                if self.close_handler.is_none() {
                    self.close_handler = Some(handler);
                }
                response
            }
            None => CloseResponse::Allow,
        };
        match response {
            CloseResponse::Allow => {
                if self.lifecycle.terminate() {
                    info!("close request accepted");
                }
            }
            CloseResponse::Deny => debug!("close request denied by handler"),
        }
    }
}
