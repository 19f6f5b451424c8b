//! External invoke: one-way messages from the document to the host.
//!
//! The document gets a global `external` object with a single
//! `invoke(text)` method. Each call becomes an `EngineEvent::Message`,
//! delivered on the loop thread to the registered handler. There is no
//! reply channel; a host that wants to answer calls `eval`.

use std::collections::VecDeque;

use tracing::{debug, trace};

use crate::instance::WebUi;

/// Host callback for `external.invoke`. Runs inline on the loop thread, so
/// it must not block.
pub type InvokeHandler = Box<dyn FnMut(&mut WebUi, &str)>;

/// Script that installs `window.external.invoke`, forwarding its argument
/// (as a string) to the backend's native `transport` function.
pub fn bridge_script(transport: &str) -> String {
    format!(
        "window.external={{invoke:function(x){{{transport}(String(x));}}}};"
    )
}

#[derive(Default)]
pub(crate) struct InvokeBridge {
    handler: Option<InvokeHandler>,
    /// Messages waiting for delivery. Non-empty only while a delivery pass
    /// is running; messages arriving from a nested pump queue up here.
    pending: VecDeque<String>,
    delivering: bool,
    delivered: u64,
    discarded: u64,
}

impl InvokeBridge {
    pub(crate) fn set_handler(&mut self, handler: Option<InvokeHandler>) {
        self.handler = handler;
    }

    pub(crate) fn has_handler(&self) -> bool {
        self.handler.is_some()
    }

    /// Queue `text`. Returns true if the caller must run the delivery pass;
    /// false if a pass further up the stack will pick it up.
    pub(crate) fn enqueue(&mut self, text: String) -> bool {
        self.pending.push_back(text);
        if self.delivering {
            trace!(queued = self.pending.len(), "message queued behind running handler");
            return false;
        }
        self.delivering = true;
        true
    }

    /// Next message of the current pass. Ends the pass once the queue is
    /// empty.
    pub(crate) fn next_message(&mut self) -> Option<String> {
        let next = self.pending.pop_front();
        if next.is_none() {
            self.delivering = false;
        }
        next
    }

    /// Drop everything still queued. Returns how many were dropped.
    pub(crate) fn abort(&mut self) -> usize {
        let dropped = self.pending.len();
        self.pending.clear();
        self.delivering = false;
        self.discarded += dropped as u64;
        dropped
    }

    /// Take the handler out for the duration of a call, so it can receive
    /// `&mut WebUi`.
    pub(crate) fn take_handler(&mut self) -> Option<InvokeHandler> {
        let handler = self.handler.take();
        if handler.is_some() {
            self.delivered += 1;
        } else {
            self.discarded += 1;
            trace!("no invoke handler registered, message discarded");
        }
        handler
    }

    /// Put the handler back unless it was replaced during the call.
    pub(crate) fn restore_handler(&mut self, handler: InvokeHandler) {
        if self.handler.is_none() {
            self.handler = Some(handler);
        } else {
            debug!("invoke handler replaced during delivery");
        }
    }

    pub(crate) fn counts(&self) -> (u64, u64) {
        (self.delivered, self.discarded)
    }
}
