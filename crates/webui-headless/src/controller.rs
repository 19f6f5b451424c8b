//! State shared between a headless engine and the outside world.

use std::collections::VecDeque;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Condvar, Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use webui_common::{Color, Content, Size};
use webui_core::{DialogRequest, EvalId, LoopWaker, MessageBoxRequest, MessageResponse};

pub(crate) fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

/// Work for the engine's next pump.
#[derive(Debug)]
pub(crate) enum Job {
    Load(Content),
    RunScript(EvalId, String),
    RequestClose,
    Destroy,
}

/// Wake flag a blocking pump sleeps on.
#[derive(Debug, Default)]
pub(crate) struct Signal {
    woken: Mutex<bool>,
    cond: Condvar,
}

impl Signal {
    /// Sleep until woken or `timeout` passes. Consumes the wake.
    pub(crate) fn wait(&self, timeout: Option<Duration>) {
        let mut woken = lock(&self.woken);
        while !*woken {
            match timeout {
                None => woken = self.cond.wait(woken).unwrap_or_else(PoisonError::into_inner),
                Some(timeout) => {
                    let (guard, result) = self
                        .cond
                        .wait_timeout(woken, timeout)
                        .unwrap_or_else(PoisonError::into_inner);
                    woken = guard;
                    if result.timed_out() {
                        break;
                    }
                }
            }
        }
        *woken = false;
    }
}

impl LoopWaker for Signal {
    fn wake(&self) {
        *lock(&self.woken) = true;
        self.cond.notify_all();
    }
}

/// What the "window" looks like. Updated by the engine as the instance
/// drives it.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct WindowState {
    pub title: String,
    pub size: Size,
    pub min_size: Size,
    pub fullscreen: bool,
    pub background: Option<Color>,
    /// Location of the last completed load.
    pub location: String,
    pub loads: usize,
    pub dialogs: Vec<DialogRequest>,
    pub message_boxes: Vec<MessageBoxRequest>,
    pub closed: bool,
}

#[derive(Debug, Default)]
pub(crate) struct Shared {
    pub(crate) jobs: Mutex<VecDeque<Job>>,
    pub(crate) window: Mutex<WindowState>,
    pub(crate) dialog_answers: Mutex<VecDeque<String>>,
    pub(crate) message_answers: Mutex<VecDeque<MessageResponse>>,
    pub(crate) signal: Arc<Signal>,
    /// While set, jobs stay queued: the page looks hung.
    pub(crate) paused: AtomicBool,
}

impl Shared {
    pub(crate) fn push(&self, job: Job) {
        lock(&self.jobs).push_back(job);
        self.signal.wake();
    }

    pub(crate) fn next_job(&self) -> Option<Job> {
        if self.paused.load(Ordering::SeqCst) {
            return None;
        }
        lock(&self.jobs).pop_front()
    }
}

/// Drives a headless window from outside: simulated user actions and
/// scripted dialog answers. Cloneable and usable from any thread.
#[derive(Debug, Clone)]
pub struct HeadlessController {
    pub(crate) shared: Arc<Shared>,
}

impl HeadlessController {
    /// The user clicked the close button.
    pub fn request_close(&self) {
        self.shared.push(Job::RequestClose);
    }

    /// The window was destroyed underneath the instance.
    pub fn destroy(&self) {
        self.shared.push(Job::Destroy);
    }

    /// The document navigated by itself (link, `location` change).
    pub fn navigate(&self, content: Content) {
        self.shared.push(Job::Load(content));
    }

    /// Stop processing work, as if a script never returned.
    pub fn pause(&self) {
        self.shared.paused.store(true, Ordering::SeqCst);
    }

    pub fn resume(&self) {
        self.shared.paused.store(false, Ordering::SeqCst);
        self.shared.signal.wake();
    }

    /// Answer for the next file chooser; an empty string means cancel.
    pub fn queue_dialog_answer(&self, path: impl Into<String>) {
        lock(&self.shared.dialog_answers).push_back(path.into());
    }

    /// Button pressed in the next message box.
    pub fn queue_message_answer(&self, response: MessageResponse) {
        lock(&self.shared.message_answers).push_back(response);
    }

    pub fn window(&self) -> WindowState {
        lock(&self.shared.window).clone()
    }

    pub fn is_closed(&self) -> bool {
        lock(&self.shared.window).closed
    }
}
