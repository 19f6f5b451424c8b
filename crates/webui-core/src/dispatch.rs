//! Cross-thread work queue drained on the loop thread.
//!
//! `post` may be called from any thread. The first post into an idle queue
//! asks the loop to wake; further posts before the drain only append, so N
//! posts cost one wake. The drain runs items in FIFO order and keeps
//! popping until the queue is empty, so items posted while it runs are
//! picked up by the same pass. The wake flag is cleared in the same
//! critical section that observes the empty queue.

use std::collections::VecDeque;
use std::fmt;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use tracing::{debug, trace};
use webui_common::{Result, WebUiError};

use crate::engine::LoopWaker;

/// A unit of deferred work, run with the loop-thread context.
pub type Task<C> = Box<dyn FnOnce(&mut C) + Send + 'static>;

struct QueueState<C> {
    items: VecDeque<Task<C>>,
    wake_pending: bool,
    closed: bool,
}

pub struct DispatchQueue<C> {
    state: Mutex<QueueState<C>>,
    waker: Arc<dyn LoopWaker>,
}

impl<C> DispatchQueue<C> {
    pub fn new(waker: Arc<dyn LoopWaker>) -> Self {
        Self {
            state: Mutex::new(QueueState {
                items: VecDeque::new(),
                wake_pending: false,
                closed: false,
            }),
            waker,
        }
    }

    fn lock(&self) -> MutexGuard<'_, QueueState<C>> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Append a task. Schedules a wake only if none is pending.
    pub fn post(&self, task: Task<C>) -> Result<()> {
        let wake = {
            let mut state = self.lock();
            if state.closed {
                return Err(WebUiError::InvalidState(
                    "dispatch queue is closed".into(),
                ));
            }
            state.items.push_back(task);
            !std::mem::replace(&mut state.wake_pending, true)
        };
        if wake {
            trace!("dispatch queue scheduling wake");
            self.waker.wake();
        }
        Ok(())
    }

    /// Run every queued task, including ones posted during the drain.
    /// Returns how many ran.
    pub fn drain(&self, ctx: &mut C) -> usize {
        let mut ran = 0;
        loop {
            let next = {
                let mut state = self.lock();
                let next = state.items.pop_front();
                if next.is_none() {
                    state.wake_pending = false;
                }
                next
            };
            match next {
                Some(task) => {
                    task(ctx);
                    ran += 1;
                }
                None => break,
            }
        }
        if ran > 0 {
            debug!(ran, "dispatch queue drained");
        }
        ran
    }

    /// Refuse further posts and drop whatever is queued without running it.
    /// Returns the number of discarded tasks.
    pub fn close(&self) -> usize {
        let dropped: Vec<Task<C>> = {
            let mut state = self.lock();
            state.closed = true;
            state.wake_pending = false;
            state.items.drain(..).collect()
        };
        dropped.len()
    }

    pub fn len(&self) -> usize {
        self.lock().items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn wake_pending(&self) -> bool {
        self.lock().wake_pending
    }

    pub fn is_closed(&self) -> bool {
        self.lock().closed
    }
}

impl<C> fmt::Debug for DispatchQueue<C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let state = self.lock();
        f.debug_struct("DispatchQueue")
            .field("len", &state.items.len())
            .field("wake_pending", &state.wake_pending)
            .field("closed", &state.closed)
            .finish()
    }
}

/// Cloneable, `Send` handle for posting onto a loop thread.
pub struct Dispatcher<C> {
    queue: Arc<DispatchQueue<C>>,
}

impl<C> Dispatcher<C> {
    pub fn new(queue: Arc<DispatchQueue<C>>) -> Self {
        Self { queue }
    }

    pub fn post(&self, work: impl FnOnce(&mut C) + Send + 'static) -> Result<()> {
        self.queue.post(Box::new(work))
    }
}

impl<C> Clone for Dispatcher<C> {
    fn clone(&self) -> Self {
        Self {
            queue: Arc::clone(&self.queue),
        }
    }
}

impl<C> fmt::Debug for Dispatcher<C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Dispatcher").field(&self.queue).finish()
    }
}
