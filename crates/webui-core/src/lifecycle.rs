//! Readiness and teardown state machine.
//!
//! ```text
//! Created -> Loading -> Ready        (Ready -> Loading on later navigations)
//!    any  -> Terminating -> Closed
//! ```
//!
//! "Ever ready" is sticky: once the first load finishes, evaluation stays
//! permitted across navigations until the instance shuts down.

use tracing::debug;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EngineState {
    /// Configured, nothing requested yet.
    Created,
    /// A navigation is in progress.
    Loading,
    /// The engine finished a load.
    Ready,
    /// A close was accepted; the loop should stop being driven.
    Terminating,
    /// Window and engine released.
    Closed,
}

#[derive(Debug)]
pub struct Lifecycle {
    state: EngineState,
    ever_ready: bool,
}

impl Lifecycle {
    pub fn new() -> Self {
        Self {
            state: EngineState::Created,
            ever_ready: false,
        }
    }

    pub fn state(&self) -> EngineState {
        self.state
    }

    pub fn ever_ready(&self) -> bool {
        self.ever_ready
    }

    /// True once the instance is on its way out.
    pub fn should_exit(&self) -> bool {
        matches!(self.state, EngineState::Terminating | EngineState::Closed)
    }

    pub fn is_closed(&self) -> bool {
        self.state == EngineState::Closed
    }

    /// Script may be submitted.
    pub fn can_eval(&self) -> bool {
        self.ever_ready && !self.should_exit()
    }

    /// A navigation was requested or started.
    pub fn begin_load(&mut self) -> bool {
        match self.state {
            EngineState::Created | EngineState::Ready => self.transition(EngineState::Loading),
            _ => false,
        }
    }

    /// The engine reported load completion.
    pub fn load_finished(&mut self) -> bool {
        match self.state {
            EngineState::Created | EngineState::Loading => {
                self.ever_ready = true;
                self.transition(EngineState::Ready)
            }
            _ => false,
        }
    }

    /// A close was accepted or forced.
    pub fn terminate(&mut self) -> bool {
        match self.state {
            EngineState::Terminating | EngineState::Closed => false,
            _ => self.transition(EngineState::Terminating),
        }
    }

    /// Resources released. Final.
    pub fn close(&mut self) -> bool {
        if self.state == EngineState::Closed {
            return false;
        }
        self.transition(EngineState::Closed)
    }

    fn transition(&mut self, next: EngineState) -> bool {
        debug!(from = ?self.state, to = ?next, "lifecycle transition");
        self.state = next;
        true
    }
}

impl Default for Lifecycle {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn starts_created() {
        let lc = Lifecycle::new();
        assert_eq!(lc.state(), EngineState::Created);
        assert!(!lc.ever_ready());
        assert!(!lc.can_eval());
        assert!(!lc.should_exit());
    }

    #[test]
    fn load_then_ready() {
        let mut lc = Lifecycle::new();
        assert!(lc.begin_load());
        assert_eq!(lc.state(), EngineState::Loading);
        assert!(!lc.can_eval());
        assert!(lc.load_finished());
        assert_eq!(lc.state(), EngineState::Ready);
        assert!(lc.can_eval());
    }

    #[test]
    fn renavigation_keeps_ever_ready() {
        let mut lc = Lifecycle::new();
        lc.begin_load();
        lc.load_finished();
        assert!(lc.begin_load());
        assert_eq!(lc.state(), EngineState::Loading);
        assert!(lc.ever_ready());
        assert!(lc.can_eval());
    }

    #[test]
    fn duplicate_load_started_is_ignored() {
        let mut lc = Lifecycle::new();
        assert!(lc.begin_load());
        assert!(!lc.begin_load());
        assert_eq!(lc.state(), EngineState::Loading);
    }

    #[test]
    fn terminate_from_any_open_state() {
        for setup in [0, 1, 2] {
            let mut lc = Lifecycle::new();
            if setup >= 1 {
                lc.begin_load();
            }
            if setup >= 2 {
                lc.load_finished();
            }
            assert!(lc.terminate());
            assert_eq!(lc.state(), EngineState::Terminating);
            assert!(lc.should_exit());
            assert!(!lc.can_eval());
        }
    }

    #[test]
    fn load_events_ignored_while_terminating() {
        let mut lc = Lifecycle::new();
        lc.begin_load();
        lc.terminate();
        assert!(!lc.load_finished());
        assert!(!lc.begin_load());
        assert_eq!(lc.state(), EngineState::Terminating);
        assert!(!lc.ever_ready());
    }

    #[test]
    fn close_is_final_and_idempotent() {
        let mut lc = Lifecycle::new();
        lc.terminate();
        assert!(lc.close());
        assert!(!lc.close());
        assert!(!lc.terminate());
        assert!(!lc.begin_load());
        assert!(lc.is_closed());
        assert!(lc.should_exit());
    }
}
