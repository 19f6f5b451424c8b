//! Synchronous script evaluation over the engine's asynchronous
//! `run_script`.
//!
//! `WebUi::eval` pumps the loop until the document has been ready at least
//! once, then until no other evaluation is outstanding, then submits the
//! script and pumps until its completion arrives. Nested calls (from a
//! handler running inside that pump) serialize behind the outer one;
//! completions are kept by id so the outer caller still collects its own.
//!
//! Scripts are wrapped so the engine always hands back JSON of the form
//! `{"ok":value}` or `{"err":"diagnostic"}`. The engine's own failures and
//! `err` results both surface as `WebUiError::Script`.

use std::collections::{BTreeSet, HashMap};
use std::time::{Duration, Instant};

use serde::de::DeserializeOwned;
use serde_json::Value;
use tracing::{debug, warn};
use webui_common::{Result, WebUiError};

use crate::events::EvalId;
use crate::instance::WebUi;

type RawOutcome = std::result::Result<String, String>;

/// Abandoned ids remembered at most. An engine that never answers a timed-out
/// script would otherwise grow the set forever; past this, the oldest id is
/// forgotten and its completion (if it ever comes) is stored and never taken.
const ABANDONED_LIMIT: usize = 64;

/// Bookkeeping for submitted scripts.
#[derive(Debug, Default)]
pub(crate) struct EvalBridge {
    next_id: EvalId,
    /// Last submission handed to the engine.
    outstanding: Option<EvalId>,
    completed: HashMap<EvalId, RawOutcome>,
    /// Timed-out submissions whose late completion is dropped.
    abandoned: BTreeSet<EvalId>,
    timeout: Option<Duration>,
}

impl EvalBridge {
    pub(crate) fn new(timeout: Option<Duration>) -> Self {
        Self {
            timeout,
            ..Self::default()
        }
    }

    pub(crate) fn timeout(&self) -> Option<Duration> {
        self.timeout
    }

    /// An evaluation was submitted and its completion has not arrived.
    pub(crate) fn engine_busy(&self) -> bool {
        self.outstanding
            .is_some_and(|id| !self.completed.contains_key(&id))
    }

    pub(crate) fn submit(&mut self) -> EvalId {
        let id = self.next_id;
        self.next_id += 1;
        self.outstanding = Some(id);
        id
    }

    pub(crate) fn complete(&mut self, id: EvalId, outcome: RawOutcome) {
        if self.abandoned.remove(&id) {
            debug!(id, "discarding completion of abandoned script");
            return;
        }
        self.completed.insert(id, outcome);
    }

    pub(crate) fn take(&mut self, id: EvalId) -> Option<RawOutcome> {
        let outcome = self.completed.remove(&id)?;
        if self.outstanding == Some(id) {
            self.outstanding = None;
        }
        Some(outcome)
    }

    pub(crate) fn abandon(&mut self, id: EvalId) {
        self.completed.remove(&id);
        self.abandoned.insert(id);
        while self.abandoned.len() > ABANDONED_LIMIT {
            if let Some(oldest) = self.abandoned.pop_first() {
                debug!(id = oldest, "forgetting oldest abandoned script");
            }
        }
        if self.outstanding == Some(id) {
            self.outstanding = None;
        }
    }

    /// No late completion can arrive once the engine is gone.
    pub(crate) fn forget_abandoned(&mut self) {
        self.abandoned.clear();
    }

    #[cfg(test)]
    pub(crate) fn abandoned_count(&self) -> usize {
        self.abandoned.len()
    }

    /// Complete the submission still waiting on the engine with an error.
    /// Used when the engine is gone and will never answer.
    pub(crate) fn fail_pending(&mut self, reason: &str) {
        if let Some(id) = self.outstanding {
            if !self.completed.contains_key(&id) {
                self.completed.insert(id, Err(reason.to_string()));
            }
        }
    }

    pub(crate) fn reset(&mut self) {
        self.outstanding = None;
        self.completed.clear();
        self.abandoned.clear();
    }
}

/// Wrap `source` so its completion value is always `{"ok":..}` or
/// `{"err":..}` JSON.
pub fn wrap_script(source: &str) -> String {
    let literal = serde_json::to_string(source).unwrap_or_else(|_| "\"\"".into());
    format!(
        "(function(){{try{{var r=(0,eval)({literal});return JSON.stringify({{ok:r===undefined?null:r}});}}catch(e){{return JSON.stringify({{err:String(e)}});}}}})()"
    )
}

/// Turn an engine completion into the caller's result: the JSON text of the
/// script's value, or a `Script` error.
pub(crate) fn translate(raw: RawOutcome) -> Result<String> {
    let text = raw.map_err(WebUiError::Script)?;
    if text.trim().is_empty() {
        return Err(WebUiError::Script("engine returned no result".into()));
    }

    let mut value: Value = match serde_json::from_str(&text) {
        Ok(value) => value,
        Err(_) => {
            debug!("script result is not JSON, passing through");
            return Ok(text);
        }
    };
    // Engines that JSON-encode the completion value hand back our JSON as
    // a string literal.
    if let Value::String(inner) = &value {
        if let Ok(decoded) = serde_json::from_str::<Value>(inner) {
            value = decoded;
        }
    }

    match value {
        Value::Object(mut map) => {
            if let Some(err) = map.remove("err") {
                return Err(WebUiError::Script(match err {
                    Value::String(msg) => msg,
                    other => other.to_string(),
                }));
            }
            Ok(map.remove("ok").unwrap_or(Value::Null).to_string())
        }
        other => Ok(other.to_string()),
    }
}

impl WebUi {
    /// Run `source` in the document and wait for its value, returned as
    /// JSON text (`"2"` for `1+1`).
    ///
    /// Blocks, pumping the loop, until the document has loaded once. A
    /// script exception fails with `Script`; with a configured timeout a
    /// slow script fails with `Timeout` and the instance stays usable.
    pub fn eval(&mut self, source: &str) -> Result<String> {
        self.ensure_open("eval")?;
        let deadline = self.eval.timeout().map(|t| Instant::now() + t);

        self.pump_until(deadline, |ui| {
            if ui.lifecycle.can_eval() {
                Some(Ok(()))
            } else if ui.lifecycle.should_exit() {
                Some(Err(WebUiError::InvalidState(
                    "instance shut down before the document became ready".into(),
                )))
            } else {
                None
            }
        })?;

        // One script at a time on the engine.
        self.pump_until(deadline, |ui| (!ui.eval.engine_busy()).then_some(Ok(())))?;

        let id = self.eval.submit();
        debug!(id, len = source.len(), "submitting script");
        let submitted = self
            .engine_mut("eval")
            .and_then(|engine| engine.run_script(id, &wrap_script(source)));
        if let Err(e) = submitted {
            self.eval.abandon(id);
            return Err(e);
        }

        match self.pump_until(deadline, |ui| ui.eval.take(id).map(Ok)) {
            Ok(raw) => {
                let result = translate(raw);
                debug!(id, ok = result.is_ok(), "script completed");
                result
            }
            Err(e) => {
                if let WebUiError::Timeout(limit) = &e {
                    warn!(id, ?limit, "script evaluation timed out");
                }
                self.eval.abandon(id);
                Err(e)
            }
        }
    }

    /// `eval`, then deserialize the value.
    pub fn eval_as<T: DeserializeOwned>(&mut self, source: &str) -> Result<T> {
        let text = self.eval(source)?;
        serde_json::from_str(&text)
            .map_err(|e| WebUiError::Script(format!("unexpected script result {text}: {e}")))
    }
}
