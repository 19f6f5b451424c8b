//! Host objects exposed to the document.
//!
//! A `Binding` publishes a global object whose methods forward their
//! arguments to host closures through `external.invoke`, as
//! `{"scope":..,"method":..,"params":[..]}`. After every handled call the
//! binding's state is pushed back into `name.data`, and `name.render(data)`
//! runs if the document defined it.

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{debug, info, trace, warn};
use webui_common::{ConfigError, Result, WebUiError};

use crate::instance::WebUi;

pub type Method = Box<dyn FnMut(&[Value]) -> std::result::Result<(), String>>;
type StateFn = Box<dyn Fn() -> Option<Value>>;

struct BoundMethod {
    arity: usize,
    call: Method,
}

/// A named group of host methods plus an optional state snapshot.
pub struct Binding {
    name: String,
    methods: BTreeMap<String, BoundMethod>,
    state: Option<StateFn>,
}

/// Wire form of a call from the document.
#[derive(Debug, Deserialize)]
struct RpcCall {
    scope: String,
    method: String,
    #[serde(default)]
    params: Vec<Value>,
}

enum CallOutcome {
    NotMine,
    /// Carries the state sync script, if the binding has state.
    Handled(Option<String>),
    Failed(String),
}

impl Binding {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            methods: BTreeMap::new(),
            state: None,
        }
    }

    /// Expose `f` as `name.<jsName>(a0, .., a{arity-1})`. Snake case names
    /// are published in lowerCamelCase.
    pub fn method(
        mut self,
        name: impl Into<String>,
        arity: usize,
        f: impl FnMut(&[Value]) -> std::result::Result<(), String> + 'static,
    ) -> Self {
        self.methods.insert(
            name.into(),
            BoundMethod {
                arity,
                call: Box::new(f),
            },
        );
        self
    }

    /// Snapshot pushed to `name.data` after installation and every call.
    pub fn state<T, F>(mut self, f: F) -> Self
    where
        T: Serialize,
        F: Fn() -> T + 'static,
    {
        self.state = Some(Box::new(move || serde_json::to_value(f()).ok()));
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn method_names(&self) -> impl Iterator<Item = &str> {
        self.methods.keys().map(String::as_str)
    }

    fn validate(&self) -> std::result::Result<(), ConfigError> {
        if !is_js_identifier(&self.name) {
            return Err(ConfigError::ValidationError(format!(
                "binding name {:?} is not a script identifier",
                self.name
            )));
        }
        for method in self.methods.keys() {
            if !is_js_identifier(&js_name(method)) {
                return Err(ConfigError::ValidationError(format!(
                    "method {:?} of binding {:?} is not a script identifier",
                    method, self.name
                )));
            }
        }
        Ok(())
    }

    /// Script defining the global object and one forwarding function per
    /// method.
    pub fn stub_script(&self) -> String {
        let scope = json_literal(&self.name);
        let mut js = format!("window.{0}=window.{0}||{{}};", self.name);
        for (method, bound) in &self.methods {
            let args = (0..bound.arity)
                .map(|i| format!("a{i}"))
                .collect::<Vec<_>>()
                .join(",");
            js.push_str(&format!(
                "window.{name}.{js}=function({args}){{window.external.invoke(JSON.stringify({{scope:{scope},method:{method},params:[{args}]}}));}};",
                name = self.name,
                js = js_name(method),
                method = json_literal(method),
            ));
        }
        js
    }

    /// Script publishing the current state, or `None` without state.
    pub fn sync_script(&self) -> Option<String> {
        let state = self.state.as_ref()?;
        let data = state().unwrap_or(Value::Null);
        Some(format!(
            "window.{0}.data={1};if(window.{0}.render){{window.{0}.render(window.{0}.data);}}",
            self.name, data
        ))
    }

    fn call(&mut self, call: &RpcCall) -> CallOutcome {
        let Some(bound) = self.methods.get_mut(&call.method) else {
            return CallOutcome::NotMine;
        };
        if call.params.len() != bound.arity {
            return CallOutcome::Failed(format!(
                "expected {} arguments, got {}",
                bound.arity,
                call.params.len()
            ));
        }
        match (bound.call)(&call.params) {
            Ok(()) => CallOutcome::Handled(self.sync_script()),
            Err(e) => CallOutcome::Failed(e),
        }
    }
}

impl fmt::Debug for Binding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Binding")
            .field("name", &self.name)
            .field("methods", &self.methods.keys().collect::<Vec<_>>())
            .field("stateful", &self.state.is_some())
            .finish()
    }
}

/// `add_item` -> `addItem`, `Increment` -> `increment`.
pub fn js_name(method: &str) -> String {
    let mut out = String::with_capacity(method.len());
    for (i, part) in method.split('_').filter(|p| !p.is_empty()).enumerate() {
        let mut chars = part.chars();
        if let Some(first) = chars.next() {
            if i == 0 {
                out.extend(first.to_lowercase());
            } else {
                out.extend(first.to_uppercase());
            }
            out.push_str(chars.as_str());
        }
    }
    out
}

fn is_js_identifier(name: &str) -> bool {
    let mut chars = name.chars();
    match chars.next() {
        Some(c) if c.is_ascii_alphabetic() || c == '_' || c == '$' => {}
        _ => return false,
    }
    chars.all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '$')
}

fn json_literal(text: &str) -> String {
    serde_json::to_string(text).unwrap_or_else(|_| "\"\"".into())
}

impl WebUi {
    /// Publish `binding` in the current document and push its state.
    ///
    /// A binding with the same name replaces the earlier one. Bindings are
    /// reinstalled after every later navigation.
    pub fn bind(&mut self, binding: Binding) -> Result<()> {
        self.ensure_open("bind")?;
        binding.validate()?;
        self.eval(&binding.stub_script())?;

        let sync = binding.sync_script();
        info!(
            name = %binding.name,
            methods = binding.methods.len(),
            "binding installed"
        );
        self.bindings.retain(|b| b.name != binding.name);
        self.bindings.push(binding);

        if let Some(sync) = sync {
            self.eval(&sync)?;
        }
        Ok(())
    }

    /// Push the host's current state for the binding `name` to the
    /// document. For state changed outside of a method call.
    pub fn sync_binding(&mut self, name: &str) -> Result<()> {
        self.ensure_open("sync_binding")?;
        let binding = self
            .bindings
            .iter()
            .find(|b| b.name == name)
            .ok_or_else(|| WebUiError::InvalidState(format!("no binding named {name}")))?;
        match binding.sync_script() {
            Some(sync) => {
                trace!(%name, "syncing binding state");
                self.eval(&sync).map(drop)
            }
            None => Ok(()),
        }
    }

    /// Offer a message to the bindings. Returns true if one claimed it.
    pub(crate) fn dispatch_binding(&mut self, text: &str) -> bool {
        if self.bindings.is_empty() {
            return false;
        }
        let Ok(call) = serde_json::from_str::<RpcCall>(text) else {
            return false;
        };
        let Some(binding) = self.bindings.iter_mut().find(|b| b.name == call.scope) else {
            return false;
        };

        match binding.call(&call) {
            CallOutcome::NotMine => false,
            CallOutcome::Failed(error) => {
                warn!(scope = %call.scope, method = %call.method, %error, "binding call failed");
                true
            }
            CallOutcome::Handled(sync) => {
                debug!(scope = %call.scope, method = %call.method, "binding call handled");
                if let Some(sync) = sync {
                    if let Err(e) = self.eval(&sync) {
                        warn!(scope = %call.scope, error = %e, "failed to sync binding state");
                    }
                }
                true
            }
        }
    }

    /// After a navigation the new document has none of the stubs.
    pub(crate) fn schedule_binding_reinstall(&mut self) {
        if self.bindings.is_empty() {
            return;
        }
        if let Err(e) = self.dispatch(|ui| ui.reinstall_bindings()) {
            debug!(error = %e, "binding reinstall not scheduled");
        }
    }

    fn reinstall_bindings(&mut self) {
        let scripts: Vec<(String, String)> = self
            .bindings
            .iter()
            .map(|b| {
                let mut js = b.stub_script();
                js.push_str(&b.sync_script().unwrap_or_default());
                (b.name.clone(), js)
            })
            .collect();
        for (name, js) in scripts {
            if let Err(e) = self.eval(&js) {
                warn!(%name, error = %e, "failed to reinstall binding");
            }
        }
    }
}
