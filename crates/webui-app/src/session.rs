//! One scripted session against a window: open, style, evaluate, then
//! either hand the loop to the user or close.

use tracing::{info, warn};
use webui_common::Result;
use webui_config::WebUiSettings;
use webui_core::{Platform, WebUi};

/// What to do once the page is up.
#[derive(Debug, Clone, Default)]
pub struct Plan {
    pub css: Option<String>,
    pub evals: Vec<String>,
    /// Run the loop until the window closes instead of exiting after the
    /// scripts.
    pub keep_open: bool,
}

#[derive(Debug)]
pub struct EvalReport {
    pub source: String,
    pub result: Result<String>,
}

pub fn run<P: Platform + ?Sized>(
    platform: &mut P,
    settings: WebUiSettings,
    plan: &Plan,
) -> Result<Vec<EvalReport>> {
    let mut ui = WebUi::init(platform, settings)?;
    ui.set_invoke_handler(|_, message| {
        info!(target: "webui::invoke", text = message, "external.invoke");
    })?;

    if let Some(css) = &plan.css {
        ui.inject_css(css)?;
    }

    let mut reports = Vec::with_capacity(plan.evals.len());
    for source in &plan.evals {
        let result = ui.eval(source);
        let fatal = match &result {
            Ok(_) => false,
            Err(e) => {
                warn!(error = %e, source = %source, "script failed");
                !e.is_recoverable() || ui.is_closed()
            }
        };
        reports.push(EvalReport {
            source: source.clone(),
            result,
        });
        if fatal {
            break;
        }
    }

    if plan.keep_open && !ui.is_closed() {
        ui.run()?;
    } else {
        ui.exit();
    }
    Ok(reports)
}
