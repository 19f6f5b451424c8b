mod cli;
#[cfg(feature = "native")]
mod native;
mod session;

use std::process::ExitCode;

use tracing_subscriber::filter::{Directive, LevelFilter};
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{fmt, reload, EnvFilter, Registry};
use webui_common::Result;
use webui_config::WebUiSettings;

use crate::session::{EvalReport, Plan};

type LogHandle = reload::Handle<EnvFilter, Registry>;

fn env_filter(level: &str) -> EnvFilter {
    let directive = level.parse::<Directive>().unwrap_or_else(|_| {
        eprintln!("unknown log level {level:?}, using info");
        LevelFilter::INFO.into()
    });
    EnvFilter::from_default_env().add_directive(directive)
}

/// Install the subscriber. The filter can be swapped later, once the
/// config file has named its level.
fn init_logging(level: &str) -> LogHandle {
    let (filter, handle) = reload::Layer::new(env_filter(level));
    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer())
        .init();
    handle
}

/// Level used while the config file is read: `--log-level`, else info.
fn startup_level(args: &cli::Args) -> &str {
    args.log_level.as_deref().unwrap_or("info")
}

/// Level to switch to after loading, if the config asks for a different
/// one and the command line did not override it.
fn configured_level<'a>(args: &cli::Args, settings: &'a WebUiSettings) -> Option<&'a str> {
    let level = settings.logging.level.as_str();
    (args.log_level.is_none() && level != startup_level(args)).then_some(level)
}

#[cfg(feature = "native")]
fn run_native(settings: WebUiSettings, plan: &Plan) -> Result<Vec<EvalReport>> {
    let mut platform = native::NativePlatform::new()?;
    session::run(&mut platform, settings, plan)
}

#[cfg(not(feature = "native"))]
fn run_native(_settings: WebUiSettings, _plan: &Plan) -> Result<Vec<EvalReport>> {
    Err(webui_common::WebUiError::PlatformInit(
        "built without the native feature; rerun with --headless".into(),
    ))
}

fn main() -> ExitCode {
    let args = cli::parse();

    // Logging comes first so the config loader's own events are kept.
    let log = init_logging(startup_level(&args));
    tracing::info!("WebUI v{} starting...", env!("CARGO_PKG_VERSION"));

    let mut settings = match args.load_settings() {
        Ok(settings) => settings,
        Err(e) if args.config.is_some() => {
            eprintln!("error: {e}");
            return ExitCode::FAILURE;
        }
        Err(e) => {
            tracing::warn!("Config load failed, using defaults: {e}");
            WebUiSettings::default()
        }
    };
    if let Some(level) = configured_level(&args, &settings) {
        if let Err(e) = log.reload(env_filter(level)) {
            tracing::warn!("could not apply configured log level {level}: {e}");
        }
    }
    if let Err(e) = args.apply(&mut settings) {
        eprintln!("error: {e}");
        return ExitCode::FAILURE;
    }
    let css = match args.stylesheet() {
        Ok(css) => css,
        Err(e) => {
            eprintln!("error: reading stylesheet: {e}");
            return ExitCode::FAILURE;
        }
    };

    let headless = args.headless || !cfg!(feature = "native");
    let plan = Plan {
        css,
        evals: args.evals.clone(),
        keep_open: !headless,
    };

    let outcome = if headless {
        session::run(&mut webui_headless::HeadlessPlatform::new(), settings, &plan)
    } else {
        run_native(settings, &plan)
    };

    match outcome {
        Ok(reports) => {
            let mut status = ExitCode::SUCCESS;
            for report in reports {
                match report.result {
                    Ok(value) => println!("{value}"),
                    Err(e) => {
                        eprintln!("error: {}: {e}", report.source);
                        status = ExitCode::FAILURE;
                    }
                }
            }
            status
        }
        Err(e) => {
            eprintln!("error: {e}");
            ExitCode::FAILURE
        }
    }
}
