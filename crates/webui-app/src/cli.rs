use std::path::PathBuf;

use clap::{Parser, ValueEnum};
use webui_common::{BorderMode, ConfigError};
use webui_config::WebUiSettings;

/// WebUI: open a web page in a native window and script it from the host.
#[derive(Parser, Debug)]
#[command(name = "webui", version, about)]
pub struct Args {
    /// Config file path override.
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// URL to open.
    #[arg(long, conflicts_with = "html")]
    pub url: Option<String>,

    /// HTML file to render instead of a URL.
    #[arg(long)]
    pub html: Option<PathBuf>,

    /// Window title.
    #[arg(long)]
    pub title: Option<String>,

    #[arg(long)]
    pub width: Option<u32>,

    #[arg(long)]
    pub height: Option<u32>,

    /// Window border.
    #[arg(long, value_enum, ignore_case = true)]
    pub border: Option<BorderArg>,

    /// Enable developer tools and console forwarding.
    #[arg(long)]
    pub debug: bool,

    /// Script to run once the page is ready (repeatable). Results are
    /// printed to stdout.
    #[arg(short = 'e', long = "eval", value_name = "JS")]
    pub evals: Vec<String>,

    /// Stylesheet file injected before the scripts run.
    #[arg(long)]
    pub css: Option<PathBuf>,

    /// Log level override (trace, debug, info, warn, error).
    #[arg(long)]
    pub log_level: Option<String>,

    /// Run without a native window, exiting after the scripts.
    #[arg(long)]
    pub headless: bool,
}

pub fn parse() -> Args {
    Args::parse()
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum BorderArg {
    Sizable,
    Dialog,
    None,
}

impl From<BorderArg> for BorderMode {
    fn from(arg: BorderArg) -> Self {
        match arg {
            BorderArg::Sizable => BorderMode::Sizable,
            BorderArg::Dialog => BorderMode::Dialog,
            BorderArg::None => BorderMode::None,
        }
    }
}

impl Args {
    /// Settings from `--config`, or from the default location.
    pub fn load_settings(&self) -> Result<WebUiSettings, ConfigError> {
        match &self.config {
            Some(path) => webui_config::load_from_path(path),
            None => webui_config::load_default(),
        }
    }

    /// Apply command-line overrides on top of loaded settings.
    pub fn apply(&self, settings: &mut WebUiSettings) -> std::io::Result<()> {
        if let Some(url) = &self.url {
            settings.content.url = url.clone();
            settings.content.html.clear();
        }
        if let Some(path) = &self.html {
            settings.content.html = std::fs::read_to_string(path)?;
            settings.content.url.clear();
        }
        if let Some(title) = &self.title {
            settings.window.title = title.clone();
        }
        if let Some(width) = self.width {
            settings.window.width = width;
        }
        if let Some(height) = self.height {
            settings.window.height = height;
        }
        if let Some(border) = self.border {
            settings.window.border = border.into();
        }
        if self.debug {
            settings.engine.debug = true;
        }
        if let Some(level) = &self.log_level {
            settings.logging.level = level.clone();
        }
        Ok(())
    }

    pub fn stylesheet(&self) -> std::io::Result<Option<String>> {
        self.css.as_ref().map(std::fs::read_to_string).transpose()
    }
}
