//! Windowless backend for WebUI.
//!
//! Runs documents in an embedded script engine (`boa_engine`) with a small
//! DOM shim instead of a browser. Nothing is drawn; window state is
//! recorded so callers can inspect it through a `HeadlessController`.
//!
//! Used by the `webui` binary when no native toolkit is compiled in, and by
//! tests that need real script execution.

mod controller;
mod document;
mod dom;
mod engine;
mod platform;

#[cfg(test)]
mod tests;

pub use controller::{HeadlessController, WindowState};
pub use document::{decode_data_url, inline_scripts, page_title, Document, DomNode};
pub use engine::HeadlessEngine;
pub use platform::HeadlessPlatform;
