use std::sync::Arc;

use tracing::debug;
use webui_common::Result;
use webui_config::WebUiSettings;
use webui_core::{EventSink, Platform, RenderEngine};

use crate::controller::{lock, HeadlessController, Shared};
use crate::engine::HeadlessEngine;

/// Opens headless windows and keeps a controller for each.
#[derive(Debug, Default)]
pub struct HeadlessPlatform {
    controllers: Vec<HeadlessController>,
}

impl HeadlessPlatform {
    pub fn new() -> Self {
        Self::default()
    }

    /// Controllers of every window opened so far, oldest first.
    pub fn controllers(&self) -> &[HeadlessController] {
        &self.controllers
    }

    pub fn last_controller(&self) -> Option<HeadlessController> {
        self.controllers.last().cloned()
    }
}

impl Platform for HeadlessPlatform {
    fn create(
        &mut self,
        settings: &WebUiSettings,
        sink: EventSink,
    ) -> Result<Box<dyn RenderEngine>> {
        let shared = Arc::new(Shared::default());
        {
            let mut window = lock(&shared.window);
            window.title = settings.window.title.clone();
            window.size = settings.size();
            window.min_size = settings.min_size();
        }
        self.controllers.push(HeadlessController {
            shared: Arc::clone(&shared),
        });
        debug!(
            title = %settings.window.title,
            index = self.controllers.len() - 1,
            "headless window created"
        );
        Ok(Box::new(HeadlessEngine::new(
            shared,
            sink,
            settings.engine.debug,
        )))
    }
}
