//! Application state shared by all handlers.

use std::sync::Arc;

use squeezit_core::Config;
use squeezit_services::TranscodeService;

pub struct AppState {
    pub config: Config,
    pub transcode_service: TranscodeService,
}

impl AppState {
    pub fn new(config: Config, transcode_service: TranscodeService) -> Arc<Self> {
        Arc::new(Self {
            config,
            transcode_service,
        })
    }
}
