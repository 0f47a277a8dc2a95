//! Application setup: state construction, routes and server lifecycle.

pub mod routes;
pub mod server;

use std::sync::Arc;

use axum::Router;
use squeezit_core::Config;
use squeezit_services::{ImageTranscoder, TranscodeService};

use crate::state::AppState;

/// Build the shared state and the fully layered router.
pub fn initialize_app(config: Config) -> Result<(Arc<AppState>, Router), anyhow::Error> {
    config.validate()?;

    let transcode_service = TranscodeService::new(Arc::new(ImageTranscoder::new()));
    let state = AppState::new(config.clone(), transcode_service);

    let router = routes::setup_routes(&config, state.clone())?;

    tracing::info!(
        environment = %config.environment,
        default_target_format = %config.default_target_format,
        "Application initialized"
    );

    Ok((state, router))
}
