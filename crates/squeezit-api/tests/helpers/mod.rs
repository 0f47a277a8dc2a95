//! Test helpers: build the router around the real image transcoder.
//!
//! Run with: `cargo test -p squeezit-api`

pub mod fixtures;

use std::sync::Arc;

use axum_test::TestServer;
use squeezit_api::setup::routes;
use squeezit_api::state::AppState;
use squeezit_core::Config;
use squeezit_services::{ImageTranscoder, TranscodeService, Transcoder};

pub fn setup_test_server() -> TestServer {
    setup_test_server_with(Config::default())
}

pub fn setup_test_server_with(config: Config) -> TestServer {
    build_server(config, Arc::new(ImageTranscoder::new()))
}

/// Server whose batches go through the given transcoder instead of the real codecs.
pub fn setup_test_server_with_transcoder(transcoder: Arc<dyn Transcoder>) -> TestServer {
    build_server(Config::default(), transcoder)
}

fn build_server(config: Config, transcoder: Arc<dyn Transcoder>) -> TestServer {
    let service = TranscodeService::new(transcoder);
    let state = AppState::new(config.clone(), service);
    let router = routes::setup_routes(&config, state).expect("routes");
    TestServer::new(router).expect("test server")
}
