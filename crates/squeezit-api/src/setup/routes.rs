//! Route configuration and setup

use std::sync::Arc;

use axum::{
    extract::DefaultBodyLimit,
    http::{HeaderValue, Method},
    routing::{get, post},
    Json, Router,
};
use squeezit_core::{AppError, Config};
use tower::limit::ConcurrencyLimitLayer;
use tower_http::cors::{Any, CorsLayer};
use tower_http::limit::RequestBodyLimitLayer;
use tower_http::trace::TraceLayer;
use utoipa_rapidoc::RapiDoc;

use crate::api_doc;
use crate::constants::{COMPRESS_PATH, OPENAPI_PATH};
use crate::error::HttpAppError;
use crate::handlers::{compress, health, pages};
use crate::middleware::{
    request_id_middleware,
    security_headers::{security_headers_middleware, SecurityHeadersConfig},
};
use crate::state::AppState;

/// Setup all application routes
pub fn setup_routes(config: &Config, state: Arc<AppState>) -> Result<Router<()>, anyhow::Error> {
    let cors = setup_cors(config)?;
    let security_headers_config = Arc::new(SecurityHeadersConfig::new(config.is_production()));

    tracing::info!(
        http_concurrency_limit = config.http_concurrency_limit,
        max_upload_size_mb = config.max_upload_size_mb(),
        "HTTP limits enabled"
    );

    let app = Router::new()
        .route("/", get(pages::index))
        .route("/legal/{slug}", get(pages::legal_page))
        .route("/manifest.webmanifest", get(pages::manifest))
        .route("/sw.js", get(pages::service_worker))
        .route("/app.js", get(pages::app_js))
        .route("/styles.css", get(pages::styles))
        .route("/icon.svg", get(pages::icon))
        .route("/health", get(health::health_check))
        .route(COMPRESS_PATH, post(compress::compress_images))
        .route(
            OPENAPI_PATH,
            get(|| async { Json(api_doc::get_openapi_spec()) }),
        )
        .fallback(not_found)
        .with_state(state)
        .merge(RapiDoc::new(OPENAPI_PATH).path("/docs"))
        // The multipart extractor's own 2 MB cap is replaced by the configured limit below.
        .layer(DefaultBodyLimit::disable())
        .layer(ConcurrencyLimitLayer::new(config.http_concurrency_limit))
        .layer(RequestBodyLimitLayer::new(config.max_upload_size_bytes))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .layer(axum::middleware::from_fn(request_id_middleware))
        .layer(axum::middleware::from_fn_with_state(
            security_headers_config,
            security_headers_middleware,
        ));

    Ok(app)
}

async fn not_found() -> HttpAppError {
    AppError::NotFound("Not found".to_string()).into()
}

/// Setup CORS configuration
fn setup_cors(config: &Config) -> Result<CorsLayer, anyhow::Error> {
    let cors = if config.cors_origins.iter().any(|o| o == "*") {
        tracing::warn!("CORS configured to allow all origins - not recommended for production");
        CorsLayer::new()
            .allow_origin(Any)
            .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
            .allow_headers(Any)
    } else {
        let origins = config
            .cors_origins
            .iter()
            .map(|o| {
                o.parse::<HeaderValue>()
                    .map_err(|_| anyhow::anyhow!("Invalid CORS origin: {}", o))
            })
            .collect::<Result<Vec<_>, _>>()?;

        CorsLayer::new()
            .allow_origin(origins)
            .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
            .allow_headers(Any)
    };
    Ok(cors)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invalid_cors_origin_is_rejected() {
        let config = Config {
            cors_origins: vec!["https://ok.example".to_string(), "bad\norigin".to_string()],
            ..Config::default()
        };
        assert!(setup_cors(&config).is_err());
    }
}
