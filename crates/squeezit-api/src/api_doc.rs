//! OpenAPI documentation.

use utoipa::OpenApi;

use crate::error;
use crate::handlers;
use squeezit_core::{models, Format};

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Squeezit API",
        version = "0.1.0",
        description = "Compress and convert images. Results come back inline as base64 data URIs; nothing is stored."
    ),
    paths(
        handlers::compress::compress_images,
        handlers::health::health_check,
    ),
    components(schemas(
        models::CompressResponse,
        models::FileOutcome,
        models::TranscodeResult,
        models::TranscodeFailure,
        Format,
        error::ErrorResponse,
        handlers::health::HealthResponse,
    )),
    tags(
        (name = "compress", description = "Image transcoding"),
        (name = "health", description = "Service health")
    )
)]
pub struct ApiDoc;

pub fn get_openapi_spec() -> utoipa::openapi::OpenApi {
    ApiDoc::openapi()
}
