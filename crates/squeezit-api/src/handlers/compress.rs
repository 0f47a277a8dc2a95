use std::sync::Arc;

use axum::{
    extract::{Multipart, State},
    Json,
};
use squeezit_core::{CompressResponse, Format, UploadedImage};

use crate::constants::{FORMAT_FIELD, IMAGES_FIELD};
use crate::error::{ErrorResponse, HttpAppError};
use crate::state::AppState;

/// Resolve the `format` field. A missing or empty field falls back to the
/// configured default; anything else must be an exact format token.
fn resolve_target_format(token: Option<&str>, default: Format) -> Result<Format, HttpAppError> {
    match token {
        Some(token) if !token.is_empty() => Ok(token.parse::<Format>()?),
        _ => Ok(default),
    }
}

/// Compress or convert uploaded images
///
/// Every `images` part is transcoded to the requested format and returned as
/// a data URI. The response holds one entry per part in submission order; a
/// file that cannot be transcoded yields an `{error, originalSize}` entry and
/// does not affect the others.
#[utoipa::path(
    post,
    path = "/api/compress",
    tag = "compress",
    request_body(content = inline(Object), content_type = "multipart/form-data",
        description = "Repeated `images` file parts and one `format` field"),
    responses(
        (status = 200, description = "One entry per uploaded file", body = CompressResponse),
        (status = 400, description = "Unsupported format or malformed form", body = ErrorResponse),
        (status = 413, description = "Request body too large", body = ErrorResponse)
    )
)]
#[tracing::instrument(skip(state, multipart), fields(operation = "compress_images"))]
pub async fn compress_images(
    State(state): State<Arc<AppState>>,
    mut multipart: Multipart,
) -> Result<Json<CompressResponse>, HttpAppError> {
    let mut images = Vec::new();
    let mut format_token: Option<String> = None;

    while let Some(field) = multipart.next_field().await? {
        let field_name = field.name().map(str::to_string);

        match field_name.as_deref() {
            Some(IMAGES_FIELD) => {
                let file_name = field.file_name().map(str::to_string);
                let content_type = field.content_type().map(str::to_string);
                let data = field.bytes().await?;

                tracing::debug!(
                    index = images.len(),
                    file_name = ?file_name,
                    content_type = ?content_type,
                    bytes = data.len(),
                    "Received image part"
                );

                images.push(UploadedImage {
                    file_name,
                    content_type,
                    data: data.to_vec(),
                });
            }
            Some(FORMAT_FIELD) => {
                let token = field.text().await?;
                // Reject early when the format arrives ahead of the files.
                resolve_target_format(Some(&token), state.config.default_target_format)?;
                format_token = Some(token);
            }
            other => {
                tracing::debug!(field = ?other, "Ignoring unknown form field");
            }
        }
    }

    let target = resolve_target_format(
        format_token.as_deref(),
        state.config.default_target_format,
    )?;

    tracing::info!(files = images.len(), target = %target, "Compress request");

    let files = state
        .transcode_service
        .transcode_batch(images, target)
        .await;

    Ok(Json(CompressResponse { files }))
}
