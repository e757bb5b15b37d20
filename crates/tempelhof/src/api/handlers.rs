//! API request handlers.

use axum::Json;
use axum::extract::multipart::MultipartError;
use axum::extract::{Multipart, State};
use axum::http::StatusCode;

use crate::error::TempelhofError;

use super::error::ApiError;
use super::types::{ApiState, ExtractResponse, HealthResponse};

/// Extract endpoint handler.
///
/// POST /extract
///
/// Accepts multipart form data with a single `file` field. Returns the
/// extraction result for that file. Request body size is limited at the
/// router layer, so oversized uploads are rejected with 413 before the
/// handler runs.
pub async fn extract_handler(
    State(state): State<ApiState>,
    mut multipart: Multipart,
) -> Result<Json<ExtractResponse>, ApiError> {
    let limit = state.pipeline.config().max_upload_bytes;
    let mut upload: Option<(String, Vec<u8>)> = None;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| map_multipart_error(e, limit))?
    {
        if field.name() != Some("file") {
            continue;
        }

        let filename = field.file_name().unwrap_or_default().to_string();
        let data = field
            .bytes()
            .await
            .map_err(|e| map_multipart_error(e, limit))?;
        upload = Some((filename, data.to_vec()));
    }

    let Some((filename, data)) = upload else {
        return Err(ApiError::validation("no file provided"));
    };

    if filename.is_empty() {
        return Err(ApiError::validation("empty filename"));
    }

    let result = state.pipeline.extract(&data, &filename).await?;
    Ok(Json(result))
}

/// Health check endpoint handler.
///
/// GET /health - liveness only, performs no extraction work.
pub async fn health_handler() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".to_string(),
    })
}

/// Multipart decoding failures are client errors, except when the body limit
/// tripped mid-field - that is the payload-size rejection and must stay 413.
fn map_multipart_error(error: MultipartError, limit: usize) -> ApiError {
    if error.status() == StatusCode::PAYLOAD_TOO_LARGE {
        ApiError::from(TempelhofError::PayloadTooLarge { limit })
    } else {
        ApiError::validation(format!("Invalid multipart request: {}", error.body_text()))
    }
}
