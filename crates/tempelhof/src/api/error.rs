//! API error mapping.

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};

use crate::error::TempelhofError;

use super::types::ErrorResponse;

/// An error surfaced through the HTTP API.
///
/// Wraps [`TempelhofError`] and maps its taxonomy onto status codes:
/// validation problems are the client's fault (400/413), a blown deadline is
/// 408, everything else is a 500 with a human-readable reason - never a
/// stack trace.
#[derive(Debug)]
pub struct ApiError(TempelhofError);

impl ApiError {
    pub fn validation(message: impl Into<String>) -> Self {
        Self(TempelhofError::validation(message))
    }

    pub fn status(&self) -> StatusCode {
        match &self.0 {
            TempelhofError::Validation { .. } => StatusCode::BAD_REQUEST,
            TempelhofError::PayloadTooLarge { .. } => StatusCode::PAYLOAD_TOO_LARGE,
            TempelhofError::Timeout { .. } => StatusCode::REQUEST_TIMEOUT,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl From<TempelhofError> for ApiError {
    fn from(error: TempelhofError) -> Self {
        Self(error)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();

        if status.is_server_error() {
            tracing::error!("Extraction request failed: {}", self.0);
        } else {
            tracing::debug!("Extraction request rejected: {}", self.0);
        }

        let body = ErrorResponse {
            error: self.0.to_string(),
        };

        (status, Json(body)).into_response()
    }
}
