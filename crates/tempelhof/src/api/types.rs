//! API request and response types.

use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::pipeline::Pipeline;
use crate::types::ExtractionResult;

/// API server size limit configuration.
///
/// Applied at the router layer so oversized requests are rejected with 413
/// before any extraction work begins.
#[derive(Debug, Clone, Copy)]
pub struct ApiSizeLimits {
    /// Maximum size of the entire request body in bytes.
    pub max_request_body_bytes: usize,
}

impl Default for ApiSizeLimits {
    fn default() -> Self {
        Self {
            max_request_body_bytes: 50 * 1024 * 1024,
        }
    }
}

impl ApiSizeLimits {
    /// Limit sized for uploads of at most `max_upload_bytes`, leaving room
    /// for multipart framing around the file payload.
    pub fn for_upload_limit(max_upload_bytes: usize) -> Self {
        Self {
            max_request_body_bytes: max_upload_bytes + 64 * 1024,
        }
    }

    pub fn from_mb(max_request_body_mb: usize) -> Self {
        Self {
            max_request_body_bytes: max_request_body_mb * 1024 * 1024,
        }
    }
}

/// Health check response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
}

/// Extraction response: `{text, language, type, filename}`.
pub type ExtractResponse = ExtractionResult;

/// Error response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
}

/// API server state.
#[derive(Debug, Clone)]
pub struct ApiState {
    /// The shared extraction pipeline.
    pub pipeline: Arc<Pipeline>,
}
