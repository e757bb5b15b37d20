//! REST API server for the document ingestion pipeline.
//!
//! Axum-based HTTP surface over [`crate::pipeline::Pipeline`].
//!
//! # Endpoints
//!
//! - `POST /extract` - extract text from one uploaded file (multipart field `file`)
//! - `GET /health` - liveness probe
//!
//! # cURL Examples
//!
//! ```bash
//! # Extract a document
//! curl -F "file=@document.pdf" http://localhost:5001/extract
//!
//! # Health check
//! curl http://localhost:5001/health
//! ```

mod error;
mod handlers;
mod server;
mod types;

pub use error::ApiError;
pub use server::{create_router, create_router_with_limits, serve, serve_with_config};
pub use types::{ApiSizeLimits, ApiState, ErrorResponse, ExtractResponse, HealthResponse};
