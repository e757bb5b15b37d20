//! API server setup and configuration.

use std::net::{IpAddr, SocketAddr};
use std::sync::Arc;

use axum::Router;
use axum::extract::DefaultBodyLimit;
use axum::routing::{get, post};
use tower_http::cors::{AllowOrigin, Any, CorsLayer};
use tower_http::limit::RequestBodyLimitLayer;
use tower_http::trace::TraceLayer;

use crate::config::ExtractionConfig;
use crate::error::{Result, TempelhofError};
use crate::pipeline::Pipeline;

use super::handlers::{extract_handler, health_handler};
use super::types::{ApiSizeLimits, ApiState};

/// Create the API router with limits derived from the config's upload cap.
///
/// Public to allow embedding the router in a larger application.
pub fn create_router(config: ExtractionConfig) -> Router {
    let limits = ApiSizeLimits::for_upload_limit(config.max_upload_bytes);
    create_router_with_limits(config, limits)
}

/// Create the API router with explicit size limits.
pub fn create_router_with_limits(config: ExtractionConfig, limits: ApiSizeLimits) -> Router {
    let state = ApiState {
        pipeline: Arc::new(Pipeline::new(config)),
    };

    Router::new()
        .route("/extract", post(extract_handler))
        .route("/health", get(health_handler))
        .layer(DefaultBodyLimit::max(limits.max_request_body_bytes))
        .layer(RequestBodyLimitLayer::new(limits.max_request_body_bytes))
        .layer(cors_layer_from_env())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// CORS policy from `TEMPELHOF_CORS_ORIGINS` (comma-separated allowlist).
///
/// Without the variable all origins are allowed, which is acceptable for
/// development only; production deployments should set an explicit list.
fn cors_layer_from_env() -> CorsLayer {
    if let Ok(origins_str) = std::env::var("TEMPELHOF_CORS_ORIGINS") {
        let origins: Vec<_> = origins_str
            .split(',')
            .filter(|s| !s.trim().is_empty())
            .filter_map(|s| s.trim().parse::<axum::http::HeaderValue>().ok())
            .collect();

        if !origins.is_empty() {
            tracing::info!("CORS configured with {} explicit allowed origin(s)", origins.len());
            return CorsLayer::new()
                .allow_origin(AllowOrigin::list(origins))
                .allow_methods(Any)
                .allow_headers(Any);
        }

        tracing::warn!(
            "TEMPELHOF_CORS_ORIGINS set but empty/invalid - falling back to permissive CORS"
        );
    } else {
        tracing::warn!(
            "CORS allows all origins (default). Set TEMPELHOF_CORS_ORIGINS to a comma-separated \
             allowlist for production"
        );
    }

    CorsLayer::new().allow_origin(Any).allow_methods(Any).allow_headers(Any)
}

/// Start the API server with config file discovery and env overrides.
///
/// Searches for `tempelhof.toml` in the current and parent directories, then
/// applies `TEMPELHOF_*` environment variables on top.
pub async fn serve(host: impl AsRef<str>, port: u16) -> Result<()> {
    let mut config = match ExtractionConfig::discover()? {
        Some(config) => {
            tracing::info!("Loaded extraction config from discovered file");
            config
        }
        None => {
            tracing::info!("No config file found, using default configuration");
            ExtractionConfig::default()
        }
    };
    config.apply_env_overrides();

    serve_with_config(host, port, config).await
}

/// Start the API server with an explicit config.
pub async fn serve_with_config(
    host: impl AsRef<str>,
    port: u16,
    config: ExtractionConfig,
) -> Result<()> {
    let ip: IpAddr = host
        .as_ref()
        .parse()
        .map_err(|e| TempelhofError::validation(format!("Invalid host address: {}", e)))?;

    let addr = SocketAddr::new(ip, port);
    let app = create_router(config);

    tracing::info!("Starting tempelhof API server on http://{}:{}", ip, port);

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .map_err(TempelhofError::Io)?;

    axum::serve(listener, app)
        .await
        .map_err(|e| TempelhofError::Other(e.to_string()))?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_create_router() {
        let config = ExtractionConfig::default();
        let _router = create_router(config);
    }

    #[test]
    fn test_limits_leave_framing_headroom() {
        let limits = ApiSizeLimits::for_upload_limit(50 * 1024 * 1024);
        assert!(limits.max_request_body_bytes > 50 * 1024 * 1024);
    }

    #[test]
    fn test_limits_from_mb() {
        let limits = ApiSizeLimits::from_mb(5);
        assert_eq!(limits.max_request_body_bytes, 5 * 1024 * 1024);
    }
}
