//! Health and metrics endpoints.
//!
//! Used by load balancers and Prometheus; neither requires authentication.

use crate::error::AppError;
use crate::state::AppState;
use axum::{Json, extract::State, http::StatusCode, http::header, response::IntoResponse};
use serde::Serialize;

/// Health check response.
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    /// Always `"healthy"` while the process serves requests
    pub status: &'static str,
    /// Service version
    pub version: &'static str,
}

/// Liveness check.
///
/// Does not touch the record store.
///
/// ```text
/// GET /health
/// {"status":"healthy","version":"0.1.0"}
/// ```
#[allow(clippy::unused_async)]
pub async fn health_check() -> (StatusCode, Json<HealthResponse>) {
    (
        StatusCode::OK,
        Json(HealthResponse {
            status: "healthy",
            version: env!("CARGO_PKG_VERSION"),
        }),
    )
}

/// Prometheus text exposition of the installed recorder.
///
/// ```text
/// GET /metrics
/// ```
///
/// # Errors
///
/// 503 when metrics are disabled or the recorder belongs to another owner.
#[allow(clippy::unused_async)]
pub async fn metrics(State(state): State<AppState>) -> Result<impl IntoResponse, AppError> {
    let rendered = state
        .metrics
        .as_ref()
        .and_then(algorithm_hub_runtime::metrics::PrometheusMetrics::render)
        .ok_or_else(|| AppError::unavailable("Metrics are not enabled"))?;

    Ok((
        [(header::CONTENT_TYPE, "text/plain; version=0.0.4")],
        rendered,
    ))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_health_check() {
        let (status, Json(body)) = health_check().await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body.status, "healthy");
    }
}
