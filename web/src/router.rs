//! Router assembly.

use crate::handlers::{algorithms, auth, health};
use crate::middleware::correlation_id_layer;
use crate::state::AppState;
use axum::{Router, http::HeaderValue, routing::get, routing::post};
use tower_http::cors::{AllowHeaders, AllowMethods, AllowOrigin, CorsLayer};
use tower_http::trace::TraceLayer;

/// Build the complete Axum router.
///
/// | Route | Auth |
/// |-------|------|
/// | `GET /health` | no |
/// | `GET /metrics` | no |
/// | `GET /api/v1/algorithms/types` | no |
/// | `POST /api/v1/algorithms/process` | yes |
/// | `GET /api/v1/algorithms/history` | yes |
/// | `GET /api/v1/algorithms/requests/:id` | yes |
/// | `GET /api/v1/algorithms/stats` | yes |
/// | `GET /api/v1/auth/me` | yes |
///
/// `cors_origins` lists browser origins allowed to call the API with
/// credentials; entries that are not valid header values are skipped.
/// With no origins, no CORS headers are emitted.
pub fn build_router(state: AppState, cors_origins: &[String]) -> Router {
    let algorithm_routes = Router::new()
        .route("/process", post(algorithms::process))
        .route("/history", get(algorithms::history))
        .route("/requests/:id", get(algorithms::request))
        .route("/types", get(algorithms::types))
        .route("/stats", get(algorithms::stats));

    let auth_routes = Router::new().route("/me", get(auth::me));

    let api_routes = Router::new()
        .nest("/algorithms", algorithm_routes)
        .nest("/auth", auth_routes);

    let mut router = Router::new()
        .route("/health", get(health::health_check))
        .route("/metrics", get(health::metrics))
        .nest("/api/v1", api_routes)
        .with_state(state);

    if let Some(cors) = cors_layer(cors_origins) {
        router = router.layer(cors);
    }

    router
        .layer(TraceLayer::new_for_http())
        .layer(correlation_id_layer())
}

fn cors_layer(origins: &[String]) -> Option<CorsLayer> {
    let origins: Vec<HeaderValue> = origins
        .iter()
        .filter_map(|origin| {
            HeaderValue::from_str(origin.trim_end_matches('/'))
                .map_err(|_| tracing::warn!(origin = %origin, "Ignoring invalid CORS origin"))
                .ok()
        })
        .collect();

    if origins.is_empty() {
        return None;
    }

    Some(
        CorsLayer::new()
            .allow_origin(AllowOrigin::list(origins))
            .allow_methods(AllowMethods::mirror_request())
            .allow_headers(AllowHeaders::mirror_request())
            .allow_credentials(true),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cors_layer_skipped_without_origins() {
        assert!(cors_layer(&[]).is_none());
        assert!(cors_layer(&["bad\norigin".to_string()]).is_none());
        assert!(cors_layer(&["http://localhost:3000/".to_string()]).is_some());
    }
}
