//! Application state for Axum handlers.

use algorithm_hub_auth::TokenVerifier;
use algorithm_hub_runtime::AlgorithmService;
use algorithm_hub_runtime::metrics::PrometheusMetrics;
use axum::extract::FromRef;
use std::sync::Arc;

/// Shared resources for every HTTP handler.
///
/// Cloned per request; every field is cheap to clone.
#[derive(Clone, Debug)]
pub struct AppState {
    /// Algorithm dispatcher
    pub service: AlgorithmService,
    /// Bearer token verifier used by [`AuthUser`](crate::extractors::AuthUser)
    pub verifier: Arc<TokenVerifier>,
    /// Prometheus recorder, when metrics are enabled
    pub metrics: Option<PrometheusMetrics>,
}

impl AppState {
    /// Create application state without a metrics endpoint.
    #[must_use]
    pub fn new(service: AlgorithmService, verifier: TokenVerifier) -> Self {
        Self {
            service,
            verifier: Arc::new(verifier),
            metrics: None,
        }
    }

    /// Serve `/metrics` from `metrics`.
    #[must_use]
    pub fn with_metrics(mut self, metrics: PrometheusMetrics) -> Self {
        self.metrics = Some(metrics);
        self
    }
}

impl FromRef<AppState> for Arc<TokenVerifier> {
    fn from_ref(state: &AppState) -> Self {
        Arc::clone(&state.verifier)
    }
}
