//! Algorithm Hub server wiring.
//!
//! The binary in `main.rs` loads [`Config`], initializes tracing and
//! metrics, then serves [`build_app`] until a shutdown signal.

pub mod config;

pub use config::{Config, ConfigError};

use algorithm_hub_auth::TokenVerifier;
use algorithm_hub_core::environment::SystemClock;
use algorithm_hub_postgrest::PostgrestRecordStore;
use algorithm_hub_runtime::AlgorithmService;
use algorithm_hub_runtime::metrics::PrometheusMetrics;
use algorithm_hub_web::{AppState, build_router};
use axum::Router;
use std::sync::Arc;

/// Build the HTTP application described by `config`.
///
/// `metrics` is the installed Prometheus recorder, if any.
///
/// # Errors
///
/// Fails if the record store client or the token verifier cannot be built.
pub fn build_app(config: &Config, metrics: Option<PrometheusMetrics>) -> anyhow::Result<Router> {
    let store = PostgrestRecordStore::new(config.store.to_postgrest())?;
    let service = AlgorithmService::new(Arc::new(store), Arc::new(SystemClock))
        .with_table(config.store.table.clone());
    let verifier = TokenVerifier::new(config.auth.to_auth_config()?)?;

    let mut state = AppState::new(service, verifier);
    if let Some(metrics) = metrics {
        state = state.with_metrics(metrics);
    }

    Ok(build_router(state, &config.cors_origins))
}
