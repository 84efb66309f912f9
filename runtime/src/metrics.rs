//! Prometheus metrics for the dispatcher and its record store.
//!
//! Metrics are emitted through the `metrics` facade. Until a recorder is
//! installed they are no-ops, so the dispatcher works unchanged in tests.
//!
//! # Example
//!
//! ```rust,no_run
//! use algorithm_hub_runtime::metrics::PrometheusMetrics;
//!
//! # fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let metrics = PrometheusMetrics::install()?;
//! if let Some(text) = metrics.render() {
//!     println!("{text}");
//! }
//! # Ok(())
//! # }
//! ```

use algorithm_hub_core::{AlgorithmKind, RequestStatus};
use metrics::{describe_counter, describe_histogram};
use metrics_exporter_prometheus::{Matcher, PrometheusBuilder, PrometheusHandle};
use std::time::Duration;
use thiserror::Error;

// Re-export metrics macros for use in other modules
pub use metrics::{counter, histogram};

/// Errors from metrics operations.
#[derive(Error, Debug)]
pub enum MetricsError {
    /// Failed to build metrics exporter
    #[error("Failed to build metrics exporter: {0}")]
    Build(String),
    /// Failed to install metrics exporter
    #[error("Failed to install metrics exporter: {0}")]
    Install(String),
}

/// Installed Prometheus recorder.
///
/// The process-wide recorder can only be installed once. Later calls to
/// [`PrometheusMetrics::install`] succeed without a handle, so
/// [`PrometheusMetrics::render`] returns `None` for them.
#[derive(Clone)]
pub struct PrometheusMetrics {
    handle: Option<PrometheusHandle>,
}

impl std::fmt::Debug for PrometheusMetrics {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PrometheusMetrics")
            .field("installed", &self.handle.is_some())
            .finish()
    }
}

impl PrometheusMetrics {
    /// Register metric descriptions and install the global Prometheus recorder.
    ///
    /// # Errors
    ///
    /// Returns error if the exporter cannot be built or installed for a reason
    /// other than a recorder already being present.
    pub fn install() -> Result<Self, MetricsError> {
        register_metrics();

        let builder = PrometheusBuilder::new()
            .set_buckets_for_metric(
                Matcher::Suffix("duration_seconds".to_string()),
                &[
                    0.000_1, 0.000_5, 0.001, 0.005, 0.01, 0.025, 0.05, 0.1, 0.25, 0.5, 1.0,
                ],
            )
            .map_err(|e| MetricsError::Build(e.to_string()))?;

        match builder.install_recorder() {
            Ok(handle) => {
                tracing::info!("Prometheus metrics recorder installed");
                Ok(Self {
                    handle: Some(handle),
                })
            }
            Err(e) => {
                let err_msg = e.to_string();
                if err_msg.contains("already initialized") {
                    tracing::warn!("Metrics recorder already initialized, skipping re-initialization");
                    Ok(Self { handle: None })
                } else {
                    Err(MetricsError::Install(err_msg))
                }
            }
        }
    }

    /// Get the metrics handle for rendering.
    #[must_use]
    pub const fn handle(&self) -> Option<&PrometheusHandle> {
        self.handle.as_ref()
    }

    /// Render current metrics in Prometheus text format.
    ///
    /// Returns `None` if this instance did not install the recorder.
    #[must_use]
    pub fn render(&self) -> Option<String> {
        self.handle.as_ref().map(PrometheusHandle::render)
    }
}

/// Register all metric descriptions.
pub fn register_metrics() {
    describe_counter!(
        "algorithm_requests_total",
        "Total number of algorithm requests by kind and terminal status"
    );
    describe_histogram!(
        "algorithm_execution_duration_seconds",
        "Time spent inside a numeric routine"
    );
    describe_counter!(
        "record_store_errors_total",
        "Total number of record store operations that failed"
    );
}

/// Dispatcher metrics recorder.
pub struct AlgorithmMetrics;

impl AlgorithmMetrics {
    /// Record a request reaching a terminal status.
    pub fn record_request(kind: AlgorithmKind, status: RequestStatus) {
        counter!(
            "algorithm_requests_total",
            "kind" => kind.as_str(),
            "status" => status.as_str()
        )
        .increment(1);
    }

    /// Record time spent executing a routine.
    pub fn record_execution(kind: AlgorithmKind, duration: Duration) {
        histogram!("algorithm_execution_duration_seconds", "kind" => kind.as_str())
            .record(duration.as_secs_f64());
    }
}

/// Record store metrics recorder.
pub struct RecordStoreMetrics;

impl RecordStoreMetrics {
    /// Record a failed store operation (`create`, `update`, `list`, `get`).
    pub fn record_error(operation: &'static str) {
        counter!("record_store_errors_total", "operation" => operation).increment(1);
    }
}
