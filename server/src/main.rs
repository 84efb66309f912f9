//! Algorithm Hub HTTP server.
//!
//! # Usage
//!
//! ```bash
//! export POSTGREST_URL=https://project.example.co
//! export POSTGREST_API_KEY=...
//! export JWT_SECRET_KEY=...
//! cargo run --bin algorithm-hub
//! ```

use algorithm_hub_runtime::metrics::PrometheusMetrics;
use algorithm_hub_server::{Config, build_app};
use anyhow::Context;
use std::future::IntoFuture;
use std::time::Duration;
use tokio::signal;
use tracing::{error, info, warn};
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env file
    let _ = dotenvy::dotenv();

    let config = Config::from_env().context("Failed to load configuration")?;

    tracing_subscriber::registry()
        .with(
            EnvFilter::try_new(&config.server.log_level)
                .unwrap_or_else(|_| EnvFilter::new(algorithm_hub_server::config::DEFAULT_LOG_FILTER)),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!(
        environment = %config.environment,
        store_url = %config.store.url,
        table = %config.store.table,
        metrics_enabled = config.server.metrics_enabled,
        "Configuration loaded"
    );

    let metrics = if config.server.metrics_enabled {
        Some(PrometheusMetrics::install().context("Failed to install metrics recorder")?)
    } else {
        None
    };

    let app = build_app(&config, metrics)?;

    let addr = config.bind_address();
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind {addr}"))?;
    info!(address = %addr, "Starting HTTP server");

    let (signalled_tx, signalled_rx) = tokio::sync::oneshot::channel::<()>();
    let server = axum::serve(listener, app)
        .with_graceful_shutdown(async move {
            shutdown_signal().await;
            let _ = signalled_tx.send(());
        })
        .into_future();

    let drain_timeout = Duration::from_secs(config.server.shutdown_timeout);
    tokio::select! {
        result = server => result.context("HTTP server failed")?,
        () = async {
            if signalled_rx.await.is_ok() {
                tokio::time::sleep(drain_timeout).await;
            } else {
                std::future::pending::<()>().await;
            }
        } => {
            warn!(timeout_secs = drain_timeout.as_secs(), "In-flight requests did not finish in time");
        }
    }

    info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            error!(error = %e, "Failed to listen for Ctrl+C");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(e) => {
                error!(error = %e, "Failed to listen for SIGTERM");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => info!("Received Ctrl+C signal, shutting down gracefully..."),
        () = terminate => info!("Received SIGTERM signal, shutting down gracefully..."),
    }
}
