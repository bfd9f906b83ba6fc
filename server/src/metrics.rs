//! Prometheus exporter.
//!
//! Installs the global `metrics` recorder and serves the rendered registry
//! on its own listener so scrapes never share the API port.

use axum::{routing::get, Router};
use metrics_exporter_prometheus::{PrometheusBuilder, PrometheusHandle};
use std::net::SocketAddr;
use thiserror::Error;

/// Errors from metrics setup.
#[derive(Error, Debug)]
pub enum MetricsError {
    /// Failed to install metrics exporter
    #[error("Failed to install metrics exporter: {0}")]
    Install(String),
    /// Failed to bind HTTP server
    #[error("Failed to bind metrics server: {0}")]
    Bind(#[from] std::io::Error),
}

/// Install the Prometheus recorder and describe the core's metrics.
///
/// # Errors
///
/// Returns [`MetricsError::Install`] if a recorder is already installed.
pub fn install() -> Result<PrometheusHandle, MetricsError> {
    let handle = PrometheusBuilder::new()
        .install_recorder()
        .map_err(|e| MetricsError::Install(e.to_string()))?;
    photobooth_core::constants::describe_metrics();
    Ok(handle)
}

/// Router exposing `GET /metrics`.
pub fn router(handle: PrometheusHandle) -> Router {
    Router::new().route(
        "/metrics",
        get(move || {
            let handle = handle.clone();
            async move { handle.render() }
        }),
    )
}

/// Bind `addr` and serve [`router`] in a background task.
///
/// # Errors
///
/// Returns [`MetricsError::Bind`] if the address is unavailable.
pub async fn serve(addr: SocketAddr, handle: PrometheusHandle) -> Result<(), MetricsError> {
    let listener = tokio::net::TcpListener::bind(addr).await?;
    tracing::info!(%addr, "Metrics available at http://{addr}/metrics");

    tokio::spawn(async move {
        if let Err(e) = axum::serve(listener, router(handle)).await {
            tracing::error!(error = %e, "Metrics server stopped");
        }
    });
    Ok(())
}
