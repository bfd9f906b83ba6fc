//! Photobooth HTTP server.
//!
//! Wires the `PostgreSQL` stores into the core and serves the API.

mod config;
mod metrics;

use anyhow::Context;
use config::{redact_url, Config};
use photobooth_core::SystemClock;
use photobooth_postgres::{PgPoolOptions, PostgresStores};
use photobooth_web::{build_router, AppState, Repositories};
use std::sync::Arc;
use std::time::Duration;
use tokio::signal;
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    init_tracing();

    info!("Starting photobooth server");

    let config = Config::from_env().context("Failed to load configuration")?;
    info!(
        database_url = %redact_url(&config.postgres.url),
        token_ttl = ?config.tokens.ttl,
        "Configuration loaded"
    );

    let prometheus = metrics::install()?;
    metrics::serve(config.server.metrics_address()?, prometheus).await?;

    info!("Connecting to database...");
    let pool = PgPoolOptions::new()
        .max_connections(config.postgres.max_connections)
        .min_connections(config.postgres.min_connections)
        .acquire_timeout(config.postgres.connect_timeout)
        .connect(&config.postgres.url)
        .await
        .context("Failed to connect to PostgreSQL")?;
    info!("Database connected");

    let stores = PostgresStores::new(pool.clone());
    let repositories = Repositories {
        branches: Arc::new(stores.branches),
        booths: Arc::new(stores.booths),
        sessions: Arc::new(stores.sessions),
        vouchers: Arc::new(stores.vouchers),
        photos: Arc::new(stores.photos),
        frames: Arc::new(stores.frames),
        filters: Arc::new(stores.filters),
        payments: Arc::new(stores.payments),
        users: Arc::new(stores.users),
        telemetry: Arc::new(stores.telemetry),
    };
    let state = AppState::new(repositories, Arc::new(SystemClock), config.tokens.clone());
    let app = build_router(state);

    let addr = config.server.address();
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind {addr}"))?;
    info!(address = %addr, "Server listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal(config.server.shutdown_timeout))
        .await?;

    pool.close().await;
    info!("Server stopped");
    Ok(())
}

/// Install the global subscriber. `LOG_FORMAT=json` switches to JSON lines.
fn init_tracing() {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "photobooth=info,tower_http=info".into());
    let json = std::env::var("LOG_FORMAT").is_ok_and(|format| format.eq_ignore_ascii_case("json"));

    let registry = tracing_subscriber::registry().with(filter);
    if json {
        registry.with(tracing_subscriber::fmt::layer().json()).init();
    } else {
        registry.with(tracing_subscriber::fmt::layer()).init();
    }
}

/// Resolve on Ctrl+C or SIGTERM, then arm a watchdog that exits the process
/// if in-flight requests have not drained within `timeout`.
async fn shutdown_signal(timeout: Duration) {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            warn!(error = %e, "Failed to listen for Ctrl+C");
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
                warn!(error = %e, "Failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {
            info!("Received Ctrl+C signal, shutting down gracefully...");
        },
        () = terminate => {
            info!("Received SIGTERM signal, shutting down gracefully...");
        },
    }

    tokio::spawn(async move {
        tokio::time::sleep(timeout).await;
        warn!(timeout_secs = timeout.as_secs(), "Graceful shutdown timed out, exiting");
        std::process::exit(1);
    });
}
