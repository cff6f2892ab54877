//! # gapwise-api: Binary Entry Point
//!
//! Starts the Axum HTTP server. Configuration comes from the environment:
//! `PORT` (default 8080), `AUTH_TOKEN`, `DATABASE_URL`, `GAPWISE_CATALOG`,
//! `CORS_ALLOW_ORIGIN`, `SESSION_TTL_SECS`, `MAX_SESSIONS`, `RUST_LOG` and
//! `LOG_FORMAT=json`.

use std::sync::Arc;

use gapwise_api::state::SESSION_SWEEP_INTERVAL;
use gapwise_api::{AppConfig, AppState};
use gapwise_catalog::ControlCatalog;
use metrics_exporter_prometheus::PrometheusBuilder;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    init_tracing();

    let config = AppConfig::from_env();
    tracing::info!(?config, "starting gapwise-api");

    let catalog = match &config.catalog_path {
        Some(path) => ControlCatalog::load(path),
        None => ControlCatalog::ecc_default(),
    }
    .map_err(|e| {
        tracing::error!("Catalog load failed: {e}");
        e
    })?;
    tracing::info!(
        framework = catalog.framework(),
        controls = catalog.total_controls(),
        "control catalog loaded"
    );

    let metrics_handle = PrometheusBuilder::new().install_recorder().map_err(|e| {
        tracing::error!("Metrics recorder installation failed: {e}");
        e
    })?;

    // Optional: absent DATABASE_URL means in-memory only.
    let db_pool = gapwise_api::db::init_pool().await.map_err(|e| {
        tracing::error!("Database initialization failed: {e}");
        e
    })?;

    let port = config.port;
    let state = AppState::with_config(config, Arc::new(catalog), db_pool)
        .with_metrics(metrics_handle);

    state.hydrate_from_db().await.map_err(|e| {
        tracing::error!("Database hydration failed: {e}");
        e
    })?;

    let sweeper = state.spawn_session_sweeper(SESSION_SWEEP_INTERVAL);
    let app = gapwise_api::app(state);

    let addr = std::net::SocketAddr::from(([0, 0, 0, 0], port));
    tracing::info!("gapwise API listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    sweeper.abort();
    tracing::info!("shutdown complete");
    Ok(())
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let json = std::env::var("LOG_FORMAT").is_ok_and(|v| v.eq_ignore_ascii_case("json"));
    if json {
        tracing_subscriber::fmt()
            .json()
            .with_env_filter(filter)
            .init();
    } else {
        tracing_subscriber::fmt().with_env_filter(filter).init();
    }
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("failed to listen for shutdown signal: {e}");
        std::future::pending::<()>().await;
    }
    tracing::info!("shutdown signal received");
}
