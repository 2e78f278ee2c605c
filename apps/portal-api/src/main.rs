//! # Atrium Portal API
//!
//! REST proxy server binary.
//!
//! ```text
//! Portal clients ───► HTTP (8080) ───► validation ───► façades ───► SQLite
//! ```

use std::net::SocketAddr;

use tracing::{error, info};
use tracing_subscriber::EnvFilter;

use atrium_core::registry::TableRegistry;
use atrium_db::{Database, DbConfig};
use portal_api::{router, ApiConfig, AppState};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_target(true)
        .init();

    info!("Starting Atrium portal API server...");

    // Missing secrets are fatal; the server never runs with defaults.
    let config = match ApiConfig::load() {
        Ok(config) => config,
        Err(e) => {
            error!(error = %e, "Configuration error, refusing to start");
            std::process::exit(1);
        }
    };
    info!(
        port = config.port,
        db_path = %config.database_path.display(),
        "Configuration loaded"
    );

    // Table name overrides are validated here, before any SQL is issued.
    let registry = TableRegistry::from_env()?;

    let db = Database::new(DbConfig::new(&config.database_path), registry).await?;
    info!("Connected to SQLite");

    let addr: SocketAddr = format!("0.0.0.0:{}", config.port).parse()?;
    let app = router(AppState::new(db, config));

    info!(%addr, "Starting HTTP server");
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Server shutdown complete");
    Ok(())
}

/// Graceful shutdown signal handler.
async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("Failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    info!("Shutdown signal received, starting graceful shutdown...");
}
