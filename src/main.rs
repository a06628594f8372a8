// Main entry point - Dependency injection and server setup
mod application;
mod domain;
mod infrastructure;
mod presentation;

use std::sync::Arc;

use anyhow::Context;
use tracing_subscriber::EnvFilter;

use crate::application::monitor_service::MonitorService;
use crate::infrastructure::config::load_inspector_config;
use crate::infrastructure::http_backend::HttpStatusBackend;
use crate::presentation::app_state::AppState;
use crate::presentation::handlers::build_router;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    // Load configuration
    let config = load_inspector_config().context("Failed to load configuration")?;

    // Create backend client (infrastructure layer)
    let backend = Arc::new(
        HttpStatusBackend::new(&config.backend.base_url, config.backend.timeout())
            .context("Failed to build backend client")?,
    );

    // Create service (application layer) and load whatever the backend already tracks
    let monitor = MonitorService::new(backend);
    if let Err(e) = monitor.refresh().await {
        tracing::warn!("Initial refresh from {} failed: {}", config.backend.base_url, e);
    }

    // Build router (presentation layer)
    let state = Arc::new(AppState { monitor });
    let router = build_router(state);

    // Start server
    let addr = config.server.listen_addr;
    tracing::info!(
        "Starting url-inspector console on {} (backend {})",
        addr,
        config.backend.base_url
    );

    axum::serve(tokio::net::TcpListener::bind(addr).await?, router).await?;

    Ok(())
}
