//! Stock Admin - Backend Server
//!
//! Serves the admin API the inventory dashboard calls, backed either by the
//! inventory REST backend or, in offline mode, by an in-memory one.

use std::{net::SocketAddr, sync::Arc};

use anyhow::Context;
use stock_admin_backend::{create_app, ApiClient, AppState, Config, MemoryBackend, SharedBackend};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

const DEFAULT_LOG_FILTER: &str = "stock_admin_server=debug,stock_admin_backend=debug,tower_http=debug";

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load configuration
    dotenvy::dotenv().ok();
    let config = Config::load().context("failed to load configuration")?;

    // Initialize tracing
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| DEFAULT_LOG_FILTER.into());
    if config.logging.json {
        tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer().json())
            .init();
    } else {
        tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer())
            .init();
    }

    tracing::info!("Starting Stock Admin Server");
    tracing::info!("Environment: {}", config.environment);

    let backend: SharedBackend = if config.api.offline {
        tracing::warn!("Offline mode: serving the in-memory demo catalogue");
        Arc::new(MemoryBackend::demo().await?) as SharedBackend
    } else {
        let client = ApiClient::new(&config.api)?;
        tracing::info!(
            "Inventory backend at {} (timeout {}s)",
            client.base_url(),
            config.api.timeout_secs
        );
        Arc::new(client) as SharedBackend
    };

    let addr: SocketAddr = format!("{}:{}", config.server.host, config.server.port)
        .parse()
        .with_context(|| format!("invalid listen address {}:{}", config.server.host, config.server.port))?;

    // Build application
    let app = create_app(AppState::new(backend, config));

    // Start server
    tracing::info!("Listening on {}", addr);
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
