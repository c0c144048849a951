//! Stock Admin - Backend library
//!
//! Admin API for the inventory dashboard: article stock, supplier
//! associations, the purchase order lifecycle and sales, served on top of
//! the external inventory backend.

use std::sync::Arc;

use axum::{routing::get, Router};
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

pub mod config;
pub mod error;
pub mod external;
pub mod handlers;
pub mod routes;
pub mod services;

pub use config::Config;
pub use error::{AppError, AppResult};
pub use external::{ApiClient, InventoryBackend, MemoryBackend, SharedBackend};

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    pub backend: SharedBackend,
    pub config: Arc<Config>,
}

impl AppState {
    pub fn new(backend: SharedBackend, config: Config) -> Self {
        Self {
            backend,
            config: Arc::new(config),
        }
    }
}

/// Create the application router with all routes and middleware
pub fn create_app(state: AppState) -> Router {
    // CORS configuration
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/", get(root))
        .route("/health", get(health_check))
        .nest("/api/v1", routes::api_routes())
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}

/// Root endpoint
async fn root() -> &'static str {
    "Stock Admin API v1.0"
}

/// Liveness endpoint
async fn health_check() -> &'static str {
    "OK"
}
