//! Health check handlers

use axum::{extract::State, Json};
use serde::Serialize;

use crate::AppState;

#[derive(Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    pub backend: String,
    pub mode: String,
}

/// Health check endpoint handler
pub async fn health_check(State(state): State<AppState>) -> Json<HealthResponse> {
    // The status catalogue is the cheapest call the backend offers
    let backend_status = match state.backend.order_statuses().await {
        Ok(_) => "reachable".to_string(),
        Err(e) => {
            tracing::warn!("Inventory backend health check failed: {}", e);
            "unreachable".to_string()
        }
    };

    let mode = if state.config.api.offline {
        "offline"
    } else {
        "api"
    };

    Json(HealthResponse {
        status: "healthy".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        backend: backend_status,
        mode: mode.to_string(),
    })
}
