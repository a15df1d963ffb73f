//! Service info and health endpoints

use std::sync::Arc;

use axum::{Json, Router, extract::State, routing::get};
use serde::Serialize;

use super::ApiState;

/// Root service info response
#[derive(Serialize)]
pub struct ServiceInfo {
    pub service: &'static str,
    pub version: &'static str,
    pub status: &'static str,
    pub capabilities: usize,
    pub active_sessions: usize,
}

/// Health check response
#[derive(Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub version: &'static str,
}

/// Service overview: capability and session counts
async fn service_info(State(state): State<Arc<ApiState>>) -> Json<ServiceInfo> {
    Json(ServiceInfo {
        service: "Prism Gateway",
        version: env!("CARGO_PKG_VERSION"),
        status: "running",
        capabilities: state.registry.len().await,
        active_sessions: state.sessions.len().await,
    })
}

/// Liveness probe - is the service running?
async fn health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok",
        version: env!("CARGO_PKG_VERSION"),
    })
}

/// Build service router
pub fn router(state: Arc<ApiState>) -> Router {
    Router::new()
        .route("/", get(service_info))
        .route("/health", get(health))
        .with_state(state)
}
