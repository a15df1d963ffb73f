//! Capability listing endpoint

use std::sync::Arc;

use axum::{Json, Router, extract::State, routing::get};
use serde::Serialize;

use super::ApiState;
use crate::registry::Capability;

/// Response body for `GET /capabilities`
#[derive(Debug, Serialize)]
pub struct CapabilityListResponse {
    pub capabilities: Vec<Capability>,
}

/// List all registered capability descriptors
async fn list_capabilities(State(state): State<Arc<ApiState>>) -> Json<CapabilityListResponse> {
    Json(CapabilityListResponse {
        capabilities: state.registry.list().await,
    })
}

/// Build capabilities router
pub fn router(state: Arc<ApiState>) -> Router {
    Router::new()
        .route("/capabilities", get(list_capabilities))
        .with_state(state)
}
