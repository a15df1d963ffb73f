//! Session creation and listing endpoints

use std::sync::Arc;

use axum::{Json, Router, extract::State, routing::{get, post}};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use super::ApiState;
use crate::session::PlatformKind;

/// Request body for `POST /session/create`
#[derive(Debug, Deserialize)]
pub struct CreateSessionRequest {
    pub platform_type: PlatformKind,
    pub user_id: String,
    #[serde(default)]
    pub capabilities: Vec<String>,
    #[serde(default)]
    pub context: Option<Map<String, Value>>,
}

/// Response body for `POST /session/create`
#[derive(Debug, Serialize)]
pub struct CreateSessionResponse {
    pub session_id: String,
    pub status: &'static str,
    pub available_capabilities: Vec<String>,
    pub platform_type: PlatformKind,
}

/// Summary of one live session
#[derive(Debug, Serialize)]
pub struct SessionInfo {
    pub session_id: String,
    pub platform_type: PlatformKind,
    pub user_id: String,
    pub created_at: DateTime<Utc>,
    pub last_activity: DateTime<Utc>,
}

/// Response body for `GET /sessions`
#[derive(Debug, Serialize)]
pub struct SessionListResponse {
    pub active_sessions: usize,
    pub sessions: Vec<SessionInfo>,
}

/// Create a session and report the known capability ids
async fn create_session(
    State(state): State<Arc<ApiState>>,
    Json(request): Json<CreateSessionRequest>,
) -> Json<CreateSessionResponse> {
    let session = state
        .sessions
        .create(
            request.platform_type,
            request.user_id,
            request.capabilities,
            request.context.unwrap_or_default(),
        )
        .await;

    Json(CreateSessionResponse {
        session_id: session.id,
        status: "created",
        available_capabilities: state.registry.ids().await,
        platform_type: request.platform_type,
    })
}

/// List all live sessions with their timestamps
async fn list_sessions(State(state): State<Arc<ApiState>>) -> Json<SessionListResponse> {
    let sessions: Vec<SessionInfo> = state
        .sessions
        .list()
        .await
        .into_iter()
        .map(|session| SessionInfo {
            session_id: session.id,
            platform_type: session.platform,
            user_id: session.user_id,
            created_at: session.created_at,
            last_activity: session.last_activity,
        })
        .collect();

    Json(SessionListResponse {
        active_sessions: sessions.len(),
        sessions,
    })
}

/// Build sessions router
pub fn router(state: Arc<ApiState>) -> Router {
    Router::new()
        .route("/session/create", post(create_session))
        .route("/sessions", get(list_sessions))
        .with_state(state)
}
