//! Capability processing endpoint
//!
//! Dispatches synchronously, and optionally enqueues a deferred duplicate
//! dispatch whose result is pushed back over the session's WebSocket if one
//! is still connected. Delivery of deferred results is best-effort: a result
//! for a disconnected session is dropped, not retried or persisted.

use std::sync::Arc;

use axum::{
    Json, Router,
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::post,
};
use serde::Deserialize;
use serde_json::{Value, json};

use super::ApiState;

/// Request body for `POST /ai/process`
#[derive(Debug, Deserialize)]
pub struct ProcessRequest {
    pub session_id: String,
    pub capability_id: String,
    #[serde(default)]
    pub input_data: Value,
    #[serde(default)]
    pub async_processing: bool,
}

/// Dispatch a capability for a session
///
/// Unknown sessions are a 404; every dispatcher failure is a normal 200
/// carrying a failure envelope.
async fn process(
    State(state): State<Arc<ApiState>>,
    Json(request): Json<ProcessRequest>,
) -> Response {
    let Some(session) = state.sessions.get(&request.session_id).await else {
        return (
            StatusCode::NOT_FOUND,
            Json(json!({"error": "session not found"})),
        )
            .into_response();
    };

    let outcome = state
        .dispatcher
        .dispatch(&request.capability_id, &request.input_data, &session)
        .await;

    if request.async_processing {
        tokio::spawn(deferred_dispatch(
            Arc::clone(&state),
            request.capability_id.clone(),
            request.input_data.clone(),
            request.session_id.clone(),
        ));
    }

    Json(outcome).into_response()
}

/// Re-run a dispatch after an artificial delay and push the result over the
/// session's WebSocket sender, if still registered
async fn deferred_dispatch(
    state: Arc<ApiState>,
    capability_id: String,
    input: Value,
    session_id: String,
) {
    tokio::time::sleep(state.background_delay).await;

    let Some(session) = state.sessions.get(&session_id).await else {
        tracing::debug!(session_id = %session_id, "deferred dispatch dropped, session gone");
        return;
    };

    let outcome = state
        .dispatcher
        .dispatch(&capability_id, &input, &session)
        .await;

    let senders = state.ws_senders.read().await;
    match senders.get(&session_id) {
        Some(sender) => {
            if let Ok(result) = serde_json::to_value(&outcome) {
                let message = json!({"type": "background_result", "result": result});
                if sender.send(message).await.is_err() {
                    tracing::debug!(session_id = %session_id, "deferred result dropped, channel closed");
                }
            }
        }
        None => {
            tracing::debug!(session_id = %session_id, "deferred result dropped, no connection");
        }
    }
}

/// Build process router
pub fn router(state: Arc<ApiState>) -> Router {
    Router::new()
        .route("/ai/process", post(process))
        .with_state(state)
}
