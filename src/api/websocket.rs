//! Per-session WebSocket channel
//!
//! Accepts tagged JSON messages over one connection per session. Replies are
//! dispatch envelopes or pongs; unrecognized tags get an inline error reply
//! and the channel stays open. While connected, the session's sender is
//! registered so deferred dispatch results can be pushed back.

use std::sync::Arc;

use axum::{
    Router,
    extract::{
        Path, State, WebSocketUpgrade,
        ws::{Message, WebSocket},
    },
    response::IntoResponse,
    routing::get,
};
use chrono::Utc;
use futures::{SinkExt, StreamExt};
use serde::Deserialize;
use serde_json::{Value, json};
use tokio::sync::mpsc;

use super::ApiState;

/// Incoming WebSocket message from a client
#[derive(Debug, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum WsIncoming {
    /// Dispatch a capability and reply with the envelope
    AiRequest {
        capability_id: String,
        #[serde(default)]
        data: Value,
    },
    /// Keepalive, answered immediately with a pong
    Ping,
}

/// Build WebSocket router
pub fn router(state: Arc<ApiState>) -> Router {
    Router::new()
        .route("/{session_id}", get(ws_upgrade))
        .with_state(state)
}

/// Handle WebSocket upgrade request
async fn ws_upgrade(
    State(state): State<Arc<ApiState>>,
    Path(session_id): Path<String>,
    ws: WebSocketUpgrade,
) -> impl IntoResponse {
    ws.on_upgrade(move |socket| handle_socket(socket, state, session_id))
}

/// Drive one WebSocket connection until either side closes it
async fn handle_socket(socket: WebSocket, state: Arc<ApiState>, session_id: String) {
    let (mut sender, mut receiver) = socket.split();

    tracing::info!(session_id = %session_id, "WebSocket connected");

    // Channel for replies and deferred-result pushes
    let (tx, mut rx) = mpsc::channel::<Value>(32);

    state
        .ws_senders
        .write()
        .await
        .insert(session_id.clone(), tx.clone());

    // Forward queued messages out to the socket
    let mut send_task = tokio::spawn(async move {
        while let Some(message) = rx.recv().await {
            if let Ok(text) = serde_json::to_string(&message) {
                if sender.send(Message::Text(text.into())).await.is_err() {
                    break;
                }
            }
        }
    });

    let recv_state = Arc::clone(&state);
    let recv_session_id = session_id.clone();
    let mut recv_task = tokio::spawn(async move {
        while let Some(Ok(message)) = receiver.next().await {
            match message {
                Message::Text(text) => {
                    let reply = handle_message(&recv_state, &recv_session_id, &text).await;
                    if tx.send(reply).await.is_err() {
                        break;
                    }
                }
                Message::Close(_) => {
                    tracing::info!(session_id = %recv_session_id, "WebSocket closed by client");
                    break;
                }
                _ => {}
            }
        }
    });

    tokio::select! {
        _ = &mut send_task => recv_task.abort(),
        _ = &mut recv_task => send_task.abort(),
    }

    state.ws_senders.write().await.remove(&session_id);
    tracing::info!(session_id = %session_id, "WebSocket disconnected");
}

/// Handle a single incoming message and produce the reply
///
/// Bad JSON, unknown tags, and unknown sessions all become inline error
/// replies rather than a channel close.
async fn handle_message(state: &Arc<ApiState>, session_id: &str, text: &str) -> Value {
    let incoming: WsIncoming = match serde_json::from_str(text) {
        Ok(incoming) => incoming,
        Err(_) => return json!({"error": "Unknown message type"}),
    };

    let Some(session) = state.sessions.get(session_id).await else {
        return json!({"error": "Session not found"});
    };

    match incoming {
        WsIncoming::Ping => json!({"type": "pong", "timestamp": Utc::now()}),
        WsIncoming::AiRequest {
            capability_id,
            data,
        } => {
            let outcome = state.dispatcher.dispatch(&capability_id, &data, &session).await;
            serde_json::to_value(&outcome)
                .unwrap_or_else(|e| json!({"error": format!("reply serialization failed: {e}")}))
        }
    }
}
