//! Shared test utilities
//!
//! Builds the API state against a stub downstream backend bound to an
//! ephemeral local port.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use axum::{
    Json, Router,
    routing::{get, post},
};
use serde_json::{Value, json};
use tokio::net::TcpListener;
use tokio::sync::RwLock;

use prism_gateway::api::ApiState;
use prism_gateway::handlers::builtin_handlers;
use prism_gateway::{
    BackendClient, CapabilityRegistry, Dispatcher, SessionStore, builtin_capabilities,
};

/// Start a stub downstream backend and return its base URL
pub async fn spawn_stub_backend() -> String {
    let app = Router::new()
        .route(
            "/api/ai/voice-command",
            post(|| async {
                Json(json!({
                    "intent": "greeting",
                    "response": "Xin chào! Tôi có thể giúp gì cho bạn?",
                    "actions": [],
                    "processing_time": 12
                }))
            }),
        )
        .route(
            "/api/tiktok/generate-content",
            post(|| async {
                Json(json!({
                    "script": "Mở đầu bằng một câu hỏi gây tò mò...",
                    "viral_score": 87,
                    "estimated_views": "120K"
                }))
            }),
        )
        .route(
            "/api/shopee/monitored-products",
            get(|| async {
                Json(json!({
                    "products": [
                        {"name": "Tai nghe bluetooth", "price": 249_000}
                    ],
                    "active_alerts": 2
                }))
            }),
        )
        .route("/api/messaging/send-email", post(message_sent))
        .route("/api/messaging/send-sms", post(message_sent))
        .route("/api/messaging/send-telegram", post(message_sent))
        .route("/api/messaging/send-zalo", post(message_sent))
        .route(
            "/api/data/latest",
            get(|| async {
                Json(json!({
                    "news": [
                        {"title": "Xuất khẩu tăng mạnh", "description": "Kinh tế phát triển"},
                        {"title": "Thị trường ổn định", "description": ""}
                    ],
                    "stocks": [
                        {"symbol": "VNM", "change": 1.2},
                        {"symbol": "FPT", "change": 0.8},
                        {"symbol": "HPG", "change": -0.5}
                    ],
                    "social": [
                        {"engagement": 1500},
                        {"engagement": 900}
                    ],
                    "weather": {"temperature": 32, "humidity": 75, "windSpeed": 12}
                }))
            }),
        );

    let listener = TcpListener::bind("127.0.0.1:0")
        .await
        .expect("failed to bind stub backend");
    let addr = listener.local_addr().expect("no local addr");

    tokio::spawn(async move {
        axum::serve(listener, app).await.expect("stub backend died");
    });

    format!("http://{addr}")
}

async fn message_sent() -> Json<Value> {
    Json(json!({"status": "sent"}))
}

/// Build API state wired to the given backend, with a short deferred-task
/// delay so background tests stay fast
pub async fn build_test_state(backend_url: &str) -> Arc<ApiState> {
    let backend =
        Arc::new(BackendClient::new(backend_url, Duration::from_secs(2)).expect("backend client"));

    let registry = Arc::new(CapabilityRegistry::new());
    for capability in builtin_capabilities() {
        registry.register(capability).await;
    }

    let sessions = Arc::new(SessionStore::new());
    let dispatcher = Arc::new(Dispatcher::new(
        Arc::clone(&registry),
        Arc::clone(&sessions),
        builtin_handlers(Arc::clone(&backend)),
    ));

    Arc::new(ApiState {
        registry,
        sessions,
        dispatcher,
        backend,
        ws_senders: Arc::new(RwLock::new(HashMap::new())),
        background_delay: Duration::from_millis(20),
    })
}
