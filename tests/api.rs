//! API endpoint integration tests

use axum::{
    body::Body,
    http::{Request, StatusCode, header},
};
use serde_json::{Value, json};
use tower::ServiceExt;

mod common;
use common::{build_test_state, spawn_stub_backend};

async fn json_body(response: axum::response::Response) -> Value {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

fn post_json(uri: &str, body: &Value) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

#[tokio::test]
async fn test_health_endpoint() {
    let backend_url = spawn_stub_backend().await;
    let state = build_test_state(&backend_url).await;
    let app = prism_gateway::api::router(state);

    let response = app
        .oneshot(
            Request::builder()
                .uri("/health")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);

    let json = json_body(response).await;
    assert_eq!(json["status"], "ok");
    assert!(json["version"].is_string());
}

#[tokio::test]
async fn test_service_info_reports_counts() {
    let backend_url = spawn_stub_backend().await;
    let state = build_test_state(&backend_url).await;
    let app = prism_gateway::api::router(state);

    let response = app
        .oneshot(Request::builder().uri("/").body(Body::empty()).unwrap())
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);

    let json = json_body(response).await;
    assert_eq!(json["service"], "Prism Gateway");
    assert_eq!(json["status"], "running");
    assert_eq!(json["capabilities"], 6);
    assert_eq!(json["active_sessions"], 0);
}

#[tokio::test]
async fn test_create_session_returns_capability_ids() {
    let backend_url = spawn_stub_backend().await;
    let state = build_test_state(&backend_url).await;
    let app = prism_gateway::api::router(state.clone());

    let response = app
        .oneshot(post_json(
            "/session/create",
            &json!({
                "platform_type": "web",
                "user_id": "u1",
                "capabilities": ["multi_messaging"]
            }),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);

    let json = json_body(response).await;
    assert_eq!(json["status"], "created");
    assert_eq!(json["platform_type"], "web");
    assert!(json["session_id"].is_string());
    let ids: Vec<&str> = json["available_capabilities"]
        .as_array()
        .unwrap()
        .iter()
        .filter_map(Value::as_str)
        .collect();
    assert!(ids.contains(&"multi_messaging"));
    assert!(ids.contains(&"business_analytics"));

    // The session is actually live in the store
    let session_id = json["session_id"].as_str().unwrap();
    assert!(state.sessions.get(session_id).await.is_some());
}

#[tokio::test]
async fn test_capabilities_listing() {
    let backend_url = spawn_stub_backend().await;
    let state = build_test_state(&backend_url).await;
    let app = prism_gateway::api::router(state);

    let response = app
        .oneshot(
            Request::builder()
                .uri("/capabilities")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);

    let json = json_body(response).await;
    let capabilities = json["capabilities"].as_array().unwrap();
    assert_eq!(capabilities.len(), 6);
    assert_eq!(capabilities[0]["id"], "vietnamese_nlp");
    assert_eq!(capabilities[0]["category"], "text_processing");
    assert_eq!(capabilities[0]["enabled"], true);
    assert!(capabilities[0]["config"].is_object());
}

#[tokio::test]
async fn test_sessions_listing() {
    let backend_url = spawn_stub_backend().await;
    let state = build_test_state(&backend_url).await;

    state
        .sessions
        .create(
            prism_gateway::PlatformKind::Mobile,
            "u7".to_string(),
            Vec::new(),
            serde_json::Map::new(),
        )
        .await;

    let app = prism_gateway::api::router(state);
    let response = app
        .oneshot(
            Request::builder()
                .uri("/sessions")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);

    let json = json_body(response).await;
    assert_eq!(json["active_sessions"], 1);
    assert_eq!(json["sessions"][0]["user_id"], "u7");
    assert_eq!(json["sessions"][0]["platform_type"], "mobile");
    assert!(json["sessions"][0]["created_at"].is_string());
    assert!(json["sessions"][0]["last_activity"].is_string());
}

#[tokio::test]
async fn test_process_unknown_session_is_404() {
    let backend_url = spawn_stub_backend().await;
    let state = build_test_state(&backend_url).await;
    let app = prism_gateway::api::router(state);

    let response = app
        .oneshot(post_json(
            "/ai/process",
            &json!({
                "session_id": "no-such-session",
                "capability_id": "multi_messaging",
                "input_data": {}
            }),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    let json = json_body(response).await;
    assert_eq!(json["error"], "session not found");
}

#[tokio::test]
async fn test_process_unknown_capability_is_failure_envelope() {
    let backend_url = spawn_stub_backend().await;
    let state = build_test_state(&backend_url).await;

    let session = state
        .sessions
        .create(
            prism_gateway::PlatformKind::Web,
            "u1".to_string(),
            Vec::new(),
            serde_json::Map::new(),
        )
        .await;

    let app = prism_gateway::api::router(state);
    let response = app
        .oneshot(post_json(
            "/ai/process",
            &json!({
                "session_id": session.id,
                "capability_id": "does_not_exist",
                "input_data": {}
            }),
        ))
        .await
        .unwrap();

    // Dispatcher failures are a normal response with a failure envelope
    assert_eq!(response.status(), StatusCode::OK);

    let json = json_body(response).await;
    assert_eq!(json["success"], false);
    assert_eq!(json["capability_id"], "does_not_exist");
    assert!(json["error"].as_str().unwrap().contains("not found"));
}
