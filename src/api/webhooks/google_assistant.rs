//! Google Assistant (Dialogflow) fulfillment webhook
//!
//! Routes by intent display-name and query-text keywords; anything
//! unrecognized is relayed to the backend NLU endpoint as a general query.

use std::sync::Arc;

use axum::{Json, extract::State};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::field_display;
use crate::api::ApiState;

const SOURCE: &str = "Prism-GoogleAssistant";

const APOLOGY: &str = "Xin lỗi, có lỗi xảy ra. Vui lòng thử lại.";

/// Inbound Dialogflow webhook envelope
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DialogflowEnvelope {
    #[serde(default)]
    pub query_result: QueryResult,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QueryResult {
    #[serde(default)]
    pub query_text: String,

    #[serde(default)]
    pub intent: DialogflowIntent,

    #[serde(default)]
    pub parameters: Value,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DialogflowIntent {
    #[serde(default)]
    pub display_name: String,
}

/// Outbound Dialogflow fulfillment response
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FulfillmentResponse {
    pub fulfillment_text: String,
    pub fulfillment_messages: Vec<FulfillmentMessage>,
    pub source: &'static str,
}

#[derive(Debug, Serialize)]
pub struct FulfillmentMessage {
    pub text: FulfillmentText,
}

#[derive(Debug, Serialize)]
pub struct FulfillmentText {
    pub text: Vec<String>,
}

impl FulfillmentResponse {
    fn new(text: impl Into<String>) -> Self {
        let text = text.into();
        Self {
            fulfillment_text: text.clone(),
            fulfillment_messages: vec![FulfillmentMessage {
                text: FulfillmentText { text: vec![text] },
            }],
            source: SOURCE,
        }
    }
}

/// Handle a Dialogflow fulfillment request
pub async fn handle_request(
    State(state): State<Arc<ApiState>>,
    Json(envelope): Json<DialogflowEnvelope>,
) -> Json<FulfillmentResponse> {
    let query = &envelope.query_result;
    let intent_name = query.intent.display_name.to_lowercase();
    let query_text = query.query_text.to_lowercase();

    tracing::debug!(
        intent = %query.intent.display_name,
        query = %query.query_text,
        "received Google Assistant request"
    );

    let text = if intent_name.contains("tiktok") || query_text.contains("video") {
        tiktok_intent(&state, &query.parameters).await
    } else if intent_name.contains("shopee") || query_text.contains("giá") {
        shopee_intent(&state).await
    } else if query_text.contains("tin nhắn") || query_text.contains("gửi") {
        messaging_intent(&query.parameters)
    } else if query_text.contains("thời tiết") {
        weather_intent(&state).await
    } else {
        general_intent(&state, &query.query_text).await
    };

    Json(FulfillmentResponse::new(text))
}

async fn tiktok_intent(state: &Arc<ApiState>, parameters: &Value) -> String {
    let topic = param_str(parameters, "topic", "trending");
    let audience = param_str(parameters, "audience", "gen-z");

    match state.backend.generate_content(topic, "viral", audience).await {
        Ok(data) => {
            let viral_score = data.get("viral_score").and_then(Value::as_i64).unwrap_or(0);
            let script: String = data
                .get("script")
                .and_then(Value::as_str)
                .unwrap_or("")
                .chars()
                .take(150)
                .collect();
            format!(
                "Tôi đã tạo script TikTok viral cho chủ đề '{topic}' với điểm viral \
                 {viral_score}/100. Script: {script}..."
            )
        }
        Err(e) => {
            tracing::warn!(error = %e, "TikTok content generation failed");
            "Tôi sẽ hỗ trợ tạo nội dung TikTok cho bạn. Vui lòng truy cập TikTok Creator Studio."
                .to_string()
        }
    }
}

async fn shopee_intent(state: &Arc<ApiState>) -> String {
    match state.backend.monitored_products().await {
        Ok(data) => {
            let products_count = data
                .get("products")
                .and_then(Value::as_array)
                .map_or(0, Vec::len);
            let active_alerts = data
                .get("active_alerts")
                .and_then(Value::as_i64)
                .unwrap_or(0);
            format!(
                "Hiện tại đang theo dõi {products_count} sản phẩm trên Shopee. \
                 Có {active_alerts} cảnh báo giá đang hoạt động."
            )
        }
        Err(e) => {
            tracing::warn!(error = %e, "Shopee product lookup failed");
            "Shopee Price Monitor đang sẵn sàng giúp bạn theo dõi giá cả sản phẩm.".to_string()
        }
    }
}

fn messaging_intent(parameters: &Value) -> String {
    let platform = param_str(parameters, "platform", "email");
    format!("Tôi có thể giúp bạn gửi tin nhắn qua {platform}. Bạn muốn gửi tin nhắn gì?")
}

async fn weather_intent(state: &Arc<ApiState>) -> String {
    match state.backend.latest_snapshot().await {
        Ok(data) => {
            let weather = data.get("weather").cloned().unwrap_or_default();
            format!(
                "Thời tiết TP.HCM: {}°C, độ ẩm {}%, gió {} km/h.",
                field_display(&weather, "temperature"),
                field_display(&weather, "humidity"),
                field_display(&weather, "windSpeed"),
            )
        }
        Err(e) => {
            tracing::warn!(error = %e, "weather lookup failed");
            "Dịch vụ thời tiết tạm thời không khả dụng.".to_string()
        }
    }
}

async fn general_intent(state: &Arc<ApiState>, query_text: &str) -> String {
    match state.backend.voice_command(query_text).await {
        Ok(data) => data
            .get("response")
            .and_then(Value::as_str)
            .unwrap_or("Tôi đã hiểu yêu cầu của bạn.")
            .to_string(),
        Err(e) => {
            tracing::warn!(error = %e, "general query relay failed");
            APOLOGY.to_string()
        }
    }
}

/// Read a string parameter with a default
fn param_str<'a>(parameters: &'a Value, key: &str, default: &'a str) -> &'a str {
    match parameters.get(key).and_then(Value::as_str) {
        Some(value) if !value.is_empty() => value,
        _ => default,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn envelope_parses_query_result() {
        let body = json!({
            "queryResult": {
                "queryText": "tạo video về công nghệ",
                "intent": {"displayName": "CreateTikTok"},
                "parameters": {"topic": "công nghệ"}
            }
        });
        let envelope: DialogflowEnvelope = serde_json::from_value(body).unwrap();
        assert_eq!(envelope.query_result.query_text, "tạo video về công nghệ");
        assert_eq!(envelope.query_result.intent.display_name, "CreateTikTok");
        assert_eq!(
            param_str(&envelope.query_result.parameters, "topic", "trending"),
            "công nghệ"
        );
    }

    #[test]
    fn empty_envelope_defaults() {
        let envelope: DialogflowEnvelope = serde_json::from_str("{}").unwrap();
        assert_eq!(envelope.query_result.query_text, "");
        assert_eq!(envelope.query_result.intent.display_name, "");
    }

    #[test]
    fn messaging_intent_defaults_to_email() {
        let text = messaging_intent(&json!({}));
        assert!(text.contains("email"));

        let text = messaging_intent(&json!({"platform": "zalo"}));
        assert!(text.contains("zalo"));
    }

    #[test]
    fn fulfillment_mirrors_text_into_messages() {
        let response = FulfillmentResponse::new("xin chào");
        let json = serde_json::to_value(&response).unwrap();
        assert_eq!(json["fulfillmentText"], "xin chào");
        assert_eq!(json["fulfillmentMessages"][0]["text"]["text"][0], "xin chào");
        assert_eq!(json["source"], SOURCE);
    }
}
