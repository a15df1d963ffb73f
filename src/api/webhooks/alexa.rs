//! Amazon Alexa skill webhook
//!
//! Translates Alexa Skills Kit request envelopes (launch / intent /
//! session-ended) into backend calls and answers with speech plus an
//! optional card. Every downstream failure becomes a spoken apology.

use std::collections::HashMap;
use std::sync::Arc;

use axum::{Json, extract::State};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::{field_display, format_price};
use crate::api::ApiState;
use crate::backend::MessagePlatform;

const WELCOME: &str = "Chào mừng đến với Prism! Tôi có thể giúp bạn tạo nội dung TikTok viral, \
     theo dõi giá Shopee, gửi tin nhắn, và nhiều việc khác. Bạn cần giúp gì?";

const WELCOME_REPROMPT: &str =
    "Bạn có thể nói 'tạo video TikTok', 'kiểm tra giá Shopee', hoặc 'gửi tin nhắn'";

const HELP: &str = "Tôi có thể giúp bạn: Tạo nội dung TikTok viral, theo dõi giá Shopee, \
     gửi tin nhắn đa nền tảng, kiểm tra thời tiết và tin tức. \
     Hãy nói 'tạo video về công nghệ' hoặc 'kiểm tra giá điện thoại'.";

const FALLBACK: &str = "Tôi chưa hiểu yêu cầu của bạn. Bạn có thể nói 'tạo video TikTok', \
     'kiểm tra giá Shopee', 'gửi tin nhắn', hoặc 'trợ giúp'.";

/// Inbound Alexa request envelope
#[derive(Debug, Default, Deserialize)]
pub struct AlexaEnvelope {
    #[serde(default)]
    pub request: AlexaRequest,
}

#[derive(Debug, Default, Deserialize)]
pub struct AlexaRequest {
    #[serde(rename = "type", default)]
    pub kind: String,

    #[serde(default)]
    pub intent: Option<AlexaIntent>,
}

#[derive(Debug, Default, Deserialize)]
pub struct AlexaIntent {
    #[serde(default)]
    pub name: String,

    #[serde(default)]
    pub slots: HashMap<String, AlexaSlot>,
}

#[derive(Debug, Default, Deserialize)]
pub struct AlexaSlot {
    #[serde(default)]
    pub value: Option<String>,
}

impl AlexaIntent {
    /// Read a slot value, empty if the slot is absent or unfilled
    fn slot(&self, name: &str) -> &str {
        self.slots
            .get(name)
            .and_then(|slot| slot.value.as_deref())
            .unwrap_or_default()
    }
}

/// Outbound Alexa response envelope
#[derive(Debug, Serialize)]
pub struct AlexaResponse {
    pub version: &'static str,
    pub response: AlexaResponseBody,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AlexaResponseBody {
    pub output_speech: OutputSpeech,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub card: Option<Card>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub reprompt: Option<Reprompt>,

    pub should_end_session: bool,
}

#[derive(Debug, Serialize)]
pub struct OutputSpeech {
    #[serde(rename = "type")]
    pub kind: &'static str,
    pub text: String,
}

#[derive(Debug, Serialize)]
pub struct Card {
    #[serde(rename = "type")]
    pub kind: &'static str,
    pub title: String,
    pub content: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Reprompt {
    pub output_speech: OutputSpeech,
}

impl AlexaResponse {
    /// A plain speech response that ends the session
    fn speech(text: impl Into<String>) -> Self {
        Self {
            version: "1.0",
            response: AlexaResponseBody {
                output_speech: OutputSpeech {
                    kind: "PlainText",
                    text: text.into(),
                },
                card: None,
                reprompt: None,
                should_end_session: true,
            },
        }
    }

    fn with_card(mut self, title: impl Into<String>, content: impl Into<String>) -> Self {
        self.response.card = Some(Card {
            kind: "Simple",
            title: title.into(),
            content: content.into(),
        });
        self
    }

    fn with_reprompt(mut self, text: impl Into<String>) -> Self {
        self.response.reprompt = Some(Reprompt {
            output_speech: OutputSpeech {
                kind: "PlainText",
                text: text.into(),
            },
        });
        self
    }

    fn keep_session(mut self) -> Self {
        self.response.should_end_session = false;
        self
    }
}

/// Handle an Alexa skill request
pub async fn handle_request(
    State(state): State<Arc<ApiState>>,
    Json(envelope): Json<AlexaEnvelope>,
) -> Json<AlexaResponse> {
    tracing::debug!(request_type = %envelope.request.kind, "received Alexa request");

    let response = match envelope.request.kind.as_str() {
        "LaunchRequest" => launch(),
        "IntentRequest" => {
            let intent = envelope.request.intent.unwrap_or_default();
            handle_intent(&state, &intent).await
        }
        "SessionEndedRequest" => AlexaResponse::speech("Tạm biệt!"),
        _ => fallback(),
    };

    Json(response)
}

fn launch() -> AlexaResponse {
    AlexaResponse::speech(WELCOME)
        .with_card(
            "Prism Assistant",
            "Trợ lý AI thông minh cho content creator và doanh nhân",
        )
        .with_reprompt(WELCOME_REPROMPT)
        .keep_session()
}

async fn handle_intent(state: &Arc<ApiState>, intent: &AlexaIntent) -> AlexaResponse {
    match intent.name.as_str() {
        "CreateTikTokIntent" => tiktok_creation(state, intent.slot("Topic")).await,
        "CheckShopeeIntent" => shopee_check(state).await,
        "SendMessageIntent" => {
            send_message(intent.slot("Platform"), intent.slot("MessageContent"))
        }
        "GetWeatherIntent" => weather(state).await,
        "GetNewsIntent" => news(state).await,
        "AMAZON.HelpIntent" => help(),
        "AMAZON.StopIntent" | "AMAZON.CancelIntent" => {
            AlexaResponse::speech("Tạm biệt! Hẹn gặp lại bạn.")
        }
        _ => fallback(),
    }
}

async fn tiktok_creation(state: &Arc<ApiState>, topic: &str) -> AlexaResponse {
    let topic = if topic.is_empty() {
        "xu hướng hiện tại"
    } else {
        topic
    };

    match state.backend.generate_content(topic, "viral", "gen-z").await {
        Ok(data) => {
            let viral_score = data.get("viral_score").and_then(Value::as_i64).unwrap_or(0);
            let estimated_views = data
                .get("estimated_views")
                .and_then(Value::as_str)
                .unwrap_or("N/A");

            let speech = format!(
                "Đã tạo thành công script TikTok cho chủ đề '{topic}'. \
                 Điểm viral: {viral_score}/100, dự kiến {estimated_views} lượt xem. \
                 Script đã được lưu trong ứng dụng."
            );
            let card = format!(
                "Chủ đề: {topic}\nViral Score: {viral_score}/100\nDự kiến views: {estimated_views}"
            );

            AlexaResponse::speech(speech).with_card("TikTok Script Created", card)
        }
        Err(e) => {
            tracing::warn!(error = %e, "TikTok content generation failed");
            AlexaResponse::speech("Không thể tạo script TikTok lúc này. Vui lòng thử lại sau.")
        }
    }
}

async fn shopee_check(state: &Arc<ApiState>) -> AlexaResponse {
    match state.backend.monitored_products().await {
        Ok(data) => {
            let products = data
                .get("products")
                .and_then(Value::as_array)
                .cloned()
                .unwrap_or_default();
            let active_alerts = data
                .get("active_alerts")
                .and_then(Value::as_i64)
                .unwrap_or(0);

            let Some(latest) = products.first() else {
                return AlexaResponse::speech(
                    "Chưa có sản phẩm nào được theo dõi. Bạn có thể thêm sản phẩm trong ứng dụng.",
                );
            };

            let name = latest.get("name").and_then(Value::as_str).unwrap_or("N/A");
            let price = latest.get("price").and_then(Value::as_i64).unwrap_or(0);

            let speech = format!(
                "Đang theo dõi {} sản phẩm trên Shopee. Sản phẩm mới nhất: {name} giá {}đ. \
                 Có {active_alerts} cảnh báo giá đang hoạt động.",
                products.len(),
                format_price(price),
            );
            let card = format!(
                "Monitoring: {} products\nActive alerts: {active_alerts}",
                products.len()
            );

            AlexaResponse::speech(speech).with_card("Shopee Price Monitor", card)
        }
        Err(e) => {
            tracing::warn!(error = %e, "Shopee product lookup failed");
            AlexaResponse::speech("Dịch vụ Shopee Monitor tạm thời không khả dụng.")
        }
    }
}

/// Message sending stays an elicitation flow: the skill collects platform and
/// content, then hands off to the app for confirmation rather than sending
fn send_message(platform: &str, content: &str) -> AlexaResponse {
    if platform.is_empty() {
        return AlexaResponse::speech(
            "Bạn muốn gửi tin nhắn qua nền tảng nào? Email, SMS, Telegram, hay Zalo?",
        )
        .keep_session();
    }

    if content.is_empty() {
        return AlexaResponse::speech(format!("Bạn muốn gửi nội dung gì qua {platform}?"))
            .keep_session();
    }

    let platform_name = MessagePlatform::parse(platform)
        .map_or_else(|| platform.to_string(), |p| p.display_name().to_string());

    let preview: String = content.chars().take(100).collect();
    AlexaResponse::speech(format!(
        "Tin nhắn đã được chuẩn bị gửi qua {platform_name}. Vui lòng xác nhận trong ứng dụng."
    ))
    .with_card(
        "Message Ready",
        format!("Platform: {platform_name}\nContent: {preview}..."),
    )
}

async fn weather(state: &Arc<ApiState>) -> AlexaResponse {
    match state.backend.latest_snapshot().await {
        Ok(data) => {
            let weather = data.get("weather").cloned().unwrap_or_default();
            let temp = field_display(&weather, "temperature");
            let humidity = field_display(&weather, "humidity");
            let wind = field_display(&weather, "windSpeed");

            let speech = format!(
                "Thời tiết TP Hồ Chí Minh: {temp} độ C, độ ẩm {humidity}%, gió {wind} km/h."
            );
            let card =
                format!("Temperature: {temp}°C\nHumidity: {humidity}%\nWind: {wind} km/h");

            AlexaResponse::speech(speech).with_card("Weather Update", card)
        }
        Err(e) => {
            tracing::warn!(error = %e, "weather lookup failed");
            AlexaResponse::speech("Dịch vụ thời tiết tạm thời không khả dụng.")
        }
    }
}

async fn news(state: &Arc<ApiState>) -> AlexaResponse {
    match state.backend.latest_snapshot().await {
        Ok(data) => {
            let Some(latest) = data
                .get("news")
                .and_then(Value::as_array)
                .and_then(|items| items.first())
            else {
                return AlexaResponse::speech("Hiện tại chưa có tin tức mới.");
            };

            let title = latest.get("title").and_then(Value::as_str).unwrap_or("");
            let description = latest
                .get("description")
                .and_then(Value::as_str)
                .unwrap_or("");
            let summary: String = description.chars().take(100).collect();

            AlexaResponse::speech(format!("Tin tức mới nhất: {title}. {summary}..."))
                .with_card("Latest News", title)
        }
        Err(e) => {
            tracing::warn!(error = %e, "news lookup failed");
            AlexaResponse::speech("Dịch vụ tin tức tạm thời không khả dụng.")
        }
    }
}

fn help() -> AlexaResponse {
    AlexaResponse::speech(HELP)
        .with_card(
            "Prism Help",
            "Available commands:\n- Create TikTok content\n- Check Shopee prices\n\
             - Send messages\n- Get weather\n- Get news",
        )
        .with_reprompt("Bạn muốn tôi giúp gì?")
        .keep_session()
}

fn fallback() -> AlexaResponse {
    AlexaResponse::speech(FALLBACK)
        .with_reprompt("Bạn cần tôi giúp gì?")
        .keep_session()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn intent_with_slot(name: &str, slot: &str, value: &str) -> AlexaIntent {
        let mut slots = HashMap::new();
        slots.insert(
            slot.to_string(),
            AlexaSlot {
                value: Some(value.to_string()),
            },
        );
        AlexaIntent {
            name: name.to_string(),
            slots,
        }
    }

    #[test]
    fn launch_keeps_session_open() {
        let response = launch();
        assert!(!response.response.should_end_session);
        assert!(response.response.card.is_some());
        assert!(response.response.reprompt.is_some());
    }

    #[test]
    fn message_without_platform_elicits() {
        let response = send_message("", "");
        assert!(!response.response.should_end_session);
        assert!(response.response.output_speech.text.contains("nền tảng nào"));
    }

    #[test]
    fn message_without_content_elicits() {
        let response = send_message("telegram", "");
        assert!(!response.response.should_end_session);
        assert!(response.response.output_speech.text.contains("telegram"));
    }

    #[test]
    fn message_with_both_slots_confirms() {
        let response = send_message("email", "hẹn gặp chiều nay");
        assert!(response.response.should_end_session);
        assert!(response.response.output_speech.text.contains("Email"));
    }

    #[test]
    fn slot_lookup_tolerates_unfilled_slots() {
        let intent = intent_with_slot("SendMessageIntent", "Platform", "zalo");
        assert_eq!(intent.slot("Platform"), "zalo");
        assert_eq!(intent.slot("MessageContent"), "");
    }

    #[test]
    fn response_envelope_serializes_camel_case() {
        let response = AlexaResponse::speech("xin chào").with_reprompt("còn gì nữa?");
        let json = serde_json::to_value(&response).unwrap();
        assert_eq!(json["version"], "1.0");
        assert_eq!(json["response"]["outputSpeech"]["type"], "PlainText");
        assert_eq!(json["response"]["shouldEndSession"], true);
        assert_eq!(
            json["response"]["reprompt"]["outputSpeech"]["text"],
            "còn gì nữa?"
        );
    }

    #[test]
    fn envelope_tolerates_missing_request() {
        let envelope: AlexaEnvelope = serde_json::from_str("{}").unwrap();
        assert_eq!(envelope.request.kind, "");
        assert!(envelope.request.intent.is_none());
    }
}
