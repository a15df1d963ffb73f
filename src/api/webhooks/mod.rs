//! Webhook endpoints for voice-assistant platforms
//!
//! Each platform fixes its own request/response envelope; the handlers here
//! extract the intent and slot values, call the downstream backend, and
//! reformat the result. Failures are spoken as canned apologies, never
//! surfaced as transport errors.

use std::sync::Arc;

use axum::{Router, routing::post};
use serde_json::Value;

use super::ApiState;

pub mod alexa;
pub mod google_assistant;

/// Build webhooks router
pub fn router(state: Arc<ApiState>) -> Router {
    Router::new()
        .route("/alexa", post(alexa::handle_request))
        .route("/google-assistant", post(google_assistant::handle_request))
        .with_state(state)
}

/// Render a snapshot field for speech, N/A when absent
pub(crate) fn field_display(record: &Value, key: &str) -> String {
    match record.get(key) {
        Some(Value::String(s)) => s.clone(),
        Some(Value::Number(n)) => n.to_string(),
        _ => "N/A".to_string(),
    }
}

/// Format a price with dot thousands separators, Vietnamese style
pub(crate) fn format_price(price: i64) -> String {
    let digits = price.abs().to_string();
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push('.');
        }
        grouped.push(c);
    }
    if price < 0 {
        format!("-{grouped}")
    } else {
        grouped
    }
}
