//! Downstream backend API client
//!
//! All real work (NLU, content generation, price data, message delivery,
//! data snapshots) happens in a separate backend service consumed over REST.
//! Every call uses one bounded timeout and no retries; a single failure is
//! surfaced immediately.

use std::time::Duration;

use serde_json::{Value, json};

use crate::{Error, Result};

/// Messaging platform a message can be routed to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MessagePlatform {
    Email,
    Sms,
    Telegram,
    Zalo,
}

impl MessagePlatform {
    /// Parse a platform selector string
    #[must_use]
    pub fn parse(value: &str) -> Option<Self> {
        match value.to_lowercase().as_str() {
            "email" => Some(Self::Email),
            "sms" => Some(Self::Sms),
            "telegram" => Some(Self::Telegram),
            "zalo" => Some(Self::Zalo),
            _ => None,
        }
    }

    /// Display name used in user-facing confirmations
    #[must_use]
    pub const fn display_name(self) -> &'static str {
        match self {
            Self::Email => "Email",
            Self::Sms => "SMS",
            Self::Telegram => "Telegram",
            Self::Zalo => "Zalo",
        }
    }

    /// Backend send endpoint path
    const fn endpoint(self) -> &'static str {
        match self {
            Self::Email => "/api/messaging/send-email",
            Self::Sms => "/api/messaging/send-sms",
            Self::Telegram => "/api/messaging/send-telegram",
            Self::Zalo => "/api/messaging/send-zalo",
        }
    }

    /// Per-platform recipient field name in the send body
    const fn recipient_field(self) -> &'static str {
        match self {
            Self::Email => "to",
            Self::Sms => "phone",
            Self::Telegram => "chatId",
            Self::Zalo => "userId",
        }
    }
}

/// Client for the downstream backend REST API
#[derive(Debug, Clone)]
pub struct BackendClient {
    client: reqwest::Client,
    base_url: String,
}

impl BackendClient {
    /// Create a client with the given base URL and per-request timeout
    ///
    /// # Errors
    ///
    /// Returns error if the underlying HTTP client cannot be built
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> Result<Self> {
        let client = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        })
    }

    /// Forward a transcript to the NLU voice-command endpoint
    ///
    /// # Errors
    ///
    /// Returns error if the backend is unreachable or responds with a
    /// non-success status
    pub async fn voice_command(&self, transcript: &str) -> Result<Value> {
        self.post_json(
            "/api/ai/voice-command",
            &json!({
                "transcript": transcript,
                "confidence": 0.9,
                "language": "vi",
            }),
        )
        .await
    }

    /// Request a generated TikTok content script
    ///
    /// # Errors
    ///
    /// Returns error if the backend is unreachable or responds with a
    /// non-success status
    pub async fn generate_content(&self, topic: &str, style: &str, audience: &str) -> Result<Value> {
        self.post_json(
            "/api/tiktok/generate-content",
            &json!({
                "topic": topic,
                "category": "general",
                "duration": 30,
                "audience": audience,
                "style": style,
            }),
        )
        .await
    }

    /// Fetch the list of monitored e-commerce products
    ///
    /// # Errors
    ///
    /// Returns error if the backend is unreachable or responds with a
    /// non-success status
    pub async fn monitored_products(&self) -> Result<Value> {
        self.get_json("/api/shopee/monitored-products").await
    }

    /// Send a message through one of the messaging platforms
    ///
    /// # Errors
    ///
    /// Returns error if the backend is unreachable or responds with a
    /// non-success status
    pub async fn send_message(
        &self,
        platform: MessagePlatform,
        recipient: &str,
        content: &str,
        subject: Option<&str>,
    ) -> Result<Value> {
        let mut body = serde_json::Map::new();
        body.insert(
            platform.recipient_field().to_string(),
            Value::String(recipient.to_string()),
        );
        body.insert("content".to_string(), Value::String(content.to_string()));
        if platform == MessagePlatform::Email {
            body.insert(
                "subject".to_string(),
                Value::String(subject.unwrap_or("Message from Prism").to_string()),
            );
        }
        self.post_json(platform.endpoint(), &Value::Object(body)).await
    }

    /// Fetch the latest combined news/stock/social/weather snapshot
    ///
    /// # Errors
    ///
    /// Returns error if the backend is unreachable or responds with a
    /// non-success status
    pub async fn latest_snapshot(&self) -> Result<Value> {
        self.get_json("/api/data/latest").await
    }

    async fn post_json(&self, path: &str, body: &Value) -> Result<Value> {
        let url = format!("{}{path}", self.base_url);
        let response = self
            .client
            .post(&url)
            .json(body)
            .send()
            .await
            .map_err(|e| Error::Downstream(format!("backend request failed: {e}")))?;
        Self::read_json(path, response).await
    }

    async fn get_json(&self, path: &str) -> Result<Value> {
        let url = format!("{}{path}", self.base_url);
        let response = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(|e| Error::Downstream(format!("backend request failed: {e}")))?;
        Self::read_json(path, response).await
    }

    async fn read_json(path: &str, response: reqwest::Response) -> Result<Value> {
        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(Error::Downstream(format!(
                "backend returned {status} for {path}: {body}"
            )));
        }

        response
            .json::<Value>()
            .await
            .map_err(|e| Error::Downstream(format!("invalid backend response for {path}: {e}")))
    }
}
