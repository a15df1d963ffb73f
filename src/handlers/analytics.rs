//! Business analytics composite
//!
//! Fetches the combined backend snapshot and applies the sentiment, trend,
//! and engagement scorers to its sections.

use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;
use serde_json::{Value, json};

use super::Handler;
use crate::analytics::{Article, SocialPost, StockChange, news_sentiment, social_engagement, stock_trend};
use crate::backend::BackendClient;
use crate::session::Session;
use crate::Result;

pub struct AnalyticsHandler {
    backend: Arc<BackendClient>,
}

impl AnalyticsHandler {
    #[must_use]
    pub fn new(backend: Arc<BackendClient>) -> Self {
        Self { backend }
    }
}

#[async_trait]
impl Handler for AnalyticsHandler {
    async fn handle(&self, _input: &Value, _session: &Session) -> Result<Value> {
        let snapshot = self.backend.latest_snapshot().await?;

        let news: Vec<Article> = parse_section(&snapshot, "news");
        let stocks: Vec<StockChange> = parse_section(&snapshot, "stocks");
        let social: Vec<SocialPost> = parse_section(&snapshot, "social");
        let weather = snapshot.get("weather").cloned().unwrap_or_else(|| json!({}));

        Ok(json!({
            "news_insights": news_sentiment(&news),
            "market_trends": stock_trend(&stocks),
            "social_engagement": social_engagement(&social),
            "weather_impact": weather,
            "timestamp": Utc::now(),
        }))
    }
}

/// Parse one snapshot section into typed records, tolerating absent or
/// malformed entries
fn parse_section<T: serde::de::DeserializeOwned + Default>(snapshot: &Value, key: &str) -> Vec<T> {
    snapshot
        .get(key)
        .and_then(Value::as_array)
        .map(|items| {
            items
                .iter()
                .map(|item| serde_json::from_value(item.clone()).unwrap_or_default())
                .collect()
        })
        .unwrap_or_default()
}
