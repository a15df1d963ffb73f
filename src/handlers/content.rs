//! Content generation forwarding
//!
//! Only the TikTok generator is wired downstream; other platforms are
//! rejected as bad input.

use std::sync::Arc;

use async_trait::async_trait;
use serde_json::Value;

use super::{Handler, input_str_or};
use crate::backend::BackendClient;
use crate::session::Session;
use crate::{Error, Result};

pub struct ContentHandler {
    backend: Arc<BackendClient>,
}

impl ContentHandler {
    #[must_use]
    pub fn new(backend: Arc<BackendClient>) -> Self {
        Self { backend }
    }
}

#[async_trait]
impl Handler for ContentHandler {
    async fn handle(&self, input: &Value, _session: &Session) -> Result<Value> {
        let platform = input_str_or(input, "platform", "tiktok");
        if platform != "tiktok" {
            return Err(Error::BadInput(format!(
                "content platform not supported: {platform}"
            )));
        }

        let topic = input_str_or(input, "topic", "");
        let style = input_str_or(input, "style", "viral");
        let audience = input_str_or(input, "audience", "gen-z");

        self.backend.generate_content(topic, style, audience).await
    }
}
