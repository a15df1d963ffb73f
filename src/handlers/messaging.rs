//! Multi-platform message routing
//!
//! Routes a send request to one of four backend endpoints based on the
//! platform selector. A missing or unknown selector is bad input, not a
//! silent default.

use std::sync::Arc;

use async_trait::async_trait;
use serde_json::Value;

use super::{Handler, input_str, input_str_or};
use crate::backend::{BackendClient, MessagePlatform};
use crate::session::Session;
use crate::{Error, Result};

pub struct MessagingHandler {
    backend: Arc<BackendClient>,
}

impl MessagingHandler {
    #[must_use]
    pub fn new(backend: Arc<BackendClient>) -> Self {
        Self { backend }
    }
}

#[async_trait]
impl Handler for MessagingHandler {
    async fn handle(&self, input: &Value, _session: &Session) -> Result<Value> {
        let Some(selector) = input_str(input, "platform") else {
            return Err(Error::BadInput(
                "missing messaging platform selector".to_string(),
            ));
        };
        let Some(platform) = MessagePlatform::parse(selector) else {
            return Err(Error::BadInput(format!(
                "unsupported messaging platform: {selector}"
            )));
        };

        let recipient = input_str_or(input, "recipient", "");
        let content = input_str_or(input, "content", "");
        let subject = input_str(input, "subject");

        self.backend
            .send_message(platform, recipient, content, subject)
            .await
    }
}
