//! Text and voice command forwarding
//!
//! Both handlers delegate to the backend NLU endpoint and relay the
//! intent/response/action fields; the voice handler just requires a
//! transcript first.

use std::sync::Arc;

use async_trait::async_trait;
use serde_json::{Value, json};

use super::{Handler, input_str, input_str_or};
use crate::backend::BackendClient;
use crate::session::Session;
use crate::{Error, Result};

/// Vietnamese text processing via the backend NLU endpoint
pub struct NluHandler {
    backend: Arc<BackendClient>,
}

impl NluHandler {
    #[must_use]
    pub fn new(backend: Arc<BackendClient>) -> Self {
        Self { backend }
    }
}

#[async_trait]
impl Handler for NluHandler {
    async fn handle(&self, input: &Value, _session: &Session) -> Result<Value> {
        let text = input_str_or(input, "text", "");
        relay_nlu(&self.backend, text).await
    }
}

/// Voice command processing: requires a transcript, then follows the text path
pub struct VoiceCommandHandler {
    backend: Arc<BackendClient>,
}

impl VoiceCommandHandler {
    #[must_use]
    pub fn new(backend: Arc<BackendClient>) -> Self {
        Self { backend }
    }
}

#[async_trait]
impl Handler for VoiceCommandHandler {
    async fn handle(&self, input: &Value, _session: &Session) -> Result<Value> {
        match input_str(input, "transcript") {
            Some(transcript) if !transcript.is_empty() => {
                relay_nlu(&self.backend, transcript).await
            }
            _ => Err(Error::BadInput("no transcript provided".to_string())),
        }
    }
}

/// Forward text to the NLU endpoint and relay the interesting fields
async fn relay_nlu(backend: &BackendClient, text: &str) -> Result<Value> {
    let data = backend.voice_command(text).await?;
    Ok(json!({
        "intent": data.get("intent").and_then(Value::as_str).unwrap_or("unknown"),
        "response": data.get("response").and_then(Value::as_str).unwrap_or(""),
        "actions": data.get("actions").cloned().unwrap_or_else(|| json!([])),
        "processing_time": data.get("processing_time").cloned().unwrap_or_else(|| json!(0)),
    }))
}
