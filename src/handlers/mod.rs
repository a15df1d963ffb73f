//! Built-in capability handlers
//!
//! Each handler is a thin forwarding layer over one backend endpoint plus
//! error translation. None of them retries.

mod analytics;
mod content;
mod messaging;
mod nlu;
mod prices;

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use serde_json::Value;

use crate::backend::BackendClient;
use crate::registry::CapabilityKind;
use crate::session::Session;
use crate::Result;

pub use analytics::AnalyticsHandler;
pub use content::ContentHandler;
pub use messaging::MessagingHandler;
pub use nlu::{NluHandler, VoiceCommandHandler};
pub use prices::PriceHandler;

/// A capability implementation
///
/// Handlers may fail for any reason (downstream error, timeout, malformed
/// input); the dispatcher catches every error at its boundary.
#[async_trait]
pub trait Handler: Send + Sync {
    /// Process an input payload in the context of a session
    ///
    /// # Errors
    ///
    /// Returns error on missing input fields or downstream failure
    async fn handle(&self, input: &Value, session: &Session) -> Result<Value>;
}

/// Build the handler table for the built-in capability set
#[must_use]
pub fn builtin_handlers(backend: Arc<BackendClient>) -> HashMap<CapabilityKind, Arc<dyn Handler>> {
    let mut handlers: HashMap<CapabilityKind, Arc<dyn Handler>> = HashMap::new();
    handlers.insert(
        CapabilityKind::VietnameseNlp,
        Arc::new(NluHandler::new(Arc::clone(&backend))),
    );
    handlers.insert(
        CapabilityKind::VoiceCommand,
        Arc::new(VoiceCommandHandler::new(Arc::clone(&backend))),
    );
    handlers.insert(
        CapabilityKind::ContentGeneration,
        Arc::new(ContentHandler::new(Arc::clone(&backend))),
    );
    handlers.insert(
        CapabilityKind::PriceMonitoring,
        Arc::new(PriceHandler::new(Arc::clone(&backend))),
    );
    handlers.insert(
        CapabilityKind::MultiMessaging,
        Arc::new(MessagingHandler::new(Arc::clone(&backend))),
    );
    handlers.insert(
        CapabilityKind::BusinessAnalytics,
        Arc::new(AnalyticsHandler::new(backend)),
    );
    handlers
}

/// Read an optional string field from an input payload
fn input_str<'a>(input: &'a Value, key: &str) -> Option<&'a str> {
    input.get(key).and_then(Value::as_str)
}

/// Read a string field with a default
fn input_str_or<'a>(input: &'a Value, key: &str, default: &'a str) -> &'a str {
    input_str(input, key).unwrap_or(default)
}
