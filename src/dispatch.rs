//! Capability dispatcher
//!
//! The single place where handler outcomes are normalized: every dispatch
//! produces exactly one `Success` or `Failure` envelope, and no handler
//! fault ever propagates past this boundary into the serving loop.

use std::collections::HashMap;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::Serialize;
use serde_json::{Value, json};

use crate::handlers::Handler;
use crate::registry::{CapabilityKind, CapabilityRegistry};
use crate::session::{Session, SessionStore};
use crate::{Error, Result};

/// Uniform outcome envelope for every capability invocation
#[derive(Debug, Clone, Serialize)]
#[serde(untagged)]
pub enum DispatchOutcome {
    Success {
        success: bool,
        capability_id: String,
        result: Value,
        session_id: String,
        timestamp: DateTime<Utc>,
    },
    Failure {
        success: bool,
        error: String,
        capability_id: String,
        session_id: String,
    },
}

impl DispatchOutcome {
    /// Build a success envelope stamped with the current time
    #[must_use]
    pub fn success(capability_id: &str, session_id: &str, result: Value) -> Self {
        Self::Success {
            success: true,
            capability_id: capability_id.to_string(),
            result,
            session_id: session_id.to_string(),
            timestamp: Utc::now(),
        }
    }

    /// Build a failure envelope carrying a human-readable message
    #[must_use]
    pub fn failure(capability_id: &str, session_id: &str, error: impl Into<String>) -> Self {
        Self::Failure {
            success: false,
            error: error.into(),
            capability_id: capability_id.to_string(),
            session_id: session_id.to_string(),
        }
    }

    /// Whether this outcome is a success
    #[must_use]
    pub const fn is_success(&self) -> bool {
        matches!(self, Self::Success { .. })
    }
}

/// Dispatches capability invocations to their handlers
///
/// Stateless itself: reads the registry, reads/touches the session store,
/// and owns the kind-to-handler table built at startup.
pub struct Dispatcher {
    registry: Arc<CapabilityRegistry>,
    sessions: Arc<SessionStore>,
    handlers: HashMap<CapabilityKind, Arc<dyn Handler>>,
}

impl Dispatcher {
    /// Create a dispatcher over the given registry, store, and handler table
    #[must_use]
    pub fn new(
        registry: Arc<CapabilityRegistry>,
        sessions: Arc<SessionStore>,
        handlers: HashMap<CapabilityKind, Arc<dyn Handler>>,
    ) -> Self {
        Self {
            registry,
            sessions,
            handlers,
        }
    }

    /// Invoke a capability for a session and normalize the outcome
    ///
    /// Unknown ids, disabled capabilities, and handler errors all come back
    /// as `Failure` envelopes; the session's last-activity is advanced only
    /// on success.
    pub async fn dispatch(
        &self,
        capability_id: &str,
        input: &Value,
        session: &Session,
    ) -> DispatchOutcome {
        match self.invoke(capability_id, input, session).await {
            Ok(result) => {
                self.sessions.touch(&session.id).await;
                tracing::debug!(
                    capability_id = %capability_id,
                    session_id = %session.id,
                    "capability dispatched"
                );
                DispatchOutcome::success(capability_id, &session.id, result)
            }
            Err(e) => {
                tracing::warn!(
                    capability_id = %capability_id,
                    session_id = %session.id,
                    error = %e,
                    "capability dispatch failed"
                );
                DispatchOutcome::failure(capability_id, &session.id, e.to_string())
            }
        }
    }

    async fn invoke(&self, capability_id: &str, input: &Value, session: &Session) -> Result<Value> {
        let capability = self
            .registry
            .get(capability_id)
            .await
            .ok_or_else(|| Error::NotFound(format!("capability not found: {capability_id}")))?;

        if !capability.enabled {
            return Err(Error::Forbidden(format!(
                "capability disabled: {capability_id}"
            )));
        }

        match self.handlers.get(&capability.kind) {
            Some(handler) => handler.handle(input, session).await,
            None => Ok(echo_result(capability_id, input, session)),
        }
    }
}

/// Default handler for capabilities with no registered implementation:
/// echoes the input back as a no-op success
fn echo_result(capability_id: &str, input: &Value, session: &Session) -> Value {
    json!({
        "message": format!("Capability {capability_id} processed successfully"),
        "input_data": input,
        "session_id": session.id,
    })
}
