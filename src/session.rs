//! In-memory session store
//!
//! Sessions tie a caller's platform, user identity, and free-form context
//! together across requests. They live for the life of the process unless
//! evicted by the idle sweep.

use std::collections::HashMap;
use std::time::Duration;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use tokio::sync::RwLock;
use uuid::Uuid;

/// Platform a session originates from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PlatformKind {
    Web,
    Mobile,
    Desktop,
    Iot,
    Voice,
    Chat,
}

/// Per-caller session state
#[derive(Debug, Clone, Serialize)]
pub struct Session {
    /// Randomly generated unique identifier
    pub id: String,

    /// Originating platform
    pub platform: PlatformKind,

    /// Opaque caller-supplied user identifier
    pub user_id: String,

    /// Capability ids granted at creation; informational only, dangling ids
    /// are tolerated and fail at dispatch time
    pub capabilities: Vec<String>,

    /// Open key-value context carried across calls, not interpreted here
    pub context: Map<String, Value>,

    /// Creation time
    pub created_at: DateTime<Utc>,

    /// Time of the last successful dispatch through this session
    pub last_activity: DateTime<Utc>,
}

/// In-memory map from session id to session record
#[derive(Debug, Default)]
pub struct SessionStore {
    sessions: RwLock<HashMap<String, Session>>,
}

impl SessionStore {
    /// Create a new empty store
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a session and return it
    pub async fn create(
        &self,
        platform: PlatformKind,
        user_id: String,
        capabilities: Vec<String>,
        context: Map<String, Value>,
    ) -> Session {
        let now = Utc::now();
        let session = Session {
            id: Uuid::new_v4().to_string(),
            platform,
            user_id,
            capabilities,
            context,
            created_at: now,
            last_activity: now,
        };

        self.sessions
            .write()
            .await
            .insert(session.id.clone(), session.clone());

        tracing::info!(session_id = %session.id, platform = ?platform, "session created");
        session
    }

    /// Get a session by id
    pub async fn get(&self, id: &str) -> Option<Session> {
        self.sessions.read().await.get(id).cloned()
    }

    /// Advance a session's last-activity timestamp
    ///
    /// Last-activity only ever moves forward. Returns false if the id is
    /// unknown.
    pub async fn touch(&self, id: &str) -> bool {
        let mut sessions = self.sessions.write().await;
        match sessions.get_mut(id) {
            Some(session) => {
                let now = Utc::now();
                if now > session.last_activity {
                    session.last_activity = now;
                }
                true
            }
            None => false,
        }
    }

    /// List all live sessions, oldest first
    pub async fn list(&self) -> Vec<Session> {
        let mut sessions: Vec<Session> = self.sessions.read().await.values().cloned().collect();
        sessions.sort_by_key(|s| s.created_at);
        sessions
    }

    /// Number of live sessions
    pub async fn len(&self) -> usize {
        self.sessions.read().await.len()
    }

    /// Whether the store is empty
    pub async fn is_empty(&self) -> bool {
        self.sessions.read().await.is_empty()
    }

    /// Drop sessions idle longer than `ttl`, returning how many were evicted
    pub async fn evict_idle(&self, ttl: Duration) -> usize {
        let Ok(ttl) = chrono::Duration::from_std(ttl) else {
            return 0;
        };
        let cutoff = Utc::now() - ttl;

        let mut sessions = self.sessions.write().await;
        let before = sessions.len();
        sessions.retain(|_, session| session.last_activity >= cutoff);
        let evicted = before - sessions.len();

        if evicted > 0 {
            tracing::info!(evicted, remaining = sessions.len(), "idle sessions evicted");
        }
        evicted
    }
}
