//! HTTP API server for Prism gateway

pub mod capabilities;
pub mod process;
pub mod service;
pub mod sessions;
pub mod webhooks;
pub mod websocket;

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use axum::Router;
use serde_json::Value;
use tokio::net::TcpListener;
use tokio::sync::{RwLock, mpsc};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::backend::BackendClient;
use crate::config::Config;
use crate::dispatch::Dispatcher;
use crate::handlers::builtin_handlers;
use crate::registry::{CapabilityRegistry, builtin_capabilities};
use crate::session::SessionStore;
use crate::Result;

/// Shared sender registry for active WebSocket connections, keyed by
/// session id, for best-effort background-result pushes
pub type WsSenders = Arc<RwLock<HashMap<String, mpsc::Sender<Value>>>>;

/// Shared state for API handlers
pub struct ApiState {
    pub registry: Arc<CapabilityRegistry>,
    pub sessions: Arc<SessionStore>,
    pub dispatcher: Arc<Dispatcher>,
    pub backend: Arc<BackendClient>,
    pub ws_senders: WsSenders,
    /// Artificial delay before a deferred dispatch re-runs
    pub background_delay: Duration,
}

/// Build the router with all routes
#[must_use]
pub fn router(state: Arc<ApiState>) -> Router {
    let router = Router::new()
        .merge(service::router(state.clone()))
        .merge(sessions::router(state.clone()))
        .merge(process::router(state.clone()))
        .merge(capabilities::router(state.clone()))
        .nest("/ws", websocket::router(state.clone()))
        .nest("/webhooks", webhooks::router(state));

    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    router.layer(cors).layer(TraceLayer::new_for_http())
}

/// API server
pub struct ApiServer {
    state: Arc<ApiState>,
    port: u16,
    session_ttl: Duration,
    sweep_interval: Duration,
}

impl ApiServer {
    /// Assemble the server: backend client, built-in capability set,
    /// handler table, dispatcher, and empty session store
    ///
    /// # Errors
    ///
    /// Returns error if the backend client cannot be built
    pub async fn new(config: &Config) -> Result<Self> {
        let backend = Arc::new(BackendClient::new(
            config.backend_url.clone(),
            config.request_timeout,
        )?);

        let registry = Arc::new(CapabilityRegistry::new());
        for capability in builtin_capabilities() {
            registry.register(capability).await;
        }
        tracing::info!(capabilities = registry.len().await, "capability registry initialized");

        let sessions = Arc::new(SessionStore::new());
        let dispatcher = Arc::new(Dispatcher::new(
            Arc::clone(&registry),
            Arc::clone(&sessions),
            builtin_handlers(Arc::clone(&backend)),
        ));

        let state = Arc::new(ApiState {
            registry,
            sessions,
            dispatcher,
            backend,
            ws_senders: Arc::new(RwLock::new(HashMap::new())),
            background_delay: Duration::from_secs(1),
        });

        Ok(Self {
            state,
            port: config.port,
            session_ttl: config.session_ttl,
            sweep_interval: config.sweep_interval,
        })
    }

    /// Shared state, exposed for tests and embedding
    #[must_use]
    pub fn state(&self) -> Arc<ApiState> {
        Arc::clone(&self.state)
    }

    /// Run the API server
    ///
    /// # Errors
    ///
    /// Returns error if the server fails to bind or serve
    pub async fn run(self) -> Result<()> {
        spawn_session_sweeper(
            Arc::clone(&self.state.sessions),
            self.session_ttl,
            self.sweep_interval,
        );

        let addr = format!("0.0.0.0:{}", self.port);
        let listener = TcpListener::bind(&addr)
            .await
            .map_err(|e| crate::Error::Config(format!("failed to bind API server: {e}")))?;

        tracing::info!(port = self.port, "API server listening");

        axum::serve(listener, router(self.state))
            .await
            .map_err(|e| crate::Error::Config(format!("API server error: {e}")))?;

        Ok(())
    }

    /// Run the API server in a background task
    #[must_use]
    pub fn spawn(self) -> tokio::task::JoinHandle<Result<()>> {
        tokio::spawn(async move { self.run().await })
    }
}

/// Periodically evict idle sessions
fn spawn_session_sweeper(sessions: Arc<SessionStore>, ttl: Duration, interval: Duration) {
    tokio::spawn(async move {
        let mut ticker = tokio::time::interval(interval);
        ticker.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Skip);
        loop {
            ticker.tick().await;
            sessions.evict_idle(ttl).await;
        }
    });
}
