//! Prism Gateway - Voice-assistant webhook adapters and multi-platform session gateway
//!
//! This library provides the core functionality for the Prism gateway:
//! - Session store and capability registry
//! - Capability dispatch with a uniform success/failure envelope
//! - HTTP, WebSocket, and voice-webhook transport adapters
//! - A thin client for the downstream backend API
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────┐
//! │                    Interfaces                        │
//! │   REST  │  WebSocket  │  Alexa  │  Google Assistant │
//! └────────────────────┬────────────────────────────────┘
//!                      │
//! ┌────────────────────▼────────────────────────────────┐
//! │                 Prism Gateway                        │
//! │   Sessions  │  Registry  │  Dispatcher  │ Handlers  │
//! └────────────────────┬────────────────────────────────┘
//!                      │
//! ┌────────────────────▼────────────────────────────────┐
//! │              Downstream Backend                      │
//! │   NLU  │  Content  │  Prices  │  Messaging  │ Data  │
//! └─────────────────────────────────────────────────────┘
//! ```

pub mod analytics;
pub mod api;
pub mod backend;
pub mod config;
pub mod dispatch;
pub mod error;
pub mod handlers;
pub mod registry;
pub mod session;

pub use backend::{BackendClient, MessagePlatform};
pub use config::Config;
pub use dispatch::{DispatchOutcome, Dispatcher};
pub use error::{Error, Result};
pub use registry::{
    Capability, CapabilityCategory, CapabilityKind, CapabilityRegistry, builtin_capabilities,
};
pub use session::{PlatformKind, Session, SessionStore};
