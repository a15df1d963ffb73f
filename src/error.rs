//! Error types for Prism gateway

use thiserror::Error;

/// Result type alias for Prism operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur in Prism gateway
#[derive(Debug, Error)]
pub enum Error {
    /// Configuration error
    #[error("configuration error: {0}")]
    Config(String),

    /// Unknown capability or session
    #[error("not found: {0}")]
    NotFound(String),

    /// Capability is registered but disabled
    #[error("forbidden: {0}")]
    Forbidden(String),

    /// Missing or malformed request field
    #[error("bad input: {0}")]
    BadInput(String),

    /// Downstream backend failure (network error, timeout, or non-success status)
    #[error("downstream unavailable: {0}")]
    Downstream(String),

    /// IO error
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    /// HTTP error
    #[error("http error: {0}")]
    Http(#[from] reqwest::Error),

    /// Serialization error
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// TOML parsing error
    #[error("toml error: {0}")]
    Toml(#[from] toml::de::Error),
}
