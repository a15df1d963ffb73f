//! Configuration management for Prism gateway
//!
//! Settings come from three layers: built-in defaults, an optional TOML file,
//! and `GATEWAY_*` environment variables. Later layers win.

use std::path::Path;
use std::time::Duration;

use serde::Deserialize;

use crate::{Error, Result};

/// Default downstream backend base URL
pub const DEFAULT_BACKEND_URL: &str = "http://localhost:5000";

/// Default API server port
pub const DEFAULT_PORT: u16 = 8000;

/// Default downstream request timeout in seconds
pub const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 10;

/// Default idle-session TTL in seconds
pub const DEFAULT_SESSION_TTL_SECS: u64 = 1800;

/// Prism gateway configuration
#[derive(Debug, Clone)]
pub struct Config {
    /// Port to listen on
    pub port: u16,

    /// Base URL of the downstream backend API
    pub backend_url: String,

    /// Timeout applied to every downstream request
    pub request_timeout: Duration,

    /// Sessions idle longer than this are evicted
    pub session_ttl: Duration,

    /// Interval between eviction sweeps
    pub sweep_interval: Duration,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            port: DEFAULT_PORT,
            backend_url: DEFAULT_BACKEND_URL.to_string(),
            request_timeout: Duration::from_secs(DEFAULT_REQUEST_TIMEOUT_SECS),
            session_ttl: Duration::from_secs(DEFAULT_SESSION_TTL_SECS),
            sweep_interval: Duration::from_secs(DEFAULT_SESSION_TTL_SECS / 4),
        }
    }
}

/// Top-level TOML configuration file schema
///
/// All fields are optional; the file is a partial overlay on top of defaults.
#[derive(Debug, Default, Deserialize)]
struct ConfigFile {
    #[serde(default)]
    server: ServerFileConfig,

    #[serde(default)]
    backend: BackendFileConfig,

    #[serde(default)]
    session: SessionFileConfig,
}

/// Server/runtime configuration
#[derive(Debug, Default, Deserialize)]
struct ServerFileConfig {
    /// API server port
    port: Option<u16>,
}

/// Downstream backend configuration
#[derive(Debug, Default, Deserialize)]
struct BackendFileConfig {
    /// Base URL of the backend API
    url: Option<String>,

    /// Per-request timeout in seconds
    timeout_secs: Option<u64>,
}

/// Session store configuration
#[derive(Debug, Default, Deserialize)]
struct SessionFileConfig {
    /// Idle TTL in seconds
    ttl_secs: Option<u64>,

    /// Eviction sweep interval in seconds
    sweep_interval_secs: Option<u64>,
}

impl Config {
    /// Load configuration from an optional TOML file plus environment overrides
    ///
    /// # Errors
    ///
    /// Returns error if the file exists but cannot be read or parsed, or if
    /// an environment override holds an unparsable value
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let file = match path {
            Some(p) if p.exists() => {
                let content = std::fs::read_to_string(p)?;
                toml::from_str::<ConfigFile>(&content)?
            }
            Some(p) => {
                return Err(Error::Config(format!(
                    "config file not found: {}",
                    p.display()
                )));
            }
            None => ConfigFile::default(),
        };

        let mut config = Self::default();

        if let Some(port) = file.server.port {
            config.port = port;
        }
        if let Some(url) = file.backend.url {
            config.backend_url = url;
        }
        if let Some(secs) = file.backend.timeout_secs {
            config.request_timeout = Duration::from_secs(secs);
        }
        if let Some(secs) = file.session.ttl_secs {
            config.session_ttl = Duration::from_secs(secs);
        }
        if let Some(secs) = file.session.sweep_interval_secs {
            config.sweep_interval = Duration::from_secs(secs);
        } else if file.session.ttl_secs.is_some() {
            config.sweep_interval = config.session_ttl / 4;
        }

        config.apply_env()?;
        config.backend_url = config.backend_url.trim_end_matches('/').to_string();
        Ok(config)
    }

    /// Apply `GATEWAY_*` environment variable overrides
    fn apply_env(&mut self) -> Result<()> {
        if let Ok(url) = std::env::var("GATEWAY_BACKEND_URL") {
            self.backend_url = url;
        }
        if let Ok(secs) = std::env::var("GATEWAY_REQUEST_TIMEOUT_SECS") {
            self.request_timeout = Duration::from_secs(parse_secs("GATEWAY_REQUEST_TIMEOUT_SECS", &secs)?);
        }
        if let Ok(secs) = std::env::var("GATEWAY_SESSION_TTL_SECS") {
            self.session_ttl = Duration::from_secs(parse_secs("GATEWAY_SESSION_TTL_SECS", &secs)?);
            self.sweep_interval = self.session_ttl / 4;
        }
        Ok(())
    }
}

fn parse_secs(var: &str, value: &str) -> Result<u64> {
    value
        .parse::<u64>()
        .map_err(|_| Error::Config(format!("{var} must be an integer, got {value:?}")))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let config = Config::default();
        assert_eq!(config.port, DEFAULT_PORT);
        assert_eq!(config.backend_url, DEFAULT_BACKEND_URL);
        assert_eq!(config.request_timeout, Duration::from_secs(10));
    }

    #[test]
    fn file_overlay() {
        let content = r#"
            [server]
            port = 9000

            [backend]
            url = "http://backend:5000/"
            timeout_secs = 5

            [session]
            ttl_secs = 600
        "#;
        let file: ConfigFile = toml::from_str(content).unwrap();
        assert_eq!(file.server.port, Some(9000));
        assert_eq!(file.backend.timeout_secs, Some(5));
        assert_eq!(file.session.ttl_secs, Some(600));
    }

    #[test]
    fn missing_file_is_an_error() {
        let result = Config::load(Some(Path::new("/nonexistent/gateway.toml")));
        assert!(result.is_err());
    }
}
