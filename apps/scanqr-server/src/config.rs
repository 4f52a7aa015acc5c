//! Server configuration module.
//!
//! Configuration is loaded from environment variables with fallback to defaults.

use std::env;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// Which local backend the server persists to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ServerBackend {
    Sqlite { path: PathBuf },
    KeyValue { dir: PathBuf },
}

/// Server configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServerConfig {
    /// HTTP port
    pub port: u16,

    /// Interface to bind
    pub bind_addr: String,

    /// Where records are stored
    pub backend: ServerBackend,
}

impl ServerConfig {
    /// Load configuration from environment variables.
    pub fn load() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Load configuration from `lookup`, keyed by environment variable name.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let port = lookup("SCANQR_SERVER_PORT")
            .unwrap_or_else(|| "3000".to_string())
            .parse()
            .map_err(|_| ConfigError::InvalidValue("SCANQR_SERVER_PORT".to_string()))?;

        let bind_addr = lookup("SCANQR_SERVER_BIND").unwrap_or_else(|| "0.0.0.0".to_string());

        let kind = lookup("SCANQR_SERVER_BACKEND").unwrap_or_else(|| "sqlite".to_string());
        let backend = match kind.to_lowercase().as_str() {
            "sqlite" | "sql" => ServerBackend::Sqlite {
                path: lookup("SCANQR_DB_PATH")
                    .unwrap_or_else(|| "scanqr_server.db".to_string())
                    .into(),
            },
            "key_value" | "key-value" | "kv" => ServerBackend::KeyValue {
                dir: lookup("SCANQR_KV_DIR")
                    .unwrap_or_else(|| "scanqr_server_kv".to_string())
                    .into(),
            },
            _ => return Err(ConfigError::InvalidValue("SCANQR_SERVER_BACKEND".to_string())),
        };

        Ok(ServerConfig {
            port,
            bind_addr,
            backend,
        })
    }

    /// `bind_addr:port`
    pub fn address(&self) -> String {
        format!("{}:{}", self.bind_addr, self.port)
    }
}

/// Configuration error types.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Invalid value for {0}")]
    InvalidValue(String),
}
