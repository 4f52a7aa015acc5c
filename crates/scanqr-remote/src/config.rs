//! # Remote Configuration
//!
//! Where the `/codes` service lives and how long to wait for it.
//!
//! ## Configuration Sources
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Configuration Priority                               │
//! │                                                                         │
//! │  1. Environment Variables (highest priority)                           │
//! │     SCANQR_REMOTE_URL=http://10.0.0.5:3000                             │
//! │     SCANQR_REMOTE_TIMEOUT_SECS=5                                       │
//! │                                                                         │
//! │  2. [backend] table of scanqr.toml (see scanqr-store)                  │
//! │                                                                         │
//! │  3. Default Values (lowest priority)                                   │
//! │     http://localhost:3000, 10 s request timeout, 5 s connect timeout   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::debug;
use url::Url;

use crate::error::{RemoteError, RemoteResult};

/// Environment variable overriding the base URL.
pub const ENV_REMOTE_URL: &str = "SCANQR_REMOTE_URL";

/// Environment variable overriding the request timeout, in seconds.
pub const ENV_REMOTE_TIMEOUT_SECS: &str = "SCANQR_REMOTE_TIMEOUT_SECS";

/// Connection settings for the remote backend.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RemoteConfig {
    /// Base URL of the service. `/codes` is appended to it.
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Whole-request timeout (milliseconds).
    #[serde(default = "default_timeout_ms")]
    pub timeout_ms: u64,

    /// TCP connect timeout (milliseconds).
    #[serde(default = "default_connect_timeout_ms")]
    pub connect_timeout_ms: u64,
}

fn default_base_url() -> String {
    "http://localhost:3000".to_string()
}

fn default_timeout_ms() -> u64 {
    10_000
}

fn default_connect_timeout_ms() -> u64 {
    5_000
}

impl Default for RemoteConfig {
    fn default() -> Self {
        RemoteConfig {
            base_url: default_base_url(),
            timeout_ms: default_timeout_ms(),
            connect_timeout_ms: default_connect_timeout_ms(),
        }
    }
}

impl RemoteConfig {
    /// Config pointing at `base_url` with default timeouts.
    pub fn new(base_url: impl Into<String>) -> Self {
        RemoteConfig {
            base_url: base_url.into(),
            ..Default::default()
        }
    }

    /// Sets the request timeout.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout_ms = timeout.as_millis() as u64;
        self
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }

    pub fn connect_timeout(&self) -> Duration {
        Duration::from_millis(self.connect_timeout_ms)
    }

    /// Parses and checks the base URL.
    pub fn parsed_base_url(&self) -> RemoteResult<Url> {
        let url = Url::parse(&self.base_url)?;

        if !matches!(url.scheme(), "http" | "https") {
            return Err(RemoteError::InvalidUrl(format!(
                "Base URL must start with http:// or https://, got: {}",
                self.base_url
            )));
        }
        if url.cannot_be_a_base() || url.host().is_none() {
            return Err(RemoteError::InvalidUrl(format!(
                "Base URL has no host: {}",
                self.base_url
            )));
        }

        Ok(url)
    }

    /// Validates the configuration.
    pub fn validate(&self) -> RemoteResult<()> {
        self.parsed_base_url()?;

        if self.timeout_ms == 0 {
            return Err(RemoteError::InvalidConfig(
                "timeout_ms must be greater than 0".into(),
            ));
        }
        if self.connect_timeout_ms == 0 {
            return Err(RemoteError::InvalidConfig(
                "connect_timeout_ms must be greater than 0".into(),
            ));
        }

        Ok(())
    }

    /// Applies environment variable overrides.
    pub fn apply_env_overrides(&mut self) {
        self.apply_overrides(|key| std::env::var(key).ok());
    }

    /// Applies overrides from `lookup`, keyed by environment variable name.
    pub fn apply_overrides(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        if let Some(url) = lookup(ENV_REMOTE_URL) {
            debug!(url = %url, "Overriding remote URL");
            self.base_url = url;
        }

        if let Some(secs) = lookup(ENV_REMOTE_TIMEOUT_SECS) {
            if let Ok(s) = secs.parse::<u64>() {
                self.timeout_ms = s * 1000;
            }
        }
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
