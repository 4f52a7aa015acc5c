//! # Store Configuration
//!
//! Which backend the façade opens, and where its data lives.
//!
//! ## Configuration Sources
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Configuration Priority                               │
//! │                                                                         │
//! │  1. Environment Variables (highest priority)                           │
//! │     SCANQR_BACKEND=sqlite | key_value | remote                         │
//! │     SCANQR_DB_PATH=/var/lib/scanqr/scanqr.db                           │
//! │     SCANQR_KV_DIR=/var/lib/scanqr/kv                                   │
//! │     SCANQR_REMOTE_URL=http://10.0.0.5:3000                             │
//! │                                                                         │
//! │  2. Config File (scanqr.toml)                                          │
//! │     ~/.config/scanqr/scanqr.toml on Linux                              │
//! │                                                                         │
//! │  3. Default Values (lowest priority)                                   │
//! │     SQLite file under the platform data directory                      │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Example scanqr.toml
//! ```toml
//! [backend]
//! kind = "remote"
//! base_url = "http://10.0.0.5:3000"
//! timeout_ms = 5000
//! ```

use std::path::PathBuf;

use scanqr_core::{BackendKind, StoreBackend, StoreError, StoreResult};
use scanqr_db::{DbConfig, FileStorage, KeyValueBackend, SqliteBackend};
use scanqr_remote::{RemoteBackend, RemoteConfig};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, info, warn};

/// Environment variable selecting the backend kind.
pub const ENV_BACKEND: &str = "SCANQR_BACKEND";

/// Environment variable overriding the SQLite file.
pub const ENV_DB_PATH: &str = "SCANQR_DB_PATH";

/// Environment variable overriding the key-value directory.
pub const ENV_KV_DIR: &str = "SCANQR_KV_DIR";

const DB_FILE_NAME: &str = "scanqr.db";
const KV_DIR_NAME: &str = "kv";
const CONFIG_FILE_NAME: &str = "scanqr.toml";

// =============================================================================
// Errors
// =============================================================================

/// Configuration failures.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to load config: {0}")]
    LoadFailed(String),

    #[error("Failed to save config: {0}")]
    SaveFailed(String),

    #[error("Invalid configuration: {0}")]
    Invalid(String),
}

impl From<std::io::Error> for ConfigError {
    fn from(err: std::io::Error) -> Self {
        ConfigError::LoadFailed(err.to_string())
    }
}

impl From<toml::de::Error> for ConfigError {
    fn from(err: toml::de::Error) -> Self {
        ConfigError::LoadFailed(err.to_string())
    }
}

impl From<toml::ser::Error> for ConfigError {
    fn from(err: toml::ser::Error) -> Self {
        ConfigError::SaveFailed(err.to_string())
    }
}

impl From<ConfigError> for StoreError {
    fn from(err: ConfigError) -> Self {
        StoreError::BackendUnavailable(err.to_string())
    }
}

pub type ConfigResult<T> = Result<T, ConfigError>;

// =============================================================================
// Backend Selection
// =============================================================================

/// One backend variant and its connection parameters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum BackendConfig {
    /// Embedded SQLite file.
    Sqlite {
        path: PathBuf,
        /// Drop and recreate the table on open. Destroys every record.
        #[serde(default)]
        reset_on_connect: bool,
    },

    /// One JSON blob per key in a directory.
    KeyValue { dir: PathBuf },

    /// The `/codes` HTTP service.
    Remote(RemoteConfig),
}

impl Default for BackendConfig {
    fn default() -> Self {
        BackendConfig::default_for(BackendKind::default())
    }
}

impl BackendConfig {
    /// Default parameters for `kind`.
    pub fn default_for(kind: BackendKind) -> Self {
        match kind {
            BackendKind::Sqlite => BackendConfig::Sqlite {
                path: data_dir().join(DB_FILE_NAME),
                reset_on_connect: false,
            },
            BackendKind::KeyValue => BackendConfig::KeyValue {
                dir: data_dir().join(KV_DIR_NAME),
            },
            BackendKind::Remote => BackendConfig::Remote(RemoteConfig::default()),
        }
    }

    pub fn kind(&self) -> BackendKind {
        match self {
            BackendConfig::Sqlite { .. } => BackendKind::Sqlite,
            BackendConfig::KeyValue { .. } => BackendKind::KeyValue,
            BackendConfig::Remote(_) => BackendKind::Remote,
        }
    }

    pub fn validate(&self) -> ConfigResult<()> {
        match self {
            BackendConfig::Sqlite { path, .. } if path.as_os_str().is_empty() => {
                Err(ConfigError::Invalid("sqlite path must not be empty".into()))
            }
            BackendConfig::KeyValue { dir } if dir.as_os_str().is_empty() => {
                Err(ConfigError::Invalid("key-value dir must not be empty".into()))
            }
            BackendConfig::Remote(remote) => remote
                .validate()
                .map_err(|e| ConfigError::Invalid(e.to_string())),
            _ => Ok(()),
        }
    }
}

fn data_dir() -> PathBuf {
    directories::ProjectDirs::from("com", "scanqr", "scanqr")
        .map(|dirs| dirs.data_dir().to_path_buf())
        .unwrap_or_else(|| PathBuf::from("."))
}

/// Opens the backend `config` describes.
///
/// The returned backend is ready for use. Nothing is retried here.
pub async fn open_backend(config: &BackendConfig) -> StoreResult<Box<dyn StoreBackend>> {
    config.validate()?;

    let backend: Box<dyn StoreBackend> = match config {
        BackendConfig::Sqlite {
            path,
            reset_on_connect,
        } => {
            if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
                tokio::fs::create_dir_all(parent)
                    .await
                    .map_err(|e| StoreError::BackendUnavailable(e.to_string()))?;
            }
            let db_config = DbConfig::new(path).reset_on_connect(*reset_on_connect);
            Box::new(SqliteBackend::open(db_config).await?)
        }
        BackendConfig::KeyValue { dir } => {
            let storage = FileStorage::open(dir).await?;
            Box::new(KeyValueBackend::new(storage))
        }
        BackendConfig::Remote(remote) => Box::new(RemoteBackend::new(remote)?),
    };

    info!(kind = %backend.kind(), "Backend opened");
    Ok(backend)
}

// =============================================================================
// Settings File
// =============================================================================

/// Top-level contents of `scanqr.toml`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StoreSettings {
    #[serde(default)]
    pub backend: BackendConfig,
}

impl StoreSettings {
    /// Loads configuration from file, environment, and defaults.
    ///
    /// ## Load Order (later overrides earlier)
    /// 1. Default values
    /// 2. Config file (scanqr.toml)
    /// 3. Environment variables
    pub fn load(config_path: Option<PathBuf>) -> ConfigResult<Self> {
        let mut settings = Self::default();

        if let Some(path) = config_path.or_else(Self::default_config_path) {
            if path.exists() {
                info!(?path, "Loading store config from file");
                let contents = std::fs::read_to_string(&path)?;
                settings = toml::from_str(&contents)?;
            } else {
                debug!(?path, "Config file not found, using defaults");
            }
        }

        settings.apply_env_overrides();
        settings.validate()?;

        Ok(settings)
    }

    /// Loads config or returns default if load fails.
    pub fn load_or_default(config_path: Option<PathBuf>) -> Self {
        Self::load(config_path).unwrap_or_else(|e| {
            warn!("Failed to load store config: {}. Using defaults.", e);
            Self::default()
        })
    }

    /// Saves configuration to file.
    pub fn save(&self, config_path: Option<PathBuf>) -> ConfigResult<()> {
        let path = config_path
            .or_else(Self::default_config_path)
            .ok_or_else(|| ConfigError::SaveFailed("No config path available".into()))?;

        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(|e| ConfigError::SaveFailed(e.to_string()))?;
        }

        let contents = toml::to_string_pretty(self)?;
        std::fs::write(&path, contents).map_err(|e| ConfigError::SaveFailed(e.to_string()))?;

        info!(?path, "Store config saved");
        Ok(())
    }

    pub fn validate(&self) -> ConfigResult<()> {
        self.backend.validate()
    }

    /// Applies environment variable overrides.
    pub fn apply_env_overrides(&mut self) {
        self.apply_overrides(|key| std::env::var(key).ok());
    }

    /// Applies overrides from `lookup`, keyed by environment variable name.
    ///
    /// A backend switch happens first, so path and URL overrides land on
    /// the newly selected variant.
    pub fn apply_overrides(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        if let Some(kind) = lookup(ENV_BACKEND) {
            match kind.parse::<BackendKind>() {
                Ok(kind) if kind != self.backend.kind() => {
                    debug!(kind = %kind, "Overriding backend from environment");
                    self.backend = BackendConfig::default_for(kind);
                }
                Ok(_) => {}
                Err(_) => warn!(kind = %kind, "Unknown backend in environment"),
            }
        }

        match &mut self.backend {
            BackendConfig::Sqlite { path, .. } => {
                if let Some(p) = lookup(ENV_DB_PATH) {
                    debug!(path = %p, "Overriding database path from environment");
                    *path = PathBuf::from(p);
                }
            }
            BackendConfig::KeyValue { dir } => {
                if let Some(d) = lookup(ENV_KV_DIR) {
                    debug!(dir = %d, "Overriding key-value dir from environment");
                    *dir = PathBuf::from(d);
                }
            }
            BackendConfig::Remote(remote) => remote.apply_overrides(&lookup),
        }
    }

    /// Returns the default config file path.
    pub fn default_config_path() -> Option<PathBuf> {
        directories::ProjectDirs::from("com", "scanqr", "scanqr")
            .map(|dirs| dirs.config_dir().join(CONFIG_FILE_NAME))
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
