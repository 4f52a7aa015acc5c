//! # CLI Error Type
//!
//! What the user sees when a command fails.
//!
//! ## Error Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                                                                         │
//! │  ScanSession / ScanRecordStore                                          │
//! │         │                                                               │
//! │         ▼                                                               │
//! │  StoreError::NotFound { id } ──────────────┐                            │
//! │  StoreError::TransientIo(..) ──────────────┤                            │
//! │  ConfigError::Invalid(..) ─────────────────┼──► CliError { code, msg } │
//! │                                            │                            │
//! │  $ scanqr delete 42                        ▼                            │
//! │  Error: [NOT_FOUND] Record not found: 42                                │
//! │                                                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use scanqr_core::StoreError;
use scanqr_store::ConfigError;
use serde::Serialize;

/// Error returned from CLI commands.
///
/// ```json
/// {
///   "code": "NOT_FOUND",
///   "message": "Record not found: 42"
/// }
/// ```
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CliError {
    /// Machine-readable error code
    pub code: ErrorCode,

    /// Human-readable error message
    pub message: String,
}

/// Error codes, one per store failure category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorCode {
    NotFound,
    ValidationError,
    BackendUnavailable,
    /// Network or timeout failure; `--retry` may help
    TransientIo,
    SerializationError,
    Closed,
    Unsupported,
    Rejected,
    ConfigError,
    Internal,
}

impl CliError {
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        CliError {
            code,
            message: message.into(),
        }
    }

    pub fn validation(message: impl Into<String>) -> Self {
        CliError::new(ErrorCode::ValidationError, message)
    }

    pub fn internal(message: impl Into<String>) -> Self {
        CliError::new(ErrorCode::Internal, message)
    }
}

impl From<StoreError> for CliError {
    fn from(err: StoreError) -> Self {
        let code = match &err {
            StoreError::NotFound { .. } => ErrorCode::NotFound,
            StoreError::Validation(_) => ErrorCode::ValidationError,
            StoreError::BackendUnavailable(_) => ErrorCode::BackendUnavailable,
            StoreError::TransientIo(_) => ErrorCode::TransientIo,
            StoreError::Serialization(_) => ErrorCode::SerializationError,
            StoreError::Closed => ErrorCode::Closed,
            StoreError::Unsupported { .. } => ErrorCode::Unsupported,
            StoreError::Rejected { .. } => ErrorCode::Rejected,
            StoreError::Internal(e) => {
                tracing::error!("Internal store error: {}", e);
                ErrorCode::Internal
            }
        };
        CliError::new(code, err.to_string())
    }
}

impl From<ConfigError> for CliError {
    fn from(err: ConfigError) -> Self {
        CliError::new(ErrorCode::ConfigError, err.to_string())
    }
}

impl From<std::io::Error> for CliError {
    fn from(err: std::io::Error) -> Self {
        CliError::internal(format!("Failed to write output: {}", err))
    }
}

impl From<serde_json::Error> for CliError {
    fn from(err: serde_json::Error) -> Self {
        CliError::internal(format!("Failed to encode output: {}", err))
    }
}

impl std::fmt::Display for CliError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let code = serde_json::to_value(self.code)
            .ok()
            .and_then(|v| v.as_str().map(str::to_string))
            .unwrap_or_else(|| format!("{:?}", self.code));
        write!(f, "[{}] {}", code, self.message)
    }
}

impl std::error::Error for CliError {}
