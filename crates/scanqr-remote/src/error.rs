//! # Remote Error Types
//!
//! Error types for the HTTP backend.
//!
//! ## Error Categories
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Remote Error Categories                            │
//! │                                                                         │
//! │  ┌─────────────────┐  ┌─────────────────┐  ┌─────────────────────────┐ │
//! │  │  Configuration  │  │   Transport     │  │     Server answer       │ │
//! │  │                 │  │                 │  │                         │ │
//! │  │  InvalidConfig  │  │  Timeout        │  │  NotFound (404)         │ │
//! │  │  InvalidUrl     │  │  Connection     │  │  Status (other non-2xx) │ │
//! │  │                 │  │  Request        │  │  Decode                 │ │
//! │  └─────────────────┘  └─────────────────┘  └─────────────────────────┘ │
//! │                                                                         │
//! │  Transport failures never turn into NotFound: a timeout says nothing   │
//! │  about whether the record exists.                                      │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use scanqr_core::StoreError;
use thiserror::Error;

/// Result type alias for remote operations.
pub type RemoteResult<T> = Result<T, RemoteError>;

/// Remote backend failures.
#[derive(Debug, Error)]
pub enum RemoteError {
    // =========================================================================
    // Configuration Errors
    // =========================================================================
    /// Invalid remote configuration.
    #[error("Invalid remote configuration: {0}")]
    InvalidConfig(String),

    /// Base URL is not an absolute http(s) URL.
    #[error("Invalid base URL: {0}")]
    InvalidUrl(String),

    // =========================================================================
    // Transport Errors
    // =========================================================================
    /// The request did not complete within the configured timeout.
    #[error("Request timed out: {0}")]
    Timeout(String),

    /// TCP/TLS connection could not be established.
    #[error("Connection failed: {0}")]
    Connection(String),

    /// Request failed while being sent or while reading the body.
    #[error("Request failed: {0}")]
    Request(String),

    // =========================================================================
    // Server Answers
    // =========================================================================
    /// The server has no record with this id.
    #[error("Record not found on server: {id}")]
    NotFound { id: String },

    /// Non-success status other than 404.
    #[error("Server returned {status}: {message}")]
    Status { status: u16, message: String },

    /// The body was not the expected JSON.
    #[error("Failed to decode response: {0}")]
    Decode(String),

    /// The client was closed.
    #[error("Remote client is closed")]
    Closed,
}

impl RemoteError {
    /// Returns true if the same request may succeed later.
    ///
    /// ## Retryable Errors
    /// - Timeouts and connection failures
    /// - 502 / 503 / 504 from a gateway or overloaded server
    pub fn is_retryable(&self) -> bool {
        match self {
            RemoteError::Timeout(_) | RemoteError::Connection(_) | RemoteError::Request(_) => true,
            RemoteError::Status { status, .. } => matches!(status, 502..=504),
            _ => false,
        }
    }

    /// Returns true if this error indicates a configuration problem.
    pub fn is_config_error(&self) -> bool {
        matches!(
            self,
            RemoteError::InvalidConfig(_) | RemoteError::InvalidUrl(_)
        )
    }
}

// =============================================================================
// Error Conversions
// =============================================================================

impl From<reqwest::Error> for RemoteError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            RemoteError::Timeout(err.to_string())
        } else if err.is_connect() {
            RemoteError::Connection(err.to_string())
        } else if err.is_decode() {
            RemoteError::Decode(err.to_string())
        } else if let Some(status) = err.status() {
            RemoteError::Status {
                status: status.as_u16(),
                message: err.to_string(),
            }
        } else if err.is_builder() {
            RemoteError::InvalidConfig(err.to_string())
        } else {
            RemoteError::Request(err.to_string())
        }
    }
}

impl From<url::ParseError> for RemoteError {
    fn from(err: url::ParseError) -> Self {
        RemoteError::InvalidUrl(err.to_string())
    }
}

/// Store-level view of a remote failure.
///
/// ```text
/// Timeout / Connection / Request        → TransientIo
/// Status 502, 503, 504                  → TransientIo
/// NotFound                              → NotFound
/// Status 4xx                            → Rejected
/// Status 5xx (other)                    → BackendUnavailable
/// InvalidConfig / InvalidUrl            → BackendUnavailable
/// Decode                                → Serialization
/// Closed                                → Closed
/// ```
impl From<RemoteError> for StoreError {
    fn from(err: RemoteError) -> Self {
        match err {
            RemoteError::NotFound { id } => StoreError::NotFound { id },
            RemoteError::Closed => StoreError::Closed,
            RemoteError::Decode(msg) => StoreError::Serialization(msg),
            RemoteError::Status { status, message } if (400..500).contains(&status) => {
                StoreError::Rejected { status, message }
            }
            ref e if e.is_retryable() => StoreError::TransientIo(e.to_string()),
            e => StoreError::BackendUnavailable(e.to_string()),
        }
    }
}
