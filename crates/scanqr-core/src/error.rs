//! # Error Types
//!
//! The error taxonomy shared by every ScanQR crate.
//!
//! ## Error Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Error Types                                     │
//! │                                                                         │
//! │  scanqr-core errors (this file)                                        │
//! │  ├── StoreError       - What every backend operation can fail with     │
//! │  ├── LocationError    - Permission / position failures                 │
//! │  └── ValidationError  - Input validation failures                      │
//! │                                                                         │
//! │  backend crates                                                        │
//! │  ├── DbError          - SQLite / key-value storage (scanqr-db)         │
//! │  └── RemoteError      - HTTP transport (scanqr-remote)                 │
//! │                                                                         │
//! │  Flow: DbError/RemoteError → StoreError → CliError/ServerError → user  │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Design Principles
//! 1. Use `thiserror` for derive macros (not manual impl)
//! 2. Backend errors are never swallowed: they surface as a `StoreError`
//! 3. Errors are enum variants, never String
//! 4. Network trouble (`TransientIo`) stays distinct from `NotFound` and `Rejected`

use thiserror::Error;

// =============================================================================
// Store Error
// =============================================================================

/// Failures of a scan record store operation, whatever the backend.
#[derive(Debug, Error)]
pub enum StoreError {
    /// The backend could not be reached or initialized.
    ///
    /// ## When This Occurs
    /// - SQLite file cannot be opened, migrations fail
    /// - Key-value storage directory is not writable
    /// - Remote server answers with a non-transient 5xx
    /// - The store has no backend installed yet
    #[error("Backend unavailable: {0}")]
    BackendUnavailable(String),

    /// No record with this id exists.
    #[error("Record not found: {id}")]
    NotFound { id: String },

    /// Network or timeout failure. The caller decides whether to retry.
    #[error("Transient I/O failure: {0}")]
    TransientIo(String),

    /// Stored or received payload could not be (de)serialized.
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// The backend connection has been closed.
    #[error("Store is closed")]
    Closed,

    /// The active backend does not implement this operation.
    #[error("{backend} backend does not support {operation}")]
    Unsupported {
        operation: &'static str,
        backend: String,
    },

    /// The remote service refused the request (4xx other than 404).
    #[error("Request rejected ({status}): {message}")]
    Rejected { status: u16, message: String },

    /// Input failed validation before reaching the backend.
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),

    /// Anything else the backend reported.
    #[error("Internal store error: {0}")]
    Internal(String),
}

impl StoreError {
    /// Creates a NotFound error for the given record id.
    pub fn not_found(id: impl Into<String>) -> Self {
        StoreError::NotFound { id: id.into() }
    }

    /// Creates an Unsupported error.
    pub fn unsupported(operation: &'static str, backend: impl ToString) -> Self {
        StoreError::Unsupported {
            operation,
            backend: backend.to_string(),
        }
    }

    /// Returns true if retrying the same call may succeed.
    ///
    /// Only network/timeout failures qualify. Everything else would fail the
    /// same way again.
    pub fn is_retryable(&self) -> bool {
        matches!(self, StoreError::TransientIo(_))
    }
}

impl From<serde_json::Error> for StoreError {
    fn from(err: serde_json::Error) -> Self {
        StoreError::Serialization(err.to_string())
    }
}

/// Convenience type alias for store results.
pub type StoreResult<T> = Result<T, StoreError>;

// =============================================================================
// Location Error
// =============================================================================

/// Location acquisition failures.
///
/// None of these ever block persistence: a scan is stored whatever the
/// location outcome.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum LocationError {
    /// The user refused location permission for this session.
    #[error("Permission denied: {0}")]
    PermissionDenied(String),

    /// Permission was granted but no position could be obtained.
    #[error("Position unavailable: {0}")]
    PositionUnavailable(String),

    /// An event arrived that the current state does not accept.
    #[error("Invalid location transition: {event} while {from}")]
    InvalidTransition { from: String, event: String },
}

/// Convenience type alias for location results.
pub type LocationResult<T> = Result<T, LocationError>;

// =============================================================================
// Validation Error
// =============================================================================

/// Input validation errors.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ValidationError {
    /// A required field is missing or empty.
    #[error("{field} is required")]
    Required { field: String },

    /// Field value is too long.
    #[error("{field} must be at most {max} characters")]
    TooLong { field: String, max: usize },

    /// Numeric value is out of range.
    #[error("{field} must be between {min} and {max}")]
    OutOfRange { field: String, min: f64, max: f64 },

    /// Invalid format.
    #[error("{field} has invalid format: {reason}")]
    InvalidFormat { field: String, reason: String },
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_messages() {
        let err = StoreError::not_found("abc123");
        assert_eq!(err.to_string(), "Record not found: abc123");

        let err = StoreError::unsupported("delete_one", "sqlite");
        assert_eq!(err.to_string(), "sqlite backend does not support delete_one");
    }

    #[test]
    fn test_only_transient_io_is_retryable() {
        assert!(StoreError::TransientIo("timed out".into()).is_retryable());

        assert!(!StoreError::not_found("x").is_retryable());
        assert!(!StoreError::Closed.is_retryable());
        assert!(!StoreError::BackendUnavailable("down".into()).is_retryable());
        assert!(!StoreError::Rejected {
            status: 422,
            message: "bad".into()
        }
        .is_retryable());
    }

    #[test]
    fn test_validation_converts_to_store_error() {
        let validation_err = ValidationError::Required {
            field: "id".to_string(),
        };
        let store_err: StoreError = validation_err.into();
        assert!(matches!(store_err, StoreError::Validation(_)));
    }

    #[test]
    fn test_json_error_is_serialization() {
        let err = serde_json::from_str::<Vec<u8>>("not json").unwrap_err();
        let store_err: StoreError = err.into();
        assert!(matches!(store_err, StoreError::Serialization(_)));
    }
}
