//! # Database Error Types
//!
//! Error types for the local backends.
//!
//! ## Error Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Error Propagation                                    │
//! │                                                                         │
//! │  sqlx::Error / std::io::Error                                          │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  DbError / StorageError (this module) ← Adds context                   │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  StoreError (scanqr-core) ← What the facade and apps see               │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  CLI notice / HTTP status                                              │
//! │                                                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use scanqr_core::StoreError;
use thiserror::Error;

/// Database operation errors.
#[derive(Debug, Error)]
pub enum DbError {
    /// Entity not found in database.
    ///
    /// ## When This Occurs
    /// - `DELETE ... WHERE id = ?` affects no rows
    /// - `fetch_one` returns no rows
    #[error("{entity} not found: {id}")]
    NotFound { entity: String, id: String },

    /// Database connection failed.
    ///
    /// ## When This Occurs
    /// - Database file can't be created
    /// - File permissions issue
    /// - Disk full
    #[error("Connection failed: {0}")]
    ConnectionFailed(String),

    /// The pool was closed and accepts no more work.
    #[error("Connection pool is closed")]
    PoolClosed,

    /// Migration failed.
    #[error("Migration failed: {0}")]
    MigrationFailed(String),

    /// Query execution failed.
    #[error("Query failed: {0}")]
    QueryFailed(String),

    /// Transaction failed.
    #[error("Transaction failed: {0}")]
    TransactionFailed(String),

    /// Pool exhausted (all connections in use).
    #[error("Connection pool exhausted")]
    PoolExhausted,

    /// Key-value storage failure.
    #[error(transparent)]
    Storage(#[from] StorageError),

    /// Internal database error.
    #[error("Internal database error: {0}")]
    Internal(String),
}

impl DbError {
    /// Creates a NotFound error for a given entity type and ID.
    pub fn not_found(entity: impl Into<String>, id: impl Into<String>) -> Self {
        DbError::NotFound {
            entity: entity.into(),
            id: id.into(),
        }
    }
}

/// Convert sqlx errors to DbError.
///
/// ## Error Mapping
/// ```text
/// sqlx::Error::RowNotFound    → DbError::NotFound
/// sqlx::Error::Database       → DbError::QueryFailed
/// sqlx::Error::PoolTimedOut   → DbError::PoolExhausted
/// sqlx::Error::PoolClosed     → DbError::PoolClosed
/// sqlx::Error::Io / Tls       → DbError::ConnectionFailed
/// Other                       → DbError::Internal
/// ```
impl From<sqlx::Error> for DbError {
    fn from(err: sqlx::Error) -> Self {
        match err {
            sqlx::Error::RowNotFound => DbError::not_found("Record", "unknown"),
            sqlx::Error::Database(db_err) => DbError::QueryFailed(db_err.message().to_string()),
            sqlx::Error::PoolTimedOut => DbError::PoolExhausted,
            sqlx::Error::PoolClosed => DbError::PoolClosed,
            sqlx::Error::Io(e) => DbError::ConnectionFailed(e.to_string()),
            sqlx::Error::Tls(e) => DbError::ConnectionFailed(e.to_string()),
            _ => DbError::Internal(err.to_string()),
        }
    }
}

impl From<sqlx::migrate::MigrateError> for DbError {
    fn from(err: sqlx::migrate::MigrateError) -> Self {
        DbError::MigrationFailed(err.to_string())
    }
}

/// Store-level view of a database failure.
///
/// ```text
/// NotFound                          → StoreError::NotFound
/// PoolClosed                        → StoreError::Closed
/// ConnectionFailed / Migration /
///   PoolExhausted / Storage         → StoreError::BackendUnavailable
/// everything else                   → StoreError::Internal
/// ```
impl From<DbError> for StoreError {
    fn from(err: DbError) -> Self {
        match err {
            DbError::NotFound { id, .. } => StoreError::NotFound { id },
            DbError::PoolClosed => StoreError::Closed,
            DbError::ConnectionFailed(_)
            | DbError::MigrationFailed(_)
            | DbError::PoolExhausted
            | DbError::Storage(_) => StoreError::BackendUnavailable(err.to_string()),
            DbError::QueryFailed(_) | DbError::TransactionFailed(_) | DbError::Internal(_) => {
                StoreError::Internal(err.to_string())
            }
        }
    }
}

/// Result type for database operations.
pub type DbResult<T> = Result<T, DbError>;

// =============================================================================
// Key-Value Storage Error
// =============================================================================

/// Failures of the raw key-value storage layer.
#[derive(Debug, Error)]
pub enum StorageError {
    /// Reading or writing a key failed.
    #[error("Storage I/O failed for key '{key}': {message}")]
    Io { key: String, message: String },

    /// The key cannot be mapped to a storage location.
    #[error("Invalid storage key '{0}'")]
    InvalidKey(String),
}

impl StorageError {
    pub fn io(key: &str, err: std::io::Error) -> Self {
        StorageError::Io {
            key: key.to_string(),
            message: err.to_string(),
        }
    }
}

impl From<StorageError> for StoreError {
    fn from(err: StorageError) -> Self {
        StoreError::BackendUnavailable(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_db_error_to_store_error() {
        let store: StoreError = DbError::not_found("Record", "abc").into();
        assert!(matches!(store, StoreError::NotFound { ref id } if id == "abc"));

        let store: StoreError = DbError::PoolClosed.into();
        assert!(matches!(store, StoreError::Closed));

        let store: StoreError = DbError::ConnectionFailed("disk full".into()).into();
        assert!(matches!(store, StoreError::BackendUnavailable(_)));

        let store: StoreError = DbError::QueryFailed("syntax".into()).into();
        assert!(matches!(store, StoreError::Internal(_)));
    }

    #[test]
    fn test_sqlx_pool_closed_maps_to_closed() {
        let db: DbError = sqlx::Error::PoolClosed.into();
        assert!(matches!(db, DbError::PoolClosed));
    }

    #[test]
    fn test_storage_error_is_backend_unavailable() {
        let err = StorageError::InvalidKey("../x".into());
        let store: StoreError = err.into();
        assert!(matches!(store, StoreError::BackendUnavailable(_)));
    }
}
