//! # scanqr-db: Local Storage Backends for ScanQR
//!
//! The two on-device implementations of [`scanqr_core::StoreBackend`].
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        ScanQR Data Flow                                 │
//! │                                                                         │
//! │  ScanRecordStore (scanqr-store)                                        │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                     scanqr-db (THIS CRATE)                      │   │
//! │  │                                                                 │   │
//! │  │   ┌───────────────┐    ┌───────────────┐    ┌──────────────┐  │   │
//! │  │   │ SqliteBackend │    │  Database     │    │  Migrations  │  │   │
//! │  │   │  (sqlite.rs)  │───►│  (pool.rs)    │    │  (embedded)  │  │   │
//! │  │   │               │    │ CodeRepository│    │ 0001_codes   │  │   │
//! │  │   └───────────────┘    └───────────────┘    └──────────────┘  │   │
//! │  │                                                                 │   │
//! │  │   ┌──────────────────────┐    ┌─────────────────────────────┐ │   │
//! │  │   │ KeyValueBackend<S>   │───►│ MemoryStorage / FileStorage │ │   │
//! │  │   │   (kv/backend.rs)    │    │     (kv/storage.rs)         │ │   │
//! │  │   └──────────────────────┘    └─────────────────────────────┘ │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Module Organization
//!
//! - [`pool`] - Connection pool creation, reset and configuration
//! - [`migrations`] - Embedded database migrations
//! - [`repository`] - SQL for the `codes` table
//! - [`sqlite`] - Relational `StoreBackend`
//! - [`kv`] - Key-value `StoreBackend` and its storage layer
//! - [`error`] - Database and storage error types
//!
//! ## Usage
//!
//! ```rust,ignore
//! use scanqr_core::StoreBackend;
//! use scanqr_db::{DbConfig, SqliteBackend};
//!
//! let backend = SqliteBackend::open(DbConfig::new("scanqr.db")).await?;
//! let record = backend.create("ABC123", "qr").await?;
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod error;
pub mod kv;
pub mod migrations;
pub mod pool;
pub mod repository;
pub mod sqlite;

// =============================================================================
// Re-exports
// =============================================================================

pub use error::{DbError, DbResult, StorageError};
pub use kv::{FileStorage, KeyValueBackend, KeyValueStorage, MemoryStorage};
pub use pool::{Database, DbConfig};
pub use repository::codes::CodeRepository;
pub use sqlite::SqliteBackend;
