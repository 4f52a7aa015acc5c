//! # Repository Module
//!
//! Database repository implementations for ScanQR.
//!
//! ## Repository Pattern
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Repository Pattern                                   │
//! │                                                                         │
//! │  SqliteBackend (StoreBackend)                                          │
//! │       │                                                                 │
//! │       │  db.codes().insert("ABC123", "qr", now)                        │
//! │       ▼                                                                 │
//! │  CodeRepository                                                        │
//! │  ├── insert(&self, data, type, created_at)                             │
//! │  ├── list(&self)                                                       │
//! │  ├── get_by_id(&self, id)                                              │
//! │  ├── delete_by_id(&self, id)                                           │
//! │  ├── delete_all(&self)                                                 │
//! │  └── count(&self)                                                      │
//! │       │                                                                 │
//! │       │  SQL Query                                                      │
//! │       ▼                                                                 │
//! │  SQLite Database (codes table)                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Available Repositories
//!
//! - [`codes::CodeRepository`] - Scanned code rows

pub mod codes;
