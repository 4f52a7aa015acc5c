//! # scanqr-remote: Remote HTTP Backend for ScanQR
//!
//! A [`scanqr_core::StoreBackend`] whose every operation is a round-trip to
//! a fixed `/codes` endpoint.
//!
//! ## Architecture Overview
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        Remote Backend                                   │
//! │                                                                         │
//! │  ScanRecordStore (scanqr-store)                                        │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  ┌──────────────────────────────────────────────────────────────────┐  │
//! │  │                  RemoteBackend (client.rs)                       │  │
//! │  │   reqwest::Client with request + connect timeouts               │  │
//! │  └────────────────────────────┬─────────────────────────────────────┘  │
//! │                               │ JSON (protocol.rs)                      │
//! │                               ▼                                         │
//! │  ┌──────────────────────────────────────────────────────────────────┐  │
//! │  │   /codes service (scanqr-server, json-server, ...)               │  │
//! │  └──────────────────────────────────────────────────────────────────┘  │
//! │                                                                         │
//! │  Failures:                                                             │
//! │  • timeout / connect / 502-504  → StoreError::TransientIo              │
//! │  • 404                          → StoreError::NotFound                 │
//! │  • other 4xx                    → StoreError::Rejected                 │
//! │  • bad body                     → StoreError::Serialization            │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Module Organization
//! - [`client`] - `RemoteBackend`
//! - [`config`] - Base URL and timeouts
//! - [`error`] - Remote error types and their store mapping
//! - [`protocol`] - Wire DTOs
//! - [`retry`] - Opt-in exponential backoff

pub mod client;
pub mod config;
pub mod error;
pub mod protocol;
pub mod retry;

pub use client::RemoteBackend;
pub use config::RemoteConfig;
pub use error::{RemoteError, RemoteResult};
pub use protocol::{CodeDto, CreateCodeRequest, CODES_PATH};
pub use retry::{retry, RetryPolicy};
