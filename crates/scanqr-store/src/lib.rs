//! # scanqr-store: Scan Record Store Facade
//!
//! The one entry point a capture UI uses. It picks a backend from config,
//! keeps exactly one connection open, and decorates scans with whatever
//! location the session has resolved.
//!
//! ## Module Structure
//! ```text
//! scanqr_store/
//! ├── config.rs   ─── BackendConfig, StoreSettings (scanqr.toml), open_backend
//! ├── store.rs    ─── ScanRecordStore (init-before-use, close vs in-flight)
//! ├── location.rs ─── LocationProvider, LocationCorrelator (background task)
//! └── session.rs  ─── ScanSession (display list, one-shot notices)
//! ```
//!
//! ## Usage
//! ```rust,ignore
//! use scanqr_store::{ScanRecordStore, ScanSession, StoreSettings};
//!
//! let settings = StoreSettings::load(None)?;
//! let store = ScanRecordStore::open(&settings.backend).await?;
//! let mut session = ScanSession::new(store);
//!
//! let scan = session.capture("https://example.com", "qr").await?;
//! for entry in session.records() {
//!     println!("{} {}", entry.record.id, entry.record.data);
//! }
//! session.end().await?;
//! ```

pub mod config;
pub mod location;
pub mod session;
pub mod store;

pub use config::{open_backend, BackendConfig, ConfigError, ConfigResult, StoreSettings};
pub use location::{LocationCorrelator, LocationProvider, StaticLocationProvider};
pub use session::ScanSession;
pub use store::ScanRecordStore;
