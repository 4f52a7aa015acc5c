//! # scanqr-core: Pure Domain Logic for ScanQR
//!
//! This crate holds everything the scan pipeline agrees on, with zero I/O.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        ScanQR Architecture                              │
//! │                                                                         │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │              Capture Controller (CLI / mobile UI)              │   │
//! │  │        scan event ──► store.create ──► render list             │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │           scanqr-store (ScanRecordStore, ScanSession)           │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │               ★ scanqr-core (THIS CRATE) ★                      │   │
//! │  │                                                                 │   │
//! │  │   ┌───────────┐  ┌───────────┐  ┌───────────┐  ┌───────────┐  │   │
//! │  │   │   types   │  │  backend  │  │ location  │  │ validation│  │   │
//! │  │   │  Record   │  │  trait    │  │  machine  │  │   rules   │  │   │
//! │  │   └───────────┘  └───────────┘  └───────────┘  └───────────┘  │   │
//! │  │                                                                 │   │
//! │  │   NO I/O • NO DATABASE • NO NETWORK                            │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │     scanqr-db (SQLite, key-value)   scanqr-remote (HTTP)        │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`types`] - Record, coordinates, display records
//! - [`backend`] - The `StoreBackend` capability every persistence driver implements
//! - [`location`] - Location permission/acquisition state machine
//! - [`clock`] - Monotonic timestamps for record stamping
//! - [`error`] - Error taxonomy shared across crates
//! - [`validation`] - Input validation
//!
//! ## Example Usage
//!
//! ```rust
//! use scanqr_core::location::{LocationEvent, LocationState};
//!
//! let state = LocationState::Unrequested
//!     .apply(LocationEvent::PermissionRequested)
//!     .unwrap()
//!     .apply(LocationEvent::PermissionDenied)
//!     .unwrap();
//!
//! assert!(state.is_terminal());
//! assert_eq!(state.status_text(), "Location permission denied.");
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod backend;
pub mod clock;
pub mod error;
pub mod location;
pub mod types;
pub mod validation;

// =============================================================================
// Re-exports for Convenience
// =============================================================================

pub use backend::StoreBackend;
pub use clock::MonotonicClock;
pub use error::{LocationError, StoreError, StoreResult, ValidationError};
pub use location::{LocationEvent, LocationState};
pub use types::*;

// =============================================================================
// Crate-Level Constants
// =============================================================================

/// Code type stored when the scanner does not report one.
///
/// Matches the column default of the relational schema.
pub const DEFAULT_CODE_TYPE: &str = "qr";

/// Status line shown while location is still pending.
pub const LOCATION_LOADING_TEXT: &str = "Loading...";

/// Status line shown once location permission has been refused.
pub const LOCATION_DENIED_TEXT: &str = "Location permission denied.";
