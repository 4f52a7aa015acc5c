//! # Scan Record Store
//!
//! The façade a capture UI talks to. It owns exactly one backend at a time
//! and hides which one that is.
//!
//! ## Lifecycle
//! ```text
//!                 open / replace_backend
//!   ┌───────────────┐ ─────────────────────► ┌────────┐
//!   │ Uninitialized │                        │  Open  │ ◄──┐ replace_backend
//!   └───────────────┘ ◄───────────────────── └───┬────┘ ───┘ (old one closed first)
//!                     reconnect failed           │ close
//!                                                ▼
//!                                           ┌────────┐
//!                                           │ Closed │
//!                                           └────────┘
//! ```
//!
//! ## Serialization
//! Every operation holds a read guard on the slot for its whole duration.
//! `close` and `replace_backend` take the write guard, so they wait for
//! in-flight operations to finish and later operations queue behind them.
//! A backend is therefore never closed under a running call.

use scanqr_core::validation::validate_record_id;
use scanqr_core::{BackendKind, ListOrder, Record, StoreBackend, StoreError, StoreResult};
use tokio::sync::RwLock;
use tracing::{debug, info, warn};

use crate::config::{open_backend, BackendConfig};

#[derive(Debug)]
enum Slot {
    Uninitialized,
    Open(Box<dyn StoreBackend>),
    Closed,
}

impl Slot {
    fn backend(&self) -> StoreResult<&dyn StoreBackend> {
        match self {
            Slot::Open(backend) => Ok(backend.as_ref()),
            Slot::Uninitialized => Err(StoreError::BackendUnavailable(
                "store not initialized".into(),
            )),
            Slot::Closed => Err(StoreError::Closed),
        }
    }
}

/// Uniform create / list / delete over whichever backend is configured.
#[derive(Debug)]
pub struct ScanRecordStore {
    slot: RwLock<Slot>,
}

impl Default for ScanRecordStore {
    fn default() -> Self {
        Self::new()
    }
}

impl ScanRecordStore {
    /// A store with no backend. Every operation fails with
    /// `BackendUnavailable` until one is installed.
    pub fn new() -> Self {
        ScanRecordStore {
            slot: RwLock::new(Slot::Uninitialized),
        }
    }

    /// A store over an already opened backend.
    pub fn with_backend(backend: Box<dyn StoreBackend>) -> Self {
        ScanRecordStore {
            slot: RwLock::new(Slot::Open(backend)),
        }
    }

    /// Opens the backend described by `config`.
    pub async fn open(config: &BackendConfig) -> StoreResult<Self> {
        let backend = open_backend(config).await?;
        Ok(Self::with_backend(backend))
    }

    // =========================================================================
    // Backend Management
    // =========================================================================

    /// Installs `next`, closing the current backend first.
    ///
    /// A failure to close the previous backend is logged and does not stop
    /// the replacement.
    pub async fn replace_backend(&self, next: Box<dyn StoreBackend>) {
        let mut slot = self.slot.write().await;
        close_slot(&mut slot).await;
        info!(kind = %next.kind(), "Backend installed");
        *slot = Slot::Open(next);
    }

    /// Closes the current backend, then opens the one `config` describes.
    ///
    /// If opening fails the store is left uninitialized.
    pub async fn reconnect(&self, config: &BackendConfig) -> StoreResult<()> {
        let mut slot = self.slot.write().await;
        close_slot(&mut slot).await;
        *slot = Slot::Uninitialized;

        let backend = open_backend(config).await?;
        info!(kind = %backend.kind(), "Backend reconnected");
        *slot = Slot::Open(backend);
        Ok(())
    }

    /// Closes the backend. Waits for in-flight operations. Idempotent.
    pub async fn close(&self) -> StoreResult<()> {
        let mut slot = self.slot.write().await;
        let result = match std::mem::replace(&mut *slot, Slot::Closed) {
            Slot::Open(backend) => backend.close().await,
            Slot::Uninitialized | Slot::Closed => Ok(()),
        };
        debug!("Store closed");
        result
    }

    /// Kind of the installed backend, if any.
    pub async fn kind(&self) -> Option<BackendKind> {
        self.slot.read().await.backend().ok().map(|b| b.kind())
    }

    pub async fn is_open(&self) -> bool {
        matches!(*self.slot.read().await, Slot::Open(_))
    }

    // =========================================================================
    // Record Operations
    // =========================================================================

    /// Persists a scan.
    pub async fn create(&self, data: &str, code_type: &str) -> StoreResult<Record> {
        let slot = self.slot.read().await;
        let record = slot.backend()?.create(data, code_type).await?;
        debug!(id = %record.id, code_type = %record.code_type, "Record created");
        Ok(record)
    }

    /// Every stored record, newest first.
    pub async fn list(&self) -> StoreResult<Vec<Record>> {
        let slot = self.slot.read().await;
        let backend = slot.backend()?;
        let records = backend.list().await?;
        Ok(newest_first(records, backend.native_order()))
    }

    /// Removes every record. Succeeds on an empty store.
    pub async fn delete_all(&self) -> StoreResult<()> {
        let slot = self.slot.read().await;
        slot.backend()?.delete_all().await?;
        info!("All records deleted");
        Ok(())
    }

    /// Removes one record. A missing id is `NotFound` and changes nothing.
    pub async fn delete_one(&self, id: &str) -> StoreResult<()> {
        validate_record_id(id)?;
        let slot = self.slot.read().await;
        slot.backend()?.delete_one(id).await?;
        debug!(id = %id, "Record deleted");
        Ok(())
    }
}

async fn close_slot(slot: &mut Slot) {
    if let Slot::Open(previous) = std::mem::replace(slot, Slot::Closed) {
        if let Err(e) = previous.close().await {
            warn!(kind = %previous.kind(), error = %e, "Failed to close previous backend");
        }
    }
}

/// Normalizes a backend listing to newest first.
///
/// Ascending listings are reversed before the stable sort so records that
/// share a timestamp still come out newest first.
fn newest_first(mut records: Vec<Record>, order: ListOrder) -> Vec<Record> {
    if order == ListOrder::InsertionAscending {
        records.reverse();
    }
    records.sort_by(|a, b| b.timestamp.cmp(&a.timestamp));
    records
}

// =============================================================================
// Unit Tests
// =============================================================================
