//! [`StoreBackend`] over a [`KeyValueStorage`].
//!
//! Blob format under [`SCANNED_CODES_KEY`]:
//!
//! ```json
//! [
//!   {"data": "ABC123", "type": "qr", "timestamp": 1700000000001},
//!   {"data": "590123", "type": "ean13", "timestamp": 1700000000000}
//! ]
//! ```
//!
//! Entries carry no id field. The record id is the decimal timestamp. This
//! backend stamps strictly increasing timestamps, so blobs it wrote have
//! distinct ids. See [`crate::kv`] for blobs written by other writers.

use std::sync::atomic::{AtomicBool, Ordering};

use async_trait::async_trait;
use scanqr_core::clock::to_datetime;
use scanqr_core::{
    BackendKind, ListOrder, MonotonicClock, Record, StoreBackend, StoreError, StoreResult,
};
use serde::{Deserialize, Serialize};
use tokio::sync::Mutex;
use tracing::{debug, info};

use super::storage::KeyValueStorage;

/// The single key every record lives under.
pub const SCANNED_CODES_KEY: &str = "scanned_codes";

/// One blob entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoredCode {
    pub data: String,
    #[serde(rename = "type")]
    pub code_type: String,
    /// Milliseconds since the Unix epoch.
    pub timestamp: i64,
}

impl StoredCode {
    pub fn id(&self) -> String {
        self.timestamp.to_string()
    }

    pub fn to_record(&self) -> Record {
        Record {
            id: self.id(),
            data: self.data.clone(),
            code_type: self.code_type.clone(),
            timestamp: to_datetime(self.timestamp),
        }
    }
}

/// Serializes entries in the given (newest first) order.
pub fn encode_blob(codes: &[StoredCode]) -> StoreResult<String> {
    Ok(serde_json::to_string(codes)?)
}

/// Parses a stored blob. Anything that is not a JSON array of entries is a
/// `StoreError::Serialization`.
pub fn decode_blob(blob: &str) -> StoreResult<Vec<StoredCode>> {
    Ok(serde_json::from_str(blob)?)
}

/// Scan record store over a device key-value store.
///
/// Writes through one instance are serialized, so callers sharing it (the
/// server's handlers) never lose each other's records. See the module docs
/// of [`crate::kv`] for writers outside this instance.
#[derive(Debug)]
pub struct KeyValueBackend<S: KeyValueStorage> {
    storage: S,
    clock: MonotonicClock,
    closed: AtomicBool,
    writes: Mutex<()>,
}

impl<S: KeyValueStorage> KeyValueBackend<S> {
    pub fn new(storage: S) -> Self {
        KeyValueBackend {
            storage,
            clock: MonotonicClock::default(),
            closed: AtomicBool::new(false),
            writes: Mutex::new(()),
        }
    }

    /// Uses `clock` to stamp new records.
    pub fn with_clock(mut self, clock: MonotonicClock) -> Self {
        self.clock = clock;
        self
    }

    pub fn storage(&self) -> &S {
        &self.storage
    }

    fn ensure_open(&self) -> StoreResult<()> {
        if self.closed.load(Ordering::Acquire) {
            return Err(StoreError::Closed);
        }
        Ok(())
    }

    async fn read(&self) -> StoreResult<Vec<StoredCode>> {
        match self.storage.get(SCANNED_CODES_KEY).await? {
            Some(blob) => decode_blob(&blob),
            None => Ok(Vec::new()),
        }
    }

    async fn write(&self, codes: &[StoredCode]) -> StoreResult<()> {
        let blob = encode_blob(codes)?;
        self.storage.set(SCANNED_CODES_KEY, &blob).await?;
        Ok(())
    }
}

#[async_trait]
impl<S: KeyValueStorage + 'static> StoreBackend for KeyValueBackend<S> {
    fn kind(&self) -> BackendKind {
        BackendKind::KeyValue
    }

    fn native_order(&self) -> ListOrder {
        ListOrder::NewestFirst
    }

    async fn create(&self, data: &str, code_type: &str) -> StoreResult<Record> {
        self.ensure_open()?;

        // read-modify-write; atomic only within this instance
        let _guard = self.writes.lock().await;
        let mut codes = self.read().await?;
        let newest = codes.iter().map(|c| c.timestamp).max().unwrap_or(i64::MIN);
        let code = StoredCode {
            data: data.to_string(),
            code_type: code_type.to_string(),
            timestamp: self.clock.next_strict_ms(newest),
        };
        codes.insert(0, code.clone());
        self.write(&codes).await?;

        debug!(id = %code.id(), total = codes.len(), "Stored code in key-value blob");
        Ok(code.to_record())
    }

    async fn list(&self) -> StoreResult<Vec<Record>> {
        self.ensure_open()?;
        Ok(self.read().await?.iter().map(StoredCode::to_record).collect())
    }

    async fn delete_all(&self) -> StoreResult<()> {
        self.ensure_open()?;
        let _guard = self.writes.lock().await;
        self.storage.remove(SCANNED_CODES_KEY).await?;
        debug!("Removed key-value blob");
        Ok(())
    }

    async fn delete_one(&self, id: &str) -> StoreResult<()> {
        self.ensure_open()?;

        let _guard = self.writes.lock().await;
        let mut codes = self.read().await?;
        let position = codes
            .iter()
            .position(|c| c.id() == id)
            .ok_or_else(|| StoreError::not_found(id))?;
        codes.remove(position);
        self.write(&codes).await?;

        debug!(id = %id, "Deleted code from key-value blob");
        Ok(())
    }

    async fn close(&self) -> StoreResult<()> {
        if !self.closed.swap(true, Ordering::AcqRel) {
            info!("Key-value backend closed");
        }
        Ok(())
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
