//! # Store Backend Capability
//!
//! The single seam every persistence driver plugs into.
//!
//! ```text
//!                 ┌──────────────────────────┐
//!                 │   dyn StoreBackend       │
//!                 │  create / list /         │
//!                 │  delete_all / delete_one │
//!                 │  close                   │
//!                 └────────────┬─────────────┘
//!          ┌───────────────────┼────────────────────┐
//!          ▼                   ▼                    ▼
//!   SqliteBackend      KeyValueBackend<S>     RemoteBackend
//!   (scanqr-db)        (scanqr-db)            (scanqr-remote)
//! ```
//!
//! ## Contract
//! - `create` never silently drops input. On failure it returns a typed error
//!   and no partially constructed Record.
//! - `list` is side-effect free and safe to call repeatedly.
//! - `delete_all` on an empty store succeeds.
//! - `delete_one` on a missing id returns `StoreError::NotFound`.
//! - `close` releases the connection exactly once. Every later call returns
//!   `StoreError::Closed`.

use async_trait::async_trait;

use crate::error::{StoreError, StoreResult};
use crate::types::{BackendKind, ListOrder, Record};

/// A persistence driver for scan records.
#[async_trait]
pub trait StoreBackend: Send + Sync + std::fmt::Debug {
    /// Which implementation this is.
    fn kind(&self) -> BackendKind;

    /// Order in which `list` returns records.
    fn native_order(&self) -> ListOrder;

    /// Persists a new record. The backend allocates the id and timestamp.
    async fn create(&self, data: &str, code_type: &str) -> StoreResult<Record>;

    /// Returns every stored record in `native_order`.
    async fn list(&self) -> StoreResult<Vec<Record>>;

    /// Removes every record. Idempotent.
    async fn delete_all(&self) -> StoreResult<()>;

    /// Removes one record by id.
    async fn delete_one(&self, id: &str) -> StoreResult<()> {
        let _ = id;
        Err(StoreError::unsupported("delete_one", self.kind()))
    }

    /// Releases any held connection.
    async fn close(&self) -> StoreResult<()> {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use std::sync::Mutex;

    #[derive(Debug, Default)]
    struct VecBackend {
        records: Mutex<Vec<Record>>,
    }

    #[async_trait]
    impl StoreBackend for VecBackend {
        fn kind(&self) -> BackendKind {
            BackendKind::KeyValue
        }

        fn native_order(&self) -> ListOrder {
            ListOrder::InsertionAscending
        }

        async fn create(&self, data: &str, code_type: &str) -> StoreResult<Record> {
            let mut records = self.records.lock().unwrap();
            let record = Record {
                id: records.len().to_string(),
                data: data.to_string(),
                code_type: code_type.to_string(),
                timestamp: Utc::now(),
            };
            records.push(record.clone());
            Ok(record)
        }

        async fn list(&self) -> StoreResult<Vec<Record>> {
            Ok(self.records.lock().unwrap().clone())
        }

        async fn delete_all(&self) -> StoreResult<()> {
            self.records.lock().unwrap().clear();
            Ok(())
        }
    }

    #[tokio::test]
    async fn test_default_delete_one_is_unsupported() {
        let backend: Box<dyn StoreBackend> = Box::new(VecBackend::default());
        backend.create("ABC123", "qr").await.unwrap();

        let err = backend.delete_one("0").await.unwrap_err();
        assert!(matches!(err, StoreError::Unsupported { operation: "delete_one", .. }));
        assert_eq!(backend.list().await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_default_close_is_noop() {
        let backend = VecBackend::default();
        backend.close().await.unwrap();
        backend.close().await.unwrap();
    }
}
