//! # Embedded Relational Backend
//!
//! [`StoreBackend`] over the SQLite `codes` table.
//!
//! ```text
//!   create(data, type) ──► CodeRepository::insert ──► INSERT ... RETURNING
//!   list()             ──► CodeRepository::list   ──► ORDER BY rowid
//!   delete_all()       ──► DELETE FROM codes
//!   delete_one(id)     ──► DELETE ... WHERE id = ?   (0 rows → NotFound)
//!   close()            ──► SqlitePool::close, exactly once
//! ```

use std::sync::atomic::{AtomicBool, Ordering};

use async_trait::async_trait;
use scanqr_core::{
    BackendKind, ListOrder, MonotonicClock, Record, StoreBackend, StoreError, StoreResult,
};
use tracing::{debug, info};

use crate::error::DbResult;
use crate::pool::{Database, DbConfig};

/// Scan record store backed by SQLite.
#[derive(Debug)]
pub struct SqliteBackend {
    db: Database,
    clock: MonotonicClock,
    closed: AtomicBool,
}

impl SqliteBackend {
    /// Opens (and migrates) the database described by `config`.
    pub async fn open(config: DbConfig) -> DbResult<Self> {
        let db = Database::new(config).await?;
        Ok(Self::from_database(db))
    }

    /// Wraps an already opened database.
    pub fn from_database(db: Database) -> Self {
        SqliteBackend {
            db,
            clock: MonotonicClock::default(),
            closed: AtomicBool::new(false),
        }
    }

    /// Uses `clock` to stamp new records.
    pub fn with_clock(mut self, clock: MonotonicClock) -> Self {
        self.clock = clock;
        self
    }

    /// The underlying database handle.
    pub fn database(&self) -> &Database {
        &self.db
    }

    /// Explicit destructive reset of all stored scans.
    pub async fn reset(&self) -> StoreResult<()> {
        self.ensure_open()?;
        self.db.reset().await?;
        Ok(())
    }

    /// Looks up a single record.
    pub async fn get_by_id(&self, id: &str) -> StoreResult<Record> {
        self.ensure_open()?;
        self.db
            .codes()
            .get_by_id(id)
            .await?
            .ok_or_else(|| StoreError::not_found(id))
    }

    /// True if the database answers queries.
    pub async fn health_check(&self) -> bool {
        !self.closed.load(Ordering::Acquire) && self.db.health_check().await
    }

    fn ensure_open(&self) -> StoreResult<()> {
        if self.closed.load(Ordering::Acquire) {
            return Err(StoreError::Closed);
        }
        Ok(())
    }
}

#[async_trait]
impl StoreBackend for SqliteBackend {
    fn kind(&self) -> BackendKind {
        BackendKind::Sqlite
    }

    fn native_order(&self) -> ListOrder {
        ListOrder::InsertionAscending
    }

    async fn create(&self, data: &str, code_type: &str) -> StoreResult<Record> {
        self.ensure_open()?;
        let codes = self.db.codes();

        // rows from an earlier session may be stamped ahead of the wall clock
        let floor = codes
            .latest_created_at()
            .await?
            .map_or(i64::MIN, |t| t.timestamp_millis());
        let record = codes
            .insert(data, code_type, self.clock.now_at_least(floor))
            .await?;
        Ok(record)
    }

    async fn list(&self) -> StoreResult<Vec<Record>> {
        self.ensure_open()?;
        Ok(self.db.codes().list().await?)
    }

    async fn delete_all(&self) -> StoreResult<()> {
        self.ensure_open()?;
        self.db.codes().delete_all().await?;
        Ok(())
    }

    async fn delete_one(&self, id: &str) -> StoreResult<()> {
        self.ensure_open()?;
        self.db.codes().delete_by_id(id).await?;
        Ok(())
    }

    async fn close(&self) -> StoreResult<()> {
        if self.closed.swap(true, Ordering::AcqRel) {
            debug!("SQLite backend already closed");
            return Ok(());
        }
        self.db.close().await;
        info!("SQLite backend closed");
        Ok(())
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use scanqr_core::clock::FixedClock;
    use std::sync::Arc;

    async fn backend() -> SqliteBackend {
        SqliteBackend::open(DbConfig::in_memory()).await.unwrap()
    }

    #[tokio::test]
    async fn test_create_then_list() {
        let backend = backend().await;

        let created = backend.create("ABC123", "qr").await.unwrap();
        let listed = backend.list().await.unwrap();

        assert_eq!(listed, vec![created.clone()]);
        assert_eq!(created.data, "ABC123");
        assert_eq!(created.code_type, "qr");
    }

    #[tokio::test]
    async fn test_identical_scans_get_distinct_ids() {
        let backend = backend().await;

        let a = backend.create("SAME", "qr").await.unwrap();
        let b = backend.create("SAME", "qr").await.unwrap();

        assert_ne!(a.id, b.id);
        assert!(a.timestamp <= b.timestamp);
        assert_eq!(backend.list().await.unwrap().len(), 2);
    }

    #[tokio::test]
    async fn test_create_does_not_alter_existing_records() {
        let backend = backend().await;
        let first = backend.create("first", "ean13").await.unwrap();

        backend.create("second", "qr").await.unwrap();

        let listed = backend.list().await.unwrap();
        assert_eq!(listed[0], first);
    }

    #[tokio::test]
    async fn test_delete_one_missing_leaves_list_unchanged() {
        let backend = backend().await;
        backend.create("keep", "qr").await.unwrap();
        let before = backend.list().await.unwrap();

        let err = backend.delete_one("missing").await.unwrap_err();

        assert!(matches!(err, StoreError::NotFound { .. }));
        assert_eq!(backend.list().await.unwrap(), before);
    }

    #[tokio::test]
    async fn test_delete_one_removes_record() {
        let backend = backend().await;
        let a = backend.create("a", "qr").await.unwrap();
        let b = backend.create("b", "qr").await.unwrap();

        backend.delete_one(&a.id).await.unwrap();

        assert_eq!(backend.list().await.unwrap(), vec![b]);
        assert!(matches!(
            backend.get_by_id(&a.id).await,
            Err(StoreError::NotFound { .. })
        ));
    }

    #[tokio::test]
    async fn test_delete_all_is_idempotent() {
        let backend = backend().await;
        backend.create("a", "qr").await.unwrap();

        backend.delete_all().await.unwrap();
        backend.delete_all().await.unwrap();

        assert!(backend.list().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_close_once_then_closed_errors() {
        let backend = backend().await;
        backend.create("a", "qr").await.unwrap();

        backend.close().await.unwrap();
        backend.close().await.unwrap();

        assert!(backend.database().is_closed());
        assert!(!backend.health_check().await);
        assert!(matches!(backend.list().await, Err(StoreError::Closed)));
        assert!(matches!(
            backend.create("b", "qr").await,
            Err(StoreError::Closed)
        ));
    }

    #[tokio::test]
    async fn test_reset_empties_store() {
        let backend = backend().await;
        backend.create("a", "qr").await.unwrap();

        backend.reset().await.unwrap();

        assert!(backend.list().await.unwrap().is_empty());
        backend.create("b", "qr").await.unwrap();
        assert_eq!(backend.list().await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_reopen_with_clock_behind_keeps_timestamps_ordered() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("scanqr.db");

        let ahead = MonotonicClock::new(Arc::new(FixedClock::new(2_000_000_000_000)));
        let backend = SqliteBackend::open(DbConfig::new(&path))
            .await
            .unwrap()
            .with_clock(ahead);
        let older = backend.create("older", "qr").await.unwrap();
        backend.close().await.unwrap();

        let behind = MonotonicClock::new(Arc::new(FixedClock::new(1_000_000_000_000)));
        let backend = SqliteBackend::open(DbConfig::new(&path))
            .await
            .unwrap()
            .with_clock(behind);
        let newer = backend.create("newer", "qr").await.unwrap();

        assert!(newer.timestamp >= older.timestamp);
        let listed = backend.list().await.unwrap();
        assert!(listed.windows(2).all(|w| w[0].timestamp <= w[1].timestamp));
        backend.close().await.unwrap();
    }
}
