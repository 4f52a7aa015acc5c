//! # Code Repository
//!
//! Database operations for the `codes` table.
//!
//! Ids are generated by SQLite (`lower(hex(randomblob(16)))`) and handed
//! back through `RETURNING`, so a caller never sees a half-written row.

use chrono::{DateTime, Utc};
use scanqr_core::Record;
use sqlx::SqlitePool;
use tracing::debug;

use crate::error::{DbError, DbResult};

/// Repository for scanned code rows.
#[derive(Debug, Clone)]
pub struct CodeRepository {
    pool: SqlitePool,
}

impl CodeRepository {
    /// Creates a new CodeRepository.
    pub fn new(pool: SqlitePool) -> Self {
        CodeRepository { pool }
    }

    /// Inserts one row and returns it as stored.
    pub async fn insert(
        &self,
        data: &str,
        code_type: &str,
        created_at: DateTime<Utc>,
    ) -> DbResult<Record> {
        let record = sqlx::query_as::<_, Record>(
            r#"
            INSERT INTO codes (data, type, created_at)
            VALUES (?1, ?2, ?3)
            RETURNING id, data, type, created_at
            "#,
        )
        .bind(data)
        .bind(code_type)
        .bind(created_at)
        .fetch_one(&self.pool)
        .await?;

        debug!(id = %record.id, code_type = %record.code_type, "Inserted code");
        Ok(record)
    }

    /// Returns every row, oldest first.
    pub async fn list(&self) -> DbResult<Vec<Record>> {
        let records = sqlx::query_as::<_, Record>(
            r#"
            SELECT id, data, type, created_at
            FROM codes
            ORDER BY rowid
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        debug!(count = records.len(), "Listed codes");
        Ok(records)
    }

    /// Gets a row by id.
    ///
    /// ## Returns
    /// * `Ok(Some(Record))` - Row found
    /// * `Ok(None)` - No such id
    pub async fn get_by_id(&self, id: &str) -> DbResult<Option<Record>> {
        let record = sqlx::query_as::<_, Record>(
            "SELECT id, data, type, created_at FROM codes WHERE id = ?1",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(record)
    }

    /// Deletes one row. A missing id is `DbError::NotFound`.
    pub async fn delete_by_id(&self, id: &str) -> DbResult<()> {
        let result = sqlx::query("DELETE FROM codes WHERE id = ?1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("Code", id));
        }

        debug!(id = %id, "Deleted code");
        Ok(())
    }

    /// Deletes every row and returns how many were removed.
    pub async fn delete_all(&self) -> DbResult<u64> {
        let result = sqlx::query("DELETE FROM codes").execute(&self.pool).await?;

        debug!(removed = result.rows_affected(), "Deleted all codes");
        Ok(result.rows_affected())
    }

    /// Timestamp of the most recently inserted row, if any.
    pub async fn latest_created_at(&self) -> DbResult<Option<DateTime<Utc>>> {
        let latest = sqlx::query_scalar::<_, DateTime<Utc>>(
            "SELECT created_at FROM codes ORDER BY rowid DESC LIMIT 1",
        )
        .fetch_optional(&self.pool)
        .await?;
        Ok(latest)
    }

    /// Number of stored rows.
    pub async fn count(&self) -> DbResult<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM codes")
            .fetch_one(&self.pool)
            .await?;
        Ok(count)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use crate::{Database, DbConfig, DbError};
    use chrono::Utc;

    async fn setup() -> Database {
        Database::new(DbConfig::in_memory()).await.unwrap()
    }

    #[tokio::test]
    async fn test_insert_generates_id() {
        let db = setup().await;
        let repo = db.codes();

        let record = repo.insert("ABC123", "qr", Utc::now()).await.unwrap();

        assert_eq!(record.id.len(), 32);
        assert_eq!(record.data, "ABC123");
        assert_eq!(record.code_type, "qr");
        assert_eq!(repo.get_by_id(&record.id).await.unwrap(), Some(record));
    }

    #[tokio::test]
    async fn test_empty_data_is_stored() {
        let db = setup().await;
        let record = db.codes().insert("", "code128", Utc::now()).await.unwrap();
        assert_eq!(record.data, "");
    }

    #[tokio::test]
    async fn test_list_is_insertion_ordered() {
        let db = setup().await;
        let repo = db.codes();

        for data in ["first", "second", "third"] {
            repo.insert(data, "qr", Utc::now()).await.unwrap();
        }

        let data: Vec<String> = repo.list().await.unwrap().into_iter().map(|r| r.data).collect();
        assert_eq!(data, vec!["first", "second", "third"]);
    }

    #[tokio::test]
    async fn test_delete_by_id_missing_is_not_found() {
        let db = setup().await;
        let repo = db.codes();
        repo.insert("keep", "qr", Utc::now()).await.unwrap();

        let err = repo.delete_by_id("nope").await.unwrap_err();

        assert!(matches!(err, DbError::NotFound { ref id, .. } if id == "nope"));
        assert_eq!(repo.count().await.unwrap(), 1);
    }

    #[tokio::test]
    async fn test_delete_all_twice() {
        let db = setup().await;
        let repo = db.codes();
        repo.insert("a", "qr", Utc::now()).await.unwrap();
        repo.insert("b", "qr", Utc::now()).await.unwrap();

        assert_eq!(repo.delete_all().await.unwrap(), 2);
        assert_eq!(repo.delete_all().await.unwrap(), 0);
        assert!(repo.list().await.unwrap().is_empty());
    }
}
