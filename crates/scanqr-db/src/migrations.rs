//! # Database Migrations
//!
//! Embedded SQL migrations for the relational backend.
//!
//! ## How Migrations Work
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Migration Process                                  │
//! │                                                                         │
//! │  Database::new                                                         │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  Check _sqlx_migrations table (create if missing)                      │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  0001_create_codes.sql   CREATE TABLE IF NOT EXISTS codes(...)        │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  Existing rows are never touched. Wiping data is Database::reset.      │
//! │                                                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Adding New Migrations
//!
//! 1. Create a new file in `migrations/sqlite/` with the next sequence number
//! 2. Name format: `NNNN_description.sql`
//! 3. Write idempotent SQL (use `IF NOT EXISTS` where possible)
//! 4. **NEVER** modify existing migrations - always add new ones

use sqlx::{Sqlite, SqlitePool, Transaction};
use tracing::{info, warn};

use crate::error::DbResult;

/// Embedded migrations from the `migrations/sqlite` directory.
static MIGRATOR: sqlx::migrate::Migrator = sqlx::migrate!("../../migrations/sqlite");

/// Runs all pending database migrations.
///
/// Idempotent, and each migration runs in its own transaction.
pub async fn run_migrations(pool: &SqlitePool) -> DbResult<()> {
    info!("Checking for pending migrations");

    MIGRATOR.run(pool).await?;

    info!("All migrations applied successfully");
    Ok(())
}

/// Drops the `codes` table and rebuilds it from the embedded migration SQL
/// inside the caller's transaction.
///
/// The `_sqlx_migrations` bookkeeping is left alone since the schema ends
/// up identical.
pub(crate) async fn recreate_schema(tx: &mut Transaction<'_, Sqlite>) -> DbResult<()> {
    warn!("Dropping codes table");
    sqlx::query("DROP TABLE IF EXISTS codes")
        .execute(&mut **tx)
        .await?;

    for migration in MIGRATOR.iter() {
        sqlx::raw_sql(&migration.sql).execute(&mut **tx).await?;
    }

    Ok(())
}

/// Returns (total_migrations, applied_migrations), for diagnostics.
pub async fn migration_status(pool: &SqlitePool) -> DbResult<(usize, usize)> {
    let total = MIGRATOR.iter().count();

    let tracked: i64 = sqlx::query_scalar(
        "SELECT COUNT(*) FROM sqlite_master WHERE type = 'table' AND name = '_sqlx_migrations'",
    )
    .fetch_one(pool)
    .await?;
    if tracked == 0 {
        return Ok((total, 0));
    }

    let applied: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM _sqlx_migrations")
        .fetch_one(pool)
        .await?;

    Ok((total, applied as usize))
}
