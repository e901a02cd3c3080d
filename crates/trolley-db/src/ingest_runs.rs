//! Database operations for `ingest_runs` — one row per feed import.

use chrono::{DateTime, Utc};
use sqlx::PgPool;

use crate::DbError;

/// A row from the `ingest_runs` table.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct IngestRunRow {
    pub id: i64,
    pub store_id: Option<i64>,
    pub started_at: DateTime<Utc>,
    pub completed_at: Option<DateTime<Utc>>,
    pub items_found: i32,
    pub items_failed: i32,
    pub status: String,
    pub error_message: Option<String>,
}

/// Starts an ingest run in `running` state and returns its id.
///
/// # Errors
///
/// Returns [`DbError::Sqlx`] if the insert fails.
pub async fn start_ingest_run(pool: &PgPool, store_id: i64) -> Result<i64, DbError> {
    let id: i64 = sqlx::query_scalar::<_, i64>(
        "INSERT INTO ingest_runs (store_id, started_at, status) \
         VALUES ($1, NOW(), 'running') \
         RETURNING id",
    )
    .bind(store_id)
    .fetch_one(pool)
    .await?;

    Ok(id)
}

/// Marks a run complete. Status is `success` when nothing failed, `partial`
/// when some items were skipped.
///
/// # Errors
///
/// Returns [`DbError::Sqlx`] if the update fails.
pub async fn complete_ingest_run(
    pool: &PgPool,
    run_id: i64,
    items_found: i32,
    items_failed: i32,
) -> Result<(), DbError> {
    let status = if items_failed == 0 { "success" } else { "partial" };

    sqlx::query(
        "UPDATE ingest_runs SET \
             completed_at = NOW(), \
             items_found  = $2, \
             items_failed = $3, \
             status       = $4 \
         WHERE id = $1",
    )
    .bind(run_id)
    .bind(items_found)
    .bind(items_failed)
    .bind(status)
    .execute(pool)
    .await?;

    Ok(())
}

/// Marks a run failed with an error message.
///
/// # Errors
///
/// Returns [`DbError::Sqlx`] if the update fails.
pub async fn fail_ingest_run(pool: &PgPool, run_id: i64, error: &str) -> Result<(), DbError> {
    sqlx::query(
        "UPDATE ingest_runs SET \
             completed_at  = NOW(), \
             status        = 'failed', \
             error_message = $2 \
         WHERE id = $1",
    )
    .bind(run_id)
    .bind(error)
    .execute(pool)
    .await?;

    Ok(())
}

/// Recent ingest runs, newest first.
///
/// # Errors
///
/// Returns [`DbError::Sqlx`] if the query fails.
pub async fn list_ingest_runs(pool: &PgPool, limit: i64) -> Result<Vec<IngestRunRow>, DbError> {
    let rows = sqlx::query_as::<_, IngestRunRow>(
        "SELECT id, store_id, started_at, completed_at, items_found, items_failed, \
                status, error_message \
         FROM ingest_runs \
         ORDER BY started_at DESC, id DESC \
         LIMIT $1",
    )
    .bind(limit)
    .fetch_all(pool)
    .await?;

    Ok(rows)
}
