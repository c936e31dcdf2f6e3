//! Repository for the `storage_orphans` table.

use pmo_core::types::DbId;
use sqlx::PgPool;

use crate::models::storage_orphan::StorageOrphan;

const COLUMNS: &str =
    "id, bucket, path, reason, attempts, last_error, last_attempt_at, created_at";

/// Queue of blobs awaiting removal from object storage.
pub struct StorageOrphanRepo;

impl StorageOrphanRepo {
    /// Queue a blob for removal. Re-queuing the same path refreshes its reason.
    pub async fn enqueue(
        pool: &PgPool,
        bucket: &str,
        path: &str,
        reason: &str,
    ) -> Result<StorageOrphan, sqlx::Error> {
        let query = format!(
            "INSERT INTO storage_orphans (bucket, path, reason) \
             VALUES ($1, $2, $3) \
             ON CONFLICT (bucket, path) DO UPDATE SET reason = EXCLUDED.reason \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, StorageOrphan>(&query)
            .bind(bucket)
            .bind(path)
            .bind(reason)
            .fetch_one(pool)
            .await
    }

    /// Orphans with fewer than `max_attempts` failed removals, oldest and
    /// least-attempted first. Exhausted rows stay queued for inspection.
    pub async fn list_pending(
        pool: &PgPool,
        max_attempts: i32,
        limit: i64,
    ) -> Result<Vec<StorageOrphan>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM storage_orphans \
             WHERE attempts < $1 \
             ORDER BY attempts ASC, created_at ASC \
             LIMIT $2"
        );
        sqlx::query_as::<_, StorageOrphan>(&query)
            .bind(max_attempts)
            .bind(limit)
            .fetch_all(pool)
            .await
    }

    /// Drop an orphan whose blob has been removed.
    pub async fn resolve(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM storage_orphans WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Record a failed removal attempt.
    pub async fn record_failure(pool: &PgPool, id: DbId, error: &str) -> Result<(), sqlx::Error> {
        sqlx::query(
            "UPDATE storage_orphans SET \
                attempts = attempts + 1, \
                last_error = $2, \
                last_attempt_at = NOW() \
             WHERE id = $1",
        )
        .bind(id)
        .bind(error)
        .execute(pool)
        .await?;
        Ok(())
    }

    /// Number of queued orphans.
    pub async fn count(pool: &PgPool) -> Result<i64, sqlx::Error> {
        let (count,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM storage_orphans")
            .fetch_one(pool)
            .await?;
        Ok(count)
    }
}
