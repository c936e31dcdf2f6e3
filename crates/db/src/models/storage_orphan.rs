//! Storage orphan model: a blob queued for removal.

use pmo_core::types::{DbId, Timestamp};
use serde::Serialize;
use sqlx::FromRow;

/// A row from the `storage_orphans` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct StorageOrphan {
    pub id: DbId,
    pub bucket: String,
    pub path: String,
    pub reason: String,
    pub attempts: i32,
    pub last_error: Option<String>,
    pub last_attempt_at: Option<Timestamp>,
    pub created_at: Timestamp,
}
