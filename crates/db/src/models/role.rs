//! Role entity model.

use pmo_core::types::{DbId, Timestamp};
use serde::Serialize;
use sqlx::FromRow;

/// A role row from the `role` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Role {
    pub id: DbId,
    pub name: String,
    pub is_exclusive: bool,
    pub created_at: Timestamp,
}

/// A role together with the number of users currently holding it.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct RoleWithCount {
    pub id: DbId,
    pub name: String,
    pub is_exclusive: bool,
    pub user_count: i64,
}
