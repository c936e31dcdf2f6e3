//! Repository for the `users` table.
//!
//! Users are schema-described records (see `pmo_core::entity::USERS`);
//! this repository wraps [`RecordRepo`] writes that touch `role_id` in a
//! transaction that enforces the single-holder rule for exclusive roles.

use pmo_core::entity::{BindValue, USERS};
use pmo_core::error::CoreError;
use pmo_core::roles::{check_role_assignment, RoleSlot};
use pmo_core::types::{DbId, Record};
use sqlx::{PgConnection, PgPool};

use crate::error::RepoError;
use crate::repositories::record_repo::{BoundColumns, RecordRepo};

/// Provides user writes guarded by the role-exclusivity rule.
pub struct UserRepo;

impl UserRepo {
    /// Insert a user, returning the created record (without `password`).
    pub async fn create(pool: &PgPool, values: BoundColumns) -> Result<Record, RepoError> {
        let mut tx = pool.begin().await?;

        if let Some(role_id) = requested_role(&values) {
            ensure_role_available(&mut tx, role_id, None).await?;
        }

        let record = RecordRepo::insert(&mut *tx, &USERS, values).await?;
        tx.commit().await?;
        Ok(record)
    }

    /// Update a user's columns.
    ///
    /// Returns `None` if no user with the given `id` exists.
    pub async fn update(
        pool: &PgPool,
        id: DbId,
        values: BoundColumns,
    ) -> Result<Option<Record>, RepoError> {
        let mut tx = pool.begin().await?;

        let current: Option<(Option<DbId>,)> =
            sqlx::query_as("SELECT role_id FROM users WHERE id = $1 FOR UPDATE")
                .bind(id)
                .fetch_optional(&mut *tx)
                .await?;
        let Some((current_role_id,)) = current else {
            return Ok(None);
        };

        if let Some(role_id) = requested_role(&values) {
            ensure_role_available(&mut tx, role_id, current_role_id).await?;
        }

        let record = RecordRepo::update(&mut *tx, &USERS, id, values).await?;
        tx.commit().await?;
        Ok(record)
    }
}

/// The role id a write is about to set, if any.
fn requested_role(values: &BoundColumns) -> Option<DbId> {
    values.iter().find_map(|(column, value)| match (column, value) {
        (&"role_id", BindValue::BigInt(id)) => Some(*id),
        _ => None,
    })
}

/// Apply the single-holder rule to an exclusive target role.
///
/// Exclusive roles are locked `FOR UPDATE` before counting, which
/// serializes concurrent assignments to the same role so the holder count
/// cannot go stale before commit. Other roles are never locked.
async fn ensure_role_available(
    conn: &mut PgConnection,
    role_id: DbId,
    current_role_id: Option<DbId>,
) -> Result<(), RepoError> {
    let role: Option<(String, bool)> =
        sqlx::query_as("SELECT name, is_exclusive FROM role WHERE id = $1")
            .bind(role_id)
            .fetch_optional(&mut *conn)
            .await?;
    let (name, is_exclusive) = role.ok_or_else(|| {
        CoreError::Validation(format!("Role with id {role_id} does not exist"))
    })?;
    if !is_exclusive {
        return Ok(());
    }

    sqlx::query("SELECT id FROM role WHERE id = $1 FOR UPDATE")
        .bind(role_id)
        .execute(&mut *conn)
        .await?;

    let (user_count,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM users WHERE role_id = $1")
        .bind(role_id)
        .fetch_one(&mut *conn)
        .await?;

    let slot = RoleSlot {
        id: role_id,
        name: &name,
        is_exclusive,
        user_count,
    };
    if let Err(e) = check_role_assignment(&slot, current_role_id) {
        tracing::info!(role_id, role = %name, user_count, "Rejected exclusive role assignment");
        return Err(e.into());
    }
    Ok(())
}
