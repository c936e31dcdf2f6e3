//! Repository for the `role` table.

use sqlx::PgPool;

use crate::models::role::{Role, RoleWithCount};

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "id, name, is_exclusive, created_at";

/// Provides read operations for roles.
pub struct RoleRepo;

impl RoleRepo {
    /// Find a role by name (case-sensitive).
    pub async fn find_by_name(pool: &PgPool, name: &str) -> Result<Option<Role>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM role WHERE name = $1");
        sqlx::query_as::<_, Role>(&query)
            .bind(name)
            .fetch_optional(pool)
            .await
    }

    /// List all roles with their current holder counts, ordered by ID.
    pub async fn list_with_counts(pool: &PgPool) -> Result<Vec<RoleWithCount>, sqlx::Error> {
        sqlx::query_as::<_, RoleWithCount>(
            "SELECT r.id, r.name, r.is_exclusive, COUNT(u.id) AS user_count \
             FROM role r \
             LEFT JOIN users u ON u.role_id = r.id \
             GROUP BY r.id \
             ORDER BY r.id ASC",
        )
        .fetch_all(pool)
        .await
    }
}
