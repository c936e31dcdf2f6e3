//! Repository for the `project_documents` table.
//!
//! Deletion is two-phase: a row is first marked (`deleting_at`), which
//! hides it from reads, and only removed once its blob has been dealt
//! with. Rows left marked by a failed second phase are picked up by the
//! reconciliation sweep.

use pmo_core::types::{DbId, Timestamp};
use sqlx::PgPool;

use crate::models::project_document::{CreateProjectDocument, ProjectDocument};

const COLUMNS: &str =
    "id, project_id, template_id, phase, file_url, uploaded_at, document_name, deleting_at";

/// Provides CRUD operations for project documents.
pub struct ProjectDocumentRepo;

impl ProjectDocumentRepo {
    /// Insert a document row, returning the created row.
    pub async fn create(
        pool: &PgPool,
        input: &CreateProjectDocument,
    ) -> Result<ProjectDocument, sqlx::Error> {
        let query = format!(
            "INSERT INTO project_documents \
                (project_id, template_id, phase, file_url, uploaded_at, document_name) \
             VALUES ($1, $2, $3, $4, $5, $6) \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, ProjectDocument>(&query)
            .bind(input.project_id)
            .bind(input.template_id)
            .bind(&input.phase)
            .bind(&input.file_url)
            .bind(input.uploaded_at)
            .bind(&input.document_name)
            .fetch_one(pool)
            .await
    }

    /// List live (unmarked) documents for a project, oldest first.
    pub async fn list_by_project(
        pool: &PgPool,
        project_id: DbId,
    ) -> Result<Vec<ProjectDocument>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM project_documents \
             WHERE project_id = $1 AND deleting_at IS NULL \
             ORDER BY uploaded_at ASC, id ASC"
        );
        sqlx::query_as::<_, ProjectDocument>(&query)
            .bind(project_id)
            .fetch_all(pool)
            .await
    }

    /// Mark a live document for deletion.
    ///
    /// Returns `None` if no live document matches the (`id`, `project_id`) pair.
    pub async fn mark_for_deletion(
        pool: &PgPool,
        id: DbId,
        project_id: DbId,
    ) -> Result<Option<ProjectDocument>, sqlx::Error> {
        let query = format!(
            "UPDATE project_documents SET deleting_at = NOW() \
             WHERE id = $1 AND project_id = $2 AND deleting_at IS NULL \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, ProjectDocument>(&query)
            .bind(id)
            .bind(project_id)
            .fetch_optional(pool)
            .await
    }

    /// Delete a marked document row. Returns `true` if a row was removed.
    pub async fn delete_marked(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query(
            "DELETE FROM project_documents WHERE id = $1 AND deleting_at IS NOT NULL",
        )
        .bind(id)
        .execute(pool)
        .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Documents marked for deletion before `cutoff`.
    pub async fn list_marked_before(
        pool: &PgPool,
        cutoff: Timestamp,
        limit: i64,
    ) -> Result<Vec<ProjectDocument>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM project_documents \
             WHERE deleting_at IS NOT NULL AND deleting_at < $1 \
             ORDER BY deleting_at ASC \
             LIMIT $2"
        );
        sqlx::query_as::<_, ProjectDocument>(&query)
            .bind(cutoff)
            .bind(limit)
            .fetch_all(pool)
            .await
    }
}
