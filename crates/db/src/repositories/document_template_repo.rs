//! Repository for the `document_template` table.

use pmo_core::types::DbId;
use sqlx::PgPool;

use crate::models::document_template::{
    CreateDocumentTemplate, DocumentTemplate, UpdateDocumentTemplate,
};

const COLUMNS: &str = "id, name, arabic_name, description, phase, is_capex, is_opex, \
     is_internal, is_external, file_url, file_path, created_at, updated_at";

/// Provides CRUD operations for document templates.
pub struct DocumentTemplateRepo;

impl DocumentTemplateRepo {
    /// Insert a new template, returning the created row.
    pub async fn create(
        pool: &PgPool,
        input: &CreateDocumentTemplate,
    ) -> Result<DocumentTemplate, sqlx::Error> {
        let query = format!(
            "INSERT INTO document_template \
                (name, arabic_name, description, phase, is_capex, is_opex, \
                 is_internal, is_external, file_url, file_path) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10) \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, DocumentTemplate>(&query)
            .bind(&input.name)
            .bind(&input.arabic_name)
            .bind(&input.description)
            .bind(&input.phase)
            .bind(input.is_capex)
            .bind(input.is_opex)
            .bind(input.is_internal)
            .bind(input.is_external)
            .bind(&input.file_url)
            .bind(&input.file_path)
            .fetch_one(pool)
            .await
    }

    /// Find a template by ID.
    pub async fn find_by_id(
        pool: &PgPool,
        id: DbId,
    ) -> Result<Option<DocumentTemplate>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM document_template WHERE id = $1");
        sqlx::query_as::<_, DocumentTemplate>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// List all templates ordered by name.
    pub async fn list(pool: &PgPool) -> Result<Vec<DocumentTemplate>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM document_template ORDER BY name ASC, id ASC");
        sqlx::query_as::<_, DocumentTemplate>(&query)
            .fetch_all(pool)
            .await
    }

    /// Replace a template's metadata. File columns change only when
    /// `input.file` is set.
    ///
    /// Returns `None` if no row with the given `id` exists.
    pub async fn update(
        pool: &PgPool,
        id: DbId,
        input: &UpdateDocumentTemplate,
    ) -> Result<Option<DocumentTemplate>, sqlx::Error> {
        let (replace_file, file_url, file_path) = match &input.file {
            Some(file) => (true, Some(file.file_url.as_str()), file.file_path.as_deref()),
            None => (false, None, None),
        };

        let query = format!(
            "UPDATE document_template SET \
                name = $2, \
                arabic_name = $3, \
                description = $4, \
                phase = $5, \
                is_capex = $6, \
                is_opex = $7, \
                is_internal = $8, \
                is_external = $9, \
                file_url = CASE WHEN $10 THEN $11 ELSE file_url END, \
                file_path = CASE WHEN $10 THEN $12 ELSE file_path END \
             WHERE id = $1 \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, DocumentTemplate>(&query)
            .bind(id)
            .bind(&input.name)
            .bind(&input.arabic_name)
            .bind(&input.description)
            .bind(&input.phase)
            .bind(input.is_capex)
            .bind(input.is_opex)
            .bind(input.is_internal)
            .bind(input.is_external)
            .bind(replace_file)
            .bind(file_url)
            .bind(file_path)
            .fetch_optional(pool)
            .await
    }

    /// Hard-delete a template, returning the removed row so its blob can
    /// be cleaned up.
    pub async fn delete(pool: &PgPool, id: DbId) -> Result<Option<DocumentTemplate>, sqlx::Error> {
        let query = format!("DELETE FROM document_template WHERE id = $1 RETURNING {COLUMNS}");
        sqlx::query_as::<_, DocumentTemplate>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }
}
