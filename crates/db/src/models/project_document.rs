//! Project document model and DTOs.

use pmo_core::types::{DbId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// A row from the `project_documents` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct ProjectDocument {
    pub id: DbId,
    pub project_id: DbId,
    pub template_id: DbId,
    pub phase: String,
    /// `{bucket}/{path}` of the stored blob.
    pub file_url: String,
    pub uploaded_at: Timestamp,
    pub document_name: String,
    #[serde(skip_serializing)]
    pub deleting_at: Option<Timestamp>,
}

/// DTO for recording an uploaded document.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateProjectDocument {
    pub project_id: DbId,
    pub template_id: DbId,
    pub phase: String,
    pub file_url: String,
    pub uploaded_at: Timestamp,
    pub document_name: String,
}
