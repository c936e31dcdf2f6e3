//! Document template model and DTOs.

use pmo_core::types::{DbId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// A row from the `document_template` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct DocumentTemplate {
    pub id: DbId,
    pub name: String,
    pub arabic_name: String,
    pub description: String,
    pub phase: Vec<String>,
    pub is_capex: bool,
    pub is_opex: bool,
    pub is_internal: bool,
    pub is_external: bool,
    pub file_url: Option<String>,
    #[serde(skip_serializing)]
    pub file_path: Option<String>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// DTO for creating a template.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateDocumentTemplate {
    pub name: String,
    pub arabic_name: String,
    pub description: String,
    pub phase: Vec<String>,
    pub is_capex: bool,
    pub is_opex: bool,
    pub is_internal: bool,
    pub is_external: bool,
    pub file_url: Option<String>,
    pub file_path: Option<String>,
}

/// DTO for updating a template's metadata.
///
/// Descriptive fields and flags are replaced wholesale. The file columns
/// change only when `file` is `Some`.
#[derive(Debug, Clone, Deserialize)]
pub struct UpdateDocumentTemplate {
    pub name: String,
    pub arabic_name: String,
    pub description: String,
    pub phase: Vec<String>,
    pub is_capex: bool,
    pub is_opex: bool,
    pub is_internal: bool,
    pub is_external: bool,
    pub file: Option<TemplateFile>,
}

/// Replacement file location for a template.
#[derive(Debug, Clone, Deserialize)]
pub struct TemplateFile {
    pub file_url: String,
    pub file_path: Option<String>,
}
