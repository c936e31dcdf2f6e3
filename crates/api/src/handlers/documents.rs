//! Handlers for project documents.
//!
//! Blob and row are kept in step without a distributed transaction:
//!
//! - upload writes the blob first, then the row; a failed insert removes
//!   the fresh blob again (or queues it as an orphan);
//! - delete marks the row, removes the blob, then deletes the row. A
//!   marked row is invisible to reads, so a failure after the mark never
//!   exposes a document without its file.

use axum::extract::{Multipart, State};
use axum::http::StatusCode;
use axum::Json;
use chrono::Utc;
use pmo_core::error::CoreError;
use pmo_core::normalize::{parse_id, require_id};
use pmo_core::storage_paths::{
    path_from_stored_url, project_document_path, PROJECT_DOCUMENTS_BUCKET,
};
use pmo_db::models::project_document::{CreateProjectDocument, ProjectDocument};
use pmo_db::repositories::ProjectDocumentRepo;
use serde_json::{json, Value};

use crate::error::AppResult;
use crate::handlers::blobs::{discard, read_form, upload_millis};
use crate::handlers::JsonBody;
use crate::response::{created, ok, ApiResponse};
use crate::state::AppState;

/// POST /data-management/addProjectDocument
///
/// Multipart form with `project_id`, `template_id`, `phase`, and `file`.
pub async fn add(
    State(state): State<AppState>,
    multipart: Multipart,
) -> AppResult<(StatusCode, Json<ApiResponse<ProjectDocument>>)> {
    let mut form = read_form(multipart).await?;

    let Some(file) = form.file.take() else {
        return Err(CoreError::Validation("No file uploaded.".into()).into());
    };
    let (Some(project_id), Some(template_id), Some(phase)) = (
        form.field("project_id"),
        form.field("template_id"),
        form.field("phase"),
    ) else {
        return Err(CoreError::Validation(
            "Project ID, Template ID, and Phase are required.".into(),
        )
        .into());
    };
    let project_id = parse_id(&Value::from(project_id), "project_id")?;
    let template_id = parse_id(&Value::from(template_id), "template_id")?;

    let path = project_document_path(project_id, upload_millis(), &file.filename);
    let blob = state
        .storage
        .upload(
            PROJECT_DOCUMENTS_BUCKET,
            &path,
            file.bytes,
            file.content_type.as_deref(),
        )
        .await?;

    let input = CreateProjectDocument {
        project_id,
        template_id,
        phase: phase.to_string(),
        file_url: blob.full_path,
        uploaded_at: Utc::now(),
        document_name: file.filename,
    };

    let document = match ProjectDocumentRepo::create(&state.pool, &input).await {
        Ok(document) => document,
        Err(e) => {
            discard(
                &state.pool,
                &state.storage,
                PROJECT_DOCUMENTS_BUCKET,
                &path,
                "document metadata insert failed",
            )
            .await;
            return Err(e.into());
        }
    };

    tracing::info!(
        document_id = document.id,
        project_id,
        path = %path,
        "Project document uploaded"
    );
    Ok(created("Document uploaded successfully", document))
}

/// POST /data-management/getProjectDocuments
///
/// Body: `{ "project_id": ... }`. A project without documents is a 404.
pub async fn list(
    State(state): State<AppState>,
    JsonBody(body): JsonBody<Value>,
) -> AppResult<Json<ApiResponse<Vec<ProjectDocument>>>> {
    let project_id = require_id(&body, "project_id")?;

    let documents = ProjectDocumentRepo::list_by_project(&state.pool, project_id).await?;
    if documents.is_empty() {
        return Err(CoreError::NotFound(format!(
            "No documents found for project with id {project_id}"
        ))
        .into());
    }

    Ok(ok("Documents retrieved successfully", documents))
}

/// POST /data-management/deleteProjectDocument
///
/// Body: `{ "project_id": ..., "document_id": ... }`.
pub async fn delete(
    State(state): State<AppState>,
    JsonBody(body): JsonBody<Value>,
) -> AppResult<Json<ApiResponse<Value>>> {
    let missing = |field: &str| body.get(field).map_or(true, Value::is_null);
    if missing("project_id") || missing("document_id") {
        return Err(
            CoreError::Validation("Project ID and Document ID are required.".into()).into(),
        );
    }
    let project_id = require_id(&body, "project_id")?;
    let document_id = require_id(&body, "document_id")?;

    let document = ProjectDocumentRepo::mark_for_deletion(&state.pool, document_id, project_id)
        .await?
        .ok_or_else(|| CoreError::NotFound("Document not found".into()))?;

    discard(
        &state.pool,
        &state.storage,
        PROJECT_DOCUMENTS_BUCKET,
        path_from_stored_url(&document.file_url),
        "document deleted",
    )
    .await;

    // The row is already hidden; the sweep purges it if this fails.
    if let Err(e) = ProjectDocumentRepo::delete_marked(&state.pool, document.id).await {
        tracing::warn!(document_id, error = %e, "Document row left marked for the sweep");
    }

    tracing::info!(document_id, project_id, "Project document deleted");
    Ok(ok(
        "Document deleted successfully",
        json!({ "id": document_id, "project_id": project_id }),
    ))
}
