//! Handlers for document templates.
//!
//! Create and update take a multipart form: a `data` part holding the
//! template metadata as JSON and an optional `file` part. Files live in the
//! `templates` bucket; the row stores the public URL and the bucket path.
//!
//! Older clients upload the file themselves and send only `data.file_url`.
//! Such a URL is stored as given, with no bucket path, and is never removed
//! from storage by this service.

use axum::extract::{Multipart, State};
use axum::http::StatusCode;
use axum::Json;
use pmo_core::document_template::{normalize_flags, validate_fields, TemplateFlags};
use pmo_core::entity::{coerce, BindValue, Column, ColumnKind};
use pmo_core::error::CoreError;
use pmo_core::normalize::{parse_id, require_id};
use pmo_core::storage_paths::{template_path, TEMPLATES_BUCKET};
use pmo_core::types::DbId;
use pmo_db::models::document_template::{
    CreateDocumentTemplate, DocumentTemplate, TemplateFile, UpdateDocumentTemplate,
};
use pmo_db::repositories::DocumentTemplateRepo;
use serde::Deserialize;
use serde_json::{json, Value};

use crate::error::{AppError, AppResult};
use crate::handlers::blobs::{discard, read_form, upload_millis, UploadForm, UploadedFile};
use crate::handlers::JsonBody;
use crate::response::{created, ok, ApiResponse};
use crate::state::AppState;

const ENTITY: &str = "Document template";

const PHASE: Column = Column {
    name: "phase",
    kind: ColumnKind::TextList,
};

/// Metadata posted in the `data` part.
#[derive(Debug, Deserialize)]
struct TemplatePayload {
    #[serde(default)]
    id: Option<Value>,
    #[serde(default)]
    name: String,
    #[serde(default)]
    arabic_name: String,
    #[serde(default)]
    description: String,
    /// Array of phase names or a single name.
    #[serde(default)]
    phase: Value,
    /// URL of a file the client stored itself.
    #[serde(default)]
    file_url: Option<String>,
    #[serde(flatten)]
    flags: TemplateFlags,
}

/// Validated template fields, ready for the repository.
struct TemplateFields {
    name: String,
    arabic_name: String,
    description: String,
    phase: Vec<String>,
    flags: TemplateFlags,
    file_url: Option<String>,
}

impl TemplatePayload {
    fn parse(form: &UploadForm) -> AppResult<Self> {
        let raw = form
            .field("data")
            .ok_or_else(|| CoreError::Validation("Data missing or invalid format".into()))?;
        serde_json::from_str(raw)
            .map_err(|e| AppError::BadRequest(format!("Invalid template data: {e}")))
    }

    fn validate(self) -> AppResult<TemplateFields> {
        let phase = match coerce(&PHASE, &self.phase)? {
            BindValue::TextList(phases) => phases,
            _ => Vec::new(),
        };
        let phase: Vec<String> = phase
            .into_iter()
            .map(|p| p.trim().to_string())
            .filter(|p| !p.is_empty())
            .collect();

        validate_fields(&self.name, &self.arabic_name, &self.description, &phase)?;
        let flags = normalize_flags(self.flags)?;

        Ok(TemplateFields {
            name: self.name.trim().to_string(),
            arabic_name: self.arabic_name.trim().to_string(),
            description: self.description.trim().to_string(),
            phase,
            flags,
            file_url: self
                .file_url
                .map(|url| url.trim().to_string())
                .filter(|url| !url.is_empty()),
        })
    }
}

/// Upload a posted file, returning its stored location.
async fn store_file(state: &AppState, file: UploadedFile) -> AppResult<TemplateFile> {
    let path = template_path(upload_millis(), &file.filename);
    state
        .storage
        .upload(
            TEMPLATES_BUCKET,
            &path,
            file.bytes,
            file.content_type.as_deref(),
        )
        .await?;

    Ok(TemplateFile {
        file_url: state.storage.public_url(TEMPLATES_BUCKET, &path),
        file_path: Some(path),
    })
}

/// A URL stored by the client, kept without a bucket path.
fn client_file(file_url: String) -> TemplateFile {
    TemplateFile {
        file_url,
        file_path: None,
    }
}

/// Remove a stored template file (if it lives in our bucket).
async fn discard_file(state: &AppState, file_path: Option<&str>, reason: &str) {
    if let Some(path) = file_path {
        discard(&state.pool, &state.storage, TEMPLATES_BUCKET, path, reason).await;
    }
}

/// POST /data-management/addDocumentTemplate
pub async fn add(
    State(state): State<AppState>,
    multipart: Multipart,
) -> AppResult<(StatusCode, Json<ApiResponse<DocumentTemplate>>)> {
    let mut form = read_form(multipart).await?;
    let fields = TemplatePayload::parse(&form)?.validate()?;

    let file = match form.file.take() {
        Some(upload) => Some(store_file(&state, upload).await?),
        None => fields.file_url.clone().map(client_file),
    };
    let input = CreateDocumentTemplate {
        name: fields.name,
        arabic_name: fields.arabic_name,
        description: fields.description,
        phase: fields.phase,
        is_capex: fields.flags.is_capex,
        is_opex: fields.flags.is_opex,
        is_internal: fields.flags.is_internal,
        is_external: fields.flags.is_external,
        file_url: file.as_ref().map(|f| f.file_url.clone()),
        file_path: file.as_ref().and_then(|f| f.file_path.clone()),
    };

    let template = match DocumentTemplateRepo::create(&state.pool, &input).await {
        Ok(template) => template,
        Err(e) => {
            discard_file(&state, input.file_path.as_deref(), "template insert failed").await;
            return Err(AppError::from(e).for_entity(ENTITY));
        }
    };

    tracing::info!(template_id = template.id, "Document template created");
    Ok(created("Document template added successfully", template))
}

/// POST /data-management/updateDocumentTemplate
///
/// The `data` part must carry the template `id`. A new `file` replaces the
/// stored one, as does a `data.file_url` that differs from the stored URL;
/// otherwise the current file is kept.
pub async fn update(
    State(state): State<AppState>,
    multipart: Multipart,
) -> AppResult<Json<ApiResponse<DocumentTemplate>>> {
    let mut form = read_form(multipart).await?;
    let payload = TemplatePayload::parse(&form)?;
    let id: DbId = match &payload.id {
        Some(value) if !value.is_null() => parse_id(value, "id")?,
        _ => {
            return Err(
                CoreError::Validation("Required field missing: id is required".into()).into(),
            )
        }
    };
    let fields = payload.validate()?;

    let existing = DocumentTemplateRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or_else(|| CoreError::not_found(ENTITY, id))?;

    let file = match form.file.take() {
        Some(upload) => Some(store_file(&state, upload).await?),
        None => fields
            .file_url
            .clone()
            .filter(|url| existing.file_url.as_deref() != Some(url.as_str()))
            .map(client_file),
    };
    let new_path = file.as_ref().and_then(|f| f.file_path.clone());
    let input = UpdateDocumentTemplate {
        name: fields.name,
        arabic_name: fields.arabic_name,
        description: fields.description,
        phase: fields.phase,
        is_capex: fields.flags.is_capex,
        is_opex: fields.flags.is_opex,
        is_internal: fields.flags.is_internal,
        is_external: fields.flags.is_external,
        file,
    };

    let updated = match DocumentTemplateRepo::update(&state.pool, id, &input).await {
        Ok(Some(template)) => template,
        Ok(None) => {
            discard_file(&state, new_path.as_deref(), "template vanished during update").await;
            return Err(CoreError::not_found(ENTITY, id).into());
        }
        Err(e) => {
            discard_file(&state, new_path.as_deref(), "template update failed").await;
            return Err(AppError::from(e).for_entity(ENTITY));
        }
    };

    if input.file.is_some() {
        discard_file(&state, existing.file_path.as_deref(), "template file replaced").await;
    }

    tracing::info!(template_id = id, replaced_file = input.file.is_some(), "Document template updated");
    Ok(ok("Document template updated successfully", updated))
}

/// GET /data-management/getDocumentTemplates
pub async fn list(
    State(state): State<AppState>,
) -> AppResult<Json<ApiResponse<Vec<DocumentTemplate>>>> {
    let templates = DocumentTemplateRepo::list(&state.pool).await?;
    Ok(ok("Document templates fetched successfully", templates))
}

/// POST /data-management/deleteDocumentTemplate
///
/// Body: `{ "id": ... }`. The row goes first; its file is removed after.
pub async fn delete(
    State(state): State<AppState>,
    JsonBody(body): JsonBody<Value>,
) -> AppResult<Json<ApiResponse<Value>>> {
    let id = require_id(&body, "id")?;

    let template = DocumentTemplateRepo::delete(&state.pool, id)
        .await?
        .ok_or_else(|| CoreError::not_found(ENTITY, id))?;

    discard_file(&state, template.file_path.as_deref(), "template deleted").await;

    tracing::info!(template_id = id, "Document template deleted");
    Ok(ok(
        "Document template deleted successfully",
        json!({ "id": id }),
    ))
}
