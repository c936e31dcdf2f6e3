//! Blob helpers shared by the document and template handlers.

use std::collections::HashMap;

use axum::extract::Multipart;
use pmo_db::repositories::StorageOrphanRepo;
use pmo_storage::SharedBlobStore;
use sqlx::PgPool;

use crate::error::AppResult;

/// A file part read from a multipart form.
#[derive(Debug)]
pub struct UploadedFile {
    pub filename: String,
    pub content_type: Option<String>,
    pub bytes: Vec<u8>,
}

/// Text fields and the `file` part of a multipart form.
#[derive(Debug, Default)]
pub struct UploadForm {
    pub fields: HashMap<String, String>,
    pub file: Option<UploadedFile>,
}

impl UploadForm {
    /// A text field, treating blank values as absent.
    pub fn field(&self, name: &str) -> Option<&str> {
        self.fields
            .get(name)
            .map(|v| v.trim())
            .filter(|v| !v.is_empty())
    }
}

/// Drain a multipart body. The part named `file` is kept as bytes; every
/// other named part is read as text.
pub async fn read_form(mut multipart: Multipart) -> AppResult<UploadForm> {
    let mut form = UploadForm::default();

    while let Some(field) = multipart.next_field().await? {
        let name = field.name().unwrap_or("").to_string();
        if name == "file" {
            let filename = field.file_name().unwrap_or("upload").to_string();
            let content_type = field.content_type().map(str::to_string);
            let bytes = field.bytes().await?;
            // An empty file input still posts a part; treat it as missing.
            if !bytes.is_empty() {
                form.file = Some(UploadedFile {
                    filename,
                    content_type,
                    bytes: bytes.to_vec(),
                });
            }
        } else if !name.is_empty() {
            let text = field.text().await?;
            form.fields.insert(name, text);
        }
    }

    Ok(form)
}

/// Remove a blob whose owning row is gone or was never written.
///
/// Failures are queued in `storage_orphans` for the reconciliation sweep;
/// nothing is returned because the caller's outcome no longer depends on it.
pub async fn discard(
    pool: &PgPool,
    storage: &SharedBlobStore,
    bucket: &str,
    path: &str,
    reason: &str,
) {
    let paths = [path.to_string()];
    let Err(e) = storage.remove(bucket, &paths).await else {
        tracing::debug!(bucket, path, reason, "Removed blob");
        return;
    };

    tracing::warn!(bucket, path, reason, error = %e, "Blob removal failed, queueing orphan");
    if let Err(e) = StorageOrphanRepo::enqueue(pool, bucket, path, reason).await {
        tracing::error!(bucket, path, error = %e, "Failed to queue storage orphan");
    }
}

/// Milliseconds since the Unix epoch, used to namespace stored paths.
pub fn upload_millis() -> i64 {
    chrono::Utc::now().timestamp_millis()
}
