//! Bucket names and object-path conventions for stored blobs.
//!
//! Paths are namespaced by parent identifiers and an upload timestamp so
//! two uploads of the same filename never collide.

/// Bucket holding files attached to projects.
pub const PROJECT_DOCUMENTS_BUCKET: &str = "project-documents";

/// Bucket holding document template files.
pub const TEMPLATES_BUCKET: &str = "templates";

/// Replace anything outside `[A-Za-z0-9._-]` with `_`.
///
/// Directory components are dropped so a client-supplied name can never
/// escape its namespace.
pub fn sanitize_filename(name: &str) -> String {
    let base = name.rsplit(['/', '\\']).next().unwrap_or("");
    let cleaned: String = base
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || matches!(c, '.' | '_' | '-') {
                c
            } else {
                '_'
            }
        })
        .collect();

    if cleaned.trim_matches('.').is_empty() {
        "file".to_string()
    } else {
        cleaned
    }
}

/// `projects/{project_id}/{millis}_{filename}`
pub fn project_document_path(project_id: i64, millis: i64, filename: &str) -> String {
    format!("projects/{project_id}/{millis}_{}", sanitize_filename(filename))
}

/// `document-templates/{millis}_{filename}`
pub fn template_path(millis: i64, filename: &str) -> String {
    format!("document-templates/{millis}_{}", sanitize_filename(filename))
}

/// Full stored reference: `{bucket}/{path}`.
pub fn stored_file_url(bucket: &str, path: &str) -> String {
    format!("{bucket}/{path}")
}

/// Recover the in-bucket path from a stored reference.
///
/// A reference containing `/` has its leading bucket segment removed; a
/// bare name is already a path.
pub fn path_from_stored_url(file_url: &str) -> &str {
    match file_url.split_once('/') {
        Some((_bucket, rest)) => rest,
        None => file_url,
    }
}
