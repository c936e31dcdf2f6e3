//! Tests for `AppError` → failure envelope mapping.
//!
//! These call `IntoResponse` directly on `AppError` values; no server or
//! database is involved.

use axum::http::StatusCode;
use axum::response::IntoResponse;
use http_body_util::BodyExt;
use pmo_api::error::AppError;
use pmo_core::error::CoreError;
use pmo_storage::StorageError;

/// Helper: convert an `AppError` into its status code and parsed JSON body.
async fn error_to_response(err: AppError) -> (StatusCode, serde_json::Value) {
    let response = err.into_response();
    let status = response.status();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let json: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
    (status, json)
}

// ---------------------------------------------------------------------------
// Test: CoreError variants
// ---------------------------------------------------------------------------

#[tokio::test]
async fn not_found_error_returns_404() {
    let (status, json) = error_to_response(CoreError::not_found("Project", 42).into()).await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(json["status"], "failure");
    assert_eq!(json["message"], "Project with id 42 not found");
    assert!(json["result"].is_null());
}

#[tokio::test]
async fn validation_error_returns_400() {
    let err = AppError::Core(CoreError::Validation("Invalid column name: a-b".into()));
    let (status, json) = error_to_response(err).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(json["message"], "Invalid column name: a-b");
}

#[tokio::test]
async fn conflict_error_returns_409() {
    let err = AppError::Core(CoreError::Conflict(
        "Only one PMO is allowed in the system".into(),
    ));
    let (status, json) = error_to_response(err).await;

    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(json["message"], "Only one PMO is allowed in the system");
}

#[tokio::test]
async fn core_internal_error_is_sanitized() {
    let err = AppError::Core(CoreError::Internal("pool exhausted at 10.0.0.3".into()));
    let (status, json) = error_to_response(err).await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(json["message"], "An internal error occurred");
    assert!(!json.to_string().contains("10.0.0.3"));
}

// ---------------------------------------------------------------------------
// Test: HTTP-specific variants
// ---------------------------------------------------------------------------

#[tokio::test]
async fn bad_request_error_returns_400() {
    let (status, json) = error_to_response(AppError::BadRequest("bad multipart".into())).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(json["status"], "failure");
    assert_eq!(json["message"], "bad multipart");
}

#[tokio::test]
async fn internal_error_returns_500_and_sanitizes_message() {
    let err = AppError::InternalError("secret database credentials leaked".into());
    let (status, json) = error_to_response(err).await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    let body_text = json.to_string();
    assert!(
        !body_text.contains("secret"),
        "Internal error response must not leak sensitive details"
    );
    assert!(!body_text.contains("stack"));
    assert_eq!(json["message"], "An internal error occurred");
}

#[tokio::test]
async fn duplicate_names_the_entity() {
    let err = AppError::Duplicate {
        entity: "Department",
        detail: Some("Key (name)=(HR) already exists.".into()),
    };
    let (status, json) = error_to_response(err).await;

    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(json["message"], "Department with this identifier already exists");
    assert_eq!(json["result"]["detail"], "Key (name)=(HR) already exists.");
}

// ---------------------------------------------------------------------------
// Test: Database and storage errors
// ---------------------------------------------------------------------------

#[tokio::test]
async fn row_not_found_returns_404() {
    let (status, _) = error_to_response(AppError::Database(sqlx::Error::RowNotFound)).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn pool_timeout_returns_sanitized_500() {
    let (status, json) = error_to_response(AppError::Database(sqlx::Error::PoolTimedOut)).await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(json["message"], "An internal error occurred");
}

#[tokio::test]
async fn storage_error_returns_500() {
    let err = AppError::Storage(StorageError::Status {
        status: 503,
        body: "bucket offline".into(),
    });
    let (status, json) = error_to_response(err).await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(json["message"], "Storage operation failed");
    assert!(!json.to_string().contains("bucket offline"));
}

#[tokio::test]
async fn for_entity_leaves_other_errors_alone() {
    let err = AppError::BadRequest("x".into()).for_entity("Department");
    let (status, json) = error_to_response(err).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(json["message"], "x");
}
