use axum::extract::multipart::MultipartError;
use axum::extract::rejection::JsonRejection;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use pmo_core::error::CoreError;
use pmo_db::RepoError;
use pmo_storage::StorageError;
use serde_json::{json, Value};

use crate::response::ApiResponse;

const INTERNAL_MESSAGE: &str = "An internal error occurred";

/// Application-level error type for HTTP handlers.
///
/// Wraps [`CoreError`] for domain errors and adds HTTP-specific variants.
/// Implements [`IntoResponse`] to produce the failure envelope.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    /// A domain-level error from `pmo_core`.
    #[error(transparent)]
    Core(#[from] CoreError),

    /// A database error from sqlx.
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// An object-storage error.
    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),

    /// A unique constraint was violated while writing an entity.
    #[error("{entity} with this identifier already exists")]
    Duplicate {
        entity: &'static str,
        detail: Option<String>,
    },

    /// A bad request with a human-readable message.
    #[error("Bad request: {0}")]
    BadRequest(String),

    /// An internal error with a human-readable message.
    #[error("Internal error: {0}")]
    InternalError(String),
}

/// Convenience type alias for handler return values.
pub type AppResult<T> = Result<T, AppError>;

impl AppError {
    /// Attribute a unique-constraint violation to `entity`.
    ///
    /// Every other error passes through unchanged.
    pub fn for_entity(self, entity: &'static str) -> Self {
        match self {
            AppError::Database(sqlx::Error::Database(db_err))
                if db_err.code().as_deref() == Some("23505") =>
            {
                AppError::Duplicate {
                    entity,
                    detail: pg_detail(db_err.as_ref()),
                }
            }
            other => other,
        }
    }
}

impl From<RepoError> for AppError {
    fn from(err: RepoError) -> Self {
        match err {
            RepoError::Core(core) => AppError::Core(core),
            RepoError::Database(db) => AppError::Database(db),
        }
    }
}

impl From<JsonRejection> for AppError {
    fn from(rejection: JsonRejection) -> Self {
        AppError::BadRequest(rejection.body_text())
    }
}

impl From<MultipartError> for AppError {
    fn from(err: MultipartError) -> Self {
        AppError::BadRequest(err.body_text())
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, message, result) = match &self {
            // --- CoreError variants ---
            AppError::Core(core) => match core {
                CoreError::NotFound(msg) => (StatusCode::NOT_FOUND, msg.clone(), Value::Null),
                CoreError::Validation(msg) => (StatusCode::BAD_REQUEST, msg.clone(), Value::Null),
                CoreError::Conflict(msg) => (StatusCode::CONFLICT, msg.clone(), Value::Null),
                CoreError::Internal(msg) => {
                    tracing::error!(error = %msg, "Internal core error");
                    internal()
                }
            },

            // --- Database errors ---
            AppError::Database(err) => classify_sqlx_error(err),

            // --- Storage errors ---
            AppError::Storage(err) => {
                tracing::error!(error = %err, "Storage error");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Storage operation failed".to_string(),
                    Value::Null,
                )
            }

            AppError::Duplicate { detail, .. } => (
                StatusCode::CONFLICT,
                self.to_string(),
                detail.as_ref().map_or(Value::Null, |d| json!({ "detail": d })),
            ),

            // --- HTTP-specific errors ---
            AppError::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg.clone(), Value::Null),
            AppError::InternalError(msg) => {
                tracing::error!(error = %msg, "Internal error");
                internal()
            }
        };

        (status, axum::Json(ApiResponse::failure(message, result))).into_response()
    }
}

fn internal() -> (StatusCode, String, Value) {
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        INTERNAL_MESSAGE.to_string(),
        Value::Null,
    )
}

/// PostgreSQL's `DETAIL` line, when the driver exposes it.
fn pg_detail(err: &dyn sqlx::error::DatabaseError) -> Option<String> {
    err.try_downcast_ref::<sqlx::postgres::PgDatabaseError>()
        .and_then(|pg| pg.detail())
        .map(str::to_string)
}

/// Classify a sqlx error into an HTTP status, message, and result payload.
///
/// - `RowNotFound` maps to 404.
/// - Unique constraint violations (`23505`) map to 409 naming the constraint.
/// - Foreign key (`23503`) and not-null (`23502`) violations map to 400.
/// - Everything else maps to 500 with a sanitized message.
fn classify_sqlx_error(err: &sqlx::Error) -> (StatusCode, String, Value) {
    match err {
        sqlx::Error::RowNotFound => (
            StatusCode::NOT_FOUND,
            "Resource not found".to_string(),
            Value::Null,
        ),
        sqlx::Error::Database(db_err) => {
            let detail = pg_detail(db_err.as_ref())
                .map_or(Value::Null, |d| json!({ "detail": d }));
            match db_err.code().as_deref() {
                Some("23505") => {
                    let constraint = db_err.constraint().unwrap_or("unknown");
                    (
                        StatusCode::CONFLICT,
                        format!("Duplicate value violates unique constraint: {constraint}"),
                        detail,
                    )
                }
                Some("23503") => (
                    StatusCode::BAD_REQUEST,
                    "Referenced record does not exist or is still in use".to_string(),
                    detail,
                ),
                Some("23502") => {
                    let column = db_err
                        .try_downcast_ref::<sqlx::postgres::PgDatabaseError>()
                        .and_then(|pg| pg.column())
                        .unwrap_or("unknown");
                    (
                        StatusCode::BAD_REQUEST,
                        format!("Required field missing: {column} is required"),
                        Value::Null,
                    )
                }
                _ => {
                    tracing::error!(error = %db_err, "Database error");
                    internal()
                }
            }
        }
        other => {
            tracing::error!(error = %other, "Database error");
            internal()
        }
    }
}
