//! Response envelope shared by every endpoint.
//!
//! All responses use `{ "status", "message", "result" }`. Handlers build
//! successes through [`ok`] and [`created`]; failures come from
//! [`crate::error::AppError`].

use axum::http::StatusCode;
use axum::Json;
use serde::Serialize;

/// `{ "status": "success" | "failure", "message": ..., "result": ... }`
#[derive(Debug, Serialize)]
pub struct ApiResponse<T: Serialize> {
    pub status: &'static str,
    pub message: String,
    pub result: Option<T>,
}

impl<T: Serialize> ApiResponse<T> {
    pub fn success(message: impl Into<String>, result: T) -> Self {
        Self {
            status: "success",
            message: message.into(),
            result: Some(result),
        }
    }

    pub fn failure(message: impl Into<String>, result: T) -> Self {
        Self {
            status: "failure",
            message: message.into(),
            result: Some(result),
        }
    }
}

/// 200 with a success envelope.
pub fn ok<T: Serialize>(message: impl Into<String>, result: T) -> Json<ApiResponse<T>> {
    Json(ApiResponse::success(message, result))
}

/// 201 with a success envelope.
pub fn created<T: Serialize>(
    message: impl Into<String>,
    result: T,
) -> (StatusCode, Json<ApiResponse<T>>) {
    (StatusCode::CREATED, ok(message, result))
}
