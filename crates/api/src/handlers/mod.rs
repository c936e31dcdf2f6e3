//! Request handlers.
//!
//! Handlers validate and normalize the request, delegate to the
//! repositories in `pmo_db` (and to object storage for uploads), and map
//! errors via [`AppError`](crate::error::AppError).

pub mod admin;
pub mod blobs;
pub mod documents;
pub mod records;
pub mod templates;

use axum::extract::FromRequest;

use crate::error::AppError;

/// JSON body extractor whose rejection is a failure envelope.
#[derive(Debug, FromRequest)]
#[from_request(via(axum::Json), rejection(AppError))]
pub struct JsonBody<T>(pub T);
