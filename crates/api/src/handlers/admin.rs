//! Handlers for `/admin`: roles and users.
//!
//! User writes go through [`UserRepo`], which enforces the single-holder
//! rule for exclusive roles (PMO, DEPUTY) inside a transaction.

use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use pmo_core::entity::USERS;
use pmo_core::error::CoreError;
use pmo_core::normalize::{normalize_body, require_id, split_update_body};
use pmo_core::types::Record;
use pmo_db::models::role::RoleWithCount;
use pmo_db::repositories::{RecordRepo, RoleRepo, UserRepo};
use serde_json::{json, Value};

use crate::auth::password::hash_record_password;
use crate::error::{AppError, AppResult};
use crate::handlers::JsonBody;
use crate::response::{created, ok, ApiResponse};
use crate::state::AppState;

/// GET /admin/getRoles
///
/// Each role carries `user_count` so clients can tell which exclusive
/// roles are already taken.
pub async fn list_roles(
    State(state): State<AppState>,
) -> AppResult<Json<ApiResponse<Vec<RoleWithCount>>>> {
    let roles = RoleRepo::list_with_counts(&state.pool).await?;
    Ok(ok("Roles fetched successfully", roles))
}

/// GET /admin/getUsers
pub async fn list_users(
    State(state): State<AppState>,
) -> AppResult<Json<ApiResponse<Vec<Record>>>> {
    let users = RecordRepo::list(&state.pool, &USERS).await?;
    Ok(ok("Users fetched successfully", users))
}

/// POST /admin/addUser
pub async fn add_user(
    State(state): State<AppState>,
    JsonBody(body): JsonBody<Value>,
) -> AppResult<(StatusCode, Json<ApiResponse<Record>>)> {
    let mut record = normalize_body(&body, USERS.aliases)?;
    hash_password(&mut record)?;
    if record.is_empty() {
        return Err(
            CoreError::Validation("No data fields provided for insertion".into()).into(),
        );
    }
    let values = USERS.bind_values(&record)?;

    let user = UserRepo::create(&state.pool, values)
        .await
        .map_err(|e| AppError::from(e).for_entity(USERS.label))?;

    tracing::info!(user_id = ?user.get("id"), "User created");
    Ok(created("User added successfully", user))
}

/// POST /admin/updateUser
///
/// Body: `{ "id": ..., "data": {...} }`. A blank password keeps the
/// current one.
pub async fn update_user(
    State(state): State<AppState>,
    JsonBody(body): JsonBody<Value>,
) -> AppResult<Json<ApiResponse<Record>>> {
    let (id, mut record) = split_update_body(&body, USERS.aliases)?;
    hash_password(&mut record)?;
    if record.is_empty() {
        return Err(CoreError::Validation("No data fields provided for update".into()).into());
    }
    let values = USERS.bind_values(&record)?;

    let user = UserRepo::update(&state.pool, id, values)
        .await
        .map_err(|e| AppError::from(e).for_entity(USERS.label))?
        .ok_or_else(|| CoreError::not_found(USERS.label, id))?;

    tracing::info!(user_id = id, "User updated");
    Ok(ok("User updated successfully", user))
}

/// POST /admin/deleteUser
///
/// Body: `{ "id": ... }`.
pub async fn delete_user(
    State(state): State<AppState>,
    JsonBody(body): JsonBody<Value>,
) -> AppResult<Json<ApiResponse<Value>>> {
    let id = require_id(&body, "id")?;

    if !RecordRepo::delete(&state.pool, &USERS, id).await? {
        return Err(CoreError::not_found(USERS.label, id).into());
    }

    tracing::info!(user_id = id, "User deleted");
    Ok(ok("User deleted successfully", json!({ "id": id })))
}

fn hash_password(record: &mut Record) -> AppResult<()> {
    hash_record_password(record)
        .map_err(|e| AppError::InternalError(format!("Password hashing failed: {e}")))
}
