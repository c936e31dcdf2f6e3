//! Handlers shared by every schema-described entity (departments,
//! initiatives, portfolios, projects).
//!
//! Each function takes the entity's [`EntityTable`]; the router binds one
//! set of routes per entity.

use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use pmo_core::entity::EntityTable;
use pmo_core::error::CoreError;
use pmo_core::normalize::{normalize_body, require_id, split_update_body};
use pmo_core::types::Record;
use pmo_db::repositories::RecordRepo;
use serde_json::{json, Value};

use crate::error::{AppError, AppResult};
use crate::handlers::JsonBody;
use crate::response::{created, ok, ApiResponse};
use crate::state::AppState;

/// POST /data-management/add{Entity}
///
/// Accepts `{ "data": {...} }` or the entity's legacy flat shape.
pub async fn add(
    entity: &'static EntityTable,
    State(state): State<AppState>,
    JsonBody(body): JsonBody<Value>,
) -> AppResult<(StatusCode, Json<ApiResponse<Record>>)> {
    let record = normalize_body(&body, entity.aliases)?;
    let values = entity.bind_values(&record)?;

    let row = RecordRepo::insert(&state.pool, entity, values)
        .await
        .map_err(|e| AppError::from(e).for_entity(entity.label))?;

    tracing::info!(table = entity.table, id = ?row.get("id"), "Record created");
    Ok(created(format!("{} added successfully", entity.label), row))
}

/// GET /data-management/get{Entities}
pub async fn list(
    entity: &'static EntityTable,
    State(state): State<AppState>,
) -> AppResult<Json<ApiResponse<Vec<Record>>>> {
    let rows = RecordRepo::list(&state.pool, entity).await?;
    Ok(ok(format!("{}s fetched successfully", entity.label), rows))
}

/// POST /data-management/update{Entity}
///
/// Body: `{ "id": ..., "data": {...} }` (the id may also sit inside `data`).
pub async fn update(
    entity: &'static EntityTable,
    State(state): State<AppState>,
    JsonBody(body): JsonBody<Value>,
) -> AppResult<Json<ApiResponse<Record>>> {
    let (id, record) = split_update_body(&body, entity.aliases)?;
    let values = entity.bind_values(&record)?;

    let row = RecordRepo::update(&state.pool, entity, id, values)
        .await
        .map_err(|e| AppError::from(e).for_entity(entity.label))?
        .ok_or_else(|| CoreError::not_found(entity.label, id))?;

    Ok(ok(format!("{} updated successfully", entity.label), row))
}

/// POST /data-management/delete{Entity}
///
/// Body: `{ "id": ... }`.
pub async fn delete(
    entity: &'static EntityTable,
    State(state): State<AppState>,
    JsonBody(body): JsonBody<Value>,
) -> AppResult<Json<ApiResponse<Value>>> {
    let id = require_id(&body, "id")?;

    if !RecordRepo::delete(&state.pool, entity, id).await? {
        return Err(CoreError::not_found(entity.label, id).into());
    }

    tracing::info!(table = entity.table, id, "Record deleted");
    Ok(ok(
        format!("{} deleted successfully", entity.label),
        json!({ "id": id }),
    ))
}
