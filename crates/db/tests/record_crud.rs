//! Integration tests for schema-described record CRUD.

use pmo_core::entity::{DEPARTMENT, PORTFOLIO, PROJECT};
use pmo_core::types::Record;
use pmo_db::repositories::RecordRepo;
use serde_json::{json, Value};
use sqlx::PgPool;

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn record(value: Value) -> Record {
    value.as_object().cloned().unwrap()
}

fn db_code(err: &sqlx::Error) -> Option<String> {
    match err {
        sqlx::Error::Database(db) => db.code().map(|c| c.to_string()),
        _ => None,
    }
}

// ---------------------------------------------------------------------------
// Test: Insert returns the stored row
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "./migrations")]
async fn test_insert_returns_row(pool: PgPool) {
    let values = DEPARTMENT
        .bind_values(&record(json!({ "name": "Finance", "arabic_name": "المالية" })))
        .unwrap();
    let row = RecordRepo::insert(&pool, &DEPARTMENT, values).await.unwrap();

    assert!(row["id"].as_i64().unwrap() > 0);
    assert_eq!(row["name"], "Finance");
    assert_eq!(row["arabic_name"], "المالية");
    assert!(row.contains_key("created_at"));
}

// ---------------------------------------------------------------------------
// Test: Typed columns round-trip through the database
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "./migrations")]
async fn test_typed_project_columns(pool: PgPool) {
    let values = PROJECT
        .bind_values(&record(json!({
            "name": "ERP Rollout",
            "start_date": "2025-03-01",
            "end_date": "",
            "is_internal": "true",
            "portfolio_id": ""
        })))
        .unwrap();
    let row = RecordRepo::insert(&pool, &PROJECT, values).await.unwrap();

    assert_eq!(row["start_date"], "2025-03-01");
    assert_eq!(row["end_date"], Value::Null);
    assert_eq!(row["is_internal"], true);
    assert_eq!(row["portfolio_id"], Value::Null);
}

// ---------------------------------------------------------------------------
// Test: Update, find, list, delete
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "./migrations")]
async fn test_update_find_list_delete(pool: PgPool) {
    let values = PORTFOLIO
        .bind_values(&record(json!({ "name": "Digital" })))
        .unwrap();
    let created = RecordRepo::insert(&pool, &PORTFOLIO, values).await.unwrap();
    let id = created["id"].as_i64().unwrap();

    let changes = PORTFOLIO
        .bind_values(&record(json!({ "description": "Digital services" })))
        .unwrap();
    let updated = RecordRepo::update(&pool, &PORTFOLIO, id, changes)
        .await
        .unwrap()
        .expect("row should exist");
    assert_eq!(updated["name"], "Digital");
    assert_eq!(updated["description"], "Digital services");

    let found = RecordRepo::find_by_id(&pool, &PORTFOLIO, id)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(found["description"], "Digital services");

    let all = RecordRepo::list(&pool, &PORTFOLIO).await.unwrap();
    assert_eq!(all.len(), 1);

    assert!(RecordRepo::delete(&pool, &PORTFOLIO, id).await.unwrap());
    assert!(!RecordRepo::delete(&pool, &PORTFOLIO, id).await.unwrap());
    assert!(RecordRepo::find_by_id(&pool, &PORTFOLIO, id)
        .await
        .unwrap()
        .is_none());
}

#[sqlx::test(migrations = "./migrations")]
async fn test_update_missing_row_returns_none(pool: PgPool) {
    let changes = DEPARTMENT
        .bind_values(&record(json!({ "name": "Nowhere" })))
        .unwrap();
    let result = RecordRepo::update(&pool, &DEPARTMENT, 9999, changes)
        .await
        .unwrap();
    assert!(result.is_none());
}

// ---------------------------------------------------------------------------
// Test: Constraint violations surface their SQLSTATE
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "./migrations")]
async fn test_duplicate_department_name_rejected(pool: PgPool) {
    let values = || {
        DEPARTMENT
            .bind_values(&record(json!({ "name": "HR" })))
            .unwrap()
    };
    RecordRepo::insert(&pool, &DEPARTMENT, values()).await.unwrap();
    let err = RecordRepo::insert(&pool, &DEPARTMENT, values())
        .await
        .unwrap_err();
    assert_eq!(db_code(&err).as_deref(), Some("23505"));
}

#[sqlx::test(migrations = "./migrations")]
async fn test_unknown_foreign_key_rejected(pool: PgPool) {
    let values = PROJECT
        .bind_values(&record(json!({ "name": "Orphan", "department_id": 424242 })))
        .unwrap();
    let err = RecordRepo::insert(&pool, &PROJECT, values).await.unwrap_err();
    assert_eq!(db_code(&err).as_deref(), Some("23503"));
}

// ---------------------------------------------------------------------------
// Test: Values are bound, never spliced
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "./migrations")]
async fn test_hostile_value_stored_verbatim(pool: PgPool) {
    let hostile = "x'); DROP TABLE department; --";
    let values = DEPARTMENT
        .bind_values(&record(json!({ "name": hostile })))
        .unwrap();
    let row = RecordRepo::insert(&pool, &DEPARTMENT, values).await.unwrap();
    assert_eq!(row["name"], hostile);

    let all = RecordRepo::list(&pool, &DEPARTMENT).await.unwrap();
    assert_eq!(all.len(), 1);
}
