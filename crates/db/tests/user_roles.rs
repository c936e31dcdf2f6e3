//! Integration tests for the single-holder rule on exclusive roles.

use assert_matches::assert_matches;
use pmo_core::entity::USERS;
use pmo_core::error::CoreError;
use pmo_core::roles::{ROLE_PM, ROLE_PMO};
use pmo_core::types::{DbId, Record};
use pmo_db::repositories::{RoleRepo, UserRepo};
use pmo_db::RepoError;
use serde_json::{json, Value};
use sqlx::PgPool;

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

async fn role_id(pool: &PgPool, name: &str) -> DbId {
    RoleRepo::find_by_name(pool, name).await.unwrap().unwrap().id
}

async fn create_user(pool: &PgPool, email: &str, role_id: DbId) -> Result<Record, RepoError> {
    let body = json!({ "email": email, "role_id": role_id, "password": "$argon2id$stub" });
    let values = USERS.bind_values(body.as_object().unwrap()).unwrap();
    UserRepo::create(pool, values).await
}

async fn set_role(pool: &PgPool, id: DbId, role_id: DbId) -> Result<Option<Record>, RepoError> {
    let body = json!({ "role_id": role_id });
    let values = USERS.bind_values(body.as_object().unwrap()).unwrap();
    UserRepo::update(pool, id, values).await
}

fn id_of(record: &Record) -> DbId {
    record["id"].as_i64().unwrap()
}

// ---------------------------------------------------------------------------
// Test: Exclusive role accepts exactly one holder
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "./migrations")]
async fn test_second_pmo_rejected_on_create(pool: PgPool) {
    let pmo = role_id(&pool, ROLE_PMO).await;

    let first = create_user(&pool, "pmo@example.com", pmo).await.unwrap();
    assert!(!first.contains_key("password"));
    assert!(!first.contains_key("role_is_exclusive"));

    let second = create_user(&pool, "pmo2@example.com", pmo).await;
    assert_matches!(
        second,
        Err(RepoError::Core(CoreError::Conflict(msg))) if msg == "Only one PMO is allowed in the system"
    );
}

#[sqlx::test(migrations = "./migrations")]
async fn test_second_pmo_rejected_on_update(pool: PgPool) {
    let pmo = role_id(&pool, ROLE_PMO).await;
    let pm = role_id(&pool, ROLE_PM).await;

    create_user(&pool, "pmo@example.com", pmo).await.unwrap();
    let other = create_user(&pool, "pm@example.com", pm).await.unwrap();

    let result = set_role(&pool, id_of(&other), pmo).await;
    assert_matches!(result, Err(RepoError::Core(CoreError::Conflict(_))));

    // The rejected update left the user untouched.
    let (still,): (DbId,) = sqlx::query_as("SELECT role_id FROM users WHERE id = $1")
        .bind(id_of(&other))
        .fetch_one(&pool)
        .await
        .unwrap();
    assert_eq!(still, pm);
}

#[sqlx::test(migrations = "./migrations")]
async fn test_holder_may_resave_exclusive_role(pool: PgPool) {
    let pmo = role_id(&pool, ROLE_PMO).await;
    let holder = create_user(&pool, "pmo@example.com", pmo).await.unwrap();

    let updated = set_role(&pool, id_of(&holder), pmo).await.unwrap().unwrap();
    assert_eq!(updated["role_id"], Value::from(pmo));
}

#[sqlx::test(migrations = "./migrations")]
async fn test_vacated_role_can_be_reassigned(pool: PgPool) {
    let pmo = role_id(&pool, ROLE_PMO).await;
    let pm = role_id(&pool, ROLE_PM).await;

    let holder = create_user(&pool, "pmo@example.com", pmo).await.unwrap();
    let other = create_user(&pool, "pm@example.com", pm).await.unwrap();

    set_role(&pool, id_of(&holder), pm).await.unwrap().unwrap();
    set_role(&pool, id_of(&other), pmo).await.unwrap().unwrap();

    let roles = RoleRepo::list_with_counts(&pool).await.unwrap();
    let pmo_row = roles.iter().find(|r| r.id == pmo).unwrap();
    assert_eq!(pmo_row.user_count, 1);
}

#[sqlx::test(migrations = "./migrations")]
async fn test_non_exclusive_role_uncapped(pool: PgPool) {
    let pm = role_id(&pool, ROLE_PM).await;
    for i in 0..3 {
        create_user(&pool, &format!("pm{i}@example.com"), pm)
            .await
            .unwrap();
    }
    let roles = RoleRepo::list_with_counts(&pool).await.unwrap();
    assert_eq!(roles.iter().find(|r| r.id == pm).unwrap().user_count, 3);
}

#[sqlx::test(migrations = "./migrations")]
async fn test_unknown_role_is_validation_error(pool: PgPool) {
    let result = create_user(&pool, "ghost@example.com", 9999).await;
    assert_matches!(result, Err(RepoError::Core(CoreError::Validation(_))));
}

#[sqlx::test(migrations = "./migrations")]
async fn test_update_missing_user_returns_none(pool: PgPool) {
    let pm = role_id(&pool, ROLE_PM).await;
    assert!(set_role(&pool, 9999, pm).await.unwrap().is_none());
}

// ---------------------------------------------------------------------------
// Test: Unique index backstops writes that bypass the repository
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "./migrations")]
async fn test_index_rejects_raw_second_holder(pool: PgPool) {
    let pmo = role_id(&pool, ROLE_PMO).await;
    create_user(&pool, "pmo@example.com", pmo).await.unwrap();

    let result = sqlx::query("INSERT INTO users (email, role_id) VALUES ($1, $2)")
        .bind("raw@example.com")
        .bind(pmo)
        .execute(&pool)
        .await;
    let err = result.unwrap_err();
    let code = err.as_database_error().and_then(|e| e.code()).unwrap();
    assert_eq!(code, "23505");
}

#[sqlx::test(migrations = "./migrations")]
async fn test_concurrent_assignments_leave_one_holder(pool: PgPool) {
    let pmo = role_id(&pool, ROLE_PMO).await;

    let (a, b) = tokio::join!(
        create_user(&pool, "a@example.com", pmo),
        create_user(&pool, "b@example.com", pmo),
    );
    assert_eq!(
        [a.is_ok(), b.is_ok()].iter().filter(|ok| **ok).count(),
        1,
        "exactly one concurrent assignment should win"
    );
}

// ---------------------------------------------------------------------------
// Test: Only exclusive roles are locked
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "./migrations")]
async fn test_non_exclusive_assignment_takes_no_role_lock(pool: PgPool) {
    let pm = role_id(&pool, ROLE_PM).await;

    // Hold a row lock on the PM role that blocks `FOR UPDATE` but not the
    // foreign-key check on `users.role_id`.
    let mut holder = pool.begin().await.unwrap();
    sqlx::query("SELECT id FROM role WHERE id = $1 FOR NO KEY UPDATE")
        .bind(pm)
        .execute(&mut *holder)
        .await
        .unwrap();

    let created = tokio::time::timeout(
        std::time::Duration::from_secs(5),
        create_user(&pool, "pm@example.com", pm),
    )
    .await
    .expect("assigning a non-exclusive role should not wait on the role row");
    assert!(created.is_ok());

    holder.rollback().await.unwrap();
}
