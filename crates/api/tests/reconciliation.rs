//! Tests for the storage reconciliation sweep.

mod common;

use std::sync::Arc;
use std::time::Duration;

use common::{count_rows, insert_project, insert_template};
use pmo_api::background::storage_reconciliation::{sweep_once, SweepReport, MAX_ORPHAN_ATTEMPTS};
use pmo_core::storage_paths::PROJECT_DOCUMENTS_BUCKET;
use pmo_db::repositories::StorageOrphanRepo;
use pmo_storage::{BlobStore, MemoryBlobStore, SharedBlobStore};
use sqlx::PgPool;

/// Store a blob and insert a document row already marked for deletion
/// `age_secs` ago.
async fn stale_document(pool: &PgPool, store: &MemoryBlobStore, path: &str, age_secs: i64) {
    let project = insert_project(pool, &format!("Project {path}")).await;
    let template = insert_template(pool, &format!("Template {path}")).await;
    store
        .upload(PROJECT_DOCUMENTS_BUCKET, path, b"pdf".to_vec(), None)
        .await
        .unwrap();
    sqlx::query(
        "INSERT INTO project_documents \
             (project_id, template_id, phase, file_url, document_name, deleting_at) \
         VALUES ($1, $2, 'Planning', $3, 'doc.pdf', NOW() - make_interval(secs => $4))",
    )
    .bind(project)
    .bind(template)
    .bind(format!("{PROJECT_DOCUMENTS_BUCKET}/{path}"))
    .bind(age_secs as f64)
    .execute(pool)
    .await
    .unwrap();
}

// ---------------------------------------------------------------------------
// Test: Stale marked documents
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../db/migrations")]
async fn sweep_purges_documents_past_grace(pool: PgPool) {
    let store = Arc::new(MemoryBlobStore::new());
    let shared: SharedBlobStore = store.clone();
    stale_document(&pool, &store, "1/old.pdf", 3_600).await;
    stale_document(&pool, &store, "2/recent.pdf", 5).await;

    let report = sweep_once(&pool, &shared, Duration::from_secs(600))
        .await
        .unwrap();
    assert_eq!(
        report,
        SweepReport {
            purged_documents: 1,
            ..Default::default()
        }
    );
    assert!(!store.contains(PROJECT_DOCUMENTS_BUCKET, "1/old.pdf").await);
    assert!(store.contains(PROJECT_DOCUMENTS_BUCKET, "2/recent.pdf").await);
    assert_eq!(count_rows(&pool, "project_documents").await, 1);
}

#[sqlx::test(migrations = "../db/migrations")]
async fn sweep_with_nothing_to_do_reports_empty(pool: PgPool) {
    let shared: SharedBlobStore = Arc::new(MemoryBlobStore::new());
    let report = sweep_once(&pool, &shared, Duration::ZERO).await.unwrap();
    assert_eq!(report, SweepReport::default());
}

// ---------------------------------------------------------------------------
// Test: Orphan queue
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../db/migrations")]
async fn failed_purge_queues_orphan_until_storage_recovers(pool: PgPool) {
    let store = Arc::new(MemoryBlobStore::new());
    let shared: SharedBlobStore = store.clone();
    stale_document(&pool, &store, "3/stuck.pdf", 60).await;
    store.set_fail_removals(true);

    // The row is purged; its blob is queued and the retry in the same pass
    // fails as well.
    let report = sweep_once(&pool, &shared, Duration::ZERO).await.unwrap();
    assert_eq!(report.purged_documents, 1);
    assert_eq!(report.failed_orphans, 1);
    assert_eq!(count_rows(&pool, "project_documents").await, 0);

    let pending = StorageOrphanRepo::list_pending(&pool, MAX_ORPHAN_ATTEMPTS, 10)
        .await
        .unwrap();
    assert_eq!(pending.len(), 1);
    assert_eq!(pending[0].path, "3/stuck.pdf");
    assert_eq!(pending[0].attempts, 1);
    assert!(pending[0].last_error.is_some());

    store.set_fail_removals(false);
    let report = sweep_once(&pool, &shared, Duration::ZERO).await.unwrap();
    assert_eq!(
        report,
        SweepReport {
            resolved_orphans: 1,
            ..Default::default()
        }
    );
    assert_eq!(StorageOrphanRepo::count(&pool).await.unwrap(), 0);
    assert!(store.is_empty().await);
}

#[sqlx::test(migrations = "../db/migrations")]
async fn queued_orphan_is_removed_from_storage(pool: PgPool) {
    let store = Arc::new(MemoryBlobStore::new());
    let shared: SharedBlobStore = store.clone();
    store
        .upload("templates", "document-templates/1_lost.docx", b"x".to_vec(), None)
        .await
        .unwrap();
    StorageOrphanRepo::enqueue(
        &pool,
        "templates",
        "document-templates/1_lost.docx",
        "template deleted",
    )
    .await
    .unwrap();

    let report = sweep_once(&pool, &shared, Duration::ZERO).await.unwrap();
    assert_eq!(report.resolved_orphans, 1);
    assert!(store.is_empty().await);
}

#[sqlx::test(migrations = "../db/migrations")]
async fn exhausted_orphan_is_no_longer_retried(pool: PgPool) {
    let store = Arc::new(MemoryBlobStore::new());
    let shared: SharedBlobStore = store.clone();
    let orphan = StorageOrphanRepo::enqueue(&pool, "templates", "document-templates/2_x.docx", "test")
        .await
        .unwrap();
    sqlx::query("UPDATE storage_orphans SET attempts = $2 WHERE id = $1")
        .bind(orphan.id)
        .bind(MAX_ORPHAN_ATTEMPTS - 1)
        .execute(&pool)
        .await
        .unwrap();
    store.set_fail_removals(true);

    // Last allowed attempt fails and reaches the cap.
    let report = sweep_once(&pool, &shared, Duration::ZERO).await.unwrap();
    assert_eq!(report.failed_orphans, 1);

    // Further sweeps skip it, even once storage recovers; the row stays.
    store.set_fail_removals(false);
    let report = sweep_once(&pool, &shared, Duration::ZERO).await.unwrap();
    assert_eq!(report, SweepReport::default());
    assert_eq!(StorageOrphanRepo::count(&pool).await.unwrap(), 1);
}
