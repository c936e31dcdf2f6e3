//! Periodic reconciliation between the database and object storage.
//!
//! Each sweep:
//!
//! 1. purges project-document rows left marked for deletion longer than
//!    the grace period, removing their blobs first;
//! 2. retries removal of queued orphan blobs, dropping each orphan on
//!    success and recording the failure otherwise. An orphan that has
//!    failed [`MAX_ORPHAN_ATTEMPTS`] times is left queued and skipped.

use std::time::Duration;

use chrono::Utc;
use pmo_core::storage_paths::{path_from_stored_url, PROJECT_DOCUMENTS_BUCKET};
use pmo_db::repositories::{ProjectDocumentRepo, StorageOrphanRepo};
use pmo_storage::SharedBlobStore;
use sqlx::PgPool;
use tokio_util::sync::CancellationToken;

/// Rows handled per step of a sweep.
const BATCH_SIZE: i64 = 100;

/// Failed removals after which an orphan is no longer retried.
pub const MAX_ORPHAN_ATTEMPTS: i32 = 10;

/// Outcome of a single sweep.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct SweepReport {
    pub purged_documents: usize,
    pub resolved_orphans: usize,
    pub failed_orphans: usize,
}

/// Run the reconciliation loop until `cancel` is triggered.
pub async fn run(
    pool: PgPool,
    storage: SharedBlobStore,
    interval: Duration,
    grace: Duration,
    cancel: CancellationToken,
) {
    tracing::info!(
        interval_secs = interval.as_secs(),
        grace_secs = grace.as_secs(),
        "Storage reconciliation job started"
    );

    let mut ticker = tokio::time::interval(interval);

    loop {
        tokio::select! {
            _ = cancel.cancelled() => {
                tracing::info!("Storage reconciliation job stopping");
                break;
            }
            _ = ticker.tick() => {
                match sweep_once(&pool, &storage, grace).await {
                    Ok(report) if report == SweepReport::default() => {
                        tracing::debug!("Storage reconciliation: nothing to do");
                    }
                    Ok(report) => {
                        tracing::info!(
                            purged_documents = report.purged_documents,
                            resolved_orphans = report.resolved_orphans,
                            failed_orphans = report.failed_orphans,
                            "Storage reconciliation: sweep complete"
                        );
                    }
                    Err(e) => {
                        tracing::error!(error = %e, "Storage reconciliation: sweep failed");
                    }
                }
            }
        }
    }
}

/// Perform one reconciliation pass.
pub async fn sweep_once(
    pool: &PgPool,
    storage: &SharedBlobStore,
    grace: Duration,
) -> Result<SweepReport, sqlx::Error> {
    let mut report = SweepReport::default();

    let grace = chrono::Duration::from_std(grace).unwrap_or(chrono::Duration::zero());
    let cutoff = Utc::now() - grace;
    for document in ProjectDocumentRepo::list_marked_before(pool, cutoff, BATCH_SIZE).await? {
        let path = path_from_stored_url(&document.file_url);
        if let Err(e) = storage
            .remove(PROJECT_DOCUMENTS_BUCKET, &[path.to_string()])
            .await
        {
            tracing::warn!(document_id = document.id, error = %e, "Queueing blob of stale document");
            StorageOrphanRepo::enqueue(pool, PROJECT_DOCUMENTS_BUCKET, path, "stale document purge")
                .await?;
        }
        if ProjectDocumentRepo::delete_marked(pool, document.id).await? {
            report.purged_documents += 1;
        }
    }

    for orphan in StorageOrphanRepo::list_pending(pool, MAX_ORPHAN_ATTEMPTS, BATCH_SIZE).await? {
        match storage.remove(&orphan.bucket, &[orphan.path.clone()]).await {
            Ok(()) => {
                StorageOrphanRepo::resolve(pool, orphan.id).await?;
                report.resolved_orphans += 1;
            }
            Err(e) => {
                tracing::warn!(
                    orphan_id = orphan.id,
                    bucket = %orphan.bucket,
                    path = %orphan.path,
                    attempts = orphan.attempts + 1,
                    error = %e,
                    "Orphan blob removal failed"
                );
                StorageOrphanRepo::record_failure(pool, orphan.id, &e.to_string()).await?;
                report.failed_orphans += 1;
                if orphan.attempts + 1 >= MAX_ORPHAN_ATTEMPTS {
                    tracing::error!(
                        orphan_id = orphan.id,
                        bucket = %orphan.bucket,
                        path = %orphan.path,
                        "Orphan blob removal exhausted its retries"
                    );
                }
            }
        }
    }

    Ok(report)
}
