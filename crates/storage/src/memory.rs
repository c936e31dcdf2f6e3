//! In-process blob store for tests and local runs without Supabase.
//!
//! Failures can be switched on per operation to exercise the callers'
//! partial-failure paths.

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};

use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::error::StorageError;
use crate::{BlobStore, StoredBlob};

#[derive(Default)]
pub struct MemoryBlobStore {
    objects: RwLock<HashMap<String, Vec<u8>>>,
    fail_uploads: AtomicBool,
    fail_removals: AtomicBool,
}

impl MemoryBlobStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make every subsequent upload fail with [`StorageError::Unavailable`].
    pub fn set_fail_uploads(&self, fail: bool) {
        self.fail_uploads.store(fail, Ordering::SeqCst);
    }

    /// Make every subsequent removal fail with [`StorageError::Unavailable`].
    pub fn set_fail_removals(&self, fail: bool) {
        self.fail_removals.store(fail, Ordering::SeqCst);
    }

    pub async fn contains(&self, bucket: &str, path: &str) -> bool {
        self.objects.read().await.contains_key(&key(bucket, path))
    }

    pub async fn get(&self, bucket: &str, path: &str) -> Option<Vec<u8>> {
        self.objects.read().await.get(&key(bucket, path)).cloned()
    }

    pub async fn len(&self) -> usize {
        self.objects.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.objects.read().await.is_empty()
    }
}

fn key(bucket: &str, path: &str) -> String {
    format!("{bucket}/{path}")
}

#[async_trait]
impl BlobStore for MemoryBlobStore {
    async fn upload(
        &self,
        bucket: &str,
        path: &str,
        bytes: Vec<u8>,
        _content_type: Option<&str>,
    ) -> Result<StoredBlob, StorageError> {
        if self.fail_uploads.load(Ordering::SeqCst) {
            return Err(StorageError::Unavailable("uploads disabled".into()));
        }

        let full_path = key(bucket, path);
        let mut objects = self.objects.write().await;
        if objects.contains_key(&full_path) {
            return Err(StorageError::AlreadyExists(full_path));
        }
        objects.insert(full_path.clone(), bytes);

        Ok(StoredBlob {
            bucket: bucket.to_string(),
            path: path.to_string(),
            full_path,
        })
    }

    fn public_url(&self, bucket: &str, path: &str) -> String {
        format!("memory://{bucket}/{path}")
    }

    async fn remove(&self, bucket: &str, paths: &[String]) -> Result<(), StorageError> {
        if self.fail_removals.load(Ordering::SeqCst) {
            return Err(StorageError::Unavailable("removals disabled".into()));
        }

        let mut objects = self.objects.write().await;
        for path in paths {
            objects.remove(&key(bucket, path));
        }
        Ok(())
    }
}
