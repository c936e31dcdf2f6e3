//! Object-storage gateway.
//!
//! Handlers only need three capabilities from a blob backend: upload bytes
//! to a path, derive a public URL for a path, and remove paths. They are
//! expressed by [`BlobStore`] so the HTTP layer can run against Supabase
//! Storage in production and against [`MemoryBlobStore`] in tests.

pub mod config;
pub mod error;
pub mod memory;
pub mod supabase;

use std::sync::Arc;

use async_trait::async_trait;

pub use config::{StorageBackend, StorageConfig};
pub use error::StorageError;
pub use memory::MemoryBlobStore;
pub use supabase::SupabaseBlobStore;

/// Location of a blob after a successful upload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredBlob {
    pub bucket: String,
    /// Path inside the bucket.
    pub path: String,
    /// `{bucket}/{path}` as reported by the backend.
    pub full_path: String,
}

#[async_trait]
pub trait BlobStore: Send + Sync {
    /// Store `bytes` at `path` in `bucket`. Fails if the path is taken.
    async fn upload(
        &self,
        bucket: &str,
        path: &str,
        bytes: Vec<u8>,
        content_type: Option<&str>,
    ) -> Result<StoredBlob, StorageError>;

    /// Public URL for a path. Does not check that the object exists.
    fn public_url(&self, bucket: &str, path: &str) -> String;

    /// Remove the given paths from `bucket`. Missing paths are not an error.
    async fn remove(&self, bucket: &str, paths: &[String]) -> Result<(), StorageError>;
}

/// Shared handle stored in application state.
pub type SharedBlobStore = Arc<dyn BlobStore>;

/// Build the configured backend.
pub fn build_blob_store(config: &StorageConfig) -> Result<SharedBlobStore, StorageError> {
    match &config.backend {
        StorageBackend::Memory => {
            tracing::warn!("Using in-memory blob store; uploads are not persisted");
            Ok(Arc::new(MemoryBlobStore::new()))
        }
        StorageBackend::Supabase { url, service_key } => {
            Ok(Arc::new(SupabaseBlobStore::new(url, service_key)?))
        }
    }
}
