//! Supabase Storage backend (REST API, service-role key).

use async_trait::async_trait;
use reqwest::header::CONTENT_TYPE;
use serde::{Deserialize, Serialize};

use crate::error::StorageError;
use crate::{BlobStore, StoredBlob};

const DEFAULT_CONTENT_TYPE: &str = "application/octet-stream";

/// Talks to `{url}/storage/v1` with a service-role key.
pub struct SupabaseBlobStore {
    client: reqwest::Client,
    base_url: String,
    service_key: String,
}

#[derive(Debug, Deserialize)]
struct UploadResponse {
    #[serde(rename = "Key")]
    key: String,
}

#[derive(Debug, Serialize)]
struct RemoveRequest<'a> {
    prefixes: &'a [String],
}

impl SupabaseBlobStore {
    pub fn new(url: &str, service_key: &str) -> Result<Self, StorageError> {
        let client = reqwest::Client::builder()
            .user_agent(concat!("pmo-storage/", env!("CARGO_PKG_VERSION")))
            .build()?;
        Ok(Self {
            client,
            base_url: url.trim_end_matches('/').to_string(),
            service_key: service_key.to_string(),
        })
    }

    fn object_url(&self, bucket: &str, path: &str) -> String {
        format!("{}/storage/v1/object/{bucket}/{path}", self.base_url)
    }

    fn authorized(&self, request: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        request
            .bearer_auth(&self.service_key)
            .header("apikey", &self.service_key)
    }
}

#[async_trait]
impl BlobStore for SupabaseBlobStore {
    async fn upload(
        &self,
        bucket: &str,
        path: &str,
        bytes: Vec<u8>,
        content_type: Option<&str>,
    ) -> Result<StoredBlob, StorageError> {
        let size = bytes.len();
        let response = self
            .authorized(self.client.post(self.object_url(bucket, path)))
            .header(CONTENT_TYPE, content_type.unwrap_or(DEFAULT_CONTENT_TYPE))
            .header("x-upsert", "false")
            .body(bytes)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            // Supabase reports duplicates as 400 with `"error":"Duplicate"` in the body.
            if status.as_u16() == 409 || body.contains("\"Duplicate\"") {
                return Err(StorageError::AlreadyExists(format!("{bucket}/{path}")));
            }
            return Err(StorageError::Status {
                status: status.as_u16(),
                body,
            });
        }

        let uploaded: UploadResponse = response.json().await?;
        tracing::debug!(bucket, path, size, key = %uploaded.key, "Uploaded blob");

        Ok(StoredBlob {
            bucket: bucket.to_string(),
            path: path.to_string(),
            full_path: uploaded.key,
        })
    }

    fn public_url(&self, bucket: &str, path: &str) -> String {
        format!("{}/storage/v1/object/public/{bucket}/{path}", self.base_url)
    }

    async fn remove(&self, bucket: &str, paths: &[String]) -> Result<(), StorageError> {
        if paths.is_empty() {
            return Ok(());
        }

        let url = format!("{}/storage/v1/object/{bucket}", self.base_url);
        let response = self
            .authorized(self.client.delete(url))
            .json(&RemoveRequest { prefixes: paths })
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(StorageError::Status {
                status: status.as_u16(),
                body,
            });
        }

        tracing::debug!(bucket, count = paths.len(), "Removed blobs");
        Ok(())
    }
}
