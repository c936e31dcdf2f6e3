use crate::error::StorageError;

/// Which blob backend to talk to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StorageBackend {
    /// Supabase Storage REST API.
    Supabase { url: String, service_key: String },
    /// Process-local map. Nothing survives a restart.
    Memory,
}

impl StorageBackend {
    /// Short name as accepted by `STORAGE_BACKEND`.
    pub fn name(&self) -> &'static str {
        match self {
            StorageBackend::Supabase { .. } => "supabase",
            StorageBackend::Memory => "memory",
        }
    }
}

/// Blob storage configuration loaded from environment variables.
#[derive(Debug, Clone)]
pub struct StorageConfig {
    pub backend: StorageBackend,
}

impl StorageConfig {
    /// Load configuration from environment variables.
    ///
    /// | Env Var                | Default      |
    /// |------------------------|--------------|
    /// | `STORAGE_BACKEND`      | `supabase`   |
    /// | `SUPABASE_URL`         | required for `supabase` |
    /// | `SUPABASE_SERVICE_KEY` | required for `supabase` |
    pub fn from_env() -> Result<Self, StorageError> {
        let backend = std::env::var("STORAGE_BACKEND").unwrap_or_else(|_| "supabase".into());
        Self::from_parts(
            &backend,
            std::env::var("SUPABASE_URL").ok(),
            std::env::var("SUPABASE_SERVICE_KEY").ok(),
        )
    }

    fn from_parts(
        backend: &str,
        url: Option<String>,
        service_key: Option<String>,
    ) -> Result<Self, StorageError> {
        let backend = match backend {
            "memory" => StorageBackend::Memory,
            "supabase" => {
                let url = url
                    .filter(|u| !u.trim().is_empty())
                    .ok_or_else(|| StorageError::Config("SUPABASE_URL must be set".into()))?;
                let service_key = service_key.filter(|k| !k.trim().is_empty()).ok_or_else(|| {
                    StorageError::Config("SUPABASE_SERVICE_KEY must be set".into())
                })?;
                StorageBackend::Supabase {
                    url: url.trim_end_matches('/').to_string(),
                    service_key,
                }
            }
            other => {
                return Err(StorageError::Config(format!(
                    "Unknown STORAGE_BACKEND '{other}'. Must be one of: supabase, memory"
                )))
            }
        };
        Ok(Self { backend })
    }
}
