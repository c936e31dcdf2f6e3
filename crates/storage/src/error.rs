#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    #[error("Storage configuration error: {0}")]
    Config(String),

    #[error("Storage request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Storage returned {status}: {body}")]
    Status { status: u16, body: String },

    #[error("Object already exists: {0}")]
    AlreadyExists(String),

    #[error("Storage backend unavailable: {0}")]
    Unavailable(String),
}
