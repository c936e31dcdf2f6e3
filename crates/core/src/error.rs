use crate::types::DbId;

#[derive(Debug, thiserror::Error)]
pub enum CoreError {
    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Validation failed: {0}")]
    Validation(String),

    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl CoreError {
    /// `"{entity} with id {id} not found"`.
    pub fn not_found(entity: &str, id: DbId) -> Self {
        Self::NotFound(format!("{entity} with id {id} not found"))
    }
}
