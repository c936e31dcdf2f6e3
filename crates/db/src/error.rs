use pmo_core::error::CoreError;

/// Error from repository operations that apply a domain rule inside a
/// transaction, so a rule violation and a database failure can both abort it.
#[derive(Debug, thiserror::Error)]
pub enum RepoError {
    #[error(transparent)]
    Core(#[from] CoreError),

    #[error(transparent)]
    Database(#[from] sqlx::Error),
}
