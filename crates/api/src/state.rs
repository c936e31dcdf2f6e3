use std::sync::Arc;

use pmo_storage::SharedBlobStore;

use crate::config::ServerConfig;

/// Shared application state available to all Axum handlers via `State<AppState>`.
///
/// Cheaply cloneable: the pool is reference-counted and everything else is
/// behind `Arc`.
#[derive(Clone)]
pub struct AppState {
    /// Database connection pool.
    pub pool: pmo_db::DbPool,
    /// Server configuration.
    pub config: Arc<ServerConfig>,
    /// Object storage for project documents and template files.
    pub storage: SharedBlobStore,
}
