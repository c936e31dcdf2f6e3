//! Repository layer.
//!
//! Each repository is a zero-sized struct providing async CRUD methods
//! that accept `&PgPool` (or any executor, for writes that may run inside
//! a transaction) as the first argument.

pub mod document_template_repo;
pub mod project_document_repo;
pub mod record_repo;
pub mod role_repo;
pub mod storage_orphan_repo;
pub mod user_repo;

pub use document_template_repo::DocumentTemplateRepo;
pub use project_document_repo::ProjectDocumentRepo;
pub use record_repo::{BoundColumns, RecordRepo};
pub use role_repo::RoleRepo;
pub use storage_orphan_repo::StorageOrphanRepo;
pub use user_repo::UserRepo;
