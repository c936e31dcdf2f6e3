//! Domain logic shared by the persistence gateway and the HTTP layer.
//!
//! Nothing in this crate performs I/O: request normalization, column
//! safety, entity schemas and value coercion, the role-exclusivity rule,
//! and blob path conventions are all pure functions over JSON values.

pub mod columns;
pub mod document_template;
pub mod entity;
pub mod error;
pub mod normalize;
pub mod roles;
pub mod storage_paths;
pub mod types;
