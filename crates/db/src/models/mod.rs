//! Domain model structs and DTOs.
//!
//! Entities with free-form column sets (departments, initiatives,
//! portfolios, projects, users) are handled as `Record`s through
//! [`crate::repositories::RecordRepo`]; the structs here cover the tables
//! whose shape the service itself depends on.

pub mod document_template;
pub mod project_document;
pub mod role;
pub mod storage_orphan;
