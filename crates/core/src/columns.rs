//! Column-name safety checks for dynamically built statements.
//!
//! Identifiers cannot be bound as SQL parameters, so any column name that
//! ends up interpolated into a statement must first pass this allow-list.

use std::sync::LazyLock;

use regex::Regex;

use crate::error::CoreError;
use crate::types::Record;

/// Letters, digits, and underscore only. No quoting, whitespace, or dots.
static COLUMN_NAME_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[A-Za-z0-9_]+$").expect("valid regex"));

/// Reject any column name outside `[A-Za-z0-9_]+`.
pub fn validate_column_name(name: &str) -> Result<(), CoreError> {
    if COLUMN_NAME_RE.is_match(name) {
        Ok(())
    } else {
        Err(CoreError::Validation(format!("Invalid column name: {name}")))
    }
}

/// Validate every key of a normalized record.
pub fn validate_columns(record: &Record) -> Result<(), CoreError> {
    record.keys().try_for_each(|k| validate_column_name(k))
}
