//! Well-known role names and the single-holder rule for exclusive roles.
//!
//! Role names must match the seed data in `20250301000001_create_reference_tables.sql`.

use crate::error::CoreError;
use crate::types::DbId;

pub const ROLE_PMO: &str = "PMO";
pub const ROLE_DEPUTY: &str = "DEPUTY";
pub const ROLE_PM: &str = "PM";

/// Roles restricted to at most one holder system-wide.
pub const EXCLUSIVE_ROLES: &[&str] = &[ROLE_PMO, ROLE_DEPUTY];

pub fn is_exclusive_role(name: &str) -> bool {
    EXCLUSIVE_ROLES.contains(&name)
}

/// The role a user is being assigned, with its current holder count.
#[derive(Debug, Clone, Copy)]
pub struct RoleSlot<'a> {
    pub id: DbId,
    pub name: &'a str,
    pub is_exclusive: bool,
    pub user_count: i64,
}

/// Decide whether a user currently holding `current_role_id` may take
/// `target`.
///
/// An exclusive role that already has a holder is only accepted when the
/// user is that holder (re-saving an unchanged role).
pub fn check_role_assignment(
    target: &RoleSlot<'_>,
    current_role_id: Option<DbId>,
) -> Result<(), CoreError> {
    if !target.is_exclusive {
        return Ok(());
    }
    if target.user_count >= 1 && current_role_id != Some(target.id) {
        return Err(CoreError::Conflict(format!(
            "Only one {} is allowed in the system",
            target.name
        )));
    }
    Ok(())
}
