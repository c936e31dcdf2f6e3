//! Document template metadata rules.
//!
//! A template applies to internal and/or external projects. External
//! templates must be classified as capex or opex; internal-only templates
//! never carry either flag.

use serde::{Deserialize, Serialize};

use crate::error::CoreError;

/// Project-type flags attached to a template.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TemplateFlags {
    #[serde(default)]
    pub is_capex: bool,
    #[serde(default)]
    pub is_opex: bool,
    #[serde(default)]
    pub is_internal: bool,
    #[serde(default)]
    pub is_external: bool,
}

/// Validate the project-type flags and return their normalized form.
pub fn normalize_flags(flags: TemplateFlags) -> Result<TemplateFlags, CoreError> {
    if !flags.is_internal && !flags.is_external {
        return Err(CoreError::Validation(
            "Select at least one project type (internal or external)".into(),
        ));
    }
    if flags.is_external && !flags.is_capex && !flags.is_opex {
        return Err(CoreError::Validation(
            "External templates must be marked capex or opex".into(),
        ));
    }
    if flags.is_internal && !flags.is_external {
        return Ok(TemplateFlags {
            is_capex: false,
            is_opex: false,
            ..flags
        });
    }
    Ok(flags)
}

/// Validate the descriptive fields of a template.
pub fn validate_fields(
    name: &str,
    arabic_name: &str,
    description: &str,
    phases: &[String],
) -> Result<(), CoreError> {
    if name.trim().is_empty() || arabic_name.trim().is_empty() {
        return Err(CoreError::Validation(
            "Both English and Arabic names are required".into(),
        ));
    }
    if description.trim().is_empty() {
        return Err(CoreError::Validation("A document description is required".into()));
    }
    if phases.iter().all(|p| p.trim().is_empty()) {
        return Err(CoreError::Validation("Select at least one phase".into()));
    }
    Ok(())
}
