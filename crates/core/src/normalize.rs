//! Request body normalization.
//!
//! Several frontend versions post to the same endpoints. The canonical
//! shape nests columns under `data`; older forms post flat fields with
//! entity-specific names. Everything is reduced to one [`Record`] here,
//! before any validation or database work happens.

use serde_json::Value;

use crate::error::CoreError;
use crate::types::{DbId, Record};

/// Legacy flat field name paired with the column it maps to.
pub type LegacyAlias = (&'static str, &'static str);

/// Normalize a create-style body into a flat record.
///
/// Shapes, tried in order:
/// 1. `{ "data": { ... } }`
/// 2. Flat legacy fields from `aliases`, used when at least one of them
///    carries a non-empty value.
pub fn normalize_body(body: &Value, aliases: &[LegacyAlias]) -> Result<Record, CoreError> {
    let record = if let Some(data) = body.get("data").and_then(Value::as_object) {
        data.clone()
    } else if aliases.iter().any(|(field, _)| is_present(body.get(*field))) {
        aliases
            .iter()
            .filter_map(|(field, column)| {
                body.get(*field)
                    .filter(|v| is_present(Some(v)))
                    .map(|v| ((*column).to_string(), v.clone()))
            })
            .collect()
    } else {
        return Err(CoreError::Validation(
            "Data missing or invalid format".into(),
        ));
    };

    if record.is_empty() {
        return Err(CoreError::Validation(
            "No data fields provided for insertion".into(),
        ));
    }

    Ok(record)
}

/// Normalize an update body into the target row id and the changed columns.
///
/// The id may be sent at the top level (`{ id, data }`) or inside `data`;
/// it is never treated as a column to update.
pub fn split_update_body(
    body: &Value,
    aliases: &[LegacyAlias],
) -> Result<(DbId, Record), CoreError> {
    let id_source = if is_present(body.get("id")) {
        body
    } else {
        body.get("data").unwrap_or(&Value::Null)
    };
    let id = require_id(id_source, "id")?;

    let mut record = normalize_body(body, aliases)?;
    record.remove("id");
    if record.is_empty() {
        return Err(CoreError::Validation("No data fields provided for update".into()));
    }

    Ok((id, record))
}

/// Extract a required numeric identifier from a JSON body.
///
/// Accepts a JSON integer or a string holding one (multipart and older
/// forms send ids as strings).
pub fn require_id(body: &Value, field: &str) -> Result<DbId, CoreError> {
    let value = body.get(field);
    if !is_present(value) {
        return Err(CoreError::Validation(format!(
            "Required field missing: {field} is required"
        )));
    }

    parse_id(value.unwrap_or(&Value::Null), field)
}

/// Parse an identifier from a number or numeric string.
pub fn parse_id(value: &Value, field: &str) -> Result<DbId, CoreError> {
    let parsed = match value {
        Value::Number(n) => n.as_i64(),
        Value::String(s) => s.trim().parse::<DbId>().ok(),
        _ => None,
    };

    parsed.ok_or_else(|| {
        CoreError::Validation(format!("Invalid {field} format: must be a number"))
    })
}

/// `null`, missing, and the empty string all count as absent.
fn is_present(value: Option<&Value>) -> bool {
    match value {
        None | Some(Value::Null) => false,
        Some(Value::String(s)) => !s.is_empty(),
        Some(_) => true,
    }
}
