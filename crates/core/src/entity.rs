//! Static per-entity schemas for dynamically built statements.
//!
//! Every entity that accepts free-form column maps declares the columns it
//! allows and their SQL kinds. A posted record is checked twice before any
//! SQL is built: the name must pass [`validate_column_name`], and it must
//! be declared here. Values are coerced to the declared kind so they can be
//! bound with a concrete type.

use chrono::{DateTime, NaiveDate, Utc};
use serde_json::Value;

use crate::columns::validate_column_name;
use crate::error::CoreError;
use crate::normalize::LegacyAlias;
use crate::types::Record;

/// SQL kind of a column, used to pick the bind type.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColumnKind {
    Text,
    BigInt,
    Double,
    Bool,
    TextList,
    Date,
    Timestamp,
}

/// A declared, writable column.
#[derive(Debug, Clone, Copy)]
pub struct Column {
    pub name: &'static str,
    pub kind: ColumnKind,
}

const fn col(name: &'static str, kind: ColumnKind) -> Column {
    Column { name, kind }
}

/// A value ready to be bound as a statement parameter.
#[derive(Debug, Clone, PartialEq)]
pub enum BindValue {
    /// Typed NULL, so the parameter still carries the column's type.
    Null(ColumnKind),
    Text(String),
    BigInt(i64),
    Double(f64),
    Bool(bool),
    TextList(Vec<String>),
    Date(NaiveDate),
    Timestamp(DateTime<Utc>),
}

/// Static schema of one table.
#[derive(Debug)]
pub struct EntityTable {
    /// SQL table name.
    pub table: &'static str,
    /// Human-readable singular name for messages (`"Department"`).
    pub label: &'static str,
    /// Writable columns. `id` and server-managed columns are never listed.
    pub columns: &'static [Column],
    /// Columns stripped from every record returned to clients.
    pub hidden: &'static [&'static str],
    /// Legacy flat-body aliases accepted by the normalizer.
    pub aliases: &'static [LegacyAlias],
}

impl EntityTable {
    /// Look up a declared column by name.
    pub fn column(&self, name: &str) -> Option<&Column> {
        self.columns.iter().find(|c| c.name == name)
    }

    /// Validate and coerce a record into `(column, value)` pairs in the
    /// record's key order.
    pub fn bind_values(&self, record: &Record) -> Result<Vec<(&'static str, BindValue)>, CoreError> {
        record
            .iter()
            .map(|(name, value)| {
                validate_column_name(name)?;
                let column = self.column(name).ok_or_else(|| {
                    CoreError::Validation(format!("Unknown column '{name}' for {}", self.table))
                })?;
                Ok((column.name, coerce(column, value)?))
            })
            .collect()
    }

    /// Remove hidden columns from a record headed back to a client.
    pub fn redact(&self, mut record: Record) -> Record {
        for key in self.hidden {
            record.remove(*key);
        }
        record
    }
}

/// Coerce a JSON value to the column's kind.
///
/// Forms post numbers and booleans as strings, and empty inputs as `""`;
/// an empty string is treated as NULL for every non-text kind.
pub fn coerce(column: &Column, value: &Value) -> Result<BindValue, CoreError> {
    let invalid = || {
        CoreError::Validation(format!(
            "Invalid value for column '{}': expected {}",
            column.name,
            kind_name(column.kind)
        ))
    };

    if value.is_null() {
        return Ok(BindValue::Null(column.kind));
    }
    if column.kind != ColumnKind::Text && value.as_str().is_some_and(|s| s.trim().is_empty()) {
        return Ok(BindValue::Null(column.kind));
    }

    let bound = match column.kind {
        ColumnKind::Text => match value {
            Value::String(s) => BindValue::Text(s.clone()),
            Value::Number(n) => BindValue::Text(n.to_string()),
            Value::Bool(b) => BindValue::Text(b.to_string()),
            _ => return Err(invalid()),
        },
        ColumnKind::BigInt => match value {
            Value::Number(n) => BindValue::BigInt(n.as_i64().ok_or_else(invalid)?),
            Value::String(s) => BindValue::BigInt(s.trim().parse().map_err(|_| invalid())?),
            _ => return Err(invalid()),
        },
        ColumnKind::Double => match value {
            Value::Number(n) => BindValue::Double(n.as_f64().ok_or_else(invalid)?),
            Value::String(s) => BindValue::Double(s.trim().parse().map_err(|_| invalid())?),
            _ => return Err(invalid()),
        },
        ColumnKind::Bool => match value {
            Value::Bool(b) => BindValue::Bool(*b),
            Value::String(s) => match s.trim() {
                "true" => BindValue::Bool(true),
                "false" => BindValue::Bool(false),
                _ => return Err(invalid()),
            },
            _ => return Err(invalid()),
        },
        ColumnKind::TextList => match value {
            Value::Array(items) => BindValue::TextList(
                items
                    .iter()
                    .map(|v| v.as_str().map(str::to_string).ok_or_else(invalid))
                    .collect::<Result<_, _>>()?,
            ),
            Value::String(s) => BindValue::TextList(vec![s.clone()]),
            _ => return Err(invalid()),
        },
        ColumnKind::Date => {
            let s = value.as_str().ok_or_else(invalid)?.trim();
            let date = NaiveDate::parse_from_str(s, "%Y-%m-%d")
                .or_else(|_| DateTime::parse_from_rfc3339(s).map(|dt| dt.date_naive()))
                .map_err(|_| invalid())?;
            BindValue::Date(date)
        }
        ColumnKind::Timestamp => {
            let s = value.as_str().ok_or_else(invalid)?.trim();
            let ts = DateTime::parse_from_rfc3339(s).map_err(|_| invalid())?;
            BindValue::Timestamp(ts.with_timezone(&Utc))
        }
    };

    Ok(bound)
}

fn kind_name(kind: ColumnKind) -> &'static str {
    match kind {
        ColumnKind::Text => "text",
        ColumnKind::BigInt => "integer",
        ColumnKind::Double => "number",
        ColumnKind::Bool => "boolean",
        ColumnKind::TextList => "list of text",
        ColumnKind::Date => "date (YYYY-MM-DD)",
        ColumnKind::Timestamp => "RFC 3339 timestamp",
    }
}

// ---------------------------------------------------------------------------
// Entity tables
// ---------------------------------------------------------------------------

use ColumnKind::{BigInt, Bool, Date, Text};

pub static DEPARTMENT: EntityTable = EntityTable {
    table: "department",
    label: "Department",
    columns: &[col("name", Text), col("arabic_name", Text)],
    hidden: &[],
    aliases: &[("departmentEnglish", "name"), ("departmentArabic", "arabic_name")],
};

pub static INITIATIVE: EntityTable = EntityTable {
    table: "initiative",
    label: "Initiative",
    columns: &[
        col("name", Text),
        col("arabic_name", Text),
        col("description", Text),
    ],
    hidden: &[],
    aliases: &[],
};

pub static PORTFOLIO: EntityTable = EntityTable {
    table: "portfolio",
    label: "Portfolio",
    columns: &[
        col("name", Text),
        col("arabic_name", Text),
        col("description", Text),
        col("portfolio_manager", BigInt),
        col("initiative_id", BigInt),
    ],
    hidden: &[],
    aliases: &[],
};

pub static PROJECT: EntityTable = EntityTable {
    table: "project",
    label: "Project",
    columns: &[
        col("name", Text),
        col("arabic_name", Text),
        col("description", Text),
        col("department_id", BigInt),
        col("portfolio_id", BigInt),
        col("initiative_id", BigInt),
        col("project_manager", BigInt),
        col("current_phase", Text),
        col("start_date", Date),
        col("end_date", Date),
        col("is_internal", Bool),
    ],
    hidden: &[],
    aliases: &[],
};

pub static USERS: EntityTable = EntityTable {
    table: "users",
    label: "User",
    columns: &[
        col("first_name", Text),
        col("family_name", Text),
        col("arabic_first_name", Text),
        col("arabic_family_name", Text),
        col("email", Text),
        col("password", Text),
        col("department_id", BigInt),
        col("role_id", BigInt),
        col("is_program_manager", Bool),
    ],
    hidden: &["password", "role_is_exclusive"],
    aliases: &[],
};
