/// All database primary keys are PostgreSQL BIGSERIAL.
pub type DbId = i64;

/// All timestamps are UTC.
pub type Timestamp = chrono::DateTime<chrono::Utc>;

/// A flat column-name to value mapping, as posted by clients and as
/// returned by dynamically built statements.
pub type Record = serde_json::Map<String, serde_json::Value>;
