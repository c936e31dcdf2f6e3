//! Dynamic statements over entities described by an [`EntityTable`].
//!
//! Column identifiers come only from the static schema (already validated
//! against the posted record by [`EntityTable::bind_values`]); every value
//! is pushed as a bound parameter. Rows are returned as JSON records via
//! `to_jsonb`, with the entity's hidden columns removed.

use pmo_core::entity::{BindValue, ColumnKind, EntityTable};
use pmo_core::types::{DbId, Record};
use sqlx::types::Json;
use sqlx::{PgExecutor, PgPool, Postgres, QueryBuilder};

/// Validated `(column, value)` pairs, as produced by `EntityTable::bind_values`.
pub type BoundColumns = Vec<(&'static str, BindValue)>;

/// Provides CRUD operations for schema-described entities.
pub struct RecordRepo;

impl RecordRepo {
    /// Insert a row built from `values`, returning the created record.
    pub async fn insert<'e>(
        executor: impl PgExecutor<'e>,
        entity: &EntityTable,
        values: BoundColumns,
    ) -> Result<Record, sqlx::Error> {
        let mut qb = QueryBuilder::<Postgres>::new("WITH inserted AS (INSERT INTO ");
        qb.push(quote_ident(entity.table));

        if values.is_empty() {
            qb.push(" DEFAULT VALUES");
        } else {
            qb.push(" (");
            for (i, (column, _)) in values.iter().enumerate() {
                if i > 0 {
                    qb.push(", ");
                }
                qb.push(quote_ident(column));
            }
            qb.push(") VALUES (");
            for (i, (_, value)) in values.into_iter().enumerate() {
                if i > 0 {
                    qb.push(", ");
                }
                push_value(&mut qb, value);
            }
            qb.push(")");
        }
        qb.push(" RETURNING *) SELECT to_jsonb(inserted) FROM inserted");

        let Json(record) = qb
            .build_query_scalar::<Json<Record>>()
            .fetch_one(executor)
            .await?;
        Ok(entity.redact(record))
    }

    /// Update the given columns of row `id`. `values` must not be empty.
    ///
    /// Returns `None` if no row with the given `id` exists.
    pub async fn update<'e>(
        executor: impl PgExecutor<'e>,
        entity: &EntityTable,
        id: DbId,
        values: BoundColumns,
    ) -> Result<Option<Record>, sqlx::Error> {
        let mut qb = QueryBuilder::<Postgres>::new("WITH updated AS (UPDATE ");
        qb.push(quote_ident(entity.table));
        qb.push(" SET ");
        for (i, (column, value)) in values.into_iter().enumerate() {
            if i > 0 {
                qb.push(", ");
            }
            qb.push(quote_ident(column));
            qb.push(" = ");
            push_value(&mut qb, value);
        }
        qb.push(" WHERE id = ");
        qb.push_bind(id);
        qb.push(" RETURNING *) SELECT to_jsonb(updated) FROM updated");

        let row = qb
            .build_query_scalar::<Json<Record>>()
            .fetch_optional(executor)
            .await?;
        Ok(row.map(|Json(record)| entity.redact(record)))
    }

    /// Find a row by ID.
    pub async fn find_by_id(
        pool: &PgPool,
        entity: &EntityTable,
        id: DbId,
    ) -> Result<Option<Record>, sqlx::Error> {
        let query = format!(
            "SELECT to_jsonb(t) FROM {} t WHERE t.id = $1",
            quote_ident(entity.table)
        );
        let row = sqlx::query_scalar::<_, Json<Record>>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await?;
        Ok(row.map(|Json(record)| entity.redact(record)))
    }

    /// List all rows ordered by ID ascending.
    pub async fn list(pool: &PgPool, entity: &EntityTable) -> Result<Vec<Record>, sqlx::Error> {
        let query = format!(
            "SELECT to_jsonb(t) FROM {} t ORDER BY t.id ASC",
            quote_ident(entity.table)
        );
        let rows = sqlx::query_scalar::<_, Json<Record>>(&query)
            .fetch_all(pool)
            .await?;
        Ok(rows
            .into_iter()
            .map(|Json(record)| entity.redact(record))
            .collect())
    }

    /// Hard-delete a row by ID. Returns `true` if a row was removed.
    pub async fn delete(pool: &PgPool, entity: &EntityTable, id: DbId) -> Result<bool, sqlx::Error> {
        let query = format!("DELETE FROM {} WHERE id = $1", quote_ident(entity.table));
        let result = sqlx::query(&query).bind(id).execute(pool).await?;
        Ok(result.rows_affected() > 0)
    }
}

/// Double-quote an identifier taken from a static schema.
fn quote_ident(name: &str) -> String {
    format!("\"{name}\"")
}

/// Push one value as a typed bind parameter.
fn push_value(qb: &mut QueryBuilder<'_, Postgres>, value: BindValue) {
    match value {
        BindValue::Null(kind) => match kind {
            ColumnKind::Text => qb.push_bind(None::<String>),
            ColumnKind::BigInt => qb.push_bind(None::<i64>),
            ColumnKind::Double => qb.push_bind(None::<f64>),
            ColumnKind::Bool => qb.push_bind(None::<bool>),
            ColumnKind::TextList => qb.push_bind(None::<Vec<String>>),
            ColumnKind::Date => qb.push_bind(None::<chrono::NaiveDate>),
            ColumnKind::Timestamp => qb.push_bind(None::<chrono::DateTime<chrono::Utc>>),
        },
        BindValue::Text(v) => qb.push_bind(v),
        BindValue::BigInt(v) => qb.push_bind(v),
        BindValue::Double(v) => qb.push_bind(v),
        BindValue::Bool(v) => qb.push_bind(v),
        BindValue::TextList(v) => qb.push_bind(v),
        BindValue::Date(v) => qb.push_bind(v),
        BindValue::Timestamp(v) => qb.push_bind(v),
    };
}
