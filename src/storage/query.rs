//! Read access to a loaded database.
//!
//! Table enumeration, column introspection and query execution for tools that
//! inspect the data after a load. Rows come back as JSON objects keyed by
//! column name.

use std::collections::BTreeMap;

use base64::engine::general_purpose::STANDARD;
use base64::Engine as _;
use log::debug;
use serde::Serialize;
use serde_json::{Map, Value};
use sqlx::query::Query;
use sqlx::sqlite::{SqliteArguments, SqliteRow};
use sqlx::{Column, Row, Sqlite, TypeInfo, ValueRef};

use crate::config::{DANGEROUS_SQL_KEYWORDS, SAFE_QUERY_MAX_LIMIT};
use crate::error_handling::QueryError;

use super::Store;

/// A result row: column name to value.
pub type JsonRow = Map<String, Value>;

/// One column as reported by `PRAGMA table_info`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ColumnInfo {
    pub cid: i64,
    pub name: String,
    #[serde(rename = "type")]
    pub column_type: String,
    pub notnull: bool,
    pub dflt_value: Option<String>,
    pub pk: i64,
}

#[derive(Debug, Clone, Serialize)]
pub struct TableDescription {
    pub columns: Vec<ColumnInfo>,
    pub column_count: usize,
}

/// Every user table and its columns.
#[derive(Debug, Clone, Serialize)]
pub struct DatabaseDescription {
    pub database_path: String,
    pub tables: BTreeMap<String, TableDescription>,
    pub table_count: usize,
}

/// Result of a data-modifying statement.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct UpdateResult {
    pub last_id: i64,
    pub changes: u64,
}

impl Store {
    /// Names of all user tables (SQLite's internal tables are excluded).
    pub async fn list_tables(&self) -> Result<Vec<String>, QueryError> {
        let names = sqlx::query_scalar::<_, String>(
            "SELECT name FROM sqlite_master WHERE type='table' AND name NOT LIKE 'sqlite_%' ORDER BY name",
        )
        .fetch_all(self.pool())
        .await?;
        Ok(names)
    }

    /// Column layout of `table`.
    ///
    /// # Errors
    ///
    /// Returns `QueryError::UnknownTable` if no such user table exists.
    pub async fn table_schema(&self, table: &str) -> Result<Vec<ColumnInfo>, QueryError> {
        self.require_table(table).await?;

        let rows = sqlx::query(
            "SELECT cid, name, type, \"notnull\", dflt_value, pk FROM pragma_table_info(?)",
        )
        .bind(table)
        .fetch_all(self.pool())
        .await?;

        let mut columns = Vec::with_capacity(rows.len());
        for row in &rows {
            columns.push(ColumnInfo {
                cid: row.try_get("cid")?,
                name: row.try_get("name")?,
                column_type: row.try_get("type")?,
                notnull: row.try_get::<i64, _>("notnull")? != 0,
                dflt_value: row.try_get("dflt_value")?,
                pk: row.try_get("pk")?,
            });
        }
        Ok(columns)
    }

    /// Describes every user table.
    pub async fn describe(&self) -> Result<DatabaseDescription, QueryError> {
        let mut tables = BTreeMap::new();
        for name in self.list_tables().await? {
            let columns = self.table_schema(&name).await?;
            let column_count = columns.len();
            tables.insert(
                name,
                TableDescription {
                    columns,
                    column_count,
                },
            );
        }
        Ok(DatabaseDescription {
            database_path: self.location().to_string(),
            table_count: tables.len(),
            tables,
        })
    }

    /// Number of rows in a user table.
    pub async fn count_rows(&self, table: &str) -> Result<i64, QueryError> {
        self.require_table(table).await?;
        let count = sqlx::query_scalar::<_, i64>(&format!(
            "SELECT COUNT(*) FROM {}",
            quote_identifier(table)
        ))
        .fetch_one(self.pool())
        .await?;
        Ok(count)
    }

    /// Runs an arbitrary query and returns its rows.
    ///
    /// `params` are bound positionally: JSON strings, numbers, booleans and
    /// null map to the matching SQLite types; arrays and objects are bound as
    /// their JSON text.
    pub async fn execute_query(
        &self,
        sql: &str,
        params: &[Value],
    ) -> Result<Vec<JsonRow>, QueryError> {
        debug!("Executing query: {}", sql);
        let rows = bind_params(sqlx::query(sql), params)
            .fetch_all(self.pool())
            .await?;
        rows.iter()
            .map(|row| row_to_json(row).map_err(QueryError::from))
            .collect()
    }

    /// Runs an INSERT, UPDATE or DELETE and commits it immediately.
    pub async fn execute_update(
        &self,
        sql: &str,
        params: &[Value],
    ) -> Result<UpdateResult, QueryError> {
        debug!("Executing update: {}", sql);
        let result = bind_params(sqlx::query(sql), params)
            .execute(self.pool())
            .await?;
        Ok(UpdateResult {
            last_id: result.last_insert_rowid(),
            changes: result.rows_affected(),
        })
    }

    /// Runs `SELECT *` against one table with an optional filter.
    ///
    /// `limit` is clamped to `1..=1000`. The table must exist, and a filter
    /// containing `DROP`, `DELETE`, `INSERT`, `UPDATE` or `ALTER` in any case is
    /// rejected before anything is executed.
    pub async fn run_safe_query(
        &self,
        table: &str,
        limit: u32,
        where_clause: Option<&str>,
    ) -> Result<Vec<JsonRow>, QueryError> {
        let limit = limit.clamp(1, SAFE_QUERY_MAX_LIMIT);
        self.require_table(table).await?;

        let sql = match where_clause.map(str::trim).filter(|w| !w.is_empty()) {
            Some(clause) => {
                check_where_clause(clause)?;
                format!(
                    "SELECT * FROM {} WHERE {} LIMIT {}",
                    quote_identifier(table),
                    clause,
                    limit
                )
            }
            None => format!("SELECT * FROM {} LIMIT {}", quote_identifier(table), limit),
        };
        self.execute_query(&sql, &[]).await
    }

    async fn require_table(&self, table: &str) -> Result<(), QueryError> {
        if self.list_tables().await?.iter().any(|t| t == table) {
            Ok(())
        } else {
            Err(QueryError::UnknownTable(table.to_string()))
        }
    }
}

/// Rejects filters that contain a data-modifying keyword.
pub fn check_where_clause(clause: &str) -> Result<(), QueryError> {
    let upper = clause.to_uppercase();
    match DANGEROUS_SQL_KEYWORDS
        .iter()
        .find(|keyword| upper.contains(*keyword))
    {
        Some(keyword) => Err(QueryError::DangerousClause(keyword.to_string())),
        None => Ok(()),
    }
}

fn quote_identifier(name: &str) -> String {
    format!("\"{}\"", name.replace('"', "\"\""))
}

fn bind_params<'q>(
    mut query: Query<'q, Sqlite, SqliteArguments<'q>>,
    params: &[Value],
) -> Query<'q, Sqlite, SqliteArguments<'q>> {
    for param in params {
        query = match param {
            Value::Null => query.bind(None::<String>),
            Value::Bool(b) => query.bind(*b),
            Value::Number(n) => match n.as_i64() {
                Some(i) => query.bind(i),
                None => query.bind(n.as_f64()),
            },
            Value::String(s) => query.bind(s.clone()),
            other => query.bind(other.to_string()),
        };
    }
    query
}

/// Converts a row using each value's storage class.
fn row_to_json(row: &SqliteRow) -> Result<JsonRow, sqlx::Error> {
    let mut object = Map::new();
    for (i, column) in row.columns().iter().enumerate() {
        let raw = row.try_get_raw(i)?;
        let value = if raw.is_null() {
            Value::Null
        } else {
            match raw.type_info().name() {
                "INTEGER" => Value::from(row.try_get::<i64, _>(i)?),
                "REAL" => Value::from(row.try_get::<f64, _>(i)?),
                "BLOB" => Value::String(STANDARD.encode(row.try_get::<Vec<u8>, _>(i)?)),
                _ => Value::String(row.try_get::<String, _>(i)?),
            }
        };
        object.insert(column.name().to_string(), value);
    }
    Ok(object)
}
