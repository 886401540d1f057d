//! Loading normalized transactions into the database.
//!
//! A load runs as one SQLite transaction: every `requests` row and its header
//! rows are committed together, or the whole run is rolled back.
//!
//! All inserts use parameterized queries to prevent SQL injection.

use log::{debug, error, info};
use sqlx::SqliteConnection;

use crate::error_handling::StorageError;
use crate::models::{ExportDocument, Headers, HttpMessage, Transaction};

use super::schema::ensure_schema;
use super::Store;

/// Outcome of a load.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LoadReport {
    /// Transactions written to `requests`
    pub inserted: usize,
}

/// Which header table a mapping belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HeaderTable {
    Request,
    Response,
}

impl HeaderTable {
    pub const fn table_name(self) -> &'static str {
        match self {
            HeaderTable::Request => "request_headers",
            HeaderTable::Response => "response_headers",
        }
    }
}

impl Store {
    /// Loads every transaction of `document`, in order, as one unit of work.
    ///
    /// The schema is created first if needed. Each transaction becomes one
    /// `requests` row plus one row per request and response header.
    ///
    /// # Errors
    ///
    /// Any storage failure rolls back every row inserted by this call and is
    /// returned as `StorageError`; nothing from the run is committed.
    pub async fn load(&self, document: &ExportDocument) -> Result<LoadReport, StorageError> {
        let inserted = self.load_transactions(&document.items).await?;
        Ok(LoadReport { inserted })
    }

    /// Inserts `items` inside a single transaction and returns how many were written.
    pub async fn load_transactions(&self, items: &[Transaction]) -> Result<usize, StorageError> {
        ensure_schema(self.pool()).await?;

        info!("Processing {} item(s)", items.len());
        let mut tx = self.pool().begin().await?;

        match insert_all(&mut *tx, items).await {
            Ok(inserted) => {
                tx.commit().await?;
                info!(
                    "Successfully loaded {} request(s) into {}",
                    inserted,
                    self.location()
                );
                Ok(inserted)
            }
            Err(e) => {
                error!("Error occurred, rolling back transaction: {e}");
                if let Err(rollback_err) = tx.rollback().await {
                    error!("Rollback failed: {rollback_err}");
                }
                Err(e)
            }
        }
    }

    /// Number of rows currently in `requests`.
    pub async fn total_requests(&self) -> Result<i64, StorageError> {
        let count = sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM requests")
            .fetch_one(self.pool())
            .await?;
        Ok(count)
    }
}

async fn insert_all(
    conn: &mut SqliteConnection,
    items: &[Transaction],
) -> Result<usize, StorageError> {
    let mut inserted = 0;
    for item in items {
        let request_id = insert_request(conn, item).await?;
        debug!("Inserted request with ID: {}", request_id);

        insert_headers(
            conn,
            request_id,
            item.request_headers.as_ref(),
            HeaderTable::Request,
        )
        .await?;
        insert_headers(
            conn,
            request_id,
            item.response_headers.as_ref(),
            HeaderTable::Response,
        )
        .await?;

        inserted += 1;
    }
    Ok(inserted)
}

/// Inserts the `requests` row for one transaction and returns its id.
///
/// Absent fields are stored as NULL, including both base64 flags when the
/// corresponding message is absent.
async fn insert_request(
    conn: &mut SqliteConnection,
    item: &Transaction,
) -> Result<i64, StorageError> {
    debug!(
        "Inserting request: {} {}",
        item.method.as_deref().unwrap_or("-"),
        item.url.as_deref().unwrap_or("-")
    );

    let host = item.host.as_ref();
    let request = item.request.as_ref();
    let response = item.response.as_ref();

    let id = sqlx::query_scalar::<_, i64>(
        "INSERT INTO requests (
            time, url, host_value, host_ip, port, protocol, method, path, extension,
            request_value, request_base64, status, response_length, mime_type,
            response_value, response_base64, comment
        ) VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
        RETURNING id",
    )
    .bind(item.time.as_deref())
    .bind(item.url.as_deref())
    .bind(host.map(|h| h.value.as_str()))
    .bind(host.map(|h| h.ip.as_str()))
    .bind(item.port.as_deref())
    .bind(item.protocol.as_deref())
    .bind(item.method.as_deref())
    .bind(item.path.as_deref())
    .bind(item.extension.as_deref())
    .bind(request.map(|m| m.value.as_str()))
    .bind(request.map(HttpMessage::is_base64))
    .bind(item.status.as_deref())
    .bind(item.responselength.as_deref())
    .bind(item.mimetype.as_deref())
    .bind(response.map(|m| m.value.as_str()))
    .bind(response.map(HttpMessage::is_base64))
    .bind(item.comment.as_deref())
    .fetch_one(&mut *conn)
    .await?;

    Ok(id)
}

/// Inserts one row per header. An absent or empty mapping writes nothing.
async fn insert_headers(
    conn: &mut SqliteConnection,
    request_id: i64,
    headers: Option<&Headers>,
    table: HeaderTable,
) -> Result<(), StorageError> {
    let Some(headers) = headers.filter(|h| !h.is_empty()) else {
        return Ok(());
    };

    debug!(
        "Inserting {} headers into {}",
        headers.len(),
        table.table_name()
    );
    let sql = format!(
        "INSERT INTO {} (request_id, header_name, header_value) VALUES (?, ?, ?)",
        table.table_name()
    );
    for (name, value) in headers.iter() {
        sqlx::query(&sql)
            .bind(request_id)
            .bind(name)
            .bind(value)
            .execute(&mut *conn)
            .await?;
    }
    Ok(())
}
