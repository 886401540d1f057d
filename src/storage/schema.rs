//! Relational schema for loaded transactions.
//!
//! Three tables (`requests` plus one table per header direction) and nine
//! indexes. All DDL is `IF NOT EXISTS`, so `ensure_schema` can run before
//! every load without touching existing data.

use log::debug;
use sqlx::SqlitePool;

use crate::error_handling::StorageError;

const CREATE_REQUESTS: &str = "CREATE TABLE IF NOT EXISTS requests (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    time TEXT,
    url TEXT,
    host_value TEXT,
    host_ip TEXT,
    port TEXT,
    protocol TEXT,
    method TEXT,
    path TEXT,
    extension TEXT,
    request_value TEXT,
    request_base64 BOOLEAN,
    status TEXT,
    response_length INTEGER,
    mime_type TEXT,
    response_value TEXT,
    response_base64 BOOLEAN,
    comment TEXT,
    created_at DATETIME DEFAULT CURRENT_TIMESTAMP
)";

const CREATE_REQUEST_HEADERS: &str = "CREATE TABLE IF NOT EXISTS request_headers (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    request_id INTEGER NOT NULL,
    header_name TEXT NOT NULL,
    header_value TEXT,
    FOREIGN KEY (request_id) REFERENCES requests(id) ON DELETE CASCADE
)";

const CREATE_RESPONSE_HEADERS: &str = "CREATE TABLE IF NOT EXISTS response_headers (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    request_id INTEGER NOT NULL,
    header_name TEXT NOT NULL,
    header_value TEXT,
    FOREIGN KEY (request_id) REFERENCES requests(id) ON DELETE CASCADE
)";

/// Index definitions, in creation order.
pub const INDEXES: &[&str] = &[
    "CREATE INDEX IF NOT EXISTS idx_requests_time ON requests(time)",
    "CREATE INDEX IF NOT EXISTS idx_requests_url ON requests(url)",
    "CREATE INDEX IF NOT EXISTS idx_requests_host ON requests(host_value)",
    "CREATE INDEX IF NOT EXISTS idx_requests_method ON requests(method)",
    "CREATE INDEX IF NOT EXISTS idx_requests_status ON requests(status)",
    "CREATE INDEX IF NOT EXISTS idx_request_headers_request_id ON request_headers(request_id)",
    "CREATE INDEX IF NOT EXISTS idx_request_headers_name ON request_headers(header_name)",
    "CREATE INDEX IF NOT EXISTS idx_response_headers_request_id ON response_headers(request_id)",
    "CREATE INDEX IF NOT EXISTS idx_response_headers_name ON response_headers(header_name)",
];

/// Creates the tables and indexes if they do not exist yet.
pub async fn ensure_schema(pool: &SqlitePool) -> Result<(), StorageError> {
    for ddl in [CREATE_REQUESTS, CREATE_REQUEST_HEADERS, CREATE_RESPONSE_HEADERS] {
        sqlx::query(ddl).execute(pool).await?;
    }
    debug!("Tables created/verified");

    for ddl in INDEXES.iter().copied() {
        sqlx::query(ddl).execute(pool).await?;
    }
    debug!("Indexes created/verified");

    Ok(())
}
