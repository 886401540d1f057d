//! Configuration constants.
//!
//! This module defines the defaults used by the pipeline, the CLI and the
//! query layer.

/// Default SQLite database path used when neither the CLI argument nor
/// `BURP_INGEST_DB` is set.
pub const DB_PATH: &str = "./burp_requests.db";

/// Environment variable consulted for the database path.
pub const DB_PATH_ENV: &str = "BURP_INGEST_DB";

/// Tag name of a transaction element in the export document.
pub const ITEM_TAG: &str = "item";

/// Root attribute holding the exporting tool's version.
pub const BURP_VERSION_ATTR: &str = "burpVersion";
/// Root attribute holding the export timestamp.
pub const EXPORT_TIME_ATTR: &str = "exportTime";

/// Value of a `base64` attribute when the exporter left it out.
pub const DEFAULT_BASE64_FLAG: &str = "false";

/// Separator between a header name and its value in a raw HTTP message.
pub const HEADER_SEPARATOR: &str = ": ";

// Safe query limits
/// Row limit applied by `run_safe_query` when the caller does not pass one
pub const SAFE_QUERY_DEFAULT_LIMIT: u32 = 10;
/// Upper bound for `run_safe_query` row limits
pub const SAFE_QUERY_MAX_LIMIT: u32 = 1000;

/// Keywords rejected inside a safe query's WHERE clause (matched case-insensitively).
pub const DANGEROUS_SQL_KEYWORDS: &[&str] = &["DROP", "DELETE", "INSERT", "UPDATE", "ALTER"];

/// Indentation used when pretty-printing the structured JSON record.
pub const JSON_INDENT: &[u8] = b"    ";
