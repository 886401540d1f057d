//! Error type definitions.
//!
//! This module defines the error and warning types used by each pipeline stage.

use log::SetLoggerError;
use thiserror::Error;

/// Error types for initialization failures.
#[derive(Error, Debug)]
#[allow(clippy::enum_variant_names)] // All variants end with "Error" by convention
pub enum InitializationError {
    /// Error initializing the logger.
    #[error("Logger initialization error: {0}")]
    LoggerError(#[from] SetLoggerError),
}

/// A raw request or response field that could not be decoded.
///
/// Recovered locally by the normalizer: the field degrades to empty headers
/// and an empty body.
#[derive(Error, Debug)]
pub enum DecodeFailure {
    /// The field is not valid base64.
    #[error("invalid base64: {0}")]
    Base64(#[from] base64::DecodeError),

    /// The decoded bytes are not valid UTF-8.
    #[error("decoded message is not valid UTF-8: {0}")]
    Utf8(#[from] std::string::FromUtf8Error),
}

/// The export document could not be turned into a transaction list.
///
/// Fatal for a run; no partial result is produced.
#[derive(Error, Debug)]
pub enum StructuralError {
    /// The export file could not be read.
    #[error("Failed to read export file {path}: {source}")]
    Io {
        /// Path of the export file
        path: String,
        /// Underlying I/O error
        #[source]
        source: std::io::Error,
    },

    /// The document is not well-formed XML.
    #[error("Error parsing XML: {0}")]
    Xml(#[from] roxmltree::Error),

    /// The structured JSON record could not be parsed.
    #[error("Error parsing JSON record: {0}")]
    Json(#[from] serde_json::Error),
}

/// Error types for database operations.
#[derive(Error, Debug)]
pub enum StorageError {
    /// Error creating the directory that holds the database file.
    #[error("Database directory creation error for {path}: {source}")]
    DirectoryCreation {
        /// Directory that could not be created
        path: String,
        /// Underlying I/O error
        #[source]
        source: std::io::Error,
    },

    /// SQL execution error.
    #[error("SQL error: {0}")]
    SqlError(#[from] sqlx::Error),
}

/// Error types for the query layer.
#[derive(Error, Debug)]
pub enum QueryError {
    /// The named table does not exist in the database.
    #[error("Unknown table: {0}")]
    UnknownTable(String),

    /// A safe query filter contained a data-modifying keyword.
    #[error("WHERE clause contains potentially dangerous keyword: {0}")]
    DangerousClause(String),

    /// Underlying storage failure.
    #[error(transparent)]
    Storage(#[from] StorageError),
}

impl From<sqlx::Error> for QueryError {
    fn from(e: sqlx::Error) -> Self {
        QueryError::Storage(StorageError::SqlError(e))
    }
}

/// A record in a structured JSON export that does not have the transaction shape.
///
/// The loader skips such records and keeps going.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordShapeWarning {
    /// Position of the record in the `items` array
    pub index: usize,
    /// Why the record was rejected
    pub reason: String,
}

impl std::fmt::Display for RecordShapeWarning {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Skipping invalid item #{}: {}", self.index, self.reason)
    }
}
