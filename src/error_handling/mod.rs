//! Error handling for every pipeline stage.
//!
//! Errors are split by how far they propagate:
//! - **Local**: `DecodeFailure` (one request/response field) and
//!   `RecordShapeWarning` (one JSON record) are recovered where they occur
//! - **Fatal**: `StructuralError` (the document) and `StorageError` (the load)
//!   abort the run

mod types;

// Re-export public API
pub use types::{
    DecodeFailure, InitializationError, QueryError, RecordShapeWarning, StorageError,
    StructuralError,
};
