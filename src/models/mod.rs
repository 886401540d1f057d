//! In-memory records produced by the normalizer and consumed by the loader.

mod headers;
mod transaction;

pub use headers::Headers;
pub use transaction::{ExportDocument, Host, HttpMessage, Transaction};
