//! Export parsing and normalization.
//!
//! This module turns a Burp XML export into `ExportDocument` records:
//! - `message`: splits one base64-encoded raw HTTP message into headers and body
//! - `document`: walks the `item` elements and builds one `Transaction` each
//!
//! Both stages are pure; they hold no state between calls.

mod document;
mod message;

// Re-export public API
pub use document::{normalize, normalize_file};
pub use message::{split_http_message, SplitMessage};
