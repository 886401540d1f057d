//! Export functionality for normalized documents.
//!
//! This module writes the structured JSON record of an export for
//! programmatic access (piping to `jq`, archiving, later `load-json` runs).

mod json;

pub use json::{to_json_string, write_json, write_pretty};
