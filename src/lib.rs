//! burp_ingest library: Burp Suite export normalization and loading
//!
//! This library turns a Burp Suite XML traffic export into:
//! - a structured JSON record (one nested object per captured transaction), and
//! - a SQLite database with `requests`, `request_headers` and `response_headers`
//!   tables for ad-hoc querying.
//!
//! # Example
//!
//! ```no_run
//! use burp_ingest::{run_export, Config};
//! use std::path::PathBuf;
//!
//! # #[tokio::main]
//! # async fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let config = Config {
//!     xml_file: PathBuf::from("export.xml"),
//!     db_path: PathBuf::from("data/requests.db"),
//! };
//!
//! let report = run_export(config).await?;
//! println!("Loaded {} of {} items", report.inserted, report.items);
//! # Ok(())
//! # }
//! ```
//!
//! # Requirements
//!
//! Storage functions are async and require a Tokio runtime.

#![warn(missing_docs)]

pub mod config;
pub mod error_handling;
pub mod export;
pub mod initialization;
#[allow(missing_docs)]
pub mod models;
#[allow(missing_docs)]
pub mod parse;
#[allow(missing_docs)]
pub mod storage;

// Re-export public API
pub use config::{Config, LogFormat, LogLevel};
pub use models::{ExportDocument, Headers, Host, HttpMessage, Transaction};
pub use parse::{normalize, normalize_file, split_http_message, SplitMessage};
pub use run::{convert_file, export_to_database, load_json_file, run_export, ExportReport};
pub use storage::{LoadReport, Store};

// Pipeline drivers: parse, then load, then report
mod run {
    use std::path::{Path, PathBuf};
    use std::time::Instant;

    use anyhow::{Context, Result};
    use log::{debug, info, warn};

    use crate::config::Config;
    use crate::error_handling::StructuralError;
    use crate::export::write_json;
    use crate::models::ExportDocument;
    use crate::parse::normalize_file;
    use crate::storage::{expand_tilde, HeaderTable, LoadReport, Store};

    /// Results of an export run.
    #[derive(Debug, Clone)]
    pub struct ExportReport {
        /// Items found in the input
        pub items: usize,
        /// Transactions written to the database by this run
        pub inserted: usize,
        /// Input records skipped because they did not have the transaction shape
        pub skipped: usize,
        /// Rows in `requests` after the run
        pub total_requests: i64,
        /// Path to the SQLite database
        pub db_path: PathBuf,
        /// Elapsed time in seconds
        pub elapsed_seconds: f64,
    }

    /// Runs an XML-to-database export with the provided configuration.
    pub async fn run_export(config: Config) -> Result<ExportReport> {
        export_to_database(&config.xml_file, &config.db_path).await
    }

    /// Normalizes an XML export and loads it into the database at `db_path`.
    ///
    /// # Errors
    ///
    /// Fails without writing anything if the export cannot be read or parsed.
    /// A storage failure rolls back every row of this run before the error is
    /// returned.
    pub async fn export_to_database(xml_path: &Path, db_path: &Path) -> Result<ExportReport> {
        let start = Instant::now();
        let xml_path = expand_tilde(xml_path);
        info!("Converting XML file: {}", xml_path.display());
        info!("Target database: {}", db_path.display());

        let document = normalize_file(&xml_path)
            .await
            .context("Failed to convert XML to JSON")?;

        let report = load_into(&document, db_path, 0)
            .await
            .context("Failed to load data into database")?;
        Ok(ExportReport {
            elapsed_seconds: start.elapsed().as_secs_f64(),
            ..report
        })
    }

    /// Loads a structured JSON record (as written by `convert`) into the database.
    ///
    /// Records that are not transaction-shaped are skipped with a warning.
    pub async fn load_json_file(json_path: &Path, db_path: &Path) -> Result<ExportReport> {
        let start = Instant::now();
        let json_path = expand_tilde(json_path);
        info!("Reading JSON record: {}", json_path.display());

        let text = tokio::fs::read_to_string(&json_path)
            .await
            .map_err(|source| StructuralError::Io {
                path: json_path.display().to_string(),
                source,
            })?;
        let value: serde_json::Value = serde_json::from_str(&text).map_err(StructuralError::from)?;

        let (document, warnings) = ExportDocument::from_json_value(value);
        for warning in &warnings {
            warn!("{}", warning);
        }

        let report = load_into(&document, db_path, warnings.len())
            .await
            .context("Failed to load data into database")?;
        Ok(ExportReport {
            items: report.items + warnings.len(),
            elapsed_seconds: start.elapsed().as_secs_f64(),
            ..report
        })
    }

    /// Normalizes an XML export and writes the JSON record to `output` (stdout if `None`).
    pub async fn convert_file(xml_path: &Path, output: Option<&Path>) -> Result<usize> {
        let document = normalize_file(&expand_tilde(xml_path))
            .await
            .context("Failed to convert XML to JSON")?;
        write_json(&document, output)
    }

    /// Opens the store, loads, logs totals and closes the store on every path.
    async fn load_into(
        document: &ExportDocument,
        db_path: &Path,
        skipped: usize,
    ) -> Result<ExportReport> {
        let store = Store::open(db_path).await?;
        let outcome = load_and_count(&store, document).await;
        let db_path = PathBuf::from(store.location());
        store.close().await;

        let (loaded, total_requests) = outcome?;
        info!("Total requests in database: {}", total_requests);
        Ok(ExportReport {
            items: document.items.len(),
            inserted: loaded.inserted,
            skipped,
            total_requests,
            db_path,
            elapsed_seconds: 0.0,
        })
    }

    async fn load_and_count(store: &Store, document: &ExportDocument) -> Result<(LoadReport, i64)> {
        let loaded = store.load(document).await?;
        let total = store.total_requests().await?;
        for table in [HeaderTable::Request, HeaderTable::Response] {
            let rows = store.count_rows(table.table_name()).await?;
            debug!("Rows in {}: {}", table.table_name(), rows);
        }
        Ok((loaded, total))
    }
}
