//! Main application entry point (CLI binary).
//!
//! This is a thin wrapper around the `burp_ingest` library that handles:
//! - Command-line argument parsing
//! - Environment variable loading (.env file)
//! - Logger initialization
//! - User-facing output formatting
//!
//! All core functionality is implemented in the library crate.

use std::path::Path;
use std::process;

use anyhow::{Context, Result};
use clap::Parser;

use burp_ingest::config::{Cli, Command};
use burp_ingest::export::write_pretty;
use burp_ingest::initialization::{init_logger_with, load_dotenv};
use burp_ingest::{convert_file, export_to_database, load_json_file, ExportReport, Store};

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env before parsing so BURP_INGEST_DB can come from it
    load_dotenv();

    let cli = Cli::parse();

    init_logger_with(cli.log_level.clone().into(), cli.log_format.clone())
        .context("Failed to initialize logger")?;

    if let Err(e) = run(cli.command).await {
        eprintln!("burp_ingest error: {:#}", e);
        process::exit(1);
    }
    Ok(())
}

async fn run(command: Command) -> Result<()> {
    match command {
        Command::Convert { xml_file, output } => {
            let count = convert_file(&xml_file, output.as_deref()).await?;
            if let Some(path) = output {
                println!("✅ Wrote {} item(s) to {}", count, path.display());
            }
        }
        Command::Export { xml_file, db } => {
            let report = export_to_database(&xml_file, &db.db).await?;
            print_report(&report);
        }
        Command::LoadJson { json_file, db } => {
            let report = load_json_file(&json_file, &db.db).await?;
            print_report(&report);
        }
        Command::Tables { db } => {
            let store = open_store(&db.db).await?;
            let tables = store.list_tables().await;
            store.close().await;
            print_json(&tables?)?;
        }
        Command::Schema { table, db } => {
            let store = open_store(&db.db).await?;
            let columns = store.table_schema(&table).await;
            store.close().await;
            print_json(&columns?)?;
        }
        Command::Describe { db } => {
            let store = open_store(&db.db).await?;
            let description = store.describe().await;
            store.close().await;
            print_json(&description?)?;
        }
        Command::Query { sql, db } => {
            let store = open_store(&db.db).await?;
            let rows = store.execute_query(&sql, &[]).await;
            store.close().await;
            print_json(&rows?)?;
        }
        Command::SafeQuery {
            table,
            limit,
            where_clause,
            db,
        } => {
            let store = open_store(&db.db).await?;
            let rows = store
                .run_safe_query(&table, limit, where_clause.as_deref())
                .await;
            store.close().await;
            print_json(&rows?)?;
        }
    }
    Ok(())
}

async fn open_store(db_path: &Path) -> Result<Store> {
    Store::open(db_path)
        .await
        .with_context(|| format!("Failed to open database: {}", db_path.display()))
}

fn print_json<T: serde::Serialize>(value: &T) -> Result<()> {
    write_pretty(value, std::io::stdout().lock())
}

fn print_report(report: &ExportReport) {
    println!(
        "✅ Loaded {} of {} item{} ({} skipped) in {:.1}s",
        report.inserted,
        report.items,
        if report.items == 1 { "" } else { "s" },
        report.skipped,
        report.elapsed_seconds
    );
    println!(
        "Results saved in {} ({} requests total)",
        report.db_path.display(),
        report.total_requests
    );
}
