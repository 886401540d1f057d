//! Configuration types and CLI options.
//!
//! This module defines enums and structs used for command-line argument parsing
//! and configuration.

use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};

use crate::config::constants::{DB_PATH, DB_PATH_ENV, SAFE_QUERY_DEFAULT_LIMIT};

/// Logging level for the application.
///
/// Controls the verbosity of log output, from most restrictive (Error) to most
/// verbose (Trace).
#[derive(Clone, Debug, ValueEnum)]
pub enum LogLevel {
    /// Only error messages
    Error,
    /// Error and warning messages
    Warn,
    /// Error, warning, and informational messages
    Info,
    /// All messages except trace
    Debug,
    /// All messages including trace
    Trace,
}

impl From<LogLevel> for log::LevelFilter {
    fn from(l: LogLevel) -> Self {
        match l {
            LogLevel::Error => log::LevelFilter::Error,
            LogLevel::Warn => log::LevelFilter::Warn,
            LogLevel::Info => log::LevelFilter::Info,
            LogLevel::Debug => log::LevelFilter::Debug,
            LogLevel::Trace => log::LevelFilter::Trace,
        }
    }
}

/// Log output format.
///
/// - `Plain`: Human-readable format with colors (default)
/// - `Json`: Structured JSON format for machine parsing
#[derive(Clone, Debug, ValueEnum)]
pub enum LogFormat {
    /// Human-readable format with colors (default)
    Plain,
    /// Structured JSON format for machine parsing
    Json,
}

/// Library configuration for an export run (no CLI dependencies).
///
/// # Examples
///
/// ```no_run
/// use burp_ingest::Config;
/// use std::path::PathBuf;
///
/// let config = Config {
///     xml_file: PathBuf::from("export.xml"),
///     db_path: PathBuf::from("~/data/requests.db"),
/// };
/// ```
#[derive(Debug, Clone)]
pub struct Config {
    /// Burp XML export to ingest
    pub xml_file: PathBuf,

    /// Database path (SQLite file)
    pub db_path: PathBuf,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            xml_file: PathBuf::from("export.xml"),
            db_path: PathBuf::from(DB_PATH),
        }
    }
}

/// Command-line interface of the `burp_ingest` binary.
#[derive(Debug, Parser)]
#[command(name = "burp_ingest", version, about)]
pub struct Cli {
    /// Log level
    #[arg(long, value_enum, default_value = "info", global = true)]
    pub log_level: LogLevel,

    /// Log format
    #[arg(long, value_enum, default_value = "plain", global = true)]
    pub log_format: LogFormat,

    /// Subcommand to run
    #[command(subcommand)]
    pub command: Command,
}

/// Database location shared by every subcommand that touches storage.
#[derive(Debug, Clone, clap::Args)]
pub struct DbArg {
    /// SQLite database path (created if missing)
    #[arg(env = DB_PATH_ENV, default_value = DB_PATH)]
    pub db: PathBuf,
}

/// Subcommands of the `burp_ingest` binary.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Convert an XML export to the structured JSON record
    Convert {
        /// Burp XML export
        xml_file: PathBuf,
        /// Write the JSON here instead of stdout
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// Convert an XML export and load it into the database
    Export {
        /// Burp XML export
        xml_file: PathBuf,
        /// Database location
        #[command(flatten)]
        db: DbArg,
    },
    /// Load a previously converted JSON record into the database
    LoadJson {
        /// JSON record produced by `convert`
        json_file: PathBuf,
        /// Database location
        #[command(flatten)]
        db: DbArg,
    },
    /// List user tables
    Tables {
        /// Database location
        #[command(flatten)]
        db: DbArg,
    },
    /// Show the column layout of a table
    Schema {
        /// Table name
        table: String,
        /// Database location
        #[command(flatten)]
        db: DbArg,
    },
    /// Describe every table in the database
    Describe {
        /// Database location
        #[command(flatten)]
        db: DbArg,
    },
    /// Run an arbitrary SQL read query
    Query {
        /// SQL statement
        sql: String,
        /// Database location
        #[command(flatten)]
        db: DbArg,
    },
    /// Run a restricted SELECT against one table
    SafeQuery {
        /// Table name
        table: String,
        /// Maximum rows (clamped to 1..=1000)
        #[arg(long, default_value_t = SAFE_QUERY_DEFAULT_LIMIT)]
        limit: u32,
        /// Filter, without the WHERE keyword
        #[arg(long = "where")]
        where_clause: Option<String>,
        /// Database location
        #[command(flatten)]
        db: DbArg,
    },
}
