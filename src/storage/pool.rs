//! Database session management.
//!
//! A `Store` owns a SQLite pool capped at a single connection, opened for one
//! run and closed explicitly by the caller:
//! - Missing parent directories and the database file are created
//! - Foreign-key enforcement is enabled on the connection
//! - WAL mode is enabled for on-disk databases so readers can query while a
//!   load is in progress

use std::path::{Path, PathBuf};
use std::str::FromStr;

use log::{error, info};
use sqlx::sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePoolOptions};
use sqlx::SqlitePool;

use crate::error_handling::StorageError;

/// An open relational store.
///
/// There is no process-wide registry of stores: whoever opens a `Store` passes
/// it to the components that need it and closes it when done.
pub struct Store {
    pool: SqlitePool,
    location: String,
}

impl Store {
    /// Opens (creating if absent) the SQLite database at `db_path`.
    ///
    /// A leading `~` is expanded to the home directory and missing parent
    /// directories are created.
    ///
    /// # Errors
    ///
    /// Returns `StorageError::DirectoryCreation` if the parent directory cannot
    /// be created, or `StorageError::SqlError` if the database cannot be opened.
    pub async fn open(db_path: &Path) -> Result<Self, StorageError> {
        let db_path = expand_tilde(db_path);

        if let Some(parent) = db_path.parent() {
            if !parent.as_os_str().is_empty() && !parent.exists() {
                info!("Creating database directory: {}", parent.display());
                std::fs::create_dir_all(parent).map_err(|source| {
                    error!("Failed to create database directory: {source}");
                    StorageError::DirectoryCreation {
                        path: parent.display().to_string(),
                        source,
                    }
                })?;
            }
        }

        let options = SqliteConnectOptions::new()
            .filename(&db_path)
            .create_if_missing(true)
            .foreign_keys(true)
            .journal_mode(SqliteJournalMode::Wal);

        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .connect_with(options)
            .await
            .map_err(|e| {
                error!("Failed to connect to database: {e}");
                StorageError::SqlError(e)
            })?;

        info!("Connected to database: {}", db_path.display());
        Ok(Self {
            pool,
            location: db_path.display().to_string(),
        })
    }

    /// Opens a private in-memory database, mainly for tests.
    pub async fn open_in_memory() -> Result<Self, StorageError> {
        let options = SqliteConnectOptions::from_str("sqlite::memory:")?.foreign_keys(true);
        // The database lives only as long as its single connection
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .min_connections(1)
            .idle_timeout(None)
            .max_lifetime(None)
            .connect_with(options)
            .await?;
        Ok(Self {
            pool,
            location: ":memory:".to_string(),
        })
    }

    /// The underlying pool.
    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    /// Path of the database file, or `:memory:`.
    pub fn location(&self) -> &str {
        &self.location
    }

    /// Closes the connection, waiting for it to be released.
    pub async fn close(self) {
        self.pool.close().await;
    }
}

/// Expands a leading `~` to `$HOME`. Other paths are returned unchanged.
pub fn expand_tilde(path: &Path) -> PathBuf {
    let Ok(rest) = path.strip_prefix("~") else {
        return path.to_path_buf();
    };
    match std::env::var_os("HOME") {
        Some(home) => PathBuf::from(home).join(rest),
        None => path.to_path_buf(),
    }
}
