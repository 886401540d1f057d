//! Shared test helpers for storage module tests.
//!
//! This module provides common utilities for database setup and test data creation
//! used across storage module tests.

#[cfg(test)]
use sqlx::SqlitePool;

#[cfg(test)]
use crate::models::{HttpMessage, Transaction};
#[cfg(test)]
use crate::storage::{ensure_schema, Store};

/// Creates an in-memory store with the schema applied.
#[cfg(test)]
pub async fn create_test_store() -> Store {
    let store = Store::open_in_memory()
        .await
        .expect("Failed to create test store");
    ensure_schema(store.pool())
        .await
        .expect("Failed to create schema");
    store
}

/// Builds a GET transaction for `url` with the given request headers.
#[cfg(test)]
pub fn sample_item(url: &str, request_headers: &[(&str, &str)]) -> Transaction {
    Transaction {
        time: Some("Mon Jan 01 00:00:00 UTC 2024".to_string()),
        url: Some(url.to_string()),
        method: Some("GET".to_string()),
        request: Some(HttpMessage {
            value: String::new(),
            base64: "true".to_string(),
        }),
        request_headers: Some(request_headers.iter().copied().collect()),
        ..Default::default()
    }
}

/// Makes every insert into `requests` with the given url abort, so tests can
/// force a storage failure partway through a load.
#[cfg(test)]
pub async fn fail_inserts_for_url(pool: &SqlitePool, url: &str) {
    let sql = format!(
        "CREATE TRIGGER fail_on_url BEFORE INSERT ON requests
         WHEN NEW.url = '{}'
         BEGIN SELECT RAISE(ABORT, 'forced failure'); END",
        url.replace('\'', "''")
    );
    sqlx::query(&sql)
        .execute(pool)
        .await
        .expect("Failed to create failure trigger");
}

/// Counts the rows of `table`.
#[cfg(test)]
pub async fn count(pool: &SqlitePool, table: &str) -> i64 {
    sqlx::query_scalar(&format!("SELECT COUNT(*) FROM {}", table))
        .fetch_one(pool)
        .await
        .expect("Failed to count rows")
}
