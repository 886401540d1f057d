// Shared test helpers for export fixtures and database inspection.
//
// This module provides common utilities used across multiple test files to reduce duplication.

use std::path::{Path, PathBuf};

use base64::engine::general_purpose::STANDARD;
use base64::Engine as _;
use sqlx::SqlitePool;

/// Raw request used by the single-item fixture.
pub const SIMPLE_REQUEST: &str = "GET / HTTP/1.1\r\nHost: example.com\r\n\r\n";

/// Base64-encodes a raw HTTP message the way Burp does.
pub fn encode(raw: &str) -> String {
    STANDARD.encode(raw.as_bytes())
}

/// A one-item export: GET to example.com, request only.
#[allow(dead_code)] // Used by other test files
pub fn single_item_export() -> String {
    format!(
        r#"<?xml version="1.0"?>
<!DOCTYPE items [
<!ELEMENT items (item*)>
]>
<items burpVersion="2024.1" exportTime="Mon Jan 01 00:00:00 UTC 2024">
  <item>
    <time>Mon Jan 01 00:00:00 UTC 2024</time>
    <url><![CDATA[http://example.com/]]></url>
    <host ip="10.0.0.1">example.com</host>
    <port>80</port>
    <protocol>http</protocol>
    <method><![CDATA[GET]]></method>
    <path><![CDATA[/]]></path>
    <request base64="true"><![CDATA[{}]]></request>
    <status></status>
    <comment></comment>
  </item>
</items>"#,
        encode(SIMPLE_REQUEST)
    )
}

/// A two-item export where the second item carries a response with a body.
#[allow(dead_code)] // Used by other test files
pub fn request_response_export() -> String {
    let response = "HTTP/1.1 200 OK\r\nContent-Type: application/json\r\nServer: test\r\n\r\n{\"ok\":true}";
    format!(
        r#"<items burpVersion="2024.2" exportTime="now">
  <item>
    <url>http://a.test/one</url>
    <host ip="10.0.0.2">a.test</host>
    <method>GET</method>
    <request base64="true">{req1}</request>
  </item>
  <item>
    <url>http://a.test/two</url>
    <host ip="10.0.0.2">a.test</host>
    <method>POST</method>
    <status>200</status>
    <request base64="true">{req2}</request>
    <response base64="true">{resp}</response>
  </item>
</items>"#,
        req1 = encode("GET /one HTTP/1.1\r\nHost: a.test\r\n\r\n"),
        req2 = encode("POST /two HTTP/1.1\r\nHost: a.test\r\nContent-Length: 3\r\n\r\nx=1"),
        resp = encode(response),
    )
}

/// Writes `contents` to `name` inside `dir` and returns the path.
pub fn write_file(dir: &Path, name: &str, contents: &str) -> PathBuf {
    let path = dir.join(name);
    std::fs::write(&path, contents).expect("Failed to write fixture file");
    path
}

/// Opens an independent connection to an existing database file.
#[allow(dead_code)] // Used by other test files
pub async fn connect(db_path: &Path) -> SqlitePool {
    SqlitePool::connect(&format!("sqlite:{}", db_path.display()))
        .await
        .expect("Failed to open test database")
}

/// Row count of `table`.
#[allow(dead_code)] // Used by other test files
pub async fn count(pool: &SqlitePool, table: &str) -> i64 {
    sqlx::query_scalar(&format!("SELECT COUNT(*) FROM {}", table))
        .fetch_one(pool)
        .await
        .expect("Failed to count rows")
}
