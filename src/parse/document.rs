//! Export document normalization.

use std::path::Path;

use log::{debug, info, warn};
use roxmltree::{Document, Node, ParsingOptions};

use crate::config::{BURP_VERSION_ATTR, DEFAULT_BASE64_FLAG, EXPORT_TIME_ATTR, ITEM_TAG};
use crate::error_handling::StructuralError;
use crate::models::{ExportDocument, Headers, Host, HttpMessage, Transaction};

use super::message::split_http_message;

/// Normalizes an export document held in memory.
///
/// Every `item` element directly under the root becomes one `Transaction`, in
/// document order. `burpVersion` and `exportTime` are read from the root and
/// default to empty strings. A root without items yields an empty list.
///
/// # Errors
///
/// Returns `StructuralError::Xml` with the parser diagnostic if the document is
/// not well-formed.
pub fn normalize(document: &str) -> Result<ExportDocument, StructuralError> {
    // Burp exports carry an inline DOCTYPE describing the item layout
    let options = ParsingOptions {
        allow_dtd: true,
        ..ParsingOptions::default()
    };
    let doc = Document::parse_with_options(document, options)?;
    let root = doc.root_element();

    let items: Vec<Transaction> = root
        .children()
        .filter(|n| n.is_element() && n.has_tag_name(ITEM_TAG))
        .map(normalize_item)
        .collect();

    Ok(ExportDocument {
        items,
        burp_version: root
            .attribute(BURP_VERSION_ATTR)
            .unwrap_or_default()
            .to_string(),
        export_time: root
            .attribute(EXPORT_TIME_ATTR)
            .unwrap_or_default()
            .to_string(),
    })
}

/// Reads and normalizes an export file.
///
/// # Errors
///
/// Returns `StructuralError::Io` naming the path if the file cannot be read,
/// or `StructuralError::Xml` if it is not well-formed.
pub async fn normalize_file(path: &Path) -> Result<ExportDocument, StructuralError> {
    let text = tokio::fs::read_to_string(path)
        .await
        .map_err(|source| StructuralError::Io {
            path: path.display().to_string(),
            source,
        })?;
    let document = normalize(&text)?;
    info!(
        "Parsed {} with {} item(s)",
        path.display(),
        document.items.len()
    );
    Ok(document)
}

fn normalize_item(item: Node) -> Transaction {
    let mut record = Transaction::default();

    for child in item.children().filter(Node::is_element) {
        let tag = child.tag_name().name();
        let text = child.text().unwrap_or_default();
        match tag {
            "request" => {
                let (message, headers) = split_field(&child, text);
                record.request = Some(message);
                record.request_headers = Some(headers);
            }
            "response" => {
                let (message, headers) = split_field(&child, text);
                record.response = Some(message);
                record.response_headers = Some(headers);
            }
            "host" => {
                record.host = Some(Host {
                    value: text.to_string(),
                    ip: child.attribute("ip").unwrap_or_default().to_string(),
                });
            }
            _ => record.set_text_field(tag, text.to_string()),
        }
    }

    debug!(
        "Normalized item: {} {}",
        record.method.as_deref().unwrap_or("-"),
        record.url.as_deref().unwrap_or("-")
    );
    record
}

/// Splits a `request`/`response` element. A field that fails to decode keeps
/// its flag but gets an empty body and no headers.
fn split_field(element: &Node, text: &str) -> (HttpMessage, Headers) {
    let base64 = element
        .attribute("base64")
        .unwrap_or(DEFAULT_BASE64_FLAG)
        .to_string();

    match split_http_message(text) {
        Ok(split) => (
            HttpMessage {
                value: split.body,
                base64,
            },
            split.headers,
        ),
        Err(e) => {
            warn!(
                "Could not decode <{}> field, storing it without headers or body: {}",
                element.tag_name().name(),
                e
            );
            (
                HttpMessage {
                    value: String::new(),
                    base64,
                },
                Headers::new(),
            )
        }
    }
}
