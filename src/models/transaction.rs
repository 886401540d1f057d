//! Canonical transaction records.

use std::collections::BTreeMap;

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

use crate::config::{BURP_VERSION_ATTR, DEFAULT_BASE64_FLAG, EXPORT_TIME_ATTR};
use crate::error_handling::RecordShapeWarning;

use super::Headers;

/// Treats an explicit JSON `null` like a missing value.
fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

/// The `host` element of a transaction: host name plus the `ip` attribute.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Host {
    #[serde(default, deserialize_with = "null_as_default")]
    pub value: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub ip: String,
}

/// A `request` or `response` element after splitting.
///
/// `value` is the body re-encoded as base64, or empty when the message had no
/// body or could not be decoded. `base64` is the exporter's flag carried
/// through verbatim.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HttpMessage {
    #[serde(default, deserialize_with = "null_as_default")]
    pub value: String,
    #[serde(default = "default_base64_flag")]
    pub base64: String,
}

fn default_base64_flag() -> String {
    DEFAULT_BASE64_FLAG.to_string()
}

impl Default for HttpMessage {
    fn default() -> Self {
        Self {
            value: String::new(),
            base64: default_base64_flag(),
        }
    }
}

impl HttpMessage {
    /// Whether the exporter flagged the original field as base64 (`"true"`).
    pub fn is_base64(&self) -> bool {
        self.base64 == "true"
    }
}

/// One captured request/response pair with its metadata.
///
/// Fields the export left out are `None`. `request_headers` is present exactly
/// when `request` is, likewise for the response. Elements with tag names not
/// listed here are kept as text in `extra`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Transaction {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub time: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub host: Option<Host>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub port: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub protocol: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub method: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub path: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub extension: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub request: Option<HttpMessage>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub responselength: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mimetype: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub response: Option<HttpMessage>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub comment: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub request_headers: Option<Headers>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub response_headers: Option<Headers>,
    #[serde(flatten)]
    pub extra: BTreeMap<String, String>,
}

impl Transaction {
    /// Stores a plain text field by its element tag name.
    pub fn set_text_field(&mut self, tag: &str, text: String) {
        let slot = match tag {
            "time" => &mut self.time,
            "url" => &mut self.url,
            "port" => &mut self.port,
            "protocol" => &mut self.protocol,
            "method" => &mut self.method,
            "path" => &mut self.path,
            "extension" => &mut self.extension,
            "status" => &mut self.status,
            "responselength" => &mut self.responselength,
            "mimetype" => &mut self.mimetype,
            "comment" => &mut self.comment,
            _ => {
                self.extra.insert(tag.to_string(), text);
                return;
            }
        };
        *slot = Some(text);
    }
}

/// A whole export: every transaction in document order plus the root metadata.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ExportDocument {
    pub items: Vec<Transaction>,
    #[serde(rename = "burpVersion")]
    pub burp_version: String,
    #[serde(rename = "exportTime")]
    pub export_time: String,
}

impl ExportDocument {
    /// Rebuilds a document from its structured JSON record.
    ///
    /// A top-level object without an `items` key is treated as a single
    /// transaction. Items that are not objects, or whose fields have the wrong
    /// types, are skipped and reported as warnings.
    pub fn from_json_value(value: Value) -> (ExportDocument, Vec<RecordShapeWarning>) {
        let mut warnings = Vec::new();

        let (raw_items, burp_version, export_time) = match value {
            Value::Object(mut obj) if obj.contains_key("items") => {
                let metadata = |obj: &serde_json::Map<String, Value>, key: &str| {
                    obj.get(key)
                        .and_then(Value::as_str)
                        .unwrap_or_default()
                        .to_string()
                };
                let burp_version = metadata(&obj, BURP_VERSION_ATTR);
                let export_time = metadata(&obj, EXPORT_TIME_ATTR);
                let items = match obj.remove("items") {
                    Some(Value::Array(items)) => items,
                    Some(other) => vec![other],
                    None => Vec::new(),
                };
                (items, burp_version, export_time)
            }
            other => (vec![other], String::new(), String::new()),
        };

        let mut items = Vec::with_capacity(raw_items.len());
        for (index, raw) in raw_items.into_iter().enumerate() {
            match parse_item(raw) {
                Ok(item) => items.push(item),
                Err(reason) => warnings.push(RecordShapeWarning { index, reason }),
            }
        }

        (
            ExportDocument {
                items,
                burp_version,
                export_time,
            },
            warnings,
        )
    }
}

fn parse_item(raw: Value) -> Result<Transaction, String> {
    if !raw.is_object() {
        return Err(format!("expected an object, found {}", json_kind(&raw)));
    }
    serde_json::from_value(raw).map_err(|e| e.to_string())
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
