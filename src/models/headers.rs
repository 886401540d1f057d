//! Ordered header mapping.

use std::fmt;

use serde::de::{MapAccess, Visitor};
use serde::ser::SerializeMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// Header name to value mapping extracted from a raw HTTP message.
///
/// Names are case-sensitive. Inserting an existing name replaces its value in
/// place, so the mapping keeps the position of the first occurrence and the
/// value of the last one. Serializes as a JSON object in insertion order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Headers(Vec<(String, String)>);

impl Headers {
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts a header; last write wins on a repeated name.
    pub fn insert(&mut self, name: impl Into<String>, value: impl Into<String>) {
        let name = name.into();
        let value = value.into();
        match self.0.iter_mut().find(|(n, _)| *n == name) {
            Some(entry) => entry.1 = value,
            None => self.0.push((name, value)),
        }
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        self.0
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, v)| v.as_str())
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(n, v)| (n.as_str(), v.as_str()))
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for Headers {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut headers = Headers::new();
        for (name, value) in iter {
            headers.insert(name, value);
        }
        headers
    }
}

impl Serialize for Headers {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.0.len()))?;
        for (name, value) in &self.0 {
            map.serialize_entry(name, value)?;
        }
        map.end()
    }
}

struct HeadersVisitor;

impl<'de> Visitor<'de> for HeadersVisitor {
    type Value = Headers;

    fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str("a map of header names to string values")
    }

    fn visit_map<A: MapAccess<'de>>(self, mut access: A) -> Result<Headers, A::Error> {
        let mut headers = Headers::new();
        while let Some((name, value)) = access.next_entry::<String, String>()? {
            headers.insert(name, value);
        }
        Ok(headers)
    }
}

impl<'de> Deserialize<'de> for Headers {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserializer.deserialize_map(HeadersVisitor)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_insert_last_write_wins_keeps_position() {
        let mut headers = Headers::new();
        headers.insert("Host", "a.example");
        headers.insert("Accept", "*/*");
        headers.insert("Host", "b.example");

        assert_eq!(headers.len(), 2);
        assert_eq!(headers.get("Host"), Some("b.example"));
        let names: Vec<&str> = headers.iter().map(|(n, _)| n).collect();
        assert_eq!(names, vec!["Host", "Accept"]);
    }

    #[test]
    fn test_names_are_case_sensitive() {
        let headers: Headers = [("Host", "a"), ("host", "b")].into_iter().collect();
        assert_eq!(headers.len(), 2);
        assert_eq!(headers.get("host"), Some("b"));
    }

    #[test]
    fn test_serializes_in_insertion_order() {
        let headers: Headers = [("Zeta", "1"), ("Alpha", "2")].into_iter().collect();
        let json = serde_json::to_string(&headers).unwrap();
        assert_eq!(json, r#"{"Zeta":"1","Alpha":"2"}"#);
    }

    #[test]
    fn test_deserialize_rejects_non_string_values() {
        let result: Result<Headers, _> = serde_json::from_str(r#"{"Content-Length": 12}"#);
        assert!(result.is_err());
    }
}
