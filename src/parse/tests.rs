// Parse module tests.

use super::*;
use base64::engine::general_purpose::STANDARD;
use base64::Engine as _;

fn encode(raw: &str) -> String {
    STANDARD.encode(raw.as_bytes())
}

fn decode(body: &str) -> String {
    String::from_utf8(STANDARD.decode(body).unwrap()).unwrap()
}

#[test]
fn test_split_request_headers_only() {
    let split = split_http_message(&encode("GET / HTTP/1.1\r\nHost: example.com\r\n\r\n")).unwrap();
    assert_eq!(split.headers.get("Host"), Some("example.com"));
    assert_eq!(split.headers.len(), 1);
    // No body: empty string, not base64 of an empty string
    assert_eq!(split.body, "");
}

#[test]
fn test_split_response_with_body() {
    let raw = "HTTP/1.1 200 OK\r\nContent-Type: text/html\r\nContent-Length: 13\r\n\r\n<p>hello</p>\r\n";
    let split = split_http_message(&encode(raw)).unwrap();
    assert_eq!(split.headers.get("Content-Type"), Some("text/html"));
    assert_eq!(split.headers.get("Content-Length"), Some("13"));
    assert_eq!(decode(&split.body), "<p>hello</p>");
}

#[test]
fn test_split_body_keeps_blank_lines() {
    let raw = "POST /form HTTP/1.1\nHost: a\n\nline1\n\nline3";
    let split = split_http_message(&encode(raw)).unwrap();
    assert_eq!(decode(&split.body), "line1\n\nline3");
}

#[test]
fn test_split_trims_exactly_one_trailing_newline() {
    let raw = "HTTP/1.1 200 OK\r\nA: b\r\n\r\nbody\r\n\r\n";
    let split = split_http_message(&encode(raw)).unwrap();
    assert_eq!(decode(&split.body), "body\n");
}

#[test]
fn test_split_body_round_trip_without_trailing_newline() {
    let body_lines = ["{\"a\": 1,", "  \"b\": [1, 2]", "}"];
    let raw = format!(
        "HTTP/1.1 200 OK\r\nContent-Type: application/json\r\n\r\n{}",
        body_lines.join("\r\n")
    );
    let split = split_http_message(&encode(&raw)).unwrap();
    let decoded = decode(&split.body);
    assert_eq!(decoded, body_lines.join("\n"));
    assert!(!decoded.ends_with('\n'));
}

#[test]
fn test_split_duplicate_headers_last_write_wins() {
    let raw = "HTTP/1.1 200 OK\r\nSet-Cookie: a=1\r\nServer: x\r\nSet-Cookie: b=2\r\n\r\n";
    let split = split_http_message(&encode(raw)).unwrap();
    assert_eq!(split.headers.len(), 2);
    assert_eq!(split.headers.get("Set-Cookie"), Some("b=2"));
}

#[test]
fn test_split_skips_lines_without_separator() {
    let raw = "GET / HTTP/1.1\r\nHost: a\r\nnot-a-header\r\nX-Empty:\r\nX-Value: a: b\r\n\r\n";
    let split = split_http_message(&encode(raw)).unwrap();
    assert_eq!(split.headers.len(), 2);
    assert_eq!(split.headers.get("X-Empty"), None);
    // Only the first ": " separates name from value
    assert_eq!(split.headers.get("X-Value"), Some("a: b"));
}

#[test]
fn test_split_always_discards_first_line() {
    // A capture whose first line is a header still loses that line
    let raw = "Host: first\r\nAccept: */*\r\n\r\n";
    let split = split_http_message(&encode(raw)).unwrap();
    assert_eq!(split.headers.get("Host"), None);
    assert_eq!(split.headers.get("Accept"), Some("*/*"));
}

#[test]
fn test_split_lone_carriage_returns() {
    let raw = "GET / HTTP/1.1\rHost: a\r\rbody";
    let split = split_http_message(&encode(raw)).unwrap();
    assert_eq!(split.headers.get("Host"), Some("a"));
    assert_eq!(decode(&split.body), "body");
}

#[test]
fn test_split_unicode_line_boundaries() {
    let raw = "HTTP/1.1 200 OK\r\nX-A: 1\x0cX-B: 2\r\n\r\nvar s='a\u{2028}b';";
    let split = split_http_message(&encode(raw)).unwrap();
    let headers: Vec<(&str, &str)> = split.headers.iter().collect();
    assert_eq!(headers, vec![("X-A", "1"), ("X-B", "2")]);
    assert_eq!(decode(&split.body), "var s='a\nb';");
}

#[test]
fn test_split_other_line_boundaries() {
    let raw = "GET / HTTP/1.1\x0bA: 1\x1cB: 2\x1dC: 3\x1eD: 4\u{85}E: 5\u{2029}\u{2029}x";
    let split = split_http_message(&encode(raw)).unwrap();
    assert_eq!(split.headers.len(), 5);
    assert_eq!(split.headers.get("E"), Some("5"));
    assert_eq!(decode(&split.body), "x");
}

#[test]
fn test_split_drops_non_alphabet_characters() {
    let encoded = encode("GET / HTTP/1.1\r\nHost: a\r\n\r\nbody");
    let noisy: String = encoded
        .chars()
        .enumerate()
        .flat_map(|(i, c)| if i % 5 == 0 { vec!['*', c] } else { vec![c] })
        .collect();
    let split = split_http_message(&noisy).unwrap();
    assert_eq!(split.headers.get("Host"), Some("a"));
    assert_eq!(decode(&split.body), "body");
}

#[test]
fn test_split_accepts_trailing_bits() {
    // "SGk=" is canonical for "Hi"; "SGl=" sets unused low bits
    let split = split_http_message("SGl=").unwrap();
    assert!(split.headers.is_empty());
    assert_eq!(split.body, "");
}

#[test]
fn test_split_ignores_whitespace_in_encoding() {
    let encoded = encode("GET / HTTP/1.1\r\nHost: a\r\n\r\n");
    let (head, tail) = encoded.split_at(8);
    let wrapped = format!("{}\n  {}\n", head, tail);
    let split = split_http_message(&wrapped).unwrap();
    assert_eq!(split.headers.get("Host"), Some("a"));
}

#[test]
fn test_split_empty_input() {
    let split = split_http_message("").unwrap();
    assert!(split.headers.is_empty());
    assert_eq!(split.body, "");
}

#[test]
fn test_split_invalid_base64_fails() {
    assert!(matches!(
        split_http_message("not base64!!"),
        Err(crate::error_handling::DecodeFailure::Base64(_))
    ));
}

#[test]
fn test_split_invalid_utf8_fails() {
    let encoded = STANDARD.encode([0x47u8, 0x45, 0x54, 0xff, 0xfe]);
    assert!(matches!(
        split_http_message(&encoded),
        Err(crate::error_handling::DecodeFailure::Utf8(_))
    ));
}

const END_TO_END_REQUEST: &str = "GET / HTTP/1.1\r\nHost: example.com\r\n\r\n";

fn single_item_document() -> String {
    format!(
        r#"<?xml version="1.0"?>
<items burpVersion="2024.1" exportTime="Mon Jan 01 00:00:00 UTC 2024">
  <item>
    <host ip="10.0.0.1">example.com</host>
    <method>GET</method>
    <request base64="true">{}</request>
  </item>
</items>"#,
        encode(END_TO_END_REQUEST)
    )
}

#[test]
fn test_normalize_end_to_end_item() {
    let doc = normalize(&single_item_document()).unwrap();
    assert_eq!(doc.burp_version, "2024.1");
    assert_eq!(doc.export_time, "Mon Jan 01 00:00:00 UTC 2024");
    assert_eq!(doc.items.len(), 1);

    let item = &doc.items[0];
    let host = item.host.as_ref().unwrap();
    assert_eq!(host.value, "example.com");
    assert_eq!(host.ip, "10.0.0.1");
    assert_eq!(item.method.as_deref(), Some("GET"));

    let request = item.request.as_ref().unwrap();
    assert_eq!(request.value, "");
    assert_eq!(request.base64, "true");

    let headers = item.request_headers.as_ref().unwrap();
    assert_eq!(headers.len(), 1);
    assert_eq!(headers.get("Host"), Some("example.com"));

    assert!(item.response.is_none());
    assert!(item.response_headers.is_none());
}

#[test]
fn test_normalize_invalid_request_degrades_to_empty() {
    let xml = r#"<items><item>
        <url>http://a/</url>
        <request base64="true">%%%not-base64%%%</request>
    </item></items>"#;
    let doc = normalize(xml).unwrap();
    let item = &doc.items[0];
    let request = item.request.as_ref().unwrap();
    assert_eq!(request.value, "");
    assert_eq!(request.base64, "true");
    assert_eq!(item.request_headers.as_ref().map(|h| h.len()), Some(0));
    assert_eq!(item.url.as_deref(), Some("http://a/"));
}

#[test]
fn test_normalize_metadata_defaults_to_empty() {
    let doc = normalize("<items><item><method>GET</method></item></items>").unwrap();
    assert_eq!(doc.burp_version, "");
    assert_eq!(doc.export_time, "");
    assert_eq!(doc.items.len(), 1);
}

#[test]
fn test_normalize_no_items() {
    let doc = normalize(r#"<items burpVersion="1"/>"#).unwrap();
    assert!(doc.items.is_empty());
    assert_eq!(doc.burp_version, "1");
}

#[test]
fn test_normalize_preserves_document_order() {
    let xml = r#"<items>
        <item><url>http://a/1</url></item>
        <other><url>http://ignored/</url></other>
        <item><url>http://a/2</url></item>
        <item><url>http://a/3</url></item>
    </items>"#;
    let doc = normalize(xml).unwrap();
    let urls: Vec<&str> = doc
        .items
        .iter()
        .map(|i| i.url.as_deref().unwrap())
        .collect();
    assert_eq!(urls, vec!["http://a/1", "http://a/2", "http://a/3"]);
}

#[test]
fn test_normalize_element_order_does_not_matter() {
    let a = normalize(
        r#"<items><item><method>GET</method><host ip="1.1.1.1">h</host><status>200</status></item></items>"#,
    )
    .unwrap();
    let b = normalize(
        r#"<items><item><status>200</status><method>GET</method><host ip="1.1.1.1">h</host></item></items>"#,
    )
    .unwrap();
    assert_eq!(a, b);
}

#[test]
fn test_normalize_defaults_for_missing_attributes_and_text() {
    let xml = r#"<items><item>
        <host>example.com</host>
        <comment/>
        <response></response>
        <highlight>red</highlight>
    </item></items>"#;
    let doc = normalize(xml).unwrap();
    let item = &doc.items[0];
    assert_eq!(item.host.as_ref().unwrap().ip, "");
    assert_eq!(item.comment.as_deref(), Some(""));
    let response = item.response.as_ref().unwrap();
    assert_eq!(response.base64, "false");
    assert_eq!(response.value, "");
    assert!(item.response_headers.as_ref().unwrap().is_empty());
    assert_eq!(item.extra.get("highlight").map(String::as_str), Some("red"));
}

#[test]
fn test_normalize_cdata_and_doctype() {
    let xml = format!(
        r#"<?xml version="1.0"?>
<!DOCTYPE items [
<!ELEMENT items (item*)>
<!ATTLIST items burpVersion CDATA "">
]>
<items burpVersion="2023.10">
  <item>
    <url><![CDATA[https://example.com/?q=<x>]]></url>
    <response base64="true"><![CDATA[{}]]></response>
  </item>
</items>"#,
        encode("HTTP/1.1 404 Not Found\r\nServer: nginx\r\n\r\nmissing")
    );
    let doc = normalize(&xml).unwrap();
    let item = &doc.items[0];
    assert_eq!(item.url.as_deref(), Some("https://example.com/?q=<x>"));
    assert_eq!(
        item.response_headers.as_ref().unwrap().get("Server"),
        Some("nginx")
    );
    assert_eq!(decode(&item.response.as_ref().unwrap().value), "missing");
}

#[test]
fn test_normalize_malformed_xml_is_structural_error() {
    let result = normalize("<items><item><url>x</item></items>");
    assert!(matches!(
        result,
        Err(crate::error_handling::StructuralError::Xml(_))
    ));
}

#[tokio::test]
async fn test_normalize_file_missing_path() {
    let result = normalize_file(std::path::Path::new("/nonexistent/export.xml")).await;
    match result {
        Err(crate::error_handling::StructuralError::Io { path, .. }) => {
            assert!(path.contains("export.xml"))
        }
        other => panic!("expected Io error, got {:?}", other),
    }
}

#[test]
fn test_normalized_json_shape() {
    let doc = normalize(&single_item_document()).unwrap();
    let value = serde_json::to_value(&doc).unwrap();
    assert_eq!(
        value,
        serde_json::json!({
            "items": [{
                "host": {"value": "example.com", "ip": "10.0.0.1"},
                "method": "GET",
                "request": {"value": "", "base64": "true"},
                "request_headers": {"Host": "example.com"}
            }],
            "burpVersion": "2024.1",
            "exportTime": "Mon Jan 01 00:00:00 UTC 2024"
        })
    );
}
