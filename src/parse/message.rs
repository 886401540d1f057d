//! Raw HTTP message splitting.

use base64::alphabet;
use base64::engine::general_purpose::{GeneralPurpose, GeneralPurposeConfig, STANDARD};
use base64::Engine as _;

use crate::config::HEADER_SEPARATOR;
use crate::error_handling::DecodeFailure;
use crate::models::Headers;

/// Lenient decoder for captured messages: non-zero trailing bits are accepted.
const LENIENT: GeneralPurpose = GeneralPurpose::new(
    &alphabet::STANDARD,
    GeneralPurposeConfig::new().with_decode_allow_trailing_bits(true),
);

/// Headers and re-encoded body of one raw HTTP message.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SplitMessage {
    pub headers: Headers,
    /// Body re-encoded as base64, or empty when the message has no body.
    pub body: String,
}

/// Splits a base64-encoded raw HTTP request or response into headers and body.
///
/// Characters outside the base64 alphabet are dropped before decoding. The
/// first line (request or status line) is always discarded without being
/// parsed. Header lines are split on the first `": "`; lines without it are
/// skipped. The first blank line ends the header block, and every line after
/// it, blank or not, belongs to the body. The body's lines are joined with
/// `\n`, so CRLF line endings come back as LF.
///
/// # Errors
///
/// Returns `DecodeFailure` if the input is not valid base64 or does not decode
/// to UTF-8. Callers treat this as "no headers, no body".
pub fn split_http_message(encoded: &str) -> Result<SplitMessage, DecodeFailure> {
    let compact: String = encoded.chars().filter(|c| is_base64_char(*c)).collect();
    let raw = String::from_utf8(LENIENT.decode(compact.as_bytes())?)?;

    let mut headers = Headers::new();
    let mut body = String::new();
    let mut in_body = false;

    for line in split_lines(&raw).into_iter().skip(1) {
        if in_body {
            body.push_str(line);
            body.push('\n');
        } else if line.trim().is_empty() {
            in_body = true;
        } else if let Some((name, value)) = line.split_once(HEADER_SEPARATOR) {
            headers.insert(name, value);
        }
    }

    if !body.is_empty() {
        body.pop();
        body = STANDARD.encode(body.as_bytes());
    }

    Ok(SplitMessage { headers, body })
}

/// Splits on `\r\n` and on every single-character line boundary: `\n`, `\r`,
/// `\x0b`, `\x0c`, `\x1c`, `\x1d`, `\x1e`, `\u{85}`, `\u{2028}` and `\u{2029}`.
/// A trailing terminator does not produce an extra empty line.
fn split_lines(text: &str) -> Vec<&str> {
    let mut lines = Vec::new();
    let mut rest = text;
    while !rest.is_empty() {
        match rest.find(is_line_break) {
            Some(pos) => {
                lines.push(&rest[..pos]);
                let terminator = if rest[pos..].starts_with("\r\n") {
                    2
                } else {
                    rest[pos..].chars().next().map_or(1, char::len_utf8)
                };
                rest = &rest[pos + terminator..];
            }
            None => {
                lines.push(rest);
                break;
            }
        }
    }
    lines
}

fn is_line_break(c: char) -> bool {
    matches!(
        c,
        '\n' | '\r' | '\x0b' | '\x0c' | '\x1c' | '\x1d' | '\x1e' | '\u{85}' | '\u{2028}' | '\u{2029}'
    )
}

fn is_base64_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || matches!(c, '+' | '/' | '=')
}
