//! Structured JSON output of a normalized export.
//!
//! The document is written as one pretty-printed JSON object
//! (`items`, `burpVersion`, `exportTime`) with 4-space indentation.

use std::io::{self, ErrorKind, Write};
use std::path::Path;

use anyhow::{Context, Result};
use serde::Serialize;
use serde_json::ser::PrettyFormatter;

use crate::config::JSON_INDENT;
use crate::models::ExportDocument;

/// Wrapper around a Write that ignores broken pipe errors (EPIPE).
/// This allows graceful handling when stdout is piped to a command that exits early.
pub(crate) struct IgnoreBrokenPipe<W: Write> {
    inner: W,
}

impl<W: Write> IgnoreBrokenPipe<W> {
    pub(crate) fn new(inner: W) -> Self {
        Self { inner }
    }
}

impl<W: Write> Write for IgnoreBrokenPipe<W> {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.inner.write(buf).or_else(|e| {
            if e.kind() == ErrorKind::BrokenPipe {
                Ok(buf.len())
            } else {
                Err(e)
            }
        })
    }

    fn flush(&mut self) -> io::Result<()> {
        self.inner.flush().or_else(|e| {
            if e.kind() == ErrorKind::BrokenPipe {
                Ok(())
            } else {
                Err(e)
            }
        })
    }
}

/// Serializes any value as pretty JSON with 4-space indentation.
pub fn write_pretty<T: Serialize, W: Write>(value: &T, writer: W) -> Result<()> {
    let mut serializer =
        serde_json::Serializer::with_formatter(writer, PrettyFormatter::with_indent(JSON_INDENT));
    value
        .serialize(&mut serializer)
        .context("Failed to serialize JSON")?;
    let mut writer = serializer.into_inner();
    writer.write_all(b"\n")?;
    writer.flush()?;
    Ok(())
}

/// Renders the document as a pretty-printed JSON string.
pub fn to_json_string(document: &ExportDocument) -> Result<String> {
    let mut buf = Vec::new();
    write_pretty(document, &mut buf)?;
    Ok(String::from_utf8(buf)?)
}

/// Writes the document to `output`, or to stdout when `output` is `None`.
///
/// Returns the number of items written.
pub fn write_json(document: &ExportDocument, output: Option<&Path>) -> Result<usize> {
    match output {
        Some(path) => {
            let file = std::fs::File::create(path)
                .with_context(|| format!("Failed to create output file: {}", path.display()))?;
            write_pretty(document, io::BufWriter::new(file))?;
        }
        None => write_pretty(document, IgnoreBrokenPipe::new(io::stdout().lock()))?,
    }
    Ok(document.items.len())
}
