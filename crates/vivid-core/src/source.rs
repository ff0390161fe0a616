//! Text sources for the parser: byte buffers, readers and files.
//!
//! Everything funnels into "decode to UTF-8 text, then [`parse_with`]".
//! Network resources are plain readers here; fetching them is the caller's
//! business.

use std::fs::File;
use std::io::Read;
use std::path::Path;

use crate::error::{JsonError, Result};
use crate::parser::{parse_with, ParseOptions};
use crate::value::Json;

const UTF8_BOM: &[u8] = b"\xEF\xBB\xBF";

/// Parse a UTF-8 encoded byte buffer. A leading byte order mark is skipped.
pub fn from_slice(bytes: &[u8]) -> Result<Json> {
    from_slice_with(bytes, ParseOptions::default())
}

pub fn from_slice_with(bytes: &[u8], options: ParseOptions) -> Result<Json> {
    let bytes = bytes.strip_prefix(UTF8_BOM).unwrap_or(bytes);
    let text = std::str::from_utf8(bytes).map_err(|e| {
        let valid = &bytes[..e.valid_up_to()];
        // The prefix is valid UTF-8 by construction.
        let prefix = String::from_utf8_lossy(valid);
        let (line, column) = end_position(&prefix);
        JsonError::parse("invalid UTF-8 in input", line, column)
    })?;
    parse_with(text, options)
}

/// Read a stream to completion and parse it.
pub fn from_reader<R: Read>(reader: R) -> Result<Json> {
    from_reader_with(reader, ParseOptions::default())
}

pub fn from_reader_with<R: Read>(mut reader: R, options: ParseOptions) -> Result<Json> {
    let mut buf = Vec::new();
    reader.read_to_end(&mut buf)?;
    from_slice_with(&buf, options)
}

/// Open a file and parse its contents.
pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Json> {
    from_path_with(path, ParseOptions::default())
}

pub fn from_path_with<P: AsRef<Path>>(path: P, options: ParseOptions) -> Result<Json> {
    let path = path.as_ref();
    tracing::debug!(path = %path.display(), "parsing JSON document from file");
    let file = File::open(path)?;
    from_reader_with(file, options)
}

/// 1-based position just past the end of `text`.
fn end_position(text: &str) -> (usize, usize) {
    let mut line = 1;
    let mut column = 1;
    for c in text.chars() {
        if c == '\n' {
            line += 1;
            column = 1;
        } else {
            column += 1;
        }
    }
    (line, column)
}
