//! Delimited table input and output.
//!
//! - [`decode_input`] turns raw bytes into text using detected encoding
//! - [`sniff`] infers the dialect from the first lines
//! - [`reader`] yields header-keyed rows
//! - [`writer`] emits canonical comma-delimited output

pub mod reader;
pub mod sniff;
pub mod writer;

use std::io::Cursor;

pub use reader::{Row, Rows, TableReader};
pub use sniff::{read_head, sniff_format, Dialect, SNIFF_LINES};
pub use writer::write_table;

const UTF8_BOM: &[u8] = b"\xEF\xBB\xBF";

/// Text decoded from the raw input, ready to be sniffed and parsed.
#[derive(Debug, Clone)]
pub struct DecodedInput {
    /// Decoded contents without a byte order mark.
    pub text: String,
    /// Name of the encoding used for decoding.
    pub encoding: &'static str,
}

impl DecodedInput {
    /// Seekable reader over the decoded text.
    pub fn into_cursor(self) -> Cursor<String> {
        Cursor::new(self.text)
    }
}

/// Detect the encoding of raw bytes using chardet.
pub fn detect_encoding(bytes: &[u8]) -> String {
    let charset = chardet::detect(bytes).0;

    // Normalize charset names
    match charset.to_lowercase().as_str() {
        "" | "ascii" | "utf-8" | "utf8" | "utf-8-sig" => "utf-8".to_string(),
        "iso-8859-1" | "iso-8859-15" | "latin-1" | "latin1" => "iso-8859-1".to_string(),
        "windows-1252" | "cp1252" => "windows-1252".to_string(),
        other => other.to_string(),
    }
}

/// Decode bytes with the encoding named by `label`.
///
/// Unknown labels fall back to UTF-8. A byte order mark overrides the label
/// and is stripped; malformed sequences become U+FFFD.
pub fn decode_content(bytes: &[u8], label: &str) -> DecodedInput {
    let encoding =
        encoding_rs::Encoding::for_label(label.as_bytes()).unwrap_or(encoding_rs::UTF_8);
    let (text, used, had_errors) = encoding.decode(bytes);
    if had_errors {
        tracing::warn!(encoding = used.name(), "input contains malformed byte sequences");
    }
    DecodedInput {
        text: text.into_owned(),
        encoding: used.name(),
    }
}

/// Decode `bytes`, detecting the encoding only when they are not UTF-8.
pub fn decode_input(bytes: &[u8]) -> DecodedInput {
    let body = bytes.strip_prefix(UTF8_BOM).unwrap_or(bytes);
    if let Ok(text) = std::str::from_utf8(body) {
        return DecodedInput {
            text: text.to_string(),
            encoding: encoding_rs::UTF_8.name(),
        };
    }
    let label = match detect_encoding(bytes).as_str() {
        // already known not to be UTF-8
        "utf-8" => "windows-1252".to_string(),
        other => other.to_string(),
    };
    decode_content(bytes, &label)
}
