//! File formats for brailledit documents.
//!
//! Two formats are supported:
//! - **BRF**: plain braille-ready text, pages separated by form-feeds.
//! - **BZY**: native format, a layout header followed by the text with an
//!   explicit paragraph-end byte.
//!
//! Both are byte formats where each byte is one character (ISO-8859-1).
//! Decoders parse the whole stream before returning, so nothing is committed
//! to a document when a read fails.

pub mod brf;
pub mod bzy;

use std::fmt;
use std::io::{Read, Write};
use std::path::Path;
use std::str::FromStr;

use brailledit_buffer::{LineEnding, TextModel, PARAGRAPH_END};
use brailledit_layout::LayoutPolicy;
use thiserror::Error;

/// Codec errors.
#[derive(Debug, Error)]
pub enum CodecError {
    /// Underlying stream failed
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Stream does not follow the format
    #[error("line {line}: {message}")]
    Format { line: usize, message: String },

    /// Character outside the single-byte range
    #[error("line {line}: character {ch:?} cannot be stored in a braille file")]
    Unencodable { ch: char, line: usize },
}

/// Result of decoding a file; fields left `None` were not present in the file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DecodedDocument {
    pub text: String,
    pub line_ending: LineEnding,
    pub chars_per_line: Option<usize>,
    pub lines_per_page: Option<usize>,
}

/// Supported file formats
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileFormat {
    Brf,
    Bzy,
}

impl FileFormat {
    /// Detect format from the file extension (case-insensitive)
    pub fn from_path(path: &Path) -> Option<Self> {
        path.extension()
            .and_then(|ext| ext.to_str())
            .and_then(|ext| ext.parse().ok())
    }

    pub fn extension(self) -> &'static str {
        match self {
            FileFormat::Brf => "brf",
            FileFormat::Bzy => "bzy",
        }
    }

    /// Decode a stream. `native_line_ending` is used by formats that do not
    /// carry their own.
    pub fn read<R: Read>(
        self,
        reader: R,
        native_line_ending: LineEnding,
    ) -> Result<DecodedDocument, CodecError> {
        match self {
            FileFormat::Brf => brf::read(reader),
            FileFormat::Bzy => bzy::read(reader, native_line_ending),
        }
    }

    /// Encode a document
    pub fn write<W: Write>(
        self,
        writer: W,
        model: &TextModel,
        layout: &LayoutPolicy,
        line_ending: LineEnding,
    ) -> Result<(), CodecError> {
        match self {
            FileFormat::Brf => brf::write(writer, model, layout, line_ending),
            FileFormat::Bzy => bzy::write(writer, model, layout, line_ending),
        }
    }
}

impl FromStr for FileFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "brf" => Ok(FileFormat::Brf),
            "bzy" => Ok(FileFormat::Bzy),
            _ => Err(format!("Unknown file format: {}", s)),
        }
    }
}

impl fmt::Display for FileFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FileFormat::Brf => write!(f, "BRF"),
            FileFormat::Bzy => write!(f, "BZY"),
        }
    }
}

/// Decode single-byte text
pub(crate) fn decode_bytes(bytes: &[u8]) -> impl Iterator<Item = char> + '_ {
    bytes.iter().map(|&b| b as char)
}

/// Encode line content as single bytes, dropping a trailing paragraph-end
/// marker. Returns the bytes and whether the marker was present.
pub(crate) fn encode_line(content: &str, line: usize) -> Result<(Vec<u8>, bool), CodecError> {
    let (content, paragraph_end) = match content.strip_suffix(PARAGRAPH_END) {
        Some(stripped) => (stripped, true),
        None => (content, false),
    };

    let mut bytes = Vec::with_capacity(content.len());
    for ch in content.chars() {
        let byte = u8::try_from(u32::from(ch))
            .map_err(|_| CodecError::Unencodable { ch, line: line + 1 })?;
        bytes.push(byte);
    }
    Ok((bytes, paragraph_end))
}
