//! Native brailledit format.
//!
//! ```text
//! Chars Per Line:  40
//! Lines Per Page:  25
//! <line><EOL>
//! <line>¶<EOL>
//! ```
//!
//! A line ending a paragraph carries a trailing 0xB6 byte.

use std::io::{Read, Write};

use brailledit_buffer::{LineEnding, TextModel, PARAGRAPH_END};
use brailledit_layout::LayoutPolicy;

use crate::{decode_bytes, encode_line, CodecError, DecodedDocument};

pub const CHARS_PER_LINE_LABEL: &str = "Chars Per Line:  ";
pub const LINES_PER_PAGE_LABEL: &str = "Lines Per Page:  ";

/// Width of each header label; the value follows it
const LABEL_WIDTH: usize = 17;

/// On-disk paragraph-end byte (pilcrow)
pub const PARAGRAPH_BYTE: u8 = 0xb6;

/// Read a BZY stream.
///
/// Text lines are joined with `line_ending`; the format does not record one.
pub fn read<R: Read>(mut reader: R, line_ending: LineEnding) -> Result<DecodedDocument, CodecError> {
    let mut bytes = Vec::new();
    reader.read_to_end(&mut bytes)?;
    let content: String = decode_bytes(&bytes).collect();
    let mut lines = split_lines(&content).into_iter();

    let chars_per_line = parse_header(lines.next(), CHARS_PER_LINE_LABEL, 1)?;
    let lines_per_page = parse_header(lines.next(), LINES_PER_PAGE_LABEL, 2)?;

    let mut text = String::with_capacity(content.len());
    for (i, line) in lines.enumerate() {
        if i > 0 {
            text.push_str(line_ending.as_str());
        }
        match line.strip_suffix(PARAGRAPH_BYTE as char) {
            Some(stripped) => {
                text.push_str(stripped);
                text.push(PARAGRAPH_END);
            }
            None => text.push_str(line),
        }
    }

    log::debug!(
        "Read BZY: {} chars, {} chars per line, {} lines per page",
        text.chars().count(),
        chars_per_line,
        lines_per_page
    );

    Ok(DecodedDocument {
        text,
        line_ending,
        chars_per_line: Some(chars_per_line),
        lines_per_page: Some(lines_per_page),
    })
}

/// Write a document as BZY: header, then every line followed by `line_ending`.
pub fn write<W: Write>(
    mut writer: W,
    model: &TextModel,
    layout: &LayoutPolicy,
    line_ending: LineEnding,
) -> Result<(), CodecError> {
    let eol = line_ending.as_str();
    write!(
        writer,
        "{}{}{}{}{}{}",
        CHARS_PER_LINE_LABEL,
        layout.chars_per_line(),
        eol,
        LINES_PER_PAGE_LABEL,
        layout.lines_per_page(),
        eol
    )?;

    for index in 0..model.line_count() {
        let content = model.line(index).unwrap_or_default();
        let (bytes, paragraph_end) = encode_line(&content, index)?;
        writer.write_all(&bytes)?;
        if paragraph_end {
            writer.write_all(&[PARAGRAPH_BYTE])?;
        }
        writer.write_all(eol.as_bytes())?;
    }

    writer.flush()?;
    Ok(())
}

fn parse_header(line: Option<&str>, label: &str, line_no: usize) -> Result<usize, CodecError> {
    let name = label.trim_end().trim_end_matches(':');
    let format_error = |message: String| CodecError::Format {
        line: line_no,
        message,
    };

    let line = line.ok_or_else(|| format_error(format!("missing {} header", name)))?;
    if line.chars().count() < LABEL_WIDTH {
        return Err(format_error(format!("{} header is too short", name)));
    }
    if !line.starts_with(label.trim_end()) {
        log::warn!("BZY header line {} does not start with {:?}", line_no, name);
    }

    let value: String = line.chars().skip(LABEL_WIDTH).collect();
    match value.parse::<usize>() {
        Ok(0) => Err(format_error(format!("{} must be positive", name))),
        Ok(n) => Ok(n),
        Err(_) => Err(format_error(format!("invalid {} value {:?}", name, value))),
    }
}

/// Split on `\n`, `\r\n` or `\r`. A final line without terminator is kept
/// only when non-empty.
fn split_lines(content: &str) -> Vec<&str> {
    let mut lines = Vec::new();
    let bytes = content.as_bytes();
    let mut start = 0;
    let mut i = 0;

    while i < bytes.len() {
        match bytes[i] {
            b'\n' => {
                lines.push(&content[start..i]);
                start = i + 1;
            }
            b'\r' => {
                lines.push(&content[start..i]);
                if bytes.get(i + 1) == Some(&b'\n') {
                    i += 1;
                }
                start = i + 1;
            }
            _ => {}
        }
        i += 1;
    }
    if start < bytes.len() {
        lines.push(&content[start..]);
    }
    lines
}
