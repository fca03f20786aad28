//! Braille Ready Format.
//!
//! Plain ASCII braille, one text line per embossed line, with a form-feed
//! at the start of every page after the first. Paragraph ends are not stored.

use std::io::{ErrorKind, Read, Write};

use brailledit_buffer::{LineEnding, TextModel};
use brailledit_layout::LayoutPolicy;

use crate::{decode_bytes, encode_line, CodecError, DecodedDocument};

/// Page separator
pub const FORM_FEED: u8 = 0x0c;

const CHUNK_SIZE: usize = 65536;

/// Read a BRF stream.
///
/// Line ending and lines per page are detected from the first chunk; every
/// form-feed is dropped from the text.
pub fn read<R: Read>(mut reader: R) -> Result<DecodedDocument, CodecError> {
    let mut chunk = vec![0u8; CHUNK_SIZE];
    let mut text = String::new();
    let mut detected = None;

    loop {
        let count = fill_chunk(&mut reader, &mut chunk)?;
        if count == 0 {
            break;
        }
        let bytes = &chunk[..count];
        if detected.is_none() {
            detected = Some(detect_layout(bytes));
        }
        text.extend(decode_bytes(bytes).filter(|&ch| ch != FORM_FEED as char));
        if count < CHUNK_SIZE {
            break;
        }
    }

    let (line_ending, lines_per_page) = detected.unwrap_or((LineEnding::LF, None));
    log::debug!(
        "Read BRF: {} chars, {} line endings, lines per page {:?}",
        text.chars().count(),
        line_ending,
        lines_per_page
    );

    Ok(DecodedDocument {
        text,
        line_ending,
        chars_per_line: None,
        lines_per_page,
    })
}

/// Write a document as BRF.
///
/// Each line that starts a page (other than the first) is preceded by a
/// form-feed; trailing paragraph markers are dropped.
pub fn write<W: Write>(
    mut writer: W,
    model: &TextModel,
    layout: &LayoutPolicy,
    line_ending: LineEnding,
) -> Result<(), CodecError> {
    let eol = line_ending.as_str().as_bytes();

    for index in 0..model.line_count() {
        if index > 0 {
            writer.write_all(eol)?;
            if layout.is_first_line_of_page(index) {
                writer.write_all(&[FORM_FEED])?;
            }
        }
        let content = model.line(index).unwrap_or_default();
        let (bytes, _) = encode_line(&content, index)?;
        writer.write_all(&bytes)?;
    }

    writer.flush()?;
    Ok(())
}

/// Fill `buf` from the reader; short only at end of stream.
fn fill_chunk<R: Read>(reader: &mut R, buf: &mut [u8]) -> std::io::Result<usize> {
    let mut filled = 0;
    while filled < buf.len() {
        match reader.read(&mut buf[filled..]) {
            Ok(0) => break,
            Ok(n) => filled += n,
            Err(e) if e.kind() == ErrorKind::Interrupted => continue,
            Err(e) => return Err(e),
        }
    }
    Ok(filled)
}

/// Line ending and lines per page of the first chunk
fn detect_layout(bytes: &[u8]) -> (LineEnding, Option<usize>) {
    let mut line_ending = LineEnding::LF;
    let mut lines = 0;

    for &byte in bytes {
        match byte {
            b'\r' => line_ending = LineEnding::CRLF,
            b'\n' => lines += 1,
            FORM_FEED => return (line_ending, (lines > 0).then_some(lines)),
            _ => {}
        }
    }
    (line_ending, None)
}
