use thiserror::Error;

/// Errors raised by text model operations.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BufferError {
    /// Character range does not fit inside the document.
    #[error("range {start}+{len} is out of bounds (document has {char_count} characters)")]
    OutOfRange {
        start: usize,
        len: usize,
        char_count: usize,
    },

    /// Line index past the last line.
    #[error("line {line} is out of bounds (document has {line_count} lines)")]
    LineOutOfRange { line: usize, line_count: usize },
}
