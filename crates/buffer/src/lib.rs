//! Text model for brailledit.
//!
//! Holds the single character stream shared by the braille and ASCII views,
//! the reversible change journal behind undo/redo, and the rewrap pass that
//! reflows long lines to the embossing width.

mod buffer;
mod error;
mod history;
mod text;
mod wrap;

pub use buffer::TextBuffer;
pub use error::BufferError;
pub use history::{ChangeJournal, ChangeRecord, EditMode};
pub use text::TextModel;
pub use wrap::rewrap_from;

use std::fmt;
use std::str::FromStr;

/// Sentinel stored as the last character of a line that ends a paragraph.
pub const PARAGRAPH_END: char = '\u{feff}';

/// Line ending type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[allow(clippy::upper_case_acronyms)]
pub enum LineEnding {
    #[default]
    LF, // Unix \n
    CRLF, // Windows \r\n
}

impl LineEnding {
    /// Line separator of the host platform.
    pub fn native() -> Self {
        if cfg!(windows) {
            LineEnding::CRLF
        } else {
            LineEnding::LF
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            LineEnding::LF => "\n",
            LineEnding::CRLF => "\r\n",
        }
    }

    /// Length of the separator in characters.
    pub fn char_len(self) -> usize {
        self.as_str().len()
    }
}

impl fmt::Display for LineEnding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LineEnding::LF => write!(f, "LF"),
            LineEnding::CRLF => write!(f, "CRLF"),
        }
    }
}

impl FromStr for LineEnding {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "native" | "auto" => Ok(LineEnding::native()),
            "lf" | "unix" => Ok(LineEnding::LF),
            "crlf" | "windows" => Ok(LineEnding::CRLF),
            _ => Err(format!("Unknown line ending: {}", s)),
        }
    }
}
