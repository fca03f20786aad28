//! Line data for rendering collaborators.

use brailledit_keyboard::ascii_to_unicode;

/// One line prepared for display.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LineInfo {
    pub index: usize,
    /// Content without delimiter or paragraph-end marker
    pub text: String,
    /// Line starts a new embossed page
    pub page_start: bool,
    /// Line ends a paragraph
    pub paragraph_end: bool,
}

impl LineInfo {
    /// Content as Unicode braille cells, for the braille view
    pub fn braille(&self) -> String {
        ascii_to_unicode(&self.text)
    }

    /// Width in cells
    pub fn width(&self) -> usize {
        self.text.chars().count()
    }
}
