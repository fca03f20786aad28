//! Page layout policy for embossed braille.
//!
//! Holds the cell grid of a page (characters per line, lines per page) and
//! the bell margins, and decides when caret movement crosses a margin.

use thiserror::Error;

/// Default values as constants
pub mod defaults {
    pub const CHARS_PER_LINE: usize = 40;
    pub const LINES_PER_PAGE: usize = 25;
    pub const LINE_MARGIN: usize = 33;
    pub const PAGE_MARGIN: usize = 25;
}

/// Invalid layout values.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum LayoutError {
    #[error("characters per line must be positive")]
    ZeroCharsPerLine,
    #[error("lines per page must be positive")]
    ZeroLinesPerPage,
}

/// Page geometry plus line/page bell margins.
///
/// A margin of `None` is disabled. Margins follow their base value: changing
/// `chars_per_line` or `lines_per_page` keeps the distance between the base
/// and its margin.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LayoutPolicy {
    chars_per_line: usize,
    lines_per_page: usize,
    line_margin: Option<usize>,
    page_margin: Option<usize>,
}

impl LayoutPolicy {
    /// Create policy with explicit values
    pub fn new(
        chars_per_line: usize,
        lines_per_page: usize,
        line_margin: Option<usize>,
        page_margin: Option<usize>,
    ) -> Result<Self, LayoutError> {
        if chars_per_line == 0 {
            return Err(LayoutError::ZeroCharsPerLine);
        }
        if lines_per_page == 0 {
            return Err(LayoutError::ZeroLinesPerPage);
        }
        Ok(Self {
            chars_per_line,
            lines_per_page,
            line_margin,
            page_margin,
        })
    }

    pub fn chars_per_line(&self) -> usize {
        self.chars_per_line
    }

    pub fn lines_per_page(&self) -> usize {
        self.lines_per_page
    }

    /// Column at which the line bell rings, if enabled
    pub fn line_margin(&self) -> Option<usize> {
        self.line_margin
    }

    /// Line at which the page bell is aimed, if enabled
    pub fn page_margin(&self) -> Option<usize> {
        self.page_margin
    }

    /// Set characters per line, moving the line margin along.
    ///
    /// Existing lines are not reformatted.
    pub fn set_chars_per_line(&mut self, chars_per_line: usize) -> Result<(), LayoutError> {
        if chars_per_line == 0 {
            return Err(LayoutError::ZeroCharsPerLine);
        }
        self.line_margin = shift_margin(self.line_margin, self.chars_per_line, chars_per_line);
        self.chars_per_line = chars_per_line;
        Ok(())
    }

    /// Set lines per page, moving the page margin along.
    pub fn set_lines_per_page(&mut self, lines_per_page: usize) -> Result<(), LayoutError> {
        if lines_per_page == 0 {
            return Err(LayoutError::ZeroLinesPerPage);
        }
        self.page_margin = shift_margin(self.page_margin, self.lines_per_page, lines_per_page);
        self.lines_per_page = lines_per_page;
        Ok(())
    }

    pub fn set_line_margin(&mut self, margin: Option<usize>) {
        self.line_margin = margin;
    }

    pub fn set_page_margin(&mut self, margin: Option<usize>) {
        self.page_margin = margin;
    }

    /// Whether line `index` starts a page
    pub fn is_first_line_of_page(&self, index: usize) -> bool {
        index % self.lines_per_page == 0
    }

    /// Zero-based page holding line `index`
    pub fn page_of_line(&self, index: usize) -> usize {
        index / self.lines_per_page
    }

    /// Number of pages needed for `line_count` lines (at least one)
    pub fn page_count(&self, line_count: usize) -> usize {
        line_count.div_ceil(self.lines_per_page).max(1)
    }

    /// Line bell: the caret advanced by exactly one and landed on the margin column.
    pub fn margin_signal(&self, prev_offset: usize, new_offset: usize, line_start: usize) -> bool {
        let Some(margin) = self.line_margin.filter(|&m| m > 0) else {
            return false;
        };
        prev_offset.checked_add(1) == Some(new_offset)
            && new_offset.checked_sub(line_start) == Some(margin)
    }

    /// Page bell, evaluated on line-terminating input only.
    ///
    /// `prev_line` is the caret line at the previous line-terminating input;
    /// the bell rings when the caret moved down exactly one line since then
    /// and sits two lines before the page margin. The margin is compared
    /// with the absolute line index, so only the first page rings.
    pub fn page_signal(&self, prev_line: usize, new_line: usize) -> bool {
        let Some(target) = self.page_margin.and_then(|m| m.checked_sub(2)) else {
            return false;
        };
        prev_line.checked_add(1) == Some(new_line) && new_line == target
    }
}

impl Default for LayoutPolicy {
    fn default() -> Self {
        Self {
            chars_per_line: defaults::CHARS_PER_LINE,
            lines_per_page: defaults::LINES_PER_PAGE,
            line_margin: Some(defaults::LINE_MARGIN),
            page_margin: Some(defaults::PAGE_MARGIN),
        }
    }
}

fn shift_margin(margin: Option<usize>, old_base: usize, new_base: usize) -> Option<usize> {
    margin.map(|m| {
        let distance = old_base as i64 - m as i64;
        (new_base as i64 - distance).max(0) as usize
    })
}
