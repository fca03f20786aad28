use ropey::Rope;

use crate::{BufferError, PARAGRAPH_END};

/// Character sequence shared by both views, with a derived line index.
///
/// Offsets are char indices into the whole text. Lines are split on `\n`,
/// `\r\n` and a lone `\r`; [`TextModel::line`] returns content without the
/// delimiter. There is always at least one line.
#[derive(Debug, Clone, Default)]
pub struct TextModel {
    rope: Rope,
}

impl TextModel {
    /// Create an empty model
    pub fn new() -> Self {
        Self { rope: Rope::new() }
    }

    /// Create model holding `text`
    pub fn from_text(text: &str) -> Self {
        Self {
            rope: Rope::from_str(text),
        }
    }

    /// Get all text
    pub fn text(&self) -> String {
        self.rope.to_string()
    }

    /// Total number of characters
    pub fn char_count(&self) -> usize {
        self.rope.len_chars()
    }

    /// Get line count
    pub fn line_count(&self) -> usize {
        self.rope.len_lines()
    }

    /// Get line content (without delimiter) by index
    pub fn line(&self, index: usize) -> Option<String> {
        if index >= self.line_count() {
            return None;
        }
        let line = self.rope.line(index);
        let content_len = line.len_chars() - Self::delimiter_of(&line);
        Some(line.slice(..content_len).to_string())
    }

    /// Line length in characters, excluding the delimiter
    pub fn line_len(&self, index: usize) -> Result<usize, BufferError> {
        self.check_line(index)?;
        let line = self.rope.line(index);
        Ok(line.len_chars() - Self::delimiter_of(&line))
    }

    /// Length of the delimiter ending line `index` (0 for the last line)
    pub fn delimiter_len(&self, index: usize) -> Result<usize, BufferError> {
        self.check_line(index)?;
        Ok(Self::delimiter_of(&self.rope.line(index)))
    }

    /// Whether line `index` ends with the paragraph-end marker
    pub fn has_paragraph_end(&self, index: usize) -> bool {
        match self.line_len(index) {
            Ok(len) if len > 0 => self.rope.line(index).char(len - 1) == PARAGRAPH_END,
            _ => false,
        }
    }

    /// Offset of the first character of line `index`
    pub fn offset_at_line(&self, index: usize) -> Result<usize, BufferError> {
        self.check_line(index)?;
        Ok(self.rope.line_to_char(index))
    }

    /// Index of the line containing `offset` (the end of text belongs to the last line)
    pub fn line_at_offset(&self, offset: usize) -> Result<usize, BufferError> {
        if offset > self.char_count() {
            return Err(self.out_of_range(offset, 0));
        }
        Ok(self.rope.char_to_line(offset))
    }

    /// Copy `len` characters starting at `start`
    pub fn slice(&self, start: usize, len: usize) -> Result<String, BufferError> {
        let end = self.checked_end(start, len)?;
        Ok(self.rope.slice(start..end).to_string())
    }

    /// Remove `len` characters at `start` and insert `text` in their place.
    ///
    /// Returns the removed text.
    pub fn replace_range(
        &mut self,
        start: usize,
        len: usize,
        text: &str,
    ) -> Result<String, BufferError> {
        let end = self.checked_end(start, len)?;
        let removed = self.rope.slice(start..end).to_string();
        if end > start {
            self.rope.remove(start..end);
        }
        if !text.is_empty() {
            self.rope.insert(start, text);
        }
        Ok(removed)
    }

    /// Replace the whole text
    pub fn set_text(&mut self, text: &str) {
        self.rope = Rope::from_str(text);
    }

    fn check_line(&self, index: usize) -> Result<(), BufferError> {
        if index >= self.line_count() {
            return Err(BufferError::LineOutOfRange {
                line: index,
                line_count: self.line_count(),
            });
        }
        Ok(())
    }

    fn checked_end(&self, start: usize, len: usize) -> Result<usize, BufferError> {
        match start.checked_add(len) {
            Some(end) if end <= self.char_count() => Ok(end),
            _ => Err(self.out_of_range(start, len)),
        }
    }

    fn out_of_range(&self, start: usize, len: usize) -> BufferError {
        BufferError::OutOfRange {
            start,
            len,
            char_count: self.char_count(),
        }
    }

    fn delimiter_of(line: &ropey::RopeSlice) -> usize {
        let len = line.len_chars();
        if len == 0 {
            return 0;
        }
        match line.char(len - 1) {
            '\n' if len >= 2 && line.char(len - 2) == '\r' => 2,
            '\n' | '\r' => 1,
            _ => 0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_model() {
        let model = TextModel::new();
        assert_eq!(model.line_count(), 1);
        assert_eq!(model.char_count(), 0);
        assert_eq!(model.line(0).as_deref(), Some(""));
        assert_eq!(model.line(1), None);
    }

    #[test]
    fn test_lines_without_delimiters() {
        let model = TextModel::from_text("first\r\nsecond\nthird");
        assert_eq!(model.line_count(), 3);
        assert_eq!(model.line(0).unwrap(), "first");
        assert_eq!(model.line(1).unwrap(), "second");
        assert_eq!(model.line(2).unwrap(), "third");
        assert_eq!(model.delimiter_len(0).unwrap(), 2);
        assert_eq!(model.delimiter_len(1).unwrap(), 1);
        assert_eq!(model.delimiter_len(2).unwrap(), 0);
    }

    #[test]
    fn test_trailing_newline_adds_empty_line() {
        let model = TextModel::from_text("abc\n");
        assert_eq!(model.line_count(), 2);
        assert_eq!(model.line(1).unwrap(), "");
    }

    #[test]
    fn test_form_feed_is_not_a_line_break() {
        let model = TextModel::from_text("a\u{c}b");
        assert_eq!(model.line_count(), 1);
    }

    #[test]
    fn test_offsets_and_lines() {
        let model = TextModel::from_text("ab\ncde\nf");
        assert_eq!(model.offset_at_line(0).unwrap(), 0);
        assert_eq!(model.offset_at_line(1).unwrap(), 3);
        assert_eq!(model.offset_at_line(2).unwrap(), 7);
        assert_eq!(model.line_at_offset(4).unwrap(), 1);
        assert_eq!(model.line_at_offset(8).unwrap(), 2);
        assert!(model.offset_at_line(3).is_err());
        assert!(model.line_at_offset(9).is_err());
    }

    #[test]
    fn test_line_queries_reject_missing_line() {
        let model = TextModel::from_text("ab\ncde");
        assert_eq!(model.line_len(1).unwrap(), 3);
        assert_eq!(
            model.line_len(2).unwrap_err(),
            BufferError::LineOutOfRange {
                line: 2,
                line_count: 2
            }
        );
        assert!(model.delimiter_len(5).is_err());
        assert!(!model.has_paragraph_end(5));
    }

    #[test]
    fn test_replace_range_returns_removed() {
        let mut model = TextModel::from_text("hello world");
        let removed = model.replace_range(6, 5, "there").unwrap();
        assert_eq!(removed, "world");
        assert_eq!(model.text(), "hello there");
    }

    #[test]
    fn test_replace_range_out_of_range() {
        let mut model = TextModel::from_text("abc");
        let err = model.replace_range(2, 2, "x").unwrap_err();
        assert_eq!(
            err,
            BufferError::OutOfRange {
                start: 2,
                len: 2,
                char_count: 3
            }
        );
        assert_eq!(model.text(), "abc");
        assert!(model.replace_range(usize::MAX, 2, "").is_err());
    }

    #[test]
    fn test_paragraph_end_detection() {
        let model = TextModel::from_text("para\u{feff}\nnext\n\u{feff}");
        assert!(model.has_paragraph_end(0));
        assert!(!model.has_paragraph_end(1));
        assert!(model.has_paragraph_end(2));
        assert!(!model.has_paragraph_end(7));
    }

    #[test]
    fn test_braille_unicode_counts_as_one_char() {
        let mut model = TextModel::from_text("\u{2801}\u{2803}");
        assert_eq!(model.char_count(), 2);
        model.replace_range(1, 0, "\u{2809}").unwrap();
        assert_eq!(model.slice(1, 1).unwrap(), "\u{2809}");
    }
}
