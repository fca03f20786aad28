//! Rewrap of lines that exceed the embossing width.
//!
//! Greedy word wrap: a line is only broken at spaces, and a line that offers
//! no usable space is left too long rather than broken mid-word. Continuation
//! text is merged into the following line unless the line ends a paragraph.

use crate::{BufferError, EditMode, LineEnding, TextBuffer, PARAGRAPH_END};

/// Rewrap lines at and after `first_line` to `chars_per_line`.
///
/// Edits bypass the journal; if anything changed, history is discarded and
/// the buffer stays modified until saved. Returns the number of lines split.
pub fn rewrap_from(
    buffer: &mut TextBuffer,
    first_line: usize,
    chars_per_line: usize,
    line_ending: LineEnding,
) -> Result<usize, BufferError> {
    if chars_per_line == 0 {
        return Ok(0);
    }

    let mut wrapped = 0;
    let mut index = first_line;
    while index < buffer.model().line_count() {
        let line: Vec<char> = buffer
            .model()
            .line(index)
            .unwrap_or_default()
            .chars()
            .collect();

        if line.len() > chars_per_line {
            if let Some((word_end, word_wrap)) = calculate_split(&line, chars_per_line) {
                split_line(buffer, index, &line, word_end, word_wrap, line_ending)?;
                wrapped += 1;
            }
        } else if line.last() == Some(&PARAGRAPH_END) {
            // Paragraph boundary stops propagation
            break;
        }

        index += 1;
    }

    if wrapped > 0 {
        buffer.discard_history();
        log::debug!("Rewrapped {} lines from line {}", wrapped, first_line);
    }
    Ok(wrapped)
}

/// Find where to break an over-long line.
///
/// Returns `(word_end, word_wrap)`: the current line keeps `..word_end`, the
/// continuation starts at `word_wrap`. `None` means the line is left as is.
fn calculate_split(line: &[char], chars_per_line: usize) -> Option<(usize, usize)> {
    let half = chars_per_line / 2;
    let quarter = chars_per_line / 4;

    // Beginning of the word being wrapped
    let word_wrap = if line[chars_per_line] != ' ' {
        let mut wrap = chars_per_line;
        while wrap > half && line[wrap] != ' ' {
            wrap -= 1;
        }
        if wrap == half {
            return None;
        }
        wrap + 1
    } else {
        let mut wrap = chars_per_line;
        while wrap < line.len() && line[wrap] == ' ' {
            wrap += 1;
        }
        if wrap == line.len() {
            return None;
        }
        wrap
    };

    // End of the word before it
    let mut word_end = word_wrap - 1;
    while word_end > quarter && line[word_end] == ' ' {
        word_end -= 1;
    }
    if word_end == quarter {
        return None;
    }

    Some((word_end + 1, word_wrap))
}

fn split_line(
    buffer: &mut TextBuffer,
    index: usize,
    line: &[char],
    word_end: usize,
    word_wrap: usize,
    line_ending: LineEnding,
) -> Result<(), BufferError> {
    let model = buffer.model();
    let start = model.offset_at_line(index)?;
    let is_last = index + 1 >= model.line_count();

    let mut replacement: String = line[..word_end].iter().collect();
    replacement.push_str(line_ending.as_str());
    replacement.extend(&line[word_wrap..]);

    let mut length = line.len();
    if line.last() != Some(&PARAGRAPH_END) && !is_last {
        let next = model.line(index + 1).unwrap_or_default();
        replacement.push(' ');
        replacement.push_str(&next);
        length += model.delimiter_len(index)? + next.chars().count();
    }

    buffer.replace_range(start, length, &replacement, EditMode::NoJournal)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rewrap(text: &str, chars_per_line: usize) -> (String, usize) {
        let mut buffer = TextBuffer::from_text(text);
        let wrapped = rewrap_from(&mut buffer, 0, chars_per_line, LineEnding::LF).unwrap();
        (buffer.text(), wrapped)
    }

    #[test]
    fn test_no_wrap_needed() {
        assert_eq!(rewrap("short line", 40), ("short line".to_string(), 0));
    }

    #[test]
    fn test_wrap_at_space_before_limit() {
        let (text, wrapped) = rewrap("the quick brown fox", 10);
        assert_eq!(text, "the quick\nbrown fox");
        assert_eq!(wrapped, 1);
    }

    #[test]
    fn test_long_word_gives_up() {
        let line = "a".repeat(15);
        assert_eq!(rewrap(&line, 10), (line.clone(), 0));
    }

    #[test]
    fn test_space_in_lower_half_is_ignored() {
        // Only space sits at column 5 == chars_per_line / 2
        let line = "aaaaa bbbbbbbbbbbb";
        assert_eq!(rewrap(line, 10), (line.to_string(), 0));
    }

    #[test]
    fn test_space_exactly_at_limit() {
        let (text, _) = rewrap("abcd efghi jklmn", 10);
        assert_eq!(text, "abcd efghi\njklmn");
    }

    #[test]
    fn test_run_of_spaces_at_limit() {
        let (text, _) = rewrap("abcd efghi    jk", 10);
        assert_eq!(text, "abcd efghi\njk");
    }

    #[test]
    fn test_trailing_spaces_give_up() {
        let line = "abcd efghi     ";
        assert_eq!(rewrap(line, 10), (line.to_string(), 0));
    }

    #[test]
    fn test_continuation_merges_into_next_line() {
        let (text, wrapped) = rewrap("the quick brown\nfox jumps", 10);
        assert_eq!(text, "the quick\nbrown fox\njumps");
        assert_eq!(wrapped, 2);
    }

    #[test]
    fn test_paragraph_end_blocks_merge_and_stops() {
        let (text, wrapped) = rewrap(
            "the quick brown\u{feff}\nfox jumps over the lazy dog",
            10,
        );
        assert_eq!(text, "the quick\nbrown\u{feff}\nfox jumps over the lazy dog");
        assert_eq!(wrapped, 1);
    }

    #[test]
    fn test_empty_lines_are_skipped() {
        let mut buffer = TextBuffer::from_text("\nthe quick brown");
        rewrap_from(&mut buffer, 0, 10, LineEnding::LF).unwrap();
        assert_eq!(buffer.text(), "\nthe quick\nbrown");
    }

    #[test]
    fn test_starts_at_given_line() {
        let mut buffer = TextBuffer::from_text("the quick brown\nthe quick brown");
        rewrap_from(&mut buffer, 1, 10, LineEnding::LF).unwrap();
        assert_eq!(buffer.text(), "the quick brown\nthe quick\nbrown");
    }

    #[test]
    fn test_crlf_delimiter_is_replaced() {
        let mut buffer = TextBuffer::from_text("the quick brown\r\nfox");
        rewrap_from(&mut buffer, 0, 10, LineEnding::CRLF).unwrap();
        assert_eq!(buffer.text(), "the quick\r\nbrown fox");
    }

    #[test]
    fn test_rewrap_discards_history() {
        let mut buffer = TextBuffer::new();
        buffer
            .replace_range(0, 0, "the quick brown", EditMode::Direct)
            .unwrap();
        buffer.mark_saved();
        rewrap_from(&mut buffer, 0, 10, LineEnding::LF).unwrap();
        assert!(!buffer.can_undo());
        assert!(buffer.is_modified());
    }
}
