//! Per-view caret and scroll state.

use std::fmt;

/// The two presentations of one document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ViewKind {
    /// Braille cells, fed by chords
    #[default]
    Braille,
    /// ASCII braille text
    Ascii,
}

impl ViewKind {
    pub fn other(self) -> Self {
        match self {
            ViewKind::Braille => ViewKind::Ascii,
            ViewKind::Ascii => ViewKind::Braille,
        }
    }
}

impl fmt::Display for ViewKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ViewKind::Braille => write!(f, "braille"),
            ViewKind::Ascii => write!(f, "ascii"),
        }
    }
}

/// Caret and viewport of one view over the shared text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ViewState {
    /// Caret offset (chars)
    pub caret: usize,
    /// Caret line at the last line-terminating key
    pub prev_enter_line: usize,
    /// First visible line
    pub top_line: usize,
    /// Lines that fit in the viewport (0 = unknown)
    pub visible_lines: usize,
}

impl ViewState {
    /// Shift the caret for a replace of `removed` chars at `start` by
    /// `inserted` chars. A caret inside the removed range moves to `start`.
    pub(crate) fn adjust_caret(&mut self, start: usize, removed: usize, inserted: usize) {
        if self.caret <= start {
            return;
        }
        self.caret = if self.caret >= start + removed {
            self.caret - removed + inserted
        } else {
            start
        };
    }

    /// Scroll the minimum needed to show `line`
    pub(crate) fn reveal_line(&mut self, line: usize) {
        if line < self.top_line {
            self.top_line = line;
        } else if self.visible_lines > 0 && line >= self.top_line + self.visible_lines {
            self.top_line = line + 1 - self.visible_lines;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn view_at(caret: usize) -> ViewState {
        ViewState {
            caret,
            ..Default::default()
        }
    }

    #[test]
    fn test_caret_before_edit_stays() {
        let mut view = view_at(3);
        view.adjust_caret(3, 2, 5);
        assert_eq!(view.caret, 3);
    }

    #[test]
    fn test_caret_after_edit_shifts() {
        let mut view = view_at(10);
        view.adjust_caret(3, 2, 5);
        assert_eq!(view.caret, 13);
        view.adjust_caret(0, 4, 0);
        assert_eq!(view.caret, 9);
    }

    #[test]
    fn test_caret_inside_removed_range() {
        let mut view = view_at(4);
        view.adjust_caret(3, 3, 1);
        assert_eq!(view.caret, 3);
    }

    #[test]
    fn test_reveal_line() {
        let mut view = ViewState {
            top_line: 10,
            visible_lines: 5,
            ..Default::default()
        };
        view.reveal_line(12);
        assert_eq!(view.top_line, 10);
        view.reveal_line(16);
        assert_eq!(view.top_line, 12);
        view.reveal_line(3);
        assert_eq!(view.top_line, 3);
    }

    #[test]
    fn test_other_view() {
        assert_eq!(ViewKind::Braille.other(), ViewKind::Ascii);
        assert_eq!(ViewKind::Ascii.other(), ViewKind::Braille);
    }
}
