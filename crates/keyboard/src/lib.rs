//! Braille keyboard input.
//!
//! Decodes six-key chords into braille cells and filters direct typing while
//! braille entry is active, so plain letters cannot compete with chords.

mod cell;
mod chord;

pub use cell::{ascii_to_unicode, BrailleCell, ASCII_BRAILLE};
pub use chord::{ChordDecoder, ChordKeys, ReleaseModel, DEFAULT_CHORD_KEYS};

use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyModifiers};

/// Whether a keystroke must be suppressed while braille entry is active.
///
/// Printable ASCII above space is blocked; space, control keys and
/// Ctrl/Alt shortcuts pass through.
pub fn blocks_direct_entry(key: &KeyEvent) -> bool {
    if key.kind == KeyEventKind::Release
        || key
            .modifiers
            .intersects(KeyModifiers::CONTROL | KeyModifiers::ALT)
    {
        return false;
    }
    matches!(key.code, KeyCode::Char(ch) if ch > ' ' && ch < '\u{7f}')
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_printable_ascii_blocked() {
        let key = KeyEvent::new(KeyCode::Char('f'), KeyModifiers::NONE);
        assert!(blocks_direct_entry(&key));
        let key = KeyEvent::new(KeyCode::Char('~'), KeyModifiers::SHIFT);
        assert!(blocks_direct_entry(&key));
    }

    #[test]
    fn test_space_and_control_keys_pass() {
        let key = KeyEvent::new(KeyCode::Char(' '), KeyModifiers::NONE);
        assert!(!blocks_direct_entry(&key));
        let key = KeyEvent::new(KeyCode::Enter, KeyModifiers::NONE);
        assert!(!blocks_direct_entry(&key));
        let key = KeyEvent::new(KeyCode::Backspace, KeyModifiers::NONE);
        assert!(!blocks_direct_entry(&key));
    }

    #[test]
    fn test_shortcuts_pass() {
        let key = KeyEvent::new(KeyCode::Char('z'), KeyModifiers::CONTROL);
        assert!(!blocks_direct_entry(&key));
    }

    #[test]
    fn test_non_ascii_passes() {
        let key = KeyEvent::new(KeyCode::Char('й'), KeyModifiers::NONE);
        assert!(!blocks_direct_entry(&key));
    }
}
