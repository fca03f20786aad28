//! Keyboard command handling for the document.
//!
//! Separates "what key was pressed" from "what edit to perform". Chord keys
//! never reach this mapping while braille entry is active.

use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyModifiers};

/// Edit command representing a user action.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EditCommand {
    // Caret movement
    MoveLeft,
    MoveRight,
    MoveUp,
    MoveDown,
    MoveLineStart,
    MoveLineEnd,
    MoveDocumentStart,
    MoveDocumentEnd,

    // Text editing
    InsertChar(char),
    InsertNewline,
    Backspace,
    Delete,
    ToggleParagraphEnd,

    // Undo/Redo
    Undo,
    Redo,

    /// Rewrap from the caret line
    Rewrap,

    /// Switch editing between the braille and ASCII views
    SwitchView,

    // No operation (for unhandled keys)
    None,
}

impl EditCommand {
    /// Parse a key press into a command. Releases map to [`EditCommand::None`].
    pub fn from_key_event(key: &KeyEvent) -> Self {
        if key.kind == KeyEventKind::Release {
            return Self::None;
        }

        match (key.code, key.modifiers) {
            (KeyCode::Left, KeyModifiers::NONE) => Self::MoveLeft,
            (KeyCode::Right, KeyModifiers::NONE) => Self::MoveRight,
            (KeyCode::Up, KeyModifiers::NONE) => Self::MoveUp,
            (KeyCode::Down, KeyModifiers::NONE) => Self::MoveDown,
            (KeyCode::Home, KeyModifiers::NONE) => Self::MoveLineStart,
            (KeyCode::End, KeyModifiers::NONE) => Self::MoveLineEnd,
            (KeyCode::Home, KeyModifiers::CONTROL) => Self::MoveDocumentStart,
            (KeyCode::End, KeyModifiers::CONTROL) => Self::MoveDocumentEnd,

            (KeyCode::Enter, KeyModifiers::SHIFT) => Self::ToggleParagraphEnd,
            (KeyCode::Enter, KeyModifiers::NONE) => Self::InsertNewline,
            (KeyCode::Backspace, KeyModifiers::NONE) => Self::Backspace,
            (KeyCode::Delete, KeyModifiers::NONE) => Self::Delete,

            // Ctrl+Z / Ctrl+Y - undo / redo
            (KeyCode::Char('z'), KeyModifiers::CONTROL) => Self::Undo,
            (KeyCode::Char('y'), KeyModifiers::CONTROL) => Self::Redo,

            // Ctrl+R - rewrap from caret
            (KeyCode::Char('r'), KeyModifiers::CONTROL) => Self::Rewrap,

            (KeyCode::Tab, KeyModifiers::NONE) => Self::SwitchView,

            (KeyCode::Char(ch), KeyModifiers::NONE | KeyModifiers::SHIFT) => Self::InsertChar(ch),

            _ => Self::None,
        }
    }
}
