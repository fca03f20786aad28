use crate::{BufferError, ChangeJournal, ChangeRecord, EditMode, TextModel};

/// Text model paired with its change journal.
///
/// Every mutation goes through [`TextBuffer::replace_range`], which hands the
/// resulting [`ChangeRecord`] to the journal exactly once; the [`EditMode`]
/// decides whether it is kept.
#[derive(Debug, Clone, Default)]
pub struct TextBuffer {
    model: TextModel,
    journal: ChangeJournal,
}

impl TextBuffer {
    /// Create a new empty buffer
    pub fn new() -> Self {
        Self::default()
    }

    /// Create buffer with a bounded journal (0 = unlimited)
    pub fn with_history_limit(limit: usize) -> Self {
        Self {
            model: TextModel::new(),
            journal: ChangeJournal::with_limit(limit),
        }
    }

    /// Create buffer holding `text` with an empty journal
    pub fn from_text(text: &str) -> Self {
        Self {
            model: TextModel::from_text(text),
            journal: ChangeJournal::new(),
        }
    }

    /// Read-only access to the text
    pub fn model(&self) -> &TextModel {
        &self.model
    }

    pub fn journal(&self) -> &ChangeJournal {
        &self.journal
    }

    /// Get all text
    pub fn text(&self) -> String {
        self.model.text()
    }

    /// Replace `len` characters at `start` with `text`.
    pub fn replace_range(
        &mut self,
        start: usize,
        len: usize,
        text: &str,
        mode: EditMode,
    ) -> Result<ChangeRecord, BufferError> {
        let removed = self.model.replace_range(start, len, text)?;
        let record = ChangeRecord::new(start, removed, text);
        self.journal.record(record.clone(), mode);
        Ok(record)
    }

    /// Replace whole text without journaling and clear history
    pub fn set_text(&mut self, text: &str) {
        self.model.set_text(text);
        self.journal.clear();
    }

    /// Undo last change.
    ///
    /// Returns the caret offset at the end of the restored text, or `None`
    /// when there is nothing to undo.
    pub fn undo(&mut self) -> Result<Option<usize>, BufferError> {
        let Some(inverse) = self.journal.undo() else {
            return Ok(None);
        };
        self.apply(&inverse, EditMode::UndoReplay)?;
        Ok(Some(inverse.end_of_insert()))
    }

    /// Redo undone change.
    ///
    /// Returns the caret offset at the end of the re-inserted text.
    pub fn redo(&mut self) -> Result<Option<usize>, BufferError> {
        let Some(record) = self.journal.redo() else {
            return Ok(None);
        };
        self.apply(&record, EditMode::RedoReplay)?;
        Ok(Some(record.end_of_insert()))
    }

    fn apply(&mut self, record: &ChangeRecord, mode: EditMode) -> Result<(), BufferError> {
        self.replace_range(
            record.start,
            record.removed_len(),
            &record.inserted_text,
            mode,
        )
        .map(|_| ())
    }

    pub fn can_undo(&self) -> bool {
        self.journal.can_undo()
    }

    pub fn can_redo(&self) -> bool {
        self.journal.can_redo()
    }

    /// Check if buffer is modified since last load/save
    pub fn is_modified(&self) -> bool {
        self.journal.is_modified()
    }

    pub fn mark_saved(&mut self) {
        self.journal.mark_saved();
    }

    /// Drop all history after a non-journaled rewrite; content stays modified
    pub fn discard_history(&mut self) {
        self.journal.clear();
        self.journal.invalidate_saved();
    }
}
