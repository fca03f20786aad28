/// One atomic replace-range edit, with enough text to invert it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChangeRecord {
    /// Offset where the edit starts
    pub start: usize,
    /// Text that was removed
    pub removed_text: String,
    /// Text that was inserted
    pub inserted_text: String,
}

impl ChangeRecord {
    pub fn new(
        start: usize,
        removed_text: impl Into<String>,
        inserted_text: impl Into<String>,
    ) -> Self {
        Self {
            start,
            removed_text: removed_text.into(),
            inserted_text: inserted_text.into(),
        }
    }

    /// Removed length in characters
    pub fn removed_len(&self) -> usize {
        self.removed_text.chars().count()
    }

    /// Inserted length in characters
    pub fn inserted_len(&self) -> usize {
        self.inserted_text.chars().count()
    }

    /// Get inverse record
    pub fn inverse(&self) -> ChangeRecord {
        ChangeRecord {
            start: self.start,
            removed_text: self.inserted_text.clone(),
            inserted_text: self.removed_text.clone(),
        }
    }

    /// Offset just past the inserted text
    pub fn end_of_insert(&self) -> usize {
        self.start + self.inserted_len()
    }
}

/// How an edit reaches the text model, and therefore whether it is journaled.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EditMode {
    /// Regular user edit, recorded
    Direct,
    /// Inverse applied by undo
    UndoReplay,
    /// Forward record applied by redo
    RedoReplay,
    /// Not recorded (rewrap, file load)
    NoJournal,
}

/// Linear undo/redo journal with a saved-position marker
#[derive(Debug, Clone)]
pub struct ChangeJournal {
    /// Recorded edits, oldest first
    records: Vec<ChangeRecord>,
    /// One past the last undoable record
    change_index: usize,
    /// Value of `change_index` at last load/save, `None` if unreachable
    save_index: Option<usize>,
    /// Maximum number of records, 0 for unlimited
    limit: usize,
}

impl ChangeJournal {
    /// Create an unlimited journal
    pub fn new() -> Self {
        Self::with_limit(0)
    }

    /// Create journal keeping at most `limit` records (0 = unlimited)
    pub fn with_limit(limit: usize) -> Self {
        Self {
            records: Vec::new(),
            change_index: 0,
            save_index: Some(0),
            limit,
        }
    }

    /// Record an edit. Only [`EditMode::Direct`] edits are stored.
    pub fn record(&mut self, record: ChangeRecord, mode: EditMode) {
        if mode != EditMode::Direct {
            return;
        }

        // New edit invalidates redo tail
        if self.change_index < self.records.len() {
            self.records.truncate(self.change_index);
            if self.save_index.is_some_and(|saved| saved > self.change_index) {
                self.save_index = None;
            }
        }

        self.records.push(record);
        self.change_index += 1;

        if self.limit > 0 && self.records.len() > self.limit {
            self.records.remove(0);
            self.change_index -= 1;
            self.save_index = self.save_index.and_then(|saved| saved.checked_sub(1));
        }
    }

    /// Step back one record; returns the inverse to apply
    pub fn undo(&mut self) -> Option<ChangeRecord> {
        if self.change_index == 0 {
            return None;
        }
        self.change_index -= 1;
        Some(self.records[self.change_index].inverse())
    }

    /// Step forward one record; returns the record to re-apply
    pub fn redo(&mut self) -> Option<ChangeRecord> {
        let record = self.records.get(self.change_index)?.clone();
        self.change_index += 1;
        Some(record)
    }

    pub fn can_undo(&self) -> bool {
        self.change_index > 0
    }

    pub fn can_redo(&self) -> bool {
        self.change_index < self.records.len()
    }

    /// Whether content differs from the last load/save
    pub fn is_modified(&self) -> bool {
        self.save_index != Some(self.change_index)
    }

    /// Remember the current position as saved
    pub fn mark_saved(&mut self) {
        self.save_index = Some(self.change_index);
    }

    /// Forget the saved position, so the journal reports modified until next save
    pub fn invalidate_saved(&mut self) {
        self.save_index = None;
    }

    /// Clear history (new document / load)
    pub fn clear(&mut self) {
        self.records.clear();
        self.change_index = 0;
        self.save_index = Some(0);
    }

    /// Number of stored records
    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Current cursor position
    pub fn change_index(&self) -> usize {
        self.change_index
    }
}

impl Default for ChangeJournal {
    fn default() -> Self {
        Self::new()
    }
}
