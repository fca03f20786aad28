//! The editable braille document.

use std::io::{Read, Write};

use brailledit_buffer::{
    rewrap_from, EditMode, LineEnding, TextBuffer, TextModel, PARAGRAPH_END,
};
use brailledit_format::FileFormat;
use brailledit_keyboard::{blocks_direct_entry, BrailleCell, ChordDecoder};
use brailledit_layout::LayoutPolicy;
use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyModifiers};

use crate::{
    DocumentError, DocumentOptions, EditCommand, LineInfo, NullSink, Signal, SignalSink,
    ViewKind, ViewState,
};

/// Outcome of checking a keystroke before it is applied.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyVerdict {
    Accept,
    /// Keystroke was consumed or suppressed and must not edit the text
    Reject,
}

/// One document shown through a braille view and an ASCII view.
///
/// Both views address the same text; each keeps its own caret and scroll
/// position. Edits originate from the active view, except chord input,
/// which always lands at the braille caret.
pub struct Document {
    buffer: TextBuffer,
    layout: LayoutPolicy,
    line_ending: LineEnding,
    braille: ViewState,
    ascii: ViewState,
    active: ViewKind,
    decoder: ChordDecoder,
    braille_entry: bool,
    sink: Box<dyn SignalSink>,
}

impl Default for Document {
    fn default() -> Self {
        Self::new(DocumentOptions::default())
    }
}

impl Document {
    /// Create an empty document
    pub fn new(options: DocumentOptions) -> Self {
        Self {
            buffer: TextBuffer::with_history_limit(options.history_limit),
            layout: options.layout,
            line_ending: options.line_ending,
            braille: ViewState::default(),
            ascii: ViewState::default(),
            active: ViewKind::Braille,
            decoder: ChordDecoder::new(options.chord_keys, options.release_model),
            braille_entry: options.braille_entry,
            sink: Box::new(NullSink),
        }
    }

    /// Route signals to `sink`
    pub fn with_sink(mut self, sink: impl SignalSink + 'static) -> Self {
        self.sink = Box::new(sink);
        self
    }

    pub fn set_sink(&mut self, sink: impl SignalSink + 'static) {
        self.sink = Box::new(sink);
    }

    // Queries

    pub fn model(&self) -> &TextModel {
        self.buffer.model()
    }

    pub fn text(&self) -> String {
        self.buffer.text()
    }

    pub fn char_count(&self) -> usize {
        self.buffer.model().char_count()
    }

    pub fn line_count(&self) -> usize {
        self.buffer.model().line_count()
    }

    /// Line content without delimiter (paragraph-end marker included)
    pub fn line(&self, index: usize) -> Option<String> {
        self.buffer.model().line(index)
    }

    pub fn has_paragraph_end(&self, index: usize) -> bool {
        self.buffer.model().has_paragraph_end(index)
    }

    pub fn is_first_line_of_page(&self, index: usize) -> bool {
        self.layout.is_first_line_of_page(index)
    }

    pub fn layout(&self) -> &LayoutPolicy {
        &self.layout
    }

    pub fn chars_per_line(&self) -> usize {
        self.layout.chars_per_line()
    }

    pub fn lines_per_page(&self) -> usize {
        self.layout.lines_per_page()
    }

    pub fn page_count(&self) -> usize {
        self.layout.page_count(self.line_count())
    }

    pub fn line_ending(&self) -> LineEnding {
        self.line_ending
    }

    pub fn set_line_ending(&mut self, line_ending: LineEnding) {
        self.line_ending = line_ending;
    }

    pub fn is_modified(&self) -> bool {
        self.buffer.is_modified()
    }

    pub fn can_undo(&self) -> bool {
        self.buffer.can_undo()
    }

    pub fn can_redo(&self) -> bool {
        self.buffer.can_redo()
    }

    pub fn braille_entry(&self) -> bool {
        self.braille_entry
    }

    pub fn set_braille_entry(&mut self, enabled: bool) {
        self.braille_entry = enabled;
        self.decoder.reset();
    }

    /// Lines `from..from + count` prepared for display
    pub fn render_lines(&self, from: usize, count: usize) -> Vec<LineInfo> {
        let model = self.buffer.model();
        let end = from.saturating_add(count).min(model.line_count());
        (from..end)
            .map(|index| {
                let mut text = model.line(index).unwrap_or_default();
                let paragraph_end = text.ends_with(PARAGRAPH_END);
                if paragraph_end {
                    text.pop();
                }
                LineInfo {
                    index,
                    text,
                    page_start: self.layout.is_first_line_of_page(index),
                    paragraph_end,
                }
            })
            .collect()
    }

    // Views

    pub fn active_view(&self) -> ViewKind {
        self.active
    }

    /// Make `kind` the view that originates edits
    pub fn set_active_view(&mut self, kind: ViewKind) {
        if self.active != kind {
            self.active = kind;
            self.decoder.reset();
            self.mirror_scroll();
        }
    }

    pub fn view(&self, kind: ViewKind) -> &ViewState {
        match kind {
            ViewKind::Braille => &self.braille,
            ViewKind::Ascii => &self.ascii,
        }
    }

    fn view_mut(&mut self, kind: ViewKind) -> &mut ViewState {
        match kind {
            ViewKind::Braille => &mut self.braille,
            ViewKind::Ascii => &mut self.ascii,
        }
    }

    /// Caret of the active view
    pub fn caret(&self) -> usize {
        self.view(self.active).caret
    }

    /// Line holding the active caret
    pub fn caret_line(&self) -> Result<usize, DocumentError> {
        Ok(self.buffer.model().line_at_offset(self.caret())?)
    }

    pub fn set_visible_lines(&mut self, kind: ViewKind, lines: usize) {
        self.view_mut(kind).visible_lines = lines;
    }

    /// Scroll the active view; the other view follows
    pub fn scroll_to(&mut self, top_line: usize) {
        let last = self.line_count().saturating_sub(1);
        self.view_mut(self.active).top_line = top_line.min(last);
        self.mirror_scroll();
    }

    /// Center the active caret line in its view
    pub fn scroll_to_caret(&mut self) -> Result<(), DocumentError> {
        let line = self.caret_line()?;
        let view = self.view_mut(self.active);
        view.top_line = line.saturating_sub(view.visible_lines / 2);
        self.mirror_scroll();
        Ok(())
    }

    fn mirror_scroll(&mut self) {
        let top_line = self.view(self.active).top_line;
        self.view_mut(self.active.other()).top_line = top_line;
    }

    /// Move the caret of `kind` to `offset`, raising the line margin signal
    /// when it advanced by exactly one onto the margin column.
    pub fn set_caret(&mut self, kind: ViewKind, offset: usize) -> Result<(), DocumentError> {
        let model = self.buffer.model();
        let line = model.line_at_offset(offset)?;
        let line_start = model.offset_at_line(line)?;

        let previous = self.view(kind).caret;
        self.view_mut(kind).caret = offset;
        if self.layout.margin_signal(previous, offset, line_start) {
            log::debug!("Line margin reached at offset {}", offset);
            self.sink.signal(Signal::LineMargin);
        }

        if kind == self.active {
            self.view_mut(kind).reveal_line(line);
            self.mirror_scroll();
        }
        Ok(())
    }

    fn clamp_carets(&mut self) {
        let count = self.char_count();
        for kind in [ViewKind::Braille, ViewKind::Ascii] {
            let view = self.view_mut(kind);
            view.caret = view.caret.min(count);
        }
    }

    fn reset_views(&mut self) {
        for kind in [ViewKind::Braille, ViewKind::Ascii] {
            let visible_lines = self.view(kind).visible_lines;
            *self.view_mut(kind) = ViewState {
                visible_lines,
                ..ViewState::default()
            };
        }
        self.decoder.reset();
    }

    // Caret movement

    pub fn move_left(&mut self) -> Result<(), DocumentError> {
        let caret = self.caret();
        if caret == 0 {
            return Ok(());
        }
        let step = self.unit_before(caret)?;
        self.set_caret(self.active, caret - step)
    }

    pub fn move_right(&mut self) -> Result<(), DocumentError> {
        let caret = self.caret();
        if caret >= self.char_count() {
            return Ok(());
        }
        let step = self.unit_at(caret)?;
        self.set_caret(self.active, caret + step)
    }

    pub fn move_up(&mut self) -> Result<(), DocumentError> {
        let line = self.caret_line()?;
        if line == 0 {
            return Ok(());
        }
        self.move_to_line(line - 1)
    }

    pub fn move_down(&mut self) -> Result<(), DocumentError> {
        let line = self.caret_line()?;
        if line + 1 >= self.line_count() {
            return Ok(());
        }
        self.move_to_line(line + 1)
    }

    pub fn move_line_start(&mut self) -> Result<(), DocumentError> {
        let start = self.buffer.model().offset_at_line(self.caret_line()?)?;
        self.set_caret(self.active, start)
    }

    pub fn move_line_end(&mut self) -> Result<(), DocumentError> {
        let line = self.caret_line()?;
        let model = self.buffer.model();
        let end = model.offset_at_line(line)? + model.line_len(line)?;
        self.set_caret(self.active, end)
    }

    /// Keep the column, clamped to the target line
    fn move_to_line(&mut self, target: usize) -> Result<(), DocumentError> {
        let model = self.buffer.model();
        let line = model.line_at_offset(self.caret())?;
        let column = self.caret() - model.offset_at_line(line)?;
        let offset = model.offset_at_line(target)? + column.min(model.line_len(target)?);
        self.set_caret(self.active, offset)
    }

    /// Chars to step back over: a CRLF pair counts as one unit
    fn unit_before(&self, offset: usize) -> Result<usize, DocumentError> {
        if offset >= 2 && self.buffer.model().slice(offset - 2, 2)? == "\r\n" {
            Ok(2)
        } else {
            Ok(1)
        }
    }

    fn unit_at(&self, offset: usize) -> Result<usize, DocumentError> {
        if offset + 2 <= self.char_count() && self.buffer.model().slice(offset, 2)? == "\r\n" {
            Ok(2)
        } else {
            Ok(1)
        }
    }

    // Editing

    /// Journaled replace of `len` chars at `start`. Carets of both views
    /// follow the edit.
    ///
    /// The paragraph-end marker stays the last character of its line. Text
    /// inserted next to a marker goes before it, unless it starts with a line
    /// break, which goes after it. A marker the edit leaves inside a line is
    /// dropped. Returns the offset just past the inserted text.
    pub fn replace_range(
        &mut self,
        start: usize,
        len: usize,
        text: &str,
    ) -> Result<usize, DocumentError> {
        self.buffer.model().slice(start, len)?;
        let start = if len == 0 {
            self.insertion_point(start, text)
        } else {
            start
        };

        // Rebuild the touched lines, then journal only what differs
        let model = self.buffer.model();
        let first = model.line_at_offset(start)?;
        let last = model.line_at_offset(start + len)?;
        let region_start = model.offset_at_line(first)?;
        let region_end = (model.offset_at_line(last)? + model.line_len(last)?).max(start + len);
        let old: Vec<char> = model
            .slice(region_start, region_end - region_start)?
            .chars()
            .collect();

        let mut edited: Vec<char> = old[..start - region_start].to_vec();
        edited.extend(text.chars());
        let cursor = edited.len();
        edited.extend_from_slice(&old[start + len - region_start..]);
        let (edited, cursor) = settle_paragraph_ends(edited, cursor);

        let prefix = old
            .iter()
            .zip(&edited)
            .take_while(|(a, b)| a == b)
            .count()
            .min(start - region_start);
        let suffix = old[prefix..]
            .iter()
            .rev()
            .zip(edited[prefix..].iter().rev())
            .take_while(|(a, b)| a == b)
            .count();
        let removed = old.len() - prefix - suffix;
        let inserted = &edited[prefix..edited.len() - suffix];

        if removed > 0 || !inserted.is_empty() {
            let at = region_start + prefix;
            let replacement: String = inserted.iter().collect();
            self.buffer
                .replace_range(at, removed, &replacement, EditMode::Direct)?;
            self.braille.adjust_caret(at, removed, inserted.len());
            self.ascii.adjust_caret(at, removed, inserted.len());
        }
        Ok(region_start + cursor)
    }

    /// Where an insertion at `offset` goes when a marker is adjacent
    fn insertion_point(&self, offset: usize, text: &str) -> usize {
        let breaks_line = text.starts_with(|ch: char| ch == '\n' || ch == '\r');
        if breaks_line && self.char_at(offset) == Some(PARAGRAPH_END) {
            offset + 1
        } else if !breaks_line
            && offset > 0
            && self.char_at(offset - 1) == Some(PARAGRAPH_END)
        {
            offset - 1
        } else {
            offset
        }
    }

    fn char_at(&self, offset: usize) -> Option<char> {
        let model = self.buffer.model();
        if offset >= model.char_count() {
            return None;
        }
        model.slice(offset, 1).ok()?.chars().next()
    }

    /// Insert `text` at the active caret and move the caret past it
    pub fn insert(&mut self, text: &str) -> Result<(), DocumentError> {
        let caret = self.caret();
        let end = self.replace_range(caret, 0, text)?;
        // Advance from where the text landed so the margin bell sees the step
        self.view_mut(self.active).caret = end.saturating_sub(text.chars().count());
        self.set_caret(self.active, end)
    }

    /// Insert the session line ending
    pub fn newline(&mut self) -> Result<(), DocumentError> {
        self.insert(self.line_ending.as_str())
    }

    /// Insert the character of a resolved chord at the braille caret
    pub fn insert_cell(&mut self, cell: BrailleCell) -> Result<(), DocumentError> {
        let caret = self.braille.caret;
        let mut encoded = [0u8; 4];
        let end = self.replace_range(caret, 0, cell.to_ascii().encode_utf8(&mut encoded))?;
        self.braille.caret = end.saturating_sub(1);
        self.set_caret(ViewKind::Braille, end)
    }

    /// Delete the unit before the caret
    pub fn backspace(&mut self) -> Result<(), DocumentError> {
        let caret = self.caret();
        if caret == 0 {
            return Ok(());
        }
        let len = self.unit_before(caret)?;
        let end = self.replace_range(caret - len, len, "")?;
        self.set_caret(self.active, end)
    }

    /// Delete the unit at the caret
    pub fn delete(&mut self) -> Result<(), DocumentError> {
        let caret = self.caret();
        if caret >= self.char_count() {
            return Ok(());
        }
        let len = self.unit_at(caret)?;
        self.replace_range(caret, len, "").map(|_| ())
    }

    /// Add or remove the paragraph-end marker on the caret line.
    ///
    /// Empty lines cannot end a paragraph. Returns whether the text changed.
    pub fn toggle_paragraph_end(&mut self) -> Result<bool, DocumentError> {
        let line = self.caret_line()?;
        let model = self.buffer.model();
        let len = model.line_len(line)?;
        if len == 0 {
            return Ok(false);
        }
        let end = model.offset_at_line(line)? + len;

        if model.has_paragraph_end(line) {
            self.replace_range(end - 1, 1, "")?;
        } else {
            let mut encoded = [0u8; 4];
            self.replace_range(end, 0, PARAGRAPH_END.encode_utf8(&mut encoded))?;
            // Carets at the line end stay there, after the marker
            for view in [&mut self.braille, &mut self.ascii] {
                if view.caret == end {
                    view.caret = end + 1;
                }
            }
        }
        Ok(true)
    }

    /// Undo the last change. Returns `false` when there was nothing to undo.
    pub fn undo(&mut self) -> Result<bool, DocumentError> {
        match self.buffer.undo()? {
            Some(caret) => self.after_replay(caret).map(|_| true),
            None => Ok(false),
        }
    }

    /// Redo the last undone change. Returns `false` at the end of history.
    pub fn redo(&mut self) -> Result<bool, DocumentError> {
        match self.buffer.redo()? {
            Some(caret) => self.after_replay(caret).map(|_| true),
            None => Ok(false),
        }
    }

    fn after_replay(&mut self, caret: usize) -> Result<(), DocumentError> {
        self.clamp_carets();
        self.set_caret(self.active, caret)?;
        self.scroll_to_caret()
    }

    /// Rewrap from the caret line to the current line width.
    ///
    /// Not undoable: history is discarded and the document stays modified.
    pub fn rewrap_from_caret(&mut self) -> Result<usize, DocumentError> {
        let line = self.caret_line()?;
        let wrapped = rewrap_from(
            &mut self.buffer,
            line,
            self.layout.chars_per_line(),
            self.line_ending,
        )?;
        self.clamp_carets();
        if wrapped > 0 {
            log::info!("Rewrapped {} lines from line {}", wrapped, line);
        }
        Ok(wrapped)
    }

    /// Run a parsed command against the active view
    pub fn execute(&mut self, command: EditCommand) -> Result<(), DocumentError> {
        match command {
            EditCommand::MoveLeft => self.move_left(),
            EditCommand::MoveRight => self.move_right(),
            EditCommand::MoveUp => self.move_up(),
            EditCommand::MoveDown => self.move_down(),
            EditCommand::MoveLineStart => self.move_line_start(),
            EditCommand::MoveLineEnd => self.move_line_end(),
            EditCommand::MoveDocumentStart => self.set_caret(self.active, 0),
            EditCommand::MoveDocumentEnd => self.set_caret(self.active, self.char_count()),
            EditCommand::InsertChar(ch) => {
                let mut encoded = [0u8; 4];
                self.insert(ch.encode_utf8(&mut encoded))
            }
            EditCommand::InsertNewline => self.newline(),
            EditCommand::Backspace => self.backspace(),
            EditCommand::Delete => self.delete(),
            EditCommand::ToggleParagraphEnd => self.toggle_paragraph_end().map(|_| ()),
            EditCommand::Undo => self.undo().map(|_| ()),
            EditCommand::Redo => self.redo().map(|_| ()),
            EditCommand::Rewrap => self.rewrap_from_caret().map(|_| ()),
            EditCommand::SwitchView => {
                self.set_active_view(self.active.other());
                Ok(())
            }
            EditCommand::None => Ok(()),
        }
    }

    // Keyboard input

    /// Check a keystroke before it edits the text.
    ///
    /// Shift+Enter toggles the paragraph end itself and is rejected. A plain
    /// Enter is checked against the page margin. With braille entry active,
    /// printable characters typed on the braille view are rejected.
    pub fn verify_key(&mut self, key: &KeyEvent) -> Result<KeyVerdict, DocumentError> {
        if key.kind == KeyEventKind::Release {
            return Ok(KeyVerdict::Accept);
        }

        if key.code == KeyCode::Enter {
            if key.modifiers.contains(KeyModifiers::SHIFT) {
                self.toggle_paragraph_end()?;
                return Ok(KeyVerdict::Reject);
            }

            let line = self.caret_line()?;
            let view = self.view_mut(self.active);
            let previous = std::mem::replace(&mut view.prev_enter_line, line);
            if self.layout.page_signal(previous, line) {
                log::debug!("Page margin reached at line {}", line);
                self.sink.signal(Signal::PageMargin);
            }
        }

        if self.braille_entry && self.active == ViewKind::Braille && blocks_direct_entry(key) {
            return Ok(KeyVerdict::Reject);
        }
        Ok(KeyVerdict::Accept)
    }

    /// Feed a terminal key event through chords, verification and commands.
    ///
    /// With braille entry on the braille view, chord keys compose cells that
    /// are inserted when the chord is released.
    pub fn handle_key(&mut self, key: &KeyEvent) -> Result<(), DocumentError> {
        if self.braille_entry && self.active == ViewKind::Braille {
            if let Some(cell) = self.decoder.handle_event(key) {
                self.insert_cell(cell)?;
            }
        }

        if key.kind == KeyEventKind::Release {
            return Ok(());
        }
        if self.verify_key(key)? == KeyVerdict::Reject {
            return Ok(());
        }
        self.execute(EditCommand::from_key_event(key))
    }

    // Layout

    /// Change line width, moving the line margin along. Text is not rewrapped.
    pub fn set_chars_per_line(&mut self, chars_per_line: usize) -> Result<(), DocumentError> {
        Ok(self.layout.set_chars_per_line(chars_per_line)?)
    }

    pub fn set_lines_per_page(&mut self, lines_per_page: usize) -> Result<(), DocumentError> {
        Ok(self.layout.set_lines_per_page(lines_per_page)?)
    }

    pub fn set_line_margin(&mut self, margin: Option<usize>) {
        self.layout.set_line_margin(margin);
    }

    pub fn set_page_margin(&mut self, margin: Option<usize>) {
        self.layout.set_page_margin(margin);
    }

    // Whole-document operations

    /// Discard all text and history
    pub fn new_document(&mut self) {
        self.set_text("");
    }

    /// Replace all text without journaling; history is cleared.
    ///
    /// Markers that do not end a line are dropped.
    pub fn set_text(&mut self, text: &str) {
        let (settled, _) = settle_paragraph_ends(text.chars().collect(), 0);
        let settled: String = settled.into_iter().collect();
        self.buffer.set_text(&settled);
        self.reset_views();
    }

    /// Load a document. On failure nothing changes.
    pub fn load<R: Read>(&mut self, format: FileFormat, reader: R) -> Result<(), DocumentError> {
        let decoded = format.read(reader, self.line_ending)?;

        let mut layout = self.layout;
        if let Some(chars_per_line) = decoded.chars_per_line {
            layout.set_chars_per_line(chars_per_line)?;
        }
        if let Some(lines_per_page) = decoded.lines_per_page {
            layout.set_lines_per_page(lines_per_page)?;
        }

        self.layout = layout;
        self.line_ending = decoded.line_ending;
        self.set_text(&decoded.text);
        log::info!(
            "Loaded {} document: {} lines, {} per page",
            format,
            self.line_count(),
            self.layout.lines_per_page()
        );
        Ok(())
    }

    /// Save the document and mark it unmodified
    pub fn save<W: Write>(&mut self, format: FileFormat, writer: W) -> Result<(), DocumentError> {
        format.write(writer, self.buffer.model(), &self.layout, self.line_ending)?;
        self.buffer.mark_saved();
        log::info!("Saved {} document: {} lines", format, self.line_count());
        Ok(())
    }
}

/// Drop every paragraph-end marker that is not the last character of a
/// non-empty line. `cursor` is moved back over dropped markers before it.
fn settle_paragraph_ends(text: Vec<char>, cursor: usize) -> (Vec<char>, usize) {
    let is_break = |ch: Option<&char>| matches!(ch, None | Some('\n') | Some('\r'));
    let mut settled: Vec<char> = Vec::with_capacity(text.len());
    let mut moved = cursor;
    for (index, &ch) in text.iter().enumerate() {
        if ch == PARAGRAPH_END && !(is_break(text.get(index + 1)) && !is_break(settled.last())) {
            if index < cursor {
                moved -= 1;
            }
            continue;
        }
        settled.push(ch);
    }
    (settled, moved)
}

#[cfg(test)]
mod tests {
    use super::*;
    use brailledit_keyboard::{ChordKeys, ReleaseModel};
    use std::sync::mpsc::{self, Receiver};

    fn options() -> DocumentOptions {
        DocumentOptions {
            line_ending: LineEnding::LF,
            release_model: ReleaseModel::PerKey,
            chord_keys: ChordKeys::default(),
            ..DocumentOptions::default()
        }
    }

    fn document_with_signals(layout: LayoutPolicy) -> (Document, Receiver<Signal>) {
        let (tx, rx) = mpsc::channel();
        let document = Document::new(DocumentOptions { layout, ..options() }).with_sink(tx);
        (document, rx)
    }

    fn press(code: KeyCode) -> KeyEvent {
        KeyEvent::new_with_kind(code, KeyModifiers::NONE, KeyEventKind::Press)
    }

    fn release(code: KeyCode) -> KeyEvent {
        KeyEvent::new_with_kind(code, KeyModifiers::NONE, KeyEventKind::Release)
    }

    #[test]
    fn test_insert_moves_caret() {
        let mut doc = Document::new(options());
        doc.insert("ABC").unwrap();
        assert_eq!(doc.text(), "ABC");
        assert_eq!(doc.caret(), 3);
        assert!(doc.is_modified());
    }

    #[test]
    fn test_other_view_caret_follows_edit() {
        let mut doc = Document::new(options());
        doc.insert("ABCD").unwrap();
        doc.set_active_view(ViewKind::Ascii);
        doc.set_caret(ViewKind::Ascii, 4).unwrap();
        doc.set_caret(ViewKind::Braille, 2).unwrap();

        doc.set_active_view(ViewKind::Braille);
        doc.insert("XY").unwrap();
        assert_eq!(doc.text(), "ABXYCD");
        assert_eq!(doc.view(ViewKind::Braille).caret, 4);
        assert_eq!(doc.view(ViewKind::Ascii).caret, 6);
    }

    #[test]
    fn test_undo_redo_restore_text_and_caret() {
        let mut doc = Document::new(options());
        doc.insert("AB").unwrap();
        doc.insert("CD").unwrap();
        doc.backspace().unwrap();
        assert_eq!(doc.text(), "ABC");

        assert!(doc.undo().unwrap());
        assert_eq!(doc.text(), "ABCD");
        assert_eq!(doc.caret(), 4);
        assert!(doc.undo().unwrap());
        assert_eq!(doc.text(), "AB");
        assert_eq!(doc.caret(), 2);
        assert!(doc.redo().unwrap());
        assert_eq!(doc.text(), "ABCD");
        assert_eq!(doc.caret(), 4);
    }

    #[test]
    fn test_undo_at_bounds_is_noop() {
        let mut doc = Document::new(options());
        assert!(!doc.undo().unwrap());
        assert!(!doc.redo().unwrap());
        doc.insert("A").unwrap();
        assert!(!doc.redo().unwrap());
    }

    #[test]
    fn test_crlf_is_one_unit() {
        let mut doc = Document::new(DocumentOptions {
            line_ending: LineEnding::CRLF,
            ..options()
        });
        doc.insert("AB").unwrap();
        doc.newline().unwrap();
        assert_eq!(doc.caret(), 4);
        assert_eq!(doc.line_count(), 2);

        doc.move_left().unwrap();
        assert_eq!(doc.caret(), 2);
        doc.delete().unwrap();
        assert_eq!(doc.text(), "AB");

        doc.newline().unwrap();
        doc.backspace().unwrap();
        assert_eq!(doc.text(), "AB");
        assert_eq!(doc.caret(), 2);
    }

    #[test]
    fn test_vertical_moves_keep_column() {
        let mut doc = Document::new(options());
        doc.set_text("ABCDE\nAB\nABCDE");
        doc.set_caret(ViewKind::Braille, 4).unwrap();
        doc.move_down().unwrap();
        assert_eq!(doc.caret(), 8);
        doc.move_down().unwrap();
        assert_eq!(doc.caret(), 11);
        doc.move_line_end().unwrap();
        assert_eq!(doc.caret(), 14);
        doc.move_line_start().unwrap();
        assert_eq!(doc.caret(), 9);
        doc.move_up().unwrap();
        assert_eq!(doc.caret(), 6);
    }

    #[test]
    fn test_toggle_paragraph_end_is_undoable() {
        let mut doc = Document::new(options());
        doc.set_text("AB\nCD");
        doc.set_caret(ViewKind::Braille, 1).unwrap();

        assert!(doc.toggle_paragraph_end().unwrap());
        assert_eq!(doc.text(), "AB\u{feff}\nCD");
        assert!(doc.has_paragraph_end(0));

        assert!(doc.toggle_paragraph_end().unwrap());
        assert_eq!(doc.text(), "AB\nCD");

        doc.undo().unwrap();
        assert_eq!(doc.text(), "AB\u{feff}\nCD");
        doc.undo().unwrap();
        assert_eq!(doc.text(), "AB\nCD");
        assert!(!doc.is_modified());
    }

    #[test]
    fn test_toggle_on_empty_line_does_nothing() {
        let mut doc = Document::new(options());
        assert!(!doc.toggle_paragraph_end().unwrap());
        assert!(!doc.can_undo());
    }

    #[test]
    fn test_shift_enter_is_consumed() {
        let mut doc = Document::new(options());
        doc.set_text("AB");
        let shift_enter = KeyEvent::new(KeyCode::Enter, KeyModifiers::SHIFT);
        assert_eq!(doc.verify_key(&shift_enter).unwrap(), KeyVerdict::Reject);
        assert_eq!(doc.text(), "AB\u{feff}");
    }

    #[test]
    fn test_typing_after_toggle_stays_before_marker() {
        let mut doc = Document::new(options());
        doc.insert("AB").unwrap();
        doc.toggle_paragraph_end().unwrap();
        assert_eq!(doc.caret(), 3);

        doc.insert("C").unwrap();
        assert_eq!(doc.text(), "ABC\u{feff}");
        assert!(doc.has_paragraph_end(0));
        assert_eq!(doc.caret(), 3);

        // A line break still lands after the marker
        doc.newline().unwrap();
        doc.insert("D").unwrap();
        assert_eq!(doc.text(), "ABC\u{feff}\nD");

        let mut out = Vec::new();
        doc.save(FileFormat::Bzy, &mut out).unwrap();
        assert!(out.ends_with(b"ABC\xb6\nD\n"));

        doc.undo().unwrap();
        doc.undo().unwrap();
        assert_eq!(doc.text(), "ABC\u{feff}");
    }

    #[test]
    fn test_chord_after_toggle_stays_before_marker() {
        let mut doc = Document::new(options());
        doc.set_text("AB");
        doc.move_line_end().unwrap();
        doc.handle_key(&KeyEvent::new(KeyCode::Enter, KeyModifiers::SHIFT))
            .unwrap();
        doc.handle_key(&press(KeyCode::Char('f'))).unwrap();
        doc.handle_key(&release(KeyCode::Char('f'))).unwrap();
        assert_eq!(doc.text(), "ABA\u{feff}");
        assert!(doc.has_paragraph_end(0));
    }

    #[test]
    fn test_joining_marked_line_drops_marker() {
        let mut doc = Document::new(options());
        doc.set_text("AB\u{feff}\nCD");
        doc.set_caret(ViewKind::Braille, 4).unwrap();
        doc.backspace().unwrap();
        assert_eq!(doc.text(), "ABCD");
        assert_eq!(doc.caret(), 2);
        assert!(!doc.has_paragraph_end(0));

        let mut out = Vec::new();
        doc.save(FileFormat::Brf, &mut out).unwrap();
        assert_eq!(out, b"ABCD");

        doc.undo().unwrap();
        assert_eq!(doc.text(), "AB\u{feff}\nCD");
    }

    #[test]
    fn test_delete_line_break_after_marker() {
        let mut doc = Document::new(options());
        doc.set_text("AB\u{feff}\nCD\u{feff}");
        doc.set_caret(ViewKind::Braille, 3).unwrap();
        doc.delete().unwrap();
        assert_eq!(doc.text(), "ABCD\u{feff}");
        assert_eq!(doc.caret(), 2);
        assert!(doc.has_paragraph_end(0));
    }

    #[test]
    fn test_set_text_drops_stray_markers() {
        let mut doc = Document::new(options());
        doc.set_text("A\u{feff}B\n\u{feff}\nC\u{feff}");
        assert_eq!(doc.text(), "AB\n\nC\u{feff}");
    }

    #[test]
    fn test_margin_signal_on_single_step() {
        let layout = LayoutPolicy::new(40, 25, Some(3), None).unwrap();
        let (mut doc, rx) = document_with_signals(layout);
        doc.insert("AB").unwrap();
        assert!(rx.try_recv().is_err());
        doc.insert("C").unwrap();
        assert_eq!(rx.try_recv(), Ok(Signal::LineMargin));

        // Jumping onto the margin does not ring
        doc.set_caret(ViewKind::Braille, 0).unwrap();
        doc.set_caret(ViewKind::Braille, 3).unwrap();
        assert!(rx.try_recv().is_err());
    }

    #[test]
    fn test_margin_signal_is_line_relative() {
        let layout = LayoutPolicy::new(40, 25, Some(2), None).unwrap();
        let (mut doc, rx) = document_with_signals(layout);
        doc.set_text("ABCD\nEFGH");
        doc.set_caret(ViewKind::Braille, 6).unwrap();
        doc.move_right().unwrap();
        assert_eq!(rx.try_recv(), Ok(Signal::LineMargin));
    }

    #[test]
    fn test_page_signal_needs_consecutive_enters() {
        let layout = LayoutPolicy::new(40, 25, None, Some(4)).unwrap();
        let (mut doc, rx) = document_with_signals(layout);
        doc.set_active_view(ViewKind::Ascii);

        // Enter on line 0, then on line 1: line 1 == margin - 3, no signal
        doc.handle_key(&press(KeyCode::Enter)).unwrap();
        doc.handle_key(&press(KeyCode::Enter)).unwrap();
        assert!(rx.try_recv().is_err());
        // Enter on line 2 == margin - 2 after Enter on line 1
        doc.handle_key(&press(KeyCode::Enter)).unwrap();
        assert_eq!(rx.try_recv(), Ok(Signal::PageMargin));
        assert_eq!(doc.line_count(), 4);
    }

    #[test]
    fn test_page_signal_skipped_when_caret_jumps() {
        let layout = LayoutPolicy::new(40, 25, None, Some(4)).unwrap();
        let (mut doc, rx) = document_with_signals(layout);
        doc.set_text("\n\n\n");
        doc.set_caret(ViewKind::Braille, 2).unwrap();
        doc.verify_key(&press(KeyCode::Enter)).unwrap();
        assert!(rx.try_recv().is_err());
    }

    #[test]
    fn test_page_signal_rings_once_per_document() {
        let layout = LayoutPolicy::new(40, 5, None, Some(4)).unwrap();
        let (mut doc, rx) = document_with_signals(layout);
        doc.set_active_view(ViewKind::Ascii);
        for _ in 0..20 {
            doc.handle_key(&press(KeyCode::Enter)).unwrap();
        }
        assert_eq!(doc.line_count(), 21);
        let signals: Vec<Signal> = rx.try_iter().collect();
        assert_eq!(signals, vec![Signal::PageMargin]);
    }

    #[test]
    fn test_chord_inserts_cell_at_braille_caret() {
        let mut doc = Document::new(options());
        for ch in ['f', 'd', 's'] {
            doc.handle_key(&press(KeyCode::Char(ch))).unwrap();
        }
        assert_eq!(doc.text(), "");
        for ch in ['d', 'f', 's'] {
            doc.handle_key(&release(KeyCode::Char(ch))).unwrap();
        }
        assert_eq!(doc.text(), "L");
        assert_eq!(doc.view(ViewKind::Braille).caret, 1);
        assert!(doc.can_undo());
    }

    #[test]
    fn test_space_passes_braille_entry() {
        let mut doc = Document::new(options());
        doc.handle_key(&press(KeyCode::Char(' '))).unwrap();
        assert_eq!(doc.text(), " ");
    }

    #[test]
    fn test_ascii_view_types_directly() {
        let mut doc = Document::new(options());
        doc.set_active_view(ViewKind::Ascii);
        doc.handle_key(&press(KeyCode::Char('f'))).unwrap();
        doc.handle_key(&release(KeyCode::Char('f'))).unwrap();
        assert_eq!(doc.text(), "f");
        assert_eq!(doc.view(ViewKind::Ascii).caret, 1);
    }

    #[test]
    fn test_braille_entry_off_types_directly() {
        let mut doc = Document::new(DocumentOptions {
            braille_entry: false,
            ..options()
        });
        doc.handle_key(&press(KeyCode::Char('f'))).unwrap();
        doc.handle_key(&release(KeyCode::Char('f'))).unwrap();
        assert_eq!(doc.text(), "f");
    }

    #[test]
    fn test_rewrap_from_caret() {
        let mut doc = Document::new(DocumentOptions {
            layout: LayoutPolicy::new(10, 25, None, None).unwrap(),
            ..options()
        });
        doc.insert("the quick brown fox").unwrap();
        doc.set_caret(ViewKind::Braille, 0).unwrap();
        assert_eq!(doc.rewrap_from_caret().unwrap(), 1);
        assert_eq!(doc.text(), "the quick\nbrown fox");
        assert!(doc.is_modified());
        assert!(!doc.can_undo());
    }

    #[test]
    fn test_scroll_mirroring() {
        let mut doc = Document::new(options());
        doc.set_text(&"A\n".repeat(100));
        doc.set_visible_lines(ViewKind::Braille, 10);
        doc.scroll_to(40);
        assert_eq!(doc.view(ViewKind::Ascii).top_line, 40);

        doc.set_caret(ViewKind::Braille, 120).unwrap();
        doc.scroll_to_caret().unwrap();
        assert_eq!(doc.view(ViewKind::Braille).top_line, 55);
        assert_eq!(doc.view(ViewKind::Ascii).top_line, 55);
    }

    #[test]
    fn test_render_lines() {
        let mut doc = Document::new(DocumentOptions {
            layout: LayoutPolicy::new(40, 2, None, None).unwrap(),
            ..options()
        });
        doc.set_text("AB\u{feff}\nCD\nEF");
        let lines = doc.render_lines(1, 5);
        assert_eq!(lines.len(), 2);
        assert_eq!(lines[0].text, "CD");
        assert!(!lines[0].page_start);
        assert!(lines[1].page_start);

        let first = &doc.render_lines(0, 1)[0];
        assert_eq!(first.text, "AB");
        assert!(first.paragraph_end);
    }

    #[test]
    fn test_new_document_clears_everything() {
        let mut doc = Document::new(options());
        doc.insert("AB").unwrap();
        doc.new_document();
        assert_eq!(doc.text(), "");
        assert_eq!(doc.caret(), 0);
        assert!(!doc.can_undo());
        assert!(!doc.is_modified());
    }

    #[test]
    fn test_save_marks_unmodified() {
        let mut doc = Document::new(options());
        doc.insert("AB").unwrap();
        let mut out = Vec::new();
        doc.save(FileFormat::Brf, &mut out).unwrap();
        assert_eq!(out, b"AB");
        assert!(!doc.is_modified());
        doc.undo().unwrap();
        assert!(doc.is_modified());
    }

    #[test]
    fn test_failed_load_changes_nothing() {
        let mut doc = Document::new(options());
        doc.insert("KEEP").unwrap();
        let result = doc.load(FileFormat::Bzy, &b"Chars Per Line:  x\n"[..]);
        assert!(matches!(result, Err(DocumentError::Codec(_))));
        assert_eq!(doc.text(), "KEEP");
        assert!(doc.can_undo());
        assert_eq!(doc.chars_per_line(), 40);
    }
}
