//! Editable text buffer with cursor and undo/redo.
//!
//! This module provides [`EditBuffer`], which wraps a [`TextBuffer`] with
//! editing capabilities including cursor movement, text insertion/deletion,
//! and undo/redo history. All positions are byte offsets into the buffer;
//! cursor movement steps by grapheme cluster, not by byte or `char`.
//!
//! # Examples
//!
//! ```
//! use text_engine_core::EditBuffer;
//!
//! let mut buf = EditBuffer::with_text("Hello World");
//!
//! // Move cursor to end of line and delete backward
//! buf.move_to_line_end();
//! buf.delete_backward(); // Removes 'd'
//! buf.commit(); // Create undo checkpoint
//! assert_eq!(buf.text(), "Hello Worl");
//!
//! // Undo restores deleted text
//! buf.undo();
//! assert_eq!(buf.text(), "Hello World");
//! ```

// Iterator patterns are clearer in their current form
#![allow(clippy::while_let_on_iterator)]
// if-let-else is clearer than map_or for complex logic
#![allow(clippy::option_if_let_else)]

use crate::text::TextBuffer;
use crate::unicode::search::get_prev_grapheme_start;
use unicode_segmentation::UnicodeSegmentation;

fn is_word_char(ch: char) -> bool {
    ch.is_alphanumeric() || ch == '_'
}

/// Cursor position in the buffer.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Cursor {
    /// Byte offset in the buffer.
    pub offset: usize,
    /// Line number (0-indexed).
    pub row: usize,
    /// Byte offset from the start of the line.
    pub col: usize,
}

impl Cursor {
    /// Create a new cursor at position.
    #[must_use]
    pub fn new(offset: usize, row: usize, col: usize) -> Self {
        Self { offset, row, col }
    }

    /// Create a cursor at the beginning.
    #[must_use]
    pub fn start() -> Self {
        Self::default()
    }
}

/// Cursor position info with offset and visual column.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct CursorPosition {
    pub row: usize,
    pub col: usize,
    pub offset: usize,
}

/// An edit operation for undo/redo.
#[derive(Clone, Debug)]
enum EditOp {
    Insert { offset: usize, text: String },
    Delete { offset: usize, text: String },
}

impl EditOp {
    fn invert(&self) -> Self {
        match self {
            Self::Insert { offset, text } => Self::Delete {
                offset: *offset,
                text: text.clone(),
            },
            Self::Delete { offset, text } => Self::Insert {
                offset: *offset,
                text: text.clone(),
            },
        }
    }
}

/// Default maximum number of undo groups to retain.
const DEFAULT_MAX_HISTORY_DEPTH: usize = 1000;

/// Edit history for undo/redo with bounded memory usage.
#[derive(Clone, Debug)]
struct History {
    undo_stack: Vec<Vec<EditOp>>,
    redo_stack: Vec<Vec<EditOp>>,
    current_group: Vec<EditOp>,
    /// Maximum number of undo groups to retain. Oldest entries are dropped when exceeded.
    max_depth: usize,
}

impl Default for History {
    fn default() -> Self {
        Self {
            undo_stack: Vec::new(),
            redo_stack: Vec::new(),
            current_group: Vec::new(),
            max_depth: DEFAULT_MAX_HISTORY_DEPTH,
        }
    }
}

impl History {
    fn new() -> Self {
        Self::default()
    }

    /// Create a history with a custom maximum depth.
    fn with_max_depth(max_depth: usize) -> Self {
        Self {
            max_depth,
            ..Self::default()
        }
    }

    fn push(&mut self, op: EditOp) {
        self.current_group.push(op);
        self.redo_stack.clear();
    }

    fn commit(&mut self) {
        if !self.current_group.is_empty() {
            self.undo_stack
                .push(std::mem::take(&mut self.current_group));
            // Enforce depth limit by dropping oldest entries
            if self.undo_stack.len() > self.max_depth {
                let excess = self.undo_stack.len() - self.max_depth;
                self.undo_stack.drain(..excess);
            }
        }
    }

    fn pop_undo(&mut self) -> Option<Vec<EditOp>> {
        self.commit();
        self.undo_stack.pop()
    }

    fn push_redo(&mut self, ops: Vec<EditOp>) {
        self.redo_stack.push(ops);
    }

    fn pop_redo(&mut self) -> Option<Vec<EditOp>> {
        self.redo_stack.pop()
    }

    fn can_undo(&self) -> bool {
        !self.undo_stack.is_empty() || !self.current_group.is_empty()
    }

    fn can_redo(&self) -> bool {
        !self.redo_stack.is_empty()
    }

    fn clear(&mut self) {
        self.undo_stack.clear();
        self.redo_stack.clear();
        self.current_group.clear();
    }
}

/// Text buffer with editing operations, cursor, and undo/redo.
///
/// `EditBuffer` is the primary type for text editing. It tracks cursor
/// position, maintains undo/redo history, and provides operations for:
///
/// - **Cursor movement**: Lines, words, graphemes, document bounds
/// - **Text editing**: Insert, delete, backspace with cursor tracking
/// - **Line operations**: Duplicate, move, delete lines
/// - **History**: Grouped undo/redo with configurable depth limit
///
/// # History Management
///
/// Edit operations are grouped automatically. Call [`commit`](Self::commit)
/// to force a group boundary (e.g., after a pause in typing). The history depth
/// is bounded (default 1000 groups) to limit memory usage.
#[derive(Default)]
pub struct EditBuffer {
    buffer: TextBuffer,
    cursor: Cursor,
    history: History,
}

impl EditBuffer {
    /// Create a new empty edit buffer.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an edit buffer with initial text.
    #[must_use]
    pub fn with_text(text: &str) -> Self {
        Self {
            buffer: TextBuffer::with_text(text),
            cursor: Cursor::start(),
            history: History::new(),
        }
    }

    /// Create an edit buffer with a custom maximum undo history depth.
    ///
    /// The default is 1000 undo groups. Set a lower value for memory-constrained
    /// environments or a higher value for documents that need extensive undo history.
    #[must_use]
    pub fn with_max_history_depth(max_depth: usize) -> Self {
        Self {
            buffer: TextBuffer::new(),
            cursor: Cursor::start(),
            history: History::with_max_depth(max_depth),
        }
    }

    /// Set the maximum undo history depth.
    ///
    /// If the current history exceeds the new depth, oldest entries will be
    /// pruned on the next commit.
    pub fn set_max_history_depth(&mut self, max_depth: usize) {
        self.history.max_depth = max_depth;
    }

    /// Get the current maximum undo history depth.
    #[must_use]
    pub fn max_history_depth(&self) -> usize {
        self.history.max_depth
    }

    /// Get the underlying text buffer.
    #[must_use]
    pub fn buffer(&self) -> &TextBuffer {
        &self.buffer
    }

    /// Get mutable access to the text buffer.
    pub fn buffer_mut(&mut self) -> &mut TextBuffer {
        &mut self.buffer
    }

    /// Get the full text content.
    #[must_use]
    pub fn text(&self) -> String {
        self.buffer.to_string()
    }

    /// Replace the entire text, resetting cursor and history.
    ///
    /// No-ops if the underlying buffer has been destroyed.
    pub fn set_text(&mut self, text: &str) {
        if self.buffer.set_text(text).is_err() {
            return;
        }
        self.cursor = Cursor::start();
        self.history.clear();
        self.update_cursor_position();
    }

    /// Get the current cursor position.
    #[must_use]
    pub fn cursor(&self) -> Cursor {
        self.cursor
    }

    /// Set the cursor position.
    pub fn set_cursor(&mut self, cursor: Cursor) {
        self.cursor = cursor;
        self.clamp_cursor();
    }

    /// Set the cursor by byte offset.
    pub fn set_cursor_by_offset(&mut self, offset: usize) {
        self.cursor.offset = offset.min(self.buffer.len_bytes());
        self.update_cursor_position();
    }

    /// Get cursor position info.
    #[must_use]
    pub fn get_cursor_position(&self) -> CursorPosition {
        CursorPosition {
            row: self.cursor.row,
            col: self.cursor.col,
            offset: self.cursor.offset,
        }
    }

    /// Move cursor left by one grapheme.
    pub fn move_left(&mut self) {
        if self.cursor.offset > 0 {
            self.cursor.offset = self.prev_grapheme_offset(self.cursor.offset);
            self.update_cursor_position();
        }
    }

    /// Move cursor right by one grapheme.
    pub fn move_right(&mut self) {
        if self.cursor.offset < self.buffer.len_bytes() {
            self.cursor.offset = self.next_grapheme_offset(self.cursor.offset);
            self.update_cursor_position();
        }
    }

    /// Move cursor up.
    pub fn move_up(&mut self) {
        if self.cursor.row > 0 {
            self.cursor.row -= 1;
            self.update_cursor_from_row_col();
        }
    }

    /// Move cursor down.
    pub fn move_down(&mut self) {
        if self.cursor.row + 1 < self.buffer.len_lines() {
            self.cursor.row += 1;
            self.update_cursor_from_row_col();
        }
    }

    /// Move cursor to start of line.
    pub fn move_to_line_start(&mut self) {
        self.cursor.col = 0;
        self.update_cursor_from_row_col();
    }

    /// Move cursor to end of line.
    pub fn move_to_line_end(&mut self) {
        if let Some(line) = self.buffer.line(self.cursor.row) {
            self.cursor.col = trim_terminator(&line).len();
            self.update_cursor_from_row_col();
        }
    }

    /// Move to specific row and (byte) column.
    pub fn move_to(&mut self, row: usize, col: usize) {
        self.cursor.row = row.min(self.buffer.len_lines().saturating_sub(1));
        self.cursor.col = col;
        self.update_cursor_from_row_col();
    }

    /// Jump to a specific line (start of line).
    pub fn goto_line(&mut self, row: usize) {
        let row = row.min(self.buffer.len_lines().saturating_sub(1));
        self.cursor.row = row;
        self.cursor.col = 0;
        self.update_cursor_from_row_col();
    }

    /// Insert text at cursor.
    pub fn insert(&mut self, text: &str) {
        let offset = self.cursor.offset;
        if self.buffer.insert_bytes(offset, text).is_err() {
            return;
        }
        self.history.push(EditOp::Insert {
            offset,
            text: text.to_string(),
        });

        self.cursor.offset = offset + text.len();
        self.update_cursor_position();
    }

    /// Delete the grapheme before the cursor.
    pub fn delete_backward(&mut self) {
        if self.cursor.offset == 0 {
            return;
        }

        let start = self.prev_grapheme_offset(self.cursor.offset);
        let deleted = self.byte_range_text(start, self.cursor.offset);

        if self.buffer.remove_bytes(start, self.cursor.offset).is_err() {
            return;
        }
        self.history.push(EditOp::Delete {
            offset: start,
            text: deleted,
        });

        self.cursor.offset = start;
        self.update_cursor_position();
    }

    /// Delete the grapheme after the cursor.
    pub fn delete_forward(&mut self) {
        if self.cursor.offset >= self.buffer.len_bytes() {
            return;
        }

        let end = self.next_grapheme_offset(self.cursor.offset);
        let deleted = self.byte_range_text(self.cursor.offset, end);

        if self.buffer.remove_bytes(self.cursor.offset, end).is_err() {
            return;
        }
        self.history.push(EditOp::Delete {
            offset: self.cursor.offset,
            text: deleted,
        });

        self.update_cursor_position();
    }

    /// Delete a range between two cursors.
    pub fn delete_range(&mut self, start: Cursor, end: Cursor) {
        let start_offset = start.offset.min(end.offset);
        let end_offset = start.offset.max(end.offset);
        self.delete_range_offsets(start_offset, end_offset);
    }

    /// Delete a range between byte offsets.
    pub fn delete_range_offsets(&mut self, start: usize, end: usize) {
        if start >= end || start >= self.buffer.len_bytes() {
            return;
        }
        let end = end.min(self.buffer.len_bytes());
        let deleted = self.byte_range_text(start, end);

        if self.buffer.remove_bytes(start, end).is_err() {
            return;
        }
        self.history.push(EditOp::Delete {
            offset: start,
            text: deleted,
        });
        self.cursor.offset = start;
        self.update_cursor_position();
    }

    /// Delete the current line (including trailing newline if present).
    pub fn delete_line(&mut self) {
        let line_start = self.buffer.rope().line_to_byte(self.cursor.row);
        if let Some(line) = self.buffer.line(self.cursor.row) {
            let line_end = line_start + line.len();
            self.delete_range_offsets(line_start, line_end);
        }
    }

    /// Duplicate the current line (insert copy below).
    pub fn duplicate_line(&mut self) {
        let line_start = self.buffer.rope().line_to_byte(self.cursor.row);
        if let Some(line_text) = self.buffer.line(self.cursor.row) {
            let insert_pos = line_start + line_text.len();

            // Build the text to insert:
            // - If original line has newline: insert the line as-is (already ends with \n)
            // - If original line has no newline (last line): prepend \n, don't append
            let text_to_insert = if line_text.ends_with('\n') {
                line_text.clone()
            } else {
                format!("\n{line_text}")
            };

            if self.buffer.insert_bytes(insert_pos, &text_to_insert).is_err() {
                return;
            }

            self.history.push(EditOp::Insert {
                offset: insert_pos,
                text: text_to_insert,
            });
            // Move cursor to the duplicated line
            self.cursor.row += 1;
            self.update_cursor_from_row_col();
        }
    }

    /// Move the current line up (swap with the line above).
    pub fn move_line_up(&mut self) {
        if self.cursor.row == 0 {
            return;
        }

        let target_row = self.cursor.row - 1;
        let target_col = self.cursor.col;
        let current_line_start = self.buffer.rope().line_to_byte(self.cursor.row);
        let prev_line_start = self.buffer.rope().line_to_byte(target_row);

        if let (Some(current_text), Some(prev_text)) = (
            self.buffer.line(self.cursor.row),
            self.buffer.line(target_row),
        ) {
            // Delete from start of previous line to end of current line
            let end_pos = current_line_start + current_text.len();
            self.delete_range_offsets(prev_line_start, end_pos);

            // Insert current line first, then previous line
            let new_text = if current_text.ends_with('\n') {
                format!("{current_text}{prev_text}")
            } else if prev_text.ends_with('\n') {
                format!("{current_text}\n{}", trim_terminator(&prev_text))
            } else {
                format!("{current_text}\n{prev_text}")
            };

            if self.buffer.insert_bytes(prev_line_start, &new_text).is_err() {
                return;
            }

            self.history.push(EditOp::Insert {
                offset: prev_line_start,
                text: new_text,
            });

            // Update cursor to the new position (one row up, same column)
            self.cursor.row = target_row;
            self.cursor.col = target_col;
            self.update_cursor_from_row_col();
        }
    }

    /// Move the current line down (swap with the line below).
    pub fn move_line_down(&mut self) {
        let total_lines = self.buffer.len_lines();
        if self.cursor.row >= total_lines.saturating_sub(1) {
            return;
        }

        let target_row = self.cursor.row + 1;
        let target_col = self.cursor.col;
        let current_line_start = self.buffer.rope().line_to_byte(self.cursor.row);
        let next_line_start = self.buffer.rope().line_to_byte(target_row);

        if let (Some(current_text), Some(next_text)) = (
            self.buffer.line(self.cursor.row),
            self.buffer.line(target_row),
        ) {
            // Delete from start of current line to end of next line
            let end_pos = next_line_start + next_text.len();
            self.delete_range_offsets(current_line_start, end_pos);

            // Insert next line first, then current line
            let new_text = if next_text.ends_with('\n') {
                format!("{next_text}{current_text}")
            } else if current_text.ends_with('\n') {
                format!("{next_text}\n{}", trim_terminator(&current_text))
            } else {
                format!("{next_text}\n{current_text}")
            };

            if self
                .buffer
                .insert_bytes(current_line_start, &new_text)
                .is_err()
            {
                return;
            }

            self.history.push(EditOp::Insert {
                offset: current_line_start,
                text: new_text,
            });

            // Update cursor to the new position (one row down, same column)
            self.cursor.row = target_row;
            self.cursor.col = target_col;
            self.update_cursor_from_row_col();
        }
    }

    /// Replace the entire text, clearing history.
    pub fn replace_text(&mut self, text: &str) {
        self.set_text(text);
    }

    /// Get the next word boundary (byte offset).
    #[must_use]
    pub fn get_next_word_boundary(&self) -> usize {
        let text = self.buffer.to_string();
        let start = self.cursor.offset.min(text.len());
        let mut in_word = false;
        let mut last_idx = start;

        for (idx, ch) in text[start..].char_indices().map(|(i, c)| (i + start, c)) {
            let word_char = is_word_char(ch);
            if in_word && !word_char {
                return idx;
            }
            if !in_word && word_char {
                in_word = true;
            }
            last_idx = idx + ch.len_utf8();
        }
        last_idx
    }

    /// Get the previous word boundary (byte offset).
    #[must_use]
    pub fn get_prev_word_boundary(&self) -> usize {
        if self.cursor.offset == 0 {
            return 0;
        }
        let text = self.buffer.to_string();
        let prefix = &text[..self.cursor.offset.min(text.len())];

        let chars: Vec<char> = prefix.chars().collect();
        let mut boundaries: Vec<usize> = prefix.char_indices().map(|(i, _)| i).collect();
        boundaries.push(prefix.len());

        let mut idx = chars.len();
        // Skip any non-word characters first
        while idx > 0 {
            if is_word_char(chars[idx - 1]) {
                break;
            }
            idx -= 1;
        }
        // Then skip word characters
        while idx > 0 {
            if !is_word_char(chars[idx - 1]) {
                break;
            }
            idx -= 1;
        }
        boundaries[idx]
    }

    /// Move cursor to the next word boundary.
    pub fn move_word_right(&mut self) {
        let boundary = self.get_next_word_boundary();
        self.set_cursor_by_offset(boundary);
    }

    /// Move cursor to the previous word boundary.
    pub fn move_word_left(&mut self) {
        let boundary = self.get_prev_word_boundary();
        self.set_cursor_by_offset(boundary);
    }

    /// Delete from cursor to the next word boundary.
    pub fn delete_word_forward(&mut self) {
        let end = self.get_next_word_boundary();
        if end > self.cursor.offset {
            self.delete_range_offsets(self.cursor.offset, end);
        }
    }

    /// Delete from cursor to the previous word boundary.
    pub fn delete_word_backward(&mut self) {
        let start = self.get_prev_word_boundary();
        if start < self.cursor.offset {
            self.delete_range_offsets(start, self.cursor.offset);
        }
    }

    /// Get end of line byte offset for current line.
    #[must_use]
    pub fn get_eol(&self) -> usize {
        if let Some(line) = self.buffer.line(self.cursor.row) {
            let line_start = self.buffer.rope().line_to_byte(self.cursor.row);
            line_start + trim_terminator(&line).len()
        } else {
            self.cursor.offset
        }
    }

    /// Undo the last edit.
    pub fn undo(&mut self) -> bool {
        let Some(ops) = self.history.pop_undo() else {
            return false;
        };

        let mut redo_ops = Vec::new();
        for op in ops.into_iter().rev() {
            self.apply_op(&op.invert());
            redo_ops.push(op);
        }
        redo_ops.reverse();
        self.history.push_redo(redo_ops);

        true
    }

    /// Redo the last undone edit.
    pub fn redo(&mut self) -> bool {
        let Some(ops) = self.history.pop_redo() else {
            return false;
        };

        for op in &ops {
            self.apply_op(op);
        }
        self.history.undo_stack.push(ops);

        true
    }

    /// Check if undo is available.
    #[must_use]
    pub fn can_undo(&self) -> bool {
        self.history.can_undo()
    }

    /// Check if redo is available.
    #[must_use]
    pub fn can_redo(&self) -> bool {
        self.history.can_redo()
    }

    /// Commit current edits as an undo group.
    pub fn commit(&mut self) {
        self.history.commit();
    }

    /// Clear the undo/redo history.
    ///
    /// This removes all undo and redo entries. Useful when loading new content
    /// where previous history is no longer relevant.
    pub fn clear_history(&mut self) {
        self.history.clear();
    }

    fn apply_op(&mut self, op: &EditOp) {
        match op {
            EditOp::Insert { offset, text } => {
                if self.buffer.insert_bytes(*offset, text).is_err() {
                    return;
                }
                self.cursor.offset = offset + text.len();
            }
            EditOp::Delete { offset, text } => {
                let end = offset + text.len();
                if self.buffer.remove_bytes(*offset, end).is_err() {
                    return;
                }
                self.cursor.offset = *offset;
            }
        }
        self.update_cursor_position();
    }

    fn byte_range_text(&self, start: usize, end: usize) -> String {
        let rope = self.buffer.rope();
        let start_char = rope.byte_to_char(start);
        let end_char = rope.byte_to_char(end);
        rope.slice(start_char..end_char).to_string()
    }

    fn prev_grapheme_offset(&self, offset: usize) -> usize {
        if offset == 0 {
            return 0;
        }
        let text = self.buffer.to_string();
        get_prev_grapheme_start(&text, offset, self.buffer.tab_width())
            .map_or(0, |(start, _)| start)
    }

    fn next_grapheme_offset(&self, offset: usize) -> usize {
        let text = self.buffer.to_string();
        if offset >= text.len() {
            return text.len();
        }
        text[offset..]
            .grapheme_indices(true)
            .next()
            .map_or(text.len(), |(_, g)| offset + g.len())
    }

    fn update_cursor_position(&mut self) {
        let rope = self.buffer.rope();
        let offset = self.cursor.offset.min(rope.len_bytes());
        self.cursor.row = rope.byte_to_line(offset);
        let line_start = rope.line_to_byte(self.cursor.row);
        self.cursor.col = offset.saturating_sub(line_start);
    }

    fn update_cursor_from_row_col(&mut self) {
        let line_start = self.buffer.rope().line_to_byte(self.cursor.row);

        if let Some(line) = self.buffer.line(self.cursor.row) {
            let line_len = trim_terminator(&line).len();
            self.cursor.col = self.cursor.col.min(line_len);
        }

        self.cursor.offset = line_start + self.cursor.col;
    }

    fn clamp_cursor(&mut self) {
        self.cursor.offset = self.cursor.offset.min(self.buffer.len_bytes());
        self.update_cursor_position();
    }
}

fn trim_terminator(line: &str) -> &str {
    line.trim_end_matches(|c| c == '\n' || c == '\r')
}
