//! Editor view with visual cursor, selection, placeholder, and tab indicator.
//!
//! This is the editable half of the text engine: it wraps an [`EditBuffer`]
//! with visual (wrap-aware) cursor navigation, a selection, and the styled
//! extras a host editor widget needs (empty-buffer placeholder text, a tab
//! indicator glyph). It draws no cells itself — an external renderer reads
//! [`TextBufferView::line_info`] and this view's cursor/selection queries to
//! decide what to paint.

// if-let-else is clearer than map_or for complex logic
#![allow(clippy::option_if_let_else)]

use crate::color::Rgba;
use crate::style::Style;
use crate::text::layout::{self, VirtualLine};
use crate::text::view::{LocalSelection, Selection, Viewport};
use crate::text::{EditBuffer, TextBufferView, WrapMode};
use crate::unicode::WidthMethod;
use crate::unicode::search::{calculate_text_width, find_position_by_width};
use unicode_segmentation::UnicodeSegmentation;

/// Cursor style for rendering.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum CursorShape {
    /// Block cursor.
    #[default]
    Block,
    /// Underline cursor.
    Underline,
    /// Vertical bar cursor.
    Bar,
}

/// Visual cursor information in wrapped view.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct VisualCursor {
    pub visual_row: u32,
    pub visual_col: u32,
    pub logical_row: u32,
    pub logical_col: u32,
    pub offset: u32,
}

/// A styled run of placeholder text, shown when the buffer is empty.
#[derive(Clone, Debug, PartialEq)]
pub struct PlaceholderChunk {
    pub text: String,
    pub style: Style,
}

impl PlaceholderChunk {
    /// Create a new placeholder chunk.
    #[must_use]
    pub fn new(text: impl Into<String>, style: Style) -> Self {
        Self {
            text: text.into(),
            style,
        }
    }

    /// Create an unstyled placeholder chunk.
    #[must_use]
    pub fn plain(text: impl Into<String>) -> Self {
        Self::new(text, Style::NONE)
    }
}

/// Editor view wrapping an `EditBuffer` with visual rendering.
pub struct EditorView {
    edit_buffer: EditBuffer,
    cursor_style: Style,
    cursor_shape: CursorShape,
    selection_style: Style,
    wrap_mode: WrapMode,
    scroll_x: u32,
    scroll_y: u32,
    line_numbers: bool,
    line_number_style: Style,
    viewport: Option<Viewport>,
    scroll_margin: f32,
    selection_follow_cursor: bool,
    selection: Option<Selection>,
    local_selection: Option<LocalSelection>,
    placeholder: Vec<PlaceholderChunk>,
    tab_indicator: Option<(char, Rgba)>,
}

impl EditorView {
    /// Create a new editor view.
    #[must_use]
    pub fn new(edit_buffer: EditBuffer) -> Self {
        Self {
            edit_buffer,
            cursor_style: Style::builder().inverse().build(),
            cursor_shape: CursorShape::Block,
            selection_style: Style::builder().bg(Rgba::from_rgb_u8(60, 60, 120)).build(),
            wrap_mode: WrapMode::None,
            scroll_x: 0,
            scroll_y: 0,
            line_numbers: false,
            line_number_style: Style::dim(),
            viewport: None,
            scroll_margin: 0.1,
            selection_follow_cursor: false,
            selection: None,
            local_selection: None,
            placeholder: Vec::new(),
            tab_indicator: None,
        }
    }

    /// Create an empty editor view.
    #[must_use]
    pub fn empty() -> Self {
        Self::new(EditBuffer::new())
    }

    /// Get the edit buffer.
    #[must_use]
    pub fn edit_buffer(&self) -> &EditBuffer {
        &self.edit_buffer
    }

    /// Get mutable access to the edit buffer.
    pub fn edit_buffer_mut(&mut self) -> &mut EditBuffer {
        &mut self.edit_buffer
    }

    /// Set cursor style.
    pub fn set_cursor_style(&mut self, style: Style) {
        self.cursor_style = style;
    }

    /// Set cursor shape.
    pub fn set_cursor_shape(&mut self, shape: CursorShape) {
        self.cursor_shape = shape;
    }

    /// Get the current cursor shape.
    #[must_use]
    pub fn cursor_shape(&self) -> CursorShape {
        self.cursor_shape
    }

    /// Set selection style.
    pub fn set_selection_style(&mut self, style: Style) {
        self.selection_style = style;
    }

    /// Set wrap mode.
    pub fn set_wrap_mode(&mut self, mode: WrapMode) {
        self.wrap_mode = mode;
    }

    /// Get the current wrap mode.
    #[must_use]
    pub fn wrap_mode(&self) -> WrapMode {
        self.wrap_mode
    }

    /// Set the viewport.
    pub fn set_viewport(&mut self, x: u32, y: u32, width: u32, height: u32) {
        self.viewport = Some(Viewport::new(x, y, width, height));
    }

    /// Set scroll margin (0.0-0.5 of viewport).
    pub fn set_scroll_margin(&mut self, margin: f32) {
        self.scroll_margin = margin.clamp(0.0, 0.5);
    }

    /// Enable or disable selection following the cursor.
    pub fn set_selection_follow_cursor(&mut self, enabled: bool) {
        self.selection_follow_cursor = enabled;
    }

    /// Enable or disable line numbers.
    pub fn set_line_numbers(&mut self, enabled: bool) {
        self.line_numbers = enabled;
    }

    /// Set line number style.
    pub fn set_line_number_style(&mut self, style: Style) {
        self.line_number_style = style;
    }

    /// Set the placeholder text shown when the buffer is empty.
    pub fn set_placeholder(&mut self, chunks: Vec<PlaceholderChunk>) {
        self.placeholder = chunks;
    }

    /// Get the placeholder chunks.
    #[must_use]
    pub fn placeholder(&self) -> &[PlaceholderChunk] {
        &self.placeholder
    }

    /// Clear the placeholder text.
    pub fn clear_placeholder(&mut self) {
        self.placeholder.clear();
    }

    /// Whether the placeholder should currently be shown (buffer is empty).
    #[must_use]
    pub fn should_show_placeholder(&self) -> bool {
        !self.placeholder.is_empty() && self.edit_buffer.buffer().len_bytes() == 0
    }

    /// Set the glyph and color used in place of a literal tab character.
    pub fn set_tab_indicator(&mut self, glyph: char, color: Rgba) {
        self.tab_indicator = Some((glyph, color));
    }

    /// Get the tab indicator glyph and color, if set.
    #[must_use]
    pub fn tab_indicator(&self) -> Option<(char, Rgba)> {
        self.tab_indicator
    }

    /// Clear the tab indicator, falling back to rendering tabs as blank columns.
    pub fn clear_tab_indicator(&mut self) {
        self.tab_indicator = None;
    }

    /// Set selection range by byte offsets.
    pub fn set_selection(&mut self, start: usize, end: usize) {
        self.selection = Some(Selection::new(start, end, self.selection_style));
    }

    /// Extend the active selection to a new end offset without moving the cursor.
    ///
    /// Starts a new zero-width selection at `end` if none exists yet.
    pub fn update_selection(&mut self, end: usize) {
        if let Some(sel) = &mut self.selection {
            sel.end = end;
        } else {
            self.selection = Some(Selection::new(end, end, self.selection_style));
        }
    }

    /// Clear selection range.
    pub fn clear_selection(&mut self) {
        self.selection = None;
    }

    /// Clear selection range (alias for [`clear_selection`](Self::clear_selection)).
    pub fn reset_selection(&mut self) {
        self.clear_selection();
    }

    /// Delete selected text (offset-based selection).
    pub fn delete_selected_text(&mut self) {
        if let Some(sel) = self.selection.take() {
            self.edit_buffer
                .delete_range_offsets(sel.start.min(sel.end), sel.start.max(sel.end));
        }
    }

    /// Set a local (viewport) selection.
    ///
    /// Unlike [`TextBufferView::set_local_selection`], this can't materialize
    /// a byte-offset [`Selection`] immediately: wrapping depends on a
    /// viewport width this view doesn't own until render time. Use
    /// [`Self::local_selection_range`] to resolve it once that width is
    /// known.
    pub fn set_local_selection(
        &mut self,
        anchor_x: u32,
        anchor_y: u32,
        focus_x: u32,
        focus_y: u32,
    ) {
        self.local_selection = Some(LocalSelection::new(
            anchor_x,
            anchor_y,
            focus_x,
            focus_y,
            self.selection_style,
        ));
    }

    /// Clear local selection.
    pub fn clear_local_selection(&mut self) {
        self.local_selection = None;
    }

    /// Resolve the current local (viewport) selection into a normalized byte
    /// range, for the given viewport size.
    ///
    /// `row`/`column` snap to grapheme-cluster boundaries the same way
    /// [`Self::offset_at_visual_col`] does. Returns `None` if no local
    /// selection is set.
    #[must_use]
    pub fn local_selection_range(
        &self,
        viewport_width: u32,
        viewport_height: u32,
    ) -> Option<(usize, usize)> {
        let sel = self.local_selection?;
        let gutter_width = if self.line_numbers {
            self.gutter_width()
        } else {
            0
        };
        let text_width = viewport_width.saturating_sub(gutter_width);
        let vlines = self.build_virtual_lines(text_width, viewport_height);
        if vlines.is_empty() {
            return Some((0, 0));
        }

        let anchor_row = (sel.anchor_y as usize).min(vlines.len() - 1);
        let focus_row = (sel.focus_y as usize).min(vlines.len() - 1);
        let anchor = self.offset_at_visual_col(&vlines[anchor_row], sel.anchor_x as usize);
        let focus = self.offset_at_visual_col(&vlines[focus_row], sel.focus_x as usize);

        Some((anchor.min(focus), anchor.max(focus)))
    }

    /// Start a new selection at current cursor position.
    pub fn start_selection(&mut self) {
        let offset = self.edit_buffer.cursor().offset;
        self.selection = Some(Selection::new(offset, offset, self.selection_style));
    }

    /// Extend selection to current cursor position.
    ///
    /// If no selection exists, starts a new selection at the cursor.
    pub fn extend_selection_to_cursor(&mut self) {
        if let Some(sel) = &mut self.selection {
            sel.end = self.edit_buffer.cursor().offset;
        } else {
            self.start_selection();
        }
    }

    /// Get the selected text, if any.
    ///
    /// Returns the text between selection start and end, regardless of direction.
    /// Returns `None` if there is no selection or if the selection is empty.
    #[must_use]
    pub fn selected_text(&self) -> Option<String> {
        let sel = self.selection?;
        let (start, end) = (sel.start.min(sel.end), sel.start.max(sel.end));
        if start == end {
            return None; // Empty selection
        }
        let rope = self.edit_buffer.buffer().rope();
        let start_char = rope.byte_to_char(start);
        let end_char = rope.byte_to_char(end);
        Some(rope.slice(start_char..end_char).to_string())
    }

    /// Scroll to make cursor visible.
    pub fn scroll_to_cursor(&mut self, viewport_width: u32, viewport_height: u32) {
        let cursor = self.edit_buffer.cursor();
        let gutter_width = if self.line_numbers {
            self.gutter_width()
        } else {
            0
        };
        let text_width = viewport_width.saturating_sub(gutter_width);

        let margin_rows = (viewport_height as f32 * self.scroll_margin).ceil() as u32;
        let margin_cols = (text_width as f32 * self.scroll_margin).ceil() as u32;

        let (visual_row, visual_col) = if self.wrap_mode == WrapMode::None {
            (cursor.row as u32, cursor.col as u32)
        } else {
            let view = TextBufferView::new(self.edit_buffer.buffer())
                .viewport(0, 0, text_width, viewport_height)
                .wrap_mode(self.wrap_mode);
            view.visual_position_for_byte(cursor.offset)
        };

        // Vertical scrolling
        if visual_row < self.scroll_y + margin_rows {
            self.scroll_y = visual_row.saturating_sub(margin_rows);
        } else if visual_row >= self.scroll_y + viewport_height.saturating_sub(margin_rows) {
            self.scroll_y =
                visual_row.saturating_sub(viewport_height.saturating_sub(margin_rows + 1));
        }

        // Horizontal scrolling (if not wrapping)
        if self.wrap_mode == WrapMode::None {
            if visual_col < self.scroll_x + margin_cols {
                self.scroll_x = visual_col.saturating_sub(margin_cols);
            } else if visual_col >= self.scroll_x + text_width.saturating_sub(margin_cols) {
                self.scroll_x =
                    visual_col.saturating_sub(text_width.saturating_sub(margin_cols + 1));
            }
        } else {
            self.scroll_x = 0;
        }

        if self.selection_follow_cursor {
            if let Some(sel) = &mut self.selection {
                sel.end = cursor.offset;
            }
        }
    }

    /// Set scroll position.
    pub fn set_scroll(&mut self, x: u32, y: u32) {
        self.scroll_x = x;
        self.scroll_y = y;
    }

    /// Get scroll position.
    #[must_use]
    pub fn scroll(&self) -> (u32, u32) {
        (self.scroll_x, self.scroll_y)
    }

    /// Move cursor up one visual line (accounts for wrapping).
    ///
    /// In wrapped mode, this moves up within a wrapped line segment.
    /// In non-wrapped mode, this is equivalent to move_up().
    pub fn move_up_visual(&mut self, viewport_width: u32, viewport_height: u32) {
        if self.wrap_mode == WrapMode::None {
            self.edit_buffer.move_up();
            return;
        }

        let gutter_width = if self.line_numbers {
            self.gutter_width()
        } else {
            0
        };
        let text_width = viewport_width.saturating_sub(gutter_width);
        let vlines = self.build_virtual_lines(text_width, viewport_height);

        let cursor = self.edit_buffer.cursor();
        let current_vline_idx = Self::find_vline_index(&vlines, cursor.offset);

        if current_vline_idx == 0 {
            return; // Already at top
        }

        let current_vline = &vlines[current_vline_idx];
        let visual_col = self.visual_col_in_vline(current_vline, cursor.offset);

        let prev_vline = &vlines[current_vline_idx - 1];
        let target_offset = self.offset_at_visual_col(prev_vline, visual_col);
        self.edit_buffer.set_cursor_by_offset(target_offset);
    }

    /// Move cursor down one visual line (accounts for wrapping).
    ///
    /// In wrapped mode, this moves down within a wrapped line segment.
    /// In non-wrapped mode, this is equivalent to move_down().
    pub fn move_down_visual(&mut self, viewport_width: u32, viewport_height: u32) {
        if self.wrap_mode == WrapMode::None {
            self.edit_buffer.move_down();
            return;
        }

        let gutter_width = if self.line_numbers {
            self.gutter_width()
        } else {
            0
        };
        let text_width = viewport_width.saturating_sub(gutter_width);
        let vlines = self.build_virtual_lines(text_width, viewport_height);

        let cursor = self.edit_buffer.cursor();
        let current_vline_idx = Self::find_vline_index(&vlines, cursor.offset);

        if current_vline_idx + 1 >= vlines.len() {
            return; // Already at bottom
        }

        let current_vline = &vlines[current_vline_idx];
        let visual_col = self.visual_col_in_vline(current_vline, cursor.offset);

        let next_vline = &vlines[current_vline_idx + 1];
        let target_offset = self.offset_at_visual_col(next_vline, visual_col);
        self.edit_buffer.set_cursor_by_offset(target_offset);
    }

    /// Get the start of the current visual line (byte offset).
    ///
    /// In wrapped mode, returns the start of the current wrapped segment.
    /// In non-wrapped mode, returns the start of the logical line.
    #[must_use]
    pub fn get_visual_sol(&self, viewport_width: u32, viewport_height: u32) -> usize {
        if self.wrap_mode == WrapMode::None {
            let cursor = self.edit_buffer.cursor();
            return self.edit_buffer.buffer().rope().line_to_byte(cursor.row);
        }

        let gutter_width = if self.line_numbers {
            self.gutter_width()
        } else {
            0
        };
        let text_width = viewport_width.saturating_sub(gutter_width);
        let vlines = self.build_virtual_lines(text_width, viewport_height);

        let cursor = self.edit_buffer.cursor();
        let idx = Self::find_vline_index(&vlines, cursor.offset);
        if idx < vlines.len() {
            return vlines[idx].byte_start;
        }

        cursor.offset
    }

    /// Get the end of the current visual line (byte offset).
    ///
    /// In wrapped mode, returns the end of the current wrapped segment.
    /// In non-wrapped mode, returns the end of the logical line (before newline).
    #[must_use]
    pub fn get_visual_eol(&self, viewport_width: u32, viewport_height: u32) -> usize {
        if self.wrap_mode == WrapMode::None {
            return self.edit_buffer.get_eol();
        }

        let gutter_width = if self.line_numbers {
            self.gutter_width()
        } else {
            0
        };
        let text_width = viewport_width.saturating_sub(gutter_width);
        let vlines = self.build_virtual_lines(text_width, viewport_height);

        let cursor = self.edit_buffer.cursor();
        let idx = Self::find_vline_index(&vlines, cursor.offset);
        if idx < vlines.len() {
            return vlines[idx].byte_end;
        }

        cursor.offset
    }

    /// Move cursor to start of visual line.
    pub fn move_to_visual_sol(&mut self, viewport_width: u32, viewport_height: u32) {
        let sol = self.get_visual_sol(viewport_width, viewport_height);
        self.edit_buffer.set_cursor_by_offset(sol);
    }

    /// Move cursor to end of visual line.
    pub fn move_to_visual_eol(&mut self, viewport_width: u32, viewport_height: u32) {
        let eol = self.get_visual_eol(viewport_width, viewport_height);
        self.edit_buffer.set_cursor_by_offset(eol);
    }

    /// Get visual cursor info for a given viewport size.
    #[must_use]
    pub fn visual_cursor(&self, viewport_width: u32, viewport_height: u32) -> VisualCursor {
        let cursor = self.edit_buffer.cursor();
        let gutter_width = if self.line_numbers {
            self.gutter_width()
        } else {
            0
        };
        let text_width = viewport_width.saturating_sub(gutter_width);
        let view = TextBufferView::new(self.edit_buffer.buffer())
            .viewport(0, 0, text_width, viewport_height)
            .wrap_mode(self.wrap_mode);
        let (visual_row, visual_col) = if self.wrap_mode == WrapMode::None {
            (cursor.row as u32, cursor.col as u32)
        } else {
            view.visual_position_for_byte(cursor.offset)
        };

        VisualCursor {
            visual_row,
            visual_col,
            logical_row: cursor.row as u32,
            logical_col: cursor.col as u32,
            offset: cursor.offset as u32,
        }
    }

    /// Get visual cursor info (alias for [`visual_cursor`](Self::visual_cursor)).
    #[must_use]
    pub fn get_visual_cursor(&self, viewport_width: u32, viewport_height: u32) -> VisualCursor {
        self.visual_cursor(viewport_width, viewport_height)
    }

    /// Calculate gutter width for line numbers.
    #[must_use]
    pub fn gutter_width(&self) -> u32 {
        if !self.line_numbers {
            return 0;
        }

        let line_count = self.edit_buffer.buffer().len_lines().max(1);
        let digits = line_count.ilog10() + 1;
        digits + 2 // digit count + padding
    }

    /// Build virtual line information for visual navigation, delegating the
    /// wrap algorithm to [`layout::wrap_line`].
    fn build_virtual_lines(&self, text_width: u32, _viewport_height: u32) -> Vec<VirtualLine> {
        let mut lines = Vec::new();
        let buffer = self.edit_buffer.buffer();
        let rope = buffer.rope();
        let method = buffer.width_method();
        let tab_width = buffer.tab_width().max(1) as usize;
        let wrap_width = if self.wrap_mode != WrapMode::None && text_width > 0 {
            Some(text_width as usize)
        } else {
            None
        };

        for line_idx in 0..buffer.len_lines() {
            let Some(line) = buffer.line(line_idx) else {
                continue;
            };
            let line = line.trim_end_matches('\n').trim_end_matches('\r');
            let line_start_byte = rope.line_to_byte(line_idx);

            lines.extend(layout::wrap_line(
                line_idx,
                line_start_byte,
                line,
                self.wrap_mode,
                wrap_width,
                tab_width,
                method,
            ));
        }

        lines
    }

    /// Find the virtual line index for a byte offset, handling cursor at newline positions.
    fn find_vline_index(vlines: &[VirtualLine], byte_offset: usize) -> usize {
        for (idx, vline) in vlines.iter().enumerate() {
            let is_last = idx == vlines.len() - 1;
            if byte_offset < vline.byte_start {
                continue;
            }
            // Cursor is within this line
            if byte_offset < vline.byte_end {
                return idx;
            }
            // Cursor is at byte_end (e.g., at newline position)
            if byte_offset == vline.byte_end {
                if is_last {
                    return idx;
                }
                // Check if next line is a different source line (new logical line)
                let next_vline = &vlines[idx + 1];
                if next_vline.source_line != vline.source_line {
                    return idx;
                }
                // Next line is wrap continuation, continue searching
            }
        }
        // Fallback to last line
        vlines.len().saturating_sub(1)
    }

    /// Find the byte offset at a target visual column within a virtual line.
    ///
    /// Under [`WidthMethod::WcWidth`] (the default), `find_position_by_width`'s
    /// width accounting matches [`crate::unicode::display_width_with_method`]
    /// exactly, so the shared helper is used directly; the other methods use
    /// grapheme clustering or ambiguous-width rules it doesn't model, so they
    /// fall back to walking graphemes here.
    fn offset_at_visual_col(&self, vline: &VirtualLine, target_col: usize) -> usize {
        let rope = self.edit_buffer.buffer().rope();
        let char_start = rope.byte_to_char(vline.byte_start);
        let char_end = rope.byte_to_char(vline.byte_end);
        let line = rope.slice(char_start..char_end).to_string();

        let method = self.edit_buffer.buffer().width_method();
        let tab_width = self.edit_buffer.buffer().tab_width().max(1);

        if method == WidthMethod::WcWidth {
            let offset = find_position_by_width(&line, target_col as u32, tab_width);
            return (vline.byte_start + offset).min(vline.byte_end);
        }

        let tab_width = tab_width as usize;
        let mut current_col = 0usize;
        let mut byte_offset = vline.byte_start;

        for (byte_idx, grapheme) in line.grapheme_indices(true) {
            if current_col >= target_col {
                break;
            }

            let g_width = if grapheme == "\t" {
                let offset = current_col % tab_width;
                tab_width - offset
            } else {
                crate::unicode::display_width_with_method(grapheme, method)
            };

            current_col += g_width;
            byte_offset = vline.byte_start + byte_idx + grapheme.len();
        }

        byte_offset.min(vline.byte_end)
    }

    /// Calculate the visual column of a byte offset within a virtual line.
    fn visual_col_in_vline(&self, vline: &VirtualLine, byte_offset: usize) -> usize {
        let rope = self.edit_buffer.buffer().rope();
        let char_start = rope.byte_to_char(vline.byte_start);
        let char_end = rope.byte_to_char(byte_offset.min(vline.byte_end));
        let line = rope.slice(char_start..char_end).to_string();

        let method = self.edit_buffer.buffer().width_method();
        let tab_width = self.edit_buffer.buffer().tab_width().max(1);

        if method == WidthMethod::WcWidth {
            return calculate_text_width(&line, tab_width) as usize;
        }

        let tab_width = tab_width as usize;
        let mut width = 0usize;
        for grapheme in line.graphemes(true) {
            if grapheme == "\t" {
                let offset = width % tab_width;
                width += tab_width - offset;
            } else {
                width += crate::unicode::display_width_with_method(grapheme, method);
            }
        }

        width
    }
}

impl Default for EditorView {
    fn default() -> Self {
        Self::empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_editor_view_basic() {
        let edit = EditBuffer::with_text("Hello\nWorld");
        let view = EditorView::new(edit);
        assert_eq!(view.edit_buffer().text(), "Hello\nWorld");
    }

    #[test]
    fn test_editor_scroll_to_cursor() {
        let mut edit = EditBuffer::with_text("Line 1\nLine 2\nLine 3\nLine 4\nLine 5");
        edit.move_to(4, 0);
        let mut view = EditorView::new(edit);

        view.scroll_to_cursor(80, 3);
        assert!(view.scroll_y >= 2);
    }

    #[test]
    fn test_local_selection_range_resolves_to_bytes() {
        let edit = EditBuffer::with_text("hello world");
        let mut view = EditorView::new(edit);
        view.set_local_selection(0, 0, 5, 0);
        assert_eq!(view.local_selection_range(80, 24), Some((0, 5)));
    }

    #[test]
    fn test_local_selection_range_none_when_unset() {
        let edit = EditBuffer::with_text("hello world");
        let view = EditorView::new(edit);
        assert_eq!(view.local_selection_range(80, 24), None);
    }

    #[test]
    fn test_gutter_width() {
        let edit = EditBuffer::with_text(&"x\n".repeat(100));
        let mut view = EditorView::new(edit);
        view.set_line_numbers(true);

        // 100 lines = 3 digits + 2 padding = 5
        assert_eq!(view.gutter_width(), 5);
    }

    #[test]
    fn test_placeholder_shown_only_when_empty() {
        let mut view = EditorView::empty();
        assert!(!view.should_show_placeholder(), "no placeholder set yet");

        view.set_placeholder(vec![PlaceholderChunk::plain("Type something...")]);
        assert!(view.should_show_placeholder());

        view.edit_buffer_mut().insert("x");
        assert!(!view.should_show_placeholder(), "buffer is no longer empty");
    }

    #[test]
    fn test_tab_indicator_round_trip() {
        let mut view = EditorView::empty();
        assert_eq!(view.tab_indicator(), None);

        view.set_tab_indicator('\u{2192}', Rgba::from_rgb_u8(128, 128, 128));
        assert_eq!(
            view.tab_indicator(),
            Some(('\u{2192}', Rgba::from_rgb_u8(128, 128, 128)))
        );

        view.clear_tab_indicator();
        assert_eq!(view.tab_indicator(), None);
    }

    // =========================================================================
    // Visual Navigation Tests
    // =========================================================================

    #[test]
    fn test_visual_move_up_no_wrap() {
        let text = "Line 1\nLine 2\nLine 3";
        let mut edit = EditBuffer::with_text(text);
        edit.move_to(1, 3); // Middle of line 2
        let mut view = EditorView::new(edit);
        view.set_wrap_mode(WrapMode::None);

        let cursor = view.edit_buffer().cursor();
        assert_eq!(cursor.row, 1);

        view.move_up_visual(80, 24);

        let cursor = view.edit_buffer().cursor();
        assert_eq!(cursor.row, 0, "Should move to line 0");
    }

    #[test]
    fn test_visual_move_up_with_wrap() {
        // Create text where second line wraps at width 10
        let text = "Short\nabcdefghij12345\nEnd";
        let mut edit = EditBuffer::with_text(text);
        edit.move_to(1, 12); // In the wrapped portion of line 1
        let mut view = EditorView::new(edit);
        view.set_wrap_mode(WrapMode::Char);

        let initial_visual_row = view.visual_cursor(10, 24).visual_row;

        view.move_up_visual(10, 24);

        let visual = view.visual_cursor(10, 24);
        assert!(
            visual.visual_row < initial_visual_row,
            "Visual row should decrease"
        );
    }

    #[test]
    fn test_visual_move_up_within_wrapped_line() {
        // Single line that wraps multiple times
        let text = "abcdefghijklmnopqrstuvwxyz";
        let mut edit = EditBuffer::with_text(text);
        edit.move_to(0, 15); // In the middle, past first wrap
        let mut view = EditorView::new(edit);
        view.set_wrap_mode(WrapMode::Char);

        let visual = view.visual_cursor(10, 24);
        assert_eq!(
            visual.visual_row, 1,
            "Should start on visual line 1 (second wrap segment)"
        );

        view.move_up_visual(10, 24);

        let cursor = view.edit_buffer().cursor();
        let visual = view.visual_cursor(10, 24);
        assert_eq!(cursor.row, 0, "Should stay on logical line 0");
        assert_eq!(visual.visual_row, 0, "Should move to visual line 0");
    }

    #[test]
    fn test_visual_move_down_no_wrap() {
        let text = "Line 1\nLine 2\nLine 3";
        let mut edit = EditBuffer::with_text(text);
        edit.move_to(0, 3);
        let mut view = EditorView::new(edit);
        view.set_wrap_mode(WrapMode::None);

        view.move_down_visual(80, 24);

        let cursor = view.edit_buffer().cursor();
        assert_eq!(cursor.row, 1, "Should move to line 1");
    }

    #[test]
    fn test_visual_move_down_with_wrap() {
        let text = "abcdefghij12345\nEnd";
        let mut edit = EditBuffer::with_text(text);
        edit.move_to(0, 5); // In first wrap segment
        let mut view = EditorView::new(edit);
        view.set_wrap_mode(WrapMode::Char);

        let visual = view.visual_cursor(10, 24);
        assert_eq!(visual.visual_row, 0);

        view.move_down_visual(10, 24);

        let cursor = view.edit_buffer().cursor();
        let visual = view.visual_cursor(10, 24);
        assert_eq!(visual.visual_row, 1, "Should move to visual line 1");
        assert_eq!(cursor.row, 0, "Should still be on logical line 0");
    }

    #[test]
    fn test_visual_move_down_within_wrapped_line() {
        let text = "abcdefghijklmnopqrstuvwxyz";
        let mut edit = EditBuffer::with_text(text);
        edit.move_to(0, 5); // In the first visual line
        let mut view = EditorView::new(edit);
        view.set_wrap_mode(WrapMode::Char);

        let visual = view.visual_cursor(10, 24);
        assert_eq!(visual.visual_row, 0);

        view.move_down_visual(10, 24);

        let cursor = view.edit_buffer().cursor();
        let visual = view.visual_cursor(10, 24);
        assert_eq!(cursor.row, 0, "Should stay on logical line 0");
        assert_eq!(
            visual.visual_row, 1,
            "Should move to visual line 1 (second wrap segment)"
        );
    }

    #[test]
    fn test_visual_line_start() {
        let text = "abcdefghij12345";
        let mut edit = EditBuffer::with_text(text);
        edit.move_to(0, 12); // In the wrapped portion
        let mut view = EditorView::new(edit);
        view.set_wrap_mode(WrapMode::Char);

        let sol = view.get_visual_sol(10, 24);
        // Cursor is at byte 12, in the second visual line (bytes 10-14)
        assert_eq!(
            sol, 10,
            "Visual line start should be 10 (start of wrap segment)"
        );
    }

    #[test]
    fn test_visual_line_end() {
        let text = "abcdefghij12345";
        let mut edit = EditBuffer::with_text(text);
        edit.move_to(0, 5); // In the first visual line
        let mut view = EditorView::new(edit);
        view.set_wrap_mode(WrapMode::Char);

        let eol = view.get_visual_eol(10, 24);
        // First visual line covers bytes 0-9, so EOL should be 10
        assert_eq!(
            eol, 10,
            "Visual line end should be 10 (end of first wrap segment)"
        );
    }

    #[test]
    fn test_visual_nav_preserves_column() {
        let text = "Short\nMedium line\nAnother short";
        let mut edit = EditBuffer::with_text(text);
        edit.move_to(1, 8); // Column 8 in "Medium line"
        let mut view = EditorView::new(edit);
        view.set_wrap_mode(WrapMode::None);

        let cursor = view.edit_buffer().cursor();
        assert_eq!(cursor.col, 8);

        // Move up - "Short" only has 5 bytes, so col should clamp
        view.move_up_visual(80, 24);
        let cursor = view.edit_buffer().cursor();
        assert_eq!(cursor.row, 0);

        // Move down twice
        view.move_down_visual(80, 24);
        view.move_down_visual(80, 24);
        let cursor = view.edit_buffer().cursor();
        assert_eq!(cursor.row, 2);
    }

    #[test]
    fn test_visual_nav_at_buffer_start() {
        let text = "Line 1\nLine 2";
        let mut edit = EditBuffer::with_text(text);
        edit.move_to(0, 0);
        let mut view = EditorView::new(edit);
        view.set_wrap_mode(WrapMode::None);

        view.move_up_visual(80, 24);

        let cursor = view.edit_buffer().cursor();
        assert_eq!(cursor.row, 0, "Should stay at start row");
        assert_eq!(cursor.col, 0, "Should stay at start col");
    }

    #[test]
    fn test_visual_nav_at_buffer_end() {
        let text = "Line 1\nLine 2";
        let mut edit = EditBuffer::with_text(text);
        edit.move_to(1, 6);
        let mut view = EditorView::new(edit);
        view.set_wrap_mode(WrapMode::None);

        view.move_down_visual(80, 24);

        let cursor = view.edit_buffer().cursor();
        assert_eq!(cursor.row, 1, "Should stay at end row");
    }

    #[test]
    fn test_visual_nav_wide_characters() {
        // CJK characters are 2 columns wide, 3 bytes each in UTF-8
        let text = "ABC\u{4e2d}\u{6587}DEF"; // "ABC中文DEF" - 3 + 4 + 3 = 10 display cols
        let mut edit = EditBuffer::with_text(text);
        edit.move_to(0, 0);
        let mut view = EditorView::new(edit);
        view.set_wrap_mode(WrapMode::Char);

        let visual = view.visual_cursor(8, 24);
        assert_eq!(visual.visual_col, 0);

        // "ABC中文" is 3 + 3 + 3 = 9 bytes (A,B,C + two 3-byte CJK codepoints)
        view.edit_buffer_mut().move_to(0, 9);
        let visual = view.visual_cursor(8, 24);
        assert_eq!(visual.visual_col, 7, "ABC=3 cols + 中文=4 cols");

        // Navigate and verify the cursor never lands mid-codepoint
        view.move_up_visual(8, 24);
        let cursor = view.edit_buffer().cursor();
        assert!(
            text.is_char_boundary(cursor.offset),
            "cursor offset {} must land on a char boundary",
            cursor.offset
        );
    }

    #[test]
    fn test_visual_nav_emoji_grapheme_clusters() {
        // Family emoji (ZWJ sequence) is multiple codepoints but a single grapheme cluster.
        // The cursor should move across the entire emoji as one unit.
        let text = "AB👨\u{200D}👩\u{200D}👧CD"; // "AB" + family emoji + "CD"
        let mut edit = EditBuffer::with_text(text);
        edit.move_to(0, 0);
        let mut view = EditorView::new(edit);
        view.set_wrap_mode(WrapMode::Char);

        let visual = view.visual_cursor(10, 24);
        assert_eq!(visual.visual_col, 0, "Start at column 0");

        // Move right twice to get past "AB"
        view.edit_buffer_mut().move_right();
        view.edit_buffer_mut().move_right();
        let visual = view.visual_cursor(10, 24);
        assert_eq!(visual.visual_col, 2, "After 'AB', visual col should be 2");

        // Move right once - should skip the entire emoji grapheme cluster
        view.edit_buffer_mut().move_right();
        let cursor = view.edit_buffer().cursor();
        let visual = view.visual_cursor(10, 24);
        assert_eq!(
            visual.visual_col, 4,
            "After emoji, visual col should be 4 (emoji width is 2)"
        );
        assert!(
            cursor.offset <= text.len(),
            "Cursor offset {} should be within text length {}",
            cursor.offset,
            text.len()
        );
        assert!(text.is_char_boundary(cursor.offset));
    }

    #[test]
    fn test_visual_word_wrap_mode() {
        let text = "Hello world test";
        let mut edit = EditBuffer::with_text(text);
        edit.move_to(0, 0);
        let mut view = EditorView::new(edit);
        view.set_wrap_mode(WrapMode::Word);

        // With width 8 and word wrap:
        // "Hello " (6) fits; "world " (6) fits on next line; "test" (4) fits on next line

        view.move_down_visual(8, 24);

        let cursor = view.edit_buffer().cursor();
        let visual = view.visual_cursor(8, 24);
        assert!(visual.visual_row > 0 || cursor.offset > 0, "Should move");
    }

    #[test]
    fn test_move_to_visual_sol_wrapped() {
        let text = "abcdefghij12345";
        let mut edit = EditBuffer::with_text(text);
        edit.move_to(0, 12); // In the wrapped portion
        let mut view = EditorView::new(edit);
        view.set_wrap_mode(WrapMode::Char);

        view.move_to_visual_sol(10, 24);

        let cursor = view.edit_buffer().cursor();
        assert_eq!(cursor.offset, 10, "Should move to visual line start");
    }

    #[test]
    fn test_move_to_visual_eol_wrapped() {
        let text = "abcdefghij12345";
        let mut edit = EditBuffer::with_text(text);
        edit.move_to(0, 5); // In the first visual line
        let mut view = EditorView::new(edit);
        view.set_wrap_mode(WrapMode::Char);

        view.move_to_visual_eol(10, 24);

        let cursor = view.edit_buffer().cursor();
        assert_eq!(cursor.offset, 10, "Should move to visual line end");
    }

    #[test]
    fn test_visual_cursor_info() {
        let text = "abcdefghij12345";
        let mut edit = EditBuffer::with_text(text);
        edit.move_to(0, 12);
        let mut view = EditorView::new(edit);
        view.set_wrap_mode(WrapMode::Char);

        let vc = view.visual_cursor(10, 24);

        // At offset 12, should be on visual row 1, col 2
        assert_eq!(vc.logical_row, 0, "Logical row should be 0");
        assert_eq!(vc.logical_col, 12, "Logical col should be 12");
        assert_eq!(vc.visual_row, 1, "Visual row should be 1 (second wrap)");
        assert_eq!(vc.visual_col, 2, "Visual col should be 2 (12 - 10)");
    }

    #[test]
    fn test_visual_navigation_multiline_wrapped() {
        let text = "Short\nabcdefghij12345\nEnd";
        let mut edit = EditBuffer::with_text(text);
        edit.move_to(1, 0); // Start of second line
        let mut view = EditorView::new(edit);
        view.set_wrap_mode(WrapMode::Char);

        let initial_visual_row = view.visual_cursor(10, 24).visual_row;

        // Move down through the wrapped line - should advance visually
        view.move_down_visual(10, 24);
        let cursor = view.edit_buffer().cursor();
        assert_eq!(cursor.row, 1, "Still on logical line 1");

        view.move_down_visual(10, 24);
        view.move_down_visual(10, 24);

        let visual = view.visual_cursor(10, 24);
        assert!(
            visual.visual_row > initial_visual_row,
            "Visual row should have increased from {} to {}",
            initial_visual_row,
            visual.visual_row
        );
    }

    // =========================================================================
    // Selection Tests
    // =========================================================================

    #[test]
    fn test_start_selection() {
        let buffer = EditBuffer::with_text("Hello, World!");
        let mut view = EditorView::new(buffer);

        view.edit_buffer_mut().set_cursor_by_offset(7); // After ", "
        view.start_selection();

        assert!(view.selection.is_some());
        let sel = view.selection.unwrap();
        assert_eq!(sel.start, 7);
        assert_eq!(sel.end, 7, "New selection should have same start and end");
    }

    #[test]
    fn test_extend_selection_to_cursor() {
        let buffer = EditBuffer::with_text("Hello, World!");
        let mut view = EditorView::new(buffer);

        view.start_selection();
        view.edit_buffer_mut().set_cursor_by_offset(5); // After "Hello"
        view.extend_selection_to_cursor();

        let sel = view.selection.unwrap();
        assert_eq!(sel.start, 0);
        assert_eq!(sel.end, 5, "Selection should extend to cursor");

        view.edit_buffer_mut().set_cursor_by_offset(13); // End
        view.extend_selection_to_cursor();

        let sel = view.selection.unwrap();
        assert_eq!(sel.end, 13);
    }

    #[test]
    fn test_extend_selection_backward() {
        let buffer = EditBuffer::with_text("Hello, World!");
        let mut view = EditorView::new(buffer);

        view.edit_buffer_mut().set_cursor_by_offset(7);
        view.start_selection();

        view.edit_buffer_mut().set_cursor_by_offset(0);
        view.extend_selection_to_cursor();

        let sel = view.selection.unwrap();
        // start > end is valid (indicates backward selection)
        assert_eq!(sel.start, 7);
        assert_eq!(sel.end, 0);
    }

    #[test]
    fn test_selected_text() {
        let buffer = EditBuffer::with_text("Hello, World!");
        let mut view = EditorView::new(buffer);

        assert!(view.selected_text().is_none());

        view.set_selection(0, 5); // "Hello"
        assert_eq!(view.selected_text(), Some("Hello".to_string()));

        // Backward selection should also work
        view.set_selection(13, 7); // "World!" backward
        assert_eq!(view.selected_text(), Some("World!".to_string()));

        // Empty selection (start == end) should return None
        view.set_selection(5, 5);
        assert!(view.selected_text().is_none(), "Empty selection should return None");
    }

    #[test]
    fn test_update_and_reset_selection() {
        let buffer = EditBuffer::with_text("Hello, World!");
        let mut view = EditorView::new(buffer);

        view.update_selection(5);
        let sel = view.selection.unwrap();
        assert_eq!((sel.start, sel.end), (5, 5));

        view.update_selection(9);
        let sel = view.selection.unwrap();
        assert_eq!((sel.start, sel.end), (5, 9));

        view.reset_selection();
        assert!(view.selection.is_none());
    }

    #[test]
    fn test_selection_with_cursor_movement() {
        let buffer = EditBuffer::with_text("Line 1\nLine 2\nLine 3");
        let mut view = EditorView::new(buffer);

        view.start_selection();
        view.edit_buffer_mut().move_down();
        view.extend_selection_to_cursor();

        let text = view.selected_text().unwrap();
        assert!(text.contains("Line"));
    }

    #[test]
    fn test_selection_follow_cursor_mode() {
        let buffer = EditBuffer::with_text("Hello, World!");
        let mut view = EditorView::new(buffer);

        view.set_selection_follow_cursor(true);
        view.set_selection(0, 0);

        // Move cursor - selection should extend automatically via scroll_to_cursor
        view.edit_buffer_mut().set_cursor_by_offset(5);
        view.scroll_to_cursor(80, 24); // This triggers selection follow

        let sel = view.selection.unwrap();
        assert_eq!(sel.end, 5, "Selection should follow cursor");
    }
}
