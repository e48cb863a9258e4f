//! Read-only text buffer view: viewport, wrapping, and positional queries.
//!
//! This is the display-oriented half of the text engine (see
//! [`EditBuffer`](super::EditBuffer)/[`EditorView`](super::EditorView) for
//! the editable half). It owns no mutable state of the buffer itself; it
//! only projects a [`TextBuffer`] through a wrap mode and viewport to answer
//! "what virtual line is this byte on" and "what text is selected" style
//! queries. Rendering cells to a terminal surface is out of scope here —
//! callers take [`LineInfo`]'s byte ranges and draw however their own
//! renderer wants to.

use crate::style::Style;
use crate::text::TextBuffer;
use crate::text::layout::{self, VirtualLine};
use crate::unicode::display_width_with_method;
use std::cell::RefCell;

/// Text wrapping mode.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum WrapMode {
    /// No wrapping - lines extend beyond viewport.
    #[default]
    None,
    /// Wrap at character (grapheme) boundaries.
    Char,
    /// Wrap at word boundaries, collapsing the whitespace run at the break.
    Word,
}

/// Viewport configuration.
#[derive(Clone, Copy, Debug, Default)]
pub struct Viewport {
    pub x: u32,
    pub y: u32,
    pub width: u32,
    pub height: u32,
}

impl Viewport {
    /// Create a new viewport.
    #[must_use]
    pub fn new(x: u32, y: u32, width: u32, height: u32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }
}

/// Selection range, as byte offsets into the buffer.
#[derive(Clone, Copy, Debug, Default)]
pub struct Selection {
    pub start: usize,
    pub end: usize,
    pub style: Style,
}

impl Selection {
    /// Create a new selection.
    #[must_use]
    pub fn new(start: usize, end: usize, style: Style) -> Self {
        Self { start, end, style }
    }

    /// Check if empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.start == self.end
    }

    /// Get normalized (start <= end) selection.
    #[must_use]
    pub fn normalized(&self) -> Self {
        if self.start <= self.end {
            *self
        } else {
            Self {
                start: self.end,
                end: self.start,
                style: self.style,
            }
        }
    }

    /// Check if a byte position is within selection.
    #[must_use]
    pub fn contains(&self, byte_pos: usize) -> bool {
        let norm = self.normalized();
        byte_pos >= norm.start && byte_pos < norm.end
    }
}

/// Local (viewport) selection based on screen coordinates.
#[derive(Clone, Copy, Debug, Default)]
pub struct LocalSelection {
    pub anchor_x: u32,
    pub anchor_y: u32,
    pub focus_x: u32,
    pub focus_y: u32,
    pub style: Style,
}

impl LocalSelection {
    /// Create a new local selection.
    #[must_use]
    pub fn new(anchor_x: u32, anchor_y: u32, focus_x: u32, focus_y: u32, style: Style) -> Self {
        Self {
            anchor_x,
            anchor_y,
            focus_x,
            focus_y,
            style,
        }
    }

    /// Normalize selection rectangle.
    #[must_use]
    pub fn normalized(&self) -> (u32, u32, u32, u32) {
        let min_x = self.anchor_x.min(self.focus_x);
        let max_x = self.anchor_x.max(self.focus_x);
        let min_y = self.anchor_y.min(self.focus_y);
        let max_y = self.anchor_y.max(self.focus_y);
        (min_x, min_y, max_x, max_y)
    }
}

/// Cached line layout information for wrapped text.
#[derive(Clone, Debug, Default)]
pub struct LineInfo {
    /// Byte offset where each virtual line starts.
    pub starts: Vec<usize>,
    /// Byte offset where each virtual line ends (exclusive).
    pub ends: Vec<usize>,
    /// Display width of each virtual line.
    pub widths: Vec<usize>,
    /// Source line index for each virtual line.
    pub sources: Vec<usize>,
    /// Whether the line is a wrapped continuation.
    pub wraps: Vec<bool>,
    /// Maximum line width across all virtual lines.
    pub max_width: usize,
}

impl LineInfo {
    /// Get the number of virtual lines.
    #[must_use]
    pub fn virtual_line_count(&self) -> usize {
        self.starts.len()
    }

    /// Map a source (logical) line to its first virtual line index.
    #[must_use]
    pub fn source_to_virtual(&self, source_line: usize) -> Option<usize> {
        self.sources.iter().position(|&s| s == source_line)
    }

    /// Map a virtual line index to its source (logical) line.
    #[must_use]
    pub fn virtual_to_source(&self, virtual_line: usize) -> Option<usize> {
        self.sources.get(virtual_line).copied()
    }

    /// Get the byte range for a virtual line.
    #[must_use]
    pub fn virtual_line_byte_range(&self, virtual_line: usize) -> Option<(usize, usize)> {
        let start = *self.starts.get(virtual_line)?;
        let end = *self.ends.get(virtual_line)?;
        Some((start, end))
    }

    /// Get the display width of a virtual line.
    #[must_use]
    pub fn virtual_line_width(&self, virtual_line: usize) -> Option<usize> {
        self.widths.get(virtual_line).copied()
    }

    /// Check if a virtual line is a wrapped continuation.
    #[must_use]
    pub fn is_continuation(&self, virtual_line: usize) -> Option<bool> {
        self.wraps.get(virtual_line).copied()
    }

    /// Count virtual lines for a given source line.
    #[must_use]
    pub fn virtual_lines_for_source(&self, source_line: usize) -> usize {
        self.sources.iter().filter(|&&s| s == source_line).count()
    }

    /// Get the maximum source line index.
    #[must_use]
    pub fn max_source_line(&self) -> Option<usize> {
        self.sources.iter().max().copied()
    }
}

/// Measurement result for a given viewport size.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct TextMeasure {
    pub line_count: usize,
    pub max_width: usize,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
struct LineCacheKey {
    wrap_mode: WrapMode,
    wrap_width_override: Option<u32>,
    viewport_width: u32,
    tab_width: u8,
    width_method: crate::unicode::WidthMethod,
    buffer_revision: u64,
}

#[derive(Clone, Debug)]
struct LineCache {
    key: LineCacheKey,
    virtual_lines: Vec<VirtualLine>,
    info: LineInfo,
}

/// View into a text buffer with viewport, wrapping, and selection state.
pub struct TextBufferView<'a> {
    buffer: &'a TextBuffer,
    viewport: Viewport,
    wrap_mode: WrapMode,
    wrap_width: Option<u32>,
    scroll_x: u32,
    scroll_y: u32,
    selection: Option<Selection>,
    local_selection: Option<LocalSelection>,
    line_cache: RefCell<Option<LineCache>>,
}

impl<'a> TextBufferView<'a> {
    /// Create a new view of a text buffer.
    #[must_use]
    pub fn new(buffer: &'a TextBuffer) -> Self {
        Self {
            buffer,
            viewport: Viewport::default(),
            wrap_mode: WrapMode::None,
            wrap_width: None,
            scroll_x: 0,
            scroll_y: 0,
            selection: None,
            local_selection: None,
            line_cache: RefCell::new(None),
        }
    }

    /// Set the viewport.
    #[must_use]
    pub fn viewport(mut self, x: u32, y: u32, width: u32, height: u32) -> Self {
        self.viewport = Viewport::new(x, y, width, height);
        self.clear_line_cache();
        self
    }

    /// Set the wrap mode.
    #[must_use]
    pub fn wrap_mode(mut self, mode: WrapMode) -> Self {
        self.wrap_mode = mode;
        self.clear_line_cache();
        self
    }

    /// Set explicit wrap width (overrides viewport width when wrapping).
    #[must_use]
    pub fn wrap_width(mut self, width: u32) -> Self {
        self.wrap_width = Some(width);
        self.clear_line_cache();
        self
    }

    /// Set scroll position, in (column, virtual-row) units.
    #[must_use]
    pub fn scroll(mut self, x: u32, y: u32) -> Self {
        self.scroll_x = x;
        self.scroll_y = y;
        self
    }

    /// Current scroll position.
    #[must_use]
    pub fn scroll_position(&self) -> (u32, u32) {
        (self.scroll_x, self.scroll_y)
    }

    /// Set selection (byte offsets).
    pub fn set_selection(&mut self, start: usize, end: usize, style: Style) {
        self.selection = Some(Selection::new(start, end, style));
    }

    /// Clear selection.
    pub fn clear_selection(&mut self) {
        self.selection = None;
    }

    /// Set a local (viewport) selection and materialize it into a byte-offset
    /// [`Selection`] via [`Self::visual_to_logical`].
    pub fn set_local_selection(
        &mut self,
        anchor_x: u32,
        anchor_y: u32,
        focus_x: u32,
        focus_y: u32,
        style: Style,
    ) {
        let anchor = self.visual_to_logical(anchor_y, anchor_x);
        let focus = self.visual_to_logical(focus_y, focus_x);
        self.local_selection = Some(LocalSelection::new(
            anchor_x, anchor_y, focus_x, focus_y, style,
        ));
        self.selection = Some(Selection::new(anchor, focus, style));
    }

    /// Clear local selection.
    pub fn clear_local_selection(&mut self) {
        self.local_selection = None;
    }

    /// Current selection, if any.
    #[must_use]
    pub fn selection(&self) -> Option<Selection> {
        self.selection
    }

    fn clear_line_cache(&self) {
        self.line_cache.replace(None);
    }

    /// Get selected text (plain, unstyled bytes) if any.
    #[must_use]
    pub fn selected_text(&self) -> Option<String> {
        let sel = self.selection.as_ref()?.normalized();
        if sel.is_empty() {
            return None;
        }

        let max = self.buffer.len_bytes();
        let start = sel.start.min(max);
        let end = sel.end.min(max);
        if start >= end {
            return None;
        }
        let rope = self.buffer.rope();
        let start_char = rope.byte_to_char(start);
        let end_char = rope.byte_to_char(end);
        Some(rope.slice(start_char..end_char).to_string())
    }

    /// Get the whole buffer's plain text.
    #[must_use]
    pub fn plain_text(&self) -> String {
        self.buffer.to_string()
    }

    fn effective_wrap_width(&self) -> Option<usize> {
        if self.wrap_mode == WrapMode::None || self.viewport.width == 0 {
            return None;
        }
        let width = self.wrap_width.unwrap_or(self.viewport.width).max(1);
        Some(width as usize)
    }

    fn effective_wrap_width_for(&self, width: Option<u32>) -> Option<usize> {
        if self.wrap_mode == WrapMode::None {
            return None;
        }
        let base_width = width.unwrap_or(self.viewport.width);
        if base_width == 0 {
            return None;
        }
        let width = self.wrap_width.unwrap_or(base_width).max(1);
        Some(width as usize)
    }

    fn line_cache_key(&self) -> LineCacheKey {
        LineCacheKey {
            wrap_mode: self.wrap_mode,
            wrap_width_override: self.wrap_width,
            viewport_width: self.viewport.width,
            tab_width: self.buffer.tab_width(),
            width_method: self.buffer.width_method(),
            buffer_revision: self.buffer.revision(),
        }
    }

    fn line_cache(&self) -> std::cell::Ref<'_, LineCache> {
        let key = self.line_cache_key();
        let needs_refresh = self
            .line_cache
            .borrow()
            .as_ref()
            .is_none_or(|cache| cache.key != key);

        if needs_refresh {
            let virtual_lines = self.build_virtual_lines_for(self.effective_wrap_width());
            let info = Self::line_info_from_virtual_lines(&virtual_lines);
            *self.line_cache.borrow_mut() = Some(LineCache {
                key,
                virtual_lines,
                info,
            });
        }

        std::cell::Ref::map(self.line_cache.borrow(), |cache| {
            cache.as_ref().expect("line cache should exist")
        })
    }

    fn line_info_from_virtual_lines(virtual_lines: &[VirtualLine]) -> LineInfo {
        let mut info = LineInfo::default();
        for line in virtual_lines {
            info.starts.push(line.byte_start);
            info.ends.push(line.byte_end);
            info.widths.push(line.width);
            info.sources.push(line.source_line);
            info.wraps.push(line.is_wrap);
            info.max_width = info.max_width.max(line.width);
        }
        info
    }

    fn build_virtual_lines_for(&self, wrap_width: Option<usize>) -> Vec<VirtualLine> {
        let mut lines = Vec::new();
        let method = self.buffer.width_method();
        let tab_width = self.buffer.tab_width().max(1) as usize;

        for line_idx in 0..self.buffer.len_lines() {
            let Some(line) = self.buffer.line(line_idx) else {
                continue;
            };
            let line = line.trim_end_matches('\n').trim_end_matches('\r');
            let line_start_byte = self.buffer.rope().line_to_byte(line_idx);

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

    /// Compute visual (wrapped) position for a byte offset: `(row, column)`.
    #[must_use]
    pub fn visual_position_for_byte(&self, byte_offset: usize) -> (u32, u32) {
        use unicode_segmentation::UnicodeSegmentation;

        let rope = self.buffer.rope();
        let cache = self.line_cache();
        let method = self.buffer.width_method();
        let tab_width = self.buffer.tab_width().max(1) as usize;

        for (row, vline) in cache.virtual_lines.iter().enumerate() {
            let is_last_line = row == cache.virtual_lines.len() - 1;
            if byte_offset < vline.byte_start {
                continue;
            }
            if byte_offset >= vline.byte_end && !is_last_line {
                continue;
            }

            let char_start = rope.byte_to_char(vline.byte_start);
            let char_end = rope.byte_to_char(byte_offset);
            let text = rope.slice(char_start..char_end).to_string();

            let mut width = 0usize;
            for grapheme in text.graphemes(true) {
                if grapheme == "\t" {
                    let offset = width % tab_width;
                    width += tab_width - offset;
                } else {
                    width += display_width_with_method(grapheme, method);
                }
            }

            return (row as u32, width as u32);
        }

        (0, 0)
    }

    /// Map a visual (wrapped) `(row, column)` position to a byte offset.
    ///
    /// The inverse of [`Self::visual_position_for_byte`]. `row` is clamped to
    /// the last virtual line; within a line, `column` snaps backward to the
    /// start byte of whichever grapheme cluster covers it (never splits a
    /// cluster).
    #[must_use]
    pub fn visual_to_logical(&self, row: u32, column: u32) -> usize {
        use unicode_segmentation::UnicodeSegmentation;

        let cache = self.line_cache();
        if cache.virtual_lines.is_empty() {
            return 0;
        }
        let row = (row as usize).min(cache.virtual_lines.len() - 1);
        let vline = &cache.virtual_lines[row];

        let rope = self.buffer.rope();
        let char_start = rope.byte_to_char(vline.byte_start);
        let char_end = rope.byte_to_char(vline.byte_end);
        let text = rope.slice(char_start..char_end).to_string();

        let method = self.buffer.width_method();
        let tab_width = self.buffer.tab_width().max(1) as usize;

        let mut width = 0usize;
        let mut byte_offset = vline.byte_start;
        for (byte_idx, grapheme) in text.grapheme_indices(true) {
            if width >= column as usize {
                break;
            }
            let g_width = if grapheme == "\t" {
                let offset = width % tab_width;
                tab_width - offset
            } else {
                display_width_with_method(grapheme, method)
            };
            width += g_width;
            byte_offset = vline.byte_start + byte_idx + grapheme.len();
        }

        byte_offset.min(vline.byte_end)
    }

    /// Calculate the number of virtual lines (accounting for wrapping).
    #[must_use]
    pub fn virtual_line_count(&self) -> usize {
        self.line_cache().virtual_lines.len()
    }

    /// Get line layout information for the current view.
    #[must_use]
    pub fn line_info(&self) -> LineInfo {
        self.line_cache().info.clone()
    }

    /// Measure line count and max width for a given viewport size, without
    /// mutating or depending on this view's own viewport/scroll state.
    #[must_use]
    pub fn measure_for_dimensions(&self, width: u32, _height: u32) -> TextMeasure {
        let wrap_width = self.effective_wrap_width_for(Some(width.max(1)));
        let virtual_lines = self.build_virtual_lines_for(wrap_width);
        let info = Self::line_info_from_virtual_lines(&virtual_lines);
        TextMeasure {
            line_count: virtual_lines.len(),
            max_width: info.max_width,
        }
    }
}
