//! Styled text buffer with a logical-line grapheme cache.
//!
//! This module provides [`TextBuffer`], a rope-backed text storage that
//! supports styled segments and per-line grapheme/width caching. Use this
//! for read-only or display-oriented text. For editing with cursor
//! movement and undo, see [`EditBuffer`](super::EditBuffer).

use crate::style::Style;
use crate::text::rope::RopeWrapper;
use crate::text::segment::{StyledChunk, StyledSegment};
use crate::unicode::WidthMethod;
use crate::unicode::grapheme::{GraphemeInfo, grapheme_info};
use std::cell::RefCell;
use std::collections::HashMap;
use std::ops::Range;

#[derive(Clone, Debug)]
struct MemEntry {
    data: String,
    owned: bool,
}

#[derive(Clone, Debug, Default)]
struct MemRegistry {
    entries: Vec<Option<MemEntry>>,
    free_list: Vec<u32>,
}

impl MemRegistry {
    fn register(&mut self, data: &str, owned: bool) -> u32 {
        if let Some(id) = self.free_list.pop() {
            let idx = (id - 1) as usize;
            self.entries[idx] = Some(MemEntry {
                data: data.to_string(),
                owned,
            });
            return id;
        }

        self.entries.push(Some(MemEntry {
            data: data.to_string(),
            owned,
        }));
        self.entries.len() as u32
    }

    fn replace(&mut self, id: u32, data: &str, owned: bool) {
        if id == 0 {
            return;
        }
        let idx = id.saturating_sub(1) as usize;
        if let Some(slot) = self.entries.get_mut(idx) {
            *slot = Some(MemEntry {
                data: data.to_string(),
                owned,
            });
        }
    }

    fn get(&self, id: u32) -> Option<&str> {
        if id == 0 {
            return None;
        }
        let idx = id.saturating_sub(1) as usize;
        self.entries
            .get(idx)
            .and_then(|entry| entry.as_ref().map(|m| m.data.as_str()))
    }
}

/// Per-line grapheme/width cache, invalidated incrementally on edit.
///
/// [`TextBuffer::insert_bytes`]/[`TextBuffer::remove_bytes`] drop only the
/// cache entries for the line(s) an edit actually touches (see
/// [`TextBuffer::invalidate_lines_for_edit`]); config changes that affect
/// every line (tab width, width method) and [`TextBuffer::rope_mut`]
/// callers that bypass the byte-range-aware methods fall back to a full
/// clear via [`TextBuffer::bump_revision`]. Lines are recomputed lazily on
/// first query after invalidation; most callers (a view scrolling through
/// a handful of visible lines) touch a small fraction of lines per
/// revision, so caching the whole buffer up front would waste work a
/// rebuild on scroll never needed.
#[derive(Debug, Default)]
struct LineCache {
    lines: RefCell<HashMap<usize, Vec<GraphemeInfo>>>,
}

impl Clone for LineCache {
    fn clone(&self) -> Self {
        Self {
            lines: RefCell::new(self.lines.borrow().clone()),
        }
    }
}

/// Text buffer with styled segments and a logical-line grapheme cache.
///
/// `TextBuffer` uses a rope data structure internally for O(log n) insertions
/// and deletions, making it suitable for large documents. It also supports:
///
/// - Styled segments for display-time markup/highlighting
/// - Memory registry for efficient string deduplication
/// - Tab width configuration
/// - Unicode width calculation methods, cached per logical line
///
/// For editing with cursor movement and undo/redo, wrap this in an
/// [`EditBuffer`](super::EditBuffer).
#[derive(Clone, Debug, Default)]
pub struct TextBuffer {
    rope: RopeWrapper,
    segments: Vec<StyledSegment>,
    default_style: Style,
    tab_width: u8,
    mem_registry: MemRegistry,
    width_method: WidthMethod,
    revision: u64,
    line_cache: LineCache,
    destroyed: bool,
}

impl TextBuffer {
    /// Create an empty text buffer.
    #[must_use]
    pub fn new() -> Self {
        Self {
            rope: RopeWrapper::new(),
            segments: Vec::new(),
            default_style: Style::NONE,
            tab_width: 4,
            mem_registry: MemRegistry::default(),
            width_method: WidthMethod::default(),
            revision: 0,
            line_cache: LineCache::default(),
            destroyed: false,
        }
    }

    /// Mark the buffer destroyed and release its content.
    ///
    /// Further mutation through [`Self::insert_bytes`], [`Self::remove_bytes`],
    /// [`Self::set_text`], [`Self::append`], [`Self::set_styled_text`],
    /// [`Self::clear`], or the `add_highlight*` family returns
    /// [`Error::Destroyed`](crate::error::Error::Destroyed) instead of
    /// mutating. Idempotent.
    pub fn destroy(&mut self) {
        if self.destroyed {
            return;
        }
        self.destroyed = true;
        self.rope.clear();
        self.segments.clear();
        self.line_cache.lines.borrow_mut().clear();
    }

    /// Whether [`Self::destroy`] has been called on this buffer.
    #[must_use]
    pub fn is_destroyed(&self) -> bool {
        self.destroyed
    }

    /// Create a buffer with initial text.
    #[must_use]
    pub fn with_text(text: &str) -> Self {
        let mut buffer = Self::new();
        buffer.rope = RopeWrapper::from_str(text);
        buffer
    }

    /// Set the default style for unstyled text.
    pub fn set_default_style(&mut self, style: Style) {
        self.default_style = style;
    }

    /// Get the default style.
    #[must_use]
    pub fn default_style(&self) -> Style {
        self.default_style
    }

    /// Set tab width.
    pub fn set_tab_width(&mut self, width: u8) {
        self.tab_width = width.max(1);
        self.bump_revision();
    }

    /// Get tab width.
    #[must_use]
    pub fn tab_width(&self) -> u8 {
        self.tab_width
    }

    /// Set width calculation method for this buffer.
    pub fn set_width_method(&mut self, method: WidthMethod) {
        self.width_method = method;
        self.bump_revision();
    }

    /// Get width calculation method.
    #[must_use]
    pub fn width_method(&self) -> WidthMethod {
        self.width_method
    }

    /// Set the text content, clearing all segments.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Destroyed`](crate::error::Error::Destroyed) if
    /// [`Self::destroy`] has already been called.
    pub fn set_text(&mut self, text: &str) -> crate::error::Result<()> {
        self.fail_if_destroyed()?;
        self.rope.replace(text);
        self.segments.clear();
        self.bump_revision();
        Ok(())
    }

    /// Append text to the buffer.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Destroyed`](crate::error::Error::Destroyed) if
    /// [`Self::destroy`] has already been called.
    pub fn append(&mut self, text: &str) -> crate::error::Result<()> {
        self.fail_if_destroyed()?;
        self.rope.append(text);
        self.bump_revision();
        Ok(())
    }

    /// Set styled text content from chunks.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Destroyed`](crate::error::Error::Destroyed) if
    /// [`Self::destroy`] has already been called.
    pub fn set_styled_text(&mut self, chunks: &[StyledChunk<'_>]) -> crate::error::Result<()> {
        self.fail_if_destroyed()?;
        self.rope.clear();
        self.segments.clear();
        self.bump_revision();

        let mut offset = 0;
        for chunk in chunks {
            let start = offset;
            self.rope.append(chunk.text);
            offset += chunk.text.len();

            if !chunk.style.is_empty() {
                self.segments
                    .push(StyledSegment::new(start..offset, chunk.style));
            }
        }
        Ok(())
    }

    /// Clear all content.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Destroyed`](crate::error::Error::Destroyed) if
    /// [`Self::destroy`] has already been called.
    pub fn clear(&mut self) -> crate::error::Result<()> {
        self.fail_if_destroyed()?;
        self.rope.clear();
        self.segments.clear();
        self.bump_revision();
        Ok(())
    }

    /// Reset content and highlights.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Destroyed`](crate::error::Error::Destroyed) if
    /// [`Self::destroy`] has already been called.
    pub fn reset(&mut self) -> crate::error::Result<()> {
        self.clear()
    }

    fn fail_if_destroyed(&self) -> crate::error::Result<()> {
        if self.destroyed {
            Err(crate::error::Error::Destroyed)
        } else {
            Ok(())
        }
    }

    /// Get the number of bytes.
    #[must_use]
    pub fn len_bytes(&self) -> usize {
        self.rope.len_bytes()
    }

    /// Get the number of characters.
    #[must_use]
    pub fn len_chars(&self) -> usize {
        self.rope.len_chars()
    }

    /// Get the number of logical (unwrapped) lines.
    #[must_use]
    pub fn len_lines(&self) -> usize {
        self.rope.len_lines()
    }

    /// Check if empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rope.is_empty()
    }

    /// Get a line by index.
    #[must_use]
    pub fn line(&self, idx: usize) -> Option<String> {
        self.rope.line(idx).map(|s| s.to_string())
    }

    /// Iterate over all lines as owned strings.
    pub fn lines(&self) -> impl Iterator<Item = String> + '_ {
        self.rope.lines().map(|line| line.to_string())
    }

    /// Get the underlying rope.
    #[must_use]
    pub fn rope(&self) -> &RopeWrapper {
        &self.rope
    }

    /// Get mutable access to the rope.
    ///
    /// Invalidates the whole line cache: callers that know the edited byte
    /// range should use [`Self::insert_bytes`]/[`Self::remove_bytes`]
    /// instead, which invalidate only the lines the edit touched.
    pub fn rope_mut(&mut self) -> &mut RopeWrapper {
        self.bump_revision();
        &mut self.rope
    }

    /// Insert text at a byte offset, invalidating only the cached
    /// grapheme info for the line(s) the insertion touches.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Destroyed`](crate::error::Error::Destroyed) if
    /// [`Self::destroy`] has already been called.
    pub fn insert_bytes(&mut self, offset: usize, text: &str) -> crate::error::Result<()> {
        self.fail_if_destroyed()?;
        self.invalidate_lines_for_edit(offset, offset, text.contains('\n'));
        self.rope.insert_bytes(offset, text);
        Ok(())
    }

    /// Remove a byte range, invalidating only the cached grapheme info for
    /// the line(s) the removal touches.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Destroyed`](crate::error::Error::Destroyed) if
    /// [`Self::destroy`] has already been called.
    pub fn remove_bytes(&mut self, start: usize, end: usize) -> crate::error::Result<()> {
        self.fail_if_destroyed()?;
        let start_char = self.rope.byte_to_char(start);
        let end_char = self.rope.byte_to_char(end);
        let removed_has_newline = self.rope.slice(start_char..end_char).to_string().contains('\n');
        self.invalidate_lines_for_edit(start, end, removed_has_newline);
        self.rope.remove_bytes(start, end);
        Ok(())
    }

    /// Invalidate cached [`GraphemeInfo`] for the line(s) touched by an edit
    /// spanning `[start, end]` (byte offsets in the *pre-edit* rope), and
    /// bump the revision.
    ///
    /// When the edit doesn't add or remove a line break, only the touched
    /// lines' entries are dropped. When it does, line indices after the
    /// edit point shift, so every cached entry from the edit point onward
    /// is dropped too (still far short of a full clear for edits near the
    /// end of a large buffer).
    fn invalidate_lines_for_edit(&mut self, start: usize, end: usize, crosses_line_break: bool) {
        self.revision = self.revision.wrapping_add(1);
        let start_line = self.rope.byte_to_line(start.min(self.rope.len_bytes()));
        let end_line = self.rope.byte_to_line(end.min(self.rope.len_bytes()));

        let mut lines = self.line_cache.lines.borrow_mut();
        if crosses_line_break {
            lines.retain(|&line_idx, _| line_idx < start_line);
        } else {
            for line_idx in start_line..=end_line {
                lines.remove(&line_idx);
            }
        }
    }

    /// Get the buffer revision (increments on content or config changes).
    #[must_use]
    pub fn revision(&self) -> u64 {
        self.revision
    }

    /// Grapheme/width breakdown of a logical line, including its line
    /// terminator if any. Computed once per revision and memoized.
    #[must_use]
    pub fn line_grapheme_info(&self, line_idx: usize) -> Vec<GraphemeInfo> {
        if let Some(cached) = self.line_cache.lines.borrow().get(&line_idx) {
            return cached.clone();
        }
        let Some(line) = self.rope.line(line_idx) else {
            return Vec::new();
        };
        let text = line.to_string();
        let info = grapheme_info(&text, u32::from(self.tab_width), self.width_method);
        self.line_cache
            .lines
            .borrow_mut()
            .insert(line_idx, info.clone());
        info
    }

    /// Display width of a logical line in terminal columns (line terminator excluded).
    ///
    /// Computed directly rather than via [`Self::line_grapheme_info`], whose
    /// cached cluster list elides plain-ASCII graphemes and so can't be
    /// summed on its own to recover the full line width.
    #[must_use]
    pub fn line_display_width(&self, line_idx: usize) -> u32 {
        let Some(line) = self.rope.line(line_idx) else {
            return 0;
        };
        let text = line.to_string();
        let text = text.trim_end_matches('\n').trim_end_matches('\r');
        let tab_width = u32::from(self.tab_width).max(1);

        let mut col = 0u32;
        for (_, grapheme) in
            crate::unicode::grapheme::grapheme_indices_with_method(text, self.width_method)
        {
            col += if grapheme == "\t" {
                tab_width - (col % tab_width)
            } else {
                crate::unicode::display_width_with_method(grapheme, self.width_method) as u32
            };
        }
        col
    }

    /// Add a highlight (styled segment) to a range.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Destroyed`](crate::error::Error::Destroyed) if
    /// [`Self::destroy`] has already been called, or
    /// [`Error::AllocationFailure`](crate::error::Error::AllocationFailure)
    /// if growing the segment list fails.
    pub fn add_highlight(
        &mut self,
        range: Range<usize>,
        style: Style,
        priority: u8,
    ) -> crate::error::Result<()> {
        self.fail_if_destroyed()?;
        self.try_reserve_segment()?;
        self.segments
            .push(StyledSegment::new(range, style).with_priority(priority));
        Ok(())
    }

    /// Add a highlight by char range.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Destroyed`](crate::error::Error::Destroyed) if
    /// [`Self::destroy`] has already been called, or
    /// [`Error::AllocationFailure`](crate::error::Error::AllocationFailure)
    /// if growing the segment list fails.
    pub fn add_highlight_by_char_range(
        &mut self,
        char_start: usize,
        char_end: usize,
        style: Style,
        priority: u8,
        ref_id: Option<u16>,
    ) -> crate::error::Result<()> {
        self.fail_if_destroyed()?;
        self.try_reserve_segment()?;
        let start = self.rope.char_to_byte(char_start);
        let end = self.rope.char_to_byte(char_end);
        let mut segment = StyledSegment::new(start..end, style).with_priority(priority);
        let id = ref_id.unwrap_or(0);
        segment = segment.with_ref(id);
        self.segments.push(segment);
        Ok(())
    }

    /// Add a highlight by line/column range.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Destroyed`](crate::error::Error::Destroyed) if
    /// [`Self::destroy`] has already been called, or
    /// [`Error::AllocationFailure`](crate::error::Error::AllocationFailure)
    /// if growing the segment list fails.
    pub fn add_highlight_line(
        &mut self,
        line: usize,
        col_start: usize,
        col_end: usize,
        style: Style,
        priority: u8,
        ref_id: Option<u16>,
    ) -> crate::error::Result<()> {
        self.fail_if_destroyed()?;
        let Some(line_slice) = self.rope.line(line) else {
            return Ok(());
        };
        let line_len = line_slice.len_chars();
        let safe_start = col_start.min(line_len);
        let safe_end = col_end.min(line_len);

        if safe_start >= safe_end {
            return Ok(());
        }

        self.try_reserve_segment()?;
        let line_start = self.rope.line_to_char(line);
        let start = self.rope.char_to_byte(line_start + safe_start);
        let end = self.rope.char_to_byte(line_start + safe_end);
        let mut segment = StyledSegment::new(start..end, style)
            .with_priority(priority)
            .with_line(line);
        let id = ref_id.unwrap_or(0);
        segment = segment.with_ref(id);
        self.segments.push(segment);
        Ok(())
    }

    fn try_reserve_segment(&mut self) -> crate::error::Result<()> {
        self.segments
            .try_reserve(1)
            .map_err(|_| crate::error::Error::AllocationFailure {
                component: "TextBuffer::segments",
            })
    }

    /// Clear all highlights.
    pub fn clear_highlights(&mut self) {
        self.segments
            .retain(|seg| seg.ref_id.is_none() && seg.line.is_none());
    }

    /// Remove all highlights with a specific reference ID.
    pub fn remove_highlights_by_ref(&mut self, ref_id: u16) {
        self.segments.retain(|seg| seg.ref_id != Some(ref_id));
    }

    /// Clear highlights for a specific line.
    pub fn clear_line_highlights(&mut self, line: usize) {
        self.segments.retain(|seg| seg.line != Some(line));
    }

    /// Clear highlights for a specific line and reference ID.
    pub fn clear_line_highlights_by_ref(&mut self, line: usize, ref_id: u16) {
        self.segments
            .retain(|seg| !(seg.line == Some(line) && seg.ref_id == Some(ref_id)));
    }

    /// Register external text in the memory registry.
    pub fn register_text(&mut self, text: &str, owned: bool) -> u32 {
        self.mem_registry.register(text, owned)
    }

    /// Replace external text by ID.
    pub fn replace_text_by_id(&mut self, id: u32, text: &str, owned: bool) {
        self.mem_registry.replace(id, text, owned);
    }

    /// Set buffer text from a registered memory ID.
    ///
    /// No-ops if the buffer has been [`Self::destroy`]ed.
    pub fn set_text_from_mem_id(&mut self, id: u32) {
        if let Some(text) = self.mem_registry.get(id).map(str::to_owned) {
            let _ = self.set_text(&text);
        }
    }

    /// Get segments overlapping a byte range.
    pub fn segments_in_range(&self, range: Range<usize>) -> impl Iterator<Item = &StyledSegment> {
        self.segments
            .iter()
            .filter(move |seg| seg.range.start < range.end && range.start < seg.range.end)
    }

    /// Get the style at a byte position.
    #[must_use]
    pub fn style_at(&self, pos: usize) -> Style {
        let mut style = self.default_style;
        let mut max_priority = 0u8;

        for seg in &self.segments {
            if seg.contains(pos) && seg.priority >= max_priority {
                style = style.merge(seg.style);
                max_priority = seg.priority;
            }
        }

        style
    }

    /// Convert to plain string.
    #[must_use]
    pub fn to_string(&self) -> String {
        self.rope.to_string()
    }

    fn bump_revision(&mut self) {
        self.revision = self.revision.wrapping_add(1);
        self.line_cache.lines.borrow_mut().clear();
    }
}
