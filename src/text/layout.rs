//! Wrap and layout engine: turns one logical line into one or more
//! width-bounded virtual (visual) lines.
//!
//! Shared by [`TextBufferView`](super::TextBufferView) (read-only display)
//! and [`EditorView`](super::EditorView) (cursor-aware editing), so the
//! wrap algorithm lives in exactly one place.

use crate::unicode::WidthMethod;
use crate::unicode::search::{calculate_text_width, find_wrap_breaks};
use crate::unicode::width::display_width_with_method;
use unicode_segmentation::UnicodeSegmentation;

use super::view::WrapMode;

/// One visually-wrapped line: a byte range of a single logical line plus
/// its display width.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct VirtualLine {
    /// Index of the logical (source) line this virtual line belongs to.
    pub source_line: usize,
    /// Byte offset (absolute, in the whole document) where this virtual line starts.
    pub byte_start: usize,
    /// Byte offset (absolute) where this virtual line ends (exclusive).
    pub byte_end: usize,
    /// Display width of this virtual line in terminal columns.
    pub width: usize,
    /// Whether this virtual line is a wrapped continuation of its source line.
    pub is_wrap: bool,
}

/// Wrap a single logical line's text into one or more [`VirtualLine`]s.
///
/// `line_text` must already have its line terminator stripped. `line_start_byte`
/// is the absolute byte offset of `line_text`'s first byte within the document,
/// used to produce absolute byte ranges in the result.
#[must_use]
pub fn wrap_line(
    source_line: usize,
    line_start_byte: usize,
    line_text: &str,
    wrap_mode: WrapMode,
    wrap_width: Option<usize>,
    tab_width: usize,
    method: WidthMethod,
) -> Vec<VirtualLine> {
    let tab_width = tab_width.max(1);
    let mut lines = Vec::new();

    if line_text.is_empty() {
        lines.push(VirtualLine {
            source_line,
            byte_start: line_start_byte,
            byte_end: line_start_byte,
            width: 0,
            is_wrap: false,
        });
        return lines;
    }

    let Some(wrap_width) = wrap_width.filter(|w| *w > 0) else {
        let width = if tab_width > 0 && line_text.contains('\t') {
            calculate_text_width(line_text, tab_width.min(usize::from(u8::MAX)) as u8) as usize
        } else {
            display_width_with_method(line_text, method)
        };
        lines.push(VirtualLine {
            source_line,
            byte_start: line_start_byte,
            byte_end: line_start_byte + line_text.len(),
            width,
            is_wrap: false,
        });
        return lines;
    };

    let graphemes: Vec<(usize, &str)> = line_text.grapheme_indices(true).collect();
    let wrap_breaks = if wrap_mode == WrapMode::Word {
        find_wrap_breaks(line_text).positions
    } else {
        Vec::new()
    };
    let mut start_byte = 0usize;
    let mut current_width = 0usize;
    let mut last_break: Option<(usize, usize, usize)> = None; // (break_byte, width, index)
    let mut i = 0usize;

    while i < graphemes.len() {
        let (byte_idx, grapheme) = graphemes[i];
        if byte_idx < start_byte {
            i += 1;
            continue;
        }

        let g_width = if grapheme == "\t" {
            let offset = current_width % tab_width;
            tab_width - offset
        } else {
            display_width_with_method(grapheme, method)
        };

        let break_here = wrap_mode == WrapMode::Word
            && wrap_breaks
                .binary_search(&(byte_idx + grapheme.len()))
                .is_ok();
        if break_here {
            last_break = Some((byte_idx + grapheme.len(), current_width + g_width, i + 1));
        }

        if current_width + g_width > wrap_width && current_width > 0 {
            let (break_byte, break_width, break_index) = if wrap_mode == WrapMode::Word {
                last_break.unwrap_or((byte_idx, current_width, i))
            } else {
                (byte_idx, current_width, i)
            };

            lines.push(VirtualLine {
                source_line,
                byte_start: line_start_byte + start_byte,
                byte_end: line_start_byte + break_byte,
                width: break_width,
                is_wrap: start_byte > 0,
            });

            start_byte = break_byte;
            current_width = 0;
            last_break = None;
            i = break_index;

            if wrap_mode == WrapMode::Word {
                while i < graphemes.len() {
                    let (b, g) = graphemes[i];
                    if b < start_byte {
                        i += 1;
                        continue;
                    }
                    if g.chars().all(char::is_whitespace) {
                        start_byte = b + g.len();
                        i += 1;
                    } else {
                        break;
                    }
                }
            }

            continue;
        }

        current_width += g_width;
        i += 1;
    }

    if start_byte <= line_text.len() {
        lines.push(VirtualLine {
            source_line,
            byte_start: line_start_byte + start_byte,
            byte_end: line_start_byte + line_text.len(),
            width: current_width,
            is_wrap: start_byte > 0,
        });
    }

    lines
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_wrap_line_no_wrap() {
        let lines = wrap_line(0, 0, "hello", WrapMode::None, None, 4, WidthMethod::WcWidth);
        assert_eq!(lines.len(), 1);
        assert_eq!(lines[0].width, 5);
    }

    #[test]
    fn test_wrap_line_char_exact() {
        let lines = wrap_line(
            0,
            0,
            "abcdef",
            WrapMode::Char,
            Some(3),
            4,
            WidthMethod::WcWidth,
        );
        assert_eq!(lines.len(), 2);
        assert_eq!(lines[0].byte_start, 0);
        assert_eq!(lines[0].byte_end, 3);
        assert_eq!(lines[1].byte_start, 3);
        assert_eq!(lines[1].byte_end, 6);
        assert!(!lines[0].is_wrap);
        assert!(lines[1].is_wrap);
    }

    #[test]
    fn test_wrap_line_word_breaks_at_space() {
        let lines = wrap_line(
            0,
            0,
            "hello world",
            WrapMode::Word,
            Some(6),
            4,
            WidthMethod::WcWidth,
        );
        assert_eq!(lines[0].byte_end, 6); // "hello " including trailing space
    }

    #[test]
    fn test_wrap_line_empty() {
        let lines = wrap_line(0, 10, "", WrapMode::Char, Some(5), 4, WidthMethod::WcWidth);
        assert_eq!(lines.len(), 1);
        assert_eq!(lines[0].byte_start, 10);
        assert_eq!(lines[0].byte_end, 10);
    }
}
