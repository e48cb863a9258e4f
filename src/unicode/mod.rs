//! Unicode utilities for grapheme handling and display width.

pub mod grapheme;
pub mod search;
pub mod width;

pub use grapheme::{
    GraphemeInfo, GraphemeIterator, grapheme_indices, grapheme_indices_with_method, grapheme_info,
    graphemes, is_ascii_only,
};
pub use search::{
    BreakType, LineBreakResult, TabStopResult, WrapBreakResult, calculate_text_width,
    decode_utf8_unchecked, find_line_breaks, find_position_by_width, find_tab_stops,
    find_wrap_breaks, find_wrap_position, get_prev_grapheme_start, is_ascii_only_fast,
    is_printable_ascii_only,
};
pub use width::{
    WidthMethod, display_width, display_width_char, display_width_char_with_method,
    display_width_with_method, is_wide, is_zero_width, joins_on_zwj, set_width_method,
    width_method,
};
