//! Grapheme cluster iteration.

use crate::grapheme_pool::GraphemeId;
use crate::unicode::width::WidthMethod;
use crate::unicode::width::display_width_with_method;
use unicode_segmentation::UnicodeSegmentation;

/// Grapheme metadata for layout.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct GraphemeInfo {
    pub byte_offset: u32,
    pub byte_len: u8,
    pub col_offset: u32,
    pub width: u8,
    /// Pool handle for multi-byte clusters; [`GraphemeId::is_invalid`] for
    /// single-byte clusters (tabs, control chars), which aren't interned.
    pub grapheme_id: GraphemeId,
}

/// Whether a single byte is a printable-ASCII cluster that gets elided from
/// [`grapheme_info`]'s result (cache holds only multi-byte clusters and tabs).
fn is_elided_ascii(grapheme: &str) -> bool {
    grapheme.len() == 1 && matches!(grapheme.as_bytes()[0], 0x20..=0x7E)
}

/// Iterator over grapheme clusters in a string.
pub struct GraphemeIterator<'a> {
    inner: unicode_segmentation::Graphemes<'a>,
}

impl<'a> Iterator for GraphemeIterator<'a> {
    type Item = &'a str;

    fn next(&mut self) -> Option<Self::Item> {
        self.inner.next()
    }
}

/// Iterate over grapheme clusters in a string.
#[must_use]
pub fn graphemes(s: &str) -> GraphemeIterator<'_> {
    GraphemeIterator {
        inner: s.graphemes(true),
    }
}

/// Iterate over grapheme clusters with byte indices.
pub fn grapheme_indices(s: &str) -> impl Iterator<Item = (usize, &str)> {
    s.grapheme_indices(true)
}

/// Check if a string is ASCII-only.
#[must_use]
pub fn is_ascii_only(s: &str) -> bool {
    s.is_ascii()
}

/// Split a grapheme cluster already segmented by UAX #29 into one cluster
/// per ZWJ-joined component, for use under [`WidthMethod::NoZwj`].
///
/// U+200D itself becomes its own (zero-width) entry so byte offsets still
/// cover the whole cluster.
fn split_cluster_on_zwj(cluster: &str) -> Vec<&str> {
    if !cluster.contains('\u{200d}') {
        return vec![cluster];
    }

    let mut parts = Vec::new();
    let mut start = 0;
    for (idx, ch) in cluster.char_indices() {
        if ch == '\u{200d}' {
            if idx > start {
                parts.push(&cluster[start..idx]);
            }
            let end = idx + ch.len_utf8();
            parts.push(&cluster[idx..end]);
            start = end;
        }
    }
    if start < cluster.len() {
        parts.push(&cluster[start..]);
    }
    parts
}

/// Iterate over grapheme clusters, honoring the ZWJ-joining policy of `method`.
pub fn grapheme_indices_with_method(
    s: &str,
    method: WidthMethod,
) -> impl Iterator<Item = (usize, &str)> {
    let join = crate::unicode::width::joins_on_zwj(method);
    s.grapheme_indices(true).flat_map(move |(offset, cluster)| {
        if join {
            vec![(offset, cluster)]
        } else {
            let mut pos = offset;
            split_cluster_on_zwj(cluster)
                .into_iter()
                .map(move |part| {
                    let this = pos;
                    pos += part.len();
                    (this, part)
                })
                .collect::<Vec<_>>()
        }
    })
}

/// Compute grapheme info for a string.
///
/// ASCII printable single-byte clusters are elided from the result for
/// cache efficiency (an ASCII-only line carries no cluster list at all);
/// multi-byte clusters, tabs, and ASCII control characters are kept.
/// `col_offset` still accumulates across every grapheme, elided or not, so
/// kept entries retain correct absolute column positions. Multi-byte
/// clusters are interned into the process-wide grapheme pool.
#[must_use]
pub fn grapheme_info(s: &str, tab_width: u32, method: WidthMethod) -> Vec<GraphemeInfo> {
    let mut infos = Vec::new();
    let mut col = 0u32;
    let tab_width = tab_width.max(1);

    for (byte_offset, grapheme) in grapheme_indices_with_method(s, method) {
        let width = if grapheme == "\t" {
            let spaces = tab_width - (col % tab_width);
            spaces as u8
        } else {
            display_width_with_method(grapheme, method) as u8
        };

        if !is_elided_ascii(grapheme) {
            let grapheme_id = if grapheme.len() > 1 {
                crate::grapheme_pool::global()
                    .lock()
                    .unwrap()
                    .intern_with_method(grapheme, method)
            } else {
                GraphemeId::default()
            };

            infos.push(GraphemeInfo {
                byte_offset: byte_offset as u32,
                byte_len: grapheme.len() as u8,
                col_offset: col,
                width,
                grapheme_id,
            });
        }
        col += width as u32;
    }

    infos
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_graphemes_ascii() {
        let g: Vec<_> = graphemes("hello").collect();
        assert_eq!(g, vec!["h", "e", "l", "l", "o"]);
    }

    #[test]
    fn test_graphemes_emoji() {
        // Family emoji (ZWJ sequence)
        assert_eq!(graphemes("👨‍👩‍👧").count(), 1);
    }

    #[test]
    fn test_graphemes_combining() {
        // e + combining acute accent
        assert_eq!(graphemes("e\u{0301}").count(), 1);
    }

    #[test]
    fn test_grapheme_info_basic() {
        // 'a' and 'b' are elided (printable ASCII); only the tab survives.
        let infos = grapheme_info("ab\tc", 4, WidthMethod::WcWidth);
        assert_eq!(infos.len(), 1);
        assert_eq!(infos[0].byte_offset, 2);
        assert_eq!(infos[0].col_offset, 2);
        assert_eq!(infos[0].width, 2); // tab_width 4, col 2 -> 2 spaces to next stop
    }

    #[test]
    fn test_grapheme_info_ascii_only_elided() {
        assert!(grapheme_info("hello", 4, WidthMethod::WcWidth).is_empty());
    }

    #[test]
    fn test_grapheme_info_multibyte_interned() {
        let infos = grapheme_info("h\u{00e9}llo", 4, WidthMethod::WcWidth);
        assert_eq!(infos.len(), 1);
        assert!(!infos[0].grapheme_id.is_invalid());
        let pool = crate::grapheme_pool::global().lock().unwrap();
        assert_eq!(pool.get(infos[0].grapheme_id), Some("\u{00e9}"));
    }

    #[test]
    fn test_no_zwj_splits_joined_emoji() {
        let family = "👨\u{200d}👩\u{200d}👧";
        let joined: Vec<_> =
            grapheme_indices_with_method(family, WidthMethod::Unicode).collect();
        assert_eq!(joined.len(), 1);

        let split: Vec<_> =
            grapheme_indices_with_method(family, WidthMethod::NoZwj).collect();
        assert_eq!(split.len(), 5);
        assert_eq!(split[1].1, "\u{200d}");

        let widths = grapheme_info(family, 4, WidthMethod::NoZwj);
        let total: u32 = widths.iter().map(|w| w.width as u32).sum();
        assert!(total > grapheme_info(family, 4, WidthMethod::Unicode)[0].width as u32);
    }
}
