//! Wrapping math and byte-offset helpers for the input editor.
//!
//! Stateless functions only; the buffer itself lives in `InputBox`.

/// Borders (2) + padding (2) consumed horizontally by the bordered block.
pub(super) const HORIZONTAL_OVERHEAD: u16 = 4;
/// Top + bottom borders consumed vertically.
pub(super) const VERTICAL_OVERHEAD: u16 = 2;
/// Maximum visible content lines before internal scrolling kicks in.
pub(super) const MAX_VISIBLE_LINES: u16 = 6;
/// Offset from area edge to content (border width).
pub(super) const BORDER_OFFSET: u16 = 1;

/// Textwrap options for the input box inner width.
pub(super) fn wrap_options(inner_width: u16) -> textwrap::Options<'static> {
    textwrap::Options::new(inner_width as usize)
        .break_words(true)
        .word_separator(textwrap::WordSeparator::AsciiSpace)
}

/// Inner content width after border/padding overhead; 0 when too narrow.
pub(super) fn inner_width(total_width: u16) -> u16 {
    total_width.saturating_sub(HORIZONTAL_OVERHEAD)
}

/// Wrapped line count for the text, counting a trailing newline as one
/// extra (empty) line, which textwrap itself does not report.
pub(super) fn line_count(text: &str, width: u16) -> u16 {
    if width == 0 || text.is_empty() {
        return 1;
    }
    let wrapped = textwrap::wrap(text, wrap_options(width));
    let mut count = (wrapped.len() as u16).max(1);
    if text.ends_with('\n') && !wrapped.last().is_some_and(|l| l.is_empty()) {
        count += 1;
    }
    count
}

/// Largest char boundary strictly before `pos`.
pub(super) fn boundary_before(text: &str, pos: usize) -> usize {
    let mut i = pos.saturating_sub(1);
    while i > 0 && !text.is_char_boundary(i) {
        i -= 1;
    }
    i
}

/// Smallest char boundary strictly after `pos` (clamped to the end).
pub(super) fn boundary_after(text: &str, pos: usize) -> usize {
    let mut i = (pos + 1).min(text.len());
    while i < text.len() && !text.is_char_boundary(i) {
        i += 1;
    }
    i
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn line_count_empty_and_zero_width() {
        assert_eq!(line_count("", 80), 1);
        assert_eq!(line_count("hello", 0), 1);
    }

    #[test]
    fn line_count_wraps_long_text() {
        assert_eq!(line_count("hello", 80), 1);
        assert_eq!(line_count("aaaaaaaaaa", 5), 2);
    }

    #[test]
    fn line_count_counts_explicit_newlines() {
        assert_eq!(line_count("a\nb\nc", 80), 3);
        assert_eq!(line_count("hello\n", 80), 2);
    }

    #[test]
    fn boundary_before_ascii_and_multibyte() {
        assert_eq!(boundary_before("abc", 2), 1);
        assert_eq!(boundary_before("abc", 1), 0);
        // "café": 'é' spans bytes 3..5
        assert_eq!(boundary_before("café", 5), 3);
        assert_eq!(boundary_before("café", 3), 2);
        // 4-byte emoji at offset 1
        assert_eq!(boundary_before("a🌊b", 5), 1);
    }

    #[test]
    fn boundary_after_ascii_and_multibyte() {
        assert_eq!(boundary_after("abc", 0), 1);
        assert_eq!(boundary_after("abc", 2), 3);
        assert_eq!(boundary_after("café", 3), 5);
        assert_eq!(boundary_after("a🌊b", 1), 5);
    }

    #[test]
    fn boundary_at_edges_stays_in_range() {
        assert_eq!(boundary_before("abc", 0), 0);
        assert_eq!(boundary_after("abc", 3), 3);
    }
}
