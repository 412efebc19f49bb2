//! Display-width fitting for grid lines.
//!
//! Terminal cells are the unit, not bytes or chars: CJK is double wide,
//! combining marks are zero wide, and a line must never be cut inside a
//! grapheme cluster.

use unicode_segmentation::UnicodeSegmentation;
use unicode_width::UnicodeWidthStr;

const ELLIPSIS: &str = "…";

/// Display width of a string in terminal cells.
pub fn string_width(text: &str) -> usize {
    text.graphemes(true).map(|g| g.width()).sum()
}

/// Fit a line into `max_width` cells, truncating at a grapheme boundary
/// with a trailing ellipsis when it overflows.
pub fn fit_width(text: &str, max_width: usize) -> String {
    if string_width(text) <= max_width {
        return text.to_string();
    }
    if max_width == 0 {
        return String::new();
    }

    // The ellipsis occupies one of the available cells.
    let target = max_width - 1;
    let mut out = String::with_capacity(text.len().min(max_width * 4));
    let mut used = 0;
    for grapheme in text.graphemes(true) {
        let w = grapheme.width();
        if used + w > target {
            break;
        }
        out.push_str(grapheme);
        used += w;
    }
    out.push_str(ELLIPSIS);
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fit_width_passthrough() {
        assert_eq!(fit_width("hello", 10), "hello");
        assert_eq!(fit_width("hello", 5), "hello");
        assert_eq!(fit_width("", 3), "");
    }

    #[test]
    fn test_fit_width_truncates_with_ellipsis() {
        assert_eq!(fit_width("hello world", 6), "hello…");
        assert_eq!(fit_width("hello world", 1), "…");
    }

    #[test]
    fn test_fit_width_zero() {
        assert_eq!(fit_width("hello", 0), "");
    }

    #[test]
    fn test_fit_width_cjk_boundary() {
        // Each ideograph is two cells; a half cut falls back to the
        // previous boundary.
        assert_eq!(fit_width("你好世界", 5), "你好…");
        assert_eq!(fit_width("你好世界", 4), "你…");
        assert_eq!(fit_width("你好世界", 8), "你好世界");
    }

    #[test]
    fn test_fit_width_keeps_combining_marks_together() {
        let text = "cafe\u{0301} latte";
        let fitted = fit_width(text, 5);
        assert_eq!(string_width(&fitted), 5);
        assert!(fitted.starts_with("cafe\u{0301}"));
    }

    #[test]
    fn test_string_width() {
        assert_eq!(string_width("abc"), 3);
        assert_eq!(string_width("你好"), 4);
        assert_eq!(string_width("e\u{0301}"), 1);
        assert_eq!(string_width(""), 0);
    }
}
