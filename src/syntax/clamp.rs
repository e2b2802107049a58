//! Turning captures into line-local tokens
//!
//! A capture may start before or end after the line it is rendered on
//! (block comments, raw strings), so each one is clipped to the line, moved
//! into line coordinates, and given the theme's style for its tag.

use super::highlights::{ByteRange, Capture, HighlightToken};
use crate::theme::ThemePolicy;

/// Clip `capture` to `line` and express the result relative to `line.start`.
///
/// Returns `None` when nothing of the capture is left on the line.
pub fn clamp_to_line(capture: ByteRange, line: ByteRange) -> Option<ByteRange> {
    let start = capture.start.max(line.start);
    let end = capture.end().min(line.end());
    if end <= start {
        return None;
    }
    Some(ByteRange::from_bounds(start - line.start, end - line.start))
}

/// Build the tokens for one line, preserving capture order.
///
/// Captures outside the line, empty after clipping, or styled as nothing by
/// the theme produce no token.
pub fn attributes<T: ThemePolicy + ?Sized>(
    captures: &[Capture],
    line: ByteRange,
    theme: &T,
) -> Vec<HighlightToken> {
    captures
        .iter()
        .filter_map(|capture| {
            let range = clamp_to_line(capture.range, line)?;
            let color = theme.color_for(&capture.tag);
            let font = theme.font_for(&capture.tag);
            if color.is_none() && font.is_plain() {
                return None;
            }
            Some(HighlightToken { range, color, font })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::theme::{Color, FontStyle};

    /// "comment" resolves to no style at all, "emphasis" to italics only
    struct TestTheme;

    impl ThemePolicy for TestTheme {
        fn color_for(&self, tag: &str) -> Option<Color> {
            match tag {
                "comment" | "emphasis" => None,
                "keyword" => Some(Color::rgb(0xCC, 0x78, 0x32)),
                _ => Some(Color::rgb(0x6A, 0x87, 0x59)),
            }
        }

        fn font_for(&self, tag: &str) -> FontStyle {
            match tag {
                "emphasis" => FontStyle {
                    bold: false,
                    italic: true,
                },
                _ => FontStyle::default(),
            }
        }
    }

    fn cap(tag: &str, start: usize, end: usize) -> Capture {
        Capture::new(tag, ByteRange::from_bounds(start, end))
    }

    fn line(start: usize, end: usize) -> ByteRange {
        ByteRange::from_bounds(start, end)
    }

    #[test]
    fn test_capture_starting_before_line() {
        let tokens = attributes(&[cap("string", 5, 15)], line(10, 20), &TestTheme);

        assert_eq!(tokens.len(), 1);
        assert_eq!(tokens[0].range, ByteRange::new(0, 5));
    }

    #[test]
    fn test_capture_ending_after_line() {
        let tokens = attributes(&[cap("string", 15, 40)], line(10, 20), &TestTheme);

        assert_eq!(tokens.len(), 1);
        assert_eq!(tokens[0].range, ByteRange::new(5, 5));
    }

    #[test]
    fn test_zero_width_capture_dropped() {
        let captures = [cap("keyword", 0, 3), cap("punctuation", 3, 3)];
        let tokens = attributes(&captures, line(0, 10), &TestTheme);

        assert_eq!(tokens.len(), 1);
        assert_eq!(tokens[0].range, ByteRange::new(0, 3));
        assert_eq!(tokens[0].color, TestTheme.color_for("keyword"));
    }

    #[test]
    fn test_capture_outside_line_dropped() {
        let captures = [
            cap("keyword", 0, 3),
            cap("keyword", 20, 25),
            cap("keyword", 3, 10),
        ];
        assert!(attributes(&captures, line(10, 20), &TestTheme).is_empty());
    }

    #[test]
    fn test_capture_covering_line() {
        let tokens = attributes(&[cap("string", 10, 20)], line(10, 20), &TestTheme);

        assert_eq!(tokens.len(), 1);
        assert_eq!(tokens[0].range, ByteRange::new(0, 10));
    }

    #[test]
    fn test_invisible_style_dropped() {
        let tokens = attributes(&[cap("comment", 0, 5)], line(0, 10), &TestTheme);
        assert!(tokens.is_empty());
    }

    #[test]
    fn test_font_only_style_kept() {
        let tokens = attributes(&[cap("emphasis", 2, 6)], line(0, 10), &TestTheme);

        assert_eq!(tokens.len(), 1);
        assert_eq!(tokens[0].color, None);
        assert!(tokens[0].font.italic);
    }

    #[test]
    fn test_order_preserved() {
        let captures = [
            cap("string", 12, 18),
            cap("keyword", 10, 12),
            cap("string", 14, 15),
        ];
        let tokens = attributes(&captures, line(10, 20), &TestTheme);

        let starts: Vec<usize> = tokens.iter().map(|t| t.range.start).collect();
        assert_eq!(starts, vec![2, 0, 4]);
    }

    #[test]
    fn test_tokens_stay_inside_line() {
        let target = line(100, 140);
        for start in (60..180).step_by(7) {
            for len in [0, 1, 5, 13, 40, 90] {
                let capture = ByteRange::new(start, len);
                if let Some(local) = clamp_to_line(capture, target) {
                    assert!(local.len > 0);
                    assert!(local.end() <= target.len, "{:?} escapes line", local);
                }
            }
        }
    }

    #[test]
    fn test_range_near_usize_max() {
        let capture = ByteRange::new(usize::MAX - 1, 5);
        assert_eq!(clamp_to_line(capture, line(0, 10)), None);
        assert_eq!(
            clamp_to_line(capture, ByteRange::new(usize::MAX - 4, 10)),
            Some(ByteRange::new(3, 1))
        );
    }

    #[test]
    fn test_empty_line_yields_nothing() {
        assert_eq!(clamp_to_line(ByteRange::new(0, 10), line(5, 5)), None);
    }
}
