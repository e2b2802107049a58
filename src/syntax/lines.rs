//! Line byte ranges for callers that do not keep their own line index

use ropey::{Rope, RopeSlice};

use super::highlights::ByteRange;

/// Byte range of every line in `text`, excluding line terminators.
///
/// Follows ropey's line breaking, so a trailing newline produces a final
/// empty line.
pub fn line_ranges(text: &str) -> Vec<ByteRange> {
    let rope = Rope::from_str(text);
    (0..rope.len_lines())
        .map(|idx| {
            let start = rope.line_to_byte(idx);
            ByteRange::new(start, content_len(rope.line(idx)))
        })
        .collect()
}

/// Length in bytes of `line` without its terminator
fn content_len(line: RopeSlice) -> usize {
    let len = line.len_bytes();
    let mut chars = line.chars_at(line.len_chars());
    match chars.prev() {
        Some('\n') => match chars.prev() {
            Some('\r') => len - 2,
            _ => len - 1,
        },
        Some(c @ ('\r' | '\u{000B}' | '\u{000C}' | '\u{0085}' | '\u{2028}' | '\u{2029}')) => {
            len - c.len_utf8()
        }
        _ => len,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_line_ranges_lf() {
        let ranges = line_ranges("fn a() {}\nlet x;\n");
        assert_eq!(
            ranges,
            vec![
                ByteRange::new(0, 9),
                ByteRange::new(10, 6),
                ByteRange::new(17, 0)
            ]
        );
    }

    #[test]
    fn test_line_ranges_crlf() {
        let ranges = line_ranges("ab\r\ncd");
        assert_eq!(ranges, vec![ByteRange::new(0, 2), ByteRange::new(4, 2)]);
    }

    #[test]
    fn test_line_ranges_multibyte() {
        let ranges = line_ranges("é\nü");
        assert_eq!(ranges, vec![ByteRange::new(0, 2), ByteRange::new(3, 2)]);
    }

    #[test]
    fn test_line_ranges_empty_text() {
        assert_eq!(line_ranges(""), vec![ByteRange::new(0, 0)]);
    }
}
