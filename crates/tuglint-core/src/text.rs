//! Text position utilities for byte offset and line:column conversions.
//!
//! ## Coordinate Conventions
//!
//! - Lines and columns are **1-indexed** (matching editor conventions)
//! - Byte offsets are **0-indexed**
//! - Columns count Unicode scalar values, not bytes
//!
//! For one-off conversions use [`byte_offset_to_position`]. When many offsets
//! of the same file are converted (every violation of a lint run), build a
//! [`LineIndex`] once and query it.

use crate::span::Span;

/// Convert a byte offset to 1-indexed line and column.
///
/// If `offset` exceeds the content length, returns the position at the end
/// of the content. Offsets inside a multi-byte character resolve to that
/// character's column.
pub fn byte_offset_to_position(content: &str, offset: usize) -> (u32, u32) {
    let mut line = 1u32;
    let mut col = 1u32;

    for (i, ch) in content.char_indices() {
        if i >= offset {
            break;
        }
        if ch == '\n' {
            line += 1;
            col = 1;
        } else if i + ch.len_utf8() <= offset {
            col += 1;
        }
    }

    (line, col)
}

/// Convert 1-indexed line and column to a byte offset.
///
/// Line/column values of 0 are treated as 1. A column beyond the end of the
/// line clamps to the line end; a line beyond the content returns the
/// content length.
pub fn position_to_byte_offset(content: &str, line: u32, col: u32) -> usize {
    let line = line.max(1);
    let col = col.max(1);

    let Some(start) = nth_line_start(content, line) else {
        return content.len();
    };
    let rest = &content[start..];
    let line_end = rest.find('\n').unwrap_or(rest.len());
    rest[..line_end]
        .char_indices()
        .nth((col - 1) as usize)
        .map(|(i, _)| start + i)
        .unwrap_or(start + line_end)
}

fn nth_line_start(content: &str, line: u32) -> Option<usize> {
    if line == 1 {
        return Some(0);
    }
    content
        .match_indices('\n')
        .nth((line - 2) as usize)
        .map(|(i, _)| i + 1)
}

/// Get the line range spanned by a byte span.
///
/// Returns `(start_line, end_line)` both 1-indexed.
pub fn span_to_line_range(content: &str, span: &Span) -> (u32, u32) {
    let (start_line, _) = byte_offset_to_position(content, span.start);
    let (end_line, _) =
        byte_offset_to_position(content, span.end.saturating_sub(1).max(span.start));
    (start_line, end_line)
}

/// Extract the text content of a span.
///
/// Returns `None` if the span is out of bounds or not on char boundaries.
pub fn extract_span<'a>(content: &'a str, span: &Span) -> Option<&'a str> {
    content.get(span.start..span.end)
}

/// Count the number of lines in the content.
pub fn line_count(content: &str) -> u32 {
    let newlines = content.bytes().filter(|&b| b == b'\n').count() as u32;
    if content.is_empty() {
        0
    } else if content.ends_with('\n') {
        newlines
    } else {
        newlines + 1
    }
}

/// Precomputed line starts for repeated offset lookups.
#[derive(Debug, Clone)]
pub struct LineIndex<'a> {
    content: &'a str,
    line_starts: Vec<usize>,
}

impl<'a> LineIndex<'a> {
    pub fn new(content: &'a str) -> Self {
        let mut line_starts = vec![0];
        line_starts.extend(newline_offsets(content).map(|i| i + 1));
        Self {
            content,
            line_starts,
        }
    }

    /// Convert a byte offset to 1-indexed `(line, col)`.
    pub fn position(&self, offset: usize) -> (u32, u32) {
        let offset = offset.min(self.content.len());
        let line_idx = match self.line_starts.binary_search(&offset) {
            Ok(i) => i,
            Err(i) => i - 1,
        };
        let start = self.line_starts[line_idx];
        let col = self.content[start..]
            .char_indices()
            .take_while(|(i, c)| start + i + c.len_utf8() <= offset)
            .count();
        (line_idx as u32 + 1, col as u32 + 1)
    }

    pub fn line_count(&self) -> usize {
        self.line_starts.len()
    }
}

fn newline_offsets(content: &str) -> impl Iterator<Item = usize> + '_ {
    content
        .bytes()
        .enumerate()
        .filter_map(|(i, b)| (b == b'\n').then_some(i))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn offset_to_position_simple() {
        let content = "line1\nline2\nline3\n";
        assert_eq!(byte_offset_to_position(content, 0), (1, 1));
        assert_eq!(byte_offset_to_position(content, 4), (1, 5));
        assert_eq!(byte_offset_to_position(content, 6), (2, 1));
        assert_eq!(byte_offset_to_position(content, 12), (3, 1));
    }

    #[test]
    fn position_to_offset_simple() {
        let content = "def foo():\n    pass\n";
        assert_eq!(position_to_byte_offset(content, 1, 1), 0);
        assert_eq!(position_to_byte_offset(content, 1, 5), 4);
        assert_eq!(position_to_byte_offset(content, 2, 1), 11);
        assert_eq!(position_to_byte_offset(content, 1, 100), 10);
        assert_eq!(position_to_byte_offset(content, 9, 1), content.len());
    }

    #[test]
    fn roundtrip_offsets() {
        let content = "class C:\n    x = 'é'\n";
        for (offset, _) in content.char_indices() {
            let (line, col) = byte_offset_to_position(content, offset);
            assert_eq!(position_to_byte_offset(content, line, col), offset);
        }
    }

    #[test]
    fn multibyte_columns_count_chars() {
        let content = "é = 1";
        assert_eq!(byte_offset_to_position(content, 2), (1, 2));
    }

    #[test]
    fn line_index_agrees_with_scan() {
        let content = "a = 1\n\nif a:\n    b = 'ü'\n";
        let index = LineIndex::new(content);
        for (offset, _) in content.char_indices() {
            assert_eq!(
                index.position(offset),
                byte_offset_to_position(content, offset),
                "offset {}",
                offset
            );
        }
        assert_eq!(index.line_count(), 5);
    }

    #[test]
    fn span_helpers() {
        let content = "line1\nline2\nline3\n";
        assert_eq!(span_to_line_range(content, &Span::new(0, 11)), (1, 2));
        assert_eq!(extract_span(content, &Span::new(6, 11)), Some("line2"));
        assert_eq!(extract_span(content, &Span::new(6, 100)), None);
    }

    #[test]
    fn line_count_tests() {
        assert_eq!(line_count(""), 0);
        assert_eq!(line_count("one line"), 1);
        assert_eq!(line_count("one line\n"), 1);
        assert_eq!(line_count("line1\nline2"), 2);
    }
}
