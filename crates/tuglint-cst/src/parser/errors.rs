// Copyright (c) Ken Kocienda and other contributors.
//
// This source code is licensed under the MIT license found in the
// LICENSE file in the root directory of this source tree.

use crate::tokenizer::LexError;
use thiserror::Error;
use tuglint_core::text::position_to_byte_offset;

#[allow(clippy::enum_variant_names)]
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ParserError {
    #[error("tokenizer error: {0}")]
    TokenizerError(#[from] LexError),
    #[error("parser error: {0}")]
    ParserError(#[from] SyntaxError),
}

impl ParserError {
    /// 1-indexed `(line, column)` of the error.
    pub fn position(&self) -> (u32, u32) {
        match self {
            ParserError::TokenizerError(e) => (e.line, e.col),
            ParserError::ParserError(e) => (e.line, e.col),
        }
    }

    /// Byte offset of the error in the source.
    pub fn offset(&self) -> usize {
        match self {
            ParserError::TokenizerError(e) => e.offset,
            ParserError::ParserError(e) => e.offset,
        }
    }
}

/// Render `err` as an annotated excerpt of `source`, one line of context on
/// each side.
///
/// # Example
///
/// ```
/// use tuglint_cst::{parse_module, prettify_error};
///
/// let source = "def";
/// if let Err(e) = parse_module(source) {
///     let formatted = prettify_error(&e, source, "example.py");
///     assert!(formatted.contains("example.py"));
/// }
/// ```
pub fn prettify_error(err: &ParserError, source: &str, label: &str) -> String {
    use annotate_snippets::{Level, Renderer, Snippet};

    let context = 1;
    let (line, col) = err.position();
    let first_line = line.saturating_sub(context).max(1);
    let start = position_to_byte_offset(source, first_line, 1);
    let end = position_to_byte_offset(source, line + context + 1, 1).max(start);
    let excerpt = &source[start..end];
    let span_start = err.offset().clamp(start, end) - start;
    let span_end = excerpt[span_start..]
        .chars()
        .next()
        .map_or(span_start, |c| span_start + c.len_utf8());
    let message = format!("{} ({}:{})", err, line, col);

    let rendered = Renderer::plain()
        .render(
            Level::Error.title(label).snippet(
                Snippet::source(excerpt)
                    .line_start(first_line as usize)
                    .fold(false)
                    .annotations(vec![Level::Error.span(span_start..span_end).label(&message)]),
            ),
        )
        .to_string();
    rendered
}

/// The token stream does not match the grammar.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[error("expected {expected}, found {found} at line {line}, column {col}")]
pub struct SyntaxError {
    /// What the parser was looking for.
    pub expected: String,
    /// Text of the offending token, or its kind for zero-width tokens.
    pub found: String,
    pub offset: usize,
    pub line: u32,
    pub col: u32,
}
