// Copyright (c) Ken Kocienda and other contributors.
//
// This source code is licensed under the MIT license found in the
// LICENSE file in the root directory of this source tree.

//! Lossless Python tokenizer.
//!
//! Every byte of the input ends up in exactly one token, either as the token's
//! text or as its leading/trailing trivia. Trivia assignment:
//!
//! - **trailing**: horizontal whitespace, backslash continuations, and a `#`
//!   comment up to (not including) the end of the line
//! - **leading**: everything else between two tokens: blank lines,
//!   comment-only lines, indentation, and newlines inside brackets
//!
//! `Indent`, `Dedent` and the synthesized end-of-file `Newline` are
//! zero-width. Trivia after the last token is the leading trivia of
//! `EndMarker`.

use std::fmt;
use std::sync::LazyLock;

use regex::Regex;
use thiserror::Error;
use tuglint_core::text::byte_offset_to_position;

use crate::nodes::Token;

/// Token kind tag.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TokType {
    Name,
    Number,
    String,
    Op,
    Newline,
    Indent,
    Dedent,
    EndMarker,
}

impl fmt::Display for TokType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            TokType::Name => "NAME",
            TokType::Number => "NUMBER",
            TokType::String => "STRING",
            TokType::Op => "OP",
            TokType::Newline => "NEWLINE",
            TokType::Indent => "INDENT",
            TokType::Dedent => "DEDENT",
            TokType::EndMarker => "ENDMARKER",
        };
        f.write_str(s)
    }
}

/// A token plus the byte offset where its text starts in the source.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LexToken {
    pub token: Token,
    pub start: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LexErrorKind {
    #[error("unrecognized character {0:?}")]
    BadCharacter(char),
    #[error("unterminated string literal")]
    UnterminatedString,
    #[error("unterminated triple-quoted string literal")]
    UnterminatedTripleQuotedString,
    #[error("unindent does not match any outer indentation level")]
    InconsistentDedent,
    #[error("unmatched closing bracket {0:?}")]
    UnmatchedClose(char),
    #[error("closing bracket {close:?} does not match opening bracket {open:?}")]
    MismatchedClose { open: char, close: char },
    #[error("unclosed bracket {0:?} at end of file")]
    UnclosedBracket(char),
    #[error("unexpected character after line continuation character")]
    BadContinuation,
}

/// Malformed input: the tokenizer could not make a token out of the bytes at
/// `offset`.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{kind} at line {line}, column {col}")]
pub struct LexError {
    pub kind: LexErrorKind,
    pub offset: usize,
    pub line: u32,
    pub col: u32,
}

impl LexError {
    fn new(kind: LexErrorKind, text: &str, offset: usize) -> Self {
        let (line, col) = byte_offset_to_position(text, offset);
        Self {
            kind,
            offset,
            line,
            col,
        }
    }
}

static NUMBER_RE: LazyLock<Regex> = LazyLock::new(|| {
    let digits = r"[0-9](?:_?[0-9])*";
    let exponent = format!(r"[eE][-+]?{digits}");
    let point_float = format!(r"(?:{digits}\.(?:{digits})?|\.{digits})");
    let pattern = format!(
        r"^(?:0[xX](?:_?[0-9a-fA-F])+|0[oO](?:_?[0-7])+|0[bB](?:_?[01])+|(?:{point_float}(?:{exponent})?|{digits}{exponent}|{digits})[jJ]?)"
    );
    Regex::new(&pattern).expect("number pattern is valid")
});

/// Operators, longest first so the first hit is the longest match.
const OPERATORS: &[&str] = &[
    "**=", "//=", ">>=", "<<=", "...", "->", ":=", "**", "//", "<<", ">>", "<=", ">=", "==",
    "!=", "+=", "-=", "*=", "/=", "%=", "&=", "|=", "^=", "@=", "+", "-", "*", "/", "%", "@",
    "&", "|", "^", "~", "<", ">", "(", ")", "[", "]", "{", "}", ",", ":", ";", ".", "=",
];

const TAB_SIZE: usize = 8;

struct TokState<'t> {
    text: &'t str,
    pos: usize,
    trivia_start: usize,
    brackets: Vec<(char, usize)>,
    indents: Vec<usize>,
    at_line_start: bool,
    line_has_content: bool,
    tokens: Vec<LexToken>,
}

/// Tokenize `text` into a lossless token stream ending with `EndMarker`.
pub fn tokenize(text: &str) -> Result<Vec<LexToken>, LexError> {
    let mut state = TokState {
        text,
        pos: 0,
        trivia_start: 0,
        brackets: Vec::new(),
        indents: vec![0],
        at_line_start: true,
        line_has_content: false,
        tokens: Vec::new(),
    };
    state.run()?;
    Ok(state.tokens)
}

impl<'t> TokState<'t> {
    fn rest(&self) -> &'t str {
        &self.text[self.pos..]
    }

    fn peek(&self) -> Option<char> {
        self.rest().chars().next()
    }

    fn error(&self, kind: LexErrorKind, offset: usize) -> LexError {
        LexError::new(kind, self.text, offset)
    }

    fn run(&mut self) -> Result<(), LexError> {
        // A byte-order mark is ordinary leading trivia.
        if self.rest().starts_with('\u{feff}') {
            self.pos += '\u{feff}'.len_utf8();
        }

        loop {
            if self.at_line_start && self.brackets.is_empty() {
                if !self.scan_indentation()? {
                    break;
                }
            } else {
                self.skip_insignificant()?;
            }

            let Some(c) = self.peek() else {
                break;
            };

            if self.brackets.is_empty() && (c == '\n' || c == '\r') {
                let len = newline_len(self.rest());
                self.push_zero_trivia(TokType::Newline, len);
                self.at_line_start = true;
                self.line_has_content = false;
                continue;
            }
            if c == '#' {
                // Only reachable after a continuation at the start of a
                // bracketed line; the comment is leading trivia.
                self.pos += comment_len(self.rest());
                continue;
            }

            self.lex_token(c)?;
        }

        self.finish()
    }

    /// Consume blank lines, comment lines and indentation at the start of a
    /// logical line, emitting `Indent`/`Dedent` as needed. Returns `false` at
    /// end of input.
    fn scan_indentation(&mut self) -> Result<bool, LexError> {
        loop {
            let mut col = 0usize;
            loop {
                match self.peek() {
                    Some(' ') => col += 1,
                    Some('\t') => col = (col / TAB_SIZE + 1) * TAB_SIZE,
                    Some('\x0c') => col = 0,
                    Some('\\') if is_continuation(self.rest()) => {
                        self.pos += continuation_len(self.rest());
                        continue;
                    }
                    _ => break,
                }
                self.pos += 1;
            }

            match self.peek() {
                None => return Ok(false),
                Some('#') => {
                    self.pos += comment_len(self.rest());
                    if self.peek().is_none() {
                        return Ok(false);
                    }
                }
                Some('\n') | Some('\r') => {
                    self.pos += newline_len(self.rest());
                }
                Some(_) => {
                    self.emit_indentation(col)?;
                    self.at_line_start = false;
                    return Ok(true);
                }
            }
        }
    }

    fn emit_indentation(&mut self, col: usize) -> Result<(), LexError> {
        let top = *self.indents.last().unwrap_or(&0);
        if col > top {
            self.indents.push(col);
            self.push_synthetic(TokType::Indent);
        } else {
            while col < *self.indents.last().unwrap_or(&0) {
                self.indents.pop();
                self.push_synthetic(TokType::Dedent);
            }
            if col != *self.indents.last().unwrap_or(&0) {
                return Err(self.error(LexErrorKind::InconsistentDedent, self.pos));
            }
        }
        Ok(())
    }

    /// Skip whitespace and continuations; inside brackets also newlines and
    /// comments. Skipped bytes stay in the pending leading trivia.
    fn skip_insignificant(&mut self) -> Result<(), LexError> {
        let in_brackets = !self.brackets.is_empty();
        loop {
            match self.peek() {
                Some(' ') | Some('\t') | Some('\x0c') => self.pos += 1,
                Some('\\') => {
                    if !is_continuation(self.rest()) {
                        return Err(self.error(LexErrorKind::BadContinuation, self.pos));
                    }
                    self.pos += continuation_len(self.rest());
                }
                Some('\n') | Some('\r') if in_brackets => self.pos += newline_len(self.rest()),
                Some('#') if in_brackets => self.pos += comment_len(self.rest()),
                _ => return Ok(()),
            }
        }
    }

    /// Consume same-line trailing trivia after a token.
    fn scan_trailing(&mut self) -> Result<(), LexError> {
        loop {
            match self.peek() {
                Some(' ') | Some('\t') | Some('\x0c') => self.pos += 1,
                Some('\\') => {
                    if !is_continuation(self.rest()) {
                        return Err(self.error(LexErrorKind::BadContinuation, self.pos));
                    }
                    self.pos += continuation_len(self.rest());
                }
                Some('#') => {
                    self.pos += comment_len(self.rest());
                    return Ok(());
                }
                _ => return Ok(()),
            }
        }
    }

    fn lex_token(&mut self, c: char) -> Result<(), LexError> {
        let start = self.pos;
        let rest = self.rest();

        let (kind, len) = if let Some(len) = string_prefix_len(rest) {
            (TokType::String, self.string_len(start, len)?)
        } else if c == '_' || c.is_alphabetic() {
            let len = rest
                .char_indices()
                .find(|&(_, ch)| !(ch == '_' || ch.is_alphanumeric()))
                .map(|(i, _)| i)
                .unwrap_or(rest.len());
            (TokType::Name, len)
        } else if let Some(m) = NUMBER_RE.find(rest).filter(|m| !m.is_empty()) {
            (TokType::Number, m.end())
        } else if let Some(op) = OPERATORS.iter().find(|op| rest.starts_with(**op)) {
            self.track_bracket(op, start)?;
            (TokType::Op, op.len())
        } else {
            return Err(self.error(LexErrorKind::BadCharacter(c), start));
        };

        let leading = self.text[self.trivia_start..start].to_string();
        let text = self.text[start..start + len].to_string();
        self.pos = start + len;
        let trailing_start = self.pos;
        self.scan_trailing()?;
        let trailing = self.text[trailing_start..self.pos].to_string();

        self.tokens.push(LexToken {
            token: Token {
                kind,
                text,
                leading,
                trailing,
            },
            start,
        });
        self.trivia_start = self.pos;
        self.line_has_content = true;
        Ok(())
    }

    fn track_bracket(&mut self, op: &str, offset: usize) -> Result<(), LexError> {
        match op {
            "(" | "[" | "{" => {
                let open = op.chars().next().unwrap_or('(');
                self.brackets.push((open, offset));
            }
            ")" | "]" | "}" => {
                let close = op.chars().next().unwrap_or(')');
                let Some((open, _)) = self.brackets.pop() else {
                    return Err(self.error(LexErrorKind::UnmatchedClose(close), offset));
                };
                let expected = match open {
                    '(' => ')',
                    '[' => ']',
                    _ => '}',
                };
                if close != expected {
                    return Err(self.error(LexErrorKind::MismatchedClose { open, close }, offset));
                }
            }
            _ => {}
        }
        Ok(())
    }

    /// Length of the string literal starting at `start` whose prefix is
    /// `prefix_len` bytes long.
    fn string_len(&self, start: usize, prefix_len: usize) -> Result<usize, LexError> {
        let bytes = self.text.as_bytes();
        let quote_pos = start + prefix_len;
        let quote = bytes[quote_pos];
        let triple = bytes.len() >= quote_pos + 3
            && bytes[quote_pos + 1] == quote
            && bytes[quote_pos + 2] == quote;

        let mut i = quote_pos + if triple { 3 } else { 1 };
        loop {
            let hit = if triple {
                memchr::memchr2(quote, b'\\', &bytes[i..])
            } else {
                memchr::memchr3(quote, b'\\', b'\n', &bytes[i..])
            };
            let Some(off) = hit else {
                let kind = if triple {
                    LexErrorKind::UnterminatedTripleQuotedString
                } else {
                    LexErrorKind::UnterminatedString
                };
                return Err(self.error(kind, start));
            };
            i += off;
            match bytes[i] {
                b'\\' => i += escaped_len(&self.text[i..]),
                b'\n' => return Err(self.error(LexErrorKind::UnterminatedString, start)),
                _ if !triple => return Ok(i + 1 - start),
                _ if bytes.len() >= i + 3 && bytes[i + 1] == quote && bytes[i + 2] == quote => {
                    return Ok(i + 3 - start);
                }
                _ => i += 1,
            }
        }
    }

    fn push_synthetic(&mut self, kind: TokType) {
        self.tokens.push(LexToken {
            token: Token {
                kind,
                text: String::new(),
                leading: String::new(),
                trailing: String::new(),
            },
            start: self.pos,
        });
    }

    /// Push a token whose text is the next `len` bytes and whose leading
    /// trivia is whatever is pending.
    fn push_zero_trivia(&mut self, kind: TokType, len: usize) {
        let start = self.pos;
        let leading = self.text[self.trivia_start..start].to_string();
        self.tokens.push(LexToken {
            token: Token {
                kind,
                text: self.text[start..start + len].to_string(),
                leading,
                trailing: String::new(),
            },
            start,
        });
        self.pos += len;
        self.trivia_start = self.pos;
    }

    fn finish(&mut self) -> Result<(), LexError> {
        if let Some(&(open, offset)) = self.brackets.last() {
            return Err(self.error(LexErrorKind::UnclosedBracket(open), offset));
        }
        if self.line_has_content {
            self.push_synthetic(TokType::Newline);
        }
        while self.indents.len() > 1 {
            self.indents.pop();
            self.push_synthetic(TokType::Dedent);
        }
        self.pos = self.text.len();
        self.push_zero_trivia(TokType::EndMarker, 0);
        Ok(())
    }
}

fn newline_len(s: &str) -> usize {
    if s.starts_with("\r\n") {
        2
    } else if s.starts_with('\n') || s.starts_with('\r') {
        1
    } else {
        0
    }
}

fn comment_len(s: &str) -> usize {
    memchr::memchr2(b'\n', b'\r', s.as_bytes()).unwrap_or(s.len())
}

fn is_continuation(s: &str) -> bool {
    s.starts_with('\\') && newline_len(&s[1..]) > 0
}

fn continuation_len(s: &str) -> usize {
    1 + newline_len(&s[1..])
}

/// Length of a backslash escape inside a string, counting the backslash.
fn escaped_len(s: &str) -> usize {
    let next = s[1..].chars().next().map(char::len_utf8).unwrap_or(0);
    if s[1..].starts_with("\r\n") {
        3
    } else {
        1 + next
    }
}

/// If `s` starts a string literal, the byte length of its prefix.
fn string_prefix_len(s: &str) -> Option<usize> {
    let bytes = s.as_bytes();
    let prefix_len = bytes
        .iter()
        .take(3)
        .position(|b| *b == b'\'' || *b == b'"')?;
    let prefix = s[..prefix_len].to_ascii_lowercase();
    matches!(
        prefix.as_str(),
        "" | "r" | "u" | "b" | "f" | "br" | "rb" | "fr" | "rf"
    )
    .then_some(prefix_len)
}
