// Copyright (c) Ken Kocienda and other contributors.
//
// This source code is licensed under the MIT license found in the
// LICENSE file in the root directory of this source tree.

use super::{tokenize, LexErrorKind, TokType};

fn tokenize_all(text: &str) -> Result<Vec<(TokType, String)>, LexErrorKind> {
    let tokens = tokenize(text).map_err(|e| e.kind)?;
    let mut result: Vec<(TokType, String)> = tokens
        .into_iter()
        .map(|t| (t.token.kind, t.token.text))
        .collect();
    // Remove the EndMarker, since it's on every non-error token stream.
    assert_eq!(result.pop().expect("EndMarker").0, TokType::EndMarker);
    Ok(result)
}

fn reconstruct(text: &str) -> String {
    tokenize(text)
        .expect("tokenize")
        .iter()
        .map(|t| format!("{}{}{}", t.token.leading, t.token.text, t.token.trailing))
        .collect()
}

fn tok(kind: TokType, text: &str) -> (TokType, String) {
    (kind, text.to_string())
}

#[test]
fn test_identifier() {
    assert_eq!(
        tokenize_all("test input"),
        Ok(vec![
            tok(TokType::Name, "test"),
            tok(TokType::Name, "input"),
            tok(TokType::Newline, ""),
        ])
    );
    assert_eq!(
        tokenize_all("\u{0100}\u{0101}unicode_1"),
        Ok(vec![
            tok(TokType::Name, "\u{0100}\u{0101}unicode_1"),
            tok(TokType::Newline, ""),
        ])
    );
}

#[test]
fn test_operators_longest_match() {
    assert_eq!(
        tokenize_all("a **= b // c -> ...\n"),
        Ok(vec![
            tok(TokType::Name, "a"),
            tok(TokType::Op, "**="),
            tok(TokType::Name, "b"),
            tok(TokType::Op, "//"),
            tok(TokType::Name, "c"),
            tok(TokType::Op, "->"),
            tok(TokType::Op, "..."),
            tok(TokType::Newline, "\n"),
        ])
    );
}

#[test]
fn test_numbers() {
    for number in ["0", "1_000", "0x_FF", "0o17", "0b1010", "1.5", "1.", ".5", "1e10", "1.5E-3", "3j", "1.5j"] {
        assert_eq!(
            tokenize_all(number),
            Ok(vec![tok(TokType::Number, number), tok(TokType::Newline, "")]),
            "number {}",
            number
        );
    }
}

#[test]
fn test_strings() {
    for string in [
        "'a'",
        "\"a\"",
        "r'\\d'",
        "b'x'",
        "Rb'x'",
        "f'{x}'",
        "'''multi\nline'''",
        "\"\"\"doc \"quoted\" \"\"\"",
        "'esc\\'aped'",
        "''",
    ] {
        assert_eq!(
            tokenize_all(string),
            Ok(vec![tok(TokType::String, string), tok(TokType::Newline, "")]),
            "string {}",
            string
        );
    }
}

#[test]
fn test_indent_dedent() {
    assert_eq!(
        tokenize_all("if x:\n    y\nz\n"),
        Ok(vec![
            tok(TokType::Name, "if"),
            tok(TokType::Name, "x"),
            tok(TokType::Op, ":"),
            tok(TokType::Newline, "\n"),
            tok(TokType::Indent, ""),
            tok(TokType::Name, "y"),
            tok(TokType::Newline, "\n"),
            tok(TokType::Dedent, ""),
            tok(TokType::Name, "z"),
            tok(TokType::Newline, "\n"),
        ])
    );
}

#[test]
fn test_dedent_at_eof() {
    let result = tokenize_all("def f():\n    return 1").unwrap();
    let kinds: Vec<TokType> = result.iter().map(|(k, _)| *k).collect();
    assert_eq!(
        &kinds[kinds.len() - 3..],
        &[TokType::Number, TokType::Newline, TokType::Dedent]
    );
}

#[test]
fn test_brackets_suppress_newlines() {
    assert_eq!(
        tokenize_all("f(a,\n  b)\n"),
        Ok(vec![
            tok(TokType::Name, "f"),
            tok(TokType::Op, "("),
            tok(TokType::Name, "a"),
            tok(TokType::Op, ","),
            tok(TokType::Name, "b"),
            tok(TokType::Op, ")"),
            tok(TokType::Newline, "\n"),
        ])
    );
}

#[test]
fn test_trivia_assignment() {
    let tokens = tokenize("x = 1  # note\n\n# lead\ny\n").unwrap();
    let one = &tokens[2].token;
    assert_eq!(one.text, "1");
    assert_eq!(one.trailing, "  # note");
    let y = &tokens[4].token;
    assert_eq!(y.text, "y");
    assert_eq!(y.leading, "\n# lead\n");
}

#[test]
fn test_reconstruction_is_lossless() {
    let sources = [
        "",
        "\n\n",
        "#!/usr/bin/env python\n# -*- coding: utf-8 -*-\nx = 1\n",
        "\u{feff}x = 1\n",
        "x = (1 +  # comment\n     2)\n",
        "y = 1 + \\\n    2\n",
        "class A:\n\n    # c\n    def f(self):\n        pass\n\n\n# trailing\n",
        "if a:\r\n    b\r\n",
        "x = 1\t\x0c\n",
        "s = '''a\n  b'''  \n",
        "no_newline_at_end",
    ];
    for source in sources {
        assert_eq!(reconstruct(source), source, "source {:?}", source);
    }
}

#[test]
fn test_errors() {
    assert_eq!(
        tokenize_all("a $ b"),
        Err(LexErrorKind::BadCharacter('$'))
    );
    assert_eq!(tokenize_all("'abc"), Err(LexErrorKind::UnterminatedString));
    assert_eq!(
        tokenize_all("'''abc"),
        Err(LexErrorKind::UnterminatedTripleQuotedString)
    );
    assert_eq!(tokenize_all("x)"), Err(LexErrorKind::UnmatchedClose(')')));
    assert_eq!(
        tokenize_all("(x]"),
        Err(LexErrorKind::MismatchedClose {
            open: '(',
            close: ']'
        })
    );
    assert_eq!(tokenize_all("f(x"), Err(LexErrorKind::UnclosedBracket('(')));
    assert_eq!(
        tokenize_all("if x:\n        a\n    b\n"),
        Err(LexErrorKind::InconsistentDedent)
    );
    assert_eq!(tokenize_all("a \\ b"), Err(LexErrorKind::BadContinuation));
}

#[test]
fn test_error_position() {
    let err = tokenize("x = 1\ny = $\n").unwrap_err();
    assert_eq!((err.line, err.col), (2, 5));
    assert_eq!(err.offset, 10);
}
