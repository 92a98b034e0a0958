// Copyright (c) Ken Kocienda and other contributors.
//
// This source code is licensed under the MIT license found in the
// LICENSE file in the root directory of this source tree.

//! Tokenizer for Python source code.

mod core;

pub use self::core::{tokenize, LexError, LexErrorKind, LexToken, TokType};

#[cfg(test)]
mod tests;
