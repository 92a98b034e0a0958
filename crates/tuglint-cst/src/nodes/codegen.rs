// Copyright (c) Ken Kocienda and other contributors.
//
// This source code is licensed under the MIT license found in the
// LICENSE file in the root directory of this source tree.

//! Rendering nodes back to source text.
//!
//! Rendering cannot fail. Parsed trees carry every byte in their tokens, so
//! an unmodified tree renders byte-identical to its input.

use std::fmt;

use crate::nodes::node::{Child, Node, Part, Presence, Token};

/// Accumulates rendered text.
#[derive(Debug, Default)]
pub struct CodegenState {
    pub tokens: String,
}

impl CodegenState {
    pub fn add_token(&mut self, tok: &str) {
        self.tokens.push_str(tok);
    }

    /// Current length of the rendered text in bytes.
    pub fn offset(&self) -> usize {
        self.tokens.len()
    }
}

impl fmt::Display for CodegenState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.tokens)
    }
}

/// Where a node sits in its parent's sequence; resolves `Auto` separators.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SeqPos {
    pub is_last: bool,
    /// The parent wants a separator even after the last element.
    pub force_trailing: bool,
}

impl SeqPos {
    /// Position of a child that is not part of a sequence.
    pub const LONE: SeqPos = SeqPos {
        is_last: true,
        force_trailing: false,
    };
}

pub trait Codegen {
    fn codegen(&self, state: &mut CodegenState);

    /// Render into a fresh string.
    fn to_source(&self) -> String {
        let mut state = CodegenState::default();
        self.codegen(&mut state);
        state.tokens
    }
}

impl Codegen for Token {
    fn codegen(&self, state: &mut CodegenState) {
        state.add_token(&self.leading);
        state.add_token(&self.text);
        state.add_token(&self.trailing);
    }
}

impl Codegen for Node {
    fn codegen(&self, state: &mut CodegenState) {
        self.codegen_at(state, SeqPos::LONE);
    }
}

impl<T: Codegen> Codegen for std::sync::Arc<T> {
    fn codegen(&self, state: &mut CodegenState) {
        (**self).codegen(state)
    }
}

impl Node {
    /// Render the node as element `pos` of its parent's sequence.
    pub fn codegen_at(&self, state: &mut CodegenState, pos: SeqPos) {
        for part in &self.parts {
            match part {
                Part::Token(token) => token.codegen(state),
                Part::Punct(_, Presence::Present(token)) => token.codegen(state),
                Part::Punct(_, Presence::Absent) => {}
                Part::Punct(role, Presence::Auto) => {
                    if let Some(text) = self.resolve_auto(*role, pos) {
                        state.add_token(text);
                    }
                }
                Part::Slot(_, Child::Seq(items)) => {
                    let force_trailing = items.len() == 1 && self.kind.forces_trailing_separator();
                    for (i, item) in items.iter().enumerate() {
                        let pos = SeqPos {
                            is_last: i + 1 == items.len(),
                            force_trailing,
                        };
                        item.codegen_at(state, pos);
                    }
                }
                Part::Slot(_, child) => {
                    for item in child.as_slice() {
                        item.codegen(state);
                    }
                }
            }
        }
    }
}
