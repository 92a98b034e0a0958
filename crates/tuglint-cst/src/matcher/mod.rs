// Copyright (c) Ken Kocienda and other contributors.
//
// This source code is licensed under the MIT license found in the
// LICENSE file in the root directory of this source tree.

//! Declarative structural matching.
//!
//! A [`Pattern`] describes a node shape: a kind, optionally the leaf text,
//! and constraints on some of its slots. Patterns are data; [`matches`],
//! [`extract`], [`matches_seq`] and [`find_all`] evaluate them. Matching
//! looks only at kinds, slots and leaf text, never at positions or trivia.
//!
//! Patterns are usually built with the [`m`] helpers:
//!
//! ```ignore
//! use tuglint_cst::matcher::{m, matches};
//!
//! let pattern = m::class_def()
//!     .bases([m::at_least(1, m::arg().value(m::name("object")))])
//!     .into();
//! assert!(matches(&class_node, &pattern));
//! ```

mod builders;
mod eval;
mod pattern;

pub mod m {
    pub use super::builders::*;
}

pub use eval::{extract, extract_seq, find_all, matches, matches_seq, Captures};
pub use pattern::{MatchError, NodePattern, Pattern, SeqItem, SlotPattern, TextPattern};
