// Copyright (c) Ken Kocienda and other contributors.
//
// This source code is licensed under the MIT license found in the
// LICENSE file in the root directory of this source tree.

//! Pattern builders, one per node kind.
//!
//! ```ignore
//! use tuglint_cst::matcher::m;
//!
//! // class C(..., object, ...)
//! let pattern = m::class_def().bases([
//!     m::zero_or_more(m::any()),
//!     m::one(m::arg().keyword(m::absent()).value(m::name("object"))),
//!     m::zero_or_more(m::any()),
//! ]);
//! ```
//!
//! Leaf builders take the leaf text. Use [`of_kind`] for a leaf of any text.

use super::pattern::{NodePattern, Pattern, SeqItem, TextPattern};
use crate::nodes::{for_each_node_kind, NodeKind};

macro_rules! define_builders {
    (@builder #[leaf] $kind:ident $builder:ident) => {
        #[doc = concat!("A `", stringify!($kind), "` leaf whose text matches `text`.")]
        pub fn $builder(text: impl Into<TextPattern>) -> NodePattern {
            NodePattern::new(NodeKind::$kind).text(text)
        }
    };
    (@builder $kind:ident $builder:ident) => {
        #[doc = concat!("A `", stringify!($kind), "` node.")]
        pub fn $builder() -> NodePattern {
            NodePattern::new(NodeKind::$kind)
        }
    };
    ($(
        $(#[$leaf:ident])? $kind:ident $builder:ident { $($slot:ident : $arity:ident),* $(,)? }
    ),* $(,)?) => {
        $(define_builders!(@builder $(#[$leaf])? $kind $builder);)*
    };
}

for_each_node_kind!(define_builders);

/// A node of `kind` with no other constraint.
pub fn of_kind(kind: NodeKind) -> NodePattern {
    NodePattern::new(kind)
}

pub fn any() -> Pattern {
    Pattern::Any
}

pub fn absent() -> Pattern {
    Pattern::Absent
}

pub fn one_of<P: Into<Pattern>>(patterns: impl IntoIterator<Item = P>) -> Pattern {
    Pattern::OneOf(patterns.into_iter().map(Into::into).collect())
}

pub fn all_of<P: Into<Pattern>>(patterns: impl IntoIterator<Item = P>) -> Pattern {
    Pattern::AllOf(patterns.into_iter().map(Into::into).collect())
}

pub fn not(pattern: impl Into<Pattern>) -> Pattern {
    Pattern::negate(pattern)
}

pub fn capture(name: impl Into<String>, pattern: impl Into<Pattern>) -> Pattern {
    Pattern::capture(name, pattern)
}

pub fn type_of(kinds: impl IntoIterator<Item = NodeKind>) -> Pattern {
    Pattern::TypeOf(kinds.into_iter().collect())
}

/// Exactly one element.
pub fn one(pattern: impl Into<Pattern>) -> SeqItem {
    SeqItem::One(pattern.into())
}

pub fn at_least(n: usize, pattern: impl Into<Pattern>) -> SeqItem {
    SeqItem::AtLeastN {
        n,
        pattern: pattern.into(),
    }
}

pub fn at_most(n: usize, pattern: impl Into<Pattern>) -> SeqItem {
    SeqItem::AtMostN {
        n,
        pattern: pattern.into(),
    }
}

pub fn zero_or_more(pattern: impl Into<Pattern>) -> SeqItem {
    SeqItem::ZeroOrMore(pattern.into())
}

pub fn zero_or_one(pattern: impl Into<Pattern>) -> SeqItem {
    SeqItem::ZeroOrOne(pattern.into())
}

/// Bind the run of elements consumed by `item`.
pub fn capture_run(name: impl Into<String>, item: SeqItem) -> SeqItem {
    SeqItem::Capture(name.into(), Box::new(item))
}
