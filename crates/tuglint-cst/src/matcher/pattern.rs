// Copyright (c) Ken Kocienda and other contributors.
//
// This source code is licensed under the MIT license found in the
// LICENSE file in the root directory of this source tree.

//! Pattern data types.
//!
//! Patterns are plain values: building one never touches a tree, and the same
//! pattern can be shared across threads and evaluated against any number of
//! nodes.

use regex::Regex;
use thiserror::Error;

use crate::nodes::{for_each_slot, Arity, NodeKind, Slot};

/// Comparison against a leaf's value text.
#[derive(Debug, Clone)]
pub enum TextPattern {
    Exact(String),
    Regex(Regex),
}

impl TextPattern {
    /// A pattern matching the whole value against `pattern`.
    ///
    /// The expression is anchored at both ends.
    pub fn regex(pattern: &str) -> Result<Self, MatchError> {
        let anchored = format!("^(?:{})$", pattern);
        Ok(TextPattern::Regex(Regex::new(&anchored)?))
    }

    pub fn is_match(&self, text: &str) -> bool {
        match self {
            TextPattern::Exact(expected) => expected == text,
            TextPattern::Regex(regex) => regex.is_match(text),
        }
    }
}

impl From<&str> for TextPattern {
    fn from(text: &str) -> Self {
        TextPattern::Exact(text.to_string())
    }
}

impl From<String> for TextPattern {
    fn from(text: String) -> Self {
        TextPattern::Exact(text)
    }
}

/// A declarative description of a node shape.
#[derive(Debug, Clone)]
pub enum Pattern {
    /// Matches any node, and an empty optional slot.
    Any,
    /// Matches only an empty optional slot.
    Absent,
    Node(NodePattern),
    /// Matches if any alternative matches. Alternatives are tried in order.
    OneOf(Vec<Pattern>),
    AllOf(Vec<Pattern>),
    Not(Box<Pattern>),
    /// Binds the matched node to a name.
    Capture(String, Box<Pattern>),
    /// Matches a node of any of the listed kinds.
    TypeOf(Vec<NodeKind>),
}

impl Pattern {
    pub fn capture(name: impl Into<String>, pattern: impl Into<Pattern>) -> Self {
        Pattern::Capture(name.into(), Box::new(pattern.into()))
    }

    pub fn negate(pattern: impl Into<Pattern>) -> Self {
        Pattern::Not(Box::new(pattern.into()))
    }

    /// Check that every slot a pattern names exists on its kind and that
    /// the slot pattern fits the slot's arity.
    pub fn validate(&self) -> Result<(), MatchError> {
        match self {
            Pattern::Any | Pattern::Absent | Pattern::TypeOf(_) => Ok(()),
            Pattern::Node(node) => node.validate(),
            Pattern::OneOf(patterns) | Pattern::AllOf(patterns) => {
                patterns.iter().try_for_each(Pattern::validate)
            }
            Pattern::Not(pattern) | Pattern::Capture(_, pattern) => pattern.validate(),
        }
    }
}

/// A node kind, an optional leaf text, and constraints on some slots.
///
/// Slots without a constraint are "don't care".
#[derive(Debug, Clone)]
pub struct NodePattern {
    pub kind: NodeKind,
    pub text: Option<TextPattern>,
    pub slots: Vec<(Slot, SlotPattern)>,
}

impl NodePattern {
    pub fn new(kind: NodeKind) -> Self {
        Self {
            kind,
            text: None,
            slots: Vec::new(),
        }
    }

    /// Constrain the leaf value text.
    pub fn text(mut self, text: impl Into<TextPattern>) -> Self {
        self.text = Some(text.into());
        self
    }

    /// Constrain `slot`, replacing any earlier constraint on it.
    pub fn slot(mut self, slot: Slot, pattern: impl Into<SlotPattern>) -> Self {
        let pattern = pattern.into();
        match self.slots.iter_mut().find(|(s, _)| *s == slot) {
            Some((_, existing)) => *existing = pattern,
            None => self.slots.push((slot, pattern)),
        }
        self
    }

    fn validate(&self) -> Result<(), MatchError> {
        if self.text.is_some() && !self.kind.is_leaf() {
            return Err(MatchError::TextOnNonLeaf { kind: self.kind });
        }
        for (slot, pattern) in &self.slots {
            let arity = self.kind.arity(*slot).ok_or(MatchError::UnknownSlot {
                kind: self.kind,
                slot: *slot,
            })?;
            let mismatch = MatchError::ArityMismatch {
                kind: self.kind,
                slot: *slot,
                arity,
            };
            match (pattern, arity) {
                (SlotPattern::One(Pattern::Any), _) => {}
                (SlotPattern::One(Pattern::Absent), Arity::One) => return Err(mismatch),
                (SlotPattern::One(_), Arity::Seq) => return Err(mismatch),
                (SlotPattern::Seq(_), Arity::One | Arity::Opt) => return Err(mismatch),
                _ => {}
            }
            match pattern {
                SlotPattern::One(pattern) => pattern.validate()?,
                SlotPattern::Seq(items) => items.iter().try_for_each(SeqItem::validate)?,
            }
        }
        Ok(())
    }
}

macro_rules! define_slot_methods {
    ($($slot:ident),* $(,)?) => {
        paste::paste! {
            impl NodePattern {
                $(
                    #[doc = concat!("Constrain the `", stringify!($slot), "` slot.")]
                    pub fn [<$slot:snake>](self, pattern: impl Into<SlotPattern>) -> Self {
                        self.slot(Slot::$slot, pattern)
                    }
                )*
            }
        }
    };
}

for_each_slot!(define_slot_methods);

/// Constraint on one slot.
#[derive(Debug, Clone)]
pub enum SlotPattern {
    /// For `One` and `Opt` slots.
    One(Pattern),
    /// For `Seq` slots. The items must account for the whole sequence.
    Seq(Vec<SeqItem>),
}

/// One element of a sequence pattern.
#[derive(Debug, Clone)]
pub enum SeqItem {
    One(Pattern),
    AtLeastN { n: usize, pattern: Pattern },
    AtMostN { n: usize, pattern: Pattern },
    ZeroOrMore(Pattern),
    ZeroOrOne(Pattern),
    /// Binds the run of nodes consumed by the inner item.
    Capture(String, Box<SeqItem>),
}

impl SeqItem {
    /// The run bounds `(min, max)` of the item, its element pattern, and the
    /// capture names wrapped around it (outermost first).
    pub(crate) fn bounds(&self) -> (usize, Option<usize>, &Pattern, Vec<&str>) {
        let mut names = Vec::new();
        let mut item = self;
        while let SeqItem::Capture(name, inner) = item {
            names.push(name.as_str());
            item = inner;
        }
        let (min, max, pattern) = match item {
            SeqItem::One(pattern) => (1, Some(1), pattern),
            SeqItem::AtLeastN { n, pattern } => (*n, None, pattern),
            SeqItem::AtMostN { n, pattern } => (0, Some(*n), pattern),
            SeqItem::ZeroOrMore(pattern) => (0, None, pattern),
            SeqItem::ZeroOrOne(pattern) => (0, Some(1), pattern),
            SeqItem::Capture(..) => unreachable!("captures are peeled above"),
        };
        (min, max, pattern, names)
    }

    fn validate(&self) -> Result<(), MatchError> {
        self.bounds().2.validate()
    }
}

impl From<NodePattern> for Pattern {
    fn from(node: NodePattern) -> Self {
        Pattern::Node(node)
    }
}

impl From<Pattern> for SlotPattern {
    fn from(pattern: Pattern) -> Self {
        SlotPattern::One(pattern)
    }
}

impl From<NodePattern> for SlotPattern {
    fn from(node: NodePattern) -> Self {
        SlotPattern::One(Pattern::Node(node))
    }
}

impl From<SeqItem> for SlotPattern {
    fn from(item: SeqItem) -> Self {
        SlotPattern::Seq(vec![item])
    }
}

impl From<Vec<SeqItem>> for SlotPattern {
    fn from(items: Vec<SeqItem>) -> Self {
        SlotPattern::Seq(items)
    }
}

impl<const N: usize> From<[SeqItem; N]> for SlotPattern {
    fn from(items: [SeqItem; N]) -> Self {
        SlotPattern::Seq(items.into())
    }
}

/// A pattern that can never match, detected before matching.
#[derive(Debug, Error)]
pub enum MatchError {
    #[error("{kind} has no slot {slot}")]
    UnknownSlot { kind: NodeKind, slot: Slot },

    #[error("pattern for {kind}.{slot} does not fit a slot of arity {arity:?}")]
    ArityMismatch {
        kind: NodeKind,
        slot: Slot,
        arity: Arity,
    },

    #[error("{kind} is not a leaf and has no value text")]
    TextOnNonLeaf { kind: NodeKind },

    #[error("invalid regex: {0}")]
    InvalidRegex(#[from] regex::Error),
}
