// Copyright (c) Ken Kocienda and other contributors.
//
// This source code is licensed under the MIT license found in the
// LICENSE file in the root directory of this source tree.

//! Node ids and source positions.
//!
//! [`PositionTable`] maps each parsed node's [`NodeId`] to the [`Span`] of
//! its text, trivia excluded. Both are produced in one pre-order pass over a
//! freshly parsed tree by [`number_tree`].

use std::collections::HashMap;
use std::sync::Arc;

use tuglint_core::Span;

use crate::nodes::{Child, Node, NodeId, NodeIdGenerator, Part, Presence, SeqPos};

/// A table mapping [`NodeId`]s to their source [`Span`]s.
#[derive(Debug, Default, Clone)]
pub struct PositionTable {
    spans: HashMap<NodeId, Span>,
}

impl PositionTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            spans: HashMap::with_capacity(capacity),
        }
    }

    pub fn insert(&mut self, node_id: NodeId, span: Span) {
        self.spans.insert(node_id, span);
    }

    pub fn span_of(&self, node_id: NodeId) -> Option<Span> {
        self.spans.get(&node_id).copied()
    }

    pub fn contains(&self, node_id: NodeId) -> bool {
        self.spans.contains_key(&node_id)
    }

    pub fn len(&self) -> usize {
        self.spans.len()
    }

    pub fn is_empty(&self) -> bool {
        self.spans.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&NodeId, &Span)> {
        self.spans.iter()
    }
}

/// Assign pre-order ids to every node of `root` and record their spans.
///
/// Offsets are computed from the rendered text, so they are exact byte
/// offsets into the source the tree was parsed from.
pub fn number_tree(root: &Node) -> (Arc<Node>, PositionTable) {
    let mut numberer = Numberer {
        ids: NodeIdGenerator::new(),
        table: PositionTable::new(),
        offset: 0,
    };
    let (node, _) = numberer.node(root, SeqPos::LONE);
    (Arc::new(node), numberer.table)
}

struct Numberer {
    ids: NodeIdGenerator,
    table: PositionTable,
    offset: usize,
}

impl Numberer {
    /// Returns the numbered copy and the span of its text, if it has any.
    fn node(&mut self, node: &Node, pos: SeqPos) -> (Node, Option<Span>) {
        let id = self.ids.next_id();
        let mut span: Option<Span> = None;
        let mut parts = Vec::with_capacity(node.parts.len());

        for part in &node.parts {
            match part {
                Part::Token(token) | Part::Punct(_, Presence::Present(token)) => {
                    self.offset += token.leading.len();
                    let text = Span::new(self.offset, self.offset + token.text.len());
                    self.offset += token.text.len() + token.trailing.len();
                    if !text.is_empty() {
                        span = Some(cover(span, text));
                    }
                    parts.push(part.clone());
                }
                Part::Punct(role, Presence::Auto) => {
                    if let Some(text) = node.resolve_auto(*role, pos) {
                        let text = Span::new(self.offset, self.offset + text.len());
                        self.offset = text.end;
                        span = Some(cover(span, text));
                    }
                    parts.push(part.clone());
                }
                Part::Punct(_, Presence::Absent) => parts.push(part.clone()),
                Part::Slot(slot, child) => {
                    let child = match child {
                        Child::One(c) => Child::One(self.child(c, SeqPos::LONE, &mut span)),
                        Child::Opt(c) => Child::Opt(
                            c.as_ref()
                                .map(|c| self.child(c, SeqPos::LONE, &mut span)),
                        ),
                        Child::Seq(items) => {
                            let force_trailing =
                                items.len() == 1 && node.kind.forces_trailing_separator();
                            let numbered = items
                                .iter()
                                .enumerate()
                                .map(|(i, c)| {
                                    let pos = SeqPos {
                                        is_last: i + 1 == items.len(),
                                        force_trailing,
                                    };
                                    self.child(c, pos, &mut span)
                                })
                                .collect();
                            Child::Seq(numbered)
                        }
                    };
                    parts.push(Part::Slot(*slot, child));
                }
            }
        }

        self.table
            .insert(id, span.unwrap_or_else(|| Span::empty_at(self.offset)));
        let numbered = Node {
            id: Some(id),
            kind: node.kind,
            parts,
        };
        (numbered, span)
    }

    fn child(&mut self, child: &Node, pos: SeqPos, span: &mut Option<Span>) -> Arc<Node> {
        let (node, child_span) = self.node(child, pos);
        if let Some(child_span) = child_span {
            *span = Some(cover(*span, child_span));
        }
        Arc::new(node)
    }
}

fn cover(span: Option<Span>, other: Span) -> Span {
    match span {
        Some(span) => span.cover(&other),
        None => other,
    }
}
