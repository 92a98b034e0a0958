// Copyright (c) Ken Kocienda and other contributors.
//
// This source code is licensed under the MIT license found in the
// LICENSE file in the root directory of this source tree.

//! Node-level batch editing.
//!
//! [`TreeEditor`] collects replacements keyed by [`NodeId`] and applies them
//! to a tree in one pass, producing a new tree that shares every untouched
//! subtree with the original.
//!
//! # Overlapping edits
//!
//! | Situation | Result |
//! |-----------|--------|
//! | Two different replacements for one node | [`EditError::Conflict`] |
//! | The same replacement twice | Deduplicated |
//! | Edit inside a replaced subtree, still reachable from the replacement | Applied to the replacement |
//! | Edit inside a replaced subtree, no longer reachable | Reported in [`EditOutcome::subsumed`] |
//!
//! # Removal
//!
//! Only elements of a sequence slot can be removed. After a removal:
//!
//! - punctuation that depends on the slot being non-empty is switched to
//!   `Auto` (the parentheses of `class C(object):` vanish with the last base);
//! - when the last element was removed, the new last element takes over the
//!   removed element's trailing separator;
//! - when the first element was removed, the new first element takes over
//!   its comment lines and indentation;
//! - an indented block left without statements gets a `pass` line at the
//!   block's indentation, and a one-line suite gets a `pass`;
//! - a statement line left without small statements is itself removed.
//!
//! # Example
//!
//! ```ignore
//! use tuglint_cst::edit::{Replacement, TreeEditor};
//!
//! let mut editor = TreeEditor::new();
//! editor.add(object_base_id, Replacement::Remove)?;
//! let outcome = editor.apply(&module)?;
//! assert_eq!(outcome.tree.to_source(), "class C:\n    pass\n");
//! ```

use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use thiserror::Error;

use crate::nodes::{
    Child, Codegen, Node, NodeId, NodeKind, Part, Presence, PunctRole, Slot, Token,
};
use crate::tokenizer::TokType;

/// What to do with a node.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Replacement {
    /// Put this node in the original's place. The replacement takes over the
    /// original's outer trivia where it has none of its own.
    Replace(Arc<Node>),
    /// Remove the node from its parent sequence.
    Remove,
}

impl Replacement {
    /// Whether two replacements would produce the same text.
    pub fn same_as(&self, other: &Replacement) -> bool {
        match (self, other) {
            (Replacement::Remove, Replacement::Remove) => true,
            (Replacement::Replace(a), Replacement::Replace(b)) => {
                Arc::ptr_eq(a, b) || (a.kind == b.kind && a.to_source() == b.to_source())
            }
            _ => false,
        }
    }
}

/// Error type for tree edits.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EditError {
    /// Two different replacements target the same node.
    #[error("conflicting replacements for {node_id}")]
    Conflict { node_id: NodeId },

    /// `Remove` targets a node that is not a sequence element.
    #[error("{node_id} ({kind}) is not a sequence element and cannot be removed")]
    InvalidRemoval { node_id: NodeId, kind: NodeKind },

    /// An edit targets a node that is not in the tree.
    #[error("{node_id} is not in the tree")]
    UnknownNode { node_id: NodeId },
}

/// The result of applying a batch of edits.
#[derive(Debug, Clone)]
pub struct EditOutcome {
    pub tree: Arc<Node>,
    /// Edits that were applied, in the order they were added.
    pub applied: Vec<NodeId>,
    /// Edits that sat inside a replaced subtree and were dropped with it.
    pub subsumed: Vec<NodeId>,
}

/// Collects node replacements and applies them as one batch.
#[derive(Debug, Default, Clone)]
pub struct TreeEditor {
    edits: HashMap<NodeId, Replacement>,
    order: Vec<NodeId>,
}

impl TreeEditor {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record an edit.
    ///
    /// A second edit for the same node is accepted only if it is the same as
    /// the first.
    pub fn add(&mut self, node_id: NodeId, replacement: Replacement) -> Result<(), EditError> {
        match self.edits.get(&node_id) {
            Some(existing) if existing.same_as(&replacement) => Ok(()),
            Some(_) => Err(EditError::Conflict { node_id }),
            None => {
                self.edits.insert(node_id, replacement);
                self.order.push(node_id);
                Ok(())
            }
        }
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    /// Apply every edit to `root`.
    pub fn apply(&self, root: &Arc<Node>) -> Result<EditOutcome, EditError> {
        self.validate(root)?;

        let mut rewriter = Rewriter {
            edits: &self.edits,
            active: Vec::new(),
            applied: HashSet::new(),
        };
        let tree = rewriter.resolve(root);

        let (applied, subsumed): (Vec<NodeId>, Vec<NodeId>) = self
            .order
            .iter()
            .partition(|id| rewriter.applied.contains(*id));
        tracing::trace!(
            "applied {} edits, {} subsumed",
            rewriter.applied.len(),
            self.order.len() - rewriter.applied.len()
        );
        Ok(EditOutcome {
            tree,
            applied,
            subsumed,
        })
    }

    fn validate(&self, root: &Arc<Node>) -> Result<(), EditError> {
        let mut placement = HashMap::new();
        record_placement(root, false, &mut placement);
        for node_id in &self.order {
            let Some((kind, in_seq)) = placement.get(node_id) else {
                return Err(EditError::UnknownNode { node_id: *node_id });
            };
            if self.edits.get(node_id) == Some(&Replacement::Remove) && !in_seq {
                return Err(EditError::InvalidRemoval {
                    node_id: *node_id,
                    kind: *kind,
                });
            }
        }
        Ok(())
    }
}

/// Record the kind of every numbered node and whether it sits in a sequence
/// slot.
fn record_placement(node: &Node, in_seq: bool, placement: &mut HashMap<NodeId, (NodeKind, bool)>) {
    if let Some(id) = node.id {
        placement.insert(id, (node.kind, in_seq));
    }
    for (_, child) in node.slots() {
        let in_seq = matches!(child, Child::Seq(_));
        for c in child.as_slice() {
            record_placement(c, in_seq, placement);
        }
    }
}

struct Rewriter<'e> {
    edits: &'e HashMap<NodeId, Replacement>,
    /// Nodes whose replacement is being resolved. A replacement that embeds
    /// its original is not replaced again.
    active: Vec<NodeId>,
    applied: HashSet<NodeId>,
}

impl Rewriter<'_> {
    /// Apply the node's own replacement, if any, then edits beneath it.
    fn resolve(&mut self, node: &Arc<Node>) -> Arc<Node> {
        let edits = self.edits;
        if let Some(id) = node.id.filter(|id| !self.active.contains(id)) {
            if let Some(Replacement::Replace(replacement)) = edits.get(&id) {
                self.applied.insert(id);
                self.active.push(id);
                let fitted = Arc::new(fit_replacement(replacement, node));
                let resolved = self.resolve(&fitted);
                self.active.pop();
                return resolved;
            }
        }
        self.rewrite_children(node)
    }

    fn rewrite_children(&mut self, node: &Arc<Node>) -> Arc<Node> {
        let mut changed = false;
        let mut removed = false;
        let mut parts = Vec::with_capacity(node.parts.len());

        for part in &node.parts {
            let Part::Slot(slot, child) = part else {
                parts.push(part.clone());
                continue;
            };
            let rewritten = match child {
                Child::One(c) => Child::One(self.resolve(c)),
                Child::Opt(c) => Child::Opt(c.as_ref().map(|c| self.resolve(c))),
                Child::Seq(items) => {
                    let (items, any_removed) = self.rewrite_seq(node.kind, items);
                    removed |= any_removed;
                    Child::Seq(items)
                }
            };
            changed |= !same_children(child, &rewritten);
            parts.push(Part::Slot(*slot, rewritten));
        }

        if !changed {
            return node.clone();
        }
        let rewritten = Node {
            id: node.id,
            kind: node.kind,
            parts,
        };
        Arc::new(if removed {
            rewritten.relax_puncts()
        } else {
            rewritten
        })
    }

    /// Rewrite a sequence slot of a `parent` node. Returns the new elements
    /// and whether any element was removed.
    fn rewrite_seq(&mut self, parent: NodeKind, items: &[Arc<Node>]) -> (Vec<Arc<Node>>, bool) {
        let mut kept: Vec<Arc<Node>> = Vec::with_capacity(items.len());
        let mut first_removed: Option<&Arc<Node>> = None;
        let mut removed_last: Option<&Arc<Node>> = None;

        for (i, item) in items.iter().enumerate() {
            let gone = if self.take_removal(item) {
                true
            } else {
                let resolved = self.resolve(item);
                let emptied = resolved.kind == NodeKind::SimpleStatementLine
                    && !resolved.has(Slot::Body)
                    && item.has(Slot::Body);
                if !emptied {
                    kept.push(resolved);
                }
                emptied
            };
            if gone {
                first_removed.get_or_insert(item);
                if i + 1 == items.len() {
                    removed_last = Some(item);
                }
            }
        }

        let Some(first_removed) = first_removed else {
            return (kept, false);
        };

        if let Some(removed_last) = removed_last {
            if let Some(last) = kept.pop() {
                let separator = match removed_last.separator() {
                    Some((_, Presence::Present(token))) => Presence::Present(token.clone()),
                    _ => Presence::Auto,
                };
                kept.push(Arc::new(last.with_separator(separator)));
            }
        }

        if items.first().is_some_and(|first| Arc::ptr_eq(first, first_removed)) {
            let removed_leading = first_removed
                .first_token()
                .map(|t| t.leading.as_str())
                .unwrap_or("");
            if let Some(first) = kept.first_mut().filter(|_| !removed_leading.is_empty()) {
                *first = Arc::new(first.map_first_token(&mut |token| {
                    token.leading = carry_leading(removed_leading, &token.leading);
                }));
            }
        }

        if kept.is_empty() {
            match parent {
                NodeKind::IndentedBlock => kept.push(Arc::new(pass_line(first_removed))),
                NodeKind::SimpleStatementSuite => kept.push(Arc::new(pass_statement(
                    first_removed.first_token().map(|t| t.leading.as_str()).unwrap_or(""),
                ))),
                _ => {}
            }
        }
        (kept, true)
    }

    fn take_removal(&mut self, item: &Arc<Node>) -> bool {
        let Some(id) = item.id else {
            return false;
        };
        if self.active.contains(&id) || self.edits.get(&id) != Some(&Replacement::Remove) {
            return false;
        }
        self.applied.insert(id);
        true
    }
}

/// Prepare `replacement` to stand in for `original`: outer trivia and a
/// present trailing separator carry over.
fn fit_replacement(replacement: &Node, original: &Node) -> Node {
    let fitted = replacement.adopt_trivia(original);
    match (original.separator(), fitted.separator()) {
        (Some((_, present @ Presence::Present(_))), Some((_, Presence::Auto))) => {
            fitted.with_separator(present.clone())
        }
        _ => fitted,
    }
}

fn same_children(a: &Child, b: &Child) -> bool {
    let (a, b) = (a.as_slice(), b.as_slice());
    a.len() == b.len() && a.iter().zip(b).all(|(x, y)| Arc::ptr_eq(x, y))
}

/// The indentation at the end of a token's leading trivia.
fn indentation(leading: &str) -> &str {
    match leading.rfind('\n') {
        Some(i) => &leading[i + 1..],
        None => leading,
    }
}

/// Leading trivia for the element that becomes first once the elements
/// before it are removed. Comment lines and indentation of the removed
/// element carry over, unless the survivor starts its own bracketed line.
fn carry_leading(removed: &str, own: &str) -> String {
    if own.contains('\n') {
        return own.to_string();
    }
    let indent = indentation(removed);
    let lines = &removed[..removed.len() - indent.len()];
    if own.is_empty() {
        format!("{}{}", lines, indent)
    } else {
        format!("{}{}", lines, own)
    }
}

fn pass_statement(leading: &str) -> Node {
    Node::new(
        NodeKind::Pass,
        vec![
            Part::Token(Token::name("pass").with_leading(indentation(leading))),
            Part::Punct(PunctRole::Semicolon, Presence::Auto),
        ],
    )
}

/// A `pass` line replacing the removed statement `removed`.
fn pass_line(removed: &Node) -> Node {
    let leading = removed.first_token().map(|t| t.leading.as_str()).unwrap_or("");
    let newline = first_newline(removed).unwrap_or("\n");
    Node::new(
        NodeKind::SimpleStatementLine,
        vec![
            Part::Slot(Slot::Body, Child::Seq(vec![Arc::new(pass_statement(leading))])),
            Part::Token(Token::new(TokType::Newline, newline)),
        ],
    )
}

fn first_newline(node: &Node) -> Option<&str> {
    node.parts.iter().find_map(|part| match part {
        Part::Token(token) if token.kind == TokType::Newline && !token.text.is_empty() => {
            Some(token.text.as_str())
        }
        Part::Slot(_, child) => child.as_slice().iter().find_map(|c| first_newline(c)),
        _ => None,
    })
}
