// Copyright (c) Ken Kocienda and other contributors.
//
// This source code is licensed under the MIT license found in the
// LICENSE file in the root directory of this source tree.

//! The generic node type.
//!
//! A [`Node`] is a kind tag plus an ordered list of [`Part`]s. Rendering a
//! node writes its parts in order, so the part list *is* the node's concrete
//! syntax: intrinsic tokens, optional punctuation, and named child slots.
//!
//! Nodes are immutable and shared through [`Arc`]. The `with_*` methods build
//! a new node that shares every untouched child with the original.

use std::sync::Arc;

use crate::nodes::codegen::SeqPos;
use crate::nodes::kind::{NodeKind, PunctRole, Slot};
use crate::nodes::traits::NodeId;
use crate::tokenizer::TokType;

/// A token with the trivia attached to it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token {
    pub kind: TokType,
    pub text: String,
    pub leading: String,
    pub trailing: String,
}

impl Token {
    /// A token with no trivia.
    pub fn new(kind: TokType, text: impl Into<String>) -> Self {
        Self {
            kind,
            text: text.into(),
            leading: String::new(),
            trailing: String::new(),
        }
    }

    pub fn op(text: impl Into<String>) -> Self {
        Self::new(TokType::Op, text)
    }

    pub fn name(text: impl Into<String>) -> Self {
        Self::new(TokType::Name, text)
    }

    pub fn with_leading(mut self, leading: impl Into<String>) -> Self {
        self.leading = leading.into();
        self
    }

    pub fn with_trailing(mut self, trailing: impl Into<String>) -> Self {
        self.trailing = trailing.into();
        self
    }

    /// Length in bytes of the rendered token, trivia included.
    pub fn rendered_len(&self) -> usize {
        self.leading.len() + self.text.len() + self.trailing.len()
    }
}

/// Tri-state presence of optional punctuation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Presence {
    /// Always rendered, exactly as written.
    Present(Token),
    /// Never rendered.
    Absent,
    /// Rendered with a default text iff the role's condition holds.
    Auto,
}

/// Children held by a slot.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Child {
    One(Arc<Node>),
    Opt(Option<Arc<Node>>),
    Seq(Vec<Arc<Node>>),
}

impl Child {
    /// The children as a slice, whatever the arity.
    pub fn as_slice(&self) -> &[Arc<Node>] {
        match self {
            Child::One(node) => std::slice::from_ref(node),
            Child::Opt(Some(node)) => std::slice::from_ref(node),
            Child::Opt(None) => &[],
            Child::Seq(nodes) => nodes,
        }
    }
}

/// One piece of a node's concrete syntax.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Part {
    Token(Token),
    Punct(PunctRole, Presence),
    Slot(Slot, Child),
}

/// A concrete syntax tree node.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Node {
    pub id: Option<NodeId>,
    pub kind: NodeKind,
    pub parts: Vec<Part>,
}

impl Node {
    pub fn new(kind: NodeKind, parts: Vec<Part>) -> Self {
        Self {
            id: None,
            kind,
            parts,
        }
    }

    /// A leaf node holding a single token.
    pub fn leaf(kind: NodeKind, token: Token) -> Self {
        Self::new(kind, vec![Part::Token(token)])
    }

    /// A `Name` leaf with no trivia.
    pub fn name(text: impl Into<String>) -> Self {
        Self::leaf(NodeKind::Name, Token::name(text))
    }

    pub fn id(&self) -> Option<NodeId> {
        self.id
    }

    pub fn kind(&self) -> NodeKind {
        self.kind
    }

    pub fn slot(&self, slot: Slot) -> Option<&Child> {
        self.parts.iter().find_map(|part| match part {
            Part::Slot(s, child) if *s == slot => Some(child),
            _ => None,
        })
    }

    /// The single child in a `One` or filled `Opt` slot.
    pub fn child(&self, slot: Slot) -> Option<&Arc<Node>> {
        match self.slot(slot)? {
            Child::One(node) => Some(node),
            Child::Opt(node) => node.as_ref(),
            Child::Seq(_) => None,
        }
    }

    /// All children of `slot`, empty if the slot is missing or empty.
    pub fn children(&self, slot: Slot) -> &[Arc<Node>] {
        self.slot(slot).map(Child::as_slice).unwrap_or(&[])
    }

    /// Whether `slot` holds at least one child.
    pub fn has(&self, slot: Slot) -> bool {
        !self.children(slot).is_empty()
    }

    /// Iterate over `(slot, child)` pairs in source order.
    pub fn slots(&self) -> impl Iterator<Item = (Slot, &Child)> {
        self.parts.iter().filter_map(|part| match part {
            Part::Slot(slot, child) => Some((*slot, child)),
            _ => None,
        })
    }

    /// The node's own tokens (not its children's).
    pub fn tokens(&self) -> impl Iterator<Item = &Token> {
        self.parts.iter().filter_map(|part| match part {
            Part::Token(token) => Some(token),
            _ => None,
        })
    }

    /// Text of the node's own tokens, joined by single spaces.
    ///
    /// For leaves this is the leaf value: `"object"`, `"1_000"`, `"is not"`.
    pub fn value(&self) -> String {
        let mut value = String::new();
        for token in self.tokens() {
            if !value.is_empty() {
                value.push(' ');
            }
            value.push_str(&token.text);
        }
        value
    }

    pub fn punct(&self, role: PunctRole) -> Option<&Presence> {
        self.parts.iter().find_map(|part| match part {
            Part::Punct(r, presence) if *r == role => Some(presence),
            _ => None,
        })
    }

    /// The separator a sequence element carries after itself, if any.
    pub fn separator(&self) -> Option<(PunctRole, &Presence)> {
        self.parts.iter().rev().find_map(|part| match part {
            Part::Punct(role, presence) if role.is_separator() => Some((*role, presence)),
            _ => None,
        })
    }

    /// A copy with `slot` holding `child`.
    pub fn with_child(&self, slot: Slot, child: Child) -> Node {
        let mut node = self.clone();
        for part in &mut node.parts {
            if let Part::Slot(s, existing) = part {
                if *s == slot {
                    *existing = child;
                    break;
                }
            }
        }
        node
    }

    /// A copy with the first punctuation of `role` set to `presence`.
    pub fn with_punct(&self, role: PunctRole, presence: Presence) -> Node {
        let mut node = self.clone();
        for part in &mut node.parts {
            if let Part::Punct(r, existing) = part {
                if *r == role {
                    *existing = presence;
                    break;
                }
            }
        }
        node
    }

    /// A copy with the trailing separator set to `presence`.
    pub fn with_separator(&self, presence: Presence) -> Node {
        let mut node = self.clone();
        if let Some(Part::Punct(_, existing)) = node
            .parts
            .iter_mut()
            .rev()
            .find(|part| matches!(part, Part::Punct(role, _) if role.is_separator()))
        {
            *existing = presence;
        }
        node
    }

    /// A copy of a leaf whose value is `text`, keeping the outer trivia.
    ///
    /// Multi-token leaves (`is not`) collapse into one token.
    pub fn with_value(&self, text: impl Into<String>) -> Node {
        let mut tokens = self.tokens();
        let first = tokens.next();
        let last = tokens.last().or(first);
        let token = Token {
            kind: first.map(|t| t.kind).unwrap_or(TokType::Op),
            text: text.into(),
            leading: first.map(|t| t.leading.clone()).unwrap_or_default(),
            trailing: last.map(|t| t.trailing.clone()).unwrap_or_default(),
        };
        let mut parts = vec![Part::Token(token)];
        parts.extend(
            self.parts
                .iter()
                .filter(|part| !matches!(part, Part::Token(_)))
                .cloned(),
        );
        Node {
            id: self.id,
            kind: self.kind,
            parts,
        }
    }

    /// A copy with the same kind and parts but no id.
    pub fn detached(&self) -> Node {
        Node {
            id: None,
            ..self.clone()
        }
    }

    /// Whether `role` has a condition that depends on this node's own
    /// children, and if so whether it currently holds.
    ///
    /// Present punctuation whose condition stops holding after an edit is
    /// switched to `Auto`.
    pub fn punct_condition(&self, role: PunctRole) -> Option<bool> {
        match (self.kind, role) {
            (NodeKind::ClassDef, PunctRole::LeftParen | PunctRole::RightParen) => {
                Some(self.has(Slot::Bases) || self.has(Slot::Keywords))
            }
            (NodeKind::AnnAssign, PunctRole::Equal) => Some(self.has(Slot::Value)),
            (NodeKind::Param, PunctRole::Equal) => Some(self.has(Slot::Default)),
            (NodeKind::Arg, PunctRole::Equal) => Some(self.has(Slot::Keyword)),
            (NodeKind::Assert, PunctRole::Comma) => Some(self.has(Slot::Msg)),
            _ => None,
        }
    }

    /// Text an `Auto` punctuation of `role` renders as, at position `pos`.
    pub fn resolve_auto(&self, role: PunctRole, pos: SeqPos) -> Option<&'static str> {
        if let Some(holds) = self.punct_condition(role) {
            if !holds {
                return None;
            }
            return Some(match (self.kind, role) {
                (_, PunctRole::LeftParen) => "(",
                (_, PunctRole::RightParen) => ")",
                (NodeKind::AnnAssign, PunctRole::Equal) => " = ",
                (_, PunctRole::Equal) => "=",
                _ => ", ",
            });
        }
        match role {
            PunctRole::Comma if !pos.is_last => Some(", "),
            PunctRole::Comma if pos.force_trailing => Some(","),
            PunctRole::Semicolon if !pos.is_last => Some("; "),
            _ => None,
        }
    }

    /// Switch every present punctuation whose condition no longer holds to
    /// `Auto`.
    pub(crate) fn relax_puncts(mut self) -> Node {
        let stale: Vec<usize> = self
            .parts
            .iter()
            .enumerate()
            .filter_map(|(i, part)| match part {
                Part::Punct(role, Presence::Present(_))
                    if self.punct_condition(*role) == Some(false) =>
                {
                    Some(i)
                }
                _ => None,
            })
            .collect();
        for i in stale {
            if let Part::Punct(_, presence) = &mut self.parts[i] {
                *presence = Presence::Auto;
            }
        }
        self
    }

    /// The first token this node renders, if any.
    pub fn first_token(&self) -> Option<&Token> {
        self.parts.iter().find_map(|part| match part {
            Part::Token(token) | Part::Punct(_, Presence::Present(token)) => Some(token),
            Part::Slot(_, child) => child.as_slice().iter().find_map(|n| n.first_token()),
            Part::Punct(..) => None,
        })
    }

    /// The last token this node renders, if any.
    pub fn last_token(&self) -> Option<&Token> {
        self.parts.iter().rev().find_map(|part| match part {
            Part::Token(token) | Part::Punct(_, Presence::Present(token)) => Some(token),
            Part::Slot(_, child) => child.as_slice().iter().rev().find_map(|n| n.last_token()),
            Part::Punct(..) => None,
        })
    }

    /// A copy whose first rendered token is `f(token)`. Children on the path
    /// are copied; everything else is shared.
    pub fn map_first_token(&self, f: &mut dyn FnMut(&mut Token)) -> Node {
        let mut node = self.clone();
        for part in &mut node.parts {
            if map_part(part, f, true) {
                break;
            }
        }
        node
    }

    /// A copy whose last rendered token is `f(token)`.
    pub fn map_last_token(&self, f: &mut dyn FnMut(&mut Token)) -> Node {
        let mut node = self.clone();
        for part in node.parts.iter_mut().rev() {
            if map_part(part, f, false) {
                break;
            }
        }
        node
    }

    /// A copy that takes over the outer trivia of `original` where its own
    /// boundary tokens have none.
    pub fn adopt_trivia(&self, original: &Node) -> Node {
        let leading = original
            .first_token()
            .map(|t| t.leading.clone())
            .unwrap_or_default();
        let trailing = original
            .last_token()
            .map(|t| t.trailing.clone())
            .unwrap_or_default();
        let node = self.map_first_token(&mut |token| {
            if token.leading.is_empty() {
                token.leading = leading.clone();
            }
        });
        node.map_last_token(&mut |token| {
            if token.trailing.is_empty() {
                token.trailing = trailing.clone();
            }
        })
    }
}

/// Apply `f` to the first (or last) token rendered by `part`. Returns whether
/// the part rendered any token.
fn map_part(part: &mut Part, f: &mut dyn FnMut(&mut Token), first: bool) -> bool {
    match part {
        Part::Token(token) | Part::Punct(_, Presence::Present(token)) => {
            f(token);
            true
        }
        Part::Slot(_, child) => map_child(child, f, first),
        Part::Punct(..) => false,
    }
}

fn map_child(child: &mut Child, f: &mut dyn FnMut(&mut Token), first: bool) -> bool {
    let renders = |node: &Arc<Node>| {
        if first {
            node.first_token().is_some()
        } else {
            node.last_token().is_some()
        }
    };
    let target = match child {
        Child::One(node) => Some(node),
        Child::Opt(node) => node.as_mut(),
        Child::Seq(nodes) if first => nodes.iter_mut().find(|n| renders(&**n)),
        Child::Seq(nodes) => nodes.iter_mut().rev().find(|n| renders(&**n)),
    };
    match target {
        Some(node) if renders(&*node) => {
            let mapped = if first {
                node.map_first_token(f)
            } else {
                node.map_last_token(f)
            };
            *node = Arc::new(mapped);
            true
        }
        _ => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::nodes::Codegen;

    fn element(value: &str, comma: Presence) -> Arc<Node> {
        Arc::new(Node::new(
            NodeKind::Element,
            vec![
                Part::Slot(Slot::Value, Child::One(Arc::new(Node::name(value)))),
                Part::Punct(PunctRole::Comma, comma),
            ],
        ))
    }

    fn list(elements: Vec<Arc<Node>>) -> Node {
        Node::new(
            NodeKind::List,
            vec![
                Part::Token(Token::op("[")),
                Part::Slot(Slot::Elements, Child::Seq(elements)),
                Part::Token(Token::op("]")),
            ],
        )
    }

    #[test]
    fn auto_commas_separate_but_do_not_trail() {
        let node = list(vec![
            element("a", Presence::Auto),
            element("b", Presence::Auto),
            element("c", Presence::Auto),
        ]);
        assert_eq!(node.to_source(), "[a, b, c]");
    }

    #[test]
    fn present_and_absent_commas_render_verbatim() {
        let node = list(vec![
            element("a", Presence::Present(Token::op(",").with_trailing("  "))),
            element("b", Presence::Present(Token::op(","))),
        ]);
        assert_eq!(node.to_source(), "[a,  b,]");
        let node = list(vec![element("a", Presence::Absent), element("b", Presence::Auto)]);
        assert_eq!(node.to_source(), "[ab]");
    }

    #[test]
    fn slot_accessors() {
        let node = list(vec![element("a", Presence::Auto)]);
        assert_eq!(node.children(Slot::Elements).len(), 1);
        assert!(node.has(Slot::Elements));
        assert!(node.child(Slot::Elements).is_none());
        assert!(node.children(Slot::Body).is_empty());
        let first = &node.children(Slot::Elements)[0];
        assert_eq!(first.child(Slot::Value).map(|n| n.value()), Some("a".to_string()));
    }

    #[test]
    fn with_child_shares_siblings() {
        let a = element("a", Presence::Auto);
        let node = list(vec![a.clone()]);
        let updated = node.with_child(
            Slot::Elements,
            Child::Seq(vec![a.clone(), element("b", Presence::Auto)]),
        );
        assert!(Arc::ptr_eq(&updated.children(Slot::Elements)[0], &a));
        assert_eq!(updated.to_source(), "[a, b]");
        assert_eq!(node.to_source(), "[a]");
    }

    #[test]
    fn with_value_keeps_outer_trivia() {
        let op = Node::new(
            NodeKind::Operator,
            vec![
                Part::Token(Token::name("is").with_leading("").with_trailing(" ")),
                Part::Token(Token::name("not").with_trailing("  ")),
            ],
        );
        assert_eq!(op.value(), "is not");
        let eq = op.with_value("==");
        assert_eq!(eq.value(), "==");
        assert_eq!(eq.to_source(), "==  ");
    }

    #[test]
    fn adopt_trivia_fills_empty_boundaries() {
        let original = Node::leaf(
            NodeKind::Name,
            Token::name("x").with_leading("    ").with_trailing("  # note"),
        );
        let replacement = Node::name("y").adopt_trivia(&original);
        assert_eq!(replacement.to_source(), "    y  # note");
    }
}
