// Copyright (c) Ken Kocienda and other contributors.
//
// This source code is licensed under the MIT license found in the
// LICENSE file in the root directory of this source tree.

//! Pattern evaluation.
//!
//! Evaluation is a pure function of a node and a pattern. Sequence items are
//! matched like a lazy regular expression: each quantifier first takes the
//! shortest run it allows and grows it only when the rest of the sequence
//! fails to match.

use std::collections::HashMap;
use std::sync::Arc;

use super::pattern::{NodePattern, Pattern, SeqItem, SlotPattern};
use crate::nodes::{Child, Node};
use crate::visitor::{walk, VisitResult, Visitor};

/// Named bindings produced by capturing patterns.
///
/// A `Pattern::Capture` binds one node (or none, for an empty optional
/// slot). A `SeqItem::Capture` binds the whole run it consumed.
#[derive(Debug, Default, Clone)]
pub struct Captures {
    bindings: HashMap<String, Vec<Arc<Node>>>,
}

impl Captures {
    /// The first node bound to `name`.
    pub fn get(&self, name: &str) -> Option<&Arc<Node>> {
        self.get_all(name).first()
    }

    /// Every node bound to `name`.
    pub fn get_all(&self, name: &str) -> &[Arc<Node>] {
        self.bindings.get(name).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn contains(&self, name: &str) -> bool {
        self.bindings.contains_key(name)
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.bindings.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.bindings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bindings.is_empty()
    }
}

/// Bindings made so far, in order, so a failed branch can be rolled back.
#[derive(Default)]
struct Bindings {
    log: Vec<(String, Vec<Arc<Node>>)>,
}

impl Bindings {
    fn checkpoint(&self) -> usize {
        self.log.len()
    }

    fn rollback(&mut self, checkpoint: usize) {
        self.log.truncate(checkpoint);
    }

    fn bind(&mut self, name: &str, nodes: Vec<Arc<Node>>) {
        self.log.push((name.to_string(), nodes));
    }

    /// Later bindings of a name replace earlier ones.
    fn into_captures(self) -> Captures {
        Captures {
            bindings: self.log.into_iter().collect(),
        }
    }
}

/// Whether `node` matches `pattern`.
pub fn matches(node: &Arc<Node>, pattern: &Pattern) -> bool {
    match_node(node, pattern, &mut Bindings::default())
}

/// Match `node` against `pattern`, returning the captures on success.
pub fn extract(node: &Arc<Node>, pattern: &Pattern) -> Option<Captures> {
    let mut bindings = Bindings::default();
    match_node(node, pattern, &mut bindings).then(|| bindings.into_captures())
}

/// Whether the whole of `nodes` matches the sequence `items`.
pub fn matches_seq(nodes: &[Arc<Node>], items: &[SeqItem]) -> bool {
    match_seq(nodes, items, &mut Bindings::default())
}

/// Like [`matches_seq`], returning the captures on success.
pub fn extract_seq(nodes: &[Arc<Node>], items: &[SeqItem]) -> Option<Captures> {
    let mut bindings = Bindings::default();
    match_seq(nodes, items, &mut bindings).then(|| bindings.into_captures())
}

/// Every node under `root` (inclusive) that matches `pattern`, in pre-order.
pub fn find_all(root: &Arc<Node>, pattern: &Pattern) -> Vec<Arc<Node>> {
    let mut finder = Finder {
        pattern,
        found: Vec::new(),
    };
    walk(&mut finder, root);
    finder.found
}

struct Finder<'p> {
    pattern: &'p Pattern,
    found: Vec<Arc<Node>>,
}

impl Visitor for Finder<'_> {
    fn visit(&mut self, node: &Arc<Node>) -> VisitResult {
        if matches(node, self.pattern) {
            self.found.push(node.clone());
        }
        VisitResult::Continue
    }
}

fn match_node(node: &Arc<Node>, pattern: &Pattern, bindings: &mut Bindings) -> bool {
    match pattern {
        Pattern::Any => true,
        Pattern::Absent => false,
        Pattern::Node(np) => match_node_pattern(node, np, bindings),
        Pattern::OneOf(alternatives) => alternatives.iter().any(|alternative| {
            let checkpoint = bindings.checkpoint();
            let matched = match_node(node, alternative, bindings);
            if !matched {
                bindings.rollback(checkpoint);
            }
            matched
        }),
        Pattern::AllOf(patterns) => {
            let checkpoint = bindings.checkpoint();
            let matched = patterns.iter().all(|p| match_node(node, p, bindings));
            if !matched {
                bindings.rollback(checkpoint);
            }
            matched
        }
        Pattern::Not(inner) => {
            let checkpoint = bindings.checkpoint();
            let matched = match_node(node, inner, bindings);
            bindings.rollback(checkpoint);
            !matched
        }
        Pattern::Capture(name, inner) => {
            let matched = match_node(node, inner, bindings);
            if matched {
                bindings.bind(name, vec![node.clone()]);
            }
            matched
        }
        Pattern::TypeOf(kinds) => kinds.contains(&node.kind),
    }
}

/// Match an empty optional slot.
fn match_absent(pattern: &Pattern, bindings: &mut Bindings) -> bool {
    match pattern {
        Pattern::Any | Pattern::Absent => true,
        Pattern::Node(_) | Pattern::TypeOf(_) => false,
        Pattern::OneOf(alternatives) => alternatives.iter().any(|p| {
            let checkpoint = bindings.checkpoint();
            let matched = match_absent(p, bindings);
            if !matched {
                bindings.rollback(checkpoint);
            }
            matched
        }),
        Pattern::AllOf(patterns) => {
            let checkpoint = bindings.checkpoint();
            let matched = patterns.iter().all(|p| match_absent(p, bindings));
            if !matched {
                bindings.rollback(checkpoint);
            }
            matched
        }
        Pattern::Not(inner) => {
            let checkpoint = bindings.checkpoint();
            let matched = match_absent(inner, bindings);
            bindings.rollback(checkpoint);
            !matched
        }
        Pattern::Capture(name, inner) => {
            let matched = match_absent(inner, bindings);
            if matched {
                bindings.bind(name, Vec::new());
            }
            matched
        }
    }
}

fn match_node_pattern(node: &Arc<Node>, np: &NodePattern, bindings: &mut Bindings) -> bool {
    if node.kind != np.kind {
        return false;
    }
    if let Some(text) = &np.text {
        if !text.is_match(&node.value()) {
            return false;
        }
    }
    let checkpoint = bindings.checkpoint();
    for (slot, slot_pattern) in &np.slots {
        let empty = Child::Seq(Vec::new());
        let child = node.slot(*slot).unwrap_or(&empty);
        if !match_slot(child, slot_pattern, bindings) {
            bindings.rollback(checkpoint);
            return false;
        }
    }
    true
}

fn match_slot(child: &Child, pattern: &SlotPattern, bindings: &mut Bindings) -> bool {
    match (child, pattern) {
        (_, SlotPattern::One(Pattern::Any)) => true,
        (Child::One(node) | Child::Opt(Some(node)), SlotPattern::One(p)) => {
            match_node(node, p, bindings)
        }
        (Child::Opt(None), SlotPattern::One(p)) => match_absent(p, bindings),
        (Child::Seq(nodes), SlotPattern::One(p)) => match nodes.as_slice() {
            [] => match_absent(p, bindings),
            [node] => match_node(node, p, bindings),
            _ => false,
        },
        (child, SlotPattern::Seq(items)) => match_seq(child.as_slice(), items, bindings),
    }
}

fn match_seq(nodes: &[Arc<Node>], items: &[SeqItem], bindings: &mut Bindings) -> bool {
    let Some((item, rest)) = items.split_first() else {
        return nodes.is_empty();
    };
    let (min, max, pattern, names) = item.bounds();
    let limit = max.map_or(nodes.len(), |max| max.min(nodes.len()));
    if min > limit {
        return false;
    }

    let checkpoint = bindings.checkpoint();
    for run in 0..=limit {
        if run > 0 && !match_node(&nodes[run - 1], pattern, bindings) {
            break;
        }
        if run < min {
            continue;
        }
        let attempt = bindings.checkpoint();
        for name in &names {
            bindings.bind(name, nodes[..run].to_vec());
        }
        if match_seq(&nodes[run..], rest, bindings) {
            return true;
        }
        bindings.rollback(attempt);
    }
    bindings.rollback(checkpoint);
    false
}
