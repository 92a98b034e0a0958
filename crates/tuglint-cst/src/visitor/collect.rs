// Copyright (c) Ken Kocienda and other contributors.
//
// This source code is licensed under the MIT license found in the
// LICENSE file in the root directory of this source tree.

use std::sync::Arc;

use super::dispatch::walk;
use super::traits::{VisitResult, Visitor};
use crate::nodes::{Node, NodeKind};

/// Collects every node of the given kinds, in pre-order.
#[derive(Debug)]
pub struct KindCollector {
    kinds: Vec<NodeKind>,
    found: Vec<Arc<Node>>,
}

impl KindCollector {
    pub fn new(kinds: impl IntoIterator<Item = NodeKind>) -> Self {
        Self {
            kinds: kinds.into_iter().collect(),
            found: Vec::new(),
        }
    }

    pub fn into_nodes(self) -> Vec<Arc<Node>> {
        self.found
    }
}

impl Visitor for KindCollector {
    fn visit(&mut self, node: &Arc<Node>) -> VisitResult {
        if self.kinds.contains(&node.kind) {
            self.found.push(node.clone());
        }
        VisitResult::Continue
    }
}

/// All nodes under `root` (inclusive) whose kind is one of `kinds`.
pub fn collect_kinds(root: &Arc<Node>, kinds: &[NodeKind]) -> Vec<Arc<Node>> {
    let mut collector = KindCollector::new(kinds.iter().copied());
    walk(&mut collector, root);
    collector.into_nodes()
}
