// Copyright (c) Ken Kocienda and other contributors.
//
// This source code is licensed under the MIT license found in the
// LICENSE file in the root directory of this source tree.

//! Node identity.
//!
//! [`NodeId`] gives every parsed node a stable identity. Ids are assigned in
//! pre-order (parent before children, left to right), so for `x = 1`:
//!
//! ```text
//!   NodeId(0) -> Module
//!   NodeId(1) -> SimpleStatementLine
//!   NodeId(2) -> Assign
//!   NodeId(3) -> AssignTarget
//!   NodeId(4) -> Name "x"
//!   NodeId(5) -> Integer "1"
//! ```
//!
//! Nodes built by rules have no id until the tree is parsed again.

use std::fmt;

/// A stable, unique identifier for a parsed node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(pub u32);

impl NodeId {
    pub fn new(id: u32) -> Self {
        Self(id)
    }

    pub fn as_u32(&self) -> u32 {
        self.0
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "NodeId({})", self.0)
    }
}

/// Hands out sequential [`NodeId`]s.
#[derive(Debug, Default)]
pub struct NodeIdGenerator {
    next_id: u32,
}

impl NodeIdGenerator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn next_id(&mut self) -> NodeId {
        let id = NodeId(self.next_id);
        self.next_id += 1;
        id
    }

    /// Number of ids handed out so far.
    pub fn count(&self) -> u32 {
        self.next_id
    }
}
