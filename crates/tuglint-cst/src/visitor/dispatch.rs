// Copyright (c) Ken Kocienda and other contributors.
//
// This source code is licensed under the MIT license found in the
// LICENSE file in the root directory of this source tree.

//! The generic walk.
//!
//! Every node kind is walked the same way, driven by its parts list:
//!
//! 1. `visit(node)`
//! 2. for each slot part, in source order: `visit_slot(node, slot)`, walk
//!    every child of the slot, `leave_slot(node, slot)`
//! 3. `leave(node)`
//!
//! # Control Flow
//!
//! - `VisitResult::Continue` - traverse into children
//! - `VisitResult::SkipChildren` - skip slots and children but still call `leave`
//! - `VisitResult::Stop` - halt traversal immediately (no `leave` called)

use std::sync::Arc;

use super::traits::{VisitResult, Visitor};
use crate::nodes::{Node, Part};

/// Walk `node` and its descendants depth-first.
///
/// Returns `VisitResult::Stop` if the visitor stopped the walk, otherwise
/// `VisitResult::Continue`.
pub fn walk<V: Visitor + ?Sized>(visitor: &mut V, node: &Arc<Node>) -> VisitResult {
    match visitor.visit(node) {
        VisitResult::Stop => return VisitResult::Stop,
        VisitResult::SkipChildren => {}
        VisitResult::Continue => {
            if walk_slots(visitor, node) == VisitResult::Stop {
                return VisitResult::Stop;
            }
        }
    }
    visitor.leave(node);
    VisitResult::Continue
}

/// Walk the slots of `node` without calling `visit` or `leave` on it.
pub fn walk_slots<V: Visitor + ?Sized>(visitor: &mut V, node: &Arc<Node>) -> VisitResult {
    for part in &node.parts {
        let Part::Slot(slot, child) = part else {
            continue;
        };
        visitor.visit_slot(node, *slot);
        for child in child.as_slice() {
            if walk(visitor, child) == VisitResult::Stop {
                return VisitResult::Stop;
            }
        }
        visitor.leave_slot(node, *slot);
    }
    VisitResult::Continue
}
