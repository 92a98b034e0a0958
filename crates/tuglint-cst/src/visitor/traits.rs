// Copyright (c) Ken Kocienda and other contributors.
//
// This source code is licensed under the MIT license found in the
// LICENSE file in the root directory of this source tree.

//! Visitor trait definition for CST traversal.

use std::sync::Arc;

use crate::nodes::{Node, Slot};

/// Result of visiting a node - controls traversal behavior.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum VisitResult {
    /// Continue traversal into children.
    ///
    /// After visiting children, `leave` will be called for this node.
    #[default]
    Continue,

    /// Skip children, continue with siblings.
    ///
    /// No slot hooks run for this node, but `leave` is still called.
    SkipChildren,

    /// Stop traversal entirely.
    ///
    /// No further hooks are called, not even `leave` for the nodes currently
    /// on the path. The walk function returns immediately.
    Stop,
}

/// Immutable visitor for CST traversal.
///
/// Every hook receives the shared node handle, so a visitor can keep the
/// nodes it finds without copying them.
///
/// # Traversal Order
///
/// - `visit` is called in **pre-order** (before children)
/// - `visit_slot` / `leave_slot` bracket the descent into each child slot,
///   in source order
/// - `leave` is called in **post-order** (after children)
///
/// # Example
///
/// ```ignore
/// use tuglint_cst::visitor::{walk, Visitor, VisitResult};
///
/// struct NameCounter {
///     count: usize,
/// }
///
/// impl Visitor for NameCounter {
///     fn visit(&mut self, node: &Arc<Node>) -> VisitResult {
///         if node.kind == NodeKind::Name {
///             self.count += 1;
///         }
///         VisitResult::Continue
///     }
/// }
/// ```
pub trait Visitor {
    /// Called before descending into `node`'s slots.
    #[allow(unused_variables)]
    fn visit(&mut self, node: &Arc<Node>) -> VisitResult {
        VisitResult::Continue
    }

    /// Called immediately before descending into `slot` of `node`.
    ///
    /// Called for every slot, including empty ones.
    #[allow(unused_variables)]
    fn visit_slot(&mut self, node: &Arc<Node>, slot: Slot) {}

    /// Called immediately after returning from `slot` of `node`.
    #[allow(unused_variables)]
    fn leave_slot(&mut self, node: &Arc<Node>, slot: Slot) {}

    /// Called after all slots of `node` have been visited. Called even if
    /// `SkipChildren` was returned.
    #[allow(unused_variables)]
    fn leave(&mut self, node: &Arc<Node>) {}
}
