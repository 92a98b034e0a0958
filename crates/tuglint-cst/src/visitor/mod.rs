// Copyright (c) Ken Kocienda and other contributors.
//
// This source code is licensed under the MIT license found in the
// LICENSE file in the root directory of this source tree.

//! Visitor infrastructure for CST traversal.
//!
//! # Traversal Order
//!
//! - **Depth-first, pre-order** for `visit`
//! - **Post-order** for `leave`
//! - Slots are visited in source order, bracketed by `visit_slot` and
//!   `leave_slot`
//!
//! Because every node is the same [`Node`](crate::nodes::Node) type, one
//! [`walk`] function covers every kind. Visitors that only care about some
//! kinds test `node.kind` in their hooks.

mod collect;
mod dispatch;
mod traits;

pub use collect::{collect_kinds, KindCollector};
pub use dispatch::{walk, walk_slots};
pub use traits::{VisitResult, Visitor};
