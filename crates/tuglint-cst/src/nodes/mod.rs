// Copyright (c) Ken Kocienda and other contributors.
//
// This source code is licensed under the MIT license found in the
// LICENSE file in the root directory of this source tree.

mod codegen;
mod kind;
mod node;
mod traits;

pub use codegen::{Codegen, CodegenState, SeqPos};
pub(crate) use kind::{for_each_node_kind, for_each_slot};
pub use kind::{Arity, NodeKind, PunctRole, Slot};
pub use node::{Child, Node, Part, Presence, Token};
pub use traits::{NodeId, NodeIdGenerator};

use std::sync::Arc;

/// A parsed module: the root of a tree.
pub type Module = Arc<Node>;
