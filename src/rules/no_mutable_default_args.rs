//! `no-mutable-default-args`: a mutable default is shared by every call.
//!
//! Flags list, dict and set displays and comprehensions, and calls to the
//! `list`, `dict` and `set` constructors, that appear in a parameter's
//! default value. Only the outermost offending node of each default is
//! reported. There is no automatic fix: the idiomatic rewrite (`None` plus a
//! check in the body) changes the function's body.

use std::sync::Arc;

use tuglint_cst::{Node, NodeKind, Slot};

use crate::rule::{Hook, Rule, RuleContext, RuleDefinition};

pub const NAME: &str = "no-mutable-default-args";

const MUTABLE_KINDS: &[NodeKind] = &[
    NodeKind::List,
    NodeKind::Dict,
    NodeKind::Set,
    NodeKind::ListComp,
    NodeKind::DictComp,
    NodeKind::SetComp,
];

const MUTABLE_CONSTRUCTORS: &[&str] = &["list", "dict", "set"];

pub fn definition() -> RuleDefinition {
    RuleDefinition::new(NAME, "mutable default argument value", || {
        Box::new(NoMutableDefaultArgs::default()) as Box<dyn Rule>
    })
}

#[derive(Debug, Default)]
struct NoMutableDefaultArgs {
    /// Nesting depth of `Param.default` slots being walked. A lambda default
    /// can itself have parameters with defaults.
    depth: usize,
    /// Whether the current default already produced a report.
    reported: bool,
}

impl Rule for NoMutableDefaultArgs {
    fn name(&self) -> &str {
        NAME
    }

    fn hooks(&self) -> Vec<Hook> {
        let mut hooks = vec![
            Hook::VisitSlot(NodeKind::Param, Slot::Default),
            Hook::LeaveSlot(NodeKind::Param, Slot::Default),
            Hook::Visit(NodeKind::Call),
        ];
        hooks.extend(MUTABLE_KINDS.iter().map(|kind| Hook::Visit(*kind)));
        hooks
    }

    fn visit_slot(&mut self, _node: &Arc<Node>, _slot: Slot, _ctx: &mut RuleContext<'_>) {
        self.depth += 1;
        self.reported = false;
    }

    fn leave_slot(&mut self, _node: &Arc<Node>, _slot: Slot, _ctx: &mut RuleContext<'_>) {
        self.depth = self.depth.saturating_sub(1);
        self.reported = false;
    }

    fn visit(&mut self, node: &Arc<Node>, ctx: &mut RuleContext<'_>) {
        if self.depth == 0 || self.reported || !is_mutable(node) {
            return;
        }
        self.reported = true;
        ctx.report(
            node,
            "mutable default argument; use `None` and create the value in the body",
        );
    }
}

fn is_mutable(node: &Node) -> bool {
    if MUTABLE_KINDS.contains(&node.kind()) {
        return true;
    }
    node.kind() == NodeKind::Call
        && node.child(Slot::Func).is_some_and(|func| {
            func.kind() == NodeKind::Name
                && MUTABLE_CONSTRUCTORS.contains(&func.value().as_str())
        })
}
