//! `no-print-calls`: `print` belongs in scripts and tests, not library code.
//!
//! A `print(...)` that is a statement on its own is removed by the fix; an
//! indented block left empty gets a `pass`. A `print` used as a value is
//! reported without a fix. Test files are skipped.

use std::collections::HashSet;
use std::sync::Arc;

use tuglint_cst::{Node, NodeId, NodeKind, Replacement, Slot};

use crate::rule::{FileContext, Hook, Rule, RuleContext, RuleDefinition};

pub const NAME: &str = "no-print-calls";

const MESSAGE: &str = "`print` call; use logging instead";

pub fn definition() -> RuleDefinition {
    RuleDefinition::new(NAME, "print call outside tests", || {
        Box::new(NoPrintCalls::default()) as Box<dyn Rule>
    })
}

#[derive(Debug, Default)]
struct NoPrintCalls {
    /// Calls already reported through their expression statement.
    handled: HashSet<NodeId>,
}

impl Rule for NoPrintCalls {
    fn name(&self) -> &str {
        NAME
    }

    fn hooks(&self) -> Vec<Hook> {
        vec![Hook::Visit(NodeKind::Expr), Hook::Visit(NodeKind::Call)]
    }

    fn should_skip_file(&self, file: &FileContext) -> bool {
        file.is_test
    }

    fn visit(&mut self, node: &Arc<Node>, ctx: &mut RuleContext<'_>) {
        match node.kind() {
            NodeKind::Expr => {
                let Some(call) = node.child(Slot::Value).filter(|v| is_print_call(v)) else {
                    return;
                };
                if let Some(id) = call.id() {
                    self.handled.insert(id);
                }
                ctx.report_with_fix(node, MESSAGE, Replacement::Remove);
            }
            NodeKind::Call if is_print_call(node) => {
                if node.id().is_some_and(|id| self.handled.contains(&id)) {
                    return;
                }
                ctx.report(node, MESSAGE);
            }
            _ => {}
        }
    }
}

fn is_print_call(node: &Node) -> bool {
    node.kind() == NodeKind::Call
        && node
            .child(Slot::Func)
            .is_some_and(|func| func.kind() == NodeKind::Name && func.value() == "print")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rules::testing::{fixed, lint, lint_file};

    #[test]
    fn test_statement_is_removed() {
        let source = "x = 1\nprint(x)\ny = 2\n";
        let report = lint(definition(), source);
        assert_eq!(report.violations.len(), 1);
        assert_eq!(fixed(&report, source), "x = 1\ny = 2\n");
    }

    #[test]
    fn test_block_keeps_a_pass() {
        let source = "def f(x):\n    print(x)\n";
        let report = lint(definition(), source);
        assert_eq!(fixed(&report, source), "def f(x):\n    pass\n");
    }

    #[test]
    fn test_small_statement_is_removed() {
        let source = "x = 1; print(x)\n";
        let report = lint(definition(), source);
        assert_eq!(fixed(&report, source), "x = 1\n");
    }

    #[test]
    fn test_first_statement_removal_keeps_surroundings() {
        let source = "def f(x):\n    print(x); y = 1\n    return y\n";
        let report = lint(definition(), source);
        assert_eq!(fixed(&report, source), "def f(x):\n    y = 1\n    return y\n");

        let source = "#!/usr/bin/env python\nprint(1)\nx = 1\n";
        let report = lint(definition(), source);
        assert_eq!(fixed(&report, source), "#!/usr/bin/env python\nx = 1\n");
    }

    #[test]
    fn test_value_use_is_reported_without_fix() {
        let source = "y = print(x)\n";
        let report = lint(definition(), source);
        assert_eq!(report.violations.len(), 1);
        assert!(!report.violations[0].has_fix());
        assert!(report.fixed_source.is_none());
    }

    #[test]
    fn test_statement_reported_once() {
        let report = lint(definition(), "print(1)\nprint(2)\n");
        assert_eq!(report.violations.len(), 2);
        assert!(report.violations.iter().all(|v| v.has_fix()));
    }

    #[test]
    fn test_test_files_are_skipped() {
        let file = FileContext::new("tests/test_module.py").with_test(true);
        let report = lint_file(definition(), file, "print(1)\n");
        assert!(report.violations.is_empty());
        assert_eq!(report.skipped_rules, [NAME]);
    }

    #[test]
    fn test_other_calls() {
        for source in ["log.print(x)\n", "pprint(x)\n", "print\n"] {
            assert!(lint(definition(), source).violations.is_empty(), "{}", source);
        }
    }
}
