//! Two rules proposing different replacements for one node.

use std::sync::Arc;

use tuglint::cst::{Node, NodeKind, Replacement};
use tuglint::{
    ConflictingFixError, FileContext, FixError, Hook, LintEngine, Rule, RuleContext,
    RuleDefinition, RuleSet,
};

/// Renames every `Name` it sees to a fixed text.
struct RenameTo {
    rule: &'static str,
    text: &'static str,
}

impl Rule for RenameTo {
    fn name(&self) -> &str {
        self.rule
    }

    fn hooks(&self) -> Vec<Hook> {
        vec![Hook::Visit(NodeKind::Name)]
    }

    fn visit(&mut self, node: &Arc<Node>, ctx: &mut RuleContext<'_>) {
        let replacement = Node::name(self.text);
        ctx.report_with_fix(
            node,
            format!("rename to {}", self.text),
            Replacement::Replace(Arc::new(replacement)),
        );
    }
}

fn rename(rule: &'static str, text: &'static str) -> RuleDefinition {
    RuleDefinition::new(rule, "renames names", move || {
        Box::new(RenameTo { rule, text }) as Box<dyn Rule>
    })
}

fn lint(rules: RuleSet, source: &str) -> tuglint::FileReport {
    LintEngine::new(rules)
        .with_autofix(true)
        .lint_source(&FileContext::new("conflict.py"), source)
        .unwrap()
}

#[test]
fn different_replacements_are_a_conflict() {
    let rules = RuleSet::new()
        .with(rename("to-a", "a"))
        .with(rename("to-b", "b"));
    let report = lint(rules, "x\n");

    // Both violations survive.
    let rules: Vec<_> = report.violations.iter().map(|v| v.rule.as_str()).collect();
    assert_eq!(rules, ["to-a", "to-b"]);

    // The file is left alone.
    assert!(report.fixed_source.is_none());
    match report.fix_error {
        Some(FixError::Conflict(ConflictingFixError {
            first_rule,
            second_rule,
            ..
        })) => {
            assert_eq!(first_rule, "to-a");
            assert_eq!(second_rule, "to-b");
        }
        other => panic!("expected a conflict, got {:?}", other),
    }
}

#[test]
fn conflict_node_is_the_shared_anchor() {
    let rules = RuleSet::new()
        .with(rename("to-a", "a"))
        .with(rename("to-b", "b"));
    let report = lint(rules, "x\n");
    let anchor = report.violations[0].node_id;
    match report.fix_error {
        Some(FixError::Conflict(err)) => assert_eq!(Some(err.node_id), anchor),
        other => panic!("expected a conflict, got {:?}", other),
    }
}

#[test]
fn identical_replacements_are_merged() {
    let rules = RuleSet::new()
        .with(rename("first", "same"))
        .with(rename("second", "same"));
    let report = lint(rules, "x\n");
    assert_eq!(report.violations.len(), 2);
    assert!(report.fix_error.is_none());
    assert_eq!(report.fixed_source.as_deref(), Some("same\n"));
}
