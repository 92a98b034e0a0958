//! `compare-singleton-by-is`: `None`, `True` and `False` are compared by
//! identity.
//!
//! `x == None` becomes `x is None` and `x != None` becomes `x is not None`.
//! The singleton may sit on either side of the operator.

use std::sync::Arc;

use tuglint_cst::{Node, NodeKind, Replacement, Slot};

use crate::rule::{Hook, Rule, RuleContext, RuleDefinition};

pub const NAME: &str = "compare-singleton-by-is";

const SINGLETONS: &[&str] = &["None", "True", "False"];

pub fn definition() -> RuleDefinition {
    RuleDefinition::new(NAME, "equality comparison with a singleton", || {
        Box::new(CompareSingletonByIs) as Box<dyn Rule>
    })
}

struct CompareSingletonByIs;

impl Rule for CompareSingletonByIs {
    fn name(&self) -> &str {
        NAME
    }

    fn hooks(&self) -> Vec<Hook> {
        vec![Hook::Visit(NodeKind::Comparison)]
    }

    fn visit(&mut self, node: &Arc<Node>, ctx: &mut RuleContext<'_>) {
        let mut left = node.child(Slot::Left);
        for target in node.children(Slot::Comparisons) {
            let right = target.child(Slot::Comparator);
            if let Some(operator) = target.child(Slot::Operator) {
                check(operator, left, right, ctx);
            }
            left = right;
        }
    }
}

fn check(
    operator: &Arc<Node>,
    left: Option<&Arc<Node>>,
    right: Option<&Arc<Node>>,
    ctx: &mut RuleContext<'_>,
) {
    let replacement = match operator.value().as_str() {
        "==" => "is",
        "!=" => "is not",
        _ => return,
    };
    let Some(singleton) = [right, left].into_iter().flatten().find_map(singleton_name) else {
        return;
    };
    // `is` is a keyword: it needs whitespace on both sides, which `==` did not.
    let spaced_before = operator.first_token().is_some_and(|t| !t.leading.is_empty())
        || left
            .and_then(|n| n.last_token())
            .is_some_and(|t| !t.trailing.is_empty());
    let spaced_after = operator.last_token().is_some_and(|t| !t.trailing.is_empty())
        || right
            .and_then(|n| n.first_token())
            .is_some_and(|t| !t.leading.is_empty());
    let mut fixed = operator.with_value(replacement).detached();
    if !spaced_before {
        fixed = fixed.map_first_token(&mut |token| token.leading.push(' '));
    }
    if !spaced_after {
        fixed = fixed.map_last_token(&mut |token| token.trailing.insert(0, ' '));
    }
    ctx.report_with_fix(
        operator,
        format!(
            "comparison to {} should use `{}`, not `{}`",
            singleton,
            replacement,
            operator.value()
        ),
        Replacement::Replace(Arc::new(fixed)),
    );
}

fn singleton_name(node: &Arc<Node>) -> Option<String> {
    if node.kind() != NodeKind::Name {
        return None;
    }
    let value = node.value();
    SINGLETONS.contains(&value.as_str()).then_some(value)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rules::testing::{fixed, lint};

    fn check_fix(source: &str, expected: &str) {
        let report = lint(definition(), source);
        assert_eq!(report.violations.len(), 1, "{}", source);
        assert_eq!(fixed(&report, source), expected);
    }

    #[test]
    fn test_equality_becomes_is() {
        check_fix("if x == None:\n    pass\n", "if x is None:\n    pass\n");
        check_fix("y = x != None\n", "y = x is not None\n");
        check_fix("y = x == True\n", "y = x is True\n");
    }

    #[test]
    fn test_singleton_on_the_left() {
        check_fix("y = None == x\n", "y = None is x\n");
    }

    #[test]
    fn test_trivia_is_kept() {
        check_fix("y = x  ==  None  # check\n", "y = x  is  None  # check\n");
    }

    #[test]
    fn test_unspaced_operator_gets_spaces() {
        check_fix("y = x==None\n", "y = x is None\n");
        check_fix("y = x!=None\n", "y = x is not None\n");
        check_fix("y = x ==None\n", "y = x is None\n");
        check_fix("y = (x)==False\n", "y = (x) is False\n");
    }

    #[test]
    fn test_chains_fix_each_link() {
        let source = "y = a == None != b\n";
        let report = lint(definition(), source);
        assert_eq!(report.violations.len(), 2);
        assert_eq!(fixed(&report, source), "y = a is None is not b\n");
    }

    #[test]
    fn test_clean_comparisons() {
        for source in [
            "y = x is None\n",
            "y = x == 0\n",
            "y = x < None\n",
            "y = x == 'None'\n",
        ] {
            let report = lint(definition(), source);
            assert!(report.violations.is_empty(), "{}", source);
        }
    }

    #[test]
    fn test_message() {
        let report = lint(definition(), "y = x != None\n");
        assert_eq!(
            report.violations[0].message,
            "comparison to None should use `is not`, not `!=`"
        );
    }
}
