//! Autofix: fold the replacements carried by violations into one edit batch.
//!
//! Conflicting replacements for the same node abort the fix for the whole
//! file. The violations themselves are unaffected.

use std::collections::HashMap;

use thiserror::Error;

use tuglint_cst::{Codegen, EditError, EditOutcome, Module, NodeId, TreeEditor};

use crate::error::ConflictingFixError;
use crate::rule::Violation;

/// Why a file's fixes were not applied.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FixError {
    #[error(transparent)]
    Conflict(#[from] ConflictingFixError),

    /// A rule proposed an edit the tree cannot take.
    #[error("invalid fix: {0}")]
    Edit(EditError),
}

/// The rewritten file.
#[derive(Debug, Clone)]
pub struct FixOutcome {
    pub source: String,
    /// Number of edits applied.
    pub applied: usize,
    /// Edits dropped because an ancestor's replacement no longer contains
    /// their node.
    pub subsumed: Vec<NodeId>,
}

/// Apply every fix carried by `violations` to `tree`.
///
/// Returns `Ok(None)` when no violation carries a fix.
pub fn apply_fixes(tree: &Module, violations: &[Violation]) -> Result<Option<FixOutcome>, FixError> {
    let editor = collect_edits(violations)?;
    if editor.is_empty() {
        return Ok(None);
    }
    let EditOutcome {
        tree,
        applied,
        subsumed,
    } = editor.apply(tree).map_err(FixError::Edit)?;
    Ok(Some(FixOutcome {
        source: tree.to_source(),
        applied: applied.len(),
        subsumed,
    }))
}

fn collect_edits(violations: &[Violation]) -> Result<TreeEditor, FixError> {
    let mut editor = TreeEditor::new();
    let mut owners: HashMap<NodeId, &str> = HashMap::new();
    for violation in violations {
        let (Some(node_id), Some(fix)) = (violation.node_id, &violation.fix) else {
            continue;
        };
        match editor.add(node_id, fix.clone()) {
            Ok(()) => {
                owners.entry(node_id).or_insert(&violation.rule);
            }
            Err(EditError::Conflict { node_id }) => {
                let first_rule = owners.get(&node_id).copied().unwrap_or_default();
                return Err(ConflictingFixError {
                    node_id,
                    first_rule: first_rule.to_string(),
                    second_rule: violation.rule.clone(),
                }
                .into());
            }
            Err(err) => return Err(FixError::Edit(err)),
        }
    }
    Ok(editor)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use tuglint_core::Span;
    use tuglint_cst::{parse_module, Node, Replacement};

    fn violation(rule: &str, node_id: NodeId, fix: Replacement) -> Violation {
        Violation {
            rule: rule.to_string(),
            message: String::new(),
            node_id: Some(node_id),
            span: Span::empty_at(0),
            line: 1,
            col: 1,
            fix: Some(fix),
        }
    }

    fn name_ids(tree: &Module, text: &str) -> Vec<NodeId> {
        tuglint_cst::visitor::collect_kinds(tree, &[tuglint_cst::NodeKind::Name])
            .into_iter()
            .filter(|n| n.value() == text)
            .filter_map(|n| n.id())
            .collect()
    }

    #[test]
    fn no_fixes_is_none() {
        let tree = parse_module("x = 1\n").unwrap();
        assert!(apply_fixes(&tree, &[]).unwrap().is_none());
    }

    #[test]
    fn replaces_named_node() {
        let tree = parse_module("x = y\n").unwrap();
        let y = name_ids(&tree, "y")[0];
        let fix = Replacement::Replace(Arc::new(Node::name("z")));
        let outcome = apply_fixes(&tree, &[violation("r", y, fix)]).unwrap().unwrap();
        assert_eq!(outcome.source, "x = z\n");
        assert_eq!(outcome.applied, 1);
    }

    #[test]
    fn identical_fixes_from_two_rules_are_merged() {
        let tree = parse_module("x = y\n").unwrap();
        let y = name_ids(&tree, "y")[0];
        let fix = || Replacement::Replace(Arc::new(Node::name("z")));
        let violations = [violation("a", y, fix()), violation("b", y, fix())];
        let outcome = apply_fixes(&tree, &violations).unwrap().unwrap();
        assert_eq!(outcome.source, "x = z\n");
    }

    #[test]
    fn different_fixes_for_one_node_conflict() {
        let tree = parse_module("x = y\n").unwrap();
        let y = name_ids(&tree, "y")[0];
        let violations = [
            violation("a", y, Replacement::Replace(Arc::new(Node::name("z")))),
            violation("b", y, Replacement::Replace(Arc::new(Node::name("w")))),
        ];
        let err = apply_fixes(&tree, &violations).unwrap_err();
        assert_eq!(
            err,
            FixError::Conflict(ConflictingFixError {
                node_id: y,
                first_rule: "a".to_string(),
                second_rule: "b".to_string(),
            })
        );
    }

    #[test]
    fn invalid_removal_is_an_edit_error() {
        let tree = parse_module("x = y\n").unwrap();
        let y = name_ids(&tree, "y")[0];
        let err = apply_fixes(&tree, &[violation("a", y, Replacement::Remove)]).unwrap_err();
        assert!(matches!(err, FixError::Edit(EditError::InvalidRemoval { .. })));
    }
}
