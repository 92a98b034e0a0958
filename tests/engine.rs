//! Engine behavior through the public API: traversal order across rules,
//! file skipping, fault isolation and parse failures.

use std::sync::{Arc, Mutex};

use tuglint::cst::{Node, NodeKind, Slot};
use tuglint::{
    builtin_rules, FileContext, Hook, LintEngine, LintError, Rule, RuleContext, RuleDefinition,
    RuleSet,
};

type Log = Arc<Mutex<Vec<String>>>;

/// Logs every hook of a `Call` and its slots.
struct CallTracer {
    label: &'static str,
    log: Log,
}

impl CallTracer {
    fn push(&self, event: String) {
        self.log.lock().unwrap().push(format!("{} {}", self.label, event));
    }
}

impl Rule for CallTracer {
    fn name(&self) -> &str {
        self.label
    }

    fn hooks(&self) -> Vec<Hook> {
        vec![
            Hook::Visit(NodeKind::Call),
            Hook::Leave(NodeKind::Call),
            Hook::VisitSlot(NodeKind::Call, Slot::Func),
            Hook::LeaveSlot(NodeKind::Call, Slot::Func),
            Hook::VisitSlot(NodeKind::Call, Slot::Args),
            Hook::LeaveSlot(NodeKind::Call, Slot::Args),
            Hook::Visit(NodeKind::Name),
        ]
    }

    fn visit(&mut self, node: &Arc<Node>, _ctx: &mut RuleContext<'_>) {
        match node.kind() {
            NodeKind::Name => self.push(format!("visit Name {}", node.value())),
            kind => self.push(format!("visit {}", kind)),
        }
    }

    fn leave(&mut self, node: &Arc<Node>, _ctx: &mut RuleContext<'_>) {
        self.push(format!("leave {}", node.kind()));
    }

    fn visit_slot(&mut self, _node: &Arc<Node>, slot: Slot, _ctx: &mut RuleContext<'_>) {
        self.push(format!("enter {}", slot));
    }

    fn leave_slot(&mut self, _node: &Arc<Node>, slot: Slot, _ctx: &mut RuleContext<'_>) {
        self.push(format!("exit {}", slot));
    }
}

fn tracer(label: &'static str, log: &Log) -> RuleDefinition {
    let log = Arc::clone(log);
    RuleDefinition::new(label, "traces calls", move || {
        Box::new(CallTracer {
            label,
            log: Arc::clone(&log),
        }) as Box<dyn Rule>
    })
}

#[test]
fn traversal_order_is_deterministic_and_interleaved() {
    let log: Log = Arc::default();
    let rules = RuleSet::new().with(tracer("1", &log)).with(tracer("2", &log));
    LintEngine::new(rules)
        .lint_source(&FileContext::new("t.py"), "f(a)\n")
        .unwrap();

    let expected = [
        "1 visit Call",
        "2 visit Call",
        "1 enter Func",
        "2 enter Func",
        "1 visit Name f",
        "2 visit Name f",
        "1 exit Func",
        "2 exit Func",
        "1 enter Args",
        "2 enter Args",
        "1 visit Name a",
        "2 visit Name a",
        "1 exit Args",
        "2 exit Args",
        "1 leave Call",
        "2 leave Call",
    ];
    assert_eq!(*log.lock().unwrap(), expected);
}

/// Reports every name, unless the file is a test file.
struct NamesOutsideTests;

impl Rule for NamesOutsideTests {
    fn name(&self) -> &str {
        "names-outside-tests"
    }

    fn hooks(&self) -> Vec<Hook> {
        vec![Hook::VisitAny]
    }

    fn should_skip_file(&self, file: &FileContext) -> bool {
        file.is_test
    }

    fn visit(&mut self, node: &Arc<Node>, ctx: &mut RuleContext<'_>) {
        if node.kind() == NodeKind::Name {
            ctx.report(node, "name");
        }
    }
}

fn names_outside_tests() -> RuleDefinition {
    RuleDefinition::new("names-outside-tests", "", || {
        Box::new(NamesOutsideTests) as Box<dyn Rule>
    })
}

#[test]
fn skipped_file_reports_nothing() {
    let engine = LintEngine::new(RuleSet::new().with(names_outside_tests()));
    let source = "a = b\nc(d)\n";

    let report = engine
        .lint_source(&FileContext::new("pkg/mod.py"), source)
        .unwrap();
    assert_eq!(report.violations.len(), 4);

    let test_file = FileContext::new("tests/test_mod.py").with_test(true);
    let report = engine.lint_source(&test_file, source).unwrap();
    assert!(report.violations.is_empty());
    assert_eq!(report.skipped_rules, ["names-outside-tests"]);
}

struct PanicsOnCall;

impl Rule for PanicsOnCall {
    fn name(&self) -> &str {
        "panics-on-call"
    }

    fn hooks(&self) -> Vec<Hook> {
        vec![Hook::Leave(NodeKind::Call)]
    }

    fn leave(&mut self, _node: &Arc<Node>, _ctx: &mut RuleContext<'_>) {
        panic!("cannot handle calls");
    }
}

#[test]
fn faulty_rule_does_not_stop_the_others() {
    let rules = RuleSet::new()
        .with(RuleDefinition::new("panics-on-call", "", || {
            Box::new(PanicsOnCall) as Box<dyn Rule>
        }))
        .with(names_outside_tests());
    let report = LintEngine::new(rules)
        .lint_source(&FileContext::new("m.py"), "f(x)\ny\n")
        .unwrap();

    assert_eq!(report.faults.len(), 1);
    assert_eq!(report.faults[0].rule, "panics-on-call");
    assert_eq!(report.faults[0].hook, "leave(Call)");
    assert_eq!(report.faults[0].message, "cannot handle calls");
    assert_eq!(report.violations.len(), 3);
}

#[test]
fn unparseable_source_runs_no_rule() {
    let err = LintEngine::new(builtin_rules())
        .lint_source(&FileContext::new("broken.py"), "class (object):\n")
        .unwrap_err();
    match err {
        LintError::Parse { path, source } => {
            assert_eq!(path.to_str(), Some("broken.py"));
            assert_eq!(source.position().0, 1);
        }
        other => panic!("expected a parse error, got {:?}", other),
    }
}

#[test]
fn clean_source_has_empty_report() {
    let report = LintEngine::new(builtin_rules())
        .with_autofix(true)
        .lint_source(
            &FileContext::new("clean.py"),
            "class C:\n    def m(self, x=None):\n        return x is None\n",
        )
        .unwrap();
    assert!(report.is_clean());
    assert!(report.faults.is_empty());
    assert!(report.fixed_source.is_none());
    assert!(report.fix_error.is_none());
}
