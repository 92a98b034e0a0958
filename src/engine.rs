//! The lint engine: one file, one walk, N rules.
//!
//! [`LintEngine::lint_source`] runs the per-file pipeline:
//!
//! 1. tokenize and parse (a failure ends the pipeline with
//!    [`LintError::Parse`]);
//! 2. instantiate every rule and ask it whether to skip the file;
//! 3. build the dispatch table from the remaining rules' hooks;
//! 4. walk the tree once, calling each subscribed rule at each point, in
//!    registration order;
//! 5. when autofix is on, fold the reported replacements into a rewritten
//!    source.
//!
//! Every hook call is isolated with `catch_unwind`. A rule that panics is
//! recorded as a [`RuleFault`] and gets no further calls for the file; the
//! other rules keep going.

use std::any::Any;
use std::collections::HashMap;
use std::panic::{self, AssertUnwindSafe};
use std::sync::Arc;

use tracing::{debug, trace, warn};

use tuglint_core::text::LineIndex;
use tuglint_cst::visitor::walk;
use tuglint_cst::{
    parse_module_with_positions, Node, NodeId, NodeKind, PositionTable, Slot, VisitResult,
    Visitor,
};

use crate::error::LintError;
use crate::fix::{apply_fixes, FixError};
use crate::rule::{FileContext, Hook, Rule, RuleContext, RuleSet, Violation};

// ============================================================================
// Reports
// ============================================================================

/// A rule panicked in one of its hooks.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RuleFault {
    pub rule: String,
    /// The node the hook was called for. `None` for `should_skip_file`.
    pub node_id: Option<NodeId>,
    pub hook: String,
    pub message: String,
}

/// Everything the engine learned about one file.
#[derive(Debug, Clone, Default)]
pub struct FileReport {
    /// In traversal order.
    pub violations: Vec<Violation>,
    pub faults: Vec<RuleFault>,
    /// Rules that opted out of the file.
    pub skipped_rules: Vec<String>,
    /// The rewritten source, when autofix is on and changed something.
    pub fixed_source: Option<String>,
    pub fix_error: Option<FixError>,
}

impl FileReport {
    pub fn is_clean(&self) -> bool {
        self.violations.is_empty()
    }

    pub fn fixable_count(&self) -> usize {
        self.violations.iter().filter(|v| v.has_fix()).count()
    }
}

// ============================================================================
// Engine
// ============================================================================

/// Runs a [`RuleSet`] over single files.
///
/// The engine holds only shared, read-only rule definitions and can be used
/// from many threads at once.
#[derive(Debug, Clone)]
pub struct LintEngine {
    rules: RuleSet,
    autofix: bool,
}

impl LintEngine {
    pub fn new(rules: RuleSet) -> Self {
        Self {
            rules,
            autofix: false,
        }
    }

    pub fn with_autofix(mut self, autofix: bool) -> Self {
        self.autofix = autofix;
        self
    }

    pub fn rules(&self) -> &RuleSet {
        &self.rules
    }

    pub fn autofix(&self) -> bool {
        self.autofix
    }

    /// Lint one file's source text.
    pub fn lint_source(&self, file: &FileContext, source: &str) -> Result<FileReport, LintError> {
        let path = file.path.display();
        debug!("{}: parsing {} bytes", path, source.len());
        let parsed =
            parse_module_with_positions(source).map_err(|e| LintError::parse(&file.path, e))?;
        debug!("{}: parsed {} nodes", path, parsed.positions.len());

        let mut report = FileReport::default();
        let mut active = Vec::new();
        for definition in self.rules.iter() {
            let rule = definition.instantiate();
            match should_skip(rule.as_ref(), file) {
                Ok(true) => report.skipped_rules.push(definition.name.to_string()),
                Ok(false) => active.push(RuleSlot::new(rule)),
                Err(message) => {
                    warn!(
                        "{}: rule {} panicked in should_skip_file: {}",
                        path, definition.name, message
                    );
                    report.faults.push(RuleFault {
                        rule: definition.name.to_string(),
                        node_id: None,
                        hook: "should_skip_file".to_string(),
                        message,
                    });
                }
            }
        }
        debug!(
            "{}: running {} rules ({} skipped)",
            path,
            active.len(),
            report.skipped_rules.len()
        );

        if !active.is_empty() {
            let table = DispatchTable::build(&active);
            let lines = LineIndex::new(source);
            let mut mux = Multiplexer {
                table: &table,
                rules: active,
                file,
                positions: &parsed.positions,
                lines: &lines,
                violations: Vec::new(),
                faults: Vec::new(),
            };
            walk(&mut mux, &parsed.module);
            report.violations = mux.violations;
            report.faults.extend(mux.faults);
        }
        debug!("{}: {} violations", path, report.violations.len());

        if self.autofix {
            match apply_fixes(&parsed.module, &report.violations) {
                Ok(Some(outcome)) => {
                    debug!("{}: applied {} fixes", path, outcome.applied);
                    if outcome.source != source {
                        report.fixed_source = Some(outcome.source);
                    }
                }
                Ok(None) => {}
                Err(err) => {
                    warn!("{}: autofix skipped: {}", path, err);
                    report.fix_error = Some(err);
                }
            }
        }

        Ok(report)
    }
}

fn should_skip(rule: &dyn Rule, file: &FileContext) -> Result<bool, String> {
    panic::catch_unwind(AssertUnwindSafe(|| rule.should_skip_file(file))).map_err(panic_message)
}

fn panic_message(payload: Box<dyn Any + Send>) -> String {
    if let Some(message) = payload.downcast_ref::<&str>() {
        (*message).to_string()
    } else if let Some(message) = payload.downcast_ref::<String>() {
        message.clone()
    } else {
        "rule panicked".to_string()
    }
}

// ============================================================================
// Dispatch
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
enum Phase {
    Visit,
    Leave,
    VisitSlot,
    LeaveSlot,
}

/// Which rules to call at each traversal point, in registration order.
///
/// Keyed by `(phase, kind, slot)`; `slot` is `None` for node hooks.
/// Wildcard hooks are expanded over every kind (and every slot of that
/// kind) when the table is built, so a lookup is a single map access.
#[derive(Debug, Default)]
pub(crate) struct DispatchTable {
    entries: HashMap<(Phase, NodeKind, Option<Slot>), Vec<usize>>,
}

impl DispatchTable {
    fn build(rules: &[RuleSlot]) -> Self {
        let mut table = DispatchTable::default();
        for (index, slot) in rules.iter().enumerate() {
            for hook in slot.rule.hooks() {
                table.subscribe(index, hook);
            }
        }
        // A rule listing both a specific hook and its wildcard is called once.
        for subscribers in table.entries.values_mut() {
            subscribers.dedup();
        }
        trace!("dispatch table has {} entries", table.entries.len());
        table
    }

    fn subscribe(&mut self, index: usize, hook: Hook) {
        match hook {
            Hook::Visit(kind) => self.add(Phase::Visit, kind, None, index),
            Hook::Leave(kind) => self.add(Phase::Leave, kind, None, index),
            Hook::VisitSlot(kind, slot) => self.add_slot(Phase::VisitSlot, kind, slot, index),
            Hook::LeaveSlot(kind, slot) => self.add_slot(Phase::LeaveSlot, kind, slot, index),
            Hook::VisitAny => {
                for kind in NodeKind::ALL {
                    self.add(Phase::Visit, *kind, None, index);
                }
            }
            Hook::LeaveAny => {
                for kind in NodeKind::ALL {
                    self.add(Phase::Leave, *kind, None, index);
                }
            }
            Hook::VisitSlotAny => self.add_all_slots(Phase::VisitSlot, index),
            Hook::LeaveSlotAny => self.add_all_slots(Phase::LeaveSlot, index),
        }
    }

    fn add_slot(&mut self, phase: Phase, kind: NodeKind, slot: Slot, index: usize) {
        if kind.arity(slot).is_none() {
            trace!("{} has no slot {}; hook never fires", kind, slot);
            return;
        }
        self.add(phase, kind, Some(slot), index);
    }

    fn add_all_slots(&mut self, phase: Phase, index: usize) {
        for kind in NodeKind::ALL {
            for (slot, _) in kind.slots() {
                self.add(phase, *kind, Some(*slot), index);
            }
        }
    }

    fn add(&mut self, phase: Phase, kind: NodeKind, slot: Option<Slot>, index: usize) {
        self.entries
            .entry((phase, kind, slot))
            .or_default()
            .push(index);
    }

    fn subscribers(&self, phase: Phase, kind: NodeKind, slot: Option<Slot>) -> &[usize] {
        self.entries
            .get(&(phase, kind, slot))
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum RuleStatus {
    Active,
    Finished,
    Faulted,
}

struct RuleSlot {
    name: String,
    rule: Box<dyn Rule>,
    status: RuleStatus,
}

impl RuleSlot {
    fn new(rule: Box<dyn Rule>) -> Self {
        Self {
            name: rule.name().to_string(),
            rule,
            status: RuleStatus::Active,
        }
    }
}

/// Fans one walk out to every subscribed rule.
struct Multiplexer<'a> {
    table: &'a DispatchTable,
    rules: Vec<RuleSlot>,
    file: &'a FileContext,
    positions: &'a PositionTable,
    lines: &'a LineIndex<'a>,
    violations: Vec<Violation>,
    faults: Vec<RuleFault>,
}

impl Multiplexer<'_> {
    fn dispatch(&mut self, phase: Phase, node: &Arc<Node>, slot: Option<Slot>) {
        let Multiplexer {
            table,
            rules,
            file,
            positions,
            lines,
            violations,
            faults,
        } = self;

        for &index in table.subscribers(phase, node.kind(), slot) {
            let entry = &mut rules[index];
            if entry.status != RuleStatus::Active {
                continue;
            }
            let rule = &mut entry.rule;
            let mut ctx = RuleContext::new(&entry.name, file, positions, lines, violations);
            let outcome = panic::catch_unwind(AssertUnwindSafe(|| match (phase, slot) {
                (Phase::Visit, _) => rule.visit(node, &mut ctx),
                (Phase::Leave, _) => rule.leave(node, &mut ctx),
                (Phase::VisitSlot, Some(slot)) => rule.visit_slot(node, slot, &mut ctx),
                (Phase::LeaveSlot, Some(slot)) => rule.leave_slot(node, slot, &mut ctx),
                (Phase::VisitSlot | Phase::LeaveSlot, None) => {}
            }));
            let finished = ctx.is_finished();

            match outcome {
                Ok(()) if finished => {
                    trace!("rule {} finished", entry.name);
                    entry.status = RuleStatus::Finished;
                }
                Ok(()) => {}
                Err(payload) => {
                    let hook = hook_name(phase, node.kind(), slot);
                    let message = panic_message(payload);
                    warn!(
                        "{}: rule {} panicked in {} at {:?}: {}",
                        file.path.display(),
                        entry.name,
                        hook,
                        node.id(),
                        message
                    );
                    faults.push(RuleFault {
                        rule: entry.name.clone(),
                        node_id: node.id(),
                        hook,
                        message,
                    });
                    entry.status = RuleStatus::Faulted;
                }
            }
        }
    }

    fn any_active(&self) -> bool {
        self.rules
            .iter()
            .any(|entry| entry.status == RuleStatus::Active)
    }
}

fn hook_name(phase: Phase, kind: NodeKind, slot: Option<Slot>) -> String {
    let hook = match (phase, slot) {
        (Phase::Visit, _) => Hook::Visit(kind),
        (Phase::Leave, _) => Hook::Leave(kind),
        (Phase::VisitSlot, Some(slot)) => Hook::VisitSlot(kind, slot),
        (Phase::LeaveSlot, Some(slot)) => Hook::LeaveSlot(kind, slot),
        (Phase::VisitSlot, None) => Hook::VisitSlotAny,
        (Phase::LeaveSlot, None) => Hook::LeaveSlotAny,
    };
    hook.to_string()
}

impl Visitor for Multiplexer<'_> {
    fn visit(&mut self, node: &Arc<Node>) -> VisitResult {
        if !self.any_active() {
            return VisitResult::Stop;
        }
        self.dispatch(Phase::Visit, node, None);
        VisitResult::Continue
    }

    fn visit_slot(&mut self, node: &Arc<Node>, slot: Slot) {
        self.dispatch(Phase::VisitSlot, node, Some(slot));
    }

    fn leave_slot(&mut self, node: &Arc<Node>, slot: Slot) {
        self.dispatch(Phase::LeaveSlot, node, Some(slot));
    }

    fn leave(&mut self, node: &Arc<Node>) {
        self.dispatch(Phase::Leave, node, None);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rule::RuleDefinition;

    /// Records every call it gets, tagged with its own label.
    struct Tracer {
        label: &'static str,
        hooks: Vec<Hook>,
        log: Arc<std::sync::Mutex<Vec<String>>>,
    }

    impl Rule for Tracer {
        fn name(&self) -> &str {
            self.label
        }

        fn hooks(&self) -> Vec<Hook> {
            self.hooks.clone()
        }

        fn visit(&mut self, node: &Arc<Node>, _ctx: &mut RuleContext<'_>) {
            self.push(format!("visit {}", node.kind()));
        }

        fn leave(&mut self, node: &Arc<Node>, _ctx: &mut RuleContext<'_>) {
            self.push(format!("leave {}", node.kind()));
        }

        fn visit_slot(&mut self, node: &Arc<Node>, slot: Slot, _ctx: &mut RuleContext<'_>) {
            self.push(format!("visit_slot {}.{}", node.kind(), slot));
        }

        fn leave_slot(&mut self, node: &Arc<Node>, slot: Slot, _ctx: &mut RuleContext<'_>) {
            self.push(format!("leave_slot {}.{}", node.kind(), slot));
        }
    }

    impl Tracer {
        fn push(&self, event: String) {
            self.log
                .lock()
                .unwrap()
                .push(format!("{}: {}", self.label, event));
        }
    }

    fn tracer(
        label: &'static str,
        hooks: Vec<Hook>,
        log: &Arc<std::sync::Mutex<Vec<String>>>,
    ) -> RuleDefinition {
        let log = Arc::clone(log);
        RuleDefinition::new(label, "records calls", move || {
            Box::new(Tracer {
                label,
                hooks: hooks.clone(),
                log: Arc::clone(&log),
            }) as Box<dyn Rule>
        })
    }

    fn run(rules: RuleSet, source: &str) -> FileReport {
        LintEngine::new(rules)
            .lint_source(&FileContext::new("t.py"), source)
            .unwrap()
    }

    #[test]
    fn hooks_fire_in_registration_order() {
        let log = Arc::new(std::sync::Mutex::new(Vec::new()));
        let rules = RuleSet::new()
            .with(tracer("a", vec![Hook::Visit(NodeKind::Name)], &log))
            .with(tracer("b", vec![Hook::Visit(NodeKind::Name)], &log));
        run(rules, "x\n");
        assert_eq!(*log.lock().unwrap(), ["a: visit Name", "b: visit Name"]);
    }

    #[test]
    fn slot_hooks_bracket_the_slot() {
        let log = Arc::new(std::sync::Mutex::new(Vec::new()));
        let hooks = vec![
            Hook::VisitSlot(NodeKind::Param, Slot::Default),
            Hook::LeaveSlot(NodeKind::Param, Slot::Default),
            Hook::Visit(NodeKind::Integer),
        ];
        let rules = RuleSet::new().with(tracer("a", hooks, &log));
        run(rules, "def f(x=1):\n    pass\n");
        assert_eq!(
            *log.lock().unwrap(),
            [
                "a: visit_slot Param.Default",
                "a: visit Integer",
                "a: leave_slot Param.Default",
            ]
        );
    }

    #[test]
    fn wildcard_and_specific_hook_fire_once() {
        let log = Arc::new(std::sync::Mutex::new(Vec::new()));
        let hooks = vec![Hook::Leave(NodeKind::Name), Hook::LeaveAny];
        let rules = RuleSet::new().with(tracer("a", hooks, &log));
        run(rules, "x\n");
        let names = log
            .lock()
            .unwrap()
            .iter()
            .filter(|e| e.ends_with("leave Name"))
            .count();
        assert_eq!(names, 1);
    }

    #[test]
    fn hook_on_undeclared_slot_never_fires() {
        let log = Arc::new(std::sync::Mutex::new(Vec::new()));
        let hooks = vec![Hook::VisitSlot(NodeKind::Name, Slot::Body)];
        let rules = RuleSet::new().with(tracer("a", hooks, &log));
        run(rules, "x\n");
        assert!(log.lock().unwrap().is_empty());
    }

    struct Panicky;

    impl Rule for Panicky {
        fn name(&self) -> &str {
            "panicky"
        }

        fn hooks(&self) -> Vec<Hook> {
            vec![Hook::Visit(NodeKind::Name)]
        }

        fn visit(&mut self, node: &Arc<Node>, ctx: &mut RuleContext<'_>) {
            ctx.report(node, "before the panic");
            panic!("boom");
        }
    }

    struct EveryName;

    impl Rule for EveryName {
        fn name(&self) -> &str {
            "every-name"
        }

        fn hooks(&self) -> Vec<Hook> {
            vec![Hook::Visit(NodeKind::Name)]
        }

        fn visit(&mut self, node: &Arc<Node>, ctx: &mut RuleContext<'_>) {
            ctx.report(node, format!("name {}", node.value()));
        }
    }

    #[test]
    fn panicking_rule_is_isolated() {
        let rules = RuleSet::new()
            .with(RuleDefinition::new("panicky", "", || Box::new(Panicky) as Box<dyn Rule>))
            .with(RuleDefinition::new("every-name", "", || {
                Box::new(EveryName) as Box<dyn Rule>
            }));
        let report = run(rules, "a\nb\n");

        assert_eq!(report.faults.len(), 1);
        let fault = &report.faults[0];
        assert_eq!(fault.rule, "panicky");
        assert_eq!(fault.hook, "visit(Name)");
        assert_eq!(fault.message, "boom");
        assert!(fault.node_id.is_some());

        let rules: Vec<_> = report.violations.iter().map(|v| v.rule.as_str()).collect();
        // The faulted rule's earlier report is kept; it gets no second call.
        assert_eq!(rules, ["panicky", "every-name", "every-name"]);
    }

    struct FirstOnly;

    impl Rule for FirstOnly {
        fn name(&self) -> &str {
            "first-only"
        }

        fn hooks(&self) -> Vec<Hook> {
            vec![Hook::Visit(NodeKind::Name)]
        }

        fn visit(&mut self, node: &Arc<Node>, ctx: &mut RuleContext<'_>) {
            ctx.report(node, "first");
            ctx.finish();
        }
    }

    #[test]
    fn finish_stops_only_that_rule() {
        let rules = RuleSet::new()
            .with(RuleDefinition::new("first-only", "", || {
                Box::new(FirstOnly) as Box<dyn Rule>
            }))
            .with(RuleDefinition::new("every-name", "", || {
                Box::new(EveryName) as Box<dyn Rule>
            }));
        let report = run(rules, "a\nb\nc\n");
        let first = report.violations.iter().filter(|v| v.rule == "first-only").count();
        let every = report.violations.iter().filter(|v| v.rule == "every-name").count();
        assert_eq!((first, every), (1, 3));
        assert!(report.faults.is_empty());
    }

    #[test]
    fn violations_carry_positions() {
        let rules = RuleSet::new().with(RuleDefinition::new("every-name", "", || {
            Box::new(EveryName) as Box<dyn Rule>
        }));
        let report = run(rules, "x = 1\nif y:\n    zz\n");
        let found: Vec<_> = report
            .violations
            .iter()
            .map(|v| (v.message.as_str(), v.line, v.col, v.span.len()))
            .collect();
        assert_eq!(
            found,
            [("name x", 1, 1, 1), ("name y", 2, 4, 1), ("name zz", 3, 5, 2)]
        );
    }

    #[test]
    fn parse_errors_stop_the_pipeline() {
        let log = Arc::new(std::sync::Mutex::new(Vec::new()));
        let rules = RuleSet::new().with(tracer("a", vec![Hook::VisitAny], &log));
        let err = LintEngine::new(rules)
            .lint_source(&FileContext::new("bad.py"), "def :\n")
            .unwrap_err();
        assert!(matches!(err, LintError::Parse { .. }));
        assert!(log.lock().unwrap().is_empty());
    }
}
