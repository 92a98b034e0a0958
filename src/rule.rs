//! The rule contract.
//!
//! A [`Rule`] is a visitor over the tree that declares which traversal
//! points it wants to hear about ([`Hook`]s), may opt out of a file
//! ([`Rule::should_skip_file`]), and reports findings through a
//! [`RuleContext`]. Reporting is the only effect a rule has outside its own
//! state: rules receive shared `Arc<Node>`s and never mutate the tree.
//!
//! Rules are registered as [`RuleDefinition`]s, which are shared read-only
//! across files and threads. Every file gets fresh rule instances from the
//! definition's factory, so per-file state (counters, flags) never leaks
//! between files.

use std::fmt;
use std::path::PathBuf;
use std::sync::Arc;

use tuglint_core::text::LineIndex;
use tuglint_core::{LintConfig, Span};
use tuglint_cst::{Node, NodeId, NodeKind, PositionTable, Replacement, Slot};

// ============================================================================
// Hooks
// ============================================================================

/// A traversal point a rule subscribes to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Hook {
    Visit(NodeKind),
    Leave(NodeKind),
    VisitSlot(NodeKind, Slot),
    LeaveSlot(NodeKind, Slot),
    /// Every node.
    VisitAny,
    LeaveAny,
    /// Every slot of every node.
    VisitSlotAny,
    LeaveSlotAny,
}

impl fmt::Display for Hook {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Hook::Visit(kind) => write!(f, "visit({})", kind),
            Hook::Leave(kind) => write!(f, "leave({})", kind),
            Hook::VisitSlot(kind, slot) => write!(f, "visit_slot({}.{})", kind, slot),
            Hook::LeaveSlot(kind, slot) => write!(f, "leave_slot({}.{})", kind, slot),
            Hook::VisitAny => f.write_str("visit(*)"),
            Hook::LeaveAny => f.write_str("leave(*)"),
            Hook::VisitSlotAny => f.write_str("visit_slot(*)"),
            Hook::LeaveSlotAny => f.write_str("leave_slot(*)"),
        }
    }
}

// ============================================================================
// Rule
// ============================================================================

/// File-level facts a rule may use to opt out of a file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileContext {
    pub path: PathBuf,
    /// The path matched one of the configured test patterns.
    pub is_test: bool,
}

impl FileContext {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            is_test: false,
        }
    }

    pub fn with_test(mut self, is_test: bool) -> Self {
        self.is_test = is_test;
        self
    }
}

/// A lint rule.
///
/// Only the hooks listed by [`Rule::hooks`] are ever called. The default
/// hook bodies do nothing.
#[allow(unused_variables)]
pub trait Rule: Send {
    fn name(&self) -> &str;

    fn hooks(&self) -> Vec<Hook>;

    /// Return `true` to take no part in this file. No hook is called and
    /// nothing is reported.
    fn should_skip_file(&self, file: &FileContext) -> bool {
        false
    }

    fn visit(&mut self, node: &Arc<Node>, ctx: &mut RuleContext<'_>) {}

    fn leave(&mut self, node: &Arc<Node>, ctx: &mut RuleContext<'_>) {}

    fn visit_slot(&mut self, node: &Arc<Node>, slot: Slot, ctx: &mut RuleContext<'_>) {}

    fn leave_slot(&mut self, node: &Arc<Node>, slot: Slot, ctx: &mut RuleContext<'_>) {}
}

// ============================================================================
// Violations and the reporting context
// ============================================================================

/// A finding reported by a rule.
#[derive(Debug, Clone)]
pub struct Violation {
    pub rule: String,
    pub message: String,
    /// The node the finding is anchored at. `None` only for nodes a rule
    /// built itself.
    pub node_id: Option<NodeId>,
    pub span: Span,
    /// 1-indexed.
    pub line: u32,
    /// 1-indexed, in characters.
    pub col: u32,
    pub fix: Option<Replacement>,
}

impl Violation {
    pub fn has_fix(&self) -> bool {
        self.fix.is_some()
    }
}

/// What a rule sees of the engine while one of its hooks runs.
pub struct RuleContext<'a> {
    rule: &'a str,
    file: &'a FileContext,
    positions: &'a PositionTable,
    lines: &'a LineIndex<'a>,
    violations: &'a mut Vec<Violation>,
    finished: bool,
}

impl<'a> RuleContext<'a> {
    pub(crate) fn new(
        rule: &'a str,
        file: &'a FileContext,
        positions: &'a PositionTable,
        lines: &'a LineIndex<'a>,
        violations: &'a mut Vec<Violation>,
    ) -> Self {
        Self {
            rule,
            file,
            positions,
            lines,
            violations,
            finished: false,
        }
    }

    pub fn file(&self) -> &FileContext {
        self.file
    }

    /// Source span of a parsed node, trivia excluded.
    pub fn span_of(&self, node: &Node) -> Option<Span> {
        node.id().and_then(|id| self.positions.span_of(id))
    }

    /// Report a finding anchored at `node`.
    pub fn report(&mut self, node: &Arc<Node>, message: impl Into<String>) {
        self.push(node, message.into(), None);
    }

    /// Report a finding together with a replacement for `node`.
    pub fn report_with_fix(
        &mut self,
        node: &Arc<Node>,
        message: impl Into<String>,
        fix: Replacement,
    ) {
        self.push(node, message.into(), Some(fix));
    }

    /// Stop calling this rule's hooks for the rest of the file. Findings
    /// reported so far are kept.
    pub fn finish(&mut self) {
        self.finished = true;
    }

    pub(crate) fn is_finished(&self) -> bool {
        self.finished
    }

    fn push(&mut self, node: &Arc<Node>, message: String, fix: Option<Replacement>) {
        let span = self.span_of(node).unwrap_or_else(|| Span::empty_at(0));
        let (line, col) = self.lines.position(span.start);
        if node.id().is_none() && fix.is_some() {
            tracing::warn!(
                "{}: fix reported on a node that is not part of the tree; dropped",
                self.rule
            );
        }
        self.violations.push(Violation {
            rule: self.rule.to_string(),
            message,
            node_id: node.id(),
            span,
            line,
            col,
            fix: fix.filter(|_| node.id().is_some()),
        });
    }
}

// ============================================================================
// Registry
// ============================================================================

type RuleFactory = dyn Fn() -> Box<dyn Rule> + Send + Sync;

/// A registered rule: its name, a one-line description, and a factory for
/// per-file instances.
#[derive(Clone)]
pub struct RuleDefinition {
    pub name: &'static str,
    pub description: &'static str,
    factory: Arc<RuleFactory>,
}

impl RuleDefinition {
    pub fn new(
        name: &'static str,
        description: &'static str,
        factory: impl Fn() -> Box<dyn Rule> + Send + Sync + 'static,
    ) -> Self {
        Self {
            name,
            description,
            factory: Arc::new(factory),
        }
    }

    /// A fresh rule instance for one file.
    pub fn instantiate(&self) -> Box<dyn Rule> {
        (self.factory)()
    }
}

impl fmt::Debug for RuleDefinition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RuleDefinition")
            .field("name", &self.name)
            .field("description", &self.description)
            .finish_non_exhaustive()
    }
}

/// An ordered set of rule definitions. Hooks run in this order.
#[derive(Debug, Clone, Default)]
pub struct RuleSet {
    rules: Vec<RuleDefinition>,
}

impl RuleSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, rule: RuleDefinition) -> Self {
        self.push(rule);
        self
    }

    pub fn push(&mut self, rule: RuleDefinition) {
        self.rules.push(rule);
    }

    pub fn get(&self, name: &str) -> Option<&RuleDefinition> {
        self.rules.iter().find(|rule| rule.name == name)
    }

    pub fn names(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.rules.iter().map(|rule| rule.name)
    }

    pub fn iter(&self) -> impl Iterator<Item = &RuleDefinition> {
        self.rules.iter()
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    /// The rules the configuration's `enable` and `disable` lists select,
    /// in registration order.
    pub fn filtered(&self, config: &LintConfig) -> RuleSet {
        let settings = &config.lint;
        for name in settings.enable.iter().chain(&settings.disable) {
            if self.get(name).is_none() {
                tracing::warn!("unknown rule '{}' in configuration", name);
            }
        }
        RuleSet {
            rules: self
                .rules
                .iter()
                .filter(|rule| settings.is_rule_enabled(rule.name))
                .cloned()
                .collect(),
        }
    }
}

impl FromIterator<RuleDefinition> for RuleSet {
    fn from_iter<I: IntoIterator<Item = RuleDefinition>>(iter: I) -> Self {
        RuleSet {
            rules: iter.into_iter().collect(),
        }
    }
}
