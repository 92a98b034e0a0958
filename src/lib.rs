//! tuglint: a lint engine for Python built on a lossless syntax tree.
//!
//! Rules visit the tree produced by [`tuglint_cst`], report violations and
//! propose replacements; the engine applies those replacements and renders
//! the tree back to source, leaving every untouched byte as it was.
//!
//! ```
//! use tuglint::{builtin_rules, FileContext, LintEngine};
//!
//! let engine = LintEngine::new(builtin_rules()).with_autofix(true);
//! let report = engine
//!     .lint_source(&FileContext::new("m.py"), "class C(object):\n    pass\n")
//!     .unwrap();
//! assert_eq!(report.violations.len(), 1);
//! assert_eq!(report.fixed_source.as_deref(), Some("class C:\n    pass\n"));
//! ```

// Core infrastructure - re-exported from the workspace crates
pub use tuglint_core::config;
pub use tuglint_core::span;
pub use tuglint_core::text;
pub use tuglint_cst as cst;

pub mod engine;
pub mod error;
pub mod fix;
pub mod output;
pub mod rule;
pub mod rules;
pub mod runner;

pub use engine::{FileReport, LintEngine, RuleFault};
pub use error::{ConflictingFixError, LintError, OutputErrorCode};
pub use fix::{apply_fixes, FixError, FixOutcome};
pub use rule::{FileContext, Hook, Rule, RuleContext, RuleDefinition, RuleSet, Violation};
pub use rules::builtin_rules;
pub use runner::{exit_code, FileOutcome, Runner};
