//! Report formatting for the CLI.
//!
//! Text output is one line per finding, `path:line:col: rule: message`, the
//! format editors and CI annotators parse. JSON output is a single
//! [`LintResponse`] document.
//!
//! ## JSON principles
//!
//! 1. `status` comes first in every response
//! 2. Same input gives the same output (files in input order, violations in
//!    traversal order)
//! 3. Absent optional values are `null`, never omitted

use std::io::{self, Write};
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::engine::FileReport;
use crate::runner::{exit_code, FileOutcome};

/// Current schema version for JSON responses.
pub const SCHEMA_VERSION: &str = "1";

// ============================================================================
// JSON Types
// ============================================================================

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct LintResponse {
    /// `"ok"` when nothing was reported, `"violations"` or `"error"`
    /// otherwise.
    pub status: String,
    pub schema_version: String,
    pub files: Vec<FileResult>,
    pub summary: Summary,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct FileResult {
    pub path: String,
    pub violations: Vec<ViolationInfo>,
    pub faults: Vec<FaultInfo>,
    /// Why the file could not be linted.
    pub error: Option<String>,
    /// Why the file's fixes were not applied.
    pub fix_error: Option<String>,
    pub fixed: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ViolationInfo {
    pub rule: String,
    pub message: String,
    pub line: u32,
    pub col: u32,
    pub byte_start: usize,
    pub byte_end: usize,
    pub fixable: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct FaultInfo {
    pub rule: String,
    pub hook: String,
    pub node_id: Option<u32>,
    pub message: String,
}

#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct Summary {
    pub files: usize,
    pub violations: usize,
    pub fixed_files: usize,
    pub errors: usize,
}

impl LintResponse {
    pub fn from_outcomes(outcomes: &[FileOutcome]) -> Self {
        let files: Vec<FileResult> = outcomes.iter().map(FileResult::from_outcome).collect();
        let summary = Summary {
            files: files.len(),
            violations: files.iter().map(|f| f.violations.len()).sum(),
            fixed_files: files.iter().filter(|f| f.fixed).count(),
            errors: files.iter().filter(|f| f.error.is_some()).count(),
        };
        let status = match exit_code(outcomes).code() {
            0 => "ok",
            1 => "violations",
            _ => "error",
        };
        LintResponse {
            status: status.to_string(),
            schema_version: SCHEMA_VERSION.to_string(),
            files,
            summary,
        }
    }
}

impl FileResult {
    fn from_outcome(outcome: &FileOutcome) -> Self {
        let path = display_path(&outcome.path);
        match &outcome.result {
            Ok(report) => FileResult {
                path,
                violations: violations(report),
                faults: report
                    .faults
                    .iter()
                    .map(|fault| FaultInfo {
                        rule: fault.rule.clone(),
                        hook: fault.hook.clone(),
                        node_id: fault.node_id.map(|id| id.as_u32()),
                        message: fault.message.clone(),
                    })
                    .collect(),
                error: outcome.write_error.clone(),
                fix_error: report.fix_error.as_ref().map(|e| e.to_string()),
                fixed: outcome.written,
            },
            Err(err) => FileResult {
                path,
                violations: Vec::new(),
                faults: Vec::new(),
                error: Some(err.to_string()),
                fix_error: None,
                fixed: false,
            },
        }
    }
}

fn violations(report: &FileReport) -> Vec<ViolationInfo> {
    report
        .violations
        .iter()
        .map(|v| ViolationInfo {
            rule: v.rule.clone(),
            message: v.message.clone(),
            line: v.line,
            col: v.col,
            byte_start: v.span.start,
            byte_end: v.span.end,
            fixable: v.has_fix(),
        })
        .collect()
}

fn display_path(path: &Path) -> String {
    path.to_string_lossy().replace(std::path::MAIN_SEPARATOR, "/")
}

/// Emit a response as pretty-printed JSON.
pub fn emit_response<T: Serialize>(response: &T, writer: &mut impl Write) -> io::Result<()> {
    let json = serde_json::to_string_pretty(response)
        .map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))?;
    writeln!(writer, "{}", json)
}

// ============================================================================
// Text
// ============================================================================

/// Write one line per violation, fault and error.
pub fn emit_text(outcomes: &[FileOutcome], writer: &mut impl Write) -> io::Result<()> {
    for outcome in outcomes {
        let path = display_path(&outcome.path);
        let report = match &outcome.result {
            Ok(report) => report,
            Err(err) => {
                writeln!(writer, "{}: error: {}", path, err)?;
                continue;
            }
        };
        for v in &report.violations {
            let fixed = if outcome.written && v.has_fix() {
                " [fixed]"
            } else {
                ""
            };
            writeln!(
                writer,
                "{}:{}:{}: {}: {}{}",
                path, v.line, v.col, v.rule, v.message, fixed
            )?;
        }
        for fault in &report.faults {
            writeln!(
                writer,
                "{}: rule {} failed in {}: {}",
                path, fault.rule, fault.hook, fault.message
            )?;
        }
        if let Some(err) = &report.fix_error {
            writeln!(writer, "{}: fixes not applied: {}", path, err)?;
        }
        if let Some(err) = &outcome.write_error {
            writeln!(writer, "{}: error: failed to write fixes: {}", path, err)?;
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::LintError;
    use crate::rule::Violation;
    use std::path::PathBuf;
    use tuglint_core::Span;

    fn outcome(violations: Vec<Violation>) -> FileOutcome {
        FileOutcome {
            path: PathBuf::from("pkg/mod.py"),
            result: Ok(FileReport {
                violations,
                ..FileReport::default()
            }),
            written: false,
            write_error: None,
        }
    }

    fn violation() -> Violation {
        Violation {
            rule: "no-print-calls".to_string(),
            message: "`print` call".to_string(),
            node_id: None,
            span: Span::new(4, 12),
            line: 2,
            col: 1,
            fix: None,
        }
    }

    #[test]
    fn text_lines() {
        let broken = FileOutcome {
            path: PathBuf::from("bad.py"),
            result: Err(LintError::InvalidArguments {
                message: "nope".to_string(),
            }),
            written: false,
            write_error: None,
        };
        let mut out = Vec::new();
        emit_text(&[outcome(vec![violation()]), broken], &mut out).unwrap();
        assert_eq!(
            String::from_utf8(out).unwrap(),
            "pkg/mod.py:2:1: no-print-calls: `print` call\nbad.py: error: invalid arguments: nope\n"
        );
    }

    #[test]
    fn json_response() {
        let response = LintResponse::from_outcomes(&[outcome(vec![violation()])]);
        assert_eq!(response.status, "violations");
        assert_eq!(response.summary.violations, 1);

        let mut out = Vec::new();
        emit_response(&response, &mut out).unwrap();
        let value: serde_json::Value = serde_json::from_slice(&out).unwrap();
        assert_eq!(value["status"], "violations");
        assert_eq!(value["files"][0]["path"], "pkg/mod.py");
        assert_eq!(value["files"][0]["violations"][0]["byte_start"], 4);
        assert_eq!(value["files"][0]["error"], serde_json::Value::Null);
    }

    #[test]
    fn clean_status() {
        let response = LintResponse::from_outcomes(&[outcome(Vec::new())]);
        assert_eq!(response.status, "ok");
    }
}
