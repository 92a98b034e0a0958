//! Batch runs over a project on disk.

use std::fs;
use std::path::{Path, PathBuf};

use tempfile::TempDir;
use tuglint::config::{ConfigError, LintConfig};
use tuglint::output::{emit_response, LintResponse};
use tuglint::{builtin_rules, exit_code, LintError, OutputErrorCode, Runner};

fn write(root: &Path, relative: &str, source: &str) -> PathBuf {
    let path = root.join(relative);
    fs::create_dir_all(path.parent().unwrap()).unwrap();
    fs::write(&path, source).unwrap();
    path
}

fn project(config: &str) -> (TempDir, LintConfig) {
    let dir = TempDir::new().unwrap();
    write(dir.path(), "tuglint.toml", config);
    let config = LintConfig::load_from_project(dir.path()).unwrap();
    (dir, config)
}

fn run(config: &LintConfig, root: &Path) -> Vec<tuglint::FileOutcome> {
    let runner = Runner::new(config, builtin_rules().filtered(config)).unwrap();
    let files = Runner::collect_files(&[root.to_path_buf()]).unwrap();
    runner.run(&files)
}

#[test]
fn clean_project_exits_zero() {
    let (dir, config) = project("");
    write(dir.path(), "pkg/a.py", "def f(x):\n    return x is None\n");
    let outcomes = run(&config, dir.path());
    assert_eq!(outcomes.len(), 1);
    assert_eq!(exit_code(&outcomes), OutputErrorCode::Clean);
}

#[test]
fn violations_exit_one_and_leave_files_alone() {
    let (dir, config) = project("[lint]\nautofix = false\n");
    let source = "class C(object):\n    pass\n";
    let path = write(dir.path(), "a.py", source);

    let outcomes = run(&config, dir.path());
    assert_eq!(exit_code(&outcomes), OutputErrorCode::ViolationsFound);
    assert!(!outcomes[0].written);
    assert_eq!(fs::read_to_string(path).unwrap(), source);
}

#[test]
fn autofix_writes_fixed_sources() {
    let (dir, config) = project("[lint]\nautofix = true\n");
    let path = write(dir.path(), "a.py", "class C(object):\n    items = list()\n");

    let outcomes = run(&config, dir.path());
    assert!(outcomes[0].written);
    assert_eq!(
        fs::read_to_string(&path).unwrap(),
        "class C:\n    items = []\n"
    );

    // The rewritten project is clean.
    let again = run(&config, dir.path());
    assert_eq!(exit_code(&again), OutputErrorCode::Clean);
}

#[test]
fn dry_run_computes_fixes_without_writing() {
    let (dir, config) = project("[lint]\nautofix = true\n");
    let source = "x = dict()\n";
    let path = write(dir.path(), "a.py", source);

    let runner = Runner::new(&config, builtin_rules()).unwrap().dry_run();
    let outcomes = runner.run(&[path.clone()]);
    let report = outcomes[0].result.as_ref().unwrap();
    assert_eq!(report.fixed_source.as_deref(), Some("x = {}\n"));
    assert!(!outcomes[0].written);
    assert_eq!(fs::read_to_string(path).unwrap(), source);
}

#[test]
fn test_files_skip_print_rule() {
    let (dir, config) = project("");
    write(dir.path(), "pkg/tool.py", "print('hi')\n");
    write(dir.path(), "tests/test_tool.py", "print('hi')\n");

    let outcomes = run(&config, dir.path());
    let counts: Vec<_> = outcomes
        .iter()
        .map(|o| o.result.as_ref().unwrap().violations.len())
        .collect();
    assert_eq!(counts, [1, 0]);
}

#[test]
fn disabled_rules_do_not_run() {
    let (dir, config) = project("[lint]\ndisable = [\"no-print-calls\"]\n");
    write(dir.path(), "tool.py", "print('hi')\n");
    let outcomes = run(&config, dir.path());
    assert_eq!(exit_code(&outcomes), OutputErrorCode::Clean);
}

#[test]
fn unparseable_file_exits_three_and_others_still_run() {
    let (dir, config) = project("");
    write(dir.path(), "a.py", "class C(object):\n    pass\n");
    write(dir.path(), "b.py", "def (:\n");

    let outcomes = run(&config, dir.path());
    assert!(outcomes[0].result.is_ok());
    assert!(matches!(outcomes[1].result, Err(LintError::Parse { .. })));
    assert_eq!(exit_code(&outcomes), OutputErrorCode::Unparseable);
}

#[test]
fn bad_test_pattern_is_a_config_error() {
    let dir = TempDir::new().unwrap();
    write(dir.path(), "tuglint.toml", "[lint]\ntest_patterns = [\"[\"]\n");
    let err = LintConfig::load_from_project(dir.path()).unwrap_err();
    assert!(matches!(err, ConfigError::InvalidPattern { .. }));
    let err = LintError::from(err);
    assert_eq!(OutputErrorCode::from(&err), OutputErrorCode::InvalidArguments);

    // A config built in code is checked when the runner compiles it.
    let mut config = LintConfig::default();
    config.lint.test_patterns = vec!["[".to_string()];
    let err = Runner::new(&config, builtin_rules()).unwrap_err();
    assert!(matches!(err, LintError::Config(_)));
}

#[test]
fn json_report_lists_files_and_summary() {
    let (dir, config) = project("");
    write(dir.path(), "a.py", "if x == None:\n    pass\n");
    write(dir.path(), "b.py", "y = 1\n");

    let outcomes = run(&config, dir.path());
    let mut out = Vec::new();
    emit_response(&LintResponse::from_outcomes(&outcomes), &mut out).unwrap();
    let json: serde_json::Value = serde_json::from_slice(&out).unwrap();

    assert_eq!(json["status"], "violations");
    assert_eq!(json["schema_version"], "1");
    assert_eq!(json["summary"]["files"], 2);
    assert_eq!(json["summary"]["violations"], 1);

    let violation = &json["files"][0]["violations"][0];
    assert_eq!(violation["rule"], "compare-singleton-by-is");
    assert_eq!(violation["line"], 1);
    assert_eq!(violation["col"], 6);
    assert_eq!(violation["fixable"], true);
    assert_eq!(json["files"][1]["violations"], serde_json::json!([]));
}
