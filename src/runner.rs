//! Batch execution over files.
//!
//! [`Runner::collect_files`] expands the command line's paths into a sorted
//! list of Python files; [`Runner::run`] lints them in parallel with rayon.
//! Every file gets its own tree and rule instances; only the engine (rule
//! definitions and compiled patterns) is shared.

use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};

use rayon::prelude::*;
use tracing::{debug, info, warn};
use walkdir::{DirEntry, WalkDir};

use tuglint_core::{LintConfig, TestPathMatcher};

use crate::engine::{FileReport, LintEngine};
use crate::error::{LintError, OutputErrorCode};
use crate::rule::{FileContext, RuleSet};

/// Directory names never descended into.
const EXCLUDED_DIRS: &[&str] = &[
    ".git",
    ".hg",
    ".svn",
    "node_modules",
    "__pycache__",
    ".pytest_cache",
    ".mypy_cache",
    ".ruff_cache",
    ".venv",
    "venv",
    ".tox",
    ".nox",
    "build",
    "dist",
    ".eggs",
    "*.egg-info",
];

/// The result of linting one file.
#[derive(Debug)]
pub struct FileOutcome {
    pub path: PathBuf,
    pub result: Result<FileReport, LintError>,
    /// The fixed source was written back to `path`.
    pub written: bool,
    /// Writing the fixed source failed.
    pub write_error: Option<String>,
}

impl FileOutcome {
    /// The exit status this file alone would produce.
    pub fn code(&self) -> OutputErrorCode {
        match &self.result {
            Err(err) => OutputErrorCode::from(err),
            Ok(_) if self.write_error.is_some() => OutputErrorCode::Unparseable,
            Ok(report) if report.is_clean() => OutputErrorCode::Clean,
            Ok(_) => OutputErrorCode::ViolationsFound,
        }
    }
}

/// Lints many files with one engine.
#[derive(Debug, Clone)]
pub struct Runner {
    engine: LintEngine,
    test_paths: TestPathMatcher,
    write_fixes: bool,
}

impl Runner {
    /// A runner for `rules`, with autofix and test paths taken from
    /// `config`.
    pub fn new(config: &LintConfig, rules: RuleSet) -> Result<Self, LintError> {
        let test_paths = config.test_matcher()?;
        let autofix = config.lint.autofix;
        Ok(Self {
            engine: LintEngine::new(rules).with_autofix(autofix),
            test_paths,
            write_fixes: autofix,
        })
    }

    /// Compute fixes but leave files untouched.
    pub fn dry_run(mut self) -> Self {
        self.write_fixes = false;
        self
    }

    pub fn engine(&self) -> &LintEngine {
        &self.engine
    }

    /// Expand `paths` into the Python files to lint.
    ///
    /// Directories are walked recursively for `*.py` files, in sorted order,
    /// skipping VCS, cache and virtualenv directories. Files named
    /// explicitly are kept whatever their extension. Duplicates are dropped.
    pub fn collect_files(paths: &[PathBuf]) -> Result<Vec<PathBuf>, LintError> {
        let mut files = Vec::new();
        let mut seen = HashSet::new();
        for path in paths {
            let metadata = fs::metadata(path).map_err(|e| LintError::io(path, e))?;
            if !metadata.is_dir() {
                if seen.insert(path.clone()) {
                    files.push(path.clone());
                }
                continue;
            }
            let walker = WalkDir::new(path)
                .follow_links(false)
                .sort_by_file_name()
                .into_iter()
                .filter_entry(|e| e.depth() == 0 || !is_excluded(e));
            for entry in walker {
                let entry = entry.map_err(|e| {
                    let at = e.path().unwrap_or(path.as_path()).to_path_buf();
                    LintError::io(at, e.into())
                })?;
                if entry.file_type().is_file() && is_python(entry.path()) {
                    let file = entry.into_path();
                    if seen.insert(file.clone()) {
                        files.push(file);
                    }
                }
            }
        }
        debug!("collected {} files", files.len());
        Ok(files)
    }

    /// Lint `files` in parallel. Outcomes come back in the order of `files`.
    pub fn run(&self, files: &[PathBuf]) -> Vec<FileOutcome> {
        files.par_iter().map(|path| self.lint_file(path)).collect()
    }

    /// Lint one file and, when autofix is on, write the fixed source back.
    pub fn lint_file(&self, path: &Path) -> FileOutcome {
        let file = FileContext::new(path).with_test(self.test_paths.is_test_path(path));
        let result = fs::read_to_string(path)
            .map_err(|e| LintError::io(path, e))
            .and_then(|source| self.engine.lint_source(&file, &source));

        let mut outcome = FileOutcome {
            path: path.to_path_buf(),
            result,
            written: false,
            write_error: None,
        };
        if let Err(err) = &outcome.result {
            warn!("{}", err);
        }
        if !self.write_fixes {
            return outcome;
        }
        if let Ok(FileReport {
            fixed_source: Some(fixed),
            ..
        }) = &outcome.result
        {
            match fs::write(path, fixed) {
                Ok(()) => {
                    info!("{}: wrote fixes", path.display());
                    outcome.written = true;
                }
                Err(err) => {
                    warn!("{}: failed to write fixes: {}", path.display(), err);
                    outcome.write_error = Some(err.to_string());
                }
            }
        }
        outcome
    }
}

/// The exit status for a whole run: the most severe file's.
pub fn exit_code(outcomes: &[FileOutcome]) -> OutputErrorCode {
    outcomes
        .iter()
        .map(FileOutcome::code)
        .max()
        .unwrap_or(OutputErrorCode::Clean)
}

fn is_python(path: &Path) -> bool {
    path.extension().is_some_and(|ext| ext == "py")
}

fn is_excluded(entry: &DirEntry) -> bool {
    if !entry.file_type().is_dir() {
        return false;
    }
    let name = entry.file_name().to_string_lossy();
    EXCLUDED_DIRS.iter().any(|pattern| match pattern.strip_prefix('*') {
        Some(suffix) => name.ends_with(suffix),
        None => name == *pattern,
    })
}
