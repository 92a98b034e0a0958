//! Error types and exit codes for tuglint.
//!
//! [`LintError`] is the unified error for one file's pipeline (and for the
//! CLI's own setup failures). Subsystem errors bridge into it through
//! `From` impls so `?` works across crate boundaries.
//!
//! ## Exit Codes
//!
//! | code | meaning |
//! |------|---------|
//! | `0` | no violations |
//! | `1` | violations found |
//! | `2` | invalid arguments or configuration |
//! | `3` | at least one file could not be parsed or read |

use std::fmt;
use std::path::PathBuf;

use thiserror::Error;

use tuglint_core::ConfigError;
use tuglint_cst::{NodeId, ParserError};

// ============================================================================
// Output Error Codes
// ============================================================================

/// Process exit codes of the `tuglint` binary.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
#[repr(u8)]
pub enum OutputErrorCode {
    /// Every file was linted and nothing was reported.
    Clean = 0,
    /// At least one violation was reported.
    ViolationsFound = 1,
    /// Bad command line or configuration.
    InvalidArguments = 2,
    /// At least one file could not be read or parsed.
    Unparseable = 3,
}

impl OutputErrorCode {
    /// Get the numeric code value.
    pub fn code(&self) -> u8 {
        *self as u8
    }
}

impl fmt::Display for OutputErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}

// ============================================================================
// Unified Error Type
// ============================================================================

#[derive(Debug, Error)]
pub enum LintError {
    /// The file did not tokenize or parse. No rule ran.
    #[error("{path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: ParserError,
    },

    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("invalid arguments: {message}")]
    InvalidArguments { message: String },
}

impl LintError {
    pub fn parse(path: impl Into<PathBuf>, source: ParserError) -> Self {
        LintError::Parse {
            path: path.into(),
            source,
        }
    }

    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        LintError::Io {
            path: path.into(),
            source,
        }
    }
}

impl From<&LintError> for OutputErrorCode {
    fn from(err: &LintError) -> Self {
        match err {
            LintError::Parse { .. } => OutputErrorCode::Unparseable,
            LintError::Io { .. } => OutputErrorCode::Unparseable,
            LintError::Config(_) => OutputErrorCode::InvalidArguments,
            LintError::InvalidArguments { .. } => OutputErrorCode::InvalidArguments,
        }
    }
}

impl From<LintError> for OutputErrorCode {
    fn from(err: LintError) -> Self {
        OutputErrorCode::from(&err)
    }
}

// ============================================================================
// Fix Conflicts
// ============================================================================

/// Two rules proposed different replacements for the same node.
///
/// Fatal to autofix for the file only: its violations are still reported.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("conflicting fixes for {node_id} from {first_rule} and {second_rule}")]
pub struct ConflictingFixError {
    pub node_id: NodeId,
    pub first_rule: String,
    pub second_rule: String,
}
