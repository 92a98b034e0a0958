//! Configuration handling for tuglint.
//!
//! Configuration lives in `tuglint.toml` at the project root:
//!
//! ```toml
//! [lint]
//! autofix = true
//! disable = ["no-print-calls"]
//! test_patterns = ["**/tests/**"]
//! ```
//!
//! Every field is optional; a missing file yields [`LintConfig::default`].

use globset::{Glob, GlobSet, GlobSetBuilder};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// File name looked up by [`LintConfig::load_from_project`].
pub const CONFIG_FILE_NAME: &str = "tuglint.toml";

/// Errors raised while loading configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse config file {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    #[error("invalid test path pattern '{pattern}': {source}")]
    InvalidPattern {
        pattern: String,
        #[source]
        source: globset::Error,
    },
}

/// Top-level configuration document.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LintConfig {
    #[serde(default)]
    pub lint: LintSettings,
}

/// The `[lint]` table.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LintSettings {
    /// Apply replacements proposed by rules and write the result back.
    #[serde(default)]
    pub autofix: bool,

    /// Rule names to run. Empty means every registered rule.
    #[serde(default)]
    pub enable: Vec<String>,

    /// Rule names to exclude, applied after `enable`.
    #[serde(default)]
    pub disable: Vec<String>,

    /// Glob patterns marking files as test files.
    #[serde(default = "default_test_patterns")]
    pub test_patterns: Vec<String>,
}

fn default_test_patterns() -> Vec<String> {
    vec![
        "**/test_*.py".to_string(),
        "**/*_test.py".to_string(),
        "**/tests/**".to_string(),
    ]
}

impl Default for LintSettings {
    fn default() -> Self {
        Self {
            autofix: false,
            enable: Vec::new(),
            disable: Vec::new(),
            test_patterns: default_test_patterns(),
        }
    }
}

impl LintSettings {
    /// Whether a rule with this name should run.
    pub fn is_rule_enabled(&self, name: &str) -> bool {
        let enabled = self.enable.is_empty() || self.enable.iter().any(|n| n == name);
        enabled && !self.disable.iter().any(|n| n == name)
    }
}

impl LintConfig {
    /// Load configuration from a file.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::parse(&content, path)
    }

    fn parse(content: &str, path: &Path) -> Result<Self, ConfigError> {
        let config: LintConfig = toml::from_str(content).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })?;
        // Surface bad globs at load time rather than on the first file.
        config.test_matcher()?;
        Ok(config)
    }

    /// Load `tuglint.toml` from the given project root, or defaults if absent.
    pub fn load_from_project(project_root: &Path) -> Result<Self, ConfigError> {
        let config_path = project_root.join(CONFIG_FILE_NAME);
        if config_path.exists() {
            tracing::debug!("loading config from {}", config_path.display());
            Self::load(&config_path)
        } else {
            Ok(LintConfig::default())
        }
    }

    /// Compile `test_patterns` into a matcher.
    pub fn test_matcher(&self) -> Result<TestPathMatcher, ConfigError> {
        let mut builder = GlobSetBuilder::new();
        for pattern in &self.lint.test_patterns {
            let glob = Glob::new(pattern).map_err(|source| ConfigError::InvalidPattern {
                pattern: pattern.clone(),
                source,
            })?;
            builder.add(glob);
        }
        let set = builder
            .build()
            .map_err(|source| ConfigError::InvalidPattern {
                pattern: self.lint.test_patterns.join(", "),
                source,
            })?;
        Ok(TestPathMatcher { set })
    }
}

/// Compiled test path globs.
#[derive(Debug, Clone)]
pub struct TestPathMatcher {
    set: GlobSet,
}

impl TestPathMatcher {
    pub fn is_test_path(&self, path: &Path) -> bool {
        self.set.is_match(path)
    }
}
