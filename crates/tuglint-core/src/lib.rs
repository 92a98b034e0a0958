//! Core infrastructure for tuglint.
//!
//! This crate provides the language-agnostic pieces shared by the CST crate
//! and the lint engine:
//! - Byte spans into source text
//! - Text position utilities (byte offset <-> line:column)
//! - Lint configuration loading

pub mod config;
pub mod span;
pub mod text;

pub use config::{ConfigError, LintConfig, LintSettings, TestPathMatcher};
pub use span::Span;
