//! Binary entry point for the tuglint CLI.
//!
//! ## Usage
//!
//! ```bash
//! # Lint a project (reads tuglint.toml from the current directory)
//! tuglint src/
//!
//! # Apply fixes in place
//! tuglint --fix src/ scripts/tool.py
//!
//! # Machine-readable report
//! tuglint --format json src/
//! ```
//!
//! Exit status: 0 clean, 1 violations, 2 bad arguments or configuration,
//! 3 a file could not be read or parsed.

use std::io::{self, Write};
use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, ValueEnum};

use tuglint::config::LintConfig;
use tuglint::output::{emit_response, emit_text, LintResponse};
use tuglint::{builtin_rules, exit_code, LintError, OutputErrorCode, Runner};

// ============================================================================
// CLI Structure
// ============================================================================

/// Lint Python sources, optionally fixing what can be fixed.
#[derive(Parser, Debug)]
#[command(name = "tuglint", version, about = "Lint Python sources with autofix")]
struct Cli {
    /// Files or directories to lint.
    #[arg(required_unless_present = "list_rules")]
    paths: Vec<PathBuf>,

    /// Apply fixes and write the files back.
    #[arg(long)]
    fix: bool,

    /// Configuration file (default: tuglint.toml in the current directory).
    #[arg(long)]
    config: Option<PathBuf>,

    /// Report format.
    #[arg(long, value_enum, default_value = "text")]
    format: Format,

    /// Log level for tracing output.
    #[arg(long, value_enum, default_value = "warn")]
    log_level: LogLevel,

    /// Emit logs as JSON lines.
    #[arg(long)]
    log_json: bool,

    /// List the available rules and exit.
    #[arg(long)]
    list_rules: bool,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum Format {
    Text,
    Json,
}

/// Log level for tracing output.
#[derive(Clone, Copy, Debug, ValueEnum)]
enum LogLevel {
    Trace,
    Debug,
    Info,
    Warn,
    Error,
}

impl LogLevel {
    fn to_tracing_level(self) -> tracing::Level {
        match self {
            LogLevel::Trace => tracing::Level::TRACE,
            LogLevel::Debug => tracing::Level::DEBUG,
            LogLevel::Info => tracing::Level::INFO,
            LogLevel::Warn => tracing::Level::WARN,
            LogLevel::Error => tracing::Level::ERROR,
        }
    }
}

// ============================================================================
// Main
// ============================================================================

fn main() -> ExitCode {
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(err) => {
            let _ = err.print();
            return if err.use_stderr() {
                ExitCode::from(OutputErrorCode::InvalidArguments.code())
            } else {
                ExitCode::SUCCESS
            };
        }
    };
    init_tracing(cli.log_level, cli.log_json);

    match execute(cli) {
        Ok(code) => ExitCode::from(code.code()),
        Err(err) => {
            eprintln!("tuglint: {}", err);
            ExitCode::from(OutputErrorCode::from(&err).code())
        }
    }
}

/// Initialize tracing subscriber.
fn init_tracing(level: LogLevel, json: bool) {
    use tracing_subscriber::EnvFilter;

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(level.to_tracing_level().to_string()));

    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(io::stderr);
    if json {
        builder.json().init();
    } else {
        builder.init();
    }
}

/// Execute the CLI command.
fn execute(cli: Cli) -> Result<OutputErrorCode, LintError> {
    let rules = builtin_rules();
    if cli.list_rules {
        let mut stdout = io::stdout().lock();
        for rule in rules.iter() {
            writeln!(stdout, "{:<26} {}", rule.name, rule.description)
                .map_err(|e| LintError::io("<stdout>", e))?;
        }
        return Ok(OutputErrorCode::Clean);
    }

    let mut config = match &cli.config {
        Some(path) => LintConfig::load(path)?,
        None => {
            let cwd = std::env::current_dir().map_err(|e| LintError::io(".", e))?;
            LintConfig::load_from_project(&cwd)?
        }
    };
    if cli.fix {
        config.lint.autofix = true;
    }

    let rules = rules.filtered(&config);
    tracing::debug!("enabled rules: {:?}", rules.names().collect::<Vec<_>>());
    let runner = Runner::new(&config, rules)?;
    let files = Runner::collect_files(&cli.paths)?;
    let outcomes = runner.run(&files);

    let mut stdout = io::stdout().lock();
    let written = match cli.format {
        Format::Text => emit_text(&outcomes, &mut stdout),
        Format::Json => emit_response(&LintResponse::from_outcomes(&outcomes), &mut stdout),
    };
    written
        .and_then(|()| stdout.flush())
        .map_err(|e| LintError::io("<stdout>", e))?;

    Ok(exit_code(&outcomes))
}
