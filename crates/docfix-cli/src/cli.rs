//! CLI definition and command dispatch for docfix.
//!
//! This module defines the command-line interface using `clap` and provides
//! the `run()` function that dispatches commands to the engine.
//!
//! ## Configuration Precedence
//!
//! Configuration is resolved with the following precedence (highest to lowest):
//! 1. CLI flags (e.g., `--config`, `--git`, `--ext`)
//! 2. Environment variables (`DOCFIX_CONFIG`, `DOCFIX_GIT`, `DOCFIX_VERBOSE`)
//! 3. Config file (`<project>/docfix.yaml` or path from `--config`)
//! 4. Built-in defaults

use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::Context;
use clap::{Parser, Subcommand};

use crate::ui::{report, ColorMode, MessageType, Style};

use docfix_core::{DocfixEngine, DocfixError, GitHistory, JobOptions, JobReport};

// ============================================================================
// CLI Definition
// ============================================================================

/// Version string including git commit hash
const VERSION: &str = concat!(env!("CARGO_PKG_VERSION"), " (", env!("GIT_HASH"), ")");

/// Batch post-processing for Markdown documentation trees
#[derive(Parser, Debug)]
#[command(name = "docfix")]
#[command(author, version = VERSION, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Enable verbose output (debug logging)
    #[arg(short, long, global = true, env = "DOCFIX_VERBOSE")]
    pub verbose: bool,

    /// Only print failures and the final summary
    #[arg(short, long, global = true, env = "DOCFIX_QUIET")]
    pub quiet: bool,

    /// Path to configuration file (default: <project-root>/docfix.yaml)
    #[arg(long, global = true, env = "DOCFIX_CONFIG")]
    pub config: Option<PathBuf>,

    /// Project root that relative paths resolve against
    #[arg(short = 'C', long, global = true, default_value = ".")]
    pub project_root: PathBuf,

    /// Version control program used for last-modified lookups
    #[arg(long, global = true, env = "DOCFIX_GIT")]
    pub git: Option<String>,

    /// Color output mode: always, never, or auto (default: auto)
    #[arg(long, global = true, env = "DOCFIX_COLOR", default_value = "auto")]
    pub color: String,

    #[command(subcommand)]
    pub command: Command,
}

/// Available commands
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Record each document's last commit time in its front matter
    #[command(after_help = r#"EXAMPLES:
    # Stamp every .md file under docs/src
    docfix date docs/src

    # Preview without writing
    docfix date --dry-run

    # Machine-readable report
    docfix date --json | jq '.files[] | select(.outcome == "noHistory")'
"#)]
    Date {
        /// Directory to scan (default: docsRoot from the config)
        root: Option<PathBuf>,

        /// Document extension without the dot (default: md)
        #[arg(long)]
        ext: Option<String>,

        /// Report what would change without writing
        #[arg(long)]
        dry_run: bool,

        /// Output in JSON format
        #[arg(long)]
        json: bool,
    },

    /// Ensure exactly one blank line follows every code fence opener
    #[command(after_help = r#"EXAMPLES:
    # Fix the files listed under fences.files in docfix.yaml
    docfix fences

    # Fix specific files
    docfix fences docs/src/javascript/closures.md docs/src/node/streams.md
"#)]
    Fences {
        /// Files to process (default: fences.files from the config, else a scan)
        files: Vec<PathBuf>,

        /// Report what would change without writing
        #[arg(long)]
        dry_run: bool,

        /// Output in JSON format
        #[arg(long)]
        json: bool,
    },

    /// Run the date job, then the fence job
    Run {
        /// Report what would change without writing
        #[arg(long)]
        dry_run: bool,
    },
}

/// Output switches shared by the job handlers.
#[derive(Debug, Clone, Copy)]
struct Output {
    quiet: bool,
    json: bool,
}

/// Run the CLI application.
///
/// Returns `ExitCode::SUCCESS` when every job ran to completion, even if
/// individual documents were skipped or failed, or `ExitCode::FAILURE` when
/// a job could not start.
pub fn run() -> ExitCode {
    let cli = Cli::parse();

    // Warnings always; debug only with --verbose
    let log_level = if cli.verbose { "debug" } else { "warn" };
    let filter = format!("docfix_core={},docfix_cli={}", log_level, log_level);

    tracing_subscriber::fmt()
        .with_env_filter(&filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();

    let color_mode = ColorMode::parse(&cli.color).unwrap_or_default();
    let style = Style::new(color_mode);

    // Priority: --config flag > DOCFIX_CONFIG env > <project-root>/docfix.yaml
    let engine = match &cli.config {
        Some(config_path) => DocfixEngine::with_config(&cli.project_root, config_path),
        None => DocfixEngine::open(&cli.project_root),
    };

    let mut engine = match engine {
        Ok(engine) => engine,
        Err(e) => {
            let hint = match &cli.config {
                Some(path) => format!("Check your config at {}", path.display()),
                None => format!(
                    "Check {}",
                    docfix_core::ProjectConfig::config_path_for_root(&cli.project_root).display()
                ),
            };
            eprintln!(
                "{}",
                style.error_with_context("Failed to load configuration", Some(&e.to_string()), Some(&hint))
            );
            return ExitCode::FAILURE;
        }
    };

    if let Some(program) = &cli.git {
        engine.set_git_program(program.clone());
    }
    if let Command::Date { root, ext, .. } = &cli.command {
        if let Some(root) = root {
            engine.set_docs_root(root.clone());
        }
        if let Some(ext) = ext {
            engine.set_extension(ext.clone());
        }
    }

    // Overrides bypass the loader, so check the merged result again
    if let Err(e) = engine.config().validate() {
        eprintln!("{}", describe_error(&style, &e));
        return ExitCode::FAILURE;
    }

    let result = match cli.command {
        Command::Date { dry_run, json, .. } => handle_date(
            &style,
            &engine,
            &JobOptions { dry_run },
            Output { quiet: cli.quiet, json },
        ),
        Command::Fences { files, dry_run, json } => handle_fences(
            &style,
            &engine,
            &files,
            &JobOptions { dry_run },
            Output { quiet: cli.quiet, json },
        ),
        Command::Run { dry_run } => handle_run(&style, &engine, &JobOptions { dry_run }, cli.quiet),
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            match e.downcast_ref::<DocfixError>() {
                Some(err) => eprintln!("{}", describe_error(&style, err)),
                None => eprintln!("{}", style.message(MessageType::Err, &format!("{:#}", e))),
            }
            ExitCode::FAILURE
        }
    }
}

/// Styled error block for errors that abort a run.
fn describe_error(style: &Style, err: &DocfixError) -> String {
    match err {
        DocfixError::ToolUnavailable { tool, reason } => style.error_with_context(
            &format!("`{}` is not available", tool),
            Some(reason),
            Some("Install git, or point --git / DOCFIX_GIT at the executable"),
        ),
        DocfixError::InvalidConfiguration { message, hint } => {
            style.error_with_context("Invalid configuration", Some(message), Some(hint))
        }
        DocfixError::PathNotFound(path) => style.error_with_context(
            &format!("Docs root not found: {}", path),
            None,
            Some("Pass the directory to scan, or set docsRoot in docfix.yaml"),
        ),
        other => style.message(MessageType::Err, &other.to_string()),
    }
}

// ============================================================================
// Command handlers
// ============================================================================

fn handle_date(
    style: &Style,
    engine: &DocfixEngine,
    options: &JobOptions,
    output: Output,
) -> anyhow::Result<()> {
    let git = engine.git_history()?;
    let report = stamp_dates(style, engine, &git, options, output)?;
    finish(style, &report, output)
}

fn handle_fences(
    style: &Style,
    engine: &DocfixEngine,
    files: &[PathBuf],
    options: &JobOptions,
    output: Output,
) -> anyhow::Result<()> {
    let report = engine.fix_fences(files, options, |file| print_file(style, file, options, output))?;
    finish(style, &report, output)
}

fn handle_run(style: &Style, engine: &DocfixEngine, options: &JobOptions, quiet: bool) -> anyhow::Result<()> {
    let output = Output { quiet, json: false };

    // Probe before touching any document so a missing git aborts the whole run
    let git = engine.git_history()?;

    let dates = stamp_dates(style, engine, &git, options, output)?;
    println!("{}", report::summary_line(style, &dates));

    let fences = engine.fix_fences(&[], options, |file| print_file(style, file, options, output))?;
    finish(style, &fences, output)
}

fn stamp_dates(
    style: &Style,
    engine: &DocfixEngine,
    git: &GitHistory,
    options: &JobOptions,
    output: Output,
) -> anyhow::Result<JobReport> {
    tracing::debug!("Using `{}` for history lookups", git.program());
    let report = engine.stamp_dates(git, options, |file| print_file(style, file, options, output))?;
    Ok(report)
}

/// Per-document line; suppressed for `--json`, and for everything but
/// failures with `--quiet`.
fn print_file(style: &Style, file: &docfix_core::FileReport, options: &JobOptions, output: Output) {
    if output.json || (output.quiet && !file.outcome.is_failure()) {
        return;
    }
    let line = report::file_line(style, file, options.dry_run);
    if file.outcome.is_failure() {
        eprintln!("{}", line);
    } else {
        println!("{}", line);
    }
}

fn finish(style: &Style, report: &JobReport, output: Output) -> anyhow::Result<()> {
    if output.json {
        let json = serde_json::to_string_pretty(report).context("Failed to serialize job report")?;
        println!("{}", json);
        return Ok(());
    }

    println!("{}", report::summary_line(style, report));
    if report.dry_run && report.changed() > 0 && !output.quiet {
        println!(
            "{}",
            style.message(MessageType::Hint, "Re-run without --dry-run to apply these changes")
        );
    }
    Ok(())
}
