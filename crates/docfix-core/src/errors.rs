//! Error types for docfix-core.

use std::path::PathBuf;

use thiserror::Error;

/// Domain-specific errors for docfix operations.
///
/// Only [`DocfixError::ToolUnavailable`], configuration errors and a missing
/// docs root abort a run. Per-file read/write failures are caught by the job
/// loop and turned into a [`crate::FileOutcome::Failed`] entry.
#[derive(Error, Debug)]
pub enum DocfixError {
    /// A required external command could not be executed.
    #[error("Required tool `{tool}` is unavailable: {reason}")]
    ToolUnavailable {
        /// The program that was probed (e.g. `git`).
        tool: String,
        /// Why the probe failed.
        reason: String,
    },

    /// A path or directory was not found.
    #[error("Path not found: {0}")]
    PathNotFound(String),

    /// The configuration file could not be read or parsed.
    #[error("Config invalid: {0}")]
    InvalidConfig(String),

    /// A configuration value is invalid.
    #[error("Invalid configuration: {message}. {hint}")]
    InvalidConfiguration {
        /// Description of the invalid configuration.
        message: String,
        /// Actionable hint on how to fix it.
        hint: String,
    },

    /// Reading a document failed.
    #[error("Failed to read `{path}`: {source}")]
    ReadFailure {
        /// The document that could not be read.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// Writing a document back failed.
    #[error("Failed to write `{path}`: {source}")]
    WriteFailure {
        /// The document that could not be written.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },
}

/// Result alias used throughout docfix-core.
pub type Result<T> = std::result::Result<T, DocfixError>;
