//! Common types used throughout docfix.
//!
//! This module contains the timestamp newtype, job options, and the
//! per-file outcome and report types returned by the jobs.

use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;

use chrono::{DateTime, FixedOffset, SecondsFormat};
use serde::{Deserialize, Serialize};

// ============================================================================
// Timestamp
// ============================================================================

/// A last-modified instant taken from version control history.
///
/// Always rendered as RFC 3339 with second precision and an explicit
/// `+HH:MM` offset, e.g. `2024-01-02T03:04:05+00:00`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Timestamp(DateTime<FixedOffset>);

impl fmt::Display for Timestamp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0.to_rfc3339_opts(SecondsFormat::Secs, false))
    }
}

impl FromStr for Timestamp {
    type Err = chrono::ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        DateTime::parse_from_rfc3339(s.trim()).map(Self)
    }
}

// ============================================================================
// Job Options
// ============================================================================

/// Options shared by both jobs.
#[derive(Debug, Default, Clone)]
pub struct JobOptions {
    /// Compute outcomes without writing any file.
    pub dry_run: bool,
}

// ============================================================================
// Outcomes
// ============================================================================

/// Stage at which a document failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FailureStage {
    /// Reading the document.
    Read,
    /// Writing the transformed document.
    Write,
}

impl fmt::Display for FailureStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Read => write!(f, "read"),
            Self::Write => write!(f, "write"),
        }
    }
}

/// What happened to a single document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "outcome", rename_all = "camelCase")]
pub enum FileOutcome {
    /// A new front matter block holding the date was prepended.
    HeaderCreated {
        /// The recorded timestamp.
        date: Timestamp,
    },
    /// The date field was added to the existing front matter.
    HeaderAugmented {
        /// The recorded timestamp.
        date: Timestamp,
    },
    /// The front matter already carries a date; nothing to do.
    AlreadyDated,
    /// Version control has no history for the document.
    NoHistory,
    /// Blank lines after one or more fence openers were adjusted.
    Normalized {
        /// Number of openers whose following lines changed.
        fences: usize,
    },
    /// The document was already in normal form.
    Unchanged,
    /// Reading or writing the document failed.
    Failed {
        /// Where it failed.
        stage: FailureStage,
        /// Error message.
        message: String,
    },
}

impl FileOutcome {
    /// Whether this outcome changes the document on disk.
    pub fn is_change(&self) -> bool {
        matches!(
            self,
            Self::HeaderCreated { .. } | Self::HeaderAugmented { .. } | Self::Normalized { .. }
        )
    }

    /// Whether this outcome is a skip (not an error, nothing changed).
    pub fn is_skip(&self) -> bool {
        matches!(self, Self::AlreadyDated | Self::NoHistory | Self::Unchanged)
    }

    /// Whether this outcome is a failure.
    pub fn is_failure(&self) -> bool {
        matches!(self, Self::Failed { .. })
    }
}

/// Result for one document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FileReport {
    /// Document path, relative to the project root when possible.
    pub path: PathBuf,
    /// What happened.
    #[serde(flatten)]
    pub outcome: FileOutcome,
    /// Whether the file was actually rewritten (false on dry runs).
    pub written: bool,
}

/// Which job produced a report.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum JobKind {
    /// Front matter date stamping.
    Date,
    /// Code fence spacing.
    Fences,
}

impl fmt::Display for JobKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Date => write!(f, "date"),
            Self::Fences => write!(f, "fences"),
        }
    }
}

/// Aggregated result of a job run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JobReport {
    /// Job that produced this report.
    pub job: JobKind,
    /// Whether the run was a dry run.
    pub dry_run: bool,
    /// One entry per processed document, in processing order.
    pub files: Vec<FileReport>,
}

impl JobReport {
    /// Create an empty report.
    pub fn new(job: JobKind, dry_run: bool) -> Self {
        Self {
            job,
            dry_run,
            files: Vec::new(),
        }
    }

    /// Number of documents that were (or would be) changed.
    pub fn changed(&self) -> usize {
        self.files.iter().filter(|f| f.outcome.is_change()).count()
    }

    /// Number of documents actually rewritten.
    pub fn written(&self) -> usize {
        self.files.iter().filter(|f| f.written).count()
    }

    /// Number of skipped documents.
    pub fn skipped(&self) -> usize {
        self.files.iter().filter(|f| f.outcome.is_skip()).count()
    }

    /// Number of failed documents.
    pub fn failed(&self) -> usize {
        self.files.iter().filter(|f| f.outcome.is_failure()).count()
    }
}
