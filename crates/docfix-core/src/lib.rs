//! # docfix-core
//!
//! **docfix** – batch post-processing for a tree of Markdown documents.
//!
//! Two idempotent jobs:
//!
//! - **date**: record each document's last commit time as a `date` field in
//!   its front matter, creating the front matter when missing and never
//!   overwriting an existing date.
//! - **fences**: make sure exactly one blank line follows every code fence
//!   opener.
//!
//! ## Main Types
//!
//! - [`DocfixEngine`] – entry point bound to a project root and its config
//! - [`HistoryResolver`] – last-modified lookup ([`GitHistory`] in production)
//! - [`JobReport`] / [`FileOutcome`] – per-document results
//! - [`DocfixError`] – domain-specific error type
//!
//! ## Example
//!
//! ```ignore
//! use docfix_core::{DocfixEngine, JobOptions};
//! use std::path::Path;
//!
//! let engine = DocfixEngine::open(Path::new("."))?;
//! let git = engine.git_history()?;
//! let report = engine.stamp_dates(&git, &JobOptions::default(), |file| {
//!     println!("{}: {:?}", file.path.display(), file.outcome);
//! })?;
//! println!("{} documents updated", report.written());
//! ```

// Modules
pub mod config;
pub mod constants;
pub mod engine;
pub mod errors;
pub mod fences;
pub mod frontmatter;
pub mod history;
pub mod jobs;
pub mod scan;
pub mod types;

// Re-exports for convenience
pub use config::{FencesSection, ProjectConfig};
pub use constants::{
    DEFAULT_DATE_FIELD, DEFAULT_EXTENSION, DEFAULT_GIT_PROGRAM, DEFAULT_IGNORED_DIRS,
    PROJECT_CONFIG_FILENAME,
};
pub use engine::DocfixEngine;
pub use errors::{DocfixError, Result};
pub use fences::{normalize_fences, normalize_fences_with_stats, FenceStats};
pub use frontmatter::{has_date_field, merge_date, plan_date_merge, DateMerge, FrontMatter};
pub use history::{GitHistory, HistoryResolver, StaticHistory};
pub use jobs::{run_date_job, run_fence_job, DateJob, FenceJob};
pub use scan::{scan, ScanOptions};
pub use types::{
    FailureStage, FileOutcome, FileReport, JobKind, JobOptions, JobReport, Timestamp,
};
