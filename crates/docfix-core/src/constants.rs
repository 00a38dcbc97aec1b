//! Common constants used throughout docfix-core.
//!
//! Centralizes file names, markers and defaults so the scanner, the
//! transformations and the config loader agree on them.

// ============================================================================
// Configuration
// ============================================================================

/// Name of the project configuration file, looked up in the project root.
pub const PROJECT_CONFIG_FILENAME: &str = "docfix.yaml";

/// Default extension of the documents processed by the date job.
pub const DEFAULT_EXTENSION: &str = "md";

/// Default front matter key that receives the last-modified timestamp.
pub const DEFAULT_DATE_FIELD: &str = "date";

/// Default version control program.
pub const DEFAULT_GIT_PROGRAM: &str = "git";

// ============================================================================
// Document markers
// ============================================================================

/// Line delimiting the front matter block (start and end).
pub const FRONT_MATTER_MARKER: &str = "---";

/// Character that makes up a code fence marker.
pub const FENCE_CHAR: char = '`';

/// Minimum number of [`FENCE_CHAR`] needed to open a fence.
pub const MIN_FENCE_LEN: usize = 3;

// ============================================================================
// Ignored Directories
// ============================================================================

/// Directories skipped by default during the document walk.
///
/// - `.git` - Git metadata
/// - `node_modules` - Node.js dependencies of the site generator
pub const DEFAULT_IGNORED_DIRS: &[&str] = &[".git", "node_modules"];
