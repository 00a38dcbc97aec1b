//! Last-modified timestamps from version control.
//!
//! [`HistoryResolver`] is the seam between the date job and the outside
//! world. [`GitHistory`] answers it by running
//! `git log -1 --format=%aI -- <file>` once per document; tests plug in
//! [`StaticHistory`] instead.

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};

use crate::constants::DEFAULT_GIT_PROGRAM;
use crate::errors::{DocfixError, Result};
use crate::types::Timestamp;

/// Answers "when was this path last changed?".
pub trait HistoryResolver {
    /// Author timestamp of the most recent commit touching `path`.
    ///
    /// Returns `None` when the path has no recorded history or the history
    /// is unavailable. Callers skip the document; they never substitute a
    /// default timestamp.
    fn resolve_timestamp(&self, path: &Path) -> Option<Timestamp>;
}

impl<T: HistoryResolver + ?Sized> HistoryResolver for &T {
    fn resolve_timestamp(&self, path: &Path) -> Option<Timestamp> {
        (**self).resolve_timestamp(path)
    }
}

// ============================================================================
// GitHistory
// ============================================================================

/// History resolver backed by the `git` command line.
#[derive(Debug, Clone)]
pub struct GitHistory {
    program: String,
}

impl Default for GitHistory {
    fn default() -> Self {
        Self::new(DEFAULT_GIT_PROGRAM)
    }
}

impl GitHistory {
    /// Create a resolver invoking `program` (usually `git`).
    pub fn new(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
        }
    }

    /// The program this resolver runs.
    pub fn program(&self) -> &str {
        &self.program
    }

    /// Check that the program can be executed at all.
    ///
    /// # Errors
    ///
    /// Returns [`DocfixError::ToolUnavailable`] if `git --version` cannot be
    /// spawned or exits unsuccessfully.
    pub fn probe(&self) -> Result<String> {
        let output = Command::new(&self.program)
            .arg("--version")
            .stdin(Stdio::null())
            .output()
            .map_err(|e| DocfixError::ToolUnavailable {
                tool: self.program.clone(),
                reason: e.to_string(),
            })?;

        if !output.status.success() {
            return Err(DocfixError::ToolUnavailable {
                tool: self.program.clone(),
                reason: format!("`{} --version` exited with {}", self.program, output.status),
            });
        }

        let version = String::from_utf8_lossy(&output.stdout).trim().to_string();
        tracing::debug!("Using {}", version);
        Ok(version)
    }
}

impl HistoryResolver for GitHistory {
    fn resolve_timestamp(&self, path: &Path) -> Option<Timestamp> {
        // Run inside the file's directory so git finds the enclosing repository.
        let dir = path.parent().filter(|p| !p.as_os_str().is_empty()).unwrap_or(Path::new("."));
        let name = path.file_name()?;

        let output = match Command::new(&self.program)
            .args(["log", "-1", "--format=%aI", "--"])
            .arg(name)
            .current_dir(dir)
            .stdin(Stdio::null())
            .output()
        {
            Ok(output) => output,
            Err(e) => {
                tracing::warn!("Could not run {} for {}: {}", self.program, path.display(), e);
                return None;
            }
        };

        if !output.status.success() {
            tracing::debug!(
                "{} log failed for {} ({}): {}",
                self.program,
                path.display(),
                output.status,
                String::from_utf8_lossy(&output.stderr).trim()
            );
            return None;
        }

        let stdout = String::from_utf8_lossy(&output.stdout);
        let raw = stdout.trim();
        if raw.is_empty() {
            return None;
        }

        match raw.parse::<Timestamp>() {
            Ok(ts) => Some(ts),
            Err(e) => {
                tracing::warn!("Unparsable timestamp `{}` for {}: {}", raw, path.display(), e);
                None
            }
        }
    }
}

// ============================================================================
// StaticHistory
// ============================================================================

/// Resolver answering from a fixed map; paths not in the map have no history.
#[derive(Debug, Clone, Default)]
pub struct StaticHistory {
    entries: HashMap<PathBuf, Timestamp>,
}

impl StaticHistory {
    /// Create an empty resolver.
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a timestamp for `path`.
    pub fn with(mut self, path: impl Into<PathBuf>, timestamp: Timestamp) -> Self {
        self.entries.insert(path.into(), timestamp);
        self
    }
}

impl HistoryResolver for StaticHistory {
    fn resolve_timestamp(&self, path: &Path) -> Option<Timestamp> {
        self.entries.get(path).copied()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn git_available() -> bool {
        GitHistory::default().probe().is_ok()
    }

    #[test]
    fn test_static_history_lookup() {
        let ts: Timestamp = "2024-01-02T03:04:05+00:00".parse().unwrap();
        let history = StaticHistory::new().with("docs/a.md", ts);

        assert_eq!(history.resolve_timestamp(Path::new("docs/a.md")), Some(ts));
        assert_eq!(history.resolve_timestamp(Path::new("docs/b.md")), None);
    }

    #[test]
    fn test_probe_missing_program() {
        let history = GitHistory::new("docfix-definitely-not-a-real-program");
        let err = history.probe().unwrap_err();
        assert!(matches!(err, DocfixError::ToolUnavailable { .. }));
    }

    #[test]
    fn test_missing_program_yields_no_history() {
        let temp = TempDir::new().unwrap();
        let file = temp.path().join("a.md");
        std::fs::write(&file, "# a\n").unwrap();

        let history = GitHistory::new("docfix-definitely-not-a-real-program");
        assert_eq!(history.resolve_timestamp(&file), None);
    }

    #[test]
    fn test_untracked_file_has_no_history() {
        if !git_available() {
            return;
        }
        let temp = TempDir::new().unwrap();
        let file = temp.path().join("a.md");
        std::fs::write(&file, "# a\n").unwrap();

        // Not a repository at all: git exits non-zero.
        assert_eq!(GitHistory::default().resolve_timestamp(&file), None);
    }

    #[test]
    fn test_committed_file_has_history() {
        if !git_available() {
            return;
        }
        let temp = TempDir::new().unwrap();
        let root = temp.path();
        let git = |args: &[&str]| {
            Command::new("git")
                .args(args)
                .current_dir(root)
                .env("GIT_AUTHOR_DATE", "2024-01-02T03:04:05+00:00")
                .env("GIT_COMMITTER_DATE", "2024-01-02T03:04:05+00:00")
                .output()
                .unwrap()
        };

        assert!(git(&["init", "-q"]).status.success());
        std::fs::create_dir_all(root.join("guide")).unwrap();
        std::fs::write(root.join("guide/intro.md"), "# intro\n").unwrap();
        std::fs::write(root.join("untracked.md"), "# new\n").unwrap();
        assert!(git(&["add", "guide/intro.md"]).status.success());
        let commit = git(&[
            "-c",
            "user.name=docfix",
            "-c",
            "user.email=docfix@example.com",
            "-c",
            "commit.gpgsign=false",
            "commit",
            "-q",
            "-m",
            "add intro",
        ]);
        assert!(commit.status.success());

        let history = GitHistory::default();
        let ts = history.resolve_timestamp(&root.join("guide/intro.md")).unwrap();
        assert_eq!(ts.to_string(), "2024-01-02T03:04:05+00:00");
        assert_eq!(history.resolve_timestamp(&root.join("untracked.md")), None);
    }
}
