//! Shared test utilities for docfix-cli integration tests.

use std::path::Path;
use std::process::Command as StdCommand;

use assert_cmd::Command;

/// Get a Command for the docfix binary, isolated from the caller's
/// `DOCFIX_*` environment and with colors off.
///
/// # Panics
///
/// Panics if the docfix binary cannot be found. This should not happen
/// in a properly configured test environment.
#[allow(deprecated)]
pub fn docfix_cmd() -> Command {
    let mut cmd = Command::cargo_bin("docfix").expect("docfix binary should exist");
    for var in ["DOCFIX_CONFIG", "DOCFIX_GIT", "DOCFIX_VERBOSE", "DOCFIX_QUIET", "DOCFIX_COLOR"] {
        cmd.env_remove(var);
    }
    cmd.env("NO_COLOR", "1");
    cmd
}

/// Whether a usable `git` is on PATH.
#[allow(dead_code)]
pub fn git_available() -> bool {
    StdCommand::new("git")
        .arg("--version")
        .output()
        .map(|o| o.status.success())
        .unwrap_or(false)
}

/// Run git in `dir`, panicking on failure.
#[allow(dead_code)]
pub fn git(dir: &Path, args: &[&str]) {
    let status = StdCommand::new("git")
        .args([
            "-c",
            "user.name=Docfix Test",
            "-c",
            "user.email=test@example.com",
            "-c",
            "commit.gpgsign=false",
        ])
        .args(args)
        .current_dir(dir)
        .status()
        .expect("run git");
    assert!(status.success(), "git {:?} failed", args);
}

/// Initialize a repository in `dir` and commit everything in it.
#[allow(dead_code)]
pub fn commit_all(dir: &Path) {
    git(dir, &["init", "-q"]);
    git(dir, &["add", "-A"]);
    git(dir, &["commit", "-q", "-m", "docs"]);
}
