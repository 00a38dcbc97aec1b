//! Document discovery.
//!
//! Walks a docs root and collects every regular file with the target
//! extension. Symbolic links are never followed, so a link cycle cannot keep
//! the walk alive. Each call re-walks the tree.

use std::path::{Path, PathBuf};

use ignore::WalkBuilder;

use crate::constants::{DEFAULT_EXTENSION, DEFAULT_IGNORED_DIRS};
use crate::errors::{DocfixError, Result};

/// Options controlling [`scan`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScanOptions {
    /// Extension to match, without the dot. Compared exactly.
    pub extension: String,
    /// Directory names pruned from the walk.
    pub ignore_dirs: Vec<String>,
    /// Apply `.gitignore`, `.ignore` and global git excludes.
    pub respect_gitignore: bool,
    /// Maximum depth; `1` means only files directly inside the root.
    pub max_depth: Option<usize>,
}

impl Default for ScanOptions {
    fn default() -> Self {
        Self {
            extension: DEFAULT_EXTENSION.to_string(),
            ignore_dirs: DEFAULT_IGNORED_DIRS.iter().map(|d| d.to_string()).collect(),
            respect_gitignore: false,
            max_depth: None,
        }
    }
}

impl ScanOptions {
    /// Options matching a different extension, other settings default.
    pub fn for_extension(extension: impl Into<String>) -> Self {
        Self {
            extension: extension.into(),
            ..Self::default()
        }
    }
}

/// Recursively collect the documents under `root`.
///
/// Paths are returned in walk order, sorted by file name within each
/// directory. Unreadable entries are logged and skipped.
///
/// # Errors
///
/// Returns [`DocfixError::PathNotFound`] if `root` does not exist or is not a
/// directory.
pub fn scan(root: &Path, options: &ScanOptions) -> Result<Vec<PathBuf>> {
    if !root.is_dir() {
        return Err(DocfixError::PathNotFound(root.display().to_string()));
    }

    let ignore_dirs = options.ignore_dirs.clone();
    let walker = WalkBuilder::new(root)
        .hidden(false)
        .ignore(options.respect_gitignore)
        .parents(options.respect_gitignore)
        .git_ignore(options.respect_gitignore)
        .git_global(options.respect_gitignore)
        .git_exclude(options.respect_gitignore)
        .require_git(false)
        .follow_links(false)
        .max_depth(options.max_depth)
        .sort_by_file_name(|a, b| a.cmp(b))
        .filter_entry(move |entry| {
            if entry.depth() == 0 {
                return true;
            }
            let is_dir = entry.file_type().is_some_and(|ft| ft.is_dir());
            let name = entry.file_name().to_string_lossy();
            !(is_dir && ignore_dirs.iter().any(|d| d.as_str() == name))
        })
        .build();

    let mut files = Vec::new();
    for result in walker {
        let entry = match result {
            Ok(entry) => entry,
            Err(e) => {
                tracing::warn!("Skipping unreadable entry: {}", e);
                continue;
            }
        };

        if !entry.file_type().is_some_and(|ft| ft.is_file()) {
            continue;
        }

        let path = entry.path();
        if path.extension().and_then(|e| e.to_str()) == Some(options.extension.as_str()) {
            files.push(path.to_path_buf());
        }
    }

    tracing::debug!("Found {} .{} files under {}", files.len(), options.extension, root.display());
    Ok(files)
}
