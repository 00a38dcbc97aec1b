//! Project configuration for docfix.
//!
//! The configuration lives in `docfix.yaml` at the project root (or any path
//! passed explicitly). Every key is optional; a missing file means defaults.
//!
//! # Example YAML
//!
//! ```yaml
//! docsRoot: docs/src
//! extension: md
//! ignoreDirs: [.git, node_modules]
//! respectGitignore: false
//! dateField: date
//! gitProgram: git
//! fences:
//!   files:
//!     - docs/src/javascript/closures.md
//!     - docs/src/vue/reactivity.md
//! ```

use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::constants::{
    DEFAULT_DATE_FIELD, DEFAULT_EXTENSION, DEFAULT_GIT_PROGRAM, DEFAULT_IGNORED_DIRS,
    PROJECT_CONFIG_FILENAME,
};
use crate::errors::{DocfixError, Result};
use crate::scan::ScanOptions;

// ============================================================================
// ProjectConfig
// ============================================================================

/// Project-level configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectConfig {
    /// Directory scanned for documents, relative to the project root.
    #[serde(default = "default_docs_root")]
    pub docs_root: PathBuf,

    /// Extension (without the dot) of the documents to process.
    #[serde(default = "default_extension")]
    pub extension: String,

    /// Directory names pruned from the walk.
    #[serde(default = "default_ignore_dirs")]
    pub ignore_dirs: Vec<String>,

    /// Whether `.gitignore` rules apply to the walk.
    #[serde(default)]
    pub respect_gitignore: bool,

    /// Maximum walk depth below the docs root (unbounded when absent).
    #[serde(default)]
    pub max_depth: Option<usize>,

    /// Front matter key that receives the last-modified timestamp.
    #[serde(default = "default_date_field")]
    pub date_field: String,

    /// Program used for history queries.
    #[serde(default = "default_git_program")]
    pub git_program: String,

    /// Code fence normalization settings.
    #[serde(default)]
    pub fences: FencesSection,
}

/// Settings of the fence job.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FencesSection {
    /// Documents to normalize, relative to the project root.
    ///
    /// When empty, the fence job falls back to scanning the docs root.
    #[serde(default)]
    pub files: Vec<PathBuf>,
}

fn default_docs_root() -> PathBuf {
    PathBuf::from(".")
}
fn default_extension() -> String {
    DEFAULT_EXTENSION.to_string()
}
fn default_ignore_dirs() -> Vec<String> {
    DEFAULT_IGNORED_DIRS.iter().map(|d| d.to_string()).collect()
}
fn default_date_field() -> String {
    DEFAULT_DATE_FIELD.to_string()
}
fn default_git_program() -> String {
    DEFAULT_GIT_PROGRAM.to_string()
}

impl Default for ProjectConfig {
    fn default() -> Self {
        Self {
            docs_root: default_docs_root(),
            extension: default_extension(),
            ignore_dirs: default_ignore_dirs(),
            respect_gitignore: false,
            max_depth: None,
            date_field: default_date_field(),
            git_program: default_git_program(),
            fences: FencesSection::default(),
        }
    }
}

impl ProjectConfig {
    /// Load `docfix.yaml` from a project root.
    ///
    /// Returns defaults when the file does not exist.
    pub fn load_from_root(project_root: &Path) -> Result<Self> {
        Self::from_path(&Self::config_path_for_root(project_root))
    }

    /// Load the configuration from a specific path.
    ///
    /// If the file does not exist, returns a default configuration.
    ///
    /// # Errors
    ///
    /// Returns [`DocfixError::InvalidConfig`] if the file exists but cannot be
    /// read or parsed, and [`DocfixError::InvalidConfiguration`] if a value
    /// fails validation.
    pub fn from_path(path: &Path) -> Result<Self> {
        if !path.exists() {
            tracing::debug!("Config not found at {}, using defaults", path.display());
            return Ok(Self::default());
        }

        let content = fs::read_to_string(path).map_err(|e| {
            DocfixError::InvalidConfig(format!("Failed to read {}: {}", path.display(), e))
        })?;

        // An empty file is a valid "all defaults" config.
        if content.trim().is_empty() {
            return Ok(Self::default());
        }

        let config: Self = serde_yaml::from_str(&content).map_err(|e| {
            DocfixError::InvalidConfig(format!("Failed to parse {}: {}", path.display(), e))
        })?;

        for warning in config.validate()? {
            tracing::warn!("{}", warning);
        }

        Ok(config)
    }

    /// Path of the config file for a project root.
    pub fn config_path_for_root(project_root: &Path) -> PathBuf {
        project_root.join(PROJECT_CONFIG_FILENAME)
    }

    /// Validate the configuration.
    ///
    /// Returns a list of warnings for non-fatal issues.
    ///
    /// # Errors
    ///
    /// Returns [`DocfixError::InvalidConfiguration`] for values the jobs
    /// cannot work with.
    pub fn validate(&self) -> Result<Vec<String>> {
        let mut warnings = Vec::new();

        if self.extension.is_empty() {
            return Err(DocfixError::InvalidConfiguration {
                message: "extension cannot be empty".to_string(),
                hint: "Set extension to the document extension, e.g. `md`".to_string(),
            });
        }
        if self.extension.starts_with('.') {
            return Err(DocfixError::InvalidConfiguration {
                message: format!("extension `{}` must not start with a dot", self.extension),
                hint: format!("Use `{}` instead", self.extension.trim_start_matches('.')),
            });
        }

        let field = self.date_field.as_str();
        if field.is_empty() || field.contains(':') || field.chars().any(char::is_whitespace) {
            return Err(DocfixError::InvalidConfiguration {
                message: format!("dateField `{}` is not a valid front matter key", field),
                hint: "Use a plain key such as `date` or `lastUpdated`".to_string(),
            });
        }

        if self.git_program.trim().is_empty() {
            return Err(DocfixError::InvalidConfiguration {
                message: "gitProgram cannot be empty".to_string(),
                hint: "Remove the key to use `git` from PATH".to_string(),
            });
        }

        if self.max_depth == Some(0) {
            warnings.push(
                "maxDepth=0 only visits the docs root itself; no documents will be found"
                    .to_string(),
            );
        }

        let mut seen = HashSet::new();
        for file in &self.fences.files {
            if file.is_absolute() {
                warnings.push(format!(
                    "fences.files entry `{}` is absolute; entries are normally relative to the project root",
                    file.display()
                ));
            }
            if !seen.insert(file) {
                warnings.push(format!(
                    "fences.files lists `{}` more than once; it will be processed once",
                    file.display()
                ));
            }
        }

        Ok(warnings)
    }

    /// Scanner options derived from this configuration.
    pub fn scan_options(&self) -> ScanOptions {
        ScanOptions {
            extension: self.extension.clone(),
            ignore_dirs: self.ignore_dirs.clone(),
            respect_gitignore: self.respect_gitignore,
            max_depth: self.max_depth,
        }
    }
}

// ============================================================================
// Tests
// ============================================================================
