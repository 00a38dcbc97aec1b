//! docfix engine – resolves configuration into job requests.
//!
//! The [`DocfixEngine`] is the main entry point for the CLI. It owns the
//! project root and the loaded [`ProjectConfig`], and turns them into
//! [`DateJob`] / [`FenceJob`] requests.

use std::path::{Path, PathBuf};

use crate::config::ProjectConfig;
use crate::errors::Result;
use crate::history::{GitHistory, HistoryResolver};
use crate::jobs::{run_date_job, run_fence_job, DateJob, FenceJob};
use crate::scan::scan;
use crate::types::{FileReport, JobOptions, JobReport};

/// Engine bound to one project.
#[derive(Debug, Clone)]
pub struct DocfixEngine {
    project_root: PathBuf,
    config: ProjectConfig,
}

impl DocfixEngine {
    // -------------------------------------------------------------------------
    // Construction
    // -------------------------------------------------------------------------

    /// Create an engine from an already loaded configuration.
    pub fn from_config(project_root: &Path, config: ProjectConfig) -> Self {
        Self {
            project_root: project_root.to_path_buf(),
            config,
        }
    }

    /// Create an engine using `docfix.yaml` from the project root, or
    /// defaults when there is none.
    ///
    /// # Errors
    ///
    /// Returns an error if the config file exists but is invalid.
    pub fn open(project_root: &Path) -> Result<Self> {
        let config = ProjectConfig::load_from_root(project_root)?;
        Ok(Self::from_config(project_root, config))
    }

    /// Create an engine with configuration from a specific path.
    ///
    /// # Errors
    ///
    /// Returns an error if the file exists but cannot be read or parsed.
    pub fn with_config(project_root: &Path, config_path: &Path) -> Result<Self> {
        let config = ProjectConfig::from_path(config_path)?;
        Ok(Self::from_config(project_root, config))
    }

    /// Get a reference to the configuration.
    pub fn config(&self) -> &ProjectConfig {
        &self.config
    }

    /// Override the docs root (relative paths resolve against the project root).
    pub fn set_docs_root(&mut self, docs_root: PathBuf) {
        self.config.docs_root = docs_root;
    }

    /// Override the document extension.
    pub fn set_extension(&mut self, extension: String) {
        self.config.extension = extension;
    }

    /// Override the version control program.
    pub fn set_git_program(&mut self, program: String) {
        self.config.git_program = program;
    }

    /// The project root.
    pub fn project_root(&self) -> &Path {
        &self.project_root
    }

    /// The directory scanned for documents.
    pub fn docs_root(&self) -> PathBuf {
        self.project_root.join(&self.config.docs_root)
    }

    // -------------------------------------------------------------------------
    // History
    // -------------------------------------------------------------------------

    /// A git-backed resolver, after checking that git can be run.
    ///
    /// # Errors
    ///
    /// Returns [`crate::DocfixError::ToolUnavailable`] if the configured
    /// program cannot be executed.
    pub fn git_history(&self) -> Result<GitHistory> {
        let history = GitHistory::new(self.config.git_program.clone());
        history.probe()?;
        Ok(history)
    }

    // -------------------------------------------------------------------------
    // Jobs
    // -------------------------------------------------------------------------

    /// Request for the date job under the current configuration.
    pub fn date_job(&self, options: &JobOptions) -> DateJob {
        DateJob {
            project_root: self.project_root.clone(),
            docs_root: self.docs_root(),
            scan: self.config.scan_options(),
            date_field: self.config.date_field.clone(),
            options: options.clone(),
        }
    }

    /// Stamp every document under the docs root.
    ///
    /// # Errors
    ///
    /// Returns an error if the docs root does not exist.
    pub fn stamp_dates<R, F>(&self, resolver: &R, options: &JobOptions, on_file: F) -> Result<JobReport>
    where
        R: HistoryResolver + ?Sized,
        F: FnMut(&FileReport),
    {
        run_date_job(&self.date_job(options), resolver, on_file)
    }

    /// Files the fence job should process.
    ///
    /// Explicit `files` win, then `fences.files` from the config; both are
    /// resolved against the project root. With neither, the docs root is
    /// scanned.
    ///
    /// # Errors
    ///
    /// Returns an error if a scan is needed and the docs root does not exist.
    pub fn fence_targets(&self, files: &[PathBuf]) -> Result<Vec<PathBuf>> {
        let listed: &[PathBuf] = if files.is_empty() {
            &self.config.fences.files
        } else {
            files
        };

        if listed.is_empty() {
            return scan(&self.docs_root(), &self.config.scan_options());
        }

        Ok(listed.iter().map(|f| self.project_root.join(f)).collect())
    }

    /// Normalize fence spacing in `files` (or the configured/scanned set).
    ///
    /// # Errors
    ///
    /// Returns an error if a scan is needed and the docs root does not exist.
    pub fn fix_fences<F>(&self, files: &[PathBuf], options: &JobOptions, on_file: F) -> Result<JobReport>
    where
        F: FnMut(&FileReport),
    {
        let job = FenceJob {
            project_root: self.project_root.clone(),
            files: self.fence_targets(files)?,
            options: options.clone(),
        };
        Ok(run_fence_job(&job, on_file))
    }
}
