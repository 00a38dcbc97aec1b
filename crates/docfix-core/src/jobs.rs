//! Batch jobs: date stamping and fence normalization.
//!
//! Both jobs take a list of documents and handle each one independently:
//! read, transform, compare, write only on change, report. A failure on one
//! document becomes a [`FileOutcome::Failed`] entry and the loop moves on.
//! The `on_file` callback fires as soon as a document is done so callers can
//! print progress one line per file.

use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};

use crate::errors::{DocfixError, Result};
use crate::fences::normalize_fences_with_stats;
use crate::frontmatter::{has_date_field, plan_date_merge, DateMerge};
use crate::history::HistoryResolver;
use crate::scan::{scan, ScanOptions};
use crate::types::{FailureStage, FileOutcome, FileReport, JobKind, JobOptions, JobReport};

// ============================================================================
// Requests
// ============================================================================

/// Input of [`run_date_job`].
#[derive(Debug, Clone)]
pub struct DateJob {
    /// Paths in reports are shown relative to this directory.
    pub project_root: PathBuf,
    /// Directory scanned for documents.
    pub docs_root: PathBuf,
    /// Scanner settings.
    pub scan: ScanOptions,
    /// Front matter key receiving the timestamp.
    pub date_field: String,
    /// Shared job options.
    pub options: JobOptions,
}

/// Input of [`run_fence_job`].
#[derive(Debug, Clone)]
pub struct FenceJob {
    /// Paths in reports are shown relative to this directory.
    pub project_root: PathBuf,
    /// Documents to normalize. Duplicates are processed once.
    pub files: Vec<PathBuf>,
    /// Shared job options.
    pub options: JobOptions,
}

// ============================================================================
// Date job
// ============================================================================

/// Stamp every document under the docs root with its last-modified date.
///
/// Per document:
/// 1. read it (failure: `Failed { stage: read }`)
/// 2. front matter already has the field: `AlreadyDated`, no history query
/// 3. no history: `NoHistory`, nothing written
/// 4. otherwise add the field (`HeaderAugmented`) or a whole block
///    (`HeaderCreated`) and write it back
///
/// # Errors
///
/// Returns [`DocfixError::PathNotFound`] if the docs root does not exist.
/// Per-document problems never surface as errors.
pub fn run_date_job<R, F>(job: &DateJob, resolver: &R, mut on_file: F) -> Result<JobReport>
where
    R: HistoryResolver + ?Sized,
    F: FnMut(&FileReport),
{
    let files = scan(&job.docs_root, &job.scan)?;
    tracing::info!("Found {} documents under {}", files.len(), job.docs_root.display());

    let mut report = JobReport::new(JobKind::Date, job.options.dry_run);
    for path in files {
        let (outcome, written) = stamp_document(&path, job, resolver);
        let entry = FileReport {
            path: display_path(&job.project_root, &path),
            outcome,
            written,
        };
        on_file(&entry);
        report.files.push(entry);
    }

    Ok(report)
}

fn stamp_document<R>(path: &Path, job: &DateJob, resolver: &R) -> (FileOutcome, bool)
where
    R: HistoryResolver + ?Sized,
{
    tracing::debug!("Processing {}", path.display());

    let content = match read_document(path) {
        Ok(content) => content,
        Err(e) => return (failed(FailureStage::Read, e), false),
    };

    if has_date_field(&content, &job.date_field) {
        tracing::debug!("{} already has `{}`, skipping", path.display(), job.date_field);
        return (FileOutcome::AlreadyDated, false);
    }

    let Some(timestamp) = resolver.resolve_timestamp(path) else {
        tracing::debug!("No history found for {}, skipping", path.display());
        return (FileOutcome::NoHistory, false);
    };

    let (outcome, updated) = match plan_date_merge(&content, &timestamp, &job.date_field) {
        DateMerge::AlreadyDated => return (FileOutcome::AlreadyDated, false),
        DateMerge::Augmented(updated) => (FileOutcome::HeaderAugmented { date: timestamp }, updated),
        DateMerge::Created(updated) => (FileOutcome::HeaderCreated { date: timestamp }, updated),
    };

    match write_if_changed(path, &content, &updated, job.options.dry_run) {
        Ok(written) => (outcome, written),
        Err(e) => (failed(FailureStage::Write, e), false),
    }
}

// ============================================================================
// Fence job
// ============================================================================

/// Normalize code fence spacing in every listed document.
pub fn run_fence_job<F>(job: &FenceJob, mut on_file: F) -> JobReport
where
    F: FnMut(&FileReport),
{
    let mut report = JobReport::new(JobKind::Fences, job.options.dry_run);
    let mut seen = HashSet::new();

    for path in &job.files {
        if !seen.insert(path) {
            tracing::debug!("{} listed twice, skipping repeat", path.display());
            continue;
        }

        let (outcome, written) = normalize_document(path, &job.options);
        let entry = FileReport {
            path: display_path(&job.project_root, path),
            outcome,
            written,
        };
        on_file(&entry);
        report.files.push(entry);
    }

    report
}

fn normalize_document(path: &Path, options: &JobOptions) -> (FileOutcome, bool) {
    let content = match read_document(path) {
        Ok(content) => content,
        Err(e) => return (failed(FailureStage::Read, e), false),
    };

    let (updated, stats) = normalize_fences_with_stats(&content);
    if updated == content {
        return (FileOutcome::Unchanged, false);
    }

    match write_if_changed(path, &content, &updated, options.dry_run) {
        Ok(written) => (FileOutcome::Normalized { fences: stats.adjusted }, written),
        Err(e) => (failed(FailureStage::Write, e), false),
    }
}

// ============================================================================
// Helpers
// ============================================================================

fn read_document(path: &Path) -> Result<String> {
    fs::read_to_string(path).map_err(|source| DocfixError::ReadFailure {
        path: path.to_path_buf(),
        source,
    })
}

/// Write `updated` unless it equals `original` or this is a dry run.
///
/// Returns whether the file was written.
fn write_if_changed(path: &Path, original: &str, updated: &str, dry_run: bool) -> Result<bool> {
    if updated == original {
        return Ok(false);
    }
    if dry_run {
        tracing::debug!("Dry run, not writing {}", path.display());
        return Ok(false);
    }
    fs::write(path, updated).map_err(|source| DocfixError::WriteFailure {
        path: path.to_path_buf(),
        source,
    })?;
    Ok(true)
}

fn failed(stage: FailureStage, error: DocfixError) -> FileOutcome {
    tracing::debug!("{}", error);
    FileOutcome::Failed {
        stage,
        message: error.to_string(),
    }
}

fn display_path(project_root: &Path, path: &Path) -> PathBuf {
    path.strip_prefix(project_root)
        .map(Path::to_path_buf)
        .unwrap_or_else(|_| path.to_path_buf())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::history::StaticHistory;
    use crate::types::Timestamp;
    use tempfile::TempDir;

    fn ts(s: &str) -> Timestamp {
        s.parse().unwrap()
    }

    fn write(root: &Path, rel: &str, content: &str) -> PathBuf {
        let path = root.join(rel);
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(&path, content).unwrap();
        path
    }

    fn date_job(root: &Path, dry_run: bool) -> DateJob {
        DateJob {
            project_root: root.to_path_buf(),
            docs_root: root.join("docs"),
            scan: ScanOptions::default(),
            date_field: "date".to_string(),
            options: JobOptions { dry_run },
        }
    }

    fn outcome_for<'a>(report: &'a JobReport, rel: &str) -> &'a FileOutcome {
        &report
            .files
            .iter()
            .find(|f| f.path == Path::new(rel))
            .unwrap_or_else(|| panic!("no report for {}", rel))
            .outcome
    }

    #[test]
    fn test_date_job_walks_state_machine() {
        let temp = TempDir::new().unwrap();
        let root = temp.path();
        let t = ts("2024-01-02T03:04:05+00:00");

        let bare = write(root, "docs/bare.md", "# Bare\n");
        let partial = write(root, "docs/guide/partial.md", "---\ntitle: P\n---\nbody\n");
        let dated = write(root, "docs/guide/dated.md", "---\ndate: 2020-01-01\n---\nbody\n");
        let orphan = write(root, "docs/orphan.md", "# never committed\n");

        let history = StaticHistory::new()
            .with(&bare, t)
            .with(&partial, t)
            .with(&dated, t);

        let mut seen = Vec::new();
        let report = run_date_job(&date_job(root, false), &history, |f| seen.push(f.path.clone()))
            .unwrap();

        assert_eq!(report.files.len(), 4);
        assert_eq!(seen.len(), 4);
        assert_eq!(outcome_for(&report, "docs/bare.md"), &FileOutcome::HeaderCreated { date: t });
        assert_eq!(
            outcome_for(&report, "docs/guide/partial.md"),
            &FileOutcome::HeaderAugmented { date: t }
        );
        assert_eq!(outcome_for(&report, "docs/guide/dated.md"), &FileOutcome::AlreadyDated);
        assert_eq!(outcome_for(&report, "docs/orphan.md"), &FileOutcome::NoHistory);
        assert_eq!(report.written(), 2);

        assert_eq!(
            fs::read_to_string(&bare).unwrap(),
            "---\ndate: \"2024-01-02T03:04:05+00:00\"\n---\n# Bare\n"
        );
        assert_eq!(
            fs::read_to_string(&partial).unwrap(),
            "---\ntitle: P\ndate: \"2024-01-02T03:04:05+00:00\"\n---\nbody\n"
        );
        assert_eq!(
            fs::read_to_string(&dated).unwrap(),
            "---\ndate: 2020-01-01\n---\nbody\n"
        );
        assert_eq!(fs::read_to_string(&orphan).unwrap(), "# never committed\n");
    }

    #[test]
    fn test_date_job_second_run_changes_nothing() {
        let temp = TempDir::new().unwrap();
        let root = temp.path();
        let doc = write(root, "docs/a.md", "# A\n");

        let first = StaticHistory::new().with(&doc, ts("2024-01-02T03:04:05+00:00"));
        run_date_job(&date_job(root, false), &first, |_| {}).unwrap();
        let after_first = fs::read_to_string(&doc).unwrap();

        let second = StaticHistory::new().with(&doc, ts("2030-12-31T23:59:59+02:00"));
        let report = run_date_job(&date_job(root, false), &second, |_| {}).unwrap();

        assert_eq!(report.written(), 0);
        assert_eq!(outcome_for(&report, "docs/a.md"), &FileOutcome::AlreadyDated);
        assert_eq!(fs::read_to_string(&doc).unwrap(), after_first);
    }

    #[test]
    fn test_missing_history_never_writes() {
        let temp = TempDir::new().unwrap();
        let root = temp.path();
        let doc = write(root, "docs/a.md", "# A\n");

        let report = run_date_job(&date_job(root, false), &StaticHistory::new(), |_| {}).unwrap();
        assert_eq!(report.written(), 0);
        assert_eq!(report.skipped(), 1);
        assert_eq!(fs::read_to_string(&doc).unwrap(), "# A\n");
    }

    #[test]
    fn test_date_job_dry_run() {
        let temp = TempDir::new().unwrap();
        let root = temp.path();
        let doc = write(root, "docs/a.md", "# A\n");
        let t = ts("2024-01-02T03:04:05+00:00");

        let history = StaticHistory::new().with(&doc, t);
        let report = run_date_job(&date_job(root, true), &history, |_| {}).unwrap();

        assert!(report.dry_run);
        assert_eq!(report.changed(), 1);
        assert_eq!(report.written(), 0);
        assert_eq!(fs::read_to_string(&doc).unwrap(), "# A\n");
    }

    #[test]
    fn test_date_job_isolates_read_failures() {
        let temp = TempDir::new().unwrap();
        let root = temp.path();
        let t = ts("2024-01-02T03:04:05+00:00");

        let binary = root.join("docs/broken.md");
        fs::create_dir_all(binary.parent().unwrap()).unwrap();
        fs::write(&binary, [0xff, 0xfe, 0x00, 0x80]).unwrap();
        let good = write(root, "docs/good.md", "# Good\n");

        let history = StaticHistory::new().with(&binary, t).with(&good, t);
        let report = run_date_job(&date_job(root, false), &history, |_| {}).unwrap();

        assert!(matches!(
            outcome_for(&report, "docs/broken.md"),
            FileOutcome::Failed { stage: FailureStage::Read, .. }
        ));
        assert_eq!(outcome_for(&report, "docs/good.md"), &FileOutcome::HeaderCreated { date: t });
        assert_eq!(report.failed(), 1);
    }

    #[cfg(unix)]
    #[test]
    fn test_date_job_isolates_write_failures() {
        use std::os::unix::fs::PermissionsExt;

        let temp = TempDir::new().unwrap();
        let root = temp.path();
        let t = ts("2024-01-02T03:04:05+00:00");

        let locked = write(root, "docs/a-locked.md", "# Locked
");
        let open = write(root, "docs/b-open.md", "# Open
");
        fs::set_permissions(&locked, fs::Permissions::from_mode(0o444)).unwrap();

        // Privileged users can write read-only files.
        if fs::OpenOptions::new().write(true).open(&locked).is_ok() {
            return;
        }

        let history = StaticHistory::new().with(&locked, t).with(&open, t);
        let mut order = Vec::new();
        let report =
            run_date_job(&date_job(root, false), &history, |f| order.push(f.path.clone())).unwrap();

        assert!(matches!(
            outcome_for(&report, "docs/a-locked.md"),
            FileOutcome::Failed { stage: FailureStage::Write, .. }
        ));
        assert_eq!(outcome_for(&report, "docs/b-open.md"), &FileOutcome::HeaderCreated { date: t });
        assert_eq!(order, vec![PathBuf::from("docs/a-locked.md"), PathBuf::from("docs/b-open.md")]);
        assert_eq!(report.failed(), 1);
        assert_eq!(report.written(), 1);
        assert_eq!(fs::read_to_string(&locked).unwrap(), "# Locked\n");
        assert!(fs::read_to_string(&open).unwrap().starts_with("---\ndate: "));
    }

    #[test]
    fn test_date_job_missing_docs_root() {
        let temp = TempDir::new().unwrap();
        let result = run_date_job(&date_job(temp.path(), false), &StaticHistory::new(), |_| {});
        assert!(matches!(result, Err(DocfixError::PathNotFound(_))));
    }

    #[test]
    fn test_fence_job_outcomes() {
        let temp = TempDir::new().unwrap();
        let root = temp.path();
        let tight = write(root, "docs/tight.md", "```js\nconst x = 1;\n```\n");
        let loose = write(root, "docs/loose.md", "```js\n\n\n\nconst x = 1;\n```\n");
        let fine = write(root, "docs/fine.md", "```js\n\nconst x = 1;\n```\n");
        let missing = root.join("docs/missing.md");

        let job = FenceJob {
            project_root: root.to_path_buf(),
            files: vec![tight.clone(), loose.clone(), fine.clone(), missing, tight.clone()],
            options: JobOptions::default(),
        };
        let report = run_fence_job(&job, |_| {});

        assert_eq!(report.files.len(), 4);
        assert_eq!(outcome_for(&report, "docs/tight.md"), &FileOutcome::Normalized { fences: 1 });
        assert_eq!(outcome_for(&report, "docs/loose.md"), &FileOutcome::Normalized { fences: 1 });
        assert_eq!(outcome_for(&report, "docs/fine.md"), &FileOutcome::Unchanged);
        assert!(matches!(
            outcome_for(&report, "docs/missing.md"),
            FileOutcome::Failed { stage: FailureStage::Read, .. }
        ));

        let expected = "```js\n\nconst x = 1;\n```\n";
        assert_eq!(fs::read_to_string(&tight).unwrap(), expected);
        assert_eq!(fs::read_to_string(&loose).unwrap(), expected);
        assert_eq!(fs::read_to_string(&fine).unwrap(), expected);

        let rerun = run_fence_job(&job, |_| {});
        assert_eq!(rerun.written(), 0);
    }

    #[test]
    fn test_fence_job_dry_run() {
        let temp = TempDir::new().unwrap();
        let root = temp.path();
        let tight = write(root, "a.md", "```\nx\n```\n");

        let job = FenceJob {
            project_root: root.to_path_buf(),
            files: vec![tight.clone()],
            options: JobOptions { dry_run: true },
        };
        let report = run_fence_job(&job, |_| {});

        assert_eq!(report.changed(), 1);
        assert_eq!(report.written(), 0);
        assert_eq!(fs::read_to_string(&tight).unwrap(), "```\nx\n```\n");
    }
}
