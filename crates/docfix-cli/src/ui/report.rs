//! Rendering of job results.

use docfix_core::{FileOutcome, FileReport, JobReport};

use super::style::{MessageType, Style};

/// Message type used for a document outcome.
pub fn outcome_type(outcome: &FileOutcome) -> MessageType {
    match outcome {
        FileOutcome::HeaderCreated { .. }
        | FileOutcome::HeaderAugmented { .. }
        | FileOutcome::Normalized { .. } => MessageType::Ok,
        FileOutcome::NoHistory => MessageType::Warn,
        FileOutcome::AlreadyDated | FileOutcome::Unchanged => MessageType::Skip,
        FileOutcome::Failed { .. } => MessageType::Err,
    }
}

/// One line describing what happened to a document.
pub fn file_line(style: &Style, file: &FileReport, dry_run: bool) -> String {
    let path = style.file_path(&file.path.display().to_string());
    let verb = |done: &str, pending: &str| if dry_run { pending.to_string() } else { done.to_string() };

    let detail = match &file.outcome {
        FileOutcome::HeaderCreated { date } => format!(
            "{} front matter with date {}",
            verb("created", "would create"),
            style.timestamp(&date.to_string())
        ),
        FileOutcome::HeaderAugmented { date } => format!(
            "{} date {}",
            verb("added", "would add"),
            style.timestamp(&date.to_string())
        ),
        FileOutcome::AlreadyDated => "already dated".to_string(),
        FileOutcome::NoHistory => "no commit history, skipped".to_string(),
        FileOutcome::Normalized { fences } => format!(
            "{} spacing after {} fence opener(s)",
            verb("fixed", "would fix"),
            fences
        ),
        FileOutcome::Unchanged => "unchanged".to_string(),
        FileOutcome::Failed { stage, message } => {
            let line = style.message(MessageType::Err, &format!("{} ({} failed)", path, stage));
            return format!("{}\n{}", line, style.message_detail("Cause", message));
        }
    };

    style.message(outcome_type(&file.outcome), &format!("{} {}", path, detail))
}

/// Closing summary for a job.
pub fn summary_line(style: &Style, report: &JobReport) -> String {
    let changed = if report.dry_run {
        format!("{} would change", report.changed())
    } else {
        format!("{} updated", report.written())
    };
    let text = format!(
        "{}: {} document(s), {}, {} skipped, {} failed",
        report.job,
        report.files.len(),
        changed,
        report.skipped(),
        report.failed()
    );
    let msg_type = if report.failed() > 0 {
        MessageType::Warn
    } else {
        MessageType::Info
    };
    style.message(msg_type, &text)
}
