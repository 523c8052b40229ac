//! Final reporting: the `run.summary` fact and the human-readable report.
use std::fmt::Write as _;
use std::path::Path;

use serde_json::json;

use super::errors::{exit_code_for, id_str, ApiError};
use crate::logging::StageLogger;
use crate::types::{RunReport, RunStatus};

pub(crate) fn emit(slog: &StageLogger<'_>, report: &RunReport) {
    let mut fields = json!({
        "status": report.status,
        "entries_processed": report.entries_processed,
        "eligible": report.eligible,
        "replaced": report.replaced,
        "skipped_dry_run": report.skipped_dry_run,
        "skipped_not_eligible": report.skipped_not_eligible,
        "skipped_by_reason": report.skipped_by_reason,
        "skipped_detail": report.skipped_detail,
        "failed": report.failed,
        "duration_ms": report.duration_ms,
    });
    if let (Some(obj), Some(first)) = (fields.as_object_mut(), report.failures.first()) {
        obj.insert("error_id".into(), json!(first.error_id));
        obj.insert("exit_code".into(), json!(report.exit_code()));
    }
    let ev = slog
        .run_summary()
        .path(report.root.display().to_string())
        .merge(fields);
    match report.status {
        _ if !report.is_clean() => ev.emit_failure(),
        RunStatus::Cancelled => ev.emit_warn(),
        _ => ev.emit_success(),
    }
}

pub(crate) fn emit_aborted(slog: &StageLogger<'_>, root: &Path, err: &ApiError) {
    let id = err.error_id();
    slog.run_summary()
        .path(root.display().to_string())
        .merge(json!({
            "status": RunStatus::Aborted,
            "entries_processed": 0,
            "error": err.to_string(),
            "error_id": id_str(id),
            "exit_code": exit_code_for(id),
        }))
        .emit_failure();
}

/// Render `report` as the text printed on standard output: one line per
/// replaced (or would-be replaced) link and per failure, then a summary block.
#[must_use]
pub fn render_text(report: &RunReport) -> String {
    let mut out = String::new();
    for l in &report.links {
        let verb = if l.dry_run { "Would replace" } else { "Replaced" };
        let _ = writeln!(out, "{verb}: {} -> {}", l.link.display(), l.target.display());
    }
    for f in &report.failures {
        let _ = writeln!(out, "Error processing {}: {}", f.path.display(), f.reason);
    }
    match report.status {
        RunStatus::Cancelled => out.push_str("Operation cancelled.\n"),
        RunStatus::Aborted => {
            let reason = report.abort_reason.as_deref().unwrap_or("unknown error");
            let _ = writeln!(out, "Error: {reason}");
        }
        RunStatus::Done => {}
    }

    out.push_str("\nSummary:\n");
    let _ = writeln!(out, "  Entries processed: {}", report.entries_processed);
    if report.dry_run {
        let _ = writeln!(out, "  Symlinks would be replaced: {}", report.skipped_dry_run);
    } else {
        let _ = writeln!(out, "  Symlinks replaced: {}", report.replaced);
    }
    if report.status == RunStatus::Cancelled {
        let _ = writeln!(out, "  Eligible symlinks left in place: {}", report.eligible);
    }
    let _ = writeln!(out, "  Skipped (not eligible): {}", report.skipped_not_eligible);
    for (reason, count) in &report.skipped_by_reason {
        let _ = writeln!(out, "    {reason}: {count}");
    }
    for s in &report.skipped_detail {
        let _ = writeln!(out, "    {}: {}", s.path.display(), s.reason);
    }
    let _ = writeln!(out, "  Failed: {}", report.failed);
    for f in &report.failures {
        let _ = writeln!(out, "    {}: {}", f.path.display(), f.reason);
    }
    out
}
