//! One pass over a directory: scan, classify, confirm, replace, report.
//!
//! Side-effects:
//! - Emits `scan` facts (one per unreadable subtree plus a totals fact), a
//!   `classify` fact per symlink entry, `replace.attempt`/`replace.result` per
//!   eligible link, and exactly one `run.summary`.
//! - Blocks on the confirmer once, after scanning and before any mutation,
//!   when the config requires confirmation and there is something to replace.
//! - Entries are replaced one at a time in scan order; a failed entry is
//!   recorded and the pass moves on.

use std::path::Path;
use std::time::Instant;

use log::Level;
use serde_json::json;

use super::errors::{exit_code_for, id_str, ApiError, ErrorId};
use super::{summary, Delinker};
use crate::fs::{replace, validate_root, ReplaceStatus, Scanner};
use crate::logging::{ts_for_mode, AuditCtx, AuditMode, AuditSink, FactsEmitter, StageLogger};
use crate::policy::{classify, Classification};
use crate::types::{
    run_id, EligibleLink, EntryError, EntryKind, Outcome, PreservedAttr, RunReport,
};

pub(crate) fn confirmation_prompt(root: &Path, eligible: usize) -> String {
    format!(
        "This will replace {eligible} Python symlink(s) in '{}' with actual files.\n\
         This operation cannot be undone. Continue? [y/N]: ",
        root.display()
    )
}

fn elapsed_ms(t0: Instant) -> u64 {
    u64::try_from(t0.elapsed().as_millis()).unwrap_or(u64::MAX)
}

pub(crate) fn run<E: FactsEmitter, A: AuditSink>(
    api: &Delinker<E, A>,
) -> Result<RunReport, ApiError> {
    let t0 = Instant::now();
    let cfg = &api.config;
    let mode = cfg.mode();
    let dry = cfg.dry_run;
    let audit_mode = AuditMode {
        dry_run: dry,
        redact: dry,
    };

    let root = match validate_root(&cfg.root) {
        Ok(r) => r,
        Err(e) => {
            let err = ApiError::InvalidRoot {
                path: cfg.root.clone(),
                reason: e.msg,
            };
            let tctx = AuditCtx::new(
                &api.facts as &dyn FactsEmitter,
                run_id(&cfg.root, mode).to_string(),
                ts_for_mode(mode),
                audit_mode,
            );
            summary::emit_aborted(&StageLogger::new(&tctx), &cfg.root, &err);
            api.audit.log(Level::Error, &err.to_string());
            return Err(err);
        }
    };

    let tctx = AuditCtx::new(
        &api.facts as &dyn FactsEmitter,
        run_id(&root, mode).to_string(),
        ts_for_mode(mode),
        audit_mode,
    );
    let slog = StageLogger::new(&tctx);
    let mut report = RunReport::new(&root, dry);
    api.audit
        .log(Level::Info, &format!("scanning {}", root.display()));

    // Scanning + classifying
    let mut eligible: Vec<EligibleLink> = Vec::new();
    let mut seen = 0usize;
    for item in Scanner::new(&root) {
        seen += 1;
        let entry = match item {
            Ok(entry) => entry,
            Err(f) => {
                slog.scan()
                    .path(f.path.display().to_string())
                    .merge(json!({
                        "error": f.reason,
                        "error_id": id_str(ErrorId::E_SCAN),
                    }))
                    .emit_failure();
                api.audit.log(
                    Level::Warn,
                    &format!("cannot read {}: {}", f.path.display(), f.reason),
                );
                report.record(&f.path, Outcome::Failed(EntryError::Scan(f.reason)));
                continue;
            }
        };
        match classify(&entry) {
            Classification::Eligible(link) => {
                slog.classify()
                    .path(entry.path.display().to_string())
                    .merge(json!({
                        "eligible": true,
                        "target": link.target.display().to_string(),
                    }))
                    .emit_success();
                eligible.push(link);
            }
            Classification::NotEligible(reason) => {
                if entry.kind == EntryKind::Symlink {
                    slog.classify()
                        .path(entry.path.display().to_string())
                        .merge(json!({
                            "eligible": false,
                            "reason": reason.to_string(),
                        }))
                        .emit_warn();
                    api.audit.log(
                        Level::Info,
                        &format!("skipping {}: {reason}", entry.path.display()),
                    );
                }
                report.record(&entry.path, Outcome::SkippedNotEligible(reason));
            }
        }
    }
    report.eligible = eligible.len();
    slog.scan()
        .path(root.display().to_string())
        .merge(json!({
            "entries": seen,
            "eligible": eligible.len(),
        }))
        .emit_success();

    // Confirmation gate
    if cfg.needs_confirmation() && !eligible.is_empty() {
        match api
            .confirmer
            .confirm(&confirmation_prompt(&root, eligible.len()))
        {
            Ok(true) => {}
            Ok(false) => {
                api.audit.log(Level::Info, "operation cancelled");
                report.cancel();
                report.duration_ms = elapsed_ms(t0);
                summary::emit(&slog, &report);
                return Ok(report);
            }
            Err(e) => {
                let err = ApiError::Prompt(e.to_string());
                summary::emit_aborted(&slog, &root, &err);
                api.audit.log(Level::Error, &err.to_string());
                return Err(err);
            }
        }
    }

    // Replacing
    for link in &eligible {
        let path = link.link.display().to_string();
        let target = link.target.display().to_string();
        slog.replace_attempt()
            .path(path.clone())
            .field("target", json!(target))
            .emit_success();
        let t_entry = Instant::now();
        let outcome = match replace(link, mode) {
            Ok(ReplaceStatus::Replaced(m)) => {
                slog.replace_result()
                    .path(path.clone())
                    .merge(json!({
                        "target": target,
                        "bytes": m.bytes,
                        "hash_alg": "sha256",
                        "after_hash": m.sha256,
                        "preserved": PreservedAttr::ALL.iter().map(PreservedAttr::as_str).collect::<Vec<_>>(),
                        "xattrs_refused": m.xattrs_refused,
                        "duration_ms": elapsed_ms(t_entry),
                    }))
                    .emit_success();
                api.audit
                    .log(Level::Info, &format!("replaced: {path} -> {target}"));
                Outcome::Replaced
            }
            Ok(ReplaceStatus::DryRun) => {
                slog.replace_result()
                    .path(path.clone())
                    .merge(json!({
                        "target": target,
                        "would_replace": true,
                    }))
                    .emit_success();
                api.audit
                    .log(Level::Info, &format!("would replace: {path} -> {target}"));
                Outcome::SkippedDryRun
            }
            Err(e) => {
                let id = ErrorId::from(&e);
                slog.replace_result()
                    .path(path.clone())
                    .merge(json!({
                        "target": target,
                        "error": e.to_string(),
                        "error_id": id_str(id),
                        "exit_code": exit_code_for(id),
                    }))
                    .emit_failure();
                api.audit
                    .log(Level::Error, &format!("error processing {path}: {e}"));
                Outcome::Failed(e)
            }
        };
        report.record_link(link, outcome);
    }

    report.duration_ms = elapsed_ms(t0);
    summary::emit(&slog, &report);
    api.audit.log(Level::Info, "run: finished");
    Ok(report)
}
