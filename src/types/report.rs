use std::collections::BTreeMap;
use std::fmt;
use std::path::{Path, PathBuf};

use serde::{Serialize, Serializer};

use super::entry::EligibleLink;
use super::errors::EntryError;
use crate::constants::{EXIT_OK, EXIT_PARTIAL};

/// Serialize a path as text, replacing bytes that are not valid UTF-8 with
/// U+FFFD so a report can always be rendered as JSON.
pub(crate) fn lossy_path<P: AsRef<Path>, S: Serializer>(
    path: &P,
    s: S,
) -> Result<S::Ok, S::Error> {
    s.serialize_str(&path.as_ref().to_string_lossy())
}

/// Why an entry was left alone by the classifier.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum SkipReason {
    NotSymlink,
    TargetMissing,
    TargetNotFile,
    UnrecognizedSuffix,
    UnreadableLink(String),
}

impl SkipReason {
    /// Stable label used to bucket skip counts in reports.
    #[must_use]
    pub const fn label(&self) -> &'static str {
        match self {
            SkipReason::NotSymlink => "not a symlink",
            SkipReason::TargetMissing => "target missing",
            SkipReason::TargetNotFile => "target not a regular file",
            SkipReason::UnrecognizedSuffix => "unrecognized suffix",
            SkipReason::UnreadableLink(_) => "unreadable link",
        }
    }
}

impl fmt::Display for SkipReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SkipReason::UnreadableLink(detail) => write!(f, "{}: {detail}", self.label()),
            other => f.write_str(other.label()),
        }
    }
}

/// Per-entry outcome of a pass.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Outcome {
    Replaced,
    SkippedNotEligible(SkipReason),
    SkippedDryRun,
    Failed(EntryError),
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum RunStatus {
    Done,
    Cancelled,
    Aborted,
}

/// A link that was replaced, or would have been in a dry run.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct LinkRecord {
    #[serde(serialize_with = "lossy_path")]
    pub link: PathBuf,
    #[serde(serialize_with = "lossy_path")]
    pub target: PathBuf,
    pub dry_run: bool,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct FailureRecord {
    #[serde(serialize_with = "lossy_path")]
    pub path: PathBuf,
    pub error_id: &'static str,
    pub reason: String,
}

/// A skipped entry whose reason carries detail beyond its bucket label.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct SkipRecord {
    #[serde(serialize_with = "lossy_path")]
    pub path: PathBuf,
    pub reason: String,
}

/// Aggregated outcome of one pass over a directory.
///
/// Created empty, appended to while entries are processed, and handed back to
/// the caller only once the pass is over.
#[derive(Clone, Debug, Serialize)]
pub struct RunReport {
    #[serde(serialize_with = "lossy_path")]
    pub root: PathBuf,
    pub dry_run: bool,
    pub status: RunStatus,
    pub entries_processed: usize,
    pub eligible: usize,
    pub replaced: usize,
    pub skipped_dry_run: usize,
    pub skipped_not_eligible: usize,
    pub skipped_by_reason: BTreeMap<&'static str, usize>,
    pub skipped_detail: Vec<SkipRecord>,
    pub failed: usize,
    pub links: Vec<LinkRecord>,
    pub failures: Vec<FailureRecord>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub abort_reason: Option<String>,
    pub duration_ms: u64,
}

impl RunReport {
    pub fn new(root: &Path, dry_run: bool) -> Self {
        Self {
            root: root.to_path_buf(),
            dry_run,
            status: RunStatus::Done,
            entries_processed: 0,
            eligible: 0,
            replaced: 0,
            skipped_dry_run: 0,
            skipped_not_eligible: 0,
            skipped_by_reason: BTreeMap::new(),
            skipped_detail: Vec::new(),
            failed: 0,
            links: Vec::new(),
            failures: Vec::new(),
            abort_reason: None,
            duration_ms: 0,
        }
    }

    /// Report for a pass that stopped before any entry was processed.
    pub fn aborted(root: &Path, dry_run: bool, reason: impl Into<String>) -> Self {
        let mut report = Self::new(root, dry_run);
        report.status = RunStatus::Aborted;
        report.abort_reason = Some(reason.into());
        report
    }

    /// Record the outcome of an entry that never reached the replacer.
    pub fn record(&mut self, path: &Path, outcome: Outcome) {
        self.entries_processed += 1;
        match outcome {
            Outcome::Replaced => self.replaced += 1,
            Outcome::SkippedDryRun => self.skipped_dry_run += 1,
            Outcome::SkippedNotEligible(reason) => {
                self.skipped_not_eligible += 1;
                *self.skipped_by_reason.entry(reason.label()).or_insert(0) += 1;
                if let SkipReason::UnreadableLink(_) = reason {
                    self.skipped_detail.push(SkipRecord {
                        path: path.to_path_buf(),
                        reason: reason.to_string(),
                    });
                }
            }
            Outcome::Failed(err) => {
                self.failed += 1;
                self.failures.push(FailureRecord {
                    path: path.to_path_buf(),
                    error_id: crate::api::errors::id_str(crate::api::errors::ErrorId::from(&err)),
                    reason: err.to_string(),
                });
            }
        }
    }

    /// Record the outcome of an eligible link handed to the replacer.
    pub fn record_link(&mut self, link: &EligibleLink, outcome: Outcome) {
        if matches!(outcome, Outcome::Replaced | Outcome::SkippedDryRun) {
            self.links.push(LinkRecord {
                link: link.link.clone(),
                target: link.target.clone(),
                dry_run: matches!(outcome, Outcome::SkippedDryRun),
            });
        }
        self.record(&link.link, outcome);
    }

    /// Mark the pass as declined by the operator. Eligible links that were
    /// counted stay untouched and are not part of `entries_processed`.
    pub fn cancel(&mut self) {
        self.status = RunStatus::Cancelled;
    }

    #[must_use]
    pub fn is_clean(&self) -> bool {
        self.failed == 0
    }

    /// Exit status for a pass that reached a report. Fatal pre-flight errors
    /// map through `api::errors::exit_code_for` instead.
    #[must_use]
    pub fn exit_code(&self) -> u8 {
        if self.is_clean() {
            EXIT_OK
        } else {
            EXIT_PARTIAL
        }
    }
}
