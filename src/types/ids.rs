//! Deterministic UUIDv5 identifiers for runs.
//!
//! The UUID namespace is derived from a stable tag (`NS_TAG`) so that two passes
//! over the same root in the same mode share a `run_id`, which keeps dry-run
//! facts comparable across invocations.
use std::path::Path;
use uuid::Uuid;

use super::config::ApplyMode;
use crate::constants::NS_TAG;

fn namespace() -> Uuid {
    Uuid::new_v5(&Uuid::NAMESPACE_URL, NS_TAG.as_bytes())
}

#[must_use]
pub fn run_id(root: &Path, mode: ApplyMode) -> Uuid {
    let tag = match mode {
        ApplyMode::DryRun => "dry",
        ApplyMode::Commit => "commit",
    };
    let s = format!("{tag}:{}", root.display());
    Uuid::new_v5(&namespace(), s.as_bytes())
}
