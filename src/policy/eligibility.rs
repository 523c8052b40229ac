//! Which entries qualify for replacement.
//!
//! An entry is eligible when it is a symlink whose fully resolved target exists,
//! is a regular file, and has a file name ending in one of `SOURCE_SUFFIXES`.
//! Classification only reads metadata and always returns a decision.
use std::io::ErrorKind;
use std::os::unix::ffi::OsStrExt as _;
use std::path::Path;

use crate::constants::SOURCE_SUFFIXES;
use crate::fs::meta::resolve_symlink_target;
use crate::types::{EligibleLink, EntryKind, FsEntry, SkipReason};

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Classification {
    Eligible(EligibleLink),
    NotEligible(SkipReason),
}

/// Case-sensitive exact suffix match on the file name of `path`.
#[must_use]
pub fn has_source_suffix(path: &Path) -> bool {
    path.file_name().is_some_and(|name| {
        SOURCE_SUFFIXES
            .iter()
            .any(|sfx| name.as_bytes().ends_with(sfx.as_bytes()))
    })
}

#[must_use]
pub fn classify(entry: &FsEntry) -> Classification {
    if entry.kind != EntryKind::Symlink {
        return Classification::NotEligible(SkipReason::NotSymlink);
    }
    let joined = match resolve_symlink_target(&entry.path) {
        Ok(p) => p,
        Err(e) => return Classification::NotEligible(SkipReason::UnreadableLink(e.to_string())),
    };
    let target = match std::fs::canonicalize(&joined) {
        Ok(t) => t,
        Err(e) if e.kind() == ErrorKind::NotFound => {
            return Classification::NotEligible(SkipReason::TargetMissing)
        }
        Err(e) => return Classification::NotEligible(SkipReason::UnreadableLink(e.to_string())),
    };
    match std::fs::metadata(&target) {
        Ok(md) if md.is_file() => {}
        Ok(_) => return Classification::NotEligible(SkipReason::TargetNotFile),
        Err(_) => return Classification::NotEligible(SkipReason::TargetMissing),
    }
    if !has_source_suffix(&target) {
        return Classification::NotEligible(SkipReason::UnrecognizedSuffix);
    }
    Classification::Eligible(EligibleLink {
        link: entry.path.clone(),
        target,
    })
}
