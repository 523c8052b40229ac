//! Replace an eligible symlink with a regular file holding its target's bytes.
//!
//! Commit sequence, each step re-validating what it acts on:
//! 1. open the target and capture bytes and `PreservedAttr` metadata
//! 2. open the link's parent `O_NOFOLLOW`, check the name is still a symlink, `unlinkat` it
//! 3. `openat(O_CREAT|O_EXCL)` a private file under the same name, write, fsync
//! 4. apply captured metadata to the open file, fsync the parent
//!
//! A failure at any step stops work on that entry and leaves the disk as the
//! failed step left it. Nothing is rolled back.
use std::ffi::OsStr;
use std::fs::File;
use std::io::Write as _;
use std::path::Path;

use rustix::fd::OwnedFd;
use rustix::fs::{openat, statat, unlinkat, AtFlags, FileType, Mode, OFlags};

use super::atomic::{errno_to_io, fsync_dirfd, open_parent};
use super::meta::{apply_metadata, capture_target, sha256_hex};
use crate::constants::STAGING_MODE;
use crate::types::{ApplyMode, EligibleLink, EntryError};

/// What a successful commit produced.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Materialized {
    pub bytes: u64,
    pub sha256: String,
    pub xattrs_refused: usize,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ReplaceStatus {
    Replaced(Materialized),
    DryRun,
}

/// Replace `link` according to `mode`. In `DryRun` only the target's existence
/// and type are checked.
///
/// # Errors
///
/// Returns the `EntryError` naming the step that failed.
pub fn replace(link: &EligibleLink, mode: ApplyMode) -> Result<ReplaceStatus, EntryError> {
    match mode {
        ApplyMode::DryRun => {
            check_target(&link.target)?;
            Ok(ReplaceStatus::DryRun)
        }
        ApplyMode::Commit => materialize(link).map(ReplaceStatus::Replaced),
    }
}

/// Confirm the target is still an existing regular file without reading it.
///
/// # Errors
///
/// Returns `EntryError::TargetUnreadable` otherwise.
pub fn check_target(target: &Path) -> Result<(), EntryError> {
    match std::fs::metadata(target) {
        Ok(md) if md.is_file() => Ok(()),
        Ok(_) => Err(EntryError::TargetUnreadable(
            "target is not a regular file".to_string(),
        )),
        Err(e) => Err(EntryError::TargetUnreadable(e.to_string())),
    }
}

fn materialize(link: &EligibleLink) -> Result<Materialized, EntryError> {
    let snap = capture_target(&link.target)
        .map_err(|e| EntryError::TargetUnreadable(e.to_string()))?;

    let (dirfd, name) =
        open_parent(&link.link).map_err(|e| EntryError::LinkRemovalFailed(e.to_string()))?;
    remove_link_at(&dirfd, name).map_err(|e| EntryError::LinkRemovalFailed(e.to_string()))?;

    let file = create_file_at(&dirfd, name, &snap.bytes)
        .map_err(|e| EntryError::WriteFailed(e.to_string()))?;

    let xattrs_refused = apply_metadata(&file, &snap.meta)
        .map_err(|e| EntryError::MetadataApplyFailed(e.to_string()))?;
    let _ = fsync_dirfd(&dirfd);

    Ok(Materialized {
        bytes: snap.bytes.len() as u64,
        sha256: sha256_hex(&snap.bytes),
        xattrs_refused,
    })
}

fn remove_link_at(dirfd: &OwnedFd, name: &OsStr) -> std::io::Result<()> {
    let st = statat(dirfd, name, AtFlags::SYMLINK_NOFOLLOW).map_err(errno_to_io)?;
    if FileType::from_raw_mode(st.st_mode) != FileType::Symlink {
        return Err(std::io::Error::other("entry is no longer a symlink"));
    }
    unlinkat(dirfd, name, AtFlags::empty()).map_err(errno_to_io)
}

fn create_file_at(dirfd: &OwnedFd, name: &OsStr, bytes: &[u8]) -> std::io::Result<File> {
    let fd = openat(
        dirfd,
        name,
        OFlags::WRONLY | OFlags::CREATE | OFlags::EXCL | OFlags::CLOEXEC | OFlags::NOFOLLOW,
        Mode::from_raw_mode(STAGING_MODE),
    )
    .map_err(errno_to_io)?;
    let mut file = File::from(fd);
    file.write_all(bytes)?;
    file.sync_all()?;
    Ok(file)
}
