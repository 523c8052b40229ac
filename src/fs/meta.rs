//! Filesystem metadata helpers used by the classifier and the replacer.
//!
//! - `resolve_symlink_target(path)`: join a link's text onto its parent directory
//! - `capture_target(path)`: read bytes and the preserved attribute set of a regular file
//! - `apply_metadata(file, meta)`: write the preserved attribute set onto an open file
//!
//! Extended attributes are best-effort in both directions. A target whose
//! filesystem cannot list them yields none; names the destination refuses
//! (unsupported namespace, privileged namespace) are counted and skipped.
use std::ffi::OsString;
use std::fs::File;
use std::io::Read as _;
use std::os::unix::fs::MetadataExt as _;
use std::path::{Path, PathBuf};

use rustix::fs::{fchmod, futimens, Mode, Timespec, Timestamps};
use rustix::io::Errno;
use sha2::{Digest, Sha256};
use xattr::FileExt as _;

use super::atomic::errno_to_io;
use crate::types::FileTimestamp;

/// Compute SHA-256 of `bytes`, returning a lowercase hex string.
#[must_use]
pub fn sha256_hex(bytes: &[u8]) -> String {
    hex::encode(Sha256::digest(bytes))
}

/// Read the text of the symlink at `link` and make it absolute by joining
/// relative text onto the link's parent directory. Intermediate links and `..`
/// are left for the caller to canonicalize.
///
/// # Errors
///
/// Returns the error from `readlink`.
pub fn resolve_symlink_target(link: &Path) -> std::io::Result<PathBuf> {
    let text = std::fs::read_link(link)?;
    if text.is_relative() {
        if let Some(parent) = link.parent() {
            return Ok(parent.join(text));
        }
    }
    Ok(text)
}

/// Attributes captured from a link target before the link is removed.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CapturedMeta {
    pub mode: u32,
    pub accessed: FileTimestamp,
    pub modified: FileTimestamp,
    pub xattrs: Vec<(OsString, Vec<u8>)>,
}

#[derive(Clone, Debug)]
pub struct TargetSnapshot {
    pub bytes: Vec<u8>,
    pub meta: CapturedMeta,
}

/// Open `target` once and read its bytes and preserved attributes from the
/// same handle.
///
/// # Errors
///
/// Returns an IO error when the target cannot be opened or read, or when it
/// is no longer a regular file.
pub fn capture_target(target: &Path) -> std::io::Result<TargetSnapshot> {
    let mut f = File::open(target)?;
    let md = f.metadata()?;
    if !md.is_file() {
        return Err(std::io::Error::new(
            std::io::ErrorKind::InvalidInput,
            "target is not a regular file",
        ));
    }
    let mut bytes = Vec::with_capacity(usize::try_from(md.len()).unwrap_or(0));
    f.read_to_end(&mut bytes)?;
    let meta = CapturedMeta {
        mode: md.mode() & 0o7777,
        accessed: FileTimestamp {
            secs: md.atime(),
            nanos: md.atime_nsec(),
        },
        modified: FileTimestamp {
            secs: md.mtime(),
            nanos: md.mtime_nsec(),
        },
        xattrs: read_xattrs(&f),
    };
    Ok(TargetSnapshot { bytes, meta })
}

fn read_xattrs(f: &File) -> Vec<(OsString, Vec<u8>)> {
    let Ok(names) = f.list_xattr() else {
        return Vec::new();
    };
    names
        .filter_map(|name| match f.get_xattr(&name) {
            Ok(Some(value)) => Some((name, value)),
            _ => None,
        })
        .collect()
}

fn is_refused(e: &std::io::Error) -> bool {
    matches!(
        Errno::from_io_error(e),
        Some(Errno::OPNOTSUPP | Errno::PERM | Errno::ACCESS)
    )
}

fn timespec(ts: FileTimestamp) -> Timespec {
    Timespec {
        tv_sec: ts.secs as _,
        tv_nsec: ts.nanos as _,
    }
}

/// Apply `meta` to an open file: extended attributes, then permission bits,
/// then access and modification times. Returns how many extended attributes
/// the destination refused.
///
/// # Errors
///
/// Returns the first error that is not a refused extended attribute.
pub fn apply_metadata(file: &File, meta: &CapturedMeta) -> std::io::Result<usize> {
    let mut refused = 0usize;
    for (name, value) in &meta.xattrs {
        match file.set_xattr(name, value) {
            Ok(()) => {}
            Err(e) if is_refused(&e) => refused += 1,
            Err(e) => return Err(e),
        }
    }
    fchmod(file, Mode::from_raw_mode(meta.mode)).map_err(errno_to_io)?;
    futimens(
        file,
        &Timestamps {
            last_access: timespec(meta.accessed),
            last_modification: timespec(meta.modified),
        },
    )
    .map_err(errno_to_io)?;
    Ok(refused)
}
