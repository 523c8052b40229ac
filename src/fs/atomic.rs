//! Directory-handle primitives for TOCTOU-safe mutation of a single entry.
//!
//! Mutations open the parent with `O_DIRECTORY | O_NOFOLLOW` once and then act on
//! the final component with `*at` calls through that handle:
//! `open_parent(path) -> statat/unlinkat/openat(name) -> fsync(dirfd)`.
use std::ffi::OsStr;
use std::path::Path;

use rustix::fd::OwnedFd;
use rustix::fs::{openat, Mode, OFlags, CWD};
use rustix::io::Errno;

pub(crate) fn errno_to_io(e: Errno) -> std::io::Error {
    std::io::Error::from_raw_os_error(e.raw_os_error())
}

/// Open a directory with `O_DIRECTORY` | `O_NOFOLLOW`.
///
/// # Errors
///
/// Returns an IO error if the directory cannot be opened or is a symlink.
pub fn open_dir_nofollow(dir: &Path) -> std::io::Result<OwnedFd> {
    openat(
        CWD,
        dir,
        OFlags::RDONLY | OFlags::DIRECTORY | OFlags::CLOEXEC | OFlags::NOFOLLOW,
        Mode::empty(),
    )
    .map_err(errno_to_io)
}

/// Open the parent directory of `path` and return it with the final component.
///
/// # Errors
///
/// Returns `InvalidInput` when `path` has no file name, or the error from
/// opening the parent.
pub fn open_parent(path: &Path) -> std::io::Result<(OwnedFd, &OsStr)> {
    let name = path.file_name().ok_or_else(|| {
        std::io::Error::new(std::io::ErrorKind::InvalidInput, "path has no file name")
    })?;
    let parent = match path.parent() {
        Some(p) if !p.as_os_str().is_empty() => p,
        _ => Path::new("."),
    };
    Ok((open_dir_nofollow(parent)?, name))
}

/// Fsync a directory using an already-open directory file descriptor.
pub fn fsync_dirfd(dirfd: &OwnedFd) -> std::io::Result<()> {
    rustix::fs::fsync(dirfd).map_err(errno_to_io)
}
