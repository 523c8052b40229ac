use std::fs::FileType;
use std::path::PathBuf;

use serde::Serialize;

/// Kind of a filesystem node as observed at scan time, without following symlinks.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum EntryKind {
    File,
    Symlink,
    Dir,
    Other,
}

impl From<FileType> for EntryKind {
    fn from(ft: FileType) -> Self {
        if ft.is_symlink() {
            EntryKind::Symlink
        } else if ft.is_file() {
            EntryKind::File
        } else if ft.is_dir() {
            EntryKind::Dir
        } else {
            EntryKind::Other
        }
    }
}

/// A discovered path plus its kind. Snapshot only; nothing re-validates it until
/// the entry is acted upon.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FsEntry {
    pub path: PathBuf,
    pub kind: EntryKind,
}

/// A symlink whose fully resolved `target` was an existing regular file with a
/// recognized source suffix when it was classified.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct EligibleLink {
    #[serde(serialize_with = "super::report::lossy_path")]
    pub link: PathBuf,
    #[serde(serialize_with = "super::report::lossy_path")]
    pub target: PathBuf,
}
