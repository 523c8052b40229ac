//! Read-only recursive enumeration of a directory tree.
//!
//! Order is depth-first with entries sorted by file name within each directory,
//! so two scans of an unchanged tree yield the same sequence. Directory
//! symlinks are reported as symlink entries and never descended into, which
//! rules out traversal cycles.
use std::path::{Path, PathBuf};

use walkdir::WalkDir;

use crate::types::errors::{Error, ErrorKind, Result};
use crate::types::{EntryKind, FsEntry};

/// A subtree the walk could not read. The walk continues past it.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ScanFailure {
    pub path: PathBuf,
    pub reason: String,
}

/// Resolve `root` to an absolute, symlink-free path and check it is a directory.
///
/// # Errors
///
/// Returns `ErrorKind::InvalidPath` when the root is missing or is not a directory.
pub fn validate_root(root: &Path) -> Result<PathBuf> {
    let resolved = std::fs::canonicalize(root).map_err(|e| Error {
        kind: ErrorKind::InvalidPath,
        msg: format!("does not exist ({e})"),
    })?;
    let md = std::fs::metadata(&resolved).map_err(|e| Error {
        kind: ErrorKind::Io,
        msg: format!("cannot stat resolved path: {e}"),
    })?;
    if !md.is_dir() {
        return Err(Error {
            kind: ErrorKind::InvalidPath,
            msg: "not a directory".to_string(),
        });
    }
    Ok(resolved)
}

/// Lazy iterator over every entry below a validated root.
pub struct Scanner {
    root: PathBuf,
    inner: walkdir::IntoIter,
}

impl Scanner {
    /// Start a scan below `root`, which must already have passed `validate_root`.
    #[must_use]
    pub fn new(root: &Path) -> Self {
        let inner = WalkDir::new(root)
            .min_depth(1)
            .follow_links(false)
            .sort_by_file_name()
            .into_iter();
        Self {
            root: root.to_path_buf(),
            inner,
        }
    }
}

impl Iterator for Scanner {
    type Item = std::result::Result<FsEntry, ScanFailure>;

    fn next(&mut self) -> Option<Self::Item> {
        let item = self.inner.next()?;
        Some(match item {
            Ok(entry) => {
                let kind = EntryKind::from(entry.file_type());
                Ok(FsEntry {
                    path: entry.into_path(),
                    kind,
                })
            }
            Err(e) => Err(ScanFailure {
                path: e
                    .path()
                    .map_or_else(|| self.root.clone(), Path::to_path_buf),
                reason: e
                    .io_error()
                    .map_or_else(|| e.to_string(), ToString::to_string),
            }),
        })
    }
}

/// Validate `root` and start a scan below it.
///
/// # Errors
///
/// See [`validate_root`].
pub fn scan(root: &Path) -> Result<Scanner> {
    let root = validate_root(root)?;
    Ok(Scanner::new(&root))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn rel(root: &Path, entries: &[FsEntry]) -> Vec<(String, EntryKind)> {
        entries
            .iter()
            .map(|e| {
                (
                    e.path.strip_prefix(root).unwrap().display().to_string(),
                    e.kind,
                )
            })
            .collect()
    }

    #[test]
    fn scan_is_depth_first_and_sorted() {
        let td = tempfile::tempdir().unwrap();
        let root = std::fs::canonicalize(td.path()).unwrap();
        std::fs::create_dir_all(root.join("b/inner")).unwrap();
        std::fs::write(root.join("c.py"), b"c").unwrap();
        std::fs::write(root.join("a.py"), b"a").unwrap();
        std::fs::write(root.join("b/inner/z.py"), b"z").unwrap();
        std::os::unix::fs::symlink(root.join("a.py"), root.join("b/link.py")).unwrap();

        let entries: Vec<FsEntry> = scan(&root).unwrap().map(|r| r.unwrap()).collect();
        assert_eq!(
            rel(&root, &entries),
            vec![
                ("a.py".to_string(), EntryKind::File),
                ("b".to_string(), EntryKind::Dir),
                ("b/inner".to_string(), EntryKind::Dir),
                ("b/inner/z.py".to_string(), EntryKind::File),
                ("b/link.py".to_string(), EntryKind::Symlink),
                ("c.py".to_string(), EntryKind::File),
            ]
        );
    }

    #[test]
    fn directory_symlinks_are_not_descended() {
        let td = tempfile::tempdir().unwrap();
        let root = std::fs::canonicalize(td.path()).unwrap();
        std::fs::create_dir(root.join("real")).unwrap();
        std::fs::write(root.join("real/x.py"), b"x").unwrap();
        std::os::unix::fs::symlink(&root, root.join("real/loop")).unwrap();

        let entries: Vec<FsEntry> = scan(&root).unwrap().map(|r| r.unwrap()).collect();
        assert_eq!(
            rel(&root, &entries),
            vec![
                ("real".to_string(), EntryKind::Dir),
                ("real/loop".to_string(), EntryKind::Symlink),
                ("real/x.py".to_string(), EntryKind::File),
            ]
        );
    }

    #[test]
    fn missing_root_is_invalid() {
        let td = tempfile::tempdir().unwrap();
        let err = scan(&td.path().join("nope")).err().unwrap();
        assert_eq!(err.kind, ErrorKind::InvalidPath);
    }

    #[test]
    fn file_root_is_invalid() {
        let td = tempfile::tempdir().unwrap();
        let f = td.path().join("file.py");
        std::fs::write(&f, b"x").unwrap();
        let err = scan(&f).err().unwrap();
        assert_eq!(err.kind, ErrorKind::InvalidPath);
        assert_eq!(err.msg, "not a directory");
    }

    #[test]
    fn symlinked_root_is_resolved() {
        let td = tempfile::tempdir().unwrap();
        let real = std::fs::canonicalize(td.path()).unwrap().join("real");
        std::fs::create_dir(&real).unwrap();
        let alias = td.path().join("alias");
        std::os::unix::fs::symlink(&real, &alias).unwrap();
        assert_eq!(validate_root(&alias).unwrap(), real);
    }
}
