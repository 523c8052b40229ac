use serde::Serialize;

/// Attributes copied from a link target onto its replacement file, in the
/// order they are applied.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum PreservedAttr {
    /// Extended attributes. Names the destination refuses are skipped.
    /// Applied first: setting them needs write permission on the inode.
    Xattrs,
    /// Permission bits including setuid/setgid/sticky.
    Mode,
    /// Last access time, nanosecond precision.
    Accessed,
    /// Last modification time, nanosecond precision.
    Modified,
}

impl PreservedAttr {
    pub const ALL: [PreservedAttr; 4] = [
        PreservedAttr::Xattrs,
        PreservedAttr::Mode,
        PreservedAttr::Accessed,
        PreservedAttr::Modified,
    ];

    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            PreservedAttr::Mode => "mode",
            PreservedAttr::Accessed => "atime",
            PreservedAttr::Modified => "mtime",
            PreservedAttr::Xattrs => "xattrs",
        }
    }
}

/// A timestamp as stored by the filesystem.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct FileTimestamp {
    pub secs: i64,
    pub nanos: i64,
}
