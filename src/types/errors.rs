//! Error types used across delink.
use thiserror::Error;

/// High-level error categories for type-level operations.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Error)]
pub enum ErrorKind {
    #[error("invalid path")]
    InvalidPath,
    #[error("io error")]
    Io,
}

/// Structured error with a kind and human message.
#[derive(Debug, Error)]
#[error("{kind:?}: {msg}")]
pub struct Error {
    pub kind: ErrorKind,
    pub msg: String,
}

/// Convenient alias for results returning a `types::Error`.
pub type Result<T> = std::result::Result<T, Error>;

/// Per-entry failure. The message names the step that failed; the run continues
/// with the next entry and nothing already done for this entry is undone.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EntryError {
    #[error("scan: {0}")]
    Scan(String),
    #[error("read target: {0}")]
    TargetUnreadable(String),
    #[error("remove link: {0}")]
    LinkRemovalFailed(String),
    #[error("write file: {0}")]
    WriteFailed(String),
    #[error("apply metadata: {0}")]
    MetadataApplyFailed(String),
}
