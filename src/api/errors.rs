use std::path::PathBuf;

use thiserror::Error;

use crate::constants::{EXIT_FATAL, EXIT_PARTIAL};
use crate::types::EntryError;

/// Errors that end a pass before any entry is processed.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("invalid root {}: {reason}", path.display())]
    InvalidRoot { path: PathBuf, reason: String },
    #[error("confirmation prompt failed: {0}")]
    Prompt(String),
}

impl ApiError {
    #[must_use]
    pub fn error_id(&self) -> ErrorId {
        match self {
            ApiError::InvalidRoot { .. } => ErrorId::E_INVALID_ROOT,
            ApiError::Prompt(_) => ErrorId::E_PROMPT,
        }
    }
}

// Stable identifiers emitted in facts and JSON reports.
#[allow(non_camel_case_types)]
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ErrorId {
    E_INVALID_ROOT,
    E_PROMPT,
    E_SCAN,
    E_TARGET_UNREADABLE,
    E_LINK_REMOVAL,
    E_WRITE,
    E_METADATA,
}

impl From<&EntryError> for ErrorId {
    fn from(e: &EntryError) -> Self {
        match e {
            EntryError::Scan(_) => ErrorId::E_SCAN,
            EntryError::TargetUnreadable(_) => ErrorId::E_TARGET_UNREADABLE,
            EntryError::LinkRemovalFailed(_) => ErrorId::E_LINK_REMOVAL,
            EntryError::WriteFailed(_) => ErrorId::E_WRITE,
            EntryError::MetadataApplyFailed(_) => ErrorId::E_METADATA,
        }
    }
}

#[must_use]
pub const fn id_str(id: ErrorId) -> &'static str {
    match id {
        ErrorId::E_INVALID_ROOT => "E_INVALID_ROOT",
        ErrorId::E_PROMPT => "E_PROMPT",
        ErrorId::E_SCAN => "E_SCAN",
        ErrorId::E_TARGET_UNREADABLE => "E_TARGET_UNREADABLE",
        ErrorId::E_LINK_REMOVAL => "E_LINK_REMOVAL",
        ErrorId::E_WRITE => "E_WRITE",
        ErrorId::E_METADATA => "E_METADATA",
    }
}

/// Process exit status for an error class. Per-entry classes only ever
/// surface through a finished report with failures.
#[must_use]
pub const fn exit_code_for(id: ErrorId) -> u8 {
    match id {
        ErrorId::E_INVALID_ROOT | ErrorId::E_PROMPT => EXIT_FATAL,
        ErrorId::E_SCAN
        | ErrorId::E_TARGET_UNREADABLE
        | ErrorId::E_LINK_REMOVAL
        | ErrorId::E_WRITE
        | ErrorId::E_METADATA => EXIT_PARTIAL,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fatal_and_partial_codes_are_distinct() {
        let root = ApiError::InvalidRoot {
            path: PathBuf::from("/nope"),
            reason: "missing".into(),
        };
        assert_eq!(exit_code_for(root.error_id()), 1);
        assert_eq!(exit_code_for(ApiError::Prompt("eof".into()).error_id()), 1);
        let entry = EntryError::MetadataApplyFailed("EPERM".into());
        assert_eq!(exit_code_for(ErrorId::from(&entry)), 2);
        assert_eq!(id_str(ErrorId::from(&entry)), "E_METADATA");
    }

    #[test]
    fn invalid_root_message_names_path() {
        let e = ApiError::InvalidRoot {
            path: PathBuf::from("/srv/missing"),
            reason: "does not exist".into(),
        };
        assert_eq!(e.to_string(), "invalid root /srv/missing: does not exist");
    }
}
