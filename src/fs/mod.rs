pub mod atomic;
pub mod meta;
pub mod replace;
pub mod scan;

pub use atomic::{fsync_dirfd, open_dir_nofollow, open_parent};
pub use meta::{apply_metadata, capture_target, resolve_symlink_target, sha256_hex};
pub use replace::{check_target, replace, Materialized, ReplaceStatus};
pub use scan::{scan, validate_root, ScanFailure, Scanner};
