#![forbid(unsafe_code)]
//! delink: replace symlinks to Python source files with standalone copies.
//!
//! A pass scans a directory tree, classifies every entry, and for each symlink
//! whose final target is a regular `.py`/`.pyw`/`.pyi`/`.pyx` file removes the
//! link and writes a regular file with the target's bytes, permission bits,
//! timestamps, and extended attributes.
//!
//! Safety model highlights:
//! - Mutations go through a parent directory handle opened `O_NOFOLLOW`, re-check that
//!   the name is still a symlink, and create the replacement with `O_EXCL`.
//! - Dry-run passes never mutate the tree.
//! - A failed entry is reported and the pass continues; completed steps are not rolled back.
//! - This crate forbids `unsafe` and uses `rustix` for syscalls.

pub mod adapters;
pub mod api;
pub mod constants;
pub mod fs;
pub mod logging;
pub mod policy;
pub mod types;

pub use api::*;
