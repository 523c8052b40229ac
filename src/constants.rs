//! Shared crate-wide constants for delink.
//!
//! Centralizes magic values used across modules. Adjusting these here will
//! propagate through the crate.

/// File-name suffixes that make a symlink target eligible for replacement.
/// Matching is case-sensitive and exact; the set is closed.
pub const SOURCE_SUFFIXES: &[&str] = &[".py", ".pyw", ".pyi", ".pyx"];

/// Schema version stamped on every emitted fact.
pub const SCHEMA_VERSION: i64 = 1;

/// Subsystem name used when emitting facts.
pub const SUBSYSTEM: &str = "delink";

/// UUIDv5 namespace tag for deterministic run IDs.
pub const NS_TAG: &str = "https://delink/run";

/// Mode applied to a freshly created replacement file until the captured
/// permission bits are restored.
pub const STAGING_MODE: u32 = 0o600;

/// Process exit status for a pass that completed without per-entry failures,
/// including cancelled and dry-run passes.
pub const EXIT_OK: u8 = 0;

/// Process exit status for fatal pre-flight errors (invalid root, prompt I/O).
pub const EXIT_FATAL: u8 = 1;

/// Process exit status for a pass that completed with one or more failed entries.
pub const EXIT_PARTIAL: u8 = 2;

/// Process exit status for command-line usage errors (sysexits `EX_USAGE`).
pub const EXIT_USAGE: u8 = 64;
