//! Shared test helpers for the delink integration tests.
#![allow(dead_code, clippy::unwrap_used, clippy::expect_used)]

use std::os::unix::fs::{symlink, MetadataExt as _};
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use log::Level;
use serde_json::Value;
use sha2::{Digest, Sha256};

use delink::adapters::FixedConfirmer;
use delink::logging::{AuditSink, FactsEmitter};
use delink::types::{RunConfig, RunReport};
use delink::Delinker;

/// A simple in-memory emitter to capture facts during tests.
#[derive(Clone, Default, Debug)]
pub struct TestEmitter {
    pub events: Arc<Mutex<Vec<(String, String, String, Value)>>>,
}

impl FactsEmitter for TestEmitter {
    fn emit(&self, subsystem: &str, event: &str, decision: &str, fields: Value) {
        self.events
            .lock()
            .unwrap()
            .push((subsystem.into(), event.into(), decision.into(), fields));
    }
}

impl TestEmitter {
    pub fn of_event(&self, event: &str) -> Vec<(String, Value)> {
        self.events
            .lock()
            .unwrap()
            .iter()
            .filter(|(_, e, _, _)| e == event)
            .map(|(_, _, d, f)| (d.clone(), f.clone()))
            .collect()
    }
}

/// A no-op audit sink for tests.
#[derive(Clone, Default)]
pub struct TestAudit;

impl AuditSink for TestAudit {
    fn log(&self, _level: Level, _msg: &str) {}
}

/// Temporary tree with its canonical root.
pub struct Tree {
    _td: tempfile::TempDir,
    pub root: PathBuf,
}

impl Tree {
    pub fn new() -> Self {
        let td = tempfile::tempdir().expect("tempdir");
        let root = std::fs::canonicalize(td.path()).unwrap();
        Self { _td: td, root }
    }

    pub fn file(&self, rel: &str, body: &[u8]) -> PathBuf {
        let p = self.root.join(rel);
        std::fs::create_dir_all(p.parent().unwrap()).unwrap();
        std::fs::write(&p, body).unwrap();
        p
    }

    pub fn link(&self, rel: &str, text: &str) -> PathBuf {
        let p = self.root.join(rel);
        std::fs::create_dir_all(p.parent().unwrap()).unwrap();
        symlink(text, &p).unwrap();
        p
    }

    /// Build a typical packaging layout: a few eligible links plus links and
    /// files that must be left alone.
    pub fn packaging_layout() -> Self {
        let t = Self::new();
        t.file("src/llvm/__init__.py", b"from .core import *\n");
        t.file("src/llvm/core.py", b"def f():\n    return 1\n");
        t.file("src/llvm/core.pyi", b"def f() -> int: ...\n");
        t.file("src/README.txt", b"readme\n");
        t.link("site/llvm/__init__.py", "../../src/llvm/__init__.py");
        t.link("site/llvm/core.py", "../../src/llvm/core.py");
        t.link("site/llvm/core.pyi", "../../src/llvm/core.pyi");
        t.link("site/README", "../src/README.txt");
        t.link("site/broken.py", "../src/missing.py");
        t.link("site/srcdir", "../src");
        t
    }
}

pub fn is_symlink(p: &Path) -> bool {
    std::fs::symlink_metadata(p)
        .map(|m| m.file_type().is_symlink())
        .unwrap_or(false)
}

/// Digest of everything observable about a tree: names, kinds, link text,
/// file bytes, permission bits, and modification times.
pub fn tree_checksum(root: &Path) -> String {
    let mut h = Sha256::new();
    for entry in walkdir::WalkDir::new(root)
        .follow_links(false)
        .sort_by_file_name()
    {
        let entry = entry.unwrap();
        let p = entry.path();
        let rel = p.strip_prefix(root).unwrap();
        let md = std::fs::symlink_metadata(p).unwrap();
        h.update(rel.as_os_str().as_encoded_bytes());
        h.update(md.mode().to_le_bytes());
        if md.file_type().is_symlink() {
            h.update(std::fs::read_link(p).unwrap().as_os_str().as_encoded_bytes());
        } else if md.is_file() {
            h.update(md.mtime().to_le_bytes());
            h.update(std::fs::read(p).unwrap());
        }
    }
    hex::encode(h.finalize())
}

pub fn delinker(
    root: &Path,
    dry_run: bool,
    auto_confirm: bool,
) -> (Delinker<TestEmitter, TestAudit>, TestEmitter) {
    let facts = TestEmitter::default();
    let api = Delinker::new(
        facts.clone(),
        TestAudit,
        RunConfig::new(root, dry_run, auto_confirm),
    )
    .with_confirmer(Box::new(FixedConfirmer::new(false)));
    (api, facts)
}

pub fn run(root: &Path, dry_run: bool) -> RunReport {
    let (api, _) = delinker(root, dry_run, true);
    api.run().unwrap()
}
