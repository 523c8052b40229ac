use std::fs::{File, OpenOptions};
use std::io::Write as _;
use std::path::Path;
use std::sync::Mutex;

use log::Level;
use serde_json::{json, Value};

/// Receives one structured fact per stage event.
pub trait FactsEmitter {
    fn emit(&self, subsystem: &str, event: &str, decision: &str, fields: Value);
}

/// Receives human-oriented progress messages.
pub trait AuditSink {
    fn log(&self, level: Level, msg: &str);
}

impl<T: FactsEmitter + ?Sized> FactsEmitter for Box<T> {
    fn emit(&self, subsystem: &str, event: &str, decision: &str, fields: Value) {
        (**self).emit(subsystem, event, decision, fields);
    }
}

impl<T: AuditSink + ?Sized> AuditSink for Box<T> {
    fn log(&self, level: Level, msg: &str) {
        (**self).log(level, msg);
    }
}

/// Discards everything.
#[derive(Default)]
pub struct JsonlSink;

impl FactsEmitter for JsonlSink {
    fn emit(&self, _subsystem: &str, _event: &str, _decision: &str, _fields: Value) {}
}

impl AuditSink for JsonlSink {
    fn log(&self, _level: Level, _msg: &str) {}
}

/// Appends each fact as one JSON object per line.
pub struct JsonlFileSink {
    file: Mutex<File>,
}

impl JsonlFileSink {
    /// Open `path` for appending, creating it if needed.
    ///
    /// # Errors
    ///
    /// Returns the error from opening the file.
    pub fn open(path: &Path) -> std::io::Result<Self> {
        let file = OpenOptions::new().create(true).append(true).open(path)?;
        Ok(Self {
            file: Mutex::new(file),
        })
    }
}

impl FactsEmitter for JsonlFileSink {
    fn emit(&self, subsystem: &str, event: &str, decision: &str, fields: Value) {
        let mut line = json!({
            "subsystem": subsystem,
            "event": event,
            "decision": decision,
        });
        if let (Some(obj), Value::Object(extra)) = (line.as_object_mut(), fields) {
            obj.extend(extra);
        }
        if let Ok(mut f) = self.file.lock() {
            // best-effort
            let _ = writeln!(f, "{line}");
        }
    }
}

/// Writes progress messages to stderr when verbose, warnings and errors always.
#[derive(Default)]
pub struct StderrAudit {
    pub verbose: bool,
}

impl StderrAudit {
    #[must_use]
    pub fn new(verbose: bool) -> Self {
        Self { verbose }
    }
}

impl AuditSink for StderrAudit {
    fn log(&self, level: Level, msg: &str) {
        if self.verbose || level <= Level::Warn {
            eprintln!("[{}] {msg}", level.as_str().to_lowercase());
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn jsonl_file_sink_writes_one_object_per_line() {
        let td = tempfile::tempdir().unwrap();
        let path = td.path().join("facts.jsonl");
        let sink = JsonlFileSink::open(&path).unwrap();
        sink.emit("delink", "scan", "success", json!({"entries": 3}));
        sink.emit("delink", "run.summary", "failure", json!({"failed": 1}));
        drop(sink);

        let text = std::fs::read_to_string(&path).unwrap();
        let lines: Vec<Value> = text
            .lines()
            .map(|l| serde_json::from_str(l).unwrap())
            .collect();
        assert_eq!(lines.len(), 2);
        assert_eq!(lines[0]["event"], "scan");
        assert_eq!(lines[0]["entries"], 3);
        assert_eq!(lines[1]["decision"], "failure");
    }
}
