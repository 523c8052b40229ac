// Stage logger that emits structured facts for each phase of a pass.
//
// Side-effects:
// - Emits JSON facts via `FactsEmitter` for `scan`, `classify`, `replace.attempt`,
//   `replace.result`, and `run.summary`.
// - Ensures a minimal envelope on every fact: `schema_version`, `ts`, `run_id`, `path`, `dry_run`.
// - Applies redaction in dry-run to zero timestamps and drop volatile fields.
use crate::constants::{SCHEMA_VERSION, SUBSYSTEM};
use crate::logging::{redact_event, FactsEmitter};
use serde_json::{json, Value};

#[derive(Clone, Debug, Default)]
pub struct AuditMode {
    pub dry_run: bool,
    pub redact: bool,
}

pub struct AuditCtx<'a> {
    pub facts: &'a dyn FactsEmitter,
    pub run_id: String,
    pub ts: String,
    pub mode: AuditMode,
}

impl<'a> AuditCtx<'a> {
    pub fn new(facts: &'a dyn FactsEmitter, run_id: String, ts: String, mode: AuditMode) -> Self {
        Self {
            facts,
            run_id,
            ts,
            mode,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Stage {
    Scan,
    Classify,
    ReplaceAttempt,
    ReplaceResult,
    RunSummary,
}

impl Stage {
    #[must_use]
    pub const fn as_event(&self) -> &'static str {
        match self {
            Stage::Scan => "scan",
            Stage::Classify => "classify",
            Stage::ReplaceAttempt => "replace.attempt",
            Stage::ReplaceResult => "replace.result",
            Stage::RunSummary => "run.summary",
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Decision {
    Success,
    Failure,
    Warn,
}

impl Decision {
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Decision::Success => "success",
            Decision::Failure => "failure",
            Decision::Warn => "warn",
        }
    }
}

/// Builder facade over fact emission with centralized envelope and redaction.
pub struct StageLogger<'a> {
    ctx: &'a AuditCtx<'a>,
}

impl<'a> StageLogger<'a> {
    pub fn new(ctx: &'a AuditCtx<'a>) -> Self {
        Self { ctx }
    }

    pub fn scan(&self) -> EventBuilder<'a> {
        EventBuilder::new(self.ctx, Stage::Scan)
    }
    pub fn classify(&self) -> EventBuilder<'a> {
        EventBuilder::new(self.ctx, Stage::Classify)
    }
    pub fn replace_attempt(&self) -> EventBuilder<'a> {
        EventBuilder::new(self.ctx, Stage::ReplaceAttempt)
    }
    pub fn replace_result(&self) -> EventBuilder<'a> {
        EventBuilder::new(self.ctx, Stage::ReplaceResult)
    }
    pub fn run_summary(&self) -> EventBuilder<'a> {
        EventBuilder::new(self.ctx, Stage::RunSummary)
    }
}

pub struct EventBuilder<'a> {
    ctx: &'a AuditCtx<'a>,
    stage: Stage,
    fields: serde_json::Map<String, Value>,
}

impl<'a> EventBuilder<'a> {
    fn new(ctx: &'a AuditCtx<'a>, stage: Stage) -> Self {
        let mut fields = serde_json::Map::new();
        fields.insert("stage".to_string(), json!(stage.as_event()));
        Self { ctx, stage, fields }
    }

    pub fn path(mut self, path: impl Into<String>) -> Self {
        self.fields.insert("path".into(), json!(path.into()));
        self
    }

    pub fn field(mut self, key: &str, value: Value) -> Self {
        self.fields.insert(key.to_string(), value);
        self
    }

    pub fn merge(mut self, extra: Value) -> Self {
        if let Value::Object(obj) = extra {
            self.fields.extend(obj);
        }
        self
    }

    pub fn emit(self, decision: Decision) {
        let mut fields = Value::Object(self.fields);
        if let Some(obj) = fields.as_object_mut() {
            obj.entry("decision").or_insert(json!(decision.as_str()));
        }
        redact_and_emit(self.ctx, self.stage.as_event(), decision.as_str(), fields);
    }

    pub fn emit_success(self) {
        self.emit(Decision::Success);
    }
    pub fn emit_failure(self) {
        self.emit(Decision::Failure);
    }
    pub fn emit_warn(self) {
        self.emit(Decision::Warn);
    }
}

fn redact_and_emit(ctx: &AuditCtx<'_>, event: &str, decision: &str, mut fields: Value) {
    if let Some(obj) = fields.as_object_mut() {
        obj.entry("schema_version").or_insert(json!(SCHEMA_VERSION));
        obj.entry("ts").or_insert(json!(ctx.ts));
        obj.entry("run_id").or_insert(json!(ctx.run_id));
        obj.entry("path").or_insert(json!(""));
        obj.entry("dry_run").or_insert(json!(ctx.mode.dry_run));
    }
    let out = if ctx.mode.redact {
        redact_event(fields)
    } else {
        fields
    };
    ctx.facts.emit(SUBSYSTEM, event, decision, out);
}
