// Stage facts for create, list and activate.
//
// Every fact carries a minimal envelope: `schema_version`, `ts`, `op_id`, `run_id`, `path`,
// `dry_run`. Dry-run facts are redacted so two dry runs of the same operation compare equal.
use crate::logging::{redact_event, FactsEmitter};
use serde_json::{json, Value};
use uuid::Uuid;

pub(crate) const SCHEMA_VERSION: i64 = 1;
const SUBSYSTEM: &str = "bootenv";

pub(crate) fn new_run_id() -> String {
    Uuid::new_v4().to_string()
}

#[derive(Clone, Debug, Default)]
pub(crate) struct AuditMode {
    pub dry_run: bool,
    pub redact: bool,
}

pub(crate) struct AuditCtx<'a> {
    pub facts: &'a dyn FactsEmitter,
    pub op_id: String,
    pub run_id: String,
    pub ts: String,
    pub mode: AuditMode,
}

impl<'a> AuditCtx<'a> {
    pub(crate) fn new(
        facts: &'a dyn FactsEmitter,
        op_id: String,
        run_id: String,
        ts: String,
        mode: AuditMode,
    ) -> Self {
        Self {
            facts,
            op_id,
            run_id,
            ts,
            mode,
        }
    }
}

#[derive(Clone, Copy, Debug)]
pub enum Stage {
    Collect,
    Classify,
    Snapshot,
    Stage,
    Install,
    List,
    Activate,
    CreateSummary,
}

impl Stage {
    fn as_event(self) -> &'static str {
        match self {
            Stage::Collect => "collect",
            Stage::Classify => "classify",
            Stage::Snapshot => "snapshot",
            Stage::Stage => "stage",
            Stage::Install => "install",
            Stage::List => "list",
            Stage::Activate => "activate",
            Stage::CreateSummary => "create.summary",
        }
    }
}

#[derive(Clone, Copy, Debug)]
pub enum Decision {
    Success,
    Failure,
    Warn,
    Skip,
}

impl Decision {
    fn as_str(self) -> &'static str {
        match self {
            Decision::Success => "success",
            Decision::Failure => "failure",
            Decision::Warn => "warn",
            Decision::Skip => "skip",
        }
    }
}

/// Builder facade over fact emission with centralized envelope and redaction.
pub struct StageLogger<'a> {
    ctx: &'a AuditCtx<'a>,
}

impl<'a> StageLogger<'a> {
    pub(crate) fn new(ctx: &'a AuditCtx<'a>) -> Self {
        Self { ctx }
    }

    pub fn collect(&'a self) -> EventBuilder<'a> { EventBuilder::new(self.ctx, Stage::Collect) }
    pub fn classify(&'a self) -> EventBuilder<'a> { EventBuilder::new(self.ctx, Stage::Classify) }
    pub fn snapshot(&'a self) -> EventBuilder<'a> { EventBuilder::new(self.ctx, Stage::Snapshot) }
    pub fn stage(&'a self) -> EventBuilder<'a> { EventBuilder::new(self.ctx, Stage::Stage) }
    pub fn install(&'a self) -> EventBuilder<'a> { EventBuilder::new(self.ctx, Stage::Install) }
    pub fn list(&'a self) -> EventBuilder<'a> { EventBuilder::new(self.ctx, Stage::List) }
    pub fn activate(&'a self) -> EventBuilder<'a> { EventBuilder::new(self.ctx, Stage::Activate) }
    pub fn create_summary(&'a self) -> EventBuilder<'a> { EventBuilder::new(self.ctx, Stage::CreateSummary) }
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

    pub fn merge(mut self, extra: &Value) -> Self {
        if let Some(obj) = extra.as_object() {
            for (k, v) in obj {
                self.fields.insert(k.clone(), v.clone());
            }
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

    pub fn emit_success(self) { self.emit(Decision::Success) }
    pub fn emit_failure(self) { self.emit(Decision::Failure) }
    pub fn emit_warn(self) { self.emit(Decision::Warn) }
    pub fn emit_skip(self) { self.emit(Decision::Skip) }
}

fn redact_and_emit(ctx: &AuditCtx, event: &str, decision: &str, mut fields: Value) {
    if let Some(obj) = fields.as_object_mut() {
        obj.entry("schema_version").or_insert(json!(SCHEMA_VERSION));
        obj.entry("ts").or_insert(json!(ctx.ts));
        obj.entry("op_id").or_insert(json!(ctx.op_id));
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
