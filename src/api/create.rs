//! `create`: Collector -> Classifier -> Orchestrator -> Installer.

use std::collections::HashMap;

use log::Level;
use serde_json::json;

use crate::api::errors::{exit_code_for, id_str, ApiError, ErrorId};
use crate::api::{classify, collect, install, snapshot, BootEnv};
use crate::fs::stage::create_table_path;
use crate::label;
use crate::logging::{AuditSink, FactsEmitter, StageLogger};
use crate::types::{BootEnvCandidate, CandidateState, CreateReport, MountEntry, SkipReason};

pub(crate) fn run<E: FactsEmitter, A: AuditSink>(
    api: &BootEnv<E, A>,
    label: &str,
) -> Result<CreateReport, ApiError> {
    let tctx = api.audit_ctx("create", label);
    let slog = StageLogger::new(&tctx);
    api.note(Level::Info, &format!("create: starting boot environment {label}"));

    match pipeline(api, label, &slog) {
        Ok(report) => {
            let mut fields = json!({
                "label": label,
                "table_count": report.table_count,
                "vfs_count": report.vfs_count,
                "snapshotted": report.snapshotted(),
                "failed": report.failed(),
                "lines": report.install.as_ref().map_or(0, |i| i.lines.len()),
                "installed": report.install.is_some(),
                "exit_code": report.exit_code(),
            });
            if report.errors.is_empty() {
                slog.create_summary().merge(&fields).emit_success();
            } else {
                if let Some(obj) = fields.as_object_mut() {
                    obj.insert("error_id".into(), json!(id_str(ErrorId::E_SNAPSHOT)));
                    obj.insert("errors".into(), json!(report.errors));
                }
                slog.create_summary().merge(&fields).emit_failure();
            }
            Ok(report)
        }
        Err(e) => {
            slog.create_summary()
                .merge(&json!({
                    "label": label,
                    "error": e.to_string(),
                    "error_id": id_str(e.id()),
                    "exit_code": exit_code_for(e.id()),
                }))
                .emit_failure();
            Err(e)
        }
    }
}

fn pipeline<E: FactsEmitter, A: AuditSink>(
    api: &BootEnv<E, A>,
    desired: &str,
    slog: &StageLogger<'_>,
) -> Result<CreateReport, ApiError> {
    api.require_superuser("create")?;
    label::validate(desired)?;

    let roster = collect::run(api, slog)?;
    let mut warnings = Vec::new();
    if !roster.is_consistent() {
        warnings.push(format!(
            "mount table lists {} entries but {} filesystems are mounted",
            roster.len(),
            roster.vfs_count
        ));
    }
    let table_count = roster.len();
    let vfs_count = roster.vfs_count;

    let mut candidates = classify::run(api, roster.entries, desired, slog);
    for c in &candidates {
        match &c.state {
            CandidateState::Skipped {
                reason: SkipReason::LabelTooLong,
                detail: Some(detail),
            } => warnings.push(format!("{}: {detail}", c.entry.mount_point)),
            CandidateState::Skipped {
                reason: SkipReason::NoPfsName,
                ..
            } => warnings.push(format!("{}: {} names no PFS", c.entry.mount_point, c.entry.spec)),
            _ => {}
        }
    }
    check_duplicates(&candidates, desired)?;

    let errors = snapshot::run(api, &mut candidates, slog);

    let changed = candidates
        .iter()
        .any(|c| matches!(c.state, CandidateState::Snapshotted | CandidateState::Planned));
    let install = if changed {
        let entries: Vec<MountEntry> =
            candidates.iter().map(BootEnvCandidate::table_entry).collect();
        let staged = create_table_path(&api.config.paths.staging_dir, desired);
        Some(install::run(api, &staged, &entries, slog)?)
    } else {
        let live = api.config.paths.fstab.display().to_string();
        let msg = format!("no boot environment {desired} was created; {live} left unchanged");
        api.note(Level::Warn, &msg);
        slog.install()
            .path(live)
            .field("reason", json!("no candidate changed"))
            .emit_skip();
        warnings.push(msg);
        None
    };

    Ok(CreateReport {
        label: desired.to_string(),
        dry_run: api.config.dry_run,
        table_count,
        vfs_count,
        candidates: candidates.iter().map(BootEnvCandidate::outcome).collect(),
        install,
        warnings,
        errors,
    })
}

/// A label may be used once per device specifier: reject a chain that already ends with it and
/// two mounts that would be relabeled to the same specifier.
fn check_duplicates(candidates: &[BootEnvCandidate], desired: &str) -> Result<(), ApiError> {
    let mut seen: HashMap<&str, &str> = HashMap::new();
    for c in candidates.iter().filter(|c| c.is_eligible()) {
        if label::extract_label(&c.entry.spec) == Some(desired) {
            return Err(ApiError::DuplicateLabel {
                label: desired.to_string(),
                spec: c.entry.spec.clone(),
            });
        }
        if let Some(target) = c.target_spec.as_deref() {
            if seen.insert(target, &c.entry.mount_point).is_some() {
                return Err(ApiError::DuplicateLabel {
                    label: desired.to_string(),
                    spec: target.to_string(),
                });
            }
        }
    }
    Ok(())
}
