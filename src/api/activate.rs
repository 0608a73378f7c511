//! `activate`: point the mount table at the snapshots of an existing label. No snapshot is created.

use std::path::Path;

use log::Level;
use serde_json::json;

use crate::adapters::{MountHandle, PfsEntry};
use crate::api::errors::{exit_code_for, id_str, ApiError};
use crate::api::{collect, install, BootEnv};
use crate::fs::stage::activate_table_path;
use crate::label;
use crate::logging::{AuditSink, FactsEmitter, StageLogger};
use crate::types::{ActivateReport, Activation, MountEntry};

pub(crate) fn run<E: FactsEmitter, A: AuditSink>(
    api: &BootEnv<E, A>,
    label: &str,
) -> Result<ActivateReport, ApiError> {
    let tctx = api.audit_ctx("activate", label);
    let slog = StageLogger::new(&tctx);

    let result = pipeline(api, label, &slog);
    if let Err(e) = &result {
        slog.activate()
            .merge(&json!({
                "label": label,
                "error": e.to_string(),
                "error_id": id_str(e.id()),
                "exit_code": exit_code_for(e.id()),
            }))
            .emit_failure();
    }
    result
}

fn pipeline<E: FactsEmitter, A: AuditSink>(
    api: &BootEnv<E, A>,
    desired: &str,
    slog: &StageLogger<'_>,
) -> Result<ActivateReport, ApiError> {
    api.require_superuser("activate")?;
    label::validate(desired)?;

    let roster = collect::run(api, slog)?;
    let mut warnings = Vec::new();
    let mut activated = Vec::new();
    let mut entries: Vec<MountEntry> = Vec::with_capacity(roster.len());

    for entry in roster.entries {
        match resolve(api, &entry, desired, &mut warnings) {
            Some(spec) => {
                api.note(
                    Level::Info,
                    &format!("{}: {} -> {spec}", entry.mount_point, entry.spec),
                );
                slog.activate()
                    .path(entry.mount_point.clone())
                    .merge(&json!({
                        "spec_before": entry.spec,
                        "spec_after": spec,
                    }))
                    .emit_success();
                activated.push(Activation {
                    mount_point: entry.mount_point.clone(),
                    spec_before: entry.spec.clone(),
                    spec_after: spec.clone(),
                });
                entries.push(entry.with_spec(spec));
            }
            None => entries.push(entry),
        }
    }

    if activated.is_empty() {
        return Err(ApiError::UnknownBootEnv(desired.to_string()));
    }

    let staged = activate_table_path(&api.config.paths.staging_dir, desired);
    let install = install::run(api, &staged, &entries, slog)?;
    Ok(ActivateReport {
        label: desired.to_string(),
        dry_run: api.config.dry_run,
        activated,
        install,
        warnings,
    })
}

/// New specifier for `entry` when its mount holds a snapshot of the same base PFS whose most
/// recent label is `desired`.
fn resolve<E: FactsEmitter, A: AuditSink>(
    api: &BootEnv<E, A>,
    entry: &MountEntry,
    desired: &str,
    warnings: &mut Vec<String>,
) -> Option<String> {
    let (device, pfs) = label::split_spec(&entry.spec)?;
    let listed = MountHandle::open(Path::new(&entry.mount_point)).and_then(|h| {
        api.backend.probe(&h)?;
        api.backend.list_pfs(&h)
    });
    let all = match listed {
        Ok(v) => v,
        Err(e) => {
            api.note(
                Level::Debug,
                &format!("{}: not snapshot-capable ({e})", entry.mount_point),
            );
            return None;
        }
    };
    let matches: Vec<&PfsEntry> = all
        .iter()
        .filter(|p| {
            p.snapshot
                && label::base_pfs(&p.name) == label::base_pfs(pfs)
                && label::extract_label(&p.name) == Some(desired)
        })
        .collect();
    let chosen = matches.first()?;
    if matches.len() > 1 {
        let msg = format!(
            "{}: {} snapshots labeled {desired}, using {}",
            entry.mount_point,
            matches.len(),
            chosen.name
        );
        api.note(Level::Warn, &msg);
        warnings.push(msg);
    }
    Some(format!("{device}{}{}", crate::constants::PFS_DELIM, chosen.name))
}
