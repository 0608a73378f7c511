//! Classifier and labeler: capability probe, then the new specifier for each capable mount.

use std::path::Path;

use log::Level;
use serde_json::json;

use crate::adapters::MountHandle;
use crate::api::errors::{exit_code_for, id_str, ErrorId};
use crate::api::BootEnv;
use crate::label;
use crate::logging::{AuditSink, FactsEmitter, StageLogger};
use crate::types::{BootEnvCandidate, CandidateState, MountEntry, SkipReason};

/// Open the mount point, run the identity probe and close the descriptor again.
pub(crate) fn probe<E: FactsEmitter, A: AuditSink>(
    api: &BootEnv<E, A>,
    mount_point: &str,
) -> std::io::Result<()> {
    let handle = MountHandle::open(Path::new(mount_point))?;
    api.backend.probe(&handle)
}

pub(crate) fn classify<E: FactsEmitter, A: AuditSink>(
    api: &BootEnv<E, A>,
    entry: MountEntry,
    desired: &str,
    slog: &StageLogger<'_>,
) -> BootEnvCandidate {
    let mut c = BootEnvCandidate::new(entry, desired);
    let mp = c.entry.mount_point.clone();
    let spec = c.entry.spec.clone();

    if let Err(e) = probe(api, &mp) {
        api.note(Level::Debug, &format!("{mp}: not snapshot-capable ({e})"));
        c.skip(SkipReason::NotSnapshotCapable, Some(e.to_string()));
        slog.classify()
            .path(mp)
            .merge(&json!({
                "spec": spec,
                "snapshot_capable": false,
                "reason": "not_snapshot_capable",
                "detail": e.to_string(),
            }))
            .emit_skip();
        return c;
    }
    c.snapshot_capable = true;

    if label::split_spec(&spec).is_none() {
        api.note(
            Level::Warn,
            &format!("{mp}: {spec} names no PFS, leaving it unchanged"),
        );
        c.skip(SkipReason::NoPfsName, None);
        slog.classify()
            .path(mp)
            .merge(&json!({
                "spec": spec,
                "snapshot_capable": true,
                "reason": "no_pfs_name",
            }))
            .emit_warn();
        return c;
    }

    match label::relabel(&spec, desired) {
        Ok(r) => {
            if r.current.is_empty() {
                api.note(
                    Level::Info,
                    &format!("{mp}: no boot environment label found on {spec}, creating one"),
                );
            }
            c.current_label = r.current;
            c.target_spec = Some(r.spec.clone());
            c.state = CandidateState::Probed;
            slog.classify()
                .path(mp)
                .merge(&json!({
                    "spec": spec,
                    "snapshot_capable": true,
                    "current_label": c.current_label,
                    "target_spec": r.spec,
                }))
                .emit_success();
        }
        Err(e) => {
            api.note(Level::Warn, &format!("{mp}: {e}; leaving {spec} unchanged"));
            c.skip(SkipReason::LabelTooLong, Some(e.to_string()));
            slog.classify()
                .path(mp)
                .merge(&json!({
                    "spec": spec,
                    "snapshot_capable": true,
                    "reason": "label_too_long",
                    "error": e.to_string(),
                    "error_id": id_str(ErrorId::E_LABEL),
                    "exit_code": exit_code_for(ErrorId::E_LABEL),
                }))
                .emit_warn();
        }
    }
    c
}

pub(crate) fn run<E: FactsEmitter, A: AuditSink>(
    api: &BootEnv<E, A>,
    entries: Vec<MountEntry>,
    desired: &str,
    slog: &StageLogger<'_>,
) -> Vec<BootEnvCandidate> {
    entries
        .into_iter()
        .map(|e| classify(api, e, desired, slog))
        .collect()
}
