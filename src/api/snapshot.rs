//! Orchestrator: one snapshot per eligible candidate, strictly in table order.
//!
//! Each candidate owns a fresh mount descriptor from the snapshot request until the request
//! returns; it is released on every path, and a final sweep releases anything still held.

use std::path::Path;

use log::Level;
use serde_json::json;

use crate::adapters::MountHandle;
use crate::api::errors::{exit_code_for, id_str, ErrorId};
use crate::api::BootEnv;
use crate::label;
use crate::logging::{AuditSink, FactsEmitter, StageLogger};
use crate::types::{BootEnvCandidate, CandidateState};

/// Returns one message per failed candidate; failures never stop the batch.
pub(crate) fn run<E: FactsEmitter, A: AuditSink>(
    api: &BootEnv<E, A>,
    candidates: &mut [BootEnvCandidate],
    slog: &StageLogger<'_>,
) -> Vec<String> {
    let mut errors = Vec::new();
    for c in candidates.iter_mut() {
        if let Some(err) = process(api, c, slog) {
            errors.push(err);
        }
        c.release_probe();
    }
    for c in candidates.iter_mut() {
        c.release_probe();
    }
    errors
}

fn process<E: FactsEmitter, A: AuditSink>(
    api: &BootEnv<E, A>,
    c: &mut BootEnvCandidate,
    slog: &StageLogger<'_>,
) -> Option<String> {
    if !c.is_eligible() {
        return None;
    }
    let target = c.target_spec.clone()?;
    let name = label::pfs_name(&target)?.to_string();
    let mp = c.entry.mount_point.clone();

    if api.config.dry_run {
        c.state = CandidateState::Planned;
        api.note(
            Level::Info,
            &format!("{mp}: would snapshot as {name}, mounting {target}"),
        );
        slog.snapshot()
            .path(mp)
            .merge(&json!({
                "snapshot": name,
                "target_spec": target,
                "planned": true,
            }))
            .emit_success();
        return None;
    }

    let result = match MountHandle::open(Path::new(&mp)) {
        Ok(handle) => {
            c.attach_probe(handle);
            c.state = CandidateState::SnapshotRequested;
            match c.probe() {
                Some(h) => api.backend.create_snapshot(h, &name),
                None => Err(std::io::Error::other("mount descriptor not held")),
            }
        }
        Err(e) => Err(e),
    };
    c.release_probe();

    match result {
        Ok(handle) => {
            api.note(Level::Info, &format!("{mp}: created snapshot {}", handle.name));
            slog.snapshot()
                .path(mp)
                .merge(&json!({
                    "snapshot": handle.name,
                    "target_spec": target,
                }))
                .emit_success();
            c.snapshot = Some(handle);
            c.state = CandidateState::Snapshotted;
            None
        }
        Err(e) => {
            let msg = format!("{mp}: snapshot {name} failed: {e}");
            api.note(Level::Error, &msg);
            slog.snapshot()
                .path(mp)
                .merge(&json!({
                    "snapshot": name,
                    "error": e.to_string(),
                    "error_id": id_str(ErrorId::E_SNAPSHOT),
                    "exit_code": exit_code_for(ErrorId::E_SNAPSHOT),
                }))
                .emit_failure();
            c.state = CandidateState::Failed {
                error: e.to_string(),
            };
            Some(msg)
        }
    }
}
