//! `list`: snapshot PFSes visible from the snapshot root.

use log::Level;
use serde_json::json;

use crate::adapters::MountHandle;
use crate::api::errors::{exit_code_for, id_str, ApiError};
use crate::api::BootEnv;
use crate::label;
use crate::logging::{AuditSink, FactsEmitter, StageLogger};
use crate::types::{ListReport, ListedSnapshot};

pub(crate) fn run<E: FactsEmitter, A: AuditSink>(api: &BootEnv<E, A>) -> Result<ListReport, ApiError> {
    let tctx = api.audit_ctx("list", "");
    let slog = StageLogger::new(&tctx);
    let root = api.config.paths.snapshot_root.clone();

    if !api.identity.is_superuser() {
        api.note(
            Level::Warn,
            "list: not running as the superuser, the listing may be incomplete",
        );
    }

    let listed = MountHandle::open(&root).and_then(|h| api.backend.list_pfs(&h));
    let pfs = match listed {
        Ok(v) => v,
        Err(source) => {
            let e = ApiError::List {
                path: root.clone(),
                source,
            };
            slog.list()
                .path(root.display().to_string())
                .merge(&json!({
                    "error": e.to_string(),
                    "error_id": id_str(e.id()),
                    "exit_code": exit_code_for(e.id()),
                }))
                .emit_failure();
            return Err(e);
        }
    };

    let snapshots: Vec<ListedSnapshot> = pfs
        .into_iter()
        .filter(|p| p.snapshot)
        .map(|p| ListedSnapshot {
            label: label::extract_label(&p.name).map(str::to_string),
            name: p.name,
        })
        .collect();

    for s in &snapshots {
        match &s.label {
            Some(l) => api.note(Level::Info, &format!("{l}\t{}", s.name)),
            None => api.note(Level::Info, &s.name),
        }
    }

    let report = ListReport { root, snapshots };
    slog.list()
        .path(report.root.display().to_string())
        .merge(&json!({
            "count": report.count(),
            "labels": report.labels(),
        }))
        .emit_success();
    Ok(report)
}
