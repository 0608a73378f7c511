//! Collector: the static mount table, fully materialized, plus the live VFS count.

use log::Level;
use serde_json::json;

use crate::api::errors::{exit_code_for, id_str, ApiError};
use crate::api::BootEnv;
use crate::fs::fstab;
use crate::logging::{AuditSink, FactsEmitter, StageLogger};
use crate::types::{MountEntry, Roster};

pub(crate) fn run<E: FactsEmitter, A: AuditSink>(
    api: &BootEnv<E, A>,
    slog: &StageLogger<'_>,
) -> Result<Roster, ApiError> {
    let table = &api.config.paths.fstab;
    let path = table.display().to_string();

    let collected = api
        .mounts
        .mounted_count()
        .map_err(|e| ApiError::Collect(format!("mount status query failed: {e}")))
        .and_then(|vfs_count| {
            fstab::read_to_string(table)
                .map(|content| (vfs_count, content))
                .map_err(|e| ApiError::Collect(format!("unable to read {path}: {e}")))
        });
    let (vfs_count, content) = match collected {
        Ok(v) => v,
        Err(e) => {
            emit_failure(slog, &path, &e);
            return Err(e);
        }
    };

    let table_count = fstab::entries(&content).count();
    if table_count != vfs_count {
        api.note(
            Level::Warn,
            &format!(
                "mount table lists {table_count} entries but {vfs_count} filesystems are mounted; \
                 using the table"
            ),
        );
        slog.collect()
            .path(path.clone())
            .merge(&json!({
                "table_count": table_count,
                "vfs_count": vfs_count,
                "inconsistent": true,
            }))
            .emit_warn();
    }

    let mut entries: Vec<MountEntry> = Vec::new();
    if entries.try_reserve_exact(table_count).is_err() {
        let e = ApiError::OutOfMemory { count: table_count };
        emit_failure(slog, &path, &e);
        return Err(e);
    }
    entries.extend(fstab::entries(&content));

    api.note(
        Level::Debug,
        &format!("collected {} mount entries from {path}", entries.len()),
    );
    slog.collect()
        .path(path)
        .merge(&json!({
            "table_count": table_count,
            "vfs_count": vfs_count,
        }))
        .emit_success();

    Ok(Roster { entries, vfs_count })
}

fn emit_failure(slog: &StageLogger<'_>, path: &str, e: &ApiError) {
    slog.collect()
        .path(path)
        .merge(&json!({
            "error": e.to_string(),
            "error_id": id_str(e.id()),
            "exit_code": exit_code_for(e.id()),
        }))
        .emit_failure();
}
