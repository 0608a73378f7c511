//! Installer: stage the desired table, then run the two-phase swap and report what it did.

use std::fs::File;
use std::os::fd::{AsFd, AsRawFd};
use std::path::Path;
use std::time::Instant;

use log::Level;
use serde_json::json;

use crate::api::errors::{exit_code_for, id_str, install_error_id, ApiError, ErrorId};
use crate::api::BootEnv;
use crate::fs::{self, sha256_hex_of, stage_table, SwapOptions};
use crate::logging::{AuditSink, FactsEmitter, StageLogger};
use crate::types::{InstallReport, MountEntry};

/// Write `entries` to `staged` and install it over the live table.
pub(crate) fn run<E: FactsEmitter, A: AuditSink>(
    api: &BootEnv<E, A>,
    staged: &Path,
    entries: &[MountEntry],
    slog: &StageLogger<'_>,
) -> Result<InstallReport, ApiError> {
    let table = match stage_table(staged, entries) {
        Ok(t) => t,
        Err(source) => {
            let e = ApiError::Stage {
                path: staged.to_path_buf(),
                source,
            };
            slog.stage()
                .path(staged.display().to_string())
                .merge(&json!({
                    "error": e.to_string(),
                    "error_id": id_str(ErrorId::E_STAGE),
                    "exit_code": exit_code_for(ErrorId::E_STAGE),
                }))
                .emit_failure();
            return Err(e);
        }
    };
    slog.stage()
        .path(staged.display().to_string())
        .field("lines", json!(table.lines.len()))
        .emit_success();

    let live = api.config.paths.fstab.clone();
    let mut report = swap_table(api, &live, &table.file, Some(staged), slog)?;
    report.lines = table.lines;
    for line in &report.lines {
        api.note(Level::Info, line);
    }
    Ok(report)
}

/// Two-phase swap of `current` with the content of `new_table`, with facts and hashes.
pub(crate) fn swap_table<E: FactsEmitter, A: AuditSink>(
    api: &BootEnv<E, A>,
    current: &Path,
    new_table: &File,
    staged: Option<&Path>,
    slog: &StageLogger<'_>,
) -> Result<InstallReport, ApiError> {
    let backup = api.config.paths.backup.clone();
    let opts = SwapOptions {
        chunk_size: api.config.chunk_size,
        dry_run: api.config.dry_run,
        strategy: api.config.install,
    };
    let staged_display = staged.map_or_else(
        || format!("/dev/fd/{}", new_table.as_raw_fd()),
        |p| p.display().to_string(),
    );

    let before_hash = sha256_hex_of(current);
    let t0 = Instant::now();
    let outcome = fs::swap(current, &backup, new_table.as_fd(), &opts);
    let duration_ms = u64::try_from(t0.elapsed().as_millis()).unwrap_or(u64::MAX);

    match outcome {
        Ok(swap) => {
            let after_hash = sha256_hex_of(current);
            let backup_hash = if opts.dry_run {
                None
            } else {
                sha256_hex_of(&backup)
            };
            api.note(
                Level::Info,
                &format!(
                    "installed {staged_display} over {} ({} bytes, backup {})",
                    current.display(),
                    swap.staged_len,
                    backup.display()
                ),
            );
            slog.install()
                .path(current.display().to_string())
                .merge(&json!({
                    "backup": backup.display().to_string(),
                    "staged": staged_display,
                    "strategy": format!("{:?}", opts.strategy),
                    "previous_len": swap.previous_len,
                    "staged_len": swap.staged_len,
                    "backup_bytes": swap.backup_bytes,
                    "installed_bytes": swap.installed_bytes,
                    "hash_alg": "sha256",
                    "before_hash": before_hash,
                    "after_hash": after_hash,
                    "backup_hash": backup_hash,
                    "duration_ms": duration_ms,
                }))
                .emit_success();
            Ok(InstallReport {
                live: current.to_path_buf(),
                backup,
                staged: staged.map(Path::to_path_buf),
                swap,
                lines: Vec::new(),
            })
        }
        Err(e) => {
            let id = install_error_id(&e);
            api.note(Level::Error, &format!("install failed: {e}"));
            slog.install()
                .path(current.display().to_string())
                .merge(&json!({
                    "backup": backup.display().to_string(),
                    "staged": staged_display,
                    "failed_path": e.path().display().to_string(),
                    "error": e.to_string(),
                    "error_id": id_str(id),
                    "exit_code": exit_code_for(id),
                    "hash_alg": "sha256",
                    "before_hash": before_hash,
                    "duration_ms": duration_ms,
                }))
                .emit_failure();
            Err(ApiError::Install(e))
        }
    }
}
