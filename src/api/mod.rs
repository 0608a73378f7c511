// Facade for API module; delegates to submodules under src/api/

use std::fs::File;
use std::path::Path;

use log::Level;

use crate::adapters::{
    Hammer2Backend, Identity, MountStatus, ProcessIdentity, SnapshotBackend, SystemMountStatus,
};
use crate::config::Config;
use crate::logging::audit::{new_run_id, AuditCtx, AuditMode};
use crate::logging::{ts_for_mode, AuditSink, FactsEmitter, StageLogger};
use crate::types::ids::op_id;
use crate::types::{ActivateReport, CreateReport, InstallReport, ListReport};

mod activate;
mod builder;
mod classify;
mod collect;
mod create;
pub mod errors;
mod install;
mod list;
mod snapshot;

pub use builder::ApiBuilder;
pub use errors::{ApiError, ErrorId};

pub struct BootEnv<E: FactsEmitter, A: AuditSink> {
    facts: E,
    audit: A,
    config: Config,
    mounts: Box<dyn MountStatus>,
    backend: Box<dyn SnapshotBackend>,
    identity: Box<dyn Identity>,
}

impl<E: FactsEmitter, A: AuditSink> BootEnv<E, A> {
    /// Wire the production collaborators: live mount status, HAMMER2 ioctls and the process identity.
    pub fn new(facts: E, audit: A, config: Config) -> Self {
        Self {
            facts,
            audit,
            config,
            mounts: Box::new(SystemMountStatus),
            backend: Box::new(Hammer2Backend),
            identity: Box::new(ProcessIdentity),
        }
    }

    #[must_use]
    pub fn with_mount_status(mut self, mounts: Box<dyn MountStatus>) -> Self {
        self.mounts = mounts;
        self
    }

    #[must_use]
    pub fn with_snapshot_backend(mut self, backend: Box<dyn SnapshotBackend>) -> Self {
        self.backend = backend;
        self
    }

    #[must_use]
    pub fn with_identity(mut self, identity: Box<dyn Identity>) -> Self {
        self.identity = identity;
        self
    }

    #[must_use]
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Snapshot every snapshot-capable mount under `label` and point the mount table at the snapshots.
    ///
    /// Per-mount failures are recorded in the report and do not abort the batch; the returned
    /// report's `exit_code()` is 1 when any of them occurred.
    ///
    /// # Errors
    ///
    /// Fatal failures: caller is not the superuser, invalid or duplicate label, roster
    /// allocation or collection failure, staging or install failure.
    pub fn create(&self, label: &str) -> Result<CreateReport, ApiError> {
        create::run(self, label)
    }

    /// Enumerate snapshot PFSes reachable from the snapshot root. Read-only.
    ///
    /// # Errors
    ///
    /// `ApiError::List` when the snapshot root cannot be opened or enumerated.
    pub fn list(&self) -> Result<ListReport, ApiError> {
        list::run(self)
    }

    /// Rewrite the mount table to mount the existing snapshots labeled `label`.
    ///
    /// # Errors
    ///
    /// `UnknownBootEnv` when no mount has such a snapshot; otherwise as for `create`.
    pub fn activate(&self, label: &str) -> Result<ActivateReport, ApiError> {
        activate::run(self, label)
    }

    /// Back up `current` and replace its content with the table open as `new_table`.
    ///
    /// # Errors
    ///
    /// `ApiError::Install` carrying the failed phase; the live table is untouched unless the
    /// failure is a write failure after a complete backup exists.
    pub fn swap(&self, current: &Path, new_table: &File) -> Result<InstallReport, ApiError> {
        let tctx = self.audit_ctx("swap", "");
        let slog = StageLogger::new(&tctx);
        install::swap_table(self, current, new_table, None, &slog)
    }

    /// `create` for a command-line boundary: 0 on success, 1 on general failure, 2 or more on
    /// allocation or system failure.
    pub fn create_status(&self, label: &str) -> i32 {
        match self.create(label) {
            Ok(report) => report.exit_code(),
            Err(e) => {
                self.note(Level::Error, &format!("create {label}: {e}"));
                e.exit_code()
            }
        }
    }

    /// `list` for a command-line boundary: the snapshot count, or the negated exit code on error.
    pub fn list_count(&self) -> i64 {
        match self.list() {
            Ok(report) => i64::try_from(report.count()).unwrap_or(i64::MAX),
            Err(e) => {
                self.note(Level::Error, &format!("list: {e}"));
                -i64::from(e.exit_code())
            }
        }
    }

    /// `activate` for a command-line boundary, with the exit codes of `create_status`.
    pub fn activate_status(&self, label: &str) -> i32 {
        match self.activate(label) {
            Ok(_) => 0,
            Err(e) => {
                self.note(Level::Error, &format!("activate {label}: {e}"));
                e.exit_code()
            }
        }
    }

    fn audit_ctx(&self, operation: &str, label: &str) -> AuditCtx<'_> {
        let dry = self.config.dry_run;
        AuditCtx::new(
            &self.facts as &dyn FactsEmitter,
            op_id(operation, label).to_string(),
            new_run_id(),
            ts_for_mode(dry),
            AuditMode {
                dry_run: dry,
                redact: dry,
            },
        )
    }

    /// Human-readable audit line. Debug lines require `config.debug`; dry-run lines are prefixed.
    fn note(&self, level: Level, msg: &str) {
        if level == Level::Debug && !self.config.debug {
            return;
        }
        if self.config.dry_run {
            self.audit.log(level, &format!("[dry-run] {msg}"));
        } else {
            self.audit.log(level, msg);
        }
    }

    fn require_superuser(&self, operation: &'static str) -> Result<(), ApiError> {
        if self.identity.is_superuser() {
            Ok(())
        } else {
            Err(ApiError::PermissionDenied {
                operation,
                euid: self.identity.effective_uid(),
            })
        }
    }
}
