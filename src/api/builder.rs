use crate::adapters::{Identity, MountStatus, SnapshotBackend};
use crate::config::Config;
use crate::logging::{AuditSink, FactsEmitter};

/// Builder for constructing a `BootEnv` with ergonomic chaining.
/// Mirrors `BootEnv::new(...).with_*` but keeps collaborator wiring in one place at call sites.
pub struct ApiBuilder<E: FactsEmitter, A: AuditSink> {
    facts: E,
    audit: A,
    config: Config,
    mounts: Option<Box<dyn MountStatus>>,
    backend: Option<Box<dyn SnapshotBackend>>,
    identity: Option<Box<dyn Identity>>,
}

impl<E: FactsEmitter, A: AuditSink> ApiBuilder<E, A> {
    pub fn new(facts: E, audit: A, config: Config) -> Self {
        Self {
            facts,
            audit,
            config,
            mounts: None,
            backend: None,
            identity: None,
        }
    }

    #[must_use]
    pub fn mount_status(mut self, mounts: Box<dyn MountStatus>) -> Self {
        self.mounts = Some(mounts);
        self
    }

    #[must_use]
    pub fn snapshot_backend(mut self, backend: Box<dyn SnapshotBackend>) -> Self {
        self.backend = Some(backend);
        self
    }

    #[must_use]
    pub fn identity(mut self, identity: Box<dyn Identity>) -> Self {
        self.identity = Some(identity);
        self
    }

    pub fn build(self) -> super::BootEnv<E, A> {
        let mut api = super::BootEnv::new(self.facts, self.audit, self.config);
        if let Some(m) = self.mounts {
            api = api.with_mount_status(m);
        }
        if let Some(b) = self.backend {
            api = api.with_snapshot_backend(b);
        }
        if let Some(i) = self.identity {
            api = api.with_identity(i);
        }
        api
    }
}
