//! Per-mount state carried from classification through snapshot creation.
use serde::Serialize;

use super::mount::MountEntry;
use crate::adapters::{MountHandle, SnapshotHandle};

/// Why a candidate passes through to the new table unchanged.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SkipReason {
    NotSnapshotCapable,
    NoPfsName,
    LabelTooLong,
}

/// `Pending -> Probed -> SnapshotRequested -> {Snapshotted | Failed}`; `Planned` replaces
/// `Snapshotted` in dry-run, `Skipped` is terminal for ineligible candidates.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum CandidateState {
    Pending,
    Probed,
    SnapshotRequested,
    Snapshotted,
    Planned,
    Failed { error: String },
    Skipped { reason: SkipReason, detail: Option<String> },
}

impl CandidateState {
    #[must_use]
    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            Self::Snapshotted | Self::Planned | Self::Failed { .. } | Self::Skipped { .. }
        )
    }
}

#[derive(Debug)]
pub struct BootEnvCandidate {
    pub entry: MountEntry,
    pub snapshot_capable: bool,
    /// Label chain already in the specifier; empty on first conversion.
    pub current_label: String,
    pub target_label: String,
    /// Specifier this run intends to install, set once labeling succeeded.
    pub target_spec: Option<String>,
    pub snapshot: Option<SnapshotHandle>,
    pub state: CandidateState,
    probe: Option<MountHandle>,
}

impl BootEnvCandidate {
    #[must_use]
    pub fn new(entry: MountEntry, target_label: impl Into<String>) -> Self {
        Self {
            entry,
            snapshot_capable: false,
            current_label: String::new(),
            target_label: target_label.into(),
            target_spec: None,
            snapshot: None,
            state: CandidateState::Pending,
            probe: None,
        }
    }

    pub(crate) fn skip(&mut self, reason: SkipReason, detail: Option<String>) {
        self.state = CandidateState::Skipped { reason, detail };
    }

    /// Eligible for snapshotting: capable, labeled and not yet processed.
    #[must_use]
    pub fn is_eligible(&self) -> bool {
        self.snapshot_capable
            && self.target_spec.is_some()
            && matches!(self.state, CandidateState::Probed)
    }

    /// Specifier to write into the new table: the target once a snapshot exists (or would,
    /// in dry-run), otherwise the original.
    #[must_use]
    pub fn table_spec(&self) -> &str {
        match (&self.state, &self.target_spec) {
            (CandidateState::Snapshotted | CandidateState::Planned, Some(t)) => t,
            _ => &self.entry.spec,
        }
    }

    #[must_use]
    pub fn table_entry(&self) -> MountEntry {
        self.entry.with_spec(self.table_spec())
    }

    pub(crate) fn attach_probe(&mut self, handle: MountHandle) {
        self.probe = Some(handle);
    }

    pub(crate) fn probe(&self) -> Option<&MountHandle> {
        self.probe.as_ref()
    }

    /// Close the mount descriptor, if any. Idempotent.
    pub fn release_probe(&mut self) {
        self.probe = None;
    }

    #[must_use]
    pub fn holds_probe(&self) -> bool {
        self.probe.is_some()
    }

    #[must_use]
    pub fn outcome(&self) -> CandidateOutcome {
        CandidateOutcome {
            mount_point: self.entry.mount_point.clone(),
            spec_before: self.entry.spec.clone(),
            spec_after: self.table_spec().to_string(),
            snapshot_capable: self.snapshot_capable,
            state: self.state.clone(),
            snapshot: self.snapshot.clone(),
        }
    }
}

/// Serializable summary of one candidate after a run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CandidateOutcome {
    pub mount_point: String,
    pub spec_before: String,
    pub spec_after: String,
    pub snapshot_capable: bool,
    pub state: CandidateState,
    pub snapshot: Option<SnapshotHandle>,
}
