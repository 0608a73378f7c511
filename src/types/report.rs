use std::collections::BTreeSet;
use std::path::PathBuf;

use serde::Serialize;

use super::candidate::{CandidateOutcome, CandidateState};
use crate::fs::SwapOutcome;

#[derive(Clone, Debug, Default, Serialize)]
pub struct InstallReport {
    pub live: PathBuf,
    pub backup: PathBuf,
    /// Ephemeral table, kept on disk after the swap; absent for a bare descriptor swap.
    pub staged: Option<PathBuf>,
    pub swap: SwapOutcome,
    /// Lines of the staged table, echoed after install.
    pub lines: Vec<String>,
}

#[derive(Clone, Debug, Default, Serialize)]
pub struct CreateReport {
    pub label: String,
    pub dry_run: bool,
    pub table_count: usize,
    pub vfs_count: usize,
    pub candidates: Vec<CandidateOutcome>,
    /// Absent when no candidate changed and the live table was left alone.
    pub install: Option<InstallReport>,
    pub warnings: Vec<String>,
    pub errors: Vec<String>,
}

impl CreateReport {
    #[must_use]
    pub fn snapshotted(&self) -> usize {
        self.candidates
            .iter()
            .filter(|c| matches!(c.state, CandidateState::Snapshotted | CandidateState::Planned))
            .count()
    }

    #[must_use]
    pub fn failed(&self) -> usize {
        self.candidates
            .iter()
            .filter(|c| matches!(c.state, CandidateState::Failed { .. }))
            .count()
    }

    /// 0 when every eligible candidate was snapshotted, 1 otherwise.
    #[must_use]
    pub fn exit_code(&self) -> i32 {
        i32::from(!self.errors.is_empty())
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct ListedSnapshot {
    /// PFS name, e.g. `ROOT:alpha`.
    pub name: String,
    /// Most recent label segment, absent for unlabeled snapshots.
    pub label: Option<String>,
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct ListReport {
    pub root: PathBuf,
    pub snapshots: Vec<ListedSnapshot>,
}

impl ListReport {
    #[must_use]
    pub fn count(&self) -> usize {
        self.snapshots.len()
    }

    #[must_use]
    pub fn labels(&self) -> BTreeSet<String> {
        self.snapshots
            .iter()
            .filter_map(|s| s.label.clone())
            .collect()
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct Activation {
    pub mount_point: String,
    pub spec_before: String,
    pub spec_after: String,
}

#[derive(Clone, Debug, Default, Serialize)]
pub struct ActivateReport {
    pub label: String,
    pub dry_run: bool,
    pub activated: Vec<Activation>,
    pub install: InstallReport,
    pub warnings: Vec<String>,
}
