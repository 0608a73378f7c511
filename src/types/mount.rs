//! Mount-table rows and the roster built from one scan.
use serde::Serialize;

/// One row of the static mount table, as read at scan time.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MountEntry {
    /// Device specifier, e.g. `/dev/serno/X.s1d@ROOT:alpha`.
    pub spec: String,
    pub mount_point: String,
    pub vfstype: String,
    pub options: String,
    pub freq: i32,
    pub passno: i32,
}

impl MountEntry {
    /// Copy of this entry pointing at another device specifier.
    #[must_use]
    pub fn with_spec(&self, spec: impl Into<String>) -> Self {
        Self {
            spec: spec.into(),
            ..self.clone()
        }
    }
}

/// Ordered rows of the static table plus the live VFS count observed alongside them.
#[derive(Debug, Clone, Default)]
pub struct Roster {
    pub entries: Vec<MountEntry>,
    pub vfs_count: usize,
}

impl Roster {
    /// Table order is authoritative; the live count only feeds the consistency check.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    #[must_use]
    pub fn is_consistent(&self) -> bool {
        self.entries.len() == self.vfs_count
    }
}
