//! Snapshot-capable filesystem seam: identity probe, snapshot creation and PFS enumeration.

use std::os::fd::{AsFd, BorrowedFd, OwnedFd};
use std::path::{Path, PathBuf};

use rustix::fs::{open, Mode, OFlags};
use serde::Serialize;

use crate::fs::errno_to_io;

/// Read-only descriptor on a mount point, used as the target of filesystem control operations.
/// Dropping the handle closes the descriptor.
#[derive(Debug)]
pub struct MountHandle {
    path: PathBuf,
    fd: OwnedFd,
}

impl MountHandle {
    /// Open `path` read-only and non-blocking.
    ///
    /// # Errors
    ///
    /// Returns the OS error when the mount point cannot be opened.
    pub fn open(path: &Path) -> std::io::Result<Self> {
        let fd = open(
            path,
            OFlags::RDONLY | OFlags::NONBLOCK | OFlags::CLOEXEC,
            Mode::empty(),
        )
        .map_err(errno_to_io)?;
        Ok(Self {
            path: path.to_path_buf(),
            fd,
        })
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl AsFd for MountHandle {
    fn as_fd(&self) -> BorrowedFd<'_> {
        self.fd.as_fd()
    }
}

/// Name of a snapshot PFS created by a backend.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SnapshotHandle {
    pub name: String,
}

/// One PFS visible through a mount, as reported by the filesystem.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PfsEntry {
    pub name: String,
    /// True for the snapshot subtype; masters and slaves report false.
    pub snapshot: bool,
}

pub trait SnapshotBackend {
    /// Filesystem-identity probe. `Ok` means the mount supports copy-on-write snapshots.
    ///
    /// # Errors
    ///
    /// Any error marks the mount as not snapshot-capable.
    fn probe(&self, mount: &MountHandle) -> std::io::Result<()>;

    /// Create a named, read-only, point-in-time snapshot of the PFS mounted at `mount`.
    ///
    /// # Errors
    ///
    /// Returns the OS error reported by the filesystem.
    fn create_snapshot(&self, mount: &MountHandle, name: &str) -> std::io::Result<SnapshotHandle>;

    /// Enumerate every PFS reachable through `mount`, in the filesystem's key order.
    ///
    /// # Errors
    ///
    /// Returns an error when the mount is not a snapshot-capable filesystem.
    fn list_pfs(&self, mount: &MountHandle) -> std::io::Result<Vec<PfsEntry>>;
}
