//! Directory-handle primitives for the rename install strategy.
//!
//! Sequence: `open_dir_nofollow(parent) -> openat(tmp) -> write -> fsync(tmp) -> renameat(tmp, final)
//! -> fsync(dirfd)`. The temporary name lives in the same directory as the target so the rename
//! never crosses filesystems.
use std::ffi::OsStr;
use std::os::fd::{AsFd, OwnedFd};
use std::path::Path;

use rustix::fs::{openat, renameat, unlinkat, AtFlags, Mode, OFlags, CWD};
use rustix::io::Errno;

use super::errno_to_io;
use crate::constants::TMP_SUFFIX;

/// Open a directory with `O_DIRECTORY` | `O_NOFOLLOW`.
///
/// # Errors
///
/// Returns an IO error if the directory cannot be opened.
pub fn open_dir_nofollow(dir: &Path) -> std::io::Result<OwnedFd> {
    openat(
        CWD,
        dir,
        OFlags::RDONLY | OFlags::DIRECTORY | OFlags::CLOEXEC | OFlags::NOFOLLOW,
        Mode::empty(),
    )
    .map_err(errno_to_io)
}

pub(crate) fn tmp_name_for(fname: &OsStr) -> String {
    format!(
        ".{}.{}{TMP_SUFFIX}",
        fname.to_string_lossy(),
        std::process::id()
    )
}

/// Sibling temporary file of `target`, created fresh with `mode`.
pub(crate) struct SiblingTmp {
    pub(crate) dirfd: OwnedFd,
    pub(crate) fd: OwnedFd,
    tmp_name: String,
}

impl SiblingTmp {
    pub(crate) fn create(target: &Path, mode: Mode) -> std::io::Result<Self> {
        let parent = target.parent().unwrap_or_else(|| Path::new("."));
        let fname = target
            .file_name()
            .ok_or_else(|| std::io::Error::new(std::io::ErrorKind::InvalidInput, "no file name"))?;
        let tmp_name = tmp_name_for(fname);
        let dirfd = open_dir_nofollow(parent)?;
        match unlinkat(&dirfd, tmp_name.as_str(), AtFlags::empty()) {
            Ok(()) => {}
            Err(e) if e == Errno::NOENT => {}
            Err(e) => return Err(errno_to_io(e)),
        }
        let fd = openat(
            &dirfd,
            tmp_name.as_str(),
            OFlags::WRONLY | OFlags::CREATE | OFlags::EXCL | OFlags::CLOEXEC,
            mode,
        )
        .map_err(errno_to_io)?;
        Ok(Self {
            dirfd,
            fd,
            tmp_name,
        })
    }

    /// Fsync the payload, rename it over `target`, then fsync the directory. The temporary
    /// file is removed when the rename does not happen.
    pub(crate) fn commit(self, target: &Path) -> std::io::Result<()> {
        let fname = target
            .file_name()
            .ok_or_else(|| std::io::Error::new(std::io::ErrorKind::InvalidInput, "no file name"))?;
        let moved = rustix::fs::fsync(&self.fd)
            .and_then(|()| renameat(&self.dirfd, self.tmp_name.as_str(), &self.dirfd, fname));
        if let Err(e) = moved {
            self.discard();
            return Err(errno_to_io(e));
        }
        let _ = rustix::fs::fsync(self.dirfd.as_fd());
        Ok(())
    }

    /// Remove the temporary file after a failed write.
    pub(crate) fn discard(self) {
        let _ = unlinkat(&self.dirfd, self.tmp_name.as_str(), AtFlags::empty());
    }
}
