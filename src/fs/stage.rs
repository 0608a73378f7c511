//! Ephemeral mount tables: the desired post-operation state, staged before the swap.
//!
//! Staged files are never removed by this crate. They remain as the record of what was
//! installed until the swap has been verified out of band. The staging directory is usually
//! world-writable, so the file is always created fresh through a directory handle and a
//! symlink at the staged name is refused.

use std::fs::File;
use std::io::Write as _;
use std::os::fd::OwnedFd;
use std::path::{Path, PathBuf};

use rustix::fs::{openat, statat, unlinkat, AtFlags, FileType, Mode, OFlags};
use rustix::io::Errno;

use super::atomic::open_dir_nofollow;
use super::{errno_to_io, fstab};
use crate::types::MountEntry;

#[derive(Debug)]
pub struct StagedTable {
    pub path: PathBuf,
    pub file: File,
    /// Rendered lines, in table order, without trailing newlines.
    pub lines: Vec<String>,
}

/// Name used by `create`: `.fstab.<label>_<pid>`.
#[must_use]
pub fn create_table_path(dir: &Path, label: &str) -> PathBuf {
    dir.join(format!(".fstab.{label}_{}", std::process::id()))
}

/// Name used by `activate`: `.fstab.<pid>.<label>`.
#[must_use]
pub fn activate_table_path(dir: &Path, label: &str) -> PathBuf {
    dir.join(format!(".fstab.{}.{label}", std::process::id()))
}

/// Remove a stale regular file left at `name` by an earlier run with the same pid.
/// Anything else at that name is an error.
fn clear_stale(dirfd: &OwnedFd, name: &std::ffi::OsStr) -> std::io::Result<()> {
    match statat(dirfd, name, AtFlags::SYMLINK_NOFOLLOW) {
        Ok(st) if FileType::from_raw_mode(st.st_mode) == FileType::RegularFile => {
            unlinkat(dirfd, name, AtFlags::empty()).map_err(errno_to_io)
        }
        Ok(_) => Err(std::io::Error::new(
            std::io::ErrorKind::AlreadyExists,
            "staged table name is taken by a non-regular file",
        )),
        Err(e) if e == Errno::NOENT => Ok(()),
        Err(e) => Err(errno_to_io(e)),
    }
}

/// Write `entries` to a freshly created `path` and flush them to disk.
///
/// # Errors
///
/// Returns an IO error if the staging directory cannot be opened, if something other than a
/// regular file occupies `path`, or if the file cannot be written.
pub fn stage_table(path: &Path, entries: &[MountEntry]) -> std::io::Result<StagedTable> {
    let parent = path.parent().unwrap_or_else(|| Path::new("."));
    let name = path
        .file_name()
        .ok_or_else(|| std::io::Error::new(std::io::ErrorKind::InvalidInput, "no file name"))?;
    std::fs::create_dir_all(parent)?;
    let dirfd = open_dir_nofollow(parent)?;
    clear_stale(&dirfd, name)?;
    let fd = openat(
        &dirfd,
        name,
        OFlags::RDWR | OFlags::CREATE | OFlags::EXCL | OFlags::NOFOLLOW | OFlags::CLOEXEC,
        Mode::from_bits_truncate(0o644),
    )
    .map_err(errno_to_io)?;
    let mut file = File::from(fd);
    let body = fstab::render(entries);
    file.write_all(body.as_bytes())?;
    file.sync_all()?;
    Ok(StagedTable {
        path: path.to_path_buf(),
        file,
        lines: body.lines().map(str::to_string).collect(),
    })
}
