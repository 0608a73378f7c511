//! Two-phase mount-table replacement. Emits no logs; pure mechanism.
//!
//! Phase 1 copies the live table into the backup path chunk by chunk and verifies the byte
//! count. Phase 2 starts only after phase 1 succeeded, so every failure before it leaves the
//! live table untouched. In dry-run the live table is still opened read/write and sized, but no
//! backup is created and no byte is written.

use std::os::fd::{AsFd, AsRawFd, BorrowedFd};
use std::path::{Path, PathBuf};

use rustix::fs::{fstat, fsync, ftruncate, open, stat, Mode, OFlags};
use rustix::io::{pread, pwrite};
use serde::Serialize;

use super::atomic::SiblingTmp;
use super::errno_to_io;
use crate::config::InstallStrategy;
use crate::constants::COPY_CHUNK;
use crate::types::InstallError;

#[derive(Clone, Copy, Debug)]
pub struct SwapOptions {
    pub chunk_size: usize,
    pub dry_run: bool,
    pub strategy: InstallStrategy,
}

impl Default for SwapOptions {
    fn default() -> Self {
        Self {
            chunk_size: COPY_CHUNK,
            dry_run: false,
            strategy: InstallStrategy::InPlace,
        }
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct SwapOutcome {
    /// Size of the live table before the swap.
    pub previous_len: u64,
    /// Size of the staged table.
    pub staged_len: u64,
    pub backup_bytes: u64,
    pub installed_bytes: u64,
    pub dry_run: bool,
}

fn size_of(st: &rustix::fs::Stat) -> u64 {
    u64::try_from(st.st_size).unwrap_or(0)
}

/// Path used in errors for a bare descriptor.
fn fd_path(fd: BorrowedFd<'_>) -> PathBuf {
    PathBuf::from(format!("/dev/fd/{}", fd.as_raw_fd()))
}

/// Copy `len` bytes from `src` to `dst` at matching offsets, `chunk` bytes at a time.
/// Returns the number of bytes transferred; dry-run stops before the first write.
fn copy_chunks(
    src: BorrowedFd<'_>,
    dst: BorrowedFd<'_>,
    len: u64,
    chunk: usize,
    dry_run: bool,
) -> std::io::Result<u64> {
    let mut buf = vec![0u8; chunk.max(1)];
    let mut written: u64 = 0;
    while written < len {
        if dry_run {
            break;
        }
        let want = usize::try_from(len - written).map_or(buf.len(), |r| r.min(buf.len()));
        let n = pread(src, &mut buf[..want], written).map_err(errno_to_io)?;
        if n == 0 {
            return Err(std::io::Error::new(
                std::io::ErrorKind::UnexpectedEof,
                format!("source ended at {written} of {len} bytes"),
            ));
        }
        let mut off = 0;
        while off < n {
            let w = pwrite(dst, &buf[off..n], written + off as u64).map_err(errno_to_io)?;
            if w == 0 {
                return Err(std::io::ErrorKind::WriteZero.into());
            }
            off += w;
        }
        written += n as u64;
    }
    Ok(written)
}

fn backup_phase(
    live: BorrowedFd<'_>,
    live_len: u64,
    backup: &Path,
    opts: &SwapOptions,
) -> Result<u64, InstallError> {
    if opts.dry_run {
        return Ok(0);
    }
    let fail = |source| InstallError::BackupFailed {
        path: backup.to_path_buf(),
        source,
    };
    let bfd = open(
        backup,
        OFlags::RDWR | OFlags::CREATE | OFlags::TRUNC | OFlags::CLOEXEC,
        Mode::from_bits_truncate(0o644),
    )
    .map_err(|e| fail(errno_to_io(e)))?;
    let copied = copy_chunks(live, bfd.as_fd(), live_len, opts.chunk_size, false).map_err(fail)?;
    if copied != live_len {
        return Err(fail(std::io::Error::new(
            std::io::ErrorKind::WriteZero,
            format!("partial backup: {copied} of {live_len} bytes"),
        )));
    }
    fsync(&bfd).map_err(|e| fail(errno_to_io(e)))?;
    Ok(copied)
}

fn install_in_place(
    current: &Path,
    live: BorrowedFd<'_>,
    new_table: BorrowedFd<'_>,
    staged_len: u64,
    opts: &SwapOptions,
) -> Result<u64, InstallError> {
    let fail = |source| InstallError::WriteFailed {
        path: current.to_path_buf(),
        source,
    };
    let installed =
        copy_chunks(new_table, live, staged_len, opts.chunk_size, opts.dry_run).map_err(fail)?;
    if !opts.dry_run {
        ftruncate(live, staged_len).map_err(|e| fail(errno_to_io(e)))?;
        fsync(live).map_err(|e| fail(errno_to_io(e)))?;
    }
    Ok(installed)
}

fn install_by_rename(
    current: &Path,
    live_mode: Mode,
    new_table: BorrowedFd<'_>,
    staged_len: u64,
    opts: &SwapOptions,
) -> Result<u64, InstallError> {
    if opts.dry_run {
        return Ok(0);
    }
    let fail = |source| InstallError::WriteFailed {
        path: current.to_path_buf(),
        source,
    };
    let tmp = SiblingTmp::create(current, live_mode).map_err(fail)?;
    match copy_chunks(new_table, tmp.fd.as_fd(), staged_len, opts.chunk_size, false) {
        Ok(n) => {
            tmp.commit(current).map_err(fail)?;
            Ok(n)
        }
        Err(e) => {
            tmp.discard();
            Err(fail(e))
        }
    }
}

/// Back up `current` to `backup`, then replace its content with the staged table `new_table`.
///
/// # Errors
///
/// - `StatFailed` when `current` or the staged descriptor cannot be stat'ed.
/// - `OpenFailed` when `current` cannot be opened read/write.
/// - `BackupFailed` when the backup cannot be created or is incomplete.
/// - `WriteFailed` when copying the staged table fails after the backup exists.
pub fn swap(
    current: &Path,
    backup: &Path,
    new_table: BorrowedFd<'_>,
    opts: &SwapOptions,
) -> Result<SwapOutcome, InstallError> {
    let st = stat(current).map_err(|e| InstallError::StatFailed {
        path: current.to_path_buf(),
        source: errno_to_io(e),
    })?;
    let previous_len = size_of(&st);
    // Read/write even in dry-run so a table that could not be overwritten is reported.
    let live = open(current, OFlags::RDWR | OFlags::CLOEXEC, Mode::empty()).map_err(|e| {
        InstallError::OpenFailed {
            path: current.to_path_buf(),
            source: errno_to_io(e),
        }
    })?;

    let backup_bytes = backup_phase(live.as_fd(), previous_len, backup, opts)?;

    let nst = fstat(new_table).map_err(|e| InstallError::StatFailed {
        path: fd_path(new_table),
        source: errno_to_io(e),
    })?;
    let staged_len = size_of(&nst);

    let installed_bytes = match opts.strategy {
        InstallStrategy::InPlace => {
            install_in_place(current, live.as_fd(), new_table, staged_len, opts)?
        }
        InstallStrategy::Rename => install_by_rename(
            current,
            Mode::from_raw_mode(st.st_mode),
            new_table,
            staged_len,
            opts,
        )?,
    };

    Ok(SwapOutcome {
        previous_len,
        staged_len,
        backup_bytes,
        installed_bytes,
        dry_run: opts.dry_run,
    })
}
