//! Error types shared by the label algebra, the installer and the API layer.
use std::path::PathBuf;

use thiserror::Error;

/// Why a label cannot be used, either up front or for one specific candidate.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LabelError {
    #[error("label is empty")]
    Empty,
    #[error("label {label:?} contains reserved character {ch:?}")]
    Reserved { label: String, ch: char },
    /// The chain `current:label` would not fit in a PFS name.
    #[error("label {label:?} is too long to follow {current:?} ({needed} > {max} bytes)")]
    TooLong {
        label: String,
        current: String,
        needed: usize,
        max: usize,
    },
}

/// Failures of the two-phase mount-table swap. None of the variants raised before the install
/// phase leave the live table touched.
#[derive(Debug, Error)]
pub enum InstallError {
    #[error("unable to stat {path}: {source}")]
    StatFailed {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("unable to open {path} read/write: {source}")]
    OpenFailed {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("backup {path} could not be written: {source}")]
    BackupFailed {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("writing new table into {path} failed: {source}")]
    WriteFailed {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl InstallError {
    #[must_use]
    pub fn path(&self) -> &std::path::Path {
        match self {
            Self::StatFailed { path, .. }
            | Self::OpenFailed { path, .. }
            | Self::BackupFailed { path, .. }
            | Self::WriteFailed { path, .. } => path,
        }
    }
}
