use std::path::PathBuf;

use thiserror::Error;

use crate::types::{InstallError, LabelError};

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("{operation} requires the superuser (effective uid {euid})")]
    PermissionDenied { operation: &'static str, euid: u32 },
    #[error("out of memory allocating {count} mount entries")]
    OutOfMemory { count: usize },
    #[error("unable to collect mounts: {0}")]
    Collect(String),
    #[error("invalid label: {0}")]
    Label(#[from] LabelError),
    #[error("label {label:?} already names the boot environment mounted from {spec}")]
    DuplicateLabel { label: String, spec: String },
    #[error("unable to stage mount table {path}: {source}")]
    Stage {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error(transparent)]
    Install(#[from] InstallError),
    #[error("no boot environment labeled {0:?}")]
    UnknownBootEnv(String),
    #[error("unable to list snapshots under {path}: {source}")]
    List {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl ApiError {
    #[must_use]
    pub fn id(&self) -> ErrorId {
        match self {
            ApiError::PermissionDenied { .. } => ErrorId::E_PERMISSION,
            ApiError::OutOfMemory { .. } => ErrorId::E_ALLOC,
            ApiError::Collect(_) => ErrorId::E_COLLECT,
            ApiError::Label(_) => ErrorId::E_LABEL,
            ApiError::DuplicateLabel { .. } => ErrorId::E_DUPLICATE,
            ApiError::Stage { .. } => ErrorId::E_STAGE,
            ApiError::Install(e) => install_error_id(e),
            ApiError::UnknownBootEnv(_) => ErrorId::E_UNKNOWN_BE,
            ApiError::List { .. } => ErrorId::E_LIST,
        }
    }

    #[must_use]
    pub fn exit_code(&self) -> i32 {
        exit_code_for(self.id())
    }
}

#[must_use]
pub fn install_error_id(e: &InstallError) -> ErrorId {
    match e {
        InstallError::StatFailed { .. } => ErrorId::E_STAT,
        InstallError::OpenFailed { .. } => ErrorId::E_OPEN,
        InstallError::BackupFailed { .. } => ErrorId::E_BACKUP,
        InstallError::WriteFailed { .. } => ErrorId::E_WRITE,
    }
}

// Stable identifiers emitted in facts; SCREAMING_SNAKE_CASE matches the emitted strings.
#[allow(non_camel_case_types)]
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ErrorId {
    E_PERMISSION,
    E_ALLOC,
    E_COLLECT,
    E_LABEL,
    E_DUPLICATE,
    E_SNAPSHOT,
    E_STAGE,
    E_STAT,
    E_OPEN,
    E_BACKUP,
    E_WRITE,
    E_UNKNOWN_BE,
    E_LIST,
}

#[must_use]
pub const fn id_str(id: ErrorId) -> &'static str {
    match id {
        ErrorId::E_PERMISSION => "E_PERMISSION",
        ErrorId::E_ALLOC => "E_ALLOC",
        ErrorId::E_COLLECT => "E_COLLECT",
        ErrorId::E_LABEL => "E_LABEL",
        ErrorId::E_DUPLICATE => "E_DUPLICATE",
        ErrorId::E_SNAPSHOT => "E_SNAPSHOT",
        ErrorId::E_STAGE => "E_STAGE",
        ErrorId::E_STAT => "E_STAT",
        ErrorId::E_OPEN => "E_OPEN",
        ErrorId::E_BACKUP => "E_BACKUP",
        ErrorId::E_WRITE => "E_WRITE",
        ErrorId::E_UNKNOWN_BE => "E_UNKNOWN_BE",
        ErrorId::E_LIST => "E_LIST",
    }
}

/// 1 for user and per-candidate errors, 2 for allocation and system failures, 3 when the
/// mount table could not be staged or installed.
#[must_use]
pub const fn exit_code_for(id: ErrorId) -> i32 {
    match id {
        ErrorId::E_LABEL
        | ErrorId::E_DUPLICATE
        | ErrorId::E_SNAPSHOT
        | ErrorId::E_UNKNOWN_BE => 1,
        ErrorId::E_PERMISSION | ErrorId::E_ALLOC | ErrorId::E_COLLECT | ErrorId::E_LIST => 2,
        ErrorId::E_STAGE
        | ErrorId::E_STAT
        | ErrorId::E_OPEN
        | ErrorId::E_BACKUP
        | ErrorId::E_WRITE => 3,
    }
}
