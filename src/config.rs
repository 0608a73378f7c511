//! Run configuration threaded through every phase.
//!
//! Consumers construct a [`Config`] via presets (`system`, `rooted`) and then customize fields
//! before creating a [`BootEnv`](crate::BootEnv) instance. Nothing in the crate consults process-wide
//! switches; `dry_run` and `debug` travel with the value.

use std::path::{Path, PathBuf};

use crate::constants::{
    COPY_CHUNK, DEFAULT_BACKUP, DEFAULT_FSTAB, DEFAULT_SNAPSHOT_ROOT, DEFAULT_STAGING_DIR,
};

/// Filesystem locations the tool reads and writes.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Paths {
    /// Live mount table.
    pub fstab: PathBuf,
    /// Rolling backup written before every overwrite.
    pub backup: PathBuf,
    /// Directory for ephemeral tables.
    pub staging_dir: PathBuf,
    /// Mount whose PFS namespace `list` enumerates.
    pub snapshot_root: PathBuf,
}

impl Default for Paths {
    fn default() -> Self {
        Self {
            fstab: PathBuf::from(DEFAULT_FSTAB),
            backup: PathBuf::from(DEFAULT_BACKUP),
            staging_dir: PathBuf::from(DEFAULT_STAGING_DIR),
            snapshot_root: PathBuf::from(DEFAULT_SNAPSHOT_ROOT),
        }
    }
}

/// How the staged table replaces the live one once the backup exists.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum InstallStrategy {
    /// Overwrite the live file's bytes through its open descriptor, then truncate to the new length.
    #[default]
    InPlace,
    /// Write a sibling temporary file and `renameat` it over the live table, then fsync the directory.
    Rename,
}

#[derive(Clone, Debug)]
pub struct Config {
    pub dry_run: bool,
    pub debug: bool,
    pub paths: Paths,
    pub install: InstallStrategy,
    pub chunk_size: usize,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            dry_run: false,
            debug: false,
            paths: Paths::default(),
            install: InstallStrategy::InPlace,
            chunk_size: COPY_CHUNK,
        }
    }
}

impl Config {
    /// Conventional system locations, committing mode.
    #[must_use]
    pub fn system() -> Self {
        Self::default()
    }

    /// Every path relocated under `root`, e.g. for a chroot or a test tree.
    ///
    /// # Example
    /// ```rust
    /// use bootenv::config::Config;
    /// let cfg = Config::rooted("/mnt/altroot");
    /// assert_eq!(cfg.paths.fstab, std::path::PathBuf::from("/mnt/altroot/etc/fstab"));
    /// ```
    #[must_use]
    pub fn rooted(root: impl AsRef<Path>) -> Self {
        let root = root.as_ref();
        Self {
            paths: Paths {
                fstab: root.join("etc/fstab"),
                backup: root.join("etc/fstab.bak"),
                staging_dir: root.join("tmp"),
                snapshot_root: root.to_path_buf(),
            },
            ..Self::default()
        }
    }

    #[must_use]
    pub fn with_dry_run(mut self, dry_run: bool) -> Self {
        self.dry_run = dry_run;
        self
    }

    #[must_use]
    pub fn with_debug(mut self, debug: bool) -> Self {
        self.debug = debug;
        self
    }

    #[must_use]
    pub fn with_install_strategy(mut self, strategy: InstallStrategy) -> Self {
        self.install = strategy;
        self
    }

    /// A zero chunk size is clamped to one byte.
    #[must_use]
    pub fn with_chunk_size(mut self, chunk_size: usize) -> Self {
        self.chunk_size = chunk_size.max(1);
        self
    }

    #[must_use]
    pub fn with_paths(mut self, paths: Paths) -> Self {
        self.paths = paths;
        self
    }
}
