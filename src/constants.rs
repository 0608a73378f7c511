//! Shared crate-wide constants for bootenv.
//!
//! Centralizes the on-disk conventions and kernel limits used across modules.

/// Separates the underlying device from the PFS name in a device specifier: `device@pfsname`.
pub const PFS_DELIM: char = '@';

/// Separates boot-environment label segments inside a PFS name: `pfsname:label`.
pub const BE_SEP: char = ':';

/// Longest filename the kernel accepts; bounds PFS names and therefore label chains.
pub const NAME_MAX: usize = 255;

/// Fixed field width of the mount structures; longer fstab fields are truncated to `MNAMELEN - 1` bytes.
pub const MNAMELEN: usize = 80;

/// Copy granularity for backup and install loops (one page).
pub const COPY_CHUNK: usize = 4096;

/// Conventional location of the live mount table.
pub const DEFAULT_FSTAB: &str = "/etc/fstab";

/// The single rolling backup, a sibling of the live table.
pub const DEFAULT_BACKUP: &str = "/etc/fstab.bak";

/// Where ephemeral mount tables are staged.
pub const DEFAULT_STAGING_DIR: &str = "/tmp";

/// Mount whose PFS namespace is scanned by `list`.
pub const DEFAULT_SNAPSHOT_ROOT: &str = "/";

/// Temporary filename suffix used by the rename install strategy, staged beside the live table.
pub const TMP_SUFFIX: &str = ".bootenv.tmp";

/// Characters that may not appear in a label: they would break the specifier or the table line.
pub const RESERVED_LABEL_CHARS: &[char] = &[BE_SEP, PFS_DELIM, '/', '#'];

/// UUIDv5 namespace tag for deterministic operation IDs.
pub const NS_TAG: &str = "https://bootenv/ops";
