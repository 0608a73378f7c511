pub mod hammer2;
pub mod identity;
pub mod mounts;
pub mod snapshot;

pub use hammer2::Hammer2Backend;
pub use identity::{Identity, ProcessIdentity};
pub use mounts::{MountStatus, SystemMountStatus};
pub use snapshot::{MountHandle, PfsEntry, SnapshotBackend, SnapshotHandle};
