//! Live VFS mount-status query.

pub trait MountStatus {
    /// Number of filesystems the kernel currently reports as mounted.
    ///
    /// # Errors
    ///
    /// Returns an IO error when the mount status cannot be read.
    fn mounted_count(&self) -> std::io::Result<usize>;
}

/// Production query. `getfsstat(2)` on DragonFly; `/proc/self/mounts` elsewhere.
#[derive(Debug, Copy, Clone, Default)]
pub struct SystemMountStatus;

impl SystemMountStatus {
    #[cfg_attr(target_os = "dragonfly", allow(dead_code))]
    fn count_proc_mounts() -> std::io::Result<usize> {
        let content = std::fs::read_to_string("/proc/self/mounts")?;
        Ok(content
            .lines()
            .filter(|l| l.split_whitespace().count() >= 4)
            .count())
    }
}

impl MountStatus for SystemMountStatus {
    fn mounted_count(&self) -> std::io::Result<usize> {
        #[cfg(target_os = "dragonfly")]
        {
            super::hammer2::sys::mounted_count()
        }
        #[cfg(not(target_os = "dragonfly"))]
        {
            Self::count_proc_mounts()
        }
    }
}
