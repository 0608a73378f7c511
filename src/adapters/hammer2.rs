//! HAMMER2 snapshot backend.
//!
//! On DragonFly the three operations map onto `HAMMER2IOC_INODE_GET` (identity probe),
//! `HAMMER2IOC_PFS_SNAPSHOT` and `HAMMER2IOC_PFS_GET` issued against a mount-point descriptor.
//! Every other target reports `Unsupported`, so all mounts classify as not snapshot-capable.

use super::snapshot::{MountHandle, PfsEntry, SnapshotBackend, SnapshotHandle};

#[derive(Debug, Copy, Clone, Default)]
pub struct Hammer2Backend;

impl SnapshotBackend for Hammer2Backend {
    fn probe(&self, mount: &MountHandle) -> std::io::Result<()> {
        #[cfg(target_os = "dragonfly")]
        {
            sys::inode_get(mount)
        }
        #[cfg(not(target_os = "dragonfly"))]
        {
            Err(unsupported(mount))
        }
    }

    fn create_snapshot(&self, mount: &MountHandle, name: &str) -> std::io::Result<SnapshotHandle> {
        #[cfg(target_os = "dragonfly")]
        {
            sys::pfs_snapshot(mount, name)?;
            Ok(SnapshotHandle {
                name: name.to_string(),
            })
        }
        #[cfg(not(target_os = "dragonfly"))]
        {
            let _ = name;
            Err(unsupported(mount))
        }
    }

    fn list_pfs(&self, mount: &MountHandle) -> std::io::Result<Vec<PfsEntry>> {
        #[cfg(target_os = "dragonfly")]
        {
            sys::pfs_list(mount)
        }
        #[cfg(not(target_os = "dragonfly"))]
        {
            Err(unsupported(mount))
        }
    }
}

#[cfg(not(target_os = "dragonfly"))]
fn unsupported(mount: &MountHandle) -> std::io::Error {
    std::io::Error::new(
        std::io::ErrorKind::Unsupported,
        format!("{}: HAMMER2 is not available on this platform", mount.path().display()),
    )
}

#[cfg(target_os = "dragonfly")]
#[allow(unsafe_code)]
pub(crate) mod sys {
    use std::os::fd::{AsFd, AsRawFd};

    use super::super::snapshot::{MountHandle, PfsEntry};
    use crate::constants::NAME_MAX;

    const PFSSUBTYPE_SNAPSHOT: u8 = 1;
    const KEY_END: u64 = u64::MAX;

    const IOC_INOUT: libc::c_ulong = 0xc000_0000;
    const IOCPARM_MASK: libc::c_ulong = 0x1fff;

    const fn iowr(group: u8, num: u8, len: usize) -> libc::c_ulong {
        IOC_INOUT
            | (((len as libc::c_ulong) & IOCPARM_MASK) << 16)
            | ((group as libc::c_ulong) << 8)
            | num as libc::c_ulong
    }

    /// `struct hammer2_ioc_pfs`
    #[repr(C)]
    struct IocPfs {
        name_key: u64,
        name_next: u64,
        pfs_type: u8,
        pfs_subtype: u8,
        reserved0012: u8,
        reserved0013: u8,
        pfs_flags: u32,
        reserved0018: u64,
        pfs_fsid: [u8; 16],
        pfs_clid: [u8; 16],
        name: [u8; NAME_MAX + 1],
    }

    impl IocPfs {
        fn zeroed() -> Self {
            Self {
                name_key: 0,
                name_next: 0,
                pfs_type: 0,
                pfs_subtype: 0,
                reserved0012: 0,
                reserved0013: 0,
                pfs_flags: 0,
                reserved0018: 0,
                pfs_fsid: [0; 16],
                pfs_clid: [0; 16],
                name: [0; NAME_MAX + 1],
            }
        }

        fn name(&self) -> String {
            let end = self.name.iter().position(|b| *b == 0).unwrap_or(NAME_MAX);
            String::from_utf8_lossy(&self.name[..end]).into_owned()
        }
    }

    /// `struct hammer2_ioc_inode`; the embedded inode data is opaque here.
    #[repr(C)]
    struct IocInode {
        flags: u32,
        unused: *mut libc::c_void,
        data_count: u64,
        inode_count: u64,
        ip_data: [u64; 128],
    }

    const PFS_GET: libc::c_ulong = iowr(b'h', 80, std::mem::size_of::<IocPfs>());
    const PFS_SNAPSHOT: libc::c_ulong = iowr(b'h', 84, std::mem::size_of::<IocPfs>());
    const INODE_GET: libc::c_ulong = iowr(b'h', 86, std::mem::size_of::<IocInode>());

    fn check(rc: libc::c_int) -> std::io::Result<()> {
        if rc < 0 {
            Err(std::io::Error::last_os_error())
        } else {
            Ok(())
        }
    }

    pub(crate) fn inode_get(mount: &MountHandle) -> std::io::Result<()> {
        let mut ino = IocInode {
            flags: 0,
            unused: std::ptr::null_mut(),
            data_count: 0,
            inode_count: 0,
            ip_data: [0; 128],
        };
        // SAFETY: `ino` matches the kernel layout for INODE_GET and outlives the call.
        let rc = unsafe {
            libc::ioctl(
                mount.as_fd().as_raw_fd(),
                INODE_GET,
                std::ptr::addr_of_mut!(ino),
            )
        };
        check(rc)
    }

    pub(crate) fn pfs_snapshot(mount: &MountHandle, name: &str) -> std::io::Result<()> {
        let mut pfs = IocPfs::zeroed();
        let bytes = name.as_bytes();
        if bytes.len() > NAME_MAX {
            return Err(std::io::Error::from_raw_os_error(libc::ENAMETOOLONG));
        }
        pfs.name[..bytes.len()].copy_from_slice(bytes);
        // SAFETY: `pfs` matches the kernel layout for PFS_SNAPSHOT and outlives the call.
        let rc = unsafe {
            libc::ioctl(
                mount.as_fd().as_raw_fd(),
                PFS_SNAPSHOT,
                std::ptr::addr_of_mut!(pfs),
            )
        };
        check(rc)
    }

    pub(crate) fn pfs_list(mount: &MountHandle) -> std::io::Result<Vec<PfsEntry>> {
        let mut out = Vec::new();
        let mut pfs = IocPfs::zeroed();
        while pfs.name_key != KEY_END {
            // SAFETY: `pfs` matches the kernel layout for PFS_GET and outlives the call.
            let rc = unsafe {
                libc::ioctl(
                    mount.as_fd().as_raw_fd(),
                    PFS_GET,
                    std::ptr::addr_of_mut!(pfs),
                )
            };
            check(rc)?;
            out.push(PfsEntry {
                name: pfs.name(),
                snapshot: pfs.pfs_subtype == PFSSUBTYPE_SNAPSHOT,
            });
            pfs.name_key = pfs.name_next;
        }
        Ok(out)
    }

    pub(crate) fn mounted_count() -> std::io::Result<usize> {
        // SAFETY: a null buffer asks only for the count.
        let rc = unsafe { libc::getfsstat(std::ptr::null_mut(), 0, libc::MNT_WAIT) };
        if rc < 0 {
            return Err(std::io::Error::last_os_error());
        }
        Ok(usize::try_from(rc).unwrap_or(0))
    }
}
