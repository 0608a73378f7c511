pub mod atomic;
pub mod fstab;
pub mod install;
pub mod meta;
pub mod stage;

pub use atomic::open_dir_nofollow;
pub use install::{swap, SwapOptions, SwapOutcome};
pub use meta::sha256_hex_of;
pub use stage::{stage_table, StagedTable};

pub(crate) fn errno_to_io(e: rustix::io::Errno) -> std::io::Error {
    std::io::Error::from_raw_os_error(e.raw_os_error())
}
