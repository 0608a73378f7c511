#![deny(unsafe_code)]
//! bootenv: boot environments for copy-on-write root filesystems.
//!
//! Safety model highlights:
//! - `create` snapshots every snapshot-capable mount under one label, then rewrites the mount table to
//!   mount the new snapshots; `activate` rewrites the table to an existing label without snapshotting.
//! - The live mount table is only overwritten after a complete backup of it exists.
//! - Dry-run opens and sizes everything but issues no snapshot call and writes no byte to the live table.
//! - `unsafe` is denied crate-wide and allowed only in the DragonFly HAMMER2 ioctl shim.

pub mod adapters;
pub mod api;
pub mod config;
pub mod constants;
pub mod fs;
pub mod label;
pub mod logging;
pub mod types;

pub use api::*;
