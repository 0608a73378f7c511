//! fstab(5) reading and rendering.
//!
//! Rules: blank lines and `#` comments are skipped, fields are whitespace separated, the dump
//! and pass fields default to 0, and lines with fewer than four fields are ignored. Every field
//! is bounded to `MNAMELEN - 1` bytes; longer values are truncated silently.

use std::path::Path;

use crate::constants::MNAMELEN;
use crate::types::MountEntry;

fn bounded(field: &str) -> String {
    let max = MNAMELEN - 1;
    if field.len() <= max {
        return field.to_string();
    }
    let mut end = max;
    while !field.is_char_boundary(end) {
        end -= 1;
    }
    field[..end].to_string()
}

/// Parse one table line; `None` for comments, blanks and malformed rows.
#[must_use]
pub fn parse_line(line: &str) -> Option<MountEntry> {
    let line = line.trim();
    if line.is_empty() || line.starts_with('#') {
        return None;
    }
    let mut fields = line.split_whitespace();
    let spec = fields.next()?;
    let mount_point = fields.next()?;
    let vfstype = fields.next()?;
    let options = fields.next()?;
    let freq = fields.next().and_then(|f| f.parse().ok()).unwrap_or(0);
    let passno = fields.next().and_then(|f| f.parse().ok()).unwrap_or(0);
    Some(MountEntry {
        spec: bounded(spec),
        mount_point: bounded(mount_point),
        vfstype: bounded(vfstype),
        options: bounded(options),
        freq,
        passno,
    })
}

/// Entries of `content` in table order.
pub fn entries(content: &str) -> impl Iterator<Item = MountEntry> + '_ {
    content.lines().filter_map(parse_line)
}

/// Read the whole table at `path` into memory.
///
/// # Errors
///
/// Returns an IO error if the table cannot be read.
pub fn read_to_string(path: &Path) -> std::io::Result<String> {
    std::fs::read_to_string(path)
}

#[must_use]
pub fn render_line(e: &MountEntry) -> String {
    format!(
        "{}\t{}\t{}\t{}\t{}\t{}\n",
        e.spec, e.mount_point, e.vfstype, e.options, e.freq, e.passno
    )
}

#[must_use]
pub fn render<'a>(entries: impl IntoIterator<Item = &'a MountEntry>) -> String {
    entries.into_iter().map(render_line).collect()
}
