//! Boot-environment label algebra over device specifiers.
//!
//! A specifier `device@pfs` names a PFS; a labeled one is `device@pfs:label`. Relabeling
//! appends a segment (`device@pfs:old:new`), so the specifier carries the full lineage of the
//! snapshot it names. The PFS part after `@` is also the name of the snapshot that backs it.

use crate::constants::{BE_SEP, NAME_MAX, PFS_DELIM, RESERVED_LABEL_CHARS};
use crate::types::LabelError;

/// Check that `label` can be embedded in a specifier and a table line.
///
/// # Errors
///
/// `Empty`, `Reserved` for separators, slashes, `#` and whitespace, or `TooLong` when the
/// label alone reaches `NAME_MAX`.
pub fn validate(label: &str) -> Result<(), LabelError> {
    if label.is_empty() {
        return Err(LabelError::Empty);
    }
    if let Some(ch) = label
        .chars()
        .find(|c| c.is_whitespace() || c.is_control() || RESERVED_LABEL_CHARS.contains(c))
    {
        return Err(LabelError::Reserved {
            label: label.to_string(),
            ch,
        });
    }
    if label.len() >= NAME_MAX {
        return Err(LabelError::TooLong {
            label: label.to_string(),
            current: String::new(),
            needed: label.len(),
            max: NAME_MAX - 1,
        });
    }
    Ok(())
}

/// Split `device@pfs` at the first PFS delimiter.
#[must_use]
pub fn split_spec(spec: &str) -> Option<(&str, &str)> {
    spec.split_once(PFS_DELIM)
}

/// The PFS part of a specifier, which is also the snapshot name it refers to.
#[must_use]
pub fn pfs_name(spec: &str) -> Option<&str> {
    split_spec(spec).map(|(_, pfs)| pfs)
}

/// PFS name without any label segments: `ROOT` for `ROOT:a:b`.
#[must_use]
pub fn base_pfs(pfs: &str) -> &str {
    pfs.split_once(BE_SEP).map_or(pfs, |(base, _)| base)
}

/// Every label segment after the base PFS, e.g. `old:beta` for `dev@ROOT:old:beta`.
#[must_use]
pub fn current_label(spec: &str) -> Option<&str> {
    pfs_name(spec)
        .and_then(|pfs| pfs.split_once(BE_SEP))
        .map(|(_, chain)| chain)
}

/// Most recent label segment of a specifier or PFS name.
#[must_use]
pub fn extract_label(spec_or_pfs: &str) -> Option<&str> {
    let pfs = pfs_name(spec_or_pfs).unwrap_or(spec_or_pfs);
    pfs.rsplit_once(BE_SEP)
        .map(|(_, last)| last)
        .filter(|l| !l.is_empty())
}

/// Result of relabeling one specifier.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Relabel {
    /// Label chain already present, empty on first conversion.
    pub current: String,
    /// `original + ':' + label`.
    pub spec: String,
}

/// Append `label` to `spec`.
///
/// When a chain is present its length, counted from the separator, plus the new label must
/// stay within `NAME_MAX - 1`.
///
/// # Errors
///
/// `LabelError::TooLong` when the chain would overflow; the specifier is not modified.
pub fn relabel(spec: &str, label: &str) -> Result<Relabel, LabelError> {
    let current = current_label(spec).unwrap_or_default();
    if !current.is_empty() {
        let needed = BE_SEP.len_utf8() + current.len() + label.len();
        if needed > NAME_MAX - 1 {
            return Err(LabelError::TooLong {
                label: label.to_string(),
                current: current.to_string(),
                needed,
                max: NAME_MAX - 1,
            });
        }
    }
    Ok(Relabel {
        current: current.to_string(),
        spec: format!("{spec}{BE_SEP}{label}"),
    })
}
