//! Deterministic UUIDv5 identifiers for operations.
//!
//! The same operation on the same label yields the same `op_id`, so facts from a dry run
//! line up with the facts of the committing run that follows it.
use uuid::Uuid;

use crate::constants::NS_TAG;

fn namespace() -> Uuid {
    Uuid::new_v5(&Uuid::NAMESPACE_URL, NS_TAG.as_bytes())
}

#[must_use]
pub fn op_id(operation: &str, label: &str) -> Uuid {
    Uuid::new_v5(&namespace(), format!("{operation}:{label}").as_bytes())
}
