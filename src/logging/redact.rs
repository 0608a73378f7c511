use serde_json::Value;
use time::format_description::well_known::Rfc3339;
use time::OffsetDateTime;

pub const TS_ZERO: &str = "1970-01-01T00:00:00Z";

pub fn now_iso() -> String {
    OffsetDateTime::now_utc().format(&Rfc3339).unwrap_or_else(|_| TS_ZERO.to_string())
}

/// Timestamp for facts: constant in dry-run for determinism, wall clock otherwise.
pub fn ts_for_mode(dry_run: bool) -> String {
    if dry_run {
        TS_ZERO.to_string()
    } else {
        now_iso()
    }
}

/// Apply redactions to a fact for comparison and reproducible dry-run output.
/// Zeroes timestamps and drops timings, run ids and content hashes.
pub fn redact_event(mut v: Value) -> Value {
    if let Some(obj) = v.as_object_mut() {
        obj.insert("ts".into(), Value::String(TS_ZERO.to_string()));
        obj.remove("duration_ms");
        obj.remove("run_id");
        obj.remove("before_hash");
        obj.remove("after_hash");
        obj.remove("backup_hash");
        obj.remove("hash_alg");
    }
    v
}
