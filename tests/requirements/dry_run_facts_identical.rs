//! Two dry runs of the same create produce identical facts.

use serde_json::Value;

use crate::helpers::{FakeBackend, TestAudit, TestEmitter, TestRoot};

#[test]
fn repeated_dry_runs_emit_identical_facts() {
    let root = TestRoot::new();
    let a = root.mount_point("a");
    let b = root.mount_point("b");
    root.write_fstab(&format!(
        "/dev/da0s1d@ROOT\t{a}\thammer2\trw\t1\t1\n\
         /dev/da0s1d@VAR\t{b}\thammer2\trw\t2\t2\n\
         tmpfs\t/tmp\ttmpfs\trw\t0\t0\n"
    ));
    let backend = FakeBackend::default().capable(&a).capable(&b);

    let run = || -> Vec<Value> {
        let facts = TestEmitter::default();
        root.api(
            root.config().with_dry_run(true),
            &backend,
            &facts,
            &TestAudit::default(),
        )
        .create("alpha")
        .unwrap();
        facts.all()
    };
    let first = run();
    let second = run();
    assert!(!first.is_empty());
    assert_eq!(first, second);
    for f in &first {
        assert!(f.get("run_id").is_none());
        assert!(f.get("duration_ms").is_none());
        assert!(f.get("before_hash").is_none());
        assert_eq!(f["schema_version"], 1);
    }
}
