use bootenv::types::op_id;

use crate::helpers::{FakeBackend, TestAudit, TestEmitter, TestRoot};

#[test]
fn op_id_is_shared_by_dry_and_committing_runs() {
    let root = TestRoot::new();
    let mp = root.mount_point("root");
    root.write_fstab(&format!("/dev/da0s1d@ROOT\t{mp}\thammer2\trw\t1\t1\n"));
    let backend = FakeBackend::default().capable(&mp);
    let want = op_id("create", "alpha").to_string();

    for dry in [true, false] {
        let facts = TestEmitter::default();
        root.api(
            root.config().with_dry_run(dry),
            &backend,
            &facts,
            &TestAudit::default(),
        )
        .create("alpha")
        .unwrap();
        let all = facts.all();
        assert!(!all.is_empty());
        for f in all {
            assert_eq!(f["op_id"], want.as_str());
            assert_eq!(f["dry_run"], dry);
        }
    }
}

#[test]
fn committing_runs_carry_distinct_run_ids() {
    let root = TestRoot::new();
    let backend = FakeBackend::default().with_pfs("ROOT:alpha", true);
    let facts = TestEmitter::default();
    let api = root.api(root.config(), &backend, &facts, &TestAudit::default());
    api.list().unwrap();
    api.list().unwrap();
    let ids: Vec<_> = facts
        .stage("list")
        .into_iter()
        .map(|(_, f)| f["run_id"].clone())
        .collect();
    assert_eq!(ids.len(), 2);
    assert_ne!(ids[0], ids[1]);
}
