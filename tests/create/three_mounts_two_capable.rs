//! Three mounts, two snapshot-capable and unlabeled, label "alpha".

use crate::helpers::{FakeBackend, TestAudit, TestEmitter, TestRoot};

#[test]
fn capable_mounts_are_suffixed_and_the_rest_pass_through() {
    let root = TestRoot::new();
    let mp_root = root.mount_point("root");
    let mp_var = root.mount_point("var");
    let mp_tmp = root.mount_point("tmp");
    let original = format!(
        "# static table\n\
         /dev/serno/S1.s1d@ROOT\t{mp_root}\thammer2\trw\t1\t1\n\
         /dev/serno/S1.s1d@VAR\t{mp_var}\thammer2\trw\t2\t2\n\
         tmpfs\t{mp_tmp}\ttmpfs\trw\t0\t0\n"
    );
    root.write_fstab(&original);

    let backend = FakeBackend::default().capable(&mp_root).capable(&mp_var);
    let facts = TestEmitter::default();
    let audit = TestAudit::default();
    let api = root.api(root.config(), &backend, &facts, &audit);

    let report = api.create("alpha").unwrap();
    assert_eq!(report.exit_code(), 0);
    assert_eq!(report.snapshotted(), 2);

    assert_eq!(
        root.specs(),
        vec![
            "/dev/serno/S1.s1d@ROOT:alpha".to_string(),
            "/dev/serno/S1.s1d@VAR:alpha".to_string(),
            "tmpfs".to_string(),
        ]
    );
    assert_eq!(root.read_fstab().lines().count(), 3);
    assert_eq!(std::fs::read_to_string(root.backup()).unwrap(), original);

    assert_eq!(
        backend.snapshot_names(),
        vec!["ROOT:alpha".to_string(), "VAR:alpha".to_string()]
    );

    let install = report.install.as_ref().unwrap();
    let staged = install.staged.clone().unwrap();
    assert!(staged.exists(), "ephemeral table is kept after install");
    assert_eq!(install.lines.len(), 3);
    assert!(audit
        .at(log::Level::Info)
        .iter()
        .any(|l| l.starts_with("/dev/serno/S1.s1d@ROOT:alpha")));

    let summary = facts.stage("create.summary");
    assert_eq!(summary.len(), 1);
    assert_eq!(summary[0].0, "success");
}

#[test]
fn first_conversion_logs_missing_label() {
    let root = TestRoot::new();
    let mp = root.mount_point("root");
    root.write_fstab(&format!("/dev/da0s1d@ROOT {mp} hammer2 rw 1 1\n"));
    let backend = FakeBackend::default().capable(&mp);
    let facts = TestEmitter::default();
    let audit = TestAudit::default();
    let api = root.api(root.config(), &backend, &facts, &audit);

    api.create("alpha").unwrap();
    assert!(audit
        .at(log::Level::Info)
        .iter()
        .any(|l| l.contains("no boot environment label found")));
}
