//! Install facts fingerprint the live table before and after, and the backup.

use crate::helpers::{FakeBackend, TestAudit, TestEmitter, TestRoot};

#[test]
fn backup_hash_equals_before_hash() {
    let root = TestRoot::new();
    let mp = root.mount_point("root");
    root.write_fstab(&format!("/dev/da0s1d@ROOT\t{mp}\thammer2\trw\t1\t1\n"));
    let backend = FakeBackend::default().capable(&mp);
    let facts = TestEmitter::default();
    root.api(root.config(), &backend, &facts, &TestAudit::default())
        .create("alpha")
        .unwrap();

    let install = facts.stage("install");
    assert_eq!(install.len(), 1);
    let (decision, f) = &install[0];
    assert_eq!(decision, "success");
    assert_eq!(f["hash_alg"], "sha256");
    assert_eq!(f["before_hash"], f["backup_hash"]);
    assert_ne!(f["before_hash"], f["after_hash"]);
    assert_eq!(f["before_hash"].as_str().map(str::len), Some(64));
    assert_eq!(f["path"], root.fstab().display().to_string());
}
