use bootenv::types::InstallError;
use bootenv::ApiError;

use crate::helpers::{FakeBackend, TestAudit, TestEmitter, TestRoot};

#[test]
fn missing_live_table_fails_with_stat_error_and_no_backup() {
    let root = TestRoot::new();
    std::fs::write(root.join("new.fstab"), "x\t/\tufs\trw\t1\t1\n").unwrap();
    let facts = TestEmitter::default();
    let api = root.api(
        root.config(),
        &FakeBackend::default(),
        &facts,
        &TestAudit::default(),
    );
    let f = std::fs::File::open(root.join("new.fstab")).unwrap();
    let err = api.swap(&root.join("etc/missing"), &f).unwrap_err();
    assert!(matches!(err, ApiError::Install(InstallError::StatFailed { .. })));
    assert_eq!(err.exit_code(), 3);
    assert!(!root.backup().exists());
    let install = facts.stage("install");
    assert_eq!(install[0].0, "failure");
    assert_eq!(install[0].1["error_id"], "E_STAT");
}

#[test]
fn unwritable_backup_leaves_live_table_untouched() {
    let root = TestRoot::new();
    let mp = root.mount_point("root");
    let original = format!("/dev/da0s1d@ROOT\t{mp}\thammer2\trw\t1\t1\n");
    root.write_fstab(&original);
    let mut config = root.config();
    config.paths.backup = root.join("no/such/dir/fstab.bak");
    let backend = FakeBackend::default().capable(&mp);
    let api = root.api(config, &backend, &TestEmitter::default(), &TestAudit::default());

    let err = api.create("alpha").unwrap_err();
    assert!(matches!(err, ApiError::Install(InstallError::BackupFailed { .. })));
    assert_eq!(api.create_status("beta"), 3);
    assert_eq!(root.read_fstab(), original);
}
