//! A symlink planted at the staged table name is never followed.

use bootenv::fs::stage::create_table_path;
use bootenv::ApiError;

use crate::helpers::{FakeBackend, TestAudit, TestEmitter, TestRoot};

#[test]
fn planted_symlink_fails_staging_and_leaves_its_target_alone() {
    let root = TestRoot::new();
    let mp = root.mount_point("root");
    let table = format!("/dev/da0s1d@ROOT\t{mp}\thammer2\trw\t1\t1\n");
    root.write_fstab(&table);
    let backend = FakeBackend::default().capable(&mp);

    let victim = root.join("victim");
    std::fs::write(&victim, "SECRET CONTENT").unwrap();
    let staging = root.config().paths.staging_dir;
    std::fs::create_dir_all(&staging).unwrap();
    let staged = create_table_path(&staging, "alpha");
    std::os::unix::fs::symlink(&victim, &staged).unwrap();

    for dry in [true, false] {
        let facts = TestEmitter::default();
        let api = root.api(
            root.config().with_dry_run(dry),
            &backend,
            &facts,
            &TestAudit::default(),
        );
        let err = api.create("alpha").unwrap_err();
        assert!(matches!(err, ApiError::Stage { .. }), "dry={dry}: {err:?}");
        assert_eq!(err.exit_code(), 3);
        assert_eq!(facts.stage("stage")[0].1["error_id"], "E_STAGE");

        assert_eq!(std::fs::read_to_string(&victim).unwrap(), "SECRET CONTENT");
        assert!(std::fs::symlink_metadata(&staged).unwrap().file_type().is_symlink());
        assert_eq!(root.read_fstab(), table);
        assert!(!root.backup().exists());
    }
}
