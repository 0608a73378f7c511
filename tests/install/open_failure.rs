//! A live table that stats but cannot be opened read/write is reported the same way in
//! dry-run and committing runs.

use bootenv::types::InstallError;
use bootenv::ApiError;

use crate::helpers::{FakeBackend, TestAudit, TestEmitter, TestRoot};

#[test]
fn unopenable_live_table_is_an_open_failure_in_both_modes() {
    let root = TestRoot::new();
    // A directory stats fine but refuses O_RDWR, whatever the caller's privileges.
    let live = root.join("etc/fstab.d");
    std::fs::create_dir_all(&live).unwrap();
    std::fs::write(live.join("inner"), "untouched").unwrap();
    std::fs::write(root.join("new.fstab"), "x\t/\tufs\trw\t1\t1\n").unwrap();

    for dry in [false, true] {
        let facts = TestEmitter::default();
        let api = root.api(
            root.config().with_dry_run(dry),
            &FakeBackend::default(),
            &facts,
            &TestAudit::default(),
        );
        let f = std::fs::File::open(root.join("new.fstab")).unwrap();
        let err = api.swap(&live, &f).unwrap_err();
        assert!(
            matches!(err, ApiError::Install(InstallError::OpenFailed { .. })),
            "dry={dry}: {err:?}"
        );
        assert_eq!(err.exit_code(), 3);

        let install = facts.stage("install");
        assert_eq!(install.len(), 1);
        assert_eq!(install[0].0, "failure");
        assert_eq!(install[0].1["error_id"], "E_OPEN");
        assert_eq!(install[0].1["exit_code"], 3);

        assert!(!root.backup().exists());
        assert!(live.is_dir());
        assert_eq!(std::fs::read_to_string(live.join("inner")).unwrap(), "untouched");
    }
}
