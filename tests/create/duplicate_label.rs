use bootenv::ApiError;

use crate::helpers::{FakeBackend, TestAudit, TestEmitter, TestRoot};

#[test]
fn reusing_the_current_label_fails_before_any_snapshot() {
    let root = TestRoot::new();
    let a = root.mount_point("a");
    let b = root.mount_point("b");
    let original = format!(
        "/dev/da0s1d@ROOT\t{a}\thammer2\trw\t1\t1\n\
         /dev/da0s1d@VAR:alpha\t{b}\thammer2\trw\t2\t2\n"
    );
    root.write_fstab(&original);
    let backend = FakeBackend::default().capable(&a).capable(&b);
    let facts = TestEmitter::default();
    let api = root.api(root.config(), &backend, &facts, &TestAudit::default());

    let err = api.create("alpha").unwrap_err();
    assert!(matches!(err, ApiError::DuplicateLabel { .. }));
    assert_eq!(err.exit_code(), 1);
    assert!(backend.calls().is_empty());
    assert_eq!(root.read_fstab(), original);
    assert!(!root.backup().exists());

    let summary = facts.stage("create.summary");
    assert_eq!(summary[0].1["error_id"], "E_DUPLICATE");
}
