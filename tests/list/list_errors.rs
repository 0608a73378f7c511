use bootenv::ApiError;

use crate::helpers::{FakeBackend, TestAudit, TestEmitter, TestRoot};

#[test]
fn failed_enumeration_is_an_error_and_a_negative_count() {
    let root = TestRoot::new();
    let facts = TestEmitter::default();
    let api = root.api(
        root.config(),
        &FakeBackend::default().broken_listing(),
        &facts,
        &TestAudit::default(),
    );
    assert!(matches!(api.list(), Err(ApiError::List { .. })));
    assert!(api.list_count() < 0);
    let list = facts.stage("list");
    assert_eq!(list[0].0, "failure");
    assert_eq!(list[0].1["error_id"], "E_LIST");
}

#[test]
fn missing_snapshot_root_is_an_error() {
    let root = TestRoot::new();
    let mut config = root.config();
    config.paths.snapshot_root = root.join("absent");
    let api = root.api(
        config,
        &FakeBackend::default(),
        &TestEmitter::default(),
        &TestAudit::default(),
    );
    assert!(matches!(api.list(), Err(ApiError::List { .. })));
}
