//! Dry-run issues no snapshot request and leaves the live table and backup alone.

use bootenv::logging::TS_ZERO;
use bootenv::types::CandidateState;

use crate::helpers::{FakeBackend, TestAudit, TestEmitter, TestRoot};

#[test]
fn dry_run_create_is_pure() {
    let root = TestRoot::new();
    let mp_root = root.mount_point("root");
    let mp_var = root.mount_point("var");
    let original = format!(
        "/dev/da0s1d@ROOT\t{mp_root}\thammer2\trw\t1\t1\n\
         /dev/da0s1d@VAR\t{mp_var}\thammer2\trw\t2\t2\n"
    );
    root.write_fstab(&original);
    let backend = FakeBackend::default().capable(&mp_root).capable(&mp_var);
    let facts = TestEmitter::default();
    let audit = TestAudit::default();
    let api = root.api(root.config().with_dry_run(true), &backend, &facts, &audit);

    let report = api.create("alpha").unwrap();
    assert!(report.dry_run);
    assert!(backend.calls().is_empty());
    assert_eq!(root.read_fstab(), original);
    assert!(!root.backup().exists());

    assert!(report
        .candidates
        .iter()
        .all(|c| c.state == CandidateState::Planned));
    assert_eq!(report.candidates[0].spec_after, "/dev/da0s1d@ROOT:alpha");

    // The preview of the would-be table is still staged.
    let staged = std::fs::read_to_string(report.install.unwrap().staged.unwrap()).unwrap();
    assert!(staged.contains("/dev/da0s1d@VAR:alpha"));

    for f in facts.all() {
        assert_eq!(f["dry_run"], true);
        assert_eq!(f["ts"], TS_ZERO);
    }
    let lines = audit.at(log::Level::Info);
    assert!(!lines.is_empty());
    assert!(lines.iter().all(|l| l.starts_with("[dry-run] ")));
}
