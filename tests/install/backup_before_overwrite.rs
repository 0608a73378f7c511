//! Standalone swap: the backup holds the exact pre-call bytes of the live table.

use std::io::Write as _;

use crate::helpers::{FakeBackend, TestAudit, TestEmitter, TestRoot};

const OLD: &str = "# keep me in the backup\n\
/dev/da0s1d@ROOT\t/\thammer2\trw\t1\t1\n\
/dev/da0s1d@VAR\t/var\thammer2\trw\t2\t2\n\
/dev/da0s1b\tnone\tswap\tsw\t0\t0\n";
const NEW: &str = "/dev/da0s1d@ROOT:alpha\t/\thammer2\trw\t1\t1\n";

fn new_table(root: &TestRoot, body: &str) -> std::fs::File {
    let mut f = std::fs::OpenOptions::new()
        .read(true)
        .write(true)
        .create(true)
        .truncate(true)
        .open(root.join("new.fstab"))
        .unwrap();
    f.write_all(body.as_bytes()).unwrap();
    f
}

#[test]
fn swap_backs_up_then_installs_shorter_table() {
    let root = TestRoot::new();
    root.write_fstab(OLD);
    let facts = TestEmitter::default();
    let api = root.api(
        root.config().with_chunk_size(16),
        &FakeBackend::default(),
        &facts,
        &TestAudit::default(),
    );

    let f = new_table(&root, NEW);
    let report = api.swap(&root.fstab(), &f).unwrap();
    assert_eq!(std::fs::read_to_string(root.backup()).unwrap(), OLD);
    assert_eq!(root.read_fstab(), NEW);
    assert_eq!(report.swap.previous_len, OLD.len() as u64);
    assert_eq!(report.swap.backup_bytes, OLD.len() as u64);
    assert_eq!(report.swap.installed_bytes, NEW.len() as u64);
    assert!(report.staged.is_none());

    let install = facts.stage("install");
    assert_eq!(install.len(), 1);
    assert_eq!(install[0].0, "success");
}

#[test]
fn existing_backup_is_replaced_not_appended() {
    let root = TestRoot::new();
    root.write_fstab(OLD);
    std::fs::write(root.backup(), "stale backup content that is longer than anything else\n".repeat(10)).unwrap();
    let api = root.api(
        root.config(),
        &FakeBackend::default(),
        &TestEmitter::default(),
        &TestAudit::default(),
    );
    let f = new_table(&root, NEW);
    api.swap(&root.fstab(), &f).unwrap();
    assert_eq!(std::fs::read_to_string(root.backup()).unwrap(), OLD);
}

#[test]
fn dry_run_swap_sizes_but_does_not_write() {
    let root = TestRoot::new();
    root.write_fstab(OLD);
    let api = root.api(
        root.config().with_dry_run(true),
        &FakeBackend::default(),
        &TestEmitter::default(),
        &TestAudit::default(),
    );
    let f = new_table(&root, NEW);
    let report = api.swap(&root.fstab(), &f).unwrap();
    assert_eq!(root.read_fstab(), OLD);
    assert!(!root.backup().exists());
    assert_eq!(report.swap.staged_len, NEW.len() as u64);
    assert_eq!(report.swap.installed_bytes, 0);
}
