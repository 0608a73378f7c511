// tests/helpers/testroot.rs
// A per-test root holding etc/fstab and real mount-point directories.

use std::path::{Path, PathBuf};

use bootenv::config::Config;
use bootenv::{BootEnv, ApiBuilder};

use super::{FakeBackend, FixedIdentity, FixedMountCount, TestAudit, TestEmitter, ROOT_UID};

#[derive(Debug)]
pub struct TestRoot {
    td: tempfile::TempDir,
}

impl TestRoot {
    pub fn new() -> Self {
        let td = tempfile::TempDir::new().expect("tempdir");
        std::fs::create_dir_all(td.path().join("etc")).expect("etc");
        Self { td }
    }

    pub fn path(&self) -> &Path {
        self.td.path()
    }

    pub fn join<P: AsRef<Path>>(&self, p: P) -> PathBuf {
        self.path().join(p)
    }

    /// Create `mnt/<name>` and return its absolute path as written in the table.
    pub fn mount_point(&self, name: &str) -> String {
        let p = self.join(format!("mnt/{name}"));
        std::fs::create_dir_all(&p).expect("mount point");
        p.display().to_string()
    }

    pub fn fstab(&self) -> PathBuf {
        self.join("etc/fstab")
    }

    pub fn backup(&self) -> PathBuf {
        self.join("etc/fstab.bak")
    }

    pub fn write_fstab(&self, body: &str) {
        std::fs::write(self.fstab(), body).expect("write fstab");
    }

    pub fn read_fstab(&self) -> String {
        std::fs::read_to_string(self.fstab()).expect("read fstab")
    }

    /// Device specifiers of the live table, in order.
    pub fn specs(&self) -> Vec<String> {
        self.read_fstab()
            .lines()
            .filter_map(|l| l.split_whitespace().next().map(str::to_string))
            .collect()
    }

    pub fn config(&self) -> Config {
        Config::rooted(self.path())
    }

    /// API over this root, run as the superuser, with the live count matching the table.
    pub fn api(
        &self,
        config: Config,
        backend: &FakeBackend,
        facts: &TestEmitter,
        audit: &TestAudit,
    ) -> BootEnv<TestEmitter, TestAudit> {
        let count = std::fs::read_to_string(self.fstab())
            .map(|s| bootenv::fs::fstab::entries(&s).count())
            .unwrap_or(0);
        ApiBuilder::new(facts.clone(), audit.clone(), config)
            .mount_status(Box::new(FixedMountCount(count)))
            .snapshot_backend(Box::new(backend.clone()))
            .identity(Box::new(FixedIdentity(ROOT_UID)))
            .build()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn testroot_unique() {
        let a = TestRoot::new();
        let b = TestRoot::new();
        assert_ne!(a.path(), b.path());
        let mp = a.mount_point("root");
        assert!(Path::new(&mp).is_dir());
        assert!(!b.join("mnt/root").exists());
    }
}
