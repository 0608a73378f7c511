//! Caller identity, consulted once per invocation before any mutating phase.

pub trait Identity {
    fn effective_uid(&self) -> u32;

    fn is_superuser(&self) -> bool {
        self.effective_uid() == 0
    }
}

#[derive(Debug, Copy, Clone, Default)]
pub struct ProcessIdentity;

impl Identity for ProcessIdentity {
    fn effective_uid(&self) -> u32 {
        rustix::process::geteuid().as_raw()
    }
}
