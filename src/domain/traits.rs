use anyhow::Result;
use std::fmt::Debug;
use std::path::Path;

/// Trait for invoking the external compose tool against a resolved file
pub trait ComposeRunner: Send + Sync + Debug {
    /// Run a lifecycle sub-command (`up -d`, `down`) for a service
    fn run(&self, service: &str, compose_file: &Path, args: &[&str]) -> Result<()>;

    /// Names the compose file reports as running (`ps --services`)
    fn running_services(&self, compose_file: &Path) -> Result<Vec<String>>;
}

/// Read-only probes against the container runtime.
///
/// Implementations answer `false` on any query failure: a missing
/// container is a normal outcome, not an error.
pub trait ContainerInspector: Send + Sync + Debug {
    fn exists(&self, name: &str) -> bool;

    fn is_running(&self, name: &str) -> bool;

    fn is_healthy(&self, name: &str) -> bool;
}
