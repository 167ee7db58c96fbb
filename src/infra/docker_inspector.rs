use crate::domain::ContainerInspector;
use std::process::Command;

/// Queries the container runtime directly, one `docker` invocation per
/// probe, filtered by exact container name.
#[derive(Debug, Default)]
pub struct DockerInspector;

impl DockerInspector {
    pub fn new() -> Self {
        Self
    }
}

impl ContainerInspector for DockerInspector {
    fn exists(&self, name: &str) -> bool {
        let filter = format!("name=^/{name}$");
        docker_stdout(&["ps", "-a", "--filter", &filter, "--format", "{{.Names}}"])
            .map(|out| !out.trim().is_empty())
            .unwrap_or(false)
    }

    fn is_running(&self, name: &str) -> bool {
        let filter = format!("name=^/{name}$");
        docker_stdout(&["ps", "--filter", &filter, "--format", "{{.Names}}"])
            .map(|out| !out.trim().is_empty())
            .unwrap_or(false)
    }

    fn is_healthy(&self, name: &str) -> bool {
        docker_stdout(&["inspect", "--format", "{{.State.Health.Status}}", name])
            .map(|out| out.trim() == "healthy")
            .unwrap_or(false)
    }
}

fn docker_stdout(args: &[&str]) -> Option<String> {
    let output = Command::new("docker").args(args).output().ok()?;

    if !output.status.success() {
        return None;
    }

    Some(String::from_utf8_lossy(&output.stdout).into_owned())
}
