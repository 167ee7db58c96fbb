use serde::Deserialize;
use std::fmt;

/// One entry of the `services` list in the configuration file.
///
/// `compose_file` is either a path relative to the config file's directory
/// or an http(s) URL. Immutable once loaded.
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
pub struct ServiceDescriptor {
    pub name: String,
    pub enabled: bool,
    #[serde(default)]
    pub core: bool,
    pub compose_file: String,
}

impl ServiceDescriptor {
    pub fn is_remote(&self) -> bool {
        self.compose_file.starts_with("http")
    }
}

/// Status taxonomy a service can be reduced to. Derived on every query,
/// never persisted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ServiceStatus {
    /// Compose source could not be resolved
    NotConfigured,
    /// No container for this service exists
    NotRunning,
    /// Container exists but is not running
    Stopped,
    /// Running (compose `ps` source, no health information)
    Running,
    /// Running and the runtime reports a passing healthcheck
    RunningHealthy,
    /// Running without a passing healthcheck
    RunningUnhealthy,
    /// The status query itself failed
    Error,
}

impl ServiceStatus {
    pub fn is_running(&self) -> bool {
        matches!(
            self,
            ServiceStatus::Running | ServiceStatus::RunningHealthy | ServiceStatus::RunningUnhealthy
        )
    }
}

impl fmt::Display for ServiceStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            ServiceStatus::NotConfigured => "Not configured",
            ServiceStatus::NotRunning => "Not running",
            ServiceStatus::Stopped => "Stopped",
            ServiceStatus::Running => "Running",
            ServiceStatus::RunningHealthy => "Running (Healthy)",
            ServiceStatus::RunningUnhealthy => "Running (Unhealthy)",
            ServiceStatus::Error => "Error",
        };
        f.write_str(label)
    }
}
