use crate::domain::traits::{ComposeRunner, ContainerInspector};
use anyhow::{Result, bail};
use std::collections::{HashMap, HashSet};
use std::path::Path;
use std::sync::RwLock;

/// Recording fake of the compose executable.
///
/// Commands are logged as `<sub-command>:<service>` so tests can assert
/// both content and order; `up`/`down` update an internal running set that
/// backs `running_services`.
#[derive(Debug, Default)]
pub struct MockCompose {
    commands: RwLock<Vec<String>>,
    running: RwLock<HashSet<String>>,
    fail_on: RwLock<Option<String>>,
    ps_fails: RwLock<bool>,
}

impl MockCompose {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_fail_on(&self, operation: &str) {
        *self.fail_on.write().unwrap() = Some(operation.to_string());
    }

    pub fn set_ps_fails(&self) {
        *self.ps_fails.write().unwrap() = true;
    }

    pub fn set_running(&self, service: &str) {
        self.running.write().unwrap().insert(service.to_string());
    }

    pub fn is_running(&self, service: &str) -> bool {
        self.running.read().unwrap().contains(service)
    }

    pub fn get_commands(&self) -> Vec<String> {
        self.commands.read().unwrap().clone()
    }

    fn record_command(&self, cmd: &str) {
        self.commands.write().unwrap().push(cmd.to_string());
    }

    fn check_fail(&self, operation: &str) -> Result<()> {
        if let Some(ref fail_on) = *self.fail_on.read().unwrap() {
            if fail_on == operation {
                bail!("Mock failure on: {}", operation);
            }
        }
        Ok(())
    }
}

impl ComposeRunner for MockCompose {
    fn run(&self, service: &str, _compose_file: &Path, args: &[&str]) -> Result<()> {
        let operation = args.first().copied().unwrap_or("");
        self.record_command(&format!("{operation}:{service}"));
        self.check_fail(operation)?;

        match operation {
            "up" => {
                self.running.write().unwrap().insert(service.to_string());
            }
            "down" => {
                self.running.write().unwrap().remove(service);
            }
            _ => {}
        }

        Ok(())
    }

    fn running_services(&self, _compose_file: &Path) -> Result<Vec<String>> {
        self.record_command("ps");

        if *self.ps_fails.read().unwrap() {
            bail!("Mock failure on: ps");
        }

        Ok(self.running.read().unwrap().iter().cloned().collect())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MockContainerState {
    Running,
    Stopped,
}

/// Recording fake of the container runtime probes. Containers not added
/// are treated as absent, like a runtime that has never seen them.
#[derive(Debug, Default)]
pub struct MockInspector {
    containers: RwLock<HashMap<String, MockContainerState>>,
    healthy: RwLock<HashSet<String>>,
    probes: RwLock<Vec<String>>,
}

impl MockInspector {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_container(&self, name: &str, state: MockContainerState) {
        self.containers
            .write()
            .unwrap()
            .insert(name.to_string(), state);
    }

    pub fn set_healthy(&self, name: &str) {
        self.healthy.write().unwrap().insert(name.to_string());
    }

    pub fn get_probes(&self) -> Vec<String> {
        self.probes.read().unwrap().clone()
    }

    fn record_probe(&self, probe: &str) {
        self.probes.write().unwrap().push(probe.to_string());
    }
}

impl ContainerInspector for MockInspector {
    fn exists(&self, name: &str) -> bool {
        self.record_probe(&format!("exists:{name}"));
        self.containers.read().unwrap().contains_key(name)
    }

    fn is_running(&self, name: &str) -> bool {
        self.record_probe(&format!("is_running:{name}"));
        self.containers.read().unwrap().get(name) == Some(&MockContainerState::Running)
    }

    fn is_healthy(&self, name: &str) -> bool {
        self.record_probe(&format!("is_healthy:{name}"));
        self.healthy.read().unwrap().contains(name)
    }
}
