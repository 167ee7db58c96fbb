use crate::domain::ComposeRunner;
use crate::error::OrchestrationError;
use anyhow::{Context, Result};
use std::path::Path;
use std::process::{Command, Stdio};
use tracing::debug;

/// Invocation form of the compose tool, probed once at startup
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ComposeProgram {
    /// Binário standalone `docker-compose`
    Standalone,
    /// Plugin `docker compose`
    Plugin,
}

/// Adapter for the external compose executable.
///
/// The executable form is decided once by [`ComposeCli::detect`] and held
/// for the lifetime of the instance; it is never re-probed per call.
#[derive(Debug)]
pub struct ComposeCli {
    program: ComposeProgram,
}

impl ComposeCli {
    /// Probes for a compose executable: `docker-compose` first, then the
    /// `docker compose` plugin form. Fatal when neither answers.
    pub fn detect() -> Result<Self> {
        if command_available("docker-compose", &["--version"]) {
            debug!("usando docker-compose standalone");
            return Ok(Self {
                program: ComposeProgram::Standalone,
            });
        }

        if command_available("docker", &["compose", "version"]) {
            debug!("usando plugin docker compose");
            return Ok(Self {
                program: ComposeProgram::Plugin,
            });
        }

        Err(OrchestrationError::ComposeUnavailable.into())
    }

    fn command(&self, compose_file: &Path) -> Command {
        let mut cmd = match self.program {
            ComposeProgram::Standalone => Command::new("docker-compose"),
            ComposeProgram::Plugin => {
                let mut cmd = Command::new("docker");
                cmd.arg("compose");
                cmd
            }
        };

        cmd.arg("-f").arg(compose_file);
        cmd
    }
}

impl ComposeRunner for ComposeCli {
    fn run(&self, service: &str, compose_file: &Path, args: &[&str]) -> Result<()> {
        let output = self
            .command(compose_file)
            .args(args)
            // --remove-orphans descarta containers de versões antigas do arquivo
            .arg("--remove-orphans")
            .output()
            .with_context(|| format!("executando compose {:?} para {service}", args))?;

        if !output.status.success() {
            return Err(OrchestrationError::CommandFailed {
                code: output.status.code(),
                stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
                stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
            }
            .into());
        }

        debug!(
            "saída do compose para {service}: {}",
            String::from_utf8_lossy(&output.stdout).trim()
        );

        Ok(())
    }

    fn running_services(&self, compose_file: &Path) -> Result<Vec<String>> {
        let output = self
            .command(compose_file)
            .args(["ps", "--services", "--filter", "status=running"])
            .output()
            .with_context(|| format!("listando serviços de {:?}", compose_file))?;

        if !output.status.success() {
            return Err(OrchestrationError::CommandFailed {
                code: output.status.code(),
                stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
                stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
            }
            .into());
        }

        Ok(String::from_utf8_lossy(&output.stdout)
            .lines()
            .map(str::trim)
            .filter(|line| !line.is_empty())
            .map(str::to_string)
            .collect())
    }
}

fn command_available(cmd: &str, args: &[&str]) -> bool {
    Command::new(cmd)
        .args(args)
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .status()
        .map(|status| status.success())
        .unwrap_or(false)
}
