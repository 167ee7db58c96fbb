use crate::domain::{ComposeRunner, ContainerInspector, ServiceDescriptor, ServiceStatus};
use crate::error::OrchestrationError;
use crate::infra::{ComposeCli, Config, DockerInspector};
use crate::services::ComposeFileResolver;
use anyhow::Result;
use std::sync::Arc;
use tracing::{debug, error, info, warn};

/// Where service status is read from.
///
/// The two policies are mutually exclusive: either the compose tool's own
/// `ps` listing (two-state, no health) or direct runtime inspection
/// (four-state, with health). Never a blend of both.
#[derive(Debug, Clone)]
pub enum StatusSource {
    ComposePs,
    Inspector(Arc<dyn ContainerInspector>),
}

/// Orchestrates start, stop and status of the configured services.
///
/// All work is sequential and blocking; batch operations are best-effort
/// and keep going when an individual service fails.
pub struct ServiceManager {
    config: Config,
    resolver: ComposeFileResolver,
    compose: Arc<dyn ComposeRunner>,
    status_source: StatusSource,
}

impl ServiceManager {
    /// Wires the production adapters: the compose executable probed once at
    /// startup and the requested status source.
    pub fn detect(config: Config, status_source: StatusSource) -> Result<Self> {
        let compose = Arc::new(ComposeCli::detect()?);
        Ok(Self::with_runtime(config, compose, status_source))
    }

    pub fn with_runtime(
        config: Config,
        compose: Arc<dyn ComposeRunner>,
        status_source: StatusSource,
    ) -> Self {
        let resolver = ComposeFileResolver::new(config.base_dir());
        Self {
            config,
            resolver,
            compose,
            status_source,
        }
    }

    /// Default status source: direct runtime inspection
    pub fn inspector_source() -> StatusSource {
        StatusSource::Inspector(Arc::new(DockerInspector::new()))
    }

    /// Starts one service. Fails fast, without invoking the compose tool,
    /// when the service is unknown or disabled. Does not wait for health.
    pub fn start_service(&self, name: &str) -> Result<()> {
        if !self.config.is_service_enabled(name) {
            return Err(match self.config.find(name) {
                Some(_) => OrchestrationError::NotEnabled(name.to_string()),
                None => OrchestrationError::UnknownService(name.to_string()),
            }
            .into());
        }

        let descriptor = self.descriptor(name)?;
        let compose_file = self.resolver.resolve(descriptor)?;

        info!("Iniciando {name}...");
        self.compose.run(name, &compose_file, &["up", "-d"])
    }

    /// Stops one service. Disabled services are stopped too, so a service
    /// turned off in the config can still be cleaned up.
    pub fn stop_service(&self, name: &str) -> Result<()> {
        let descriptor = self.descriptor(name)?;
        let compose_file = self.resolver.resolve(descriptor)?;

        info!("Parando {name}...");
        self.compose.run(name, &compose_file, &["down"])
    }

    /// Starts every enabled service in configuration order, continuing even
    /// if individual operations fail.
    pub fn start_all_services(&self) -> Result<()> {
        for svc in self.config.enabled_services() {
            match self.start_service(&svc.name) {
                Ok(()) => debug!("Serviço {} iniciado", svc.name),
                Err(e) => error!("Falha ao iniciar {}: {:#}", svc.name, e),
            }
        }

        Ok(())
    }

    /// Stops every enabled service in reverse configuration order, so
    /// dependents go down before their dependencies.
    pub fn stop_all_services(&self) -> Result<()> {
        for svc in self.config.enabled_services().into_iter().rev() {
            match self.stop_service(&svc.name) {
                Ok(()) => debug!("Serviço {} parado", svc.name),
                Err(e) => error!("Falha ao parar {}: {:#}", svc.name, e),
            }
        }

        Ok(())
    }

    /// Classifies one service. Never fails: an unresolvable compose source
    /// is `NotConfigured` and a failed query is `Error`.
    pub fn service_status(&self, name: &str) -> ServiceStatus {
        let Some(descriptor) = self.config.find(name) else {
            return ServiceStatus::NotConfigured;
        };

        let Ok(compose_file) = self.resolver.resolve(descriptor) else {
            return ServiceStatus::NotConfigured;
        };

        match &self.status_source {
            StatusSource::ComposePs => match self.compose.running_services(&compose_file) {
                Ok(running) => {
                    if running.iter().any(|svc| svc == name) {
                        ServiceStatus::Running
                    } else {
                        ServiceStatus::Stopped
                    }
                }
                Err(e) => {
                    warn!("Falha ao consultar status de {name}: {:#}", e);
                    ServiceStatus::Error
                }
            },
            StatusSource::Inspector(inspector) => {
                if inspector.is_running(name) {
                    if inspector.is_healthy(name) {
                        ServiceStatus::RunningHealthy
                    } else {
                        ServiceStatus::RunningUnhealthy
                    }
                } else if inspector.exists(name) {
                    ServiceStatus::Stopped
                } else {
                    ServiceStatus::NotRunning
                }
            }
        }
    }

    /// Status of every configured service (enabled or not), in
    /// configuration order.
    pub fn all_services_status(&self) -> Vec<(String, ServiceStatus)> {
        self.config
            .services()
            .iter()
            .map(|svc| (svc.name.clone(), self.service_status(&svc.name)))
            .collect()
    }

    /// Fleet-wide readiness gate: true only when every enabled service is
    /// exactly `Running (Healthy)`.
    pub fn check_all_services_healthy(&self) -> bool {
        self.healthy_gate(&self.config.enabled_services())
    }

    /// Same gate restricted to core services
    pub fn check_core_services_healthy(&self) -> bool {
        self.healthy_gate(&self.config.core_services())
    }

    fn healthy_gate(&self, services: &[&ServiceDescriptor]) -> bool {
        let mut all_healthy = true;

        for svc in services {
            let status = self.service_status(&svc.name);
            if status != ServiceStatus::RunningHealthy {
                warn!("Serviço {} não está saudável. Status: {status}", svc.name);
                all_healthy = false;
            }
        }

        all_healthy
    }

    /// Releases the resolver's temp files early. Also happens on drop.
    pub fn close(&self) {
        self.resolver.close();
    }

    fn descriptor(&self, name: &str) -> Result<&ServiceDescriptor> {
        match self.config.find(name) {
            Some(descriptor) => Ok(descriptor),
            None => Err(OrchestrationError::UnknownService(name.to_string()).into()),
        }
    }
}
