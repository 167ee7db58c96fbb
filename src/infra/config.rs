use crate::domain::ServiceDescriptor;
use anyhow::{Context, Result, bail};
use serde::Deserialize;
use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};

#[derive(Deserialize, Debug)]
struct ConfigDocument {
    services: Vec<ServiceDescriptor>,
}

/// Read-only snapshot of the configuration file.
///
/// The services list keeps the order of the document; start walks it
/// forward, stop walks it backward.
#[derive(Debug)]
pub struct Config {
    base_dir: PathBuf,
    services: Vec<ServiceDescriptor>,
}

impl Config {
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            bail!("config não encontrada em {:?}", path);
        }

        let content = fs::read_to_string(path).with_context(|| format!("lendo {:?}", path))?;
        let doc: ConfigDocument =
            serde_json::from_str(&content).with_context(|| format!("parse de {:?}", path))?;

        // Caminhos relativos de compose_file são resolvidos contra o
        // diretório do config, não o cwd
        let canonical = fs::canonicalize(path).unwrap_or_else(|_| path.to_path_buf());
        let base_dir = canonical
            .parent()
            .map(Path::to_path_buf)
            .unwrap_or_else(|| PathBuf::from("."));

        Self::from_services(base_dir, doc.services)
    }

    pub fn from_services(base_dir: PathBuf, services: Vec<ServiceDescriptor>) -> Result<Self> {
        let mut names = HashSet::new();

        for (idx, svc) in services.iter().enumerate() {
            if svc.name.trim().is_empty() {
                bail!("Entrada {} sem 'name'", idx + 1);
            }

            if svc.compose_file.trim().is_empty() {
                bail!("Serviço '{}' sem 'compose_file'", svc.name);
            }

            if !names.insert(svc.name.clone()) {
                bail!("Entrada {} duplicou o nome '{}'", idx + 1, svc.name);
            }
        }

        Ok(Self { base_dir, services })
    }

    pub fn base_dir(&self) -> &Path {
        &self.base_dir
    }

    pub fn services(&self) -> &[ServiceDescriptor] {
        &self.services
    }

    pub fn find(&self, name: &str) -> Option<&ServiceDescriptor> {
        self.services.iter().find(|svc| svc.name == name)
    }

    pub fn is_service_enabled(&self, name: &str) -> bool {
        self.find(name).map(|svc| svc.enabled).unwrap_or(false)
    }

    pub fn enabled_services(&self) -> Vec<&ServiceDescriptor> {
        self.services.iter().filter(|svc| svc.enabled).collect()
    }

    pub fn core_services(&self) -> Vec<&ServiceDescriptor> {
        self.services
            .iter()
            .filter(|svc| svc.enabled && svc.core)
            .collect()
    }
}
