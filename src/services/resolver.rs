use crate::domain::ServiceDescriptor;
use crate::error::OrchestrationError;
use anyhow::{Context, Result};
use std::collections::HashMap;
use std::fs;
use std::io::Write;
use std::path::PathBuf;
use std::sync::Mutex;
use tracing::{debug, error, warn};

/// Resolves a service's compose-file reference to a local path.
///
/// Remote (http/https) references are downloaded at most once per resolver
/// lifetime and kept in uniquely named temp files keyed by service name.
/// [`ComposeFileResolver::close`] releases every temp file; it also runs on
/// drop, so cleanup happens on all exit paths.
#[derive(Debug)]
pub struct ComposeFileResolver {
    base_dir: PathBuf,
    http: reqwest::blocking::Client,
    temp_files: Mutex<HashMap<String, PathBuf>>,
}

impl ComposeFileResolver {
    pub fn new(base_dir: impl Into<PathBuf>) -> Self {
        Self {
            base_dir: base_dir.into(),
            http: reqwest::blocking::Client::new(),
            temp_files: Mutex::new(HashMap::new()),
        }
    }

    pub fn resolve(&self, service: &ServiceDescriptor) -> Result<PathBuf> {
        if service.is_remote() {
            return self.resolve_remote(service);
        }

        let full_path = self.base_dir.join(&service.compose_file);
        if !full_path.exists() {
            warn!("Arquivo compose não encontrado: {:?}", full_path);
            return Err(OrchestrationError::ComposeFileNotFound(full_path).into());
        }

        Ok(full_path)
    }

    fn resolve_remote(&self, service: &ServiceDescriptor) -> Result<PathBuf> {
        // O lock cobre o download inteiro para manter a invariante de um
        // download por serviço mesmo com o resolver compartilhado
        let mut temp_files = match self.temp_files.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        };

        if let Some(path) = temp_files.get(&service.name) {
            debug!("cache hit para {}: {:?}", service.name, path);
            return Ok(path.clone());
        }

        let url = &service.compose_file;
        let response = self.http.get(url.as_str()).send().map_err(|e| {
            error!("Falha ao baixar arquivo compose de {}: {e}", service.name);
            OrchestrationError::DownloadFailed {
                url: url.clone(),
                reason: e.to_string(),
            }
        })?;

        if response.status() != reqwest::StatusCode::OK {
            error!(
                "Falha ao baixar arquivo compose de {} (status {})",
                service.name,
                response.status()
            );
            return Err(OrchestrationError::DownloadFailed {
                url: url.clone(),
                reason: format!("status {}", response.status()),
            }
            .into());
        }

        let body = response.bytes().map_err(|e| OrchestrationError::DownloadFailed {
            url: url.clone(),
            reason: e.to_string(),
        })?;

        let mut tmp_file = tempfile::Builder::new()
            .prefix("homebox-")
            .suffix(".yml")
            .tempfile()
            .with_context(|| format!("criando arquivo temporário para {}", service.name))?;
        tmp_file
            .write_all(&body)
            .with_context(|| format!("escrevendo arquivo temporário para {}", service.name))?;

        let (_file, path) = tmp_file
            .keep()
            .with_context(|| format!("persistindo arquivo temporário para {}", service.name))?;

        debug!("compose de {} baixado em {:?}", service.name, path);
        temp_files.insert(service.name.clone(), path.clone());

        Ok(path)
    }

    /// Releases every cached temp file. Safe to call more than once; files
    /// already removed externally are skipped silently.
    pub fn close(&self) {
        let mut temp_files = match self.temp_files.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        };

        for (service, path) in temp_files.drain() {
            match fs::remove_file(&path) {
                Ok(()) => debug!("arquivo temporário de {service} removido"),
                Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
                Err(e) => warn!("falha ao remover {:?}: {e}", path),
            }
        }
    }

    #[cfg(test)]
    fn track_temp_file(&self, service: &str, path: PathBuf) {
        self.temp_files
            .lock()
            .unwrap()
            .insert(service.to_string(), path);
    }
}

impl Drop for ComposeFileResolver {
    fn drop(&mut self) {
        self.close();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Read;
    use std::net::TcpListener;
    use std::sync::Arc;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::thread;

    fn descriptor(name: &str, compose_file: &str) -> ServiceDescriptor {
        ServiceDescriptor {
            name: name.to_string(),
            enabled: true,
            core: false,
            compose_file: compose_file.to_string(),
        }
    }

    /// Minimal HTTP server counting requests, for download tests.
    fn spawn_server(status_line: &'static str, body: &'static str) -> (String, Arc<AtomicUsize>) {
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        let addr = listener.local_addr().unwrap();
        let hits = Arc::new(AtomicUsize::new(0));

        let hits_server = hits.clone();
        thread::spawn(move || {
            for stream in listener.incoming() {
                let Ok(mut stream) = stream else { break };
                hits_server.fetch_add(1, Ordering::SeqCst);

                let mut request = [0u8; 1024];
                let _ = stream.read(&mut request);

                let response = format!(
                    "HTTP/1.1 {status_line}\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{body}",
                    body.len()
                );
                let _ = std::io::Write::write_all(&mut stream, response.as_bytes());
            }
        });

        (format!("http://{addr}/docker-compose.yml"), hits)
    }

    #[test]
    fn resolves_relative_path_against_base_dir() {
        let temp_dir = tempfile::tempdir().unwrap();
        fs::write(temp_dir.path().join("redis.yml"), "services: {}\n").unwrap();

        let resolver = ComposeFileResolver::new(temp_dir.path());
        let path = resolver.resolve(&descriptor("redis", "redis.yml")).unwrap();

        assert_eq!(path, temp_dir.path().join("redis.yml"));
    }

    #[test]
    fn missing_local_file_is_not_found() {
        let temp_dir = tempfile::tempdir().unwrap();
        let resolver = ComposeFileResolver::new(temp_dir.path());

        let err = resolver
            .resolve(&descriptor("redis", "nonexistent.yml"))
            .unwrap_err();

        assert!(matches!(
            err.downcast_ref::<OrchestrationError>(),
            Some(OrchestrationError::ComposeFileNotFound(_))
        ));
    }

    #[test]
    fn downloads_remote_file_once() {
        let (url, hits) = spawn_server("200 OK", "services:\n  redis:\n    image: redis\n");
        let resolver = ComposeFileResolver::new("/tmp");
        let svc = descriptor("redis", &url);

        let first = resolver.resolve(&svc).unwrap();
        assert!(first.to_string_lossy().ends_with(".yml"));
        assert!(first.exists());

        // segunda chamada é cache hit, sem novo fetch
        let second = resolver.resolve(&svc).unwrap();
        assert_eq!(first, second);
        assert_eq!(hits.load(Ordering::SeqCst), 1);

        resolver.close();
        assert!(!first.exists());
    }

    #[test]
    fn non_success_status_fails_download() {
        let (url, hits) = spawn_server("404 Not Found", "not here");
        let resolver = ComposeFileResolver::new("/tmp");

        let err = resolver.resolve(&descriptor("redis", &url)).unwrap_err();
        assert!(matches!(
            err.downcast_ref::<OrchestrationError>(),
            Some(OrchestrationError::DownloadFailed { .. })
        ));
        assert_eq!(hits.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn unreachable_host_fails_download() {
        // porta reservada e fechada
        let resolver = ComposeFileResolver::new("/tmp");
        let err = resolver
            .resolve(&descriptor("redis", "http://127.0.0.1:1/compose.yml"))
            .unwrap_err();

        assert!(matches!(
            err.downcast_ref::<OrchestrationError>(),
            Some(OrchestrationError::DownloadFailed { .. })
        ));
    }

    #[test]
    fn close_removes_tracked_files_and_is_idempotent() {
        let temp_dir = tempfile::tempdir().unwrap();
        let tracked = temp_dir.path().join("homebox-test.yml");
        fs::write(&tracked, "services: {}\n").unwrap();

        let resolver = ComposeFileResolver::new(temp_dir.path());
        resolver.track_temp_file("redis", tracked.clone());

        resolver.close();
        assert!(!tracked.exists());

        // fechar de novo não falha
        resolver.close();
    }

    #[test]
    fn close_tolerates_externally_removed_files() {
        let temp_dir = tempfile::tempdir().unwrap();
        let tracked = temp_dir.path().join("homebox-test.yml");
        fs::write(&tracked, "services: {}\n").unwrap();

        let resolver = ComposeFileResolver::new(temp_dir.path());
        resolver.track_temp_file("redis", tracked.clone());

        fs::remove_file(&tracked).unwrap();
        resolver.close();
    }

    #[test]
    fn drop_releases_temp_files() {
        let temp_dir = tempfile::tempdir().unwrap();
        let tracked = temp_dir.path().join("homebox-test.yml");
        fs::write(&tracked, "services: {}\n").unwrap();

        {
            let resolver = ComposeFileResolver::new(temp_dir.path());
            resolver.track_temp_file("redis", tracked.clone());
        }

        assert!(!tracked.exists());
    }
}
