use std::path::PathBuf;

/// Error taxonomy of the orchestration core.
///
/// Configuration and resolution problems are reported per service and never
/// abort a batch; `ComposeUnavailable` is the only fatal-at-startup case.
#[derive(Debug, thiserror::Error)]
pub enum OrchestrationError {
    #[error("serviço '{0}' não está habilitado")]
    NotEnabled(String),

    #[error("serviço '{0}' não está configurado")]
    UnknownService(String),

    #[error("arquivo compose não encontrado: {0:?}")]
    ComposeFileNotFound(PathBuf),

    #[error("falha ao baixar arquivo compose de {url}: {reason}")]
    DownloadFailed { url: String, reason: String },

    #[error("comando compose falhou (exit {code:?})\nstdout: {stdout}\nstderr: {stderr}")]
    CommandFailed {
        code: Option<i32>,
        stdout: String,
        stderr: String,
    },

    #[error("nem 'docker-compose' nem 'docker compose' foram encontrados. Instale o Docker Compose.")]
    ComposeUnavailable,
}
