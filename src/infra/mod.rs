pub mod config;
mod compose_cli;
mod docker_inspector;

pub use compose_cli::ComposeCli;
pub use config::Config;
pub use docker_inspector::DockerInspector;
