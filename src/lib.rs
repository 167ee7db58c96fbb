pub mod domain;
pub mod error;
pub mod infra;
pub mod services;

// Make test_support available for integration tests
// In a real production crate, we might use a feature flag "test-utils"
pub mod test_support;

pub use domain::{ComposeRunner, ContainerInspector, ServiceDescriptor, ServiceStatus};
pub use error::OrchestrationError;
pub use infra::{ComposeCli, Config, DockerInspector};
pub use services::{ComposeFileResolver, ServiceManager, StatusSource};
