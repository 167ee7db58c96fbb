mod service;
pub mod traits;

pub use service::{ServiceDescriptor, ServiceStatus};
pub use traits::{ComposeRunner, ContainerInspector};
