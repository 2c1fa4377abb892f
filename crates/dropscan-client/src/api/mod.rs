//! API endpoint modules.

mod behavioral;
mod health;
mod registry;
mod sandbox;
mod storage;

pub use behavioral::BehavioralApi;
pub use health::HealthApi;
pub use registry::RegistryApi;
pub use sandbox::SandboxApi;
pub use storage::StorageApi;
