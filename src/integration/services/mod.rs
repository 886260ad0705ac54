//! Host-side services built on the integration ports.

pub mod registry;

pub use registry::{IntegrationRegistry, IntegrationRegistryError, IntegrationRegistryResult};
