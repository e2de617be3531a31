pub mod bootstrap;
pub mod gatehouse_service;
pub mod request_tracing;

pub use bootstrap::{BootstrapError, DynVerifier, build_command};
pub use gatehouse_service::{AllowedOrigins, GatehouseService};
