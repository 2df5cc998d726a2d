//! Endpoint configuration loading and run configuration.
mod loader;
mod run;
mod targets;


pub use loader::{EndpointMap, load_endpoints};
pub use run::RunConfig;
pub use targets::{TargetFilter, endpoint_targets, local_target, resolve_targets};
