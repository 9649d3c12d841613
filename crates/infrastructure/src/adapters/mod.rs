//! Adapter implementations
//!
//! Adapters implement the ports defined in the application layer.

mod octopus_client;

pub use octopus_client::{API_KEY_HEADER, OctopusClient};
