//! Octovars Infrastructure - Adapters and configuration
//!
//! This crate connects the application layer to a real Octopus Deploy
//! server:
//!
//! - [`settings`]: layered client configuration and its validation
//! - [`adapters`]: the reqwest-based REST client implementing the ports

pub mod adapters;
pub mod settings;

pub use adapters::{API_KEY_HEADER, OctopusClient};
pub use settings::{
    ClientConfig, ClientSettings, ConfigError, Credentials, DEFAULT_TIMEOUT_SECS, ENV_PREFIX,
    SettingsOverrides,
};
