//! Scope catalog port

use async_trait::async_trait;

use octovars_domain::{Environment, Machine};

use super::RemoteStoreError;

/// Read access to the resources whose identifiers make up a scope.
#[async_trait]
pub trait ScopeCatalog: Send + Sync {
    /// Fetches an environment by identifier or slug.
    ///
    /// # Errors
    /// Returns `RemoteStoreError::NotFound` if no such environment exists.
    async fn fetch_environment(&self, id_or_slug: &str) -> Result<Environment, RemoteStoreError>;

    /// Fetches a machine by identifier or slug.
    ///
    /// # Errors
    /// Returns `RemoteStoreError::NotFound` if no such machine exists.
    async fn fetch_machine(&self, id_or_slug: &str) -> Result<Machine, RemoteStoreError>;
}
