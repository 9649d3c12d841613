//! Variable store port
//!
//! Defines the interface for reading and writing a project's variable set.

use async_trait::async_trait;

use octovars_domain::VariableSet;

/// Errors reported by a remote store.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RemoteStoreError {
    /// The requested project or variable set does not exist.
    #[error("{0} not found")]
    NotFound(String),

    /// The server answered with a non-success status.
    #[error("server rejected the request with status {status}: {message}")]
    Rejected {
        /// HTTP status code.
        status: u16,
        /// Error message reported by the server.
        message: String,
    },

    /// The request could not be delivered.
    #[error("transport error: {0}")]
    Transport(String),

    /// The request timed out.
    #[error("request timed out")]
    Timeout,

    /// The server's response could not be decoded.
    #[error("invalid response: {0}")]
    InvalidResponse(String),
}

/// Remote store holding project variable sets.
///
/// Implementations perform no caching; every call reflects current server
/// state. No locking is provided: two callers doing read-modify-write
/// against the same project can lose updates unless they serialize
/// externally per project.
#[async_trait]
pub trait VariableStore: Send + Sync {
    /// Fetches the variable set owned by a project.
    ///
    /// # Errors
    /// Returns `RemoteStoreError::NotFound` if the project or its variable
    /// set does not exist.
    async fn fetch_variable_set(&self, project_id: &str) -> Result<VariableSet, RemoteStoreError>;

    /// Persists a whole variable set, including the version last read.
    ///
    /// # Returns
    /// The authoritative post-write state, with server-assigned identifiers.
    async fn persist_variable_set(
        &self,
        variable_set: &VariableSet,
    ) -> Result<VariableSet, RemoteStoreError>;
}
