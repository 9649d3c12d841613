//! Application error types

use octovars_domain::{DomainError, ScopeSet};
use thiserror::Error;

use crate::ports::RemoteStoreError;

/// Application-level errors.
#[derive(Debug, Error)]
pub enum ApplicationError {
    /// A domain validation error occurred.
    #[error("domain error: {0}")]
    Domain(#[from] DomainError),

    /// The project, its variable set or a variable does not exist.
    #[error("not found: {0}")]
    NotFound(String),

    /// More than one variable exactly matches the requested name and scope.
    #[error("{count} variables named '{name}' exactly match scope {scope}")]
    AmbiguousScope {
        /// Number of exact matches.
        count: usize,
        /// Requested variable name.
        name: String,
        /// Requested scope.
        scope: ScopeSet,
    },

    /// The store accepted a write that its returned state does not reflect.
    #[error(
        "reconciliation failed: expected exactly one variable named '{name}' with scope {scope} after writing, found {found}"
    )]
    ReconciliationFailed {
        /// Variable name that was written.
        name: String,
        /// Scope that was written.
        scope: ScopeSet,
        /// Number of matching variables in the returned state.
        found: usize,
    },

    /// The remote store failed.
    #[error("{context}: {source}")]
    RemoteStore {
        /// What was being processed when the store failed.
        context: String,
        /// The collaborator's error.
        #[source]
        source: RemoteStoreError,
    },
}

impl ApplicationError {
    /// Wraps a remote-store error with the operation it interrupted.
    ///
    /// `NotFound` from the store becomes [`ApplicationError::NotFound`];
    /// everything else is passed through as [`ApplicationError::RemoteStore`].
    pub fn remote(context: impl Into<String>, error: RemoteStoreError) -> Self {
        match error {
            RemoteStoreError::NotFound(what) => {
                Self::NotFound(format!("{}: {what}", context.into()))
            }
            source => Self::RemoteStore {
                context: context.into(),
                source,
            },
        }
    }

    /// Returns true for [`ApplicationError::NotFound`].
    #[must_use]
    pub const fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound(_))
    }
}

/// Result type alias for application operations.
pub type ApplicationResult<T> = Result<T, ApplicationError>;

#[cfg(test)]
mod tests {
    use super::*;
    use octovars_domain::ScopeDimension;

    #[test]
    fn test_remote_not_found_is_mapped() {
        let error = ApplicationError::remote(
            "fetching variable set for project 'Projects-1'",
            RemoteStoreError::NotFound("project 'Projects-1'".to_string()),
        );
        assert!(error.is_not_found());
        assert_eq!(
            error.to_string(),
            "not found: fetching variable set for project 'Projects-1': project 'Projects-1'"
        );
    }

    #[test]
    fn test_remote_failure_keeps_context() {
        let error = ApplicationError::remote(
            "persisting variable set 'variableset-Projects-1'",
            RemoteStoreError::Timeout,
        );
        assert!(matches!(error, ApplicationError::RemoteStore { .. }));
        assert!(error.to_string().starts_with("persisting variable set"));
    }

    #[test]
    fn test_ambiguous_scope_message_names_everything() {
        let error = ApplicationError::AmbiguousScope {
            count: 2,
            name: "ConnectionString".to_string(),
            scope: ScopeSet::new().with(ScopeDimension::Environments, ["Env1"]),
        };
        assert_eq!(
            error.to_string(),
            "2 variables named 'ConnectionString' exactly match scope {Environment: [Env1]}"
        );
    }
}
