//! Reconciliation engine
//!
//! Drives propose → commit → verify against a [`VariableStore`].

use octovars_domain::{Variable, VariableSet};
use tracing::{debug, info};

use super::proposal::{PendingWrite, Proposal, ReconcileRequest, propose, verify};
use crate::error::{ApplicationError, ApplicationResult};
use crate::ports::VariableStore;

/// What reconciliation did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReconcileOutcome {
    /// A new variable was written.
    Created,
    /// An existing variable was reused without writing.
    Reused,
}

impl ReconcileOutcome {
    /// Lowercase label for output.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Created => "created",
            Self::Reused => "reused",
        }
    }
}

/// The variable that now exists, and how it came to exist.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Reconciled {
    /// The single variable with the requested name and scope.
    pub variable: Variable,
    /// Whether it was created or reused.
    pub outcome: ReconcileOutcome,
}

/// Ensures variables with a given name and scope exist.
///
/// Every call re-fetches current state; nothing is cached between calls.
/// A call makes at most two round trips (fetch, then persist).
pub struct Reconciler<S> {
    store: S,
}

impl<S: VariableStore> Reconciler<S> {
    /// Creates a reconciler over a store.
    pub const fn new(store: S) -> Self {
        Self { store }
    }

    /// Makes sure exactly one variable with the requested name and scope
    /// exists, creating it if absent.
    ///
    /// Repeating the call with the same request performs no further writes.
    ///
    /// # Errors
    /// - `ApplicationError::NotFound` if the project or its variable set is absent.
    /// - `ApplicationError::AmbiguousScope` if several variables already match.
    /// - `ApplicationError::ReconciliationFailed` if the written state does not
    ///   contain exactly one match.
    /// - `ApplicationError::RemoteStore` for any other store failure.
    pub async fn reconcile(&self, request: &ReconcileRequest) -> ApplicationResult<Reconciled> {
        debug!(
            project_id = request.project_id(),
            name = request.name(),
            scope = %request.scope(),
            "fetching variable set"
        );
        let variable_set = self
            .store
            .fetch_variable_set(request.project_id())
            .await
            .map_err(|e| {
                ApplicationError::remote(
                    format!("fetching variable set for {}", request.describe()),
                    e,
                )
            })?;

        match propose(variable_set, request)? {
            Proposal::Reuse(variable) => {
                info!(
                    project_id = request.project_id(),
                    name = request.name(),
                    scope = %request.scope(),
                    variable_id = variable.id.as_deref().unwrap_or_default(),
                    "variable already exists"
                );
                Ok(Reconciled {
                    variable,
                    outcome: ReconcileOutcome::Reused,
                })
            }
            Proposal::Create(pending) => {
                info!(
                    project_id = request.project_id(),
                    name = request.name(),
                    scope = %request.scope(),
                    "creating variable"
                );
                let persisted = self.commit(request, &pending).await?;
                let variable = verify(&persisted, request)?;
                debug!(
                    variable_id = variable.id.as_deref().unwrap_or_default(),
                    version = persisted.version,
                    "variable created"
                );
                Ok(Reconciled {
                    variable,
                    outcome: ReconcileOutcome::Created,
                })
            }
        }
    }

    async fn commit(
        &self,
        request: &ReconcileRequest,
        pending: &PendingWrite,
    ) -> ApplicationResult<VariableSet> {
        let variable_set = pending.variable_set();
        self.store
            .persist_variable_set(variable_set)
            .await
            .map_err(|e| {
                ApplicationError::remote(
                    format!(
                        "persisting variable set '{}' for {}",
                        variable_set.id,
                        request.describe()
                    ),
                    e,
                )
            })
    }
}
