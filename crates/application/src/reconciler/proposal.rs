//! Pure decision steps of reconciliation

use octovars_domain::error::{require_identifier, require_name};
use octovars_domain::{DomainResult, ScopeSet, Variable, VariableSet};

use crate::error::{ApplicationError, ApplicationResult};

/// A validated request to make a variable exist.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReconcileRequest {
    project_id: String,
    name: String,
    scope: ScopeSet,
}

impl ReconcileRequest {
    /// Creates a request.
    ///
    /// # Errors
    /// Returns a `DomainError` if the project id or name is blank.
    pub fn new(project_id: &str, name: &str, scope: ScopeSet) -> DomainResult<Self> {
        Ok(Self {
            project_id: require_identifier("project id", project_id)?,
            name: require_name(name)?,
            scope,
        })
    }

    /// Owning project.
    #[must_use]
    pub fn project_id(&self) -> &str {
        &self.project_id
    }

    /// Desired variable name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Desired scope.
    #[must_use]
    pub const fn scope(&self) -> &ScopeSet {
        &self.scope
    }

    pub(crate) fn describe(&self) -> String {
        format!(
            "variable '{}' with scope {} in project '{}'",
            self.name, self.scope, self.project_id
        )
    }
}

/// A variable set with a new draft appended, ready to be persisted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PendingWrite {
    variable_set: VariableSet,
}

impl PendingWrite {
    /// The full set to persist.
    #[must_use]
    pub const fn variable_set(&self) -> &VariableSet {
        &self.variable_set
    }

    /// The draft that was appended.
    #[must_use]
    pub fn draft(&self) -> Option<&Variable> {
        self.variable_set.variables().last()
    }
}

/// Outcome of the propose phase.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Proposal {
    /// Exactly one variable already matches; no write is needed.
    Reuse(Variable),
    /// Nothing matches; the set must be written with a new draft.
    Create(PendingWrite),
}

/// Decides how to reconcile `request` against a freshly fetched set.
///
/// # Errors
/// Returns `ApplicationError::AmbiguousScope` if more than one variable
/// exactly matches. This is never resolved automatically.
pub fn propose(
    mut variable_set: VariableSet,
    request: &ReconcileRequest,
) -> ApplicationResult<Proposal> {
    let mut matches: Vec<Variable> = variable_set
        .find_by_name_and_scope(request.name(), request.scope())
        .into_iter()
        .cloned()
        .collect();

    if matches.len() > 1 {
        return Err(ApplicationError::AmbiguousScope {
            count: matches.len(),
            name: request.name().to_string(),
            scope: request.scope().clone(),
        });
    }

    if let Some(existing) = matches.pop() {
        return Ok(Proposal::Reuse(existing));
    }

    variable_set.append(Variable::draft(request.name(), request.scope().clone()));
    Ok(Proposal::Create(PendingWrite { variable_set }))
}

/// Checks the state returned by the store after a write.
///
/// # Errors
/// Returns `ApplicationError::ReconciliationFailed` unless exactly one
/// variable matches. This is a consistency failure and is not retried.
pub fn verify(persisted: &VariableSet, request: &ReconcileRequest) -> ApplicationResult<Variable> {
    match persisted
        .find_by_name_and_scope(request.name(), request.scope())
        .as_slice()
    {
        [created] => Ok((*created).clone()),
        matches => Err(ApplicationError::ReconciliationFailed {
            name: request.name().to_string(),
            scope: request.scope().clone(),
            found: matches.len(),
        }),
    }
}
