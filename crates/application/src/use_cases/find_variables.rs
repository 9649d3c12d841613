//! Find variables use case

use octovars_domain::{ScopeQuery, Variable};

use crate::error::{ApplicationError, ApplicationResult};
use crate::ports::VariableStore;

/// Variables that apply under a query.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FindVariablesOutput {
    /// Matching variables, in set order.
    pub variables: Vec<Variable>,
}

/// Looks up the variables with a name that apply under a scope query.
///
/// This is an applicability lookup: unscoped variables apply everywhere.
/// It must not be used to detect duplicates before creating a variable.
pub struct FindVariables<S> {
    store: S,
}

impl<S: VariableStore> FindVariables<S> {
    /// Creates a new `FindVariables` use case.
    pub const fn new(store: S) -> Self {
        Self { store }
    }

    /// Executes the use case.
    ///
    /// # Errors
    /// Returns `ApplicationError::NotFound` if the project or its variable set
    /// does not exist.
    pub async fn execute(
        &self,
        project_id: &str,
        name: &str,
        query: &ScopeQuery,
    ) -> ApplicationResult<FindVariablesOutput> {
        let variable_set = self
            .store
            .fetch_variable_set(project_id)
            .await
            .map_err(|e| {
                ApplicationError::remote(
                    format!("finding variable '{name}' in project '{project_id}'"),
                    e,
                )
            })?;

        let variables = variable_set
            .find_applicable(name, query)
            .into_iter()
            .cloned()
            .collect();

        Ok(FindVariablesOutput { variables })
    }
}
