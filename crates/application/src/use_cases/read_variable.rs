//! Read variable use case

use octovars_domain::Variable;
use tracing::debug;

use crate::error::{ApplicationError, ApplicationResult};
use crate::ports::VariableStore;

/// Reads one variable of a project by identifier.
pub struct ReadVariable<S> {
    store: S,
}

impl<S: VariableStore> ReadVariable<S> {
    /// Creates a new `ReadVariable` use case.
    pub const fn new(store: S) -> Self {
        Self { store }
    }

    /// Executes the use case.
    ///
    /// # Returns
    /// `None` when the variable no longer exists in the project's set.
    ///
    /// # Errors
    /// Returns `ApplicationError::NotFound` if the project or its variable set
    /// does not exist.
    pub async fn execute(
        &self,
        project_id: &str,
        variable_id: &str,
    ) -> ApplicationResult<Option<Variable>> {
        let variable_set = self
            .store
            .fetch_variable_set(project_id)
            .await
            .map_err(|e| {
                ApplicationError::remote(
                    format!("reading variable '{variable_id}' in project '{project_id}'"),
                    e,
                )
            })?;

        let variable = variable_set.find_by_id(variable_id).cloned();
        if variable.is_none() {
            debug!(project_id, variable_id, "variable not found in set");
        }
        Ok(variable)
    }

    /// Returns true if the variable exists.
    ///
    /// # Errors
    /// Same as [`ReadVariable::execute`].
    pub async fn exists(&self, project_id: &str, variable_id: &str) -> ApplicationResult<bool> {
        Ok(self.execute(project_id, variable_id).await?.is_some())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;
    use crate::test_support::{InMemoryStore, persisted};
    use octovars_domain::VariableSet;
    use pretty_assertions::assert_eq;

    fn store() -> InMemoryStore {
        InMemoryStore::new().with_set(
            VariableSet::new("variableset-Projects-1", "Projects-1")
                .with_variables([persisted("v1", "Var1", "one"), persisted("v2", "Var2", "two")]),
        )
    }

    #[tokio::test]
    async fn test_read_existing_variable() {
        let use_case = ReadVariable::new(store());

        let variable = use_case.execute("Projects-1", "v2").await.unwrap().unwrap();

        assert_eq!(variable.name, "Var2");
        assert_eq!(variable.value.as_deref(), Some("two"));
    }

    #[tokio::test]
    async fn test_read_deleted_variable_is_none() {
        let use_case = ReadVariable::new(store());

        assert_eq!(use_case.execute("Projects-1", "v9").await.unwrap(), None);
        assert!(!use_case.exists("Projects-1", "v9").await.unwrap());
        assert!(use_case.exists("Projects-1", "v1").await.unwrap());
    }

    #[tokio::test]
    async fn test_read_in_missing_project_is_not_found() {
        let use_case = ReadVariable::new(store());

        let err = use_case.execute("Projects-404", "v1").await.unwrap_err();

        assert!(err.is_not_found());
    }
}
