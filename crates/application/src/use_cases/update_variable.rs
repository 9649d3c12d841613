//! Update variable use case

use octovars_domain::Variable;
use tracing::info;

use crate::error::{ApplicationError, ApplicationResult};
use crate::ports::VariableStore;

/// Fields to replace on an existing variable. Unset fields are kept.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct VariableUpdate {
    /// New value.
    pub value: Option<String>,
    /// New sensitivity flag.
    pub is_sensitive: Option<bool>,
    /// New editability flag.
    pub is_editable: Option<bool>,
}

impl VariableUpdate {
    /// Creates an update that changes nothing.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the new value.
    #[must_use]
    pub fn value(mut self, value: impl Into<String>) -> Self {
        self.value = Some(value.into());
        self
    }

    /// Sets the sensitivity flag.
    #[must_use]
    pub const fn sensitive(mut self, is_sensitive: bool) -> Self {
        self.is_sensitive = Some(is_sensitive);
        self
    }

    /// Sets the editability flag.
    #[must_use]
    pub const fn editable(mut self, is_editable: bool) -> Self {
        self.is_editable = Some(is_editable);
        self
    }

    fn apply(&self, variable: &mut Variable) {
        if let Some(value) = &self.value {
            variable.value = Some(value.clone());
        }
        if let Some(is_sensitive) = self.is_sensitive {
            variable.is_sensitive = is_sensitive;
        }
        if let Some(is_editable) = self.is_editable {
            variable.is_editable = is_editable;
        }
    }
}

/// Replaces one variable of a project and writes the set back.
pub struct UpdateVariable<S> {
    store: S,
}

impl<S: VariableStore> UpdateVariable<S> {
    /// Creates a new `UpdateVariable` use case.
    pub const fn new(store: S) -> Self {
        Self { store }
    }

    /// Executes the use case.
    ///
    /// # Returns
    /// The variable as stored by the server after the write.
    ///
    /// # Errors
    /// - `ApplicationError::NotFound` if the project, its set or the variable is absent.
    /// - `ApplicationError::ReconciliationFailed` if the written state lacks the variable.
    /// - `ApplicationError::RemoteStore` for any other store failure.
    pub async fn execute(
        &self,
        project_id: &str,
        variable_id: &str,
        update: &VariableUpdate,
    ) -> ApplicationResult<Variable> {
        let context = format!("updating variable '{variable_id}' in project '{project_id}'");
        let mut variable_set = self
            .store
            .fetch_variable_set(project_id)
            .await
            .map_err(|e| ApplicationError::remote(context.as_str(), e))?;

        let mut replaced = None;
        variable_set.replace_by_id(variable_id, |variable| {
            update.apply(variable);
            replaced = Some((variable.name.clone(), variable.scope.clone()));
        });
        let Some((name, scope)) = replaced else {
            return Err(ApplicationError::NotFound(format!(
                "variable '{variable_id}' in project '{project_id}'"
            )));
        };
        info!(project_id, variable_id, name = name.as_str(), "updating variable");

        let persisted = self
            .store
            .persist_variable_set(&variable_set)
            .await
            .map_err(|e| ApplicationError::remote(context.as_str(), e))?;

        persisted
            .find_by_id(variable_id)
            .cloned()
            .ok_or(ApplicationError::ReconciliationFailed {
                name,
                scope,
                found: 0,
            })
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
mod tests {
    use super::*;
    use crate::test_support::{InMemoryStore, persisted};
    use octovars_domain::VariableSet;
    use pretty_assertions::assert_eq;

    fn store() -> InMemoryStore {
        InMemoryStore::new().with_set(
            VariableSet::new("variableset-Projects-1", "Projects-1").with_variables([
                persisted("v1", "Var1", "one"),
                persisted("v2", "Var2", "two"),
                persisted("v3", "Var3", "three"),
            ]),
        )
    }

    #[tokio::test]
    async fn test_update_replaces_value_and_keeps_order() {
        let store = store();
        let use_case = UpdateVariable::new(store.clone());

        let updated = use_case
            .execute(
                "Projects-1",
                "v2",
                &VariableUpdate::new().value("changed").sensitive(true),
            )
            .await
            .unwrap();

        assert_eq!(updated.value.as_deref(), Some("changed"));
        assert!(updated.is_sensitive);
        assert!(updated.is_editable);

        let stored = store.stored("Projects-1").unwrap();
        let names: Vec<&str> = stored.variables().iter().map(|v| v.name.as_str()).collect();
        assert_eq!(names, vec!["Var1", "Var2", "Var3"]);
        assert_eq!(stored.version, 1);
        assert_eq!(store.writes(), 1);
    }

    #[tokio::test]
    async fn test_update_unknown_variable_is_not_found_without_write() {
        let store = store();
        let use_case = UpdateVariable::new(store.clone());

        let err = use_case
            .execute("Projects-1", "v9", &VariableUpdate::new().value("x"))
            .await
            .unwrap_err();

        assert!(err.is_not_found());
        assert_eq!(store.writes(), 0);
    }

    #[tokio::test]
    async fn test_update_missing_after_write_fails() {
        let store = store().dropping("v2");
        let use_case = UpdateVariable::new(store.clone());

        let err = use_case
            .execute("Projects-1", "v2", &VariableUpdate::new().value("changed"))
            .await
            .unwrap_err();

        match err {
            ApplicationError::ReconciliationFailed { name, found, .. } => {
                assert_eq!(name, "Var2");
                assert_eq!(found, 0);
            }
            other => panic!("unexpected error: {other}"),
        }
        assert_eq!(store.writes(), 1);
    }

    #[tokio::test]
    async fn test_update_keeps_unset_fields() {
        let use_case = UpdateVariable::new(store());

        let updated = use_case
            .execute("Projects-1", "v1", &VariableUpdate::new().editable(false))
            .await
            .unwrap();

        assert_eq!(updated.value.as_deref(), Some("one"));
        assert!(!updated.is_editable);
    }
}
