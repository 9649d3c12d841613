//! Project variable set

use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::scope::{ScopeQuery, ScopeSet};
use crate::variable::Variable;

/// The ordered collection of variables owned by one project.
///
/// Order is the server's insertion order and is preserved across a
/// read-modify-write cycle. `version` is maintained by the server; it is
/// sent back unchanged on every write.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct VariableSet {
    /// Server-assigned identifier.
    #[serde(rename = "Id")]
    pub id: String,

    /// Identifier of the owning project.
    #[serde(rename = "OwnerId")]
    pub owner_id: String,

    /// Optimistic-concurrency token.
    #[serde(default)]
    pub version: u64,

    #[serde(default)]
    variables: Vec<Variable>,

    /// Hypermedia links.
    #[serde(default)]
    pub links: HashMap<String, String>,

    /// Fields this model does not interpret (for example `ScopeValues`).
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl VariableSet {
    /// Creates an empty variable set.
    #[must_use]
    pub fn new(id: impl Into<String>, owner_id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            owner_id: owner_id.into(),
            ..Self::default()
        }
    }

    /// Returns this set with `variables` appended.
    #[must_use]
    pub fn with_variables(mut self, variables: impl IntoIterator<Item = Variable>) -> Self {
        self.variables.extend(variables);
        self
    }

    /// Returns the variables in order.
    #[must_use]
    pub fn variables(&self) -> &[Variable] {
        &self.variables
    }

    /// Returns the number of variables.
    #[must_use]
    pub fn len(&self) -> usize {
        self.variables.len()
    }

    /// Returns true if the set holds no variables.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.variables.is_empty()
    }

    /// Finds the variable with the given identifier.
    #[must_use]
    pub fn find_by_id(&self, id: &str) -> Option<&Variable> {
        self.variables.iter().find(|variable| variable.has_id(id))
    }

    /// All variables with the given name, regardless of scope.
    #[must_use]
    pub fn find_by_name(&self, name: &str) -> Vec<&Variable> {
        self.variables
            .iter()
            .filter(|variable| variable.has_name(name))
            .collect()
    }

    /// All variables with the given name whose scope is exactly equivalent
    /// to `scope`.
    ///
    /// This is the duplicate check used before creating a variable; it never
    /// treats empty dimensions as wildcards.
    #[must_use]
    pub fn find_by_name_and_scope(&self, name: &str, scope: &ScopeSet) -> Vec<&Variable> {
        self.variables
            .iter()
            .filter(|variable| variable.has_name(name) && variable.matches_scopes(scope))
            .collect()
    }

    /// All variables with the given name that apply under `query`.
    #[must_use]
    pub fn find_applicable(&self, name: &str, query: &ScopeQuery) -> Vec<&Variable> {
        self.variables
            .iter()
            .filter(|variable| variable.has_name(name) && variable.applies_to(query))
            .collect()
    }

    /// Replaces the variable with identifier `id`.
    ///
    /// `updater` edits a copy; the copy is swapped in only after it returns,
    /// so the set holds either the old or the new variable, never a mix.
    /// The identifier of the copy is pinned to `id`.
    ///
    /// Returns false if no variable has that identifier.
    pub fn replace_by_id<F>(&mut self, id: &str, updater: F) -> bool
    where
        F: FnOnce(&mut Variable),
    {
        let Some(slot) = self
            .variables
            .iter_mut()
            .find(|variable| variable.has_id(id))
        else {
            return false;
        };

        let mut replacement = slot.clone();
        updater(&mut replacement);
        replacement.id = Some(id.to_string());
        *slot = replacement;
        true
    }

    /// Appends a variable. No identifier is assigned locally.
    pub fn append(&mut self, variable: Variable) {
        self.variables.push(variable);
    }
}
