//! Scoped variable type

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};

use crate::scope::{ScopeQuery, ScopeSet};

/// A named value attached to a scope.
///
/// A variable created in memory is a draft with no identifier; the server
/// assigns one when the owning set is persisted. Variables are only ever
/// replaced as a whole.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct Variable {
    /// Server-assigned identifier, `None` for drafts.
    #[serde(
        rename = "Id",
        default,
        deserialize_with = "empty_as_none",
        skip_serializing_if = "Option::is_none"
    )]
    pub id: Option<String>,

    /// Variable name (compared case-insensitively).
    pub name: String,

    /// Opaque value. `None` for drafts and for sensitive values the server
    /// does not echo back.
    #[serde(default)]
    pub value: Option<String>,

    /// Where the variable applies.
    #[serde(default)]
    pub scope: ScopeSet,

    /// The value must not be echoed back in cleartext.
    #[serde(default)]
    pub is_sensitive: bool,

    /// Whether the variable can be edited.
    #[serde(default = "default_editable")]
    pub is_editable: bool,

    /// Fields this model does not interpret (for example `Prompt`).
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

const fn default_editable() -> bool {
    true
}

pub(crate) fn empty_as_none<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<String>::deserialize(deserializer)?;
    Ok(value.filter(|id| !id.is_empty()))
}

impl Variable {
    /// Creates a draft variable with no identifier and no value.
    #[must_use]
    pub fn draft(name: impl Into<String>, scope: ScopeSet) -> Self {
        Self {
            id: None,
            name: name.into(),
            value: None,
            scope,
            is_sensitive: false,
            is_editable: true,
            extra: Map::new(),
        }
    }

    /// Returns this variable with the given value.
    #[must_use]
    pub fn with_value(mut self, value: impl Into<String>) -> Self {
        self.value = Some(value.into());
        self
    }

    /// Returns this variable with the given identifier.
    #[must_use]
    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = Some(id.into());
        self
    }

    /// Returns true once the server has assigned an identifier.
    #[must_use]
    pub const fn is_persisted(&self) -> bool {
        self.id.is_some()
    }

    /// Returns true if the identifier equals `id` exactly.
    #[must_use]
    pub fn has_id(&self, id: &str) -> bool {
        self.id.as_deref() == Some(id)
    }

    /// Case-insensitive name comparison.
    #[must_use]
    pub fn has_name(&self, name: &str) -> bool {
        self.name.to_lowercase() == name.to_lowercase()
    }

    /// Exact scope match, see [`ScopeSet::is_equivalent`].
    #[must_use]
    pub fn matches_scopes(&self, target: &ScopeSet) -> bool {
        self.scope.is_equivalent(target)
    }

    /// Applicability under a query, see [`ScopeQuery::admits`].
    #[must_use]
    pub fn applies_to(&self, query: &ScopeQuery) -> bool {
        query.admits(&self.scope)
    }
}
