//! Project type

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

/// A deployment project. Each project owns exactly one variable set.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct Project {
    /// Server-assigned identifier.
    #[serde(rename = "Id")]
    pub id: String,

    /// Display name.
    pub name: String,

    /// URL slug.
    #[serde(default)]
    pub slug: String,

    /// Free-form description.
    #[serde(default)]
    pub description: Option<String>,

    /// Identifier of the project's variable set.
    #[serde(rename = "VariableSetId", default)]
    pub variable_set_id: String,

    /// Identifier of the containing project group.
    #[serde(rename = "ProjectGroupId", default)]
    pub project_group_id: Option<String>,

    /// Whether the project is disabled.
    #[serde(default)]
    pub is_disabled: bool,

    /// Hypermedia links.
    #[serde(default)]
    pub links: HashMap<String, String>,
}

impl Project {
    /// Creates a project with the given identity and variable set.
    #[must_use]
    pub fn new(
        id: impl Into<String>,
        name: impl Into<String>,
        variable_set_id: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            variable_set_id: variable_set_id.into(),
            ..Self::default()
        }
    }

    /// Returns true if the project has a variable set to fetch.
    #[must_use]
    pub fn has_variable_set(&self) -> bool {
        !self.variable_set_id.is_empty()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_deserialize_project() {
        let project: Project = serde_json::from_value(serde_json::json!({
            "Id": "Projects-105",
            "Name": "Auditing",
            "Slug": "auditing",
            "Description": "",
            "VariableSetId": "variableset-Projects-105",
            "ProjectGroupId": "ProjectGroups-1",
            "LifeCycleId": "Lifecycles-1",
            "IsDisabled": false,
            "Links": { "Variables": "/api/variables/variableset-Projects-105" }
        }))
        .unwrap();

        assert_eq!(project.id, "Projects-105");
        assert_eq!(project.slug, "auditing");
        assert!(project.has_variable_set());
        assert_eq!(project.project_group_id.as_deref(), Some("ProjectGroups-1"));
    }

    #[test]
    fn test_project_without_variable_set() {
        assert!(!Project::new("Projects-1", "Empty", "").has_variable_set());
    }
}
