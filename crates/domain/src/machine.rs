//! Deployment target type

use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// A machine the server deploys to.
///
/// Its identifier is the value that goes into
/// [`ScopeDimension::Machines`](crate::ScopeDimension::Machines).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct Machine {
    /// Server-assigned identifier.
    #[serde(rename = "Id")]
    pub id: String,

    /// Display name.
    pub name: String,

    /// Certificate thumbprint of the agent.
    #[serde(default)]
    pub thumbprint: String,

    /// Agent URI.
    #[serde(rename = "Uri", default)]
    pub uri: String,

    /// Whether the machine is disabled.
    #[serde(default)]
    pub is_disabled: bool,

    /// Environments the machine belongs to.
    #[serde(rename = "EnvironmentIds", default)]
    pub environment_ids: Vec<String>,

    /// Machine roles.
    #[serde(default)]
    pub roles: Vec<String>,

    /// Health status reported by the server.
    #[serde(default)]
    pub status: String,

    /// Hypermedia links.
    #[serde(default)]
    pub links: HashMap<String, String>,

    /// Fields this model does not interpret (for example `Endpoint`).
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Machine {
    /// Creates a machine with the given identity.
    #[must_use]
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            ..Self::default()
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_deserialize_machine() {
        let machine: Machine = serde_json::from_value(serde_json::json!({
            "Id": "Machines-12",
            "Name": "web-01",
            "Thumbprint": "8A7E6157A34158EDA1B5127CB027B2A267760A4F",
            "Uri": "https://web-01:10933/",
            "IsDisabled": false,
            "EnvironmentIds": ["Environments-130"],
            "Roles": ["web"],
            "Status": "Online",
            "Endpoint": { "CommunicationsStyle": "TentaclePassive" },
            "Links": {}
        }))
        .unwrap();

        assert_eq!(machine.id, "Machines-12");
        assert_eq!(machine.uri, "https://web-01:10933/");
        assert_eq!(machine.environment_ids, vec!["Environments-130"]);
        assert_eq!(machine.roles, vec!["web"]);
        assert!(machine.extra.contains_key("Endpoint"));
    }
}
