//! Deployment environment type

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

/// A deployment environment.
///
/// Its identifier is the value that goes into
/// [`ScopeDimension::Environments`](crate::ScopeDimension::Environments).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct Environment {
    /// Server-assigned identifier.
    #[serde(rename = "Id")]
    pub id: String,

    /// Display name.
    pub name: String,

    /// Free-form description.
    #[serde(default)]
    pub description: Option<String>,

    /// Position in the server's environment ordering.
    #[serde(default)]
    pub sort_order: i32,

    /// Whether failed deployments pause for guidance.
    #[serde(default)]
    pub use_guided_failure: bool,

    /// Hypermedia links.
    #[serde(default)]
    pub links: HashMap<String, String>,
}

impl Environment {
    /// Creates an environment with the given identity.
    #[must_use]
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            ..Self::default()
        }
    }
}
