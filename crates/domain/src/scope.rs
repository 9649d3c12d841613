//! Variable scope types
//!
//! A scope restricts where a variable applies along six independent
//! dimensions. Two different predicates are defined over scopes and they
//! serve different call sites:
//!
//! - [`ScopeSet::is_equivalent`] is exact matching. Per dimension, both sides
//!   must hold the same set of values (case-insensitive, order and duplicates
//!   ignored). An empty dimension only equals another empty dimension.
//!   Reconciliation uses this to find existing duplicates.
//! - [`ScopeQuery::admits`] is applicability. A dimension the query leaves
//!   unset is ignored, and an empty dimension on the variable applies to
//!   every value. Read-style lookups use this.
//!
//! Using one where the other belongs silently creates duplicate variables.

use std::collections::HashSet;
use std::fmt;

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};

/// One of the six scope dimensions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ScopeDimension {
    /// Deployment environments.
    Environments,
    /// Machine roles.
    Roles,
    /// Individual deployment targets.
    Machines,
    /// Deployment process steps.
    Actions,
    /// Projects (for library-style sets).
    Projects,
    /// Release channels.
    Channels,
}

impl ScopeDimension {
    /// All dimensions, in wire order.
    pub const ALL: [Self; 6] = [
        Self::Environments,
        Self::Roles,
        Self::Machines,
        Self::Actions,
        Self::Projects,
        Self::Channels,
    ];

    /// Key used for this dimension in the server's JSON.
    #[must_use]
    pub const fn wire_key(self) -> &'static str {
        match self {
            Self::Environments => "Environment",
            Self::Roles => "Role",
            Self::Machines => "Machine",
            Self::Actions => "Action",
            Self::Projects => "Project",
            Self::Channels => "Channel",
        }
    }
}

impl fmt::Display for ScopeDimension {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.wire_key())
    }
}

/// The multi-dimensional scope attached to a variable.
///
/// Each dimension is a list of opaque identifiers. An empty list means the
/// dimension is unconstrained, never "matches nothing".
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScopeSet {
    /// Environment identifiers.
    #[serde(
        rename = "Environment",
        default,
        deserialize_with = "null_as_empty",
        skip_serializing_if = "Vec::is_empty"
    )]
    pub environments: Vec<String>,

    /// Role names.
    #[serde(
        rename = "Role",
        default,
        deserialize_with = "null_as_empty",
        skip_serializing_if = "Vec::is_empty"
    )]
    pub roles: Vec<String>,

    /// Machine identifiers.
    #[serde(
        rename = "Machine",
        default,
        deserialize_with = "null_as_empty",
        skip_serializing_if = "Vec::is_empty"
    )]
    pub machines: Vec<String>,

    /// Action identifiers.
    #[serde(
        rename = "Action",
        default,
        deserialize_with = "null_as_empty",
        skip_serializing_if = "Vec::is_empty"
    )]
    pub actions: Vec<String>,

    /// Project identifiers.
    #[serde(
        rename = "Project",
        default,
        deserialize_with = "null_as_empty",
        skip_serializing_if = "Vec::is_empty"
    )]
    pub projects: Vec<String>,

    /// Channel identifiers.
    #[serde(
        rename = "Channel",
        default,
        deserialize_with = "null_as_empty",
        skip_serializing_if = "Vec::is_empty"
    )]
    pub channels: Vec<String>,

    /// Scope keys this model does not interpret. Kept so that a
    /// read-modify-write cycle does not drop them.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

fn null_as_empty<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<Vec<String>>::deserialize(deserializer)?.unwrap_or_default())
}

impl ScopeSet {
    /// Creates an unscoped set (every dimension unconstrained).
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns this scope with `dimension` set to `values`.
    #[must_use]
    pub fn with<I, S>(mut self, dimension: ScopeDimension, values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        *self.values_mut(dimension) = values.into_iter().map(Into::into).collect();
        self
    }

    /// Returns the values of one dimension.
    #[must_use]
    pub fn values(&self, dimension: ScopeDimension) -> &[String] {
        match dimension {
            ScopeDimension::Environments => &self.environments,
            ScopeDimension::Roles => &self.roles,
            ScopeDimension::Machines => &self.machines,
            ScopeDimension::Actions => &self.actions,
            ScopeDimension::Projects => &self.projects,
            ScopeDimension::Channels => &self.channels,
        }
    }

    /// Returns the values of one dimension for modification.
    pub const fn values_mut(&mut self, dimension: ScopeDimension) -> &mut Vec<String> {
        match dimension {
            ScopeDimension::Environments => &mut self.environments,
            ScopeDimension::Roles => &mut self.roles,
            ScopeDimension::Machines => &mut self.machines,
            ScopeDimension::Actions => &mut self.actions,
            ScopeDimension::Projects => &mut self.projects,
            ScopeDimension::Channels => &mut self.channels,
        }
    }

    /// Returns true if no dimension is constrained.
    #[must_use]
    pub fn is_unscoped(&self) -> bool {
        ScopeDimension::ALL
            .iter()
            .all(|&dimension| self.values(dimension).is_empty())
    }

    /// Returns true if both scopes constrain every dimension to exactly the
    /// same set of values.
    ///
    /// Comparison is case-insensitive and ignores order and duplicates.
    /// A populated dimension is never equivalent to an empty one.
    #[must_use]
    pub fn is_equivalent(&self, other: &Self) -> bool {
        ScopeDimension::ALL.iter().all(|&dimension| {
            dimension_values_equivalent(self.values(dimension), other.values(dimension))
        })
    }
}

/// Linear-time set comparison of one dimension.
///
/// The sides are equivalent when the union of both case-folded sets is no
/// larger than either set.
fn dimension_values_equivalent(left: &[String], right: &[String]) -> bool {
    let left = fold_case(left);
    let right = fold_case(right);
    if left.len() != right.len() {
        return false;
    }

    let union: HashSet<&str> = left.iter().chain(right.iter()).map(String::as_str).collect();
    union.len() == left.len()
}

fn fold_case(values: &[String]) -> HashSet<String> {
    values.iter().map(|value| value.to_lowercase()).collect()
}

impl fmt::Display for ScopeSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_unscoped() {
            return f.write_str("{unscoped}");
        }

        f.write_str("{")?;
        let mut first = true;
        for dimension in ScopeDimension::ALL {
            let values = self.values(dimension);
            if values.is_empty() {
                continue;
            }
            if !first {
                f.write_str("; ")?;
            }
            first = false;
            write!(f, "{dimension}: [{}]", values.join(", "))?;
        }
        f.write_str("}")
    }
}

/// An applicability query over scopes.
///
/// Each dimension is either unset (ignored) or a single value that a
/// variable must apply to.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ScopeQuery {
    /// Environment the variable must apply to.
    pub environment: Option<String>,
    /// Role the variable must apply to.
    pub role: Option<String>,
    /// Machine the variable must apply to.
    pub machine: Option<String>,
    /// Action the variable must apply to.
    pub action: Option<String>,
    /// Project the variable must apply to.
    pub project: Option<String>,
    /// Channel the variable must apply to.
    pub channel: Option<String>,
}

impl ScopeQuery {
    /// Creates a query that constrains nothing.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns this query constrained to `value` in `dimension`.
    #[must_use]
    pub fn with(mut self, dimension: ScopeDimension, value: impl Into<String>) -> Self {
        *self.constraint_mut(dimension) = Some(value.into());
        self
    }

    /// Returns the constraint for one dimension, if any.
    #[must_use]
    pub fn constraint(&self, dimension: ScopeDimension) -> Option<&str> {
        match dimension {
            ScopeDimension::Environments => self.environment.as_deref(),
            ScopeDimension::Roles => self.role.as_deref(),
            ScopeDimension::Machines => self.machine.as_deref(),
            ScopeDimension::Actions => self.action.as_deref(),
            ScopeDimension::Projects => self.project.as_deref(),
            ScopeDimension::Channels => self.channel.as_deref(),
        }
    }

    const fn constraint_mut(&mut self, dimension: ScopeDimension) -> &mut Option<String> {
        match dimension {
            ScopeDimension::Environments => &mut self.environment,
            ScopeDimension::Roles => &mut self.role,
            ScopeDimension::Machines => &mut self.machine,
            ScopeDimension::Actions => &mut self.action,
            ScopeDimension::Projects => &mut self.project,
            ScopeDimension::Channels => &mut self.channel,
        }
    }

    /// Returns true if a variable with `scope` applies under this query.
    #[must_use]
    pub fn admits(&self, scope: &ScopeSet) -> bool {
        ScopeDimension::ALL.iter().all(|&dimension| {
            let Some(wanted) = self.constraint(dimension) else {
                return true;
            };
            let values = scope.values(dimension);
            if values.is_empty() {
                return true;
            }
            let wanted = wanted.to_lowercase();
            values.iter().any(|value| value.to_lowercase() == wanted)
        })
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use proptest::prelude::*;

    fn envs(values: &[&str]) -> ScopeSet {
        ScopeSet::new().with(ScopeDimension::Environments, values.iter().copied())
    }

    #[test]
    fn test_equivalent_ignores_case_and_order() {
        assert!(envs(&["Env1", "Env2"]).is_equivalent(&envs(&["env2", "ENV1"])));
    }

    #[test]
    fn test_populated_is_not_equivalent_to_empty() {
        assert!(!envs(&["Env1"]).is_equivalent(&envs(&[])));
        assert!(!envs(&[]).is_equivalent(&envs(&["Env1"])));
    }

    #[test]
    fn test_empty_dimensions_are_equivalent() {
        assert!(ScopeSet::new().is_equivalent(&ScopeSet::new()));
    }

    #[test]
    fn test_duplicates_collapse() {
        assert!(envs(&["Env1", "env1"]).is_equivalent(&envs(&["ENV1"])));
        assert!(!envs(&["Env1", "Env1"]).is_equivalent(&envs(&["Env1", "Env2"])));
    }

    #[test]
    fn test_every_dimension_participates() {
        let base = ScopeSet::new().with(ScopeDimension::Roles, ["web"]);
        for dimension in ScopeDimension::ALL {
            let other = base.clone().with(dimension, ["extra"]);
            assert!(
                !base.is_equivalent(&other),
                "{dimension} should affect equivalence"
            );
        }
    }

    #[test]
    fn test_channels_are_compared() {
        let a = ScopeSet::new().with(ScopeDimension::Channels, ["Channels-1"]);
        let b = ScopeSet::new().with(ScopeDimension::Channels, ["Channels-2"]);
        assert!(!a.is_equivalent(&b));
    }

    #[test]
    fn test_extra_keys_do_not_affect_equivalence() {
        let mut a = envs(&["Env1"]);
        a.extra
            .insert("TenantTag".to_string(), serde_json::json!(["x"]));
        assert!(a.is_equivalent(&envs(&["env1"])));
    }

    #[test]
    fn test_display() {
        assert_eq!(ScopeSet::new().to_string(), "{unscoped}");
        let scope = envs(&["Env1", "Env2"]).with(ScopeDimension::Roles, ["web"]);
        assert_eq!(scope.to_string(), "{Environment: [Env1, Env2]; Role: [web]}");
    }

    #[test]
    fn test_wire_format_omits_empty_dimensions() {
        let scope = envs(&["Environments-130"]).with(ScopeDimension::Roles, ["web"]);
        let json = serde_json::to_value(&scope).unwrap();
        assert_eq!(
            json,
            serde_json::json!({ "Environment": ["Environments-130"], "Role": ["web"] })
        );
    }

    #[test]
    fn test_wire_format_reads_null_and_unknown_keys() {
        let scope: ScopeSet = serde_json::from_value(serde_json::json!({
            "Environment": ["Environments-130", "Environments-131"],
            "Machine": null,
            "TenantTag": ["Region/AU"]
        }))
        .unwrap();

        assert_eq!(
            scope.environments,
            vec!["Environments-130".to_string(), "Environments-131".to_string()]
        );
        assert!(scope.machines.is_empty());
        assert_eq!(
            scope.extra.get("TenantTag"),
            Some(&serde_json::json!(["Region/AU"]))
        );

        let round_trip = serde_json::to_value(&scope).unwrap();
        assert_eq!(round_trip["TenantTag"], serde_json::json!(["Region/AU"]));
    }

    #[test]
    fn test_query_ignores_unset_dimensions() {
        let scope = envs(&["Env1"]).with(ScopeDimension::Roles, ["web"]);
        assert!(ScopeQuery::new().admits(&scope));
        assert!(
            ScopeQuery::new()
                .with(ScopeDimension::Roles, "WEB")
                .admits(&scope)
        );
    }

    #[test]
    fn test_query_treats_empty_dimension_as_wildcard() {
        let scope = envs(&["Env1"]);
        let query = ScopeQuery::new().with(ScopeDimension::Machines, "Machines-9");
        assert!(query.admits(&scope));
    }

    #[test]
    fn test_query_rejects_value_outside_dimension() {
        let scope = envs(&["Env1", "Env2"]);
        assert!(
            !ScopeQuery::new()
                .with(ScopeDimension::Environments, "Env3")
                .admits(&scope)
        );
    }

    #[test]
    fn test_query_is_more_permissive_than_equivalence() {
        let unscoped = ScopeSet::new();
        let query = ScopeQuery::new().with(ScopeDimension::Environments, "Env1");
        assert!(query.admits(&unscoped));
        assert!(!unscoped.is_equivalent(&envs(&["Env1"])));
    }

    fn dimension_values() -> impl Strategy<Value = Vec<String>> {
        prop::collection::vec("[A-Za-z]{1,3}", 0..4)
    }

    fn scope_set() -> impl Strategy<Value = ScopeSet> {
        (
            dimension_values(),
            dimension_values(),
            dimension_values(),
            dimension_values(),
            dimension_values(),
            dimension_values(),
        )
            .prop_map(
                |(environments, roles, machines, actions, projects, channels)| ScopeSet {
                    environments,
                    roles,
                    machines,
                    actions,
                    projects,
                    channels,
                    extra: Map::new(),
                },
            )
    }

    proptest! {
        #[test]
        fn proptest_equivalence_is_reflexive(scope in scope_set()) {
            prop_assert!(scope.is_equivalent(&scope));
        }

        #[test]
        fn proptest_equivalence_is_symmetric(a in scope_set(), b in scope_set()) {
            prop_assert_eq!(a.is_equivalent(&b), b.is_equivalent(&a));
        }

        #[test]
        fn proptest_equivalence_survives_reorder_and_case(scope in scope_set()) {
            let mut shuffled = scope.clone();
            for dimension in ScopeDimension::ALL {
                let values = shuffled.values_mut(dimension);
                values.reverse();
                for value in values.iter_mut() {
                    *value = value.to_uppercase();
                }
            }
            prop_assert!(scope.is_equivalent(&shuffled));
        }
    }
}
