//! Command-line arguments.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};
use octovars_domain::{ScopeDimension, ScopeQuery, ScopeSet};
use octovars_infrastructure::SettingsOverrides;

#[derive(Debug, Parser)]
#[command(name = "octovars")]
#[command(about = "Idempotent provisioning of Octopus Deploy project variables", long_about = None)]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Settings file (TOML, YAML or JSON)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Server URL (overrides OCTOPUS_SERVER_URL)
    #[arg(long, global = true)]
    pub server_url: Option<String>,

    /// API key (overrides OCTOPUS_API_KEY)
    #[arg(long, global = true)]
    pub api_key: Option<String>,

    /// Username for basic authentication (overrides OCTOPUS_USER)
    #[arg(long, global = true)]
    pub username: Option<String>,

    /// Password for basic authentication (overrides OCTOPUS_PASSWORD)
    #[arg(long, global = true)]
    pub password: Option<String>,

    /// Log debug output to stderr
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

impl Cli {
    /// Settings given on the command line.
    pub fn overrides(&self) -> SettingsOverrides {
        SettingsOverrides {
            server_url: self.server_url.clone(),
            api_key: self.api_key.clone(),
            username: self.username.clone(),
            password: self.password.clone(),
        }
    }
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Ensure exactly one variable with the given name and scope exists
    Reconcile {
        #[command(flatten)]
        target: VariableTarget,
        #[command(flatten)]
        scope: ScopeArgs,
    },
    /// Print one variable by identifier
    Show {
        #[command(flatten)]
        variable: VariableRef,
    },
    /// List variables with a name that apply under a scope query
    Find {
        #[command(flatten)]
        target: VariableTarget,
        #[command(flatten)]
        query: QueryArgs,
    },
    /// Replace the value of one variable
    #[command(name = "set-value")]
    SetValue {
        #[command(flatten)]
        variable: VariableRef,
        /// New value
        #[arg(long)]
        value: String,
        /// Mark the variable as sensitive
        #[arg(long)]
        sensitive: bool,
    },
    /// List all projects
    Projects,
    /// Print one environment by identifier or slug
    Environment {
        /// Environment identifier or slug
        #[arg(long)]
        id: String,
    },
    /// Print one deployment target by identifier or slug
    Machine {
        /// Machine identifier or slug
        #[arg(long)]
        id: String,
    },
}

#[derive(Debug, Args)]
pub struct VariableTarget {
    /// Project identifier or slug
    #[arg(long)]
    pub project: String,
    /// Variable name (case-insensitive)
    #[arg(long)]
    pub name: String,
}

#[derive(Debug, Args)]
pub struct VariableRef {
    /// Project identifier or slug
    #[arg(long)]
    pub project: String,
    /// Variable identifier
    #[arg(long)]
    pub id: String,
}

/// Scope of a variable; each flag may repeat.
#[derive(Debug, Default, Args)]
pub struct ScopeArgs {
    /// Environment identifier
    #[arg(long = "environment", value_name = "ID")]
    pub environments: Vec<String>,
    /// Machine role
    #[arg(long = "role", value_name = "ROLE")]
    pub roles: Vec<String>,
    /// Deployment target identifier
    #[arg(long = "machine", value_name = "ID")]
    pub machines: Vec<String>,
    /// Process step identifier
    #[arg(long = "action", value_name = "ID")]
    pub actions: Vec<String>,
    /// Project identifier, for library-style sets
    #[arg(long = "scope-project", value_name = "ID")]
    pub projects: Vec<String>,
    /// Channel identifier
    #[arg(long = "channel", value_name = "ID")]
    pub channels: Vec<String>,
}

impl ScopeArgs {
    pub fn to_scope(&self) -> ScopeSet {
        ScopeSet::new()
            .with(ScopeDimension::Environments, self.environments.iter().cloned())
            .with(ScopeDimension::Roles, self.roles.iter().cloned())
            .with(ScopeDimension::Machines, self.machines.iter().cloned())
            .with(ScopeDimension::Actions, self.actions.iter().cloned())
            .with(ScopeDimension::Projects, self.projects.iter().cloned())
            .with(ScopeDimension::Channels, self.channels.iter().cloned())
    }
}

/// One optional value per dimension.
#[derive(Debug, Default, Args)]
pub struct QueryArgs {
    #[arg(long, value_name = "ID")]
    pub environment: Option<String>,
    #[arg(long, value_name = "ROLE")]
    pub role: Option<String>,
    #[arg(long, value_name = "ID")]
    pub machine: Option<String>,
    #[arg(long, value_name = "ID")]
    pub action: Option<String>,
    #[arg(id = "scope_project", long = "scope-project", value_name = "ID")]
    pub project: Option<String>,
    #[arg(long, value_name = "ID")]
    pub channel: Option<String>,
}

impl QueryArgs {
    pub fn to_query(&self) -> ScopeQuery {
        let constraints = [
            (ScopeDimension::Environments, &self.environment),
            (ScopeDimension::Roles, &self.role),
            (ScopeDimension::Machines, &self.machine),
            (ScopeDimension::Actions, &self.action),
            (ScopeDimension::Projects, &self.project),
            (ScopeDimension::Channels, &self.channel),
        ];

        constraints
            .into_iter()
            .fold(ScopeQuery::new(), |query, (dimension, value)| match value {
                Some(value) => query.with(dimension, value.clone()),
                None => query,
            })
    }
}
