//! Subcommand execution and JSON rendering.

use anyhow::{Context, Result, anyhow};
use serde::Serialize;
use serde_json::{Value, json};
use tracing::debug;

use octovars_application::use_cases::{
    FindVariables, ListProjects, LookupEnvironment, LookupMachine, ReadVariable, UpdateVariable,
    VariableUpdate,
};
use octovars_application::{ReconcileRequest, Reconciled, Reconciler};
use octovars_domain::{Environment, Machine, Project, ScopeSet, Variable};
use octovars_infrastructure::{ClientConfig, ClientSettings, OctopusClient};

use crate::cli::{Cli, Command};

/// A variable as printed; sensitive values are never shown.
#[derive(Debug, Serialize)]
struct VariableView<'a> {
    id: Option<&'a str>,
    name: &'a str,
    value: Option<&'a str>,
    scope: &'a ScopeSet,
    is_sensitive: bool,
    is_editable: bool,
}

impl<'a> From<&'a Variable> for VariableView<'a> {
    fn from(variable: &'a Variable) -> Self {
        Self {
            id: variable.id.as_deref(),
            name: &variable.name,
            value: if variable.is_sensitive {
                None
            } else {
                variable.value.as_deref()
            },
            scope: &variable.scope,
            is_sensitive: variable.is_sensitive,
            is_editable: variable.is_editable,
        }
    }
}

#[derive(Debug, Serialize)]
struct ProjectView<'a> {
    id: &'a str,
    name: &'a str,
    slug: &'a str,
    variable_set_id: &'a str,
    is_disabled: bool,
}

impl<'a> From<&'a Project> for ProjectView<'a> {
    fn from(project: &'a Project) -> Self {
        Self {
            id: &project.id,
            name: &project.name,
            slug: &project.slug,
            variable_set_id: &project.variable_set_id,
            is_disabled: project.is_disabled,
        }
    }
}

#[derive(Debug, Serialize)]
struct EnvironmentView<'a> {
    id: &'a str,
    name: &'a str,
    description: Option<&'a str>,
    sort_order: i32,
}

impl<'a> From<&'a Environment> for EnvironmentView<'a> {
    fn from(environment: &'a Environment) -> Self {
        Self {
            id: &environment.id,
            name: &environment.name,
            description: environment.description.as_deref(),
            sort_order: environment.sort_order,
        }
    }
}

#[derive(Debug, Serialize)]
struct MachineView<'a> {
    id: &'a str,
    name: &'a str,
    environment_ids: &'a [String],
    roles: &'a [String],
    is_disabled: bool,
}

impl<'a> From<&'a Machine> for MachineView<'a> {
    fn from(machine: &'a Machine) -> Self {
        Self {
            id: &machine.id,
            name: &machine.name,
            environment_ids: &machine.environment_ids,
            roles: &machine.roles,
            is_disabled: machine.is_disabled,
        }
    }
}

fn render_variable(variable: &Variable) -> Value {
    json!(VariableView::from(variable))
}

fn render_reconciled(reconciled: &Reconciled) -> Value {
    json!({
        "outcome": reconciled.outcome.as_str(),
        "variable": VariableView::from(&reconciled.variable),
    })
}

fn render_variables(variables: &[Variable]) -> Value {
    json!(variables.iter().map(VariableView::from).collect::<Vec<_>>())
}

fn render_projects(projects: &[Project]) -> Value {
    json!(projects.iter().map(ProjectView::from).collect::<Vec<_>>())
}

fn render_environment(environment: &Environment) -> Value {
    json!(EnvironmentView::from(environment))
}

fn render_machine(machine: &Machine) -> Value {
    json!(MachineView::from(machine))
}

fn connect(cli: &Cli) -> Result<OctopusClient> {
    let settings = ClientSettings::load(cli.config.as_deref(), &cli.overrides())?;
    let config = ClientConfig::try_from(settings)?;
    debug!(
        server_url = %config.server_url(),
        credentials = ?config.credentials(),
        timeout = ?config.timeout(),
        "connecting"
    );
    OctopusClient::new(&config).context("creating HTTP client")
}

/// Runs the selected subcommand and returns its JSON output.
pub async fn run(cli: &Cli) -> Result<Value> {
    let client = connect(cli)?;

    match &cli.command {
        Command::Reconcile { target, scope } => {
            let request = ReconcileRequest::new(&target.project, &target.name, scope.to_scope())?;
            let reconciled = Reconciler::new(client).reconcile(&request).await?;
            Ok(render_reconciled(&reconciled))
        }
        Command::Show { variable } => {
            let found = ReadVariable::new(client)
                .execute(&variable.project, &variable.id)
                .await?
                .ok_or_else(|| {
                    anyhow!(
                        "variable '{}' not found in project '{}'",
                        variable.id,
                        variable.project
                    )
                })?;
            Ok(render_variable(&found))
        }
        Command::Find { target, query } => {
            let output = FindVariables::new(client)
                .execute(&target.project, &target.name, &query.to_query())
                .await?;
            Ok(render_variables(&output.variables))
        }
        Command::SetValue {
            variable,
            value,
            sensitive,
        } => {
            let mut update = VariableUpdate::new().value(value.as_str());
            if *sensitive {
                update = update.sensitive(true);
            }
            let updated = UpdateVariable::new(client)
                .execute(&variable.project, &variable.id, &update)
                .await?;
            Ok(render_variable(&updated))
        }
        Command::Projects => {
            let output = ListProjects::new(client).execute().await?;
            debug!(pages = output.pages, "listed projects");
            Ok(render_projects(&output.projects))
        }
        Command::Environment { id } => {
            let environment = LookupEnvironment::new(client)
                .execute(id)
                .await?
                .ok_or_else(|| anyhow!("environment '{id}' not found"))?;
            Ok(render_environment(&environment))
        }
        Command::Machine { id } => {
            let machine = LookupMachine::new(client)
                .execute(id)
                .await?
                .ok_or_else(|| anyhow!("machine '{id}' not found"))?;
            Ok(render_machine(&machine))
        }
    }
}
