//! Application use cases (business logic orchestration).

mod find_variables;
mod list_projects;
mod lookup;
mod read_variable;
mod update_variable;

pub use find_variables::{FindVariables, FindVariablesOutput};
pub use list_projects::{ListProjects, ListProjectsOutput};
pub use lookup::{LookupEnvironment, LookupMachine};
pub use read_variable::ReadVariable;
pub use update_variable::{UpdateVariable, VariableUpdate};
