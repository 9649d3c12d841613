//! Octovars Domain - Core variable model
//!
//! This crate defines the scoped-variable model of a deployment-automation
//! server: scopes, variables, project variable sets, the environments and
//! machines that scopes refer to, and paged results.
//! All types here are pure Rust with no I/O dependencies.

pub mod environment;
pub mod error;
pub mod machine;
pub mod paging;
pub mod project;
pub mod scope;
pub mod variable;
pub mod variable_set;

pub use environment::Environment;
pub use error::{DomainError, DomainResult};
pub use machine::Machine;
pub use paging::{NEXT_PAGE_LINK, PREVIOUS_PAGE_LINK, Page, PageCursor};
pub use project::Project;
pub use scope::{ScopeDimension, ScopeQuery, ScopeSet};
pub use variable::Variable;
pub use variable_set::VariableSet;
