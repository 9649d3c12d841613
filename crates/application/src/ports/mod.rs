//! Port definitions (interfaces)
//!
//! Ports define the boundaries between the application core and the remote
//! deployment server. Each port is a trait implemented by adapters in the
//! infrastructure layer.

mod project_catalog;
mod scope_catalog;
mod variable_store;

pub use project_catalog::ProjectCatalog;
pub use scope_catalog::ScopeCatalog;
pub use variable_store::{RemoteStoreError, VariableStore};
