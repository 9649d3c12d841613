//! Environment and machine lookup use cases
//!
//! These resolve a slug or identifier to the opaque identifier that a
//! scope refers to. A resource the server no longer has reads as `None`.

use octovars_domain::{Environment, Machine};
use tracing::debug;

use crate::error::{ApplicationError, ApplicationResult};
use crate::ports::{RemoteStoreError, ScopeCatalog};

fn found_or_none<T>(
    result: Result<T, RemoteStoreError>,
    context: impl FnOnce() -> String,
) -> ApplicationResult<Option<T>> {
    match result {
        Ok(item) => Ok(Some(item)),
        Err(RemoteStoreError::NotFound(what)) => {
            debug!(%what, "lookup found nothing");
            Ok(None)
        }
        Err(e) => Err(ApplicationError::remote(context(), e)),
    }
}

/// Looks up an environment by identifier or slug.
pub struct LookupEnvironment<C> {
    catalog: C,
}

impl<C: ScopeCatalog> LookupEnvironment<C> {
    /// Creates a new `LookupEnvironment` use case.
    pub const fn new(catalog: C) -> Self {
        Self { catalog }
    }

    /// Executes the use case.
    ///
    /// # Errors
    /// Returns `ApplicationError::RemoteStore` for store failures other than
    /// a missing environment.
    pub async fn execute(&self, id_or_slug: &str) -> ApplicationResult<Option<Environment>> {
        found_or_none(self.catalog.fetch_environment(id_or_slug).await, || {
            format!("looking up environment '{id_or_slug}'")
        })
    }

    /// Returns true if the environment exists.
    ///
    /// # Errors
    /// Same as [`LookupEnvironment::execute`].
    pub async fn exists(&self, id_or_slug: &str) -> ApplicationResult<bool> {
        Ok(self.execute(id_or_slug).await?.is_some())
    }
}

/// Looks up a machine by identifier or slug.
pub struct LookupMachine<C> {
    catalog: C,
}

impl<C: ScopeCatalog> LookupMachine<C> {
    /// Creates a new `LookupMachine` use case.
    pub const fn new(catalog: C) -> Self {
        Self { catalog }
    }

    /// Executes the use case.
    ///
    /// # Errors
    /// Returns `ApplicationError::RemoteStore` for store failures other than
    /// a missing machine.
    pub async fn execute(&self, id_or_slug: &str) -> ApplicationResult<Option<Machine>> {
        found_or_none(self.catalog.fetch_machine(id_or_slug).await, || {
            format!("looking up machine '{id_or_slug}'")
        })
    }

    /// Returns true if the machine exists.
    ///
    /// # Errors
    /// Same as [`LookupMachine::execute`].
    pub async fn exists(&self, id_or_slug: &str) -> ApplicationResult<bool> {
        Ok(self.execute(id_or_slug).await?.is_some())
    }
}
