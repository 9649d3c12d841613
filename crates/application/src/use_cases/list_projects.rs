//! List projects use case

use octovars_domain::Project;
use tracing::{debug, warn};

use crate::error::{ApplicationError, ApplicationResult};
use crate::ports::ProjectCatalog;

/// Output containing every project on the server.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListProjectsOutput {
    /// Projects in server order.
    pub projects: Vec<Project>,
    /// Number of pages fetched.
    pub pages: usize,
}

/// Lists all projects by following the next-page cursor.
pub struct ListProjects<C> {
    catalog: C,
}

impl<C: ProjectCatalog> ListProjects<C> {
    /// Creates a new `ListProjects` use case.
    pub const fn new(catalog: C) -> Self {
        Self { catalog }
    }

    /// Executes the use case.
    ///
    /// Stops when a page has no next link. A next offset that does not move
    /// past the current one also stops the walk.
    ///
    /// # Errors
    /// Returns `ApplicationError::RemoteStore` if any page cannot be fetched.
    pub async fn execute(&self) -> ApplicationResult<ListProjectsOutput> {
        let mut projects = Vec::new();
        let mut pages = 0;
        let mut skip = 0;

        loop {
            let page = self
                .catalog
                .fetch_projects_page(skip)
                .await
                .map_err(|e| {
                    ApplicationError::remote(format!("listing projects at offset {skip}"), e)
                })?;
            pages += 1;

            let next = page.next_offset();
            debug!(skip, items = page.items.len(), ?next, "fetched projects page");
            projects.extend(page.items);

            match next {
                None => break,
                Some(next) if next <= skip => {
                    warn!(skip, next, "project page cursor did not advance, stopping");
                    break;
                }
                Some(next) => skip = next,
            }
        }

        Ok(ListProjectsOutput { projects, pages })
    }
}
