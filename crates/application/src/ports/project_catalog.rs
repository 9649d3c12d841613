//! Project catalog port

use async_trait::async_trait;

use octovars_domain::{Page, Project};

use super::RemoteStoreError;

/// Read access to the server's projects.
#[async_trait]
pub trait ProjectCatalog: Send + Sync {
    /// Fetches a project by identifier or slug.
    ///
    /// # Errors
    /// Returns `RemoteStoreError::NotFound` if no such project exists.
    async fn fetch_project(&self, id_or_slug: &str) -> Result<Project, RemoteStoreError>;

    /// Fetches one page of projects, skipping the first `skip` items.
    async fn fetch_projects_page(&self, skip: usize) -> Result<Page<Project>, RemoteStoreError>;
}
