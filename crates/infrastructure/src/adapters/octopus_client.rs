//! Octopus Deploy REST client using reqwest.
//!
//! This adapter implements the [`VariableStore`], [`ProjectCatalog`] and
//! [`ScopeCatalog`] ports against the server's JSON API:
//!
//! - `GET  api/projects/{id}`
//! - `GET  api/projects?skip={n}`
//! - `GET  api/variables/{variable_set_id}`
//! - `PUT  api/variables/{variable_set_id}`
//! - `GET  api/environments/{id}`
//! - `GET  api/machines/{id}`

use async_trait::async_trait;
use reqwest::{Client, RequestBuilder, Response, StatusCode};
use serde::Deserialize;
use serde::de::DeserializeOwned;
use tracing::{debug, warn};
use url::Url;

use octovars_application::ports::{ProjectCatalog, RemoteStoreError, ScopeCatalog, VariableStore};
use octovars_domain::{Environment, Machine, Page, Project, VariableSet};

use crate::settings::{ClientConfig, Credentials};

/// Header carrying the API key.
pub const API_KEY_HEADER: &str = "X-Octopus-ApiKey";

const USER_AGENT: &str = concat!("octovars/", env!("CARGO_PKG_VERSION"));

/// Error envelope returned with non-success responses.
#[derive(Debug, Default, Deserialize)]
struct ApiErrorResponse {
    #[serde(rename = "ErrorMessage", default)]
    message: String,
    #[serde(rename = "Errors", default)]
    errors: Vec<String>,
}

impl ApiErrorResponse {
    fn describe(self) -> String {
        if self.errors.is_empty() {
            self.message
        } else if self.message.is_empty() {
            self.errors.join("; ")
        } else {
            format!("{}: {}", self.message, self.errors.join("; "))
        }
    }
}

/// Client for the Octopus Deploy REST API.
///
/// Cheap to clone; clones share the underlying connection pool.
#[derive(Debug, Clone)]
pub struct OctopusClient {
    client: Client,
    api_base: Url,
    credentials: Credentials,
}

impl OctopusClient {
    /// Creates a client from validated configuration.
    ///
    /// # Errors
    ///
    /// Returns `RemoteStoreError::Transport` if the HTTP client cannot be
    /// built (for example when no TLS backend is available).
    pub fn new(config: &ClientConfig) -> Result<Self, RemoteStoreError> {
        let client = Client::builder()
            .user_agent(USER_AGENT)
            .timeout(config.timeout())
            .build()
            .map_err(|e| RemoteStoreError::Transport(e.to_string()))?;

        Ok(Self::with_client(client, config))
    }

    /// Creates a client around an existing reqwest client.
    #[must_use]
    pub fn with_client(client: Client, config: &ClientConfig) -> Self {
        Self {
            client,
            api_base: config.api_base().clone(),
            credentials: config.credentials().clone(),
        }
    }

    /// Builds `api/<segments...>`, percent-encoding each segment.
    fn endpoint(&self, segments: &[&str]) -> Result<Url, RemoteStoreError> {
        let mut url = self.api_base.clone();
        url.path_segments_mut()
            .map_err(|()| {
                RemoteStoreError::Transport(format!("'{}' cannot be a base URL", self.api_base))
            })?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    fn authorize(&self, builder: RequestBuilder) -> RequestBuilder {
        match &self.credentials {
            Credentials::ApiKey(key) => builder.header(API_KEY_HEADER, key.as_str()),
            Credentials::Basic { username, password } => {
                builder.basic_auth(username, password.as_deref())
            }
        }
    }

    async fn get_json<T: DeserializeOwned>(
        &self,
        url: Url,
        what: &str,
    ) -> Result<T, RemoteStoreError> {
        debug!(%url, "GET");
        let builder = self.authorize(self.client.get(url));
        self.send(builder, what).await
    }

    async fn send<T: DeserializeOwned>(
        &self,
        builder: RequestBuilder,
        what: &str,
    ) -> Result<T, RemoteStoreError> {
        let response = builder.send().await.map_err(Self::map_error)?;
        let status = response.status();
        debug!(status = status.as_u16(), what, "response received");

        if status == StatusCode::NOT_FOUND {
            return Err(RemoteStoreError::NotFound(what.to_string()));
        }
        if !status.is_success() {
            return Err(Self::rejection(status, response).await);
        }

        response
            .json::<T>()
            .await
            .map_err(|e| RemoteStoreError::InvalidResponse(format!("{what}: {e}")))
    }

    /// Reads the error envelope from a non-success response.
    async fn rejection(status: StatusCode, response: Response) -> RemoteStoreError {
        let body = response.text().await.unwrap_or_default();
        let message = serde_json::from_str::<ApiErrorResponse>(&body)
            .map(ApiErrorResponse::describe)
            .ok()
            .filter(|message| !message.is_empty())
            .unwrap_or_else(|| {
                if body.trim().is_empty() {
                    status.canonical_reason().unwrap_or("unknown error").to_string()
                } else {
                    body
                }
            });

        warn!(status = status.as_u16(), %message, "request rejected");
        RemoteStoreError::Rejected {
            status: status.as_u16(),
            message,
        }
    }

    /// Maps reqwest errors to `RemoteStoreError`.
    fn map_error(error: reqwest::Error) -> RemoteStoreError {
        if error.is_timeout() {
            return RemoteStoreError::Timeout;
        }
        if error.is_decode() {
            return RemoteStoreError::InvalidResponse(error.to_string());
        }
        RemoteStoreError::Transport(error.to_string())
    }
}

#[async_trait]
impl ProjectCatalog for OctopusClient {
    async fn fetch_project(&self, id_or_slug: &str) -> Result<Project, RemoteStoreError> {
        let url = self.endpoint(&["projects", id_or_slug])?;
        self.get_json(url, &format!("project '{id_or_slug}'")).await
    }

    async fn fetch_projects_page(&self, skip: usize) -> Result<Page<Project>, RemoteStoreError> {
        let mut url = self.endpoint(&["projects"])?;
        url.query_pairs_mut()
            .append_pair("skip", &skip.to_string());
        self.get_json(url, &format!("projects page at offset {skip}"))
            .await
    }
}

#[async_trait]
impl VariableStore for OctopusClient {
    async fn fetch_variable_set(&self, project_id: &str) -> Result<VariableSet, RemoteStoreError> {
        let project = self.fetch_project(project_id).await?;
        if !project.has_variable_set() {
            return Err(RemoteStoreError::NotFound(format!(
                "variable set of project '{project_id}'"
            )));
        }

        let url = self.endpoint(&["variables", &project.variable_set_id])?;
        self.get_json(url, &format!("variable set '{}'", project.variable_set_id))
            .await
    }

    async fn persist_variable_set(
        &self,
        variable_set: &VariableSet,
    ) -> Result<VariableSet, RemoteStoreError> {
        let url = self.endpoint(&["variables", &variable_set.id])?;
        debug!(
            %url,
            version = variable_set.version,
            variables = variable_set.len(),
            "PUT"
        );
        let builder = self.authorize(self.client.put(url)).json(variable_set);
        self.send(builder, &format!("variable set '{}'", variable_set.id))
            .await
    }
}

#[async_trait]
impl ScopeCatalog for OctopusClient {
    async fn fetch_environment(&self, id_or_slug: &str) -> Result<Environment, RemoteStoreError> {
        let url = self.endpoint(&["environments", id_or_slug])?;
        self.get_json(url, &format!("environment '{id_or_slug}'"))
            .await
    }

    async fn fetch_machine(&self, id_or_slug: &str) -> Result<Machine, RemoteStoreError> {
        let url = self.endpoint(&["machines", id_or_slug])?;
        self.get_json(url, &format!("machine '{id_or_slug}'")).await
    }
}
