//! Client configuration
//!
//! Settings are layered with the `config` crate: an optional file, then
//! `OCTOPUS_*` environment variables, then explicit overrides (usually
//! command-line flags). The merged [`ClientSettings`] are validated once
//! into a [`ClientConfig`].

use std::fmt;
use std::path::Path;
use std::time::Duration;

use config::{Config, Environment, File};
use serde::Deserialize;
use url::Url;

/// Prefix for environment variables (`OCTOPUS_SERVER_URL`, ...).
pub const ENV_PREFIX: &str = "OCTOPUS";

/// Request timeout used when none is configured.
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

const REDACTED: &str = "<redacted>";

/// Errors raised while loading or validating settings.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// A configuration source could not be read or merged.
    #[error("failed to load configuration: {0}")]
    Load(#[from] config::ConfigError),

    /// No server URL was given.
    #[error("server_url is required (set OCTOPUS_SERVER_URL or pass --server-url)")]
    MissingServerUrl,

    /// The server URL is not an absolute http(s) URL.
    #[error("invalid server_url '{url}': {reason}")]
    InvalidServerUrl {
        /// The rejected value.
        url: String,
        /// Why it was rejected.
        reason: String,
    },

    /// Both an API key and a username/password were given.
    #[error("api_key cannot be combined with username or password")]
    ConflictingCredentials,

    /// A password was given without a username.
    #[error("password was specified without a username")]
    PasswordWithoutUsername,

    /// Neither an API key nor a username was given.
    #[error("neither username nor api_key was specified; set OCTOPUS_API_KEY or OCTOPUS_USER")]
    MissingCredentials,

    /// The timeout is zero.
    #[error("timeout_secs must be greater than zero")]
    InvalidTimeout,
}

/// Raw, unvalidated settings as merged from all sources.
#[derive(Clone, Default)]
pub struct ClientSettings {
    /// Base URL of the server, for example `https://octopus.example.com`.
    pub server_url: Option<String>,
    /// API key sent in the `X-Octopus-ApiKey` header.
    pub api_key: Option<String>,
    /// Username for basic authentication, read from `username` or `user`.
    pub username: Option<String>,
    /// Password for basic authentication.
    pub password: Option<String>,
    /// Per-request timeout in seconds.
    pub timeout_secs: Option<u64>,
}

/// Merged keys before `user` is folded into `username`.
#[derive(Deserialize)]
struct RawSettings {
    server_url: Option<String>,
    api_key: Option<String>,
    username: Option<String>,
    user: Option<String>,
    password: Option<String>,
    timeout_secs: Option<u64>,
}

impl From<RawSettings> for ClientSettings {
    fn from(raw: RawSettings) -> Self {
        Self {
            server_url: raw.server_url,
            api_key: raw.api_key,
            username: raw.username.or(raw.user),
            password: raw.password,
            timeout_secs: raw.timeout_secs,
        }
    }
}

impl fmt::Debug for ClientSettings {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ClientSettings")
            .field("server_url", &self.server_url)
            .field("api_key", &self.api_key.as_ref().map(|_| REDACTED))
            .field("username", &self.username)
            .field("password", &self.password.as_ref().map(|_| REDACTED))
            .field("timeout_secs", &self.timeout_secs)
            .finish()
    }
}

/// Values that take precedence over file and environment settings.
#[derive(Debug, Clone, Default)]
pub struct SettingsOverrides {
    /// Overrides `server_url`.
    pub server_url: Option<String>,
    /// Overrides `api_key`.
    pub api_key: Option<String>,
    /// Overrides `username`.
    pub username: Option<String>,
    /// Overrides `password`.
    pub password: Option<String>,
}

impl ClientSettings {
    /// Loads settings from an optional file, the `OCTOPUS_*` environment
    /// and `overrides`, later sources winning.
    ///
    /// `username` and `user` are both accepted; when both are present
    /// `username` is used.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Load` if the file is missing or malformed, or
    /// if a value has the wrong type.
    pub fn load(file: Option<&Path>, overrides: &SettingsOverrides) -> Result<Self, ConfigError> {
        Self::load_with(file, Environment::with_prefix(ENV_PREFIX), overrides)
    }

    fn load_with(
        file: Option<&Path>,
        environment: Environment,
        overrides: &SettingsOverrides,
    ) -> Result<Self, ConfigError> {
        let mut builder = Config::builder();
        if let Some(path) = file {
            builder = builder.add_source(File::from(path).required(true));
        }

        let raw: RawSettings = builder
            .add_source(environment)
            .set_override_option("server_url", overrides.server_url.clone())?
            .set_override_option("api_key", overrides.api_key.clone())?
            .set_override_option("username", overrides.username.clone())?
            .set_override_option("password", overrides.password.clone())?
            .build()?
            .try_deserialize()?;
        Ok(raw.into())
    }
}

/// How requests are authenticated.
#[derive(Clone, PartialEq, Eq)]
pub enum Credentials {
    /// An API key.
    ApiKey(String),
    /// HTTP basic authentication.
    Basic {
        /// Username.
        username: String,
        /// Optional password.
        password: Option<String>,
    },
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ApiKey(_) => f.debug_tuple("ApiKey").field(&REDACTED).finish(),
            Self::Basic { username, password } => f
                .debug_struct("Basic")
                .field("username", username)
                .field("password", &password.as_ref().map(|_| REDACTED))
                .finish(),
        }
    }
}

/// Validated client configuration.
#[derive(Debug, Clone)]
pub struct ClientConfig {
    server_url: Url,
    api_base: Url,
    credentials: Credentials,
    timeout: Duration,
}

impl ClientConfig {
    /// Creates a configuration with the default timeout.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::InvalidServerUrl` if `server_url` is not an
    /// absolute http or https URL.
    pub fn new(server_url: &str, credentials: Credentials) -> Result<Self, ConfigError> {
        let server_url = parse_server_url(server_url)?;
        let api_base = server_url
            .join("api/")
            .map_err(|e| ConfigError::InvalidServerUrl {
                url: server_url.to_string(),
                reason: e.to_string(),
            })?;

        Ok(Self {
            server_url,
            api_base,
            credentials,
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
        })
    }

    /// Returns this configuration with a different request timeout.
    #[must_use]
    pub const fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// The server's base URL, always ending in `/`.
    #[must_use]
    pub const fn server_url(&self) -> &Url {
        &self.server_url
    }

    /// Root of the REST API (`<server_url>/api/`).
    #[must_use]
    pub const fn api_base(&self) -> &Url {
        &self.api_base
    }

    /// How requests are authenticated.
    #[must_use]
    pub const fn credentials(&self) -> &Credentials {
        &self.credentials
    }

    /// Per-request timeout.
    #[must_use]
    pub const fn timeout(&self) -> Duration {
        self.timeout
    }
}

impl TryFrom<ClientSettings> for ClientConfig {
    type Error = ConfigError;

    fn try_from(settings: ClientSettings) -> Result<Self, Self::Error> {
        let server_url = non_empty(settings.server_url).ok_or(ConfigError::MissingServerUrl)?;
        let credentials = match (
            non_empty(settings.api_key),
            non_empty(settings.username),
            non_empty(settings.password),
        ) {
            (Some(_), Some(_), _) | (Some(_), _, Some(_)) => {
                return Err(ConfigError::ConflictingCredentials);
            }
            (Some(key), None, None) => Credentials::ApiKey(key),
            (None, Some(username), password) => Credentials::Basic { username, password },
            (None, None, Some(_)) => return Err(ConfigError::PasswordWithoutUsername),
            (None, None, None) => return Err(ConfigError::MissingCredentials),
        };

        let timeout_secs = settings.timeout_secs.unwrap_or(DEFAULT_TIMEOUT_SECS);
        if timeout_secs == 0 {
            return Err(ConfigError::InvalidTimeout);
        }

        Ok(Self::new(&server_url, credentials)?.with_timeout(Duration::from_secs(timeout_secs)))
    }
}

fn non_empty(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

fn parse_server_url(raw: &str) -> Result<Url, ConfigError> {
    let invalid = |reason: String| ConfigError::InvalidServerUrl {
        url: raw.to_string(),
        reason,
    };

    let mut url = Url::parse(raw.trim()).map_err(|e| invalid(e.to_string()))?;
    if !matches!(url.scheme(), "http" | "https") {
        return Err(invalid(format!("unsupported scheme '{}'", url.scheme())));
    }
    if url.cannot_be_a_base() || url.host_str().is_none() {
        return Err(invalid("missing host".to_string()));
    }

    // A base without a trailing slash would lose its last segment on join.
    if !url.path().ends_with('/') {
        let path = format!("{}/", url.path());
        url.set_path(&path);
    }
    url.set_query(None);
    url.set_fragment(None);
    Ok(url)
}
