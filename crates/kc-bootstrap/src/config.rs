//! Bootstrap configuration.
//!
//! Values are layered: built-in defaults, then an optional TOML file, then
//! environment variables and command-line flags.

use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::dto::DesiredClientSpec;
use crate::error::{BootstrapError, BootstrapResult};
use crate::readiness::{DEFAULT_INTERVAL, DEFAULT_MAX_ATTEMPTS};

/// Bootstrap configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct BootstrapConfig {
    /// Provider base URL (e.g., http://localhost:8080).
    pub server_url: String,

    /// Realm the administrator authenticates against.
    pub master_realm: String,

    /// Realm holding the managed client.
    pub realm: String,

    /// Administrator credentials.
    pub admin: AdminConfig,

    /// Managed client.
    pub client: ClientConfig,

    /// Readiness polling.
    pub readiness: ReadinessConfig,

    /// Per-request timeout in seconds.
    pub request_timeout_secs: u64,

    /// Output format.
    pub output_format: OutputFormat,
}

impl Default for BootstrapConfig {
    fn default() -> Self {
        Self {
            server_url: "http://localhost:8080".to_string(),
            master_realm: "master".to_string(),
            realm: "ai-platform".to_string(),
            admin: AdminConfig::default(),
            client: ClientConfig::default(),
            readiness: ReadinessConfig::default(),
            request_timeout_secs: 30,
            output_format: OutputFormat::default(),
        }
    }
}

/// Administrator credentials.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AdminConfig {
    /// Username for the password grant.
    pub username: String,
    /// Password for the password grant.
    pub password: String,
}

impl Default for AdminConfig {
    fn default() -> Self {
        Self {
            username: "admin".to_string(),
            password: "admin".to_string(),
        }
    }
}

impl std::fmt::Debug for AdminConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AdminConfig")
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .finish()
    }
}

/// Managed client settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClientConfig {
    /// OAuth client id.
    pub client_id: String,
    /// Frontend origin feeding redirect URIs and web origins.
    pub frontend_url: String,
    /// Display name, defaults to the client id.
    pub display_name: Option<String>,
    /// Description.
    pub description: Option<String>,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            client_id: "chat-api".to_string(),
            frontend_url: "http://localhost:3001".to_string(),
            display_name: None,
            description: None,
        }
    }
}

/// Readiness polling settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ReadinessConfig {
    /// Probes before giving up.
    pub max_attempts: u32,
    /// Seconds between probes.
    pub interval_secs: u64,
}

impl Default for ReadinessConfig {
    fn default() -> Self {
        Self {
            max_attempts: DEFAULT_MAX_ATTEMPTS,
            interval_secs: DEFAULT_INTERVAL.as_secs(),
        }
    }
}

/// Values supplied by flags or environment variables.
#[derive(Debug, Clone, Default)]
pub struct ConfigOverrides {
    /// Provider base URL.
    pub server_url: Option<String>,
    /// Master realm.
    pub master_realm: Option<String>,
    /// Target realm.
    pub realm: Option<String>,
    /// Admin username.
    pub admin_username: Option<String>,
    /// Admin password.
    pub admin_password: Option<String>,
    /// Client id.
    pub client_id: Option<String>,
    /// Frontend origin.
    pub frontend_url: Option<String>,
    /// Client display name.
    pub display_name: Option<String>,
    /// Readiness probes.
    pub max_attempts: Option<u32>,
    /// Seconds between probes.
    pub interval_secs: Option<u64>,
    /// Request timeout in seconds.
    pub request_timeout_secs: Option<u64>,
    /// Output format.
    pub output_format: Option<OutputFormat>,
}

impl BootstrapConfig {
    /// Loads configuration from `path`, or from the default location if it
    /// exists, or falls back to defaults.
    ///
    /// An explicitly given path must exist.
    pub fn load(path: Option<&Path>) -> BootstrapResult<Self> {
        match path {
            Some(path) => Self::load_file(path),
            None => match Self::default_path() {
                Some(path) if path.exists() => Self::load_file(&path),
                _ => Ok(Self::default()),
            },
        }
    }

    fn load_file(path: &Path) -> BootstrapResult<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            BootstrapError::Config(format!("failed to read {}: {e}", path.display()))
        })?;
        toml::from_str(&content).map_err(|e| {
            BootstrapError::Config(format!("failed to parse {}: {e}", path.display()))
        })
    }

    /// Default configuration file path (`~/.keycloak/bootstrap.toml`).
    #[must_use]
    pub fn default_path() -> Option<PathBuf> {
        dirs_next::home_dir().map(|home| home.join(".keycloak").join("bootstrap.toml"))
    }

    /// Applies flag and environment overrides.
    #[must_use]
    pub fn with_overrides(mut self, overrides: ConfigOverrides) -> Self {
        fn set<T>(target: &mut T, value: Option<T>) {
            if let Some(value) = value {
                *target = value;
            }
        }

        set(&mut self.server_url, overrides.server_url);
        set(&mut self.master_realm, overrides.master_realm);
        set(&mut self.realm, overrides.realm);
        set(&mut self.admin.username, overrides.admin_username);
        set(&mut self.admin.password, overrides.admin_password);
        set(&mut self.client.client_id, overrides.client_id);
        set(&mut self.client.frontend_url, overrides.frontend_url);
        if overrides.display_name.is_some() {
            self.client.display_name = overrides.display_name;
        }
        set(&mut self.readiness.max_attempts, overrides.max_attempts);
        set(&mut self.readiness.interval_secs, overrides.interval_secs);
        set(&mut self.request_timeout_secs, overrides.request_timeout_secs);
        set(&mut self.output_format, overrides.output_format);
        self
    }

    /// Checks that the configuration is usable.
    pub fn validate(&self) -> BootstrapResult<()> {
        validate_http_url("server_url", &self.server_url)?;
        validate_http_url("client.frontend_url", &self.client.frontend_url)?;

        for (key, value) in [
            ("master_realm", &self.master_realm),
            ("realm", &self.realm),
            ("admin.username", &self.admin.username),
            ("client.client_id", &self.client.client_id),
        ] {
            if value.trim().is_empty() {
                return Err(BootstrapError::Config(format!("{key} must not be empty")));
            }
        }

        if self.readiness.max_attempts == 0 {
            return Err(BootstrapError::Config(
                "readiness.max_attempts must be at least 1".to_string(),
            ));
        }
        if self.request_timeout_secs == 0 {
            return Err(BootstrapError::Config(
                "request_timeout_secs must be at least 1".to_string(),
            ));
        }
        Ok(())
    }

    /// Pause between readiness probes.
    #[must_use]
    pub fn readiness_interval(&self) -> Duration {
        Duration::from_secs(self.readiness.interval_secs)
    }

    /// Per-request timeout.
    #[must_use]
    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    /// Desired state of the managed client.
    #[must_use]
    pub fn desired_client(&self) -> DesiredClientSpec {
        let mut spec =
            DesiredClientSpec::for_frontend(self.client.client_id.as_str(), &self.client.frontend_url);
        if let Some(name) = &self.client.display_name {
            spec = spec.with_display_name(name.as_str());
        }
        if let Some(description) = &self.client.description {
            spec = spec.with_description(description.as_str());
        }
        spec
    }
}

fn validate_http_url(key: &str, value: &str) -> BootstrapResult<()> {
    let url = reqwest::Url::parse(value)
        .map_err(|e| BootstrapError::Config(format!("{key} is not a valid URL ({value}): {e}")))?;
    match url.scheme() {
        "http" | "https" => Ok(()),
        scheme => Err(BootstrapError::Config(format!(
            "{key} must use http or https, got {scheme}"
        ))),
    }
}

/// Output format.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// Human-readable table format.
    #[default]
    Table,
    /// JSON format.
    Json,
    /// Quiet (status lines only).
    Quiet,
}
