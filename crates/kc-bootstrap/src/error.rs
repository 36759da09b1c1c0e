//! Bootstrap error types.

use thiserror::Error;

/// Bootstrap error type.
#[derive(Debug, Error)]
pub enum BootstrapError {
    /// Configuration error.
    #[error("configuration error: {0}")]
    Config(String),

    /// The provider never became reachable within the readiness budget.
    #[error("provider at {base_url} not reachable after {attempts} attempts")]
    Connectivity {
        /// Base URL that was probed.
        base_url: String,
        /// Number of probes issued.
        attempts: u32,
    },

    /// Authentication error (bad credentials or malformed token response).
    #[error("authentication error: {0}")]
    Auth(String),

    /// Creating a resource failed.
    #[error("failed to create {resource_type} '{id}': HTTP {status}")]
    ResourceCreate {
        /// Type of resource.
        resource_type: String,
        /// Resource identifier.
        id: String,
        /// HTTP status returned by the provider.
        status: u16,
    },

    /// Updating a resource failed.
    #[error("failed to update {resource_type} '{id}': HTTP {status}")]
    ResourceUpdate {
        /// Type of resource.
        resource_type: String,
        /// Resource identifier.
        id: String,
        /// HTTP status returned by the provider.
        status: u16,
    },

    /// A lookup that should match at most one resource matched several.
    #[error("{count} {resource_type} records match '{id}', expected at most one")]
    AmbiguousResource {
        /// Type of resource.
        resource_type: String,
        /// Resource identifier.
        id: String,
        /// Number of matches.
        count: usize,
    },

    /// Verified state differs from the desired state.
    #[error("{resource_type} '{id}' drifted from desired state: {fields}")]
    Drift {
        /// Type of resource.
        resource_type: String,
        /// Resource identifier.
        id: String,
        /// Comma-separated names of the drifted fields.
        fields: String,
    },

    /// API error.
    #[error("API error: {status} - {message}")]
    Api {
        /// HTTP status code.
        status: u16,
        /// Error message.
        message: String,
    },

    /// Resource not found.
    #[error("{resource_type} not found: {id}")]
    NotFound {
        /// Type of resource.
        resource_type: String,
        /// Resource identifier.
        id: String,
    },

    /// IO error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// HTTP request error.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),
}

impl BootstrapError {
    /// Process exit code for this error.
    #[must_use]
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::Connectivity { .. } => 3,
            Self::Auth(_) => 4,
            Self::ResourceCreate { .. } => 5,
            Self::AmbiguousResource { .. } => 6,
            Self::ResourceUpdate { .. } | Self::Drift { .. } => 7,
            Self::Config(_)
            | Self::Api { .. }
            | Self::NotFound { .. }
            | Self::Io(_)
            | Self::Json(_)
            | Self::Http(_) => 1,
        }
    }
}

/// Bootstrap result type.
pub type BootstrapResult<T> = Result<T, BootstrapError>;
