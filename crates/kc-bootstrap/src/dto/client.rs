//! Client DTOs for the Admin API.

use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Serialize};
use tabled::Tabled;

/// Redirect URI patterns always allowed for local development.
const LOCALHOST_REDIRECT_URIS: [&str; 2] = ["http://localhost:3000/*", "http://localhost:3001/*"];

/// Web origins always allowed for local development.
const LOCALHOST_WEB_ORIGINS: [&str; 2] = ["http://localhost:3000", "http://localhost:3001"];

/// Client as represented by the provider's admin API.
///
/// Used both to decode remote records and as the full document sent on
/// create and update.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ClientRepresentation {
    /// Provider-assigned identifier (absent on create).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    /// Client identifier (OAuth client_id).
    pub client_id: String,
    /// Display name.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// Description.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Whether the client is enabled.
    pub enabled: bool,
    /// Whether this is a public client.
    pub public_client: bool,
    /// Enable Authorization Code flow.
    pub standard_flow_enabled: bool,
    /// Enable Implicit flow.
    pub implicit_flow_enabled: bool,
    /// Enable Direct Access Grants.
    pub direct_access_grants_enabled: bool,
    /// Enable Service Account.
    pub service_accounts_enabled: bool,
    /// Allowed redirect URIs.
    pub redirect_uris: Vec<String>,
    /// Allowed web origins (CORS).
    pub web_origins: Vec<String>,
    /// Custom attributes.
    pub attributes: BTreeMap<String, String>,
}

/// Desired configuration of the managed client.
///
/// Built once per run from configuration inputs and never mutated after.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DesiredClientSpec {
    client_id: String,
    display_name: String,
    description: String,
    enabled: bool,
    public_client: bool,
    standard_flow_enabled: bool,
    implicit_flow_enabled: bool,
    direct_access_grants_enabled: bool,
    service_accounts_enabled: bool,
    redirect_uris: Vec<String>,
    web_origins: Vec<String>,
    attributes: BTreeMap<String, String>,
}

impl DesiredClientSpec {
    /// Creates the spec of a public browser client served from `frontend_url`.
    ///
    /// Redirect URIs and web origins start with the frontend origin, followed
    /// by the localhost fallbacks, without duplicates.
    #[must_use]
    pub fn for_frontend(client_id: impl Into<String>, frontend_url: &str) -> Self {
        let client_id = client_id.into();
        let frontend = frontend_url.trim_end_matches('/');

        let redirect_uris = dedup_ordered(
            [format!("{frontend}/auth/callback"), format!("{frontend}/*")]
                .into_iter()
                .chain(LOCALHOST_REDIRECT_URIS.iter().map(|s| (*s).to_string())),
        );
        let web_origins = dedup_ordered(
            std::iter::once(frontend.to_string())
                .chain(LOCALHOST_WEB_ORIGINS.iter().map(|s| (*s).to_string())),
        );

        let mut attributes = BTreeMap::new();
        attributes.insert("pkce.code.challenge.method".to_string(), "S256".to_string());
        attributes.insert("post.logout.redirect.uris".to_string(), format!("{frontend}/*"));

        Self {
            display_name: client_id.clone(),
            description: format!("Browser client for {frontend}"),
            client_id,
            enabled: true,
            public_client: true,
            standard_flow_enabled: true,
            implicit_flow_enabled: false,
            direct_access_grants_enabled: true,
            service_accounts_enabled: false,
            redirect_uris,
            web_origins,
            attributes,
        }
    }

    /// Sets the display name.
    #[must_use]
    pub fn with_display_name(mut self, display_name: impl Into<String>) -> Self {
        self.display_name = display_name.into();
        self
    }

    /// Sets the description.
    #[must_use]
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    /// Client identifier.
    #[must_use]
    pub fn client_id(&self) -> &str {
        &self.client_id
    }

    /// Ordered redirect URIs.
    #[must_use]
    pub fn redirect_uris(&self) -> &[String] {
        &self.redirect_uris
    }

    /// Ordered web origins.
    #[must_use]
    pub fn web_origins(&self) -> &[String] {
        &self.web_origins
    }

    /// Builds the full resource document, addressed by `id` when updating.
    #[must_use]
    pub fn to_representation(&self, id: Option<&str>) -> ClientRepresentation {
        ClientRepresentation {
            id: id.map(ToString::to_string),
            client_id: self.client_id.clone(),
            name: Some(self.display_name.clone()),
            description: Some(self.description.clone()),
            enabled: self.enabled,
            public_client: self.public_client,
            standard_flow_enabled: self.standard_flow_enabled,
            implicit_flow_enabled: self.implicit_flow_enabled,
            direct_access_grants_enabled: self.direct_access_grants_enabled,
            service_accounts_enabled: self.service_accounts_enabled,
            redirect_uris: self.redirect_uris.clone(),
            web_origins: self.web_origins.clone(),
            attributes: self.attributes.clone(),
        }
    }

    /// Fields checked after a mutation.
    #[must_use]
    pub fn expected_state(&self) -> ExpectedClientState {
        ExpectedClientState {
            enabled: self.enabled,
            public_client: self.public_client,
            standard_flow_enabled: self.standard_flow_enabled,
            redirect_uris: self.redirect_uris.iter().cloned().collect(),
        }
    }
}

/// Subset of client fields compared during verification.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExpectedClientState {
    /// Expected enabled flag.
    pub enabled: bool,
    /// Expected public-client flag.
    pub public_client: bool,
    /// Expected Authorization Code flow flag.
    pub standard_flow_enabled: bool,
    /// Expected redirect URIs; order is not significant.
    pub redirect_uris: BTreeSet<String>,
}

/// Client representation for display.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Tabled)]
#[serde(rename_all = "camelCase")]
pub struct ClientSnapshot {
    /// Internal ID.
    #[tabled(rename = "ID")]
    pub id: String,
    /// Client ID.
    #[tabled(rename = "Client ID")]
    pub client_id: String,
    /// Whether the client is enabled.
    #[tabled(rename = "Enabled")]
    pub enabled: bool,
    /// Whether it's a public client.
    #[tabled(rename = "Public")]
    pub public_client: bool,
    /// Whether the Authorization Code flow is enabled.
    #[tabled(rename = "Standard Flow")]
    pub standard_flow_enabled: bool,
    /// Redirect URIs joined for display.
    #[tabled(rename = "Redirect URIs")]
    pub redirect_uris: String,
}

impl From<&ClientRepresentation> for ClientSnapshot {
    fn from(client: &ClientRepresentation) -> Self {
        Self {
            id: client.id.clone().unwrap_or_default(),
            client_id: client.client_id.clone(),
            enabled: client.enabled,
            public_client: client.public_client,
            standard_flow_enabled: client.standard_flow_enabled,
            redirect_uris: client.redirect_uris.join(", "),
        }
    }
}

fn dedup_ordered(items: impl IntoIterator<Item = String>) -> Vec<String> {
    let mut seen = BTreeSet::new();
    items
        .into_iter()
        .filter(|item| seen.insert(item.clone()))
        .collect()
}
