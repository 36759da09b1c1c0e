//! Authenticated access to the provider's admin REST API.

use std::time::Duration;

use reqwest::{Response, StatusCode};
use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::dto::{ClientRepresentation, RealmDocument};
use crate::error::{BootstrapError, BootstrapResult};
use crate::session::AdminSession;

/// Builds the HTTP client shared by every step of a run.
pub fn http_client(timeout: Duration) -> BootstrapResult<reqwest::Client> {
    let client = reqwest::Client::builder()
        .timeout(timeout)
        .connect_timeout(timeout)
        .build()?;
    Ok(client)
}

/// Status and body of a mutating call.
///
/// Mutations report the raw status so callers can decide which statuses
/// count as success.
#[derive(Debug, Clone)]
pub struct WriteResponse {
    /// HTTP status.
    pub status: StatusCode,
    /// `Location` header, set by the provider on create.
    pub location: Option<String>,
    /// Response body, possibly empty.
    pub body: String,
}

impl WriteResponse {
    async fn from_response(response: Response) -> BootstrapResult<Self> {
        let status = response.status();
        let location = response
            .headers()
            .get(reqwest::header::LOCATION)
            .and_then(|value| value.to_str().ok())
            .map(ToString::to_string);
        let body = response.text().await?;
        Ok(Self {
            status,
            location,
            body,
        })
    }

    /// Last path segment of the `Location` header.
    #[must_use]
    pub fn created_id(&self) -> Option<String> {
        self.location
            .as_deref()
            .and_then(|location| location.trim_end_matches('/').rsplit('/').next())
            .filter(|id| !id.is_empty())
            .map(ToString::to_string)
    }
}

/// Admin API client bound to one session.
#[derive(Debug, Clone)]
pub struct AdminClient {
    http: reqwest::Client,
    session: AdminSession,
}

impl AdminClient {
    /// Creates a client that authenticates every call with `session`.
    #[must_use]
    pub fn new(http: reqwest::Client, session: AdminSession) -> Self {
        Self { http, session }
    }

    /// The session used for every call.
    #[must_use]
    pub fn session(&self) -> &AdminSession {
        &self.session
    }

    /// Lists clients whose `clientId` matches exactly.
    pub async fn find_clients(
        &self,
        realm: &str,
        client_id: &str,
    ) -> BootstrapResult<Vec<ClientRepresentation>> {
        let path = format!(
            "{}/clients?clientId={}",
            realm_path(realm),
            urlencoding::encode(client_id)
        );
        let clients: Vec<ClientRepresentation> = self.get(&path).await?;

        // The provider may treat the query as a search; keep exact matches only.
        Ok(clients
            .into_iter()
            .filter(|c| c.client_id == client_id)
            .collect())
    }

    /// Creates a client.
    pub async fn create_client(
        &self,
        realm: &str,
        client: &ClientRepresentation,
    ) -> BootstrapResult<WriteResponse> {
        self.write(reqwest::Method::POST, &format!("{}/clients", realm_path(realm)), client)
            .await
    }

    /// Replaces a client, addressed by its provider-assigned identifier.
    pub async fn update_client(
        &self,
        realm: &str,
        id: &str,
        client: &ClientRepresentation,
    ) -> BootstrapResult<WriteResponse> {
        let path = format!("{}/clients/{}", realm_path(realm), urlencoding::encode(id));
        self.write(reqwest::Method::PUT, &path, client).await
    }

    /// Fetches the full realm document.
    pub async fn get_realm(&self, realm: &str) -> BootstrapResult<RealmDocument> {
        self.get(&realm_path(realm)).await
    }

    /// Replaces the realm document.
    pub async fn update_realm(
        &self,
        realm: &str,
        document: &RealmDocument,
    ) -> BootstrapResult<WriteResponse> {
        self.write(reqwest::Method::PUT, &realm_path(realm), document)
            .await
    }

    async fn get<T: DeserializeOwned>(&self, path: &str) -> BootstrapResult<T> {
        let url = format!("{}{}", self.session.base_url(), path);
        tracing::debug!(%url, "GET");
        let response = self
            .http
            .get(&url)
            .bearer_auth(self.session.bearer_token())
            .send()
            .await?;

        let status = response.status();
        if status.is_success() {
            let body = response.text().await?;
            Ok(serde_json::from_str(&body)?)
        } else {
            let message = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            Err(BootstrapError::Api {
                status: status.as_u16(),
                message,
            })
        }
    }

    async fn write<B: Serialize + ?Sized>(
        &self,
        method: reqwest::Method,
        path: &str,
        body: &B,
    ) -> BootstrapResult<WriteResponse> {
        let url = format!("{}{}", self.session.base_url(), path);
        tracing::debug!(%url, %method, "Sending admin write");
        let response = self
            .http
            .request(method, &url)
            .bearer_auth(self.session.bearer_token())
            .json(body)
            .send()
            .await?;
        WriteResponse::from_response(response).await
    }
}

fn realm_path(realm: &str) -> String {
    format!("/admin/realms/{}", urlencoding::encode(realm))
}
