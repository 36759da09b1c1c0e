//! Administrator login via the OAuth2 password grant.

use std::fmt;

use chrono::{DateTime, Utc};

use crate::dto::TokenResponse;
use crate::error::{BootstrapError, BootstrapResult};

/// Public client used for administrative password grants.
pub const ADMIN_CLI_CLIENT_ID: &str = "admin-cli";

/// Authenticated context of a single run.
///
/// A session can only be built from a usable token, so every authenticated
/// call made through it carries a real bearer credential.
#[derive(Clone)]
pub struct AdminSession {
    bearer_token: String,
    issued_at: DateTime<Utc>,
    expires_in: Option<u64>,
    base_url: String,
    realm: String,
}

impl AdminSession {
    /// Creates a session, rejecting empty or `null` tokens.
    pub fn new(
        bearer_token: impl Into<String>,
        base_url: impl Into<String>,
        realm: impl Into<String>,
    ) -> BootstrapResult<Self> {
        let bearer_token = bearer_token.into();
        let trimmed = bearer_token.trim();
        if trimmed.is_empty() || trimmed == "null" {
            return Err(BootstrapError::Auth(
                "token response did not contain an access token".to_string(),
            ));
        }

        Ok(Self {
            bearer_token: trimmed.to_string(),
            issued_at: Utc::now(),
            expires_in: None,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            realm: realm.into(),
        })
    }

    fn with_expiry(mut self, expires_in: Option<u64>) -> Self {
        self.expires_in = expires_in;
        self
    }

    /// The bearer token.
    #[must_use]
    pub fn bearer_token(&self) -> &str {
        &self.bearer_token
    }

    /// When the token was obtained.
    #[must_use]
    pub fn issued_at(&self) -> DateTime<Utc> {
        self.issued_at
    }

    /// Token lifetime reported by the provider, in seconds.
    #[must_use]
    pub fn expires_in(&self) -> Option<u64> {
        self.expires_in
    }

    /// Provider base URL, without trailing slash.
    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Realm the administrator authenticated against.
    #[must_use]
    pub fn realm(&self) -> &str {
        &self.realm
    }
}

impl fmt::Debug for AdminSession {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AdminSession")
            .field("bearer_token", &"<redacted>")
            .field("issued_at", &self.issued_at)
            .field("expires_in", &self.expires_in)
            .field("base_url", &self.base_url)
            .field("realm", &self.realm)
            .finish()
    }
}

/// Administrator credentials.
#[derive(Clone)]
pub struct AdminCredentials {
    /// Admin username.
    pub username: String,
    /// Admin password.
    pub password: String,
    /// OAuth client used for the grant.
    pub client_id: String,
}

impl AdminCredentials {
    /// Credentials for the default `admin-cli` client.
    #[must_use]
    pub fn new(username: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            password: password.into(),
            client_id: ADMIN_CLI_CLIENT_ID.to_string(),
        }
    }
}

impl fmt::Debug for AdminCredentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AdminCredentials")
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .field("client_id", &self.client_id)
            .finish()
    }
}

/// Exchanges administrator credentials for a bearer token.
#[derive(Debug, Clone)]
pub struct TokenAuthenticator {
    http: reqwest::Client,
}

impl TokenAuthenticator {
    /// Creates an authenticator over the given HTTP client.
    #[must_use]
    pub fn new(http: reqwest::Client) -> Self {
        Self { http }
    }

    /// Performs one password-grant exchange against `master_realm`.
    ///
    /// A 2xx response without a usable `access_token` is treated the same as
    /// a rejected login. Never retried.
    pub async fn authenticate(
        &self,
        base_url: &str,
        master_realm: &str,
        credentials: &AdminCredentials,
    ) -> BootstrapResult<AdminSession> {
        let base_url = base_url.trim_end_matches('/');
        let token_url = format!(
            "{}/realms/{}/protocol/openid-connect/token",
            base_url,
            urlencoding::encode(master_realm)
        );

        let params = [
            ("username", credentials.username.as_str()),
            ("password", credentials.password.as_str()),
            ("grant_type", "password"),
            ("client_id", credentials.client_id.as_str()),
        ];

        tracing::debug!(url = %token_url, username = %credentials.username, "Requesting admin token");
        let response = self.http.post(&token_url).form(&params).send().await?;
        let status = response.status();
        let body = response.text().await?;

        if !status.is_success() {
            return Err(BootstrapError::Auth(format!(
                "token endpoint returned HTTP {}",
                status.as_u16()
            )));
        }

        let token: TokenResponse = serde_json::from_str(&body).map_err(|e| {
            BootstrapError::Auth(format!("token endpoint returned malformed JSON: {e}"))
        })?;

        let access_token = token.usable_token().ok_or_else(|| {
            BootstrapError::Auth("token response did not contain an access token".to_string())
        })?;

        let session = AdminSession::new(access_token, base_url, master_realm)?
            .with_expiry(token.expires_in);
        tracing::info!(
            realm = master_realm,
            token_type = token.token_type.as_deref().unwrap_or("Bearer"),
            issued_at = %session.issued_at(),
            expires_in = ?session.expires_in(),
            "Obtained admin token"
        );
        Ok(session)
    }
}
