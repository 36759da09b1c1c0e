//! Token endpoint DTOs.

use serde::Deserialize;

/// Response of the OIDC token endpoint.
///
/// Every field is optional: some deployments answer bad credentials with a
/// 2xx body that lacks a usable token.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct TokenResponse {
    /// The access token.
    pub access_token: Option<String>,
    /// Lifetime of the access token in seconds.
    pub expires_in: Option<u64>,
    /// Token type, usually `Bearer`.
    pub token_type: Option<String>,
}

impl TokenResponse {
    /// The access token if it is usable as a bearer credential.
    #[must_use]
    pub fn usable_token(&self) -> Option<&str> {
        self.access_token
            .as_deref()
            .map(str::trim)
            .filter(|token| !token.is_empty() && *token != "null")
    }
}
