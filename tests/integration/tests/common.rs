//! Common test utilities and fixtures.

use std::time::Duration;

use kc_bootstrap::api::http_client;
use kc_bootstrap::dto::DesiredClientSpec;
use kc_bootstrap::session::AdminCredentials;
use kc_bootstrap::{AdminClient, BootstrapConfig, TokenAuthenticator};
use serde_json::{json, Value};
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// Realm holding the managed client in every test.
pub const REALM: &str = "ai-platform";

/// Managed client id in every test.
pub const CLIENT_ID: &str = "chat-api";

/// Provider-assigned id of the managed client.
pub const CLIENT_UUID: &str = "0b7c3c1e-2f5a-4a8e-9d41-7c1f3e6a2b90";

/// Access token handed out by the mocked token endpoint.
pub const TOKEN: &str = "test-admin-token";

/// Mocked identity provider.
pub struct MockProvider {
    /// Underlying mock server.
    pub server: MockServer,
}

impl MockProvider {
    /// Starts an empty provider.
    pub async fn start() -> Self {
        init_tracing();
        Self {
            server: MockServer::start().await,
        }
    }

    /// Base URL of the provider.
    pub fn url(&self) -> String {
        self.server.uri()
    }

    /// Answers the readiness probe.
    pub async fn mount_health(&self) {
        Mock::given(method("GET"))
            .and(path("/health/ready"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"status": "UP"})))
            .mount(&self.server)
            .await;
    }

    /// Accepts the default admin credentials on the master realm.
    pub async fn mount_token(&self) {
        Mock::given(method("POST"))
            .and(path("/realms/master/protocol/openid-connect/token"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "access_token": TOKEN,
                "expires_in": 60,
                "token_type": "Bearer"
            })))
            .mount(&self.server)
            .await;
    }

    /// Serves `clients` for the lookup of the managed client.
    ///
    /// With `times` set, the response is served that many times and later
    /// lookups fall through to lower-priority mocks.
    pub async fn mount_client_lookup(&self, clients: Value, times: Option<u64>) {
        let mut mock = Mock::given(method("GET"))
            .and(path(format!("/admin/realms/{REALM}/clients")))
            .and(query_param("clientId", CLIENT_ID))
            .respond_with(ResponseTemplate::new(200).set_body_json(clients));
        if let Some(times) = times {
            mock = mock.up_to_n_times(times).with_priority(1);
        }
        mock.mount(&self.server).await;
    }

    /// Serves `document` as the realm representation.
    pub async fn mount_realm(&self, document: Value, times: Option<u64>) {
        let mut mock = Mock::given(method("GET"))
            .and(path(format!("/admin/realms/{REALM}")))
            .respond_with(ResponseTemplate::new(200).set_body_json(document));
        if let Some(times) = times {
            mock = mock.up_to_n_times(times).with_priority(1);
        }
        mock.mount(&self.server).await;
    }

    /// Configuration pointing at this provider with a single quick probe.
    pub fn config(&self) -> BootstrapConfig {
        let mut config = BootstrapConfig {
            server_url: self.url(),
            ..BootstrapConfig::default()
        };
        config.readiness.max_attempts = 1;
        config.readiness.interval_secs = 0;
        config.request_timeout_secs = 5;
        config
    }

    /// Logs in with the default credentials.
    pub async fn login(&self) -> anyhow::Result<AdminClient> {
        let http = http_client(Duration::from_secs(5))?;
        let session = TokenAuthenticator::new(http.clone())
            .authenticate(&self.url(), "master", &AdminCredentials::new("admin", "admin"))
            .await?;
        Ok(AdminClient::new(http, session))
    }
}

/// The managed client as the provider returns it once synced.
pub fn stored_client(frontend_url: &str) -> Value {
    let representation = DesiredClientSpec::for_frontend(CLIENT_ID, frontend_url)
        .to_representation(Some(CLIENT_UUID));
    serde_json::to_value(representation).unwrap()
}

/// Initializes tracing once for the test binary.
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter("kc_bootstrap=debug")
        .with_test_writer()
        .try_init();
}
