//! Full command runs: wait, login, reconcile, verify.

use kc_bootstrap::cli::{BootstrapArgs, ClientArgs};
use kc_bootstrap::commands::{run_bootstrap, run_status, RunContext, RunOptions};
use kc_bootstrap::BootstrapError;
use serde_json::json;
use wiremock::matchers::{body_partial_json, body_string_contains, method, path};
use wiremock::{Mock, ResponseTemplate};

use crate::common::{stored_client, MockProvider, CLIENT_ID, CLIENT_UUID, REALM};

fn bootstrap_args() -> BootstrapArgs {
    BootstrapArgs {
        client: ClientArgs {
            client_id: None,
            frontend_url: None,
            display_name: None,
        },
        registration: true,
    }
}

/// A fresh provider ends up with the chat-api client and open registration.
#[tokio::test]
async fn test_bootstrap_fresh_provider() -> anyhow::Result<()> {
    let provider = MockProvider::start().await;
    provider.mount_health().await;
    provider.mount_token().await;
    provider.mount_client_lookup(json!([]), Some(1)).await;
    provider
        .mount_client_lookup(json!([stored_client("http://localhost:3001")]), None)
        .await;
    provider
        .mount_realm(json!({ "realm": REALM, "registrationAllowed": false }), Some(1))
        .await;
    provider
        .mount_realm(json!({ "realm": REALM, "registrationAllowed": true }), None)
        .await;

    Mock::given(method("POST"))
        .and(path(format!("/admin/realms/{REALM}/clients")))
        .and(body_partial_json(json!({
            "clientId": CLIENT_ID,
            "publicClient": true,
            "webOrigins": ["http://localhost:3001", "http://localhost:3000"],
            "attributes": { "pkce.code.challenge.method": "S256" }
        })))
        .respond_with(ResponseTemplate::new(201))
        .expect(1)
        .mount(&provider.server)
        .await;
    Mock::given(method("PUT"))
        .and(path(format!("/admin/realms/{REALM}")))
        .and(body_partial_json(json!({ "registrationAllowed": true })))
        .respond_with(ResponseTemplate::new(204))
        .expect(1)
        .mount(&provider.server)
        .await;

    let config = provider.config();
    let ctx = RunContext::new(&config, RunOptions::default())?;
    run_bootstrap(bootstrap_args(), &ctx).await?;

    Ok(())
}

/// Rejected credentials stop the run before any admin call.
#[tokio::test]
async fn test_bootstrap_rejected_credentials() -> anyhow::Result<()> {
    let provider = MockProvider::start().await;
    provider.mount_health().await;

    Mock::given(method("POST"))
        .and(path("/realms/master/protocol/openid-connect/token"))
        .and(body_string_contains("grant_type=password"))
        .and(body_string_contains("client_id=admin-cli"))
        .respond_with(
            ResponseTemplate::new(401).set_body_json(json!({ "error": "invalid_grant" })),
        )
        .expect(1)
        .mount(&provider.server)
        .await;
    Mock::given(method("GET"))
        .and(path(format!("/admin/realms/{REALM}/clients")))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .expect(0)
        .mount(&provider.server)
        .await;

    let mut config = provider.config();
    config.admin.password = "wrong".to_string();
    let ctx = RunContext::new(&config, RunOptions::default())?;
    let err = run_bootstrap(bootstrap_args(), &ctx).await.unwrap_err();

    assert!(matches!(err, BootstrapError::Auth(_)));
    assert_eq!(err.exit_code(), 4);

    Ok(())
}

/// A refused client update is a warning unless the run is strict.
#[tokio::test]
async fn test_update_failure_respects_strict_mode() -> anyhow::Result<()> {
    let provider = MockProvider::start().await;
    provider.mount_token().await;
    provider
        .mount_client_lookup(json!([stored_client("http://localhost:3001")]), None)
        .await;
    provider
        .mount_realm(json!({ "realm": REALM, "registrationAllowed": true }), None)
        .await;

    Mock::given(method("PUT"))
        .and(path(format!("/admin/realms/{REALM}/clients/{CLIENT_UUID}")))
        .respond_with(ResponseTemplate::new(500).set_body_string("boom"))
        .mount(&provider.server)
        .await;

    let config = provider.config();

    let lenient = RunContext::new(
        &config,
        RunOptions {
            skip_wait: true,
            strict: false,
        },
    )?;
    run_bootstrap(bootstrap_args(), &lenient).await?;

    let strict = RunContext::new(
        &config,
        RunOptions {
            skip_wait: true,
            strict: true,
        },
    )?;
    let err = run_bootstrap(bootstrap_args(), &strict).await.unwrap_err();
    assert!(matches!(err, BootstrapError::ResourceUpdate { status: 500, .. }));
    assert_eq!(err.exit_code(), 7);

    Ok(())
}

/// An unreachable provider exhausts the probe budget.
#[tokio::test]
async fn test_status_unreachable_provider() -> anyhow::Result<()> {
    let listener = std::net::TcpListener::bind("127.0.0.1:0")?;
    let port = listener.local_addr()?.port();
    drop(listener);

    let provider = MockProvider::start().await;
    let mut config = provider.config();
    config.server_url = format!("http://127.0.0.1:{port}");
    config.readiness.max_attempts = 2;

    let ctx = RunContext::new(&config, RunOptions::default())?;
    let err = run_status(&ctx).await.unwrap_err();

    assert!(matches!(err, BootstrapError::Connectivity { attempts: 2, .. }));
    assert_eq!(err.exit_code(), 3);

    Ok(())
}
