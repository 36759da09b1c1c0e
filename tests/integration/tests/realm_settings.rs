//! Realm settings reconciliation against the mocked admin API.

use kc_bootstrap::dto::RealmSettingsPatch;
use kc_bootstrap::verify::StateVerifier;
use kc_bootstrap::{ReconciliationOutcome, ReportOnlyInspector, ResourceReconciler};
use serde_json::json;
use wiremock::matchers::{body_partial_json, method, path};
use wiremock::{Mock, ResponseTemplate};

use crate::common::{MockProvider, REALM};

/// Enabling registration writes once, then leaves the realm alone.
#[tokio::test]
async fn test_registration_is_idempotent() -> anyhow::Result<()> {
    let provider = MockProvider::start().await;
    provider.mount_token().await;
    provider
        .mount_realm(
            json!({ "realm": REALM, "enabled": true, "registrationAllowed": false }),
            Some(1),
        )
        .await;
    provider
        .mount_realm(
            json!({ "realm": REALM, "enabled": true, "registrationAllowed": true }),
            None,
        )
        .await;

    Mock::given(method("PUT"))
        .and(path(format!("/admin/realms/{REALM}")))
        .and(body_partial_json(json!({
            "realm": REALM,
            "enabled": true,
            "registrationAllowed": true
        })))
        .respond_with(ResponseTemplate::new(204))
        .expect(1)
        .mount(&provider.server)
        .await;

    let api = provider.login().await?;
    let reconciler = ResourceReconciler::new(&api);
    let patch = RealmSettingsPatch::registration(true);

    let first = reconciler.reconcile_realm_settings(REALM, &patch).await?;
    assert_eq!(first, ReconciliationOutcome::Updated);

    let second = reconciler.reconcile_realm_settings(REALM, &patch).await?;
    assert_eq!(second, ReconciliationOutcome::AlreadyCurrent);

    let verification = StateVerifier::new(&api)
        .verify_realm_settings(REALM, &patch)
        .await?;
    assert!(!verification.has_drift());
    assert_eq!(verification.snapshot().registration_allowed, Some(true));

    Ok(())
}

/// A refused realm update is reported, not raised.
#[tokio::test]
async fn test_refused_flag_update_is_not_fatal() -> anyhow::Result<()> {
    let provider = MockProvider::start().await;
    provider.mount_token().await;
    provider
        .mount_realm(json!({ "realm": REALM, "verifyEmail": false }), None)
        .await;

    Mock::given(method("PUT"))
        .and(path(format!("/admin/realms/{REALM}")))
        .respond_with(ResponseTemplate::new(403).set_body_string("forbidden"))
        .mount(&provider.server)
        .await;

    let api = provider.login().await?;
    let outcome = ResourceReconciler::new(&api)
        .reconcile_realm_flag(REALM, "verifyEmail", true)
        .await?;

    assert!(!outcome.is_fatal());
    assert!(matches!(outcome, ReconciliationOutcome::Failed(ref f) if f.status == 403));

    let verification = StateVerifier::new(&api)
        .verify_realm_flag(REALM, "verifyEmail", true)
        .await?;
    assert!(verification.has_drift());

    Ok(())
}

/// Inspection reads the realm without writing.
#[tokio::test]
async fn test_inspection_never_writes() -> anyhow::Result<()> {
    let provider = MockProvider::start().await;
    provider.mount_token().await;
    provider
        .mount_realm(
            json!({ "realm": REALM, "enabled": true, "registrationAllowed": true }),
            None,
        )
        .await;

    Mock::given(method("PUT"))
        .respond_with(ResponseTemplate::new(204))
        .expect(0)
        .mount(&provider.server)
        .await;
    Mock::given(method("POST"))
        .and(path(format!("/admin/realms/{REALM}/clients")))
        .respond_with(ResponseTemplate::new(201))
        .expect(0)
        .mount(&provider.server)
        .await;
    provider.mount_client_lookup(json!([]), None).await;

    let api = provider.login().await?;
    let inspector = ReportOnlyInspector::new(&api);

    let snapshot = inspector.inspect_realm(REALM).await?;
    assert_eq!(snapshot.registration_allowed, Some(true));
    assert_eq!(snapshot.verify_email, None);

    assert!(inspector.inspect_client(REALM, "chat-api").await?.is_none());

    Ok(())
}
