//! Readiness polling against a live mock server.

use std::time::Duration;

use kc_bootstrap::readiness::ProbeEndpoint;
use kc_bootstrap::{Readiness, ReadinessWaiter};
use wiremock::matchers::{method, path};
use wiremock::{Mock, ResponseTemplate};

use crate::common::MockProvider;

/// An erroring health endpoint still counts as reachable.
#[tokio::test]
async fn test_error_status_counts_as_reachable() -> anyhow::Result<()> {
    let provider = MockProvider::start().await;

    Mock::given(method("GET"))
        .and(path("/health/ready"))
        .respond_with(ResponseTemplate::new(503))
        .mount(&provider.server)
        .await;

    let waiter = ReadinessWaiter::new(reqwest::Client::new(), 3, Duration::from_millis(10));
    let readiness = waiter.wait_until_ready(&provider.url()).await;

    assert_eq!(
        readiness,
        Readiness::Ready {
            attempts: 1,
            endpoint: ProbeEndpoint::Health
        }
    );

    Ok(())
}

/// Providers without a health endpoint are probed at the root path.
#[tokio::test]
async fn test_root_fallback() -> anyhow::Result<()> {
    let provider = MockProvider::start().await;
    Mock::given(method("GET"))
        .and(path("/"))
        .respond_with(ResponseTemplate::new(200).set_body_string("Welcome"))
        .mount(&provider.server)
        .await;

    let waiter = ReadinessWaiter::new(reqwest::Client::new(), 1, Duration::ZERO);
    let readiness = waiter.wait_until_ready(&format!("{}/", provider.url())).await;

    assert_eq!(
        readiness,
        Readiness::Ready {
            attempts: 1,
            endpoint: ProbeEndpoint::Root
        }
    );

    Ok(())
}
