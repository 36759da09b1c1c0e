//! Waiting for the provider to accept connections.
//!
//! Attempts start at a fixed cadence of one per interval, and each probe is
//! cut off when its interval ends, so a hanging provider cannot stretch the
//! wait past `max_attempts × interval`.

use std::future::Future;
use std::time::Duration;

use reqwest::StatusCode;

/// Default number of probes before giving up.
pub const DEFAULT_MAX_ATTEMPTS: u32 = 60;

/// Default pause between probes.
pub const DEFAULT_INTERVAL: Duration = Duration::from_secs(2);

/// Shortest time a single probe is given, for very small intervals.
pub const MIN_PROBE_TIMEOUT: Duration = Duration::from_millis(250);

/// Health endpoint probed first.
pub const HEALTH_PATH: &str = "/health/ready";

/// Endpoint that answered a probe.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProbeEndpoint {
    /// The health endpoint answered.
    Health,
    /// The health endpoint was absent and the root path answered.
    Root,
}

/// Result of waiting for the provider.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Readiness {
    /// The provider answered.
    Ready {
        /// Probes issued, including the successful one.
        attempts: u32,
        /// Endpoint that answered.
        endpoint: ProbeEndpoint,
    },
    /// The budget ran out without an answer.
    TimedOut {
        /// Probes issued.
        attempts: u32,
    },
}

/// Polls the provider until it answers or the attempt budget is spent.
#[derive(Debug, Clone)]
pub struct ReadinessWaiter {
    http: reqwest::Client,
    max_attempts: u32,
    interval: Duration,
}

impl ReadinessWaiter {
    /// Creates a waiter.
    #[must_use]
    pub fn new(http: reqwest::Client, max_attempts: u32, interval: Duration) -> Self {
        Self {
            http,
            max_attempts,
            interval,
        }
    }

    /// Probes `base_url` at a fixed interval.
    ///
    /// Any HTTP response counts as reachable, including error statuses. Only
    /// transport failures count as not ready.
    pub async fn wait_until_ready(&self, base_url: &str) -> Readiness {
        let base_url = base_url.trim_end_matches('/');
        tracing::info!(
            %base_url,
            max_attempts = self.max_attempts,
            interval_secs = self.interval.as_secs_f64(),
            "Waiting for identity provider"
        );
        poll(self.max_attempts, self.interval, |_| self.probe(base_url)).await
    }

    async fn probe(&self, base_url: &str) -> Option<ProbeEndpoint> {
        let health_url = format!("{base_url}{HEALTH_PATH}");
        match self.http.get(&health_url).send().await {
            Ok(response) if response.status() == StatusCode::NOT_FOUND => {
                tracing::debug!("Health endpoint absent, probing root path");
                match self.http.get(format!("{base_url}/")).send().await {
                    Ok(_) => Some(ProbeEndpoint::Root),
                    // The health endpoint already answered, so the host is up.
                    Err(_) => Some(ProbeEndpoint::Health),
                }
            }
            Ok(response) => {
                tracing::debug!(status = %response.status(), "Health endpoint answered");
                Some(ProbeEndpoint::Health)
            }
            Err(e) => {
                tracing::debug!("Probe failed: {}", e);
                None
            }
        }
    }
}

/// Runs `probe` up to `max_attempts` times, starting one attempt per
/// `interval` (no pause after the last one).
///
/// A probe still pending after `interval` (at least [`MIN_PROBE_TIMEOUT`])
/// counts as not ready.
pub async fn poll<F, Fut>(max_attempts: u32, interval: Duration, mut probe: F) -> Readiness
where
    F: FnMut(u32) -> Fut,
    Fut: Future<Output = Option<ProbeEndpoint>>,
{
    let probe_timeout = interval.max(MIN_PROBE_TIMEOUT);

    for attempt in 1..=max_attempts {
        let next_attempt = tokio::time::Instant::now() + interval;
        let answered = tokio::time::timeout(probe_timeout, probe(attempt))
            .await
            .unwrap_or_else(|_| {
                tracing::debug!("Probe timed out after {:?}", probe_timeout);
                None
            });

        if let Some(endpoint) = answered {
            tracing::info!("Identity provider reachable after {} attempts", attempt);
            return Readiness::Ready {
                attempts: attempt,
                endpoint,
            };
        }

        tracing::info!("Identity provider not reachable, attempt {}/{}", attempt, max_attempts);
        if attempt < max_attempts {
            tokio::time::sleep_until(next_attempt).await;
        }
    }

    Readiness::TimedOut {
        attempts: max_attempts,
    }
}
