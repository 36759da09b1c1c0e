//! Command implementations.
//!
//! Every command runs its steps strictly in sequence: wait for the provider,
//! log in, reconcile or inspect, verify.

pub mod bootstrap;
pub mod client;
pub mod config;
pub mod realm;
pub mod status;

pub use bootstrap::run_bootstrap;
pub use client::run_client;
pub use config::run_config;
pub use realm::run_realm;
pub use status::run_status;

use serde::Serialize;
use tabled::Tabled;

use crate::api::{self, AdminClient};
use crate::config::{BootstrapConfig, OutputFormat};
use crate::output::{drift, info, output_single, success, warning};
use crate::readiness::{Readiness, ReadinessWaiter};
use crate::reconcile::ReconciliationOutcome;
use crate::session::{AdminCredentials, TokenAuthenticator};
use crate::verify::Verification;
use crate::{BootstrapError, BootstrapResult};

/// Flags shared by every command.
#[derive(Debug, Clone, Copy, Default)]
pub struct RunOptions {
    /// Skip the readiness wait.
    pub skip_wait: bool,
    /// Treat update failures and drift as errors.
    pub strict: bool,
}

/// Configuration and HTTP client of one run.
pub struct RunContext<'a> {
    config: &'a BootstrapConfig,
    http: reqwest::Client,
    options: RunOptions,
}

impl<'a> RunContext<'a> {
    /// Creates the context, building the HTTP client with the configured timeout.
    pub fn new(config: &'a BootstrapConfig, options: RunOptions) -> BootstrapResult<Self> {
        let http = api::http_client(config.request_timeout())?;
        Ok(Self {
            config,
            http,
            options,
        })
    }

    /// Effective configuration.
    #[must_use]
    pub fn config(&self) -> &BootstrapConfig {
        self.config
    }

    fn output_format(&self) -> OutputFormat {
        self.config.output_format
    }

    /// Waits for the provider unless waiting was skipped.
    pub async fn wait_for_provider(&self) -> BootstrapResult<()> {
        if self.options.skip_wait {
            info("Skipping readiness wait");
            return Ok(());
        }
        self.wait().await
    }

    async fn wait(&self) -> BootstrapResult<()> {
        let waiter = ReadinessWaiter::new(
            self.http.clone(),
            self.config.readiness.max_attempts,
            self.config.readiness_interval(),
        );

        match waiter.wait_until_ready(&self.config.server_url).await {
            Readiness::Ready { attempts, .. } => {
                success(&format!(
                    "Identity provider at {} is reachable (attempt {})",
                    self.config.server_url, attempts
                ));
                Ok(())
            }
            Readiness::TimedOut { attempts } => Err(BootstrapError::Connectivity {
                base_url: self.config.server_url.clone(),
                attempts,
            }),
        }
    }

    /// Logs in as administrator and returns a client bound to the session.
    pub async fn login(&self) -> BootstrapResult<AdminClient> {
        let credentials = AdminCredentials::new(
            self.config.admin.username.as_str(),
            self.config.admin.password.as_str(),
        );
        let session = TokenAuthenticator::new(self.http.clone())
            .authenticate(&self.config.server_url, &self.config.master_realm, &credentials)
            .await?;
        let api = AdminClient::new(self.http.clone(), session);
        success(&format!(
            "Authenticated as '{}' in realm '{}'",
            credentials.username,
            api.session().realm()
        ));
        Ok(api)
    }

    /// Reports an outcome and decides whether the run continues.
    pub fn settle(&self, resource: &str, outcome: ReconciliationOutcome) -> BootstrapResult<()> {
        tracing::debug!(resource, changed = outcome.is_changed(), %outcome, "Reconciliation finished");
        match outcome {
            ReconciliationOutcome::Created => success(&format!("{resource} created")),
            ReconciliationOutcome::Updated => success(&format!("{resource} updated")),
            ReconciliationOutcome::AlreadyCurrent => {
                success(&format!("{resource} already up to date"));
            }
            ReconciliationOutcome::Failed(failure) if failure.is_fatal() => {
                return Err(failure.into_error());
            }
            ReconciliationOutcome::Failed(failure) => {
                let message = if failure.message.is_empty() {
                    format!("{resource} update failed with HTTP {}", failure.status)
                } else {
                    format!(
                        "{resource} update failed with HTTP {}: {}",
                        failure.status, failure.message
                    )
                };
                warning(&message);
                if self.options.strict {
                    return Err(failure.into_error());
                }
            }
        }
        Ok(())
    }

    /// Prints verified state and reports drift.
    pub fn settle_verification<S: Tabled + Serialize>(
        &self,
        resource_type: &str,
        id: &str,
        verification: Verification<S>,
    ) -> BootstrapResult<()> {
        output_single(verification.snapshot(), self.output_format())?;
        if verification.has_drift() {
            drift(resource_type, verification.mismatches());
            if self.options.strict {
                verification.into_result(resource_type, id)?;
            }
        } else {
            success(&format!("Verified {resource_type} '{id}'"));
        }
        Ok(())
    }
}
