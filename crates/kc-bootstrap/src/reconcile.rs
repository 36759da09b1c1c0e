//! Idempotent reconciliation of the managed client and realm settings.
//!
//! Remote state is fetched fresh on every call. Clients are always written
//! as a full document; realm settings are merged onto the fetched realm.

use std::fmt;

use reqwest::StatusCode;
use serde_json::{Map, Value};

use crate::api::{AdminClient, WriteResponse};
use crate::dto::{DesiredClientSpec, RealmSettingsPatch};
use crate::error::{BootstrapError, BootstrapResult};

/// Which mutation failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureStage {
    /// Creating a missing resource.
    Create,
    /// Updating an existing resource.
    Update,
}

/// A mutation the provider refused.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Failure {
    /// Which mutation failed.
    pub stage: FailureStage,
    /// Kind of resource.
    pub resource_type: String,
    /// Resource identifier.
    pub id: String,
    /// HTTP status returned.
    pub status: u16,
    /// Response body returned.
    pub message: String,
}

impl Failure {
    fn from_response(
        stage: FailureStage,
        resource_type: &str,
        id: &str,
        response: &WriteResponse,
    ) -> Self {
        Self {
            stage,
            resource_type: resource_type.to_string(),
            id: id.to_string(),
            status: response.status.as_u16(),
            message: response.body.clone(),
        }
    }

    /// Whether the run must abort. Only create failures are fatal.
    #[must_use]
    pub fn is_fatal(&self) -> bool {
        self.stage == FailureStage::Create
    }

    /// Converts the failure into the matching error.
    #[must_use]
    pub fn into_error(self) -> BootstrapError {
        match self.stage {
            FailureStage::Create => BootstrapError::ResourceCreate {
                resource_type: self.resource_type,
                id: self.id,
                status: self.status,
            },
            FailureStage::Update => BootstrapError::ResourceUpdate {
                resource_type: self.resource_type,
                id: self.id,
                status: self.status,
            },
        }
    }
}

/// Result of one reconciliation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReconciliationOutcome {
    /// The resource did not exist and was created.
    Created,
    /// The resource existed and was written.
    Updated,
    /// The resource already had the desired values; nothing was written.
    AlreadyCurrent,
    /// The provider refused the mutation.
    Failed(Failure),
}

impl ReconciliationOutcome {
    /// Whether the run must abort.
    #[must_use]
    pub fn is_fatal(&self) -> bool {
        matches!(self, Self::Failed(failure) if failure.is_fatal())
    }

    /// Whether a mutation was applied.
    #[must_use]
    pub fn is_changed(&self) -> bool {
        matches!(self, Self::Created | Self::Updated)
    }
}

impl fmt::Display for ReconciliationOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Created => write!(f, "created"),
            Self::Updated => write!(f, "updated"),
            Self::AlreadyCurrent => write!(f, "already current"),
            Self::Failed(failure) => write!(
                f,
                "failed to {} {} '{}': HTTP {}",
                match failure.stage {
                    FailureStage::Create => "create",
                    FailureStage::Update => "update",
                },
                failure.resource_type,
                failure.id,
                failure.status
            ),
        }
    }
}

/// Decides between create, update and no-op and applies the decision.
#[derive(Debug, Clone, Copy)]
pub struct ResourceReconciler<'a> {
    api: &'a AdminClient,
}

impl<'a> ResourceReconciler<'a> {
    /// Creates a reconciler over an authenticated client.
    #[must_use]
    pub fn new(api: &'a AdminClient) -> Self {
        Self { api }
    }

    /// Brings the client named by `desired` to the desired configuration.
    ///
    /// A missing client is created; an existing one is replaced in full.
    /// More than one match for the client id is an error.
    pub async fn reconcile_client(
        &self,
        realm: &str,
        desired: &DesiredClientSpec,
    ) -> BootstrapResult<ReconciliationOutcome> {
        let client_id = desired.client_id();
        let existing = self.api.find_clients(realm, client_id).await?;

        match existing.as_slice() {
            [] => {
                tracing::info!(realm, client_id, "Client not found, creating");
                let response = self
                    .api
                    .create_client(realm, &desired.to_representation(None))
                    .await?;

                if matches!(response.status, StatusCode::OK | StatusCode::CREATED) {
                    tracing::info!(realm, client_id, id = ?response.created_id(), "Client created");
                    Ok(ReconciliationOutcome::Created)
                } else {
                    tracing::error!(
                        realm,
                        client_id,
                        status = response.status.as_u16(),
                        "Client creation rejected: {}",
                        response.body
                    );
                    Ok(ReconciliationOutcome::Failed(Failure::from_response(
                        FailureStage::Create,
                        "client",
                        client_id,
                        &response,
                    )))
                }
            }
            [record] => {
                let id = record.id.as_deref().ok_or_else(|| BootstrapError::Api {
                    status: StatusCode::OK.as_u16(),
                    message: format!("client '{client_id}' returned without an id"),
                })?;
                tracing::info!(realm, client_id, id, "Client exists, replacing configuration");
                let response = self
                    .api
                    .update_client(realm, id, &desired.to_representation(Some(id)))
                    .await?;

                if matches!(response.status, StatusCode::OK | StatusCode::NO_CONTENT) {
                    tracing::info!(realm, client_id, id, "Client updated");
                    Ok(ReconciliationOutcome::Updated)
                } else {
                    tracing::warn!(
                        realm,
                        client_id,
                        status = response.status.as_u16(),
                        "Client update rejected: {}",
                        response.body
                    );
                    Ok(ReconciliationOutcome::Failed(Failure::from_response(
                        FailureStage::Update,
                        "client",
                        client_id,
                        &response,
                    )))
                }
            }
            matches => Err(BootstrapError::AmbiguousResource {
                resource_type: "client".to_string(),
                id: client_id.to_string(),
                count: matches.len(),
            }),
        }
    }

    /// Sets one boolean realm field, writing only if it differs.
    pub async fn reconcile_realm_flag(
        &self,
        realm: &str,
        flag_name: &str,
        desired: bool,
    ) -> BootstrapResult<ReconciliationOutcome> {
        let mut fields = Map::new();
        fields.insert(flag_name.to_string(), Value::Bool(desired));
        self.reconcile_realm_fields(realm, &fields).await
    }

    /// Applies every set field of `patch`, writing only if one differs.
    pub async fn reconcile_realm_settings(
        &self,
        realm: &str,
        patch: &RealmSettingsPatch,
    ) -> BootstrapResult<ReconciliationOutcome> {
        self.reconcile_realm_fields(realm, &patch.fields()).await
    }

    async fn reconcile_realm_fields(
        &self,
        realm: &str,
        fields: &Map<String, Value>,
    ) -> BootstrapResult<ReconciliationOutcome> {
        if fields.is_empty() {
            return Ok(ReconciliationOutcome::AlreadyCurrent);
        }

        let mut document = self.api.get_realm(realm).await?;
        let differing = document.differing(fields);
        if differing.is_empty() {
            tracing::info!(realm, "Realm settings already current");
            return Ok(ReconciliationOutcome::AlreadyCurrent);
        }

        tracing::info!(realm, fields = ?differing, "Updating realm settings");
        document.apply(fields);
        let response = self.api.update_realm(realm, &document).await?;

        if matches!(response.status, StatusCode::OK | StatusCode::NO_CONTENT) {
            Ok(ReconciliationOutcome::Updated)
        } else {
            tracing::warn!(
                realm,
                status = response.status.as_u16(),
                "Realm update rejected: {}",
                response.body
            );
            Ok(ReconciliationOutcome::Failed(Failure::from_response(
                FailureStage::Update,
                "realm",
                realm,
                &response,
            )))
        }
    }
}
