//! Post-mutation verification.
//!
//! Re-reads the resource after a write and compares the fields an operator
//! cares about against the desired values.

use std::collections::BTreeSet;

use serde_json::Value;

use crate::api::AdminClient;
use crate::dto::{
    ClientRepresentation, ClientSnapshot, ExpectedClientState, RealmSettingsPatch, RealmSnapshot,
};
use crate::error::{BootstrapError, BootstrapResult};

/// A verified field whose actual value differs from the desired one.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldMismatch {
    /// Field name on the wire.
    pub field: String,
    /// Desired value.
    pub expected: String,
    /// Value reported by the provider.
    pub actual: String,
}

/// Outcome of a verification.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Verification<S> {
    /// Every checked field has the desired value.
    Matches(S),
    /// At least one checked field differs.
    Drift {
        /// State reported by the provider.
        snapshot: S,
        /// Differing fields.
        mismatches: Vec<FieldMismatch>,
    },
}

impl<S> Verification<S> {
    fn from_mismatches(snapshot: S, mismatches: Vec<FieldMismatch>) -> Self {
        if mismatches.is_empty() {
            Self::Matches(snapshot)
        } else {
            Self::Drift {
                snapshot,
                mismatches,
            }
        }
    }

    /// State reported by the provider.
    pub fn snapshot(&self) -> &S {
        match self {
            Self::Matches(snapshot) | Self::Drift { snapshot, .. } => snapshot,
        }
    }

    /// Differing fields; empty when the state matches.
    pub fn mismatches(&self) -> &[FieldMismatch] {
        match self {
            Self::Matches(_) => &[],
            Self::Drift { mismatches, .. } => mismatches,
        }
    }

    /// Whether any field drifted.
    pub fn has_drift(&self) -> bool {
        matches!(self, Self::Drift { .. })
    }

    /// Converts drift into an error naming the drifted fields.
    pub fn into_result(self, resource_type: &str, id: &str) -> BootstrapResult<S> {
        match self {
            Self::Matches(snapshot) => Ok(snapshot),
            Self::Drift { mismatches, .. } => Err(BootstrapError::Drift {
                resource_type: resource_type.to_string(),
                id: id.to_string(),
                fields: mismatches
                    .iter()
                    .map(|m| m.field.as_str())
                    .collect::<Vec<_>>()
                    .join(", "),
            }),
        }
    }
}

/// Re-reads resources after a mutation.
#[derive(Debug, Clone, Copy)]
pub struct StateVerifier<'a> {
    api: &'a AdminClient,
}

impl<'a> StateVerifier<'a> {
    /// Creates a verifier over an authenticated client.
    #[must_use]
    pub fn new(api: &'a AdminClient) -> Self {
        Self { api }
    }

    /// Re-queries the client and diffs it against `expected`.
    pub async fn verify_client(
        &self,
        realm: &str,
        client_id: &str,
        expected: &ExpectedClientState,
    ) -> BootstrapResult<Verification<ClientSnapshot>> {
        let mut matches = self.api.find_clients(realm, client_id).await?;
        let client = match matches.len() {
            0 => {
                return Err(BootstrapError::NotFound {
                    resource_type: "Client".to_string(),
                    id: client_id.to_string(),
                })
            }
            1 => matches.remove(0),
            count => {
                return Err(BootstrapError::AmbiguousResource {
                    resource_type: "client".to_string(),
                    id: client_id.to_string(),
                    count,
                })
            }
        };

        let mismatches = diff_client(&client, expected);
        for mismatch in &mismatches {
            tracing::warn!(
                client_id,
                field = %mismatch.field,
                expected = %mismatch.expected,
                actual = %mismatch.actual,
                "Client drifted from desired state"
            );
        }
        Ok(Verification::from_mismatches(
            ClientSnapshot::from(&client),
            mismatches,
        ))
    }

    /// Re-reads a boolean realm field.
    pub async fn verify_realm_flag(
        &self,
        realm: &str,
        flag_name: &str,
        expected: bool,
    ) -> BootstrapResult<Verification<RealmSnapshot>> {
        let document = self.api.get_realm(realm).await?;
        let actual = document.flag(flag_name);
        let mismatches = if actual == Some(expected) {
            Vec::new()
        } else {
            vec![FieldMismatch {
                field: flag_name.to_string(),
                expected: expected.to_string(),
                actual: actual.map_or_else(|| "unset".to_string(), |v| v.to_string()),
            }]
        };
        Ok(Verification::from_mismatches(
            RealmSnapshot::from_document(realm, &document),
            mismatches,
        ))
    }

    /// Re-reads the realm and checks every set field of `patch`.
    pub async fn verify_realm_settings(
        &self,
        realm: &str,
        patch: &RealmSettingsPatch,
    ) -> BootstrapResult<Verification<RealmSnapshot>> {
        let document = self.api.get_realm(realm).await?;
        let fields = patch.fields();
        let mismatches = document
            .differing(&fields)
            .into_iter()
            .map(|field| FieldMismatch {
                expected: fields.get(&field).map(Value::to_string).unwrap_or_default(),
                actual: document
                    .fields()
                    .get(&field)
                    .map_or_else(|| "unset".to_string(), Value::to_string),
                field,
            })
            .collect();
        Ok(Verification::from_mismatches(
            RealmSnapshot::from_document(realm, &document),
            mismatches,
        ))
    }
}

fn diff_client(client: &ClientRepresentation, expected: &ExpectedClientState) -> Vec<FieldMismatch> {
    let mut mismatches = Vec::new();
    let mut check = |field: &str, expected: bool, actual: bool| {
        if expected != actual {
            mismatches.push(FieldMismatch {
                field: field.to_string(),
                expected: expected.to_string(),
                actual: actual.to_string(),
            });
        }
    };
    check("enabled", expected.enabled, client.enabled);
    check("publicClient", expected.public_client, client.public_client);
    check(
        "standardFlowEnabled",
        expected.standard_flow_enabled,
        client.standard_flow_enabled,
    );

    // The provider stores redirect URIs as a set.
    let actual_uris: BTreeSet<String> = client.redirect_uris.iter().cloned().collect();
    if actual_uris != expected.redirect_uris {
        mismatches.push(FieldMismatch {
            field: "redirectUris".to_string(),
            expected: join(&expected.redirect_uris),
            actual: join(&actual_uris),
        });
    }
    mismatches
}

fn join(uris: &BTreeSet<String>) -> String {
    uris.iter().map(String::as_str).collect::<Vec<_>>().join(", ")
}
