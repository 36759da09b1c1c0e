//! Read-only diagnostics.

use crate::api::AdminClient;
use crate::dto::{ClientSnapshot, RealmSnapshot};
use crate::error::{BootstrapError, BootstrapResult};

/// Reports current state without waiting or mutating anything.
#[derive(Debug, Clone, Copy)]
pub struct ReportOnlyInspector<'a> {
    api: &'a AdminClient,
}

impl<'a> ReportOnlyInspector<'a> {
    /// Creates an inspector over an authenticated client.
    #[must_use]
    pub fn new(api: &'a AdminClient) -> Self {
        Self { api }
    }

    /// Current state of a client, `None` if it does not exist.
    pub async fn inspect_client(
        &self,
        realm: &str,
        client_id: &str,
    ) -> BootstrapResult<Option<ClientSnapshot>> {
        let clients = self.api.find_clients(realm, client_id).await?;
        match clients.as_slice() {
            [] => Ok(None),
            [client] => Ok(Some(ClientSnapshot::from(client))),
            matches => Err(BootstrapError::AmbiguousResource {
                resource_type: "client".to_string(),
                id: client_id.to_string(),
                count: matches.len(),
            }),
        }
    }

    /// Current registration-related settings of a realm.
    pub async fn inspect_realm(&self, realm: &str) -> BootstrapResult<RealmSnapshot> {
        let document = self.api.get_realm(realm).await?;
        Ok(RealmSnapshot::from_document(realm, &document))
    }
}
