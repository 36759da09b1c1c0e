//! Managed client commands.

use crate::cli::ClientCommand;
use crate::dto::DesiredClientSpec;
use crate::inspect::ReportOnlyInspector;
use crate::output::{info, output_single};
use crate::reconcile::ResourceReconciler;
use crate::verify::StateVerifier;
use crate::{AdminClient, BootstrapResult};

use super::RunContext;

/// Runs a client command.
pub async fn run_client(cmd: ClientCommand, ctx: &RunContext<'_>) -> BootstrapResult<()> {
    match cmd {
        ClientCommand::Sync(_) => {
            ctx.wait_for_provider().await?;
            let api = ctx.login().await?;
            sync_client(ctx, &api, &ctx.config().desired_client()).await
        }
        ClientCommand::Show { .. } => {
            let api = ctx.login().await?;
            show_client(ctx, &api).await
        }
    }
}

/// Reconciles the client and verifies the result.
pub(crate) async fn sync_client(
    ctx: &RunContext<'_>,
    api: &AdminClient,
    desired: &DesiredClientSpec,
) -> BootstrapResult<()> {
    let realm = &ctx.config().realm;
    info(&format!(
        "Reconciling client '{}' in realm '{}'",
        desired.client_id(),
        realm
    ));

    let outcome = ResourceReconciler::new(api)
        .reconcile_client(realm, desired)
        .await?;
    ctx.settle(&format!("Client '{}'", desired.client_id()), outcome)?;

    let verification = StateVerifier::new(api)
        .verify_client(realm, desired.client_id(), &desired.expected_state())
        .await?;
    ctx.settle_verification("client", desired.client_id(), verification)
}

/// Prints the client's current state.
async fn show_client(ctx: &RunContext<'_>, api: &AdminClient) -> BootstrapResult<()> {
    let config = ctx.config();
    let client_id = &config.client.client_id;

    match ReportOnlyInspector::new(api)
        .inspect_client(&config.realm, client_id)
        .await?
    {
        Some(snapshot) => output_single(&snapshot, ctx.output_format()),
        None => Err(crate::BootstrapError::NotFound {
            resource_type: "Client".to_string(),
            id: client_id.clone(),
        }),
    }
}
