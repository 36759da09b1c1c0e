//! Realm settings commands.

use crate::cli::RealmCommand;
use crate::dto::RealmSettingsPatch;
use crate::inspect::ReportOnlyInspector;
use crate::output::{info, output_single};
use crate::reconcile::ResourceReconciler;
use crate::verify::StateVerifier;
use crate::{AdminClient, BootstrapResult};

use super::RunContext;

/// Runs a realm command.
pub async fn run_realm(cmd: RealmCommand, ctx: &RunContext<'_>) -> BootstrapResult<()> {
    match cmd {
        RealmCommand::Registration { enabled } => {
            ctx.wait_for_provider().await?;
            let api = ctx.login().await?;
            apply_settings(ctx, &api, &RealmSettingsPatch::registration(enabled)).await
        }
        RealmCommand::SetFlag { flag, value } => {
            ctx.wait_for_provider().await?;
            let api = ctx.login().await?;
            set_flag(ctx, &api, &flag, value).await
        }
        RealmCommand::Show => {
            let api = ctx.login().await?;
            let snapshot = ReportOnlyInspector::new(&api)
                .inspect_realm(&ctx.config().realm)
                .await?;
            output_single(&snapshot, ctx.output_format())
        }
    }
}

/// Merges `patch` onto the realm and verifies the result.
pub(crate) async fn apply_settings(
    ctx: &RunContext<'_>,
    api: &AdminClient,
    patch: &RealmSettingsPatch,
) -> BootstrapResult<()> {
    let realm = &ctx.config().realm;
    info(&format!("Reconciling settings of realm '{realm}'"));

    let outcome = ResourceReconciler::new(api)
        .reconcile_realm_settings(realm, patch)
        .await?;
    ctx.settle(&format!("Realm '{realm}'"), outcome)?;

    let verification = StateVerifier::new(api)
        .verify_realm_settings(realm, patch)
        .await?;
    ctx.settle_verification("realm", realm, verification)
}

async fn set_flag(
    ctx: &RunContext<'_>,
    api: &AdminClient,
    flag: &str,
    value: bool,
) -> BootstrapResult<()> {
    let realm = &ctx.config().realm;
    info(&format!("Setting {flag}={value} on realm '{realm}'"));

    let outcome = ResourceReconciler::new(api)
        .reconcile_realm_flag(realm, flag, value)
        .await?;
    ctx.settle(&format!("Realm '{realm}' {flag}"), outcome)?;

    let verification = StateVerifier::new(api)
        .verify_realm_flag(realm, flag, value)
        .await?;
    ctx.settle_verification("realm", realm, verification)
}
