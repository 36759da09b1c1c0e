//! Full bootstrap: client and realm registration in one run.

use crate::cli::BootstrapArgs;
use crate::dto::RealmSettingsPatch;
use crate::BootstrapResult;

use super::client::sync_client;
use super::realm::apply_settings;
use super::RunContext;

/// Waits once, logs in once, then reconciles the client and the realm.
pub async fn run_bootstrap(args: BootstrapArgs, ctx: &RunContext<'_>) -> BootstrapResult<()> {
    ctx.wait_for_provider().await?;
    let api = ctx.login().await?;

    sync_client(ctx, &api, &ctx.config().desired_client()).await?;
    apply_settings(
        ctx,
        &api,
        &RealmSettingsPatch::registration(args.registration),
    )
    .await
}
