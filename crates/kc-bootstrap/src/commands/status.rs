//! Provider status check.

use super::RunContext;

/// Waits until the provider is reachable.
///
/// Always waits, even when `--skip-wait` is given.
pub async fn run_status(ctx: &RunContext<'_>) -> crate::BootstrapResult<()> {
    ctx.wait().await
}
