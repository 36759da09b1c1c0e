//! # kc-bootstrap
//!
//! Waits for the identity provider, logs in as administrator and reconciles
//! the managed client and realm settings.

#![forbid(unsafe_code)]
#![allow(clippy::uninlined_format_args)]

use clap::Parser;
use kc_bootstrap::{
    cli::{Cli, Command},
    commands::{run_bootstrap, run_client, run_config, run_realm, run_status, RunContext, RunOptions},
    config::BootstrapConfig,
    output::{error, prompt_password},
    BootstrapResult,
};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main(flavor = "current_thread")]
async fn main() {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    if let Err(e) = run(cli).await {
        error(&e.to_string());
        std::process::exit(e.exit_code());
    }
}

fn init_tracing(verbose: bool) {
    let default_filter = if verbose {
        "kc_bootstrap=debug"
    } else {
        "kc_bootstrap=info"
    };
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| default_filter.into()),
        ))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}

async fn run(cli: Cli) -> BootstrapResult<()> {
    let mut overrides = cli.overrides();
    if cli.ask_password {
        overrides.admin_password = Some(prompt_password("Admin password: ")?);
    }

    let config = BootstrapConfig::load(cli.config.as_deref())?.with_overrides(overrides);
    config.validate()?;

    let options = RunOptions {
        skip_wait: cli.skip_wait,
        strict: cli.strict,
    };
    let ctx = RunContext::new(&config, options)?;

    match cli.command {
        Command::Status => run_status(&ctx).await,
        Command::Client(cmd) => run_client(cmd, &ctx).await,
        Command::Realm(cmd) => run_realm(cmd, &ctx).await,
        Command::Bootstrap(args) => run_bootstrap(args, &ctx).await,
        Command::Config(cmd) => run_config(cmd, &config),
    }
}
