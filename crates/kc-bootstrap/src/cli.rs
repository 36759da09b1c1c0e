//! CLI argument parsing.

use std::path::PathBuf;

use clap::{ArgAction, Args, Parser, Subcommand};

use crate::config::{ConfigOverrides, OutputFormat};

/// kc-bootstrap - Bootstraps a Keycloak-compatible identity provider.
#[derive(Debug, Parser)]
#[command(name = "kc-bootstrap")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Configuration file (defaults to ~/.keycloak/bootstrap.toml if present).
    #[arg(short, long, env = "KC_BOOTSTRAP_CONFIG", global = true)]
    pub config: Option<PathBuf>,

    /// Server URL (overrides config).
    #[arg(short, long, env = "KEYCLOAK_URL", global = true)]
    pub server: Option<String>,

    /// Realm used for the admin login (overrides config).
    #[arg(long, env = "KEYCLOAK_MASTER_REALM", global = true)]
    pub master_realm: Option<String>,

    /// Realm holding the managed client (overrides config).
    #[arg(short, long, env = "KEYCLOAK_REALM", global = true)]
    pub realm: Option<String>,

    /// Admin username (overrides config).
    #[arg(long, env = "KEYCLOAK_ADMIN", global = true)]
    pub admin_user: Option<String>,

    /// Admin password (overrides config).
    #[arg(long, env = "KEYCLOAK_ADMIN_PASSWORD", hide_env_values = true, global = true)]
    pub admin_password: Option<String>,

    /// Prompt for the admin password.
    #[arg(long, global = true, conflicts_with = "admin_password")]
    pub ask_password: bool,

    /// Readiness probes before giving up.
    #[arg(long, global = true, value_parser = clap::value_parser!(u32).range(1..))]
    pub max_attempts: Option<u32>,

    /// Seconds between readiness probes.
    #[arg(long, global = true)]
    pub interval: Option<u64>,

    /// Per-request timeout in seconds.
    #[arg(long, env = "KC_BOOTSTRAP_TIMEOUT", global = true, value_parser = clap::value_parser!(u64).range(1..))]
    pub timeout: Option<u64>,

    /// Skip waiting for the provider.
    #[arg(long, global = true)]
    pub skip_wait: bool,

    /// Treat update failures and drift as errors.
    #[arg(long, global = true)]
    pub strict: bool,

    /// Output format.
    #[arg(short, long, value_enum, global = true)]
    pub output: Option<OutputFormat>,

    /// Enable verbose output.
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Subcommand to execute.
    #[command(subcommand)]
    pub command: Command,
}

impl Cli {
    /// Flag and environment values that override the configuration file.
    #[must_use]
    pub fn overrides(&self) -> ConfigOverrides {
        let client = match &self.command {
            Command::Client(ClientCommand::Sync(args))
            | Command::Bootstrap(BootstrapArgs { client: args, .. }) => Some(args),
            _ => None,
        };

        ConfigOverrides {
            server_url: self.server.clone(),
            master_realm: self.master_realm.clone(),
            realm: self.realm.clone(),
            admin_username: self.admin_user.clone(),
            admin_password: self.admin_password.clone(),
            client_id: client
                .and_then(|c| c.client_id.clone())
                .or_else(|| match &self.command {
                    Command::Client(ClientCommand::Show { client_id }) => client_id.clone(),
                    _ => None,
                }),
            frontend_url: client.and_then(|c| c.frontend_url.clone()),
            display_name: client.and_then(|c| c.display_name.clone()),
            max_attempts: self.max_attempts,
            interval_secs: self.interval,
            request_timeout_secs: self.timeout,
            output_format: self.output,
        }
    }
}

/// CLI commands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Wait until the provider is reachable.
    Status,

    /// Managed client commands.
    #[command(subcommand)]
    Client(ClientCommand),

    /// Realm settings commands.
    #[command(subcommand)]
    Realm(RealmCommand),

    /// Reconcile the client and realm registration in one run.
    Bootstrap(BootstrapArgs),

    /// Configuration commands.
    #[command(subcommand)]
    Config(ConfigCommand),
}

/// Managed client settings.
#[derive(Debug, Clone, Args)]
pub struct ClientArgs {
    /// Client ID.
    #[arg(long, env = "KEYCLOAK_CLIENT_ID")]
    pub client_id: Option<String>,

    /// Frontend origin used for redirect URIs and web origins.
    #[arg(long, env = "FRONTEND_URL")]
    pub frontend_url: Option<String>,

    /// Client display name.
    #[arg(long)]
    pub display_name: Option<String>,
}

/// Client commands.
#[derive(Debug, Subcommand)]
pub enum ClientCommand {
    /// Create or update the client, then verify it.
    Sync(ClientArgs),

    /// Show the client's current state without changing it.
    Show {
        /// Client ID (defaults to the configured client).
        #[arg(env = "KEYCLOAK_CLIENT_ID")]
        client_id: Option<String>,
    },
}

/// Realm commands.
#[derive(Debug, Subcommand)]
pub enum RealmCommand {
    /// Enable or disable user self-registration.
    Registration {
        /// Desired value.
        #[arg(long, default_value_t = true, action = ArgAction::Set)]
        enabled: bool,
    },

    /// Set any boolean realm field.
    SetFlag {
        /// Field name as used by the admin API (e.g. verifyEmail).
        flag: String,

        /// Desired value.
        #[arg(action = ArgAction::Set)]
        value: bool,
    },

    /// Show the realm's registration settings without changing them.
    Show,
}

/// Bootstrap arguments.
#[derive(Debug, Args)]
pub struct BootstrapArgs {
    /// Managed client settings.
    #[command(flatten)]
    pub client: ClientArgs,

    /// Desired self-registration setting.
    #[arg(long, default_value_t = true, action = ArgAction::Set)]
    pub registration: bool,
}

/// Config commands.
#[derive(Debug, Subcommand)]
pub enum ConfigCommand {
    /// Show the effective configuration.
    Show,
}
