//! Configuration commands.

use crate::cli::ConfigCommand;
use crate::config::{BootstrapConfig, OutputFormat};
use crate::output::info;

/// Runs a config command.
pub fn run_config(cmd: ConfigCommand, config: &BootstrapConfig) -> crate::BootstrapResult<()> {
    match cmd {
        ConfigCommand::Show => show_config(config),
    }
}

/// Shows the effective configuration with the password masked.
fn show_config(config: &BootstrapConfig) -> crate::BootstrapResult<()> {
    let mut masked = config.clone();
    masked.admin.password = mask_password(&config.admin.password);

    match config.output_format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&masked)?),
        OutputFormat::Table | OutputFormat::Quiet => {
            if let Some(path) = BootstrapConfig::default_path() {
                info(&format!("Default configuration file: {}", path.display()));
            }
            let toml = toml::to_string_pretty(&masked).map_err(|e| {
                crate::BootstrapError::Config(format!("failed to serialize config: {e}"))
            })?;
            println!("{toml}");
        }
    }
    Ok(())
}

/// Masks a password, keeping nothing but its presence.
fn mask_password(password: &str) -> String {
    if password.is_empty() {
        String::new()
    } else {
        "****".to_string()
    }
}
