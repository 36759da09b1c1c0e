//! Output formatting utilities.

use colored::Colorize;
use tabled::{settings::Style, Table, Tabled};

use crate::config::OutputFormat;
use crate::verify::FieldMismatch;

/// Prints a success message.
pub fn success(message: &str) {
    println!("{} {}", "✓".green().bold(), message);
}

/// Prints an error message.
pub fn error(message: &str) {
    eprintln!("{} {}", "✗".red().bold(), message);
}

/// Prints a warning message.
pub fn warning(message: &str) {
    eprintln!("{} {}", "⚠".yellow().bold(), message);
}

/// Prints an info message.
pub fn info(message: &str) {
    println!("{} {}", "ℹ".blue().bold(), message);
}

/// Outputs a single snapshot in the specified format.
pub fn output_single<T: Tabled + serde::Serialize>(
    item: &T,
    format: OutputFormat,
) -> crate::BootstrapResult<()> {
    match format {
        OutputFormat::Table => {
            let table = Table::new(std::iter::once(item)).with(Style::rounded()).to_string();
            println!("{table}");
        }
        OutputFormat::Json => {
            let json = serde_json::to_string_pretty(item)?;
            println!("{json}");
        }
        OutputFormat::Quiet => {}
    }
    Ok(())
}

/// Prints one warning line per drifted field.
pub fn drift(resource: &str, mismatches: &[FieldMismatch]) {
    for mismatch in mismatches {
        warning(&format!(
            "{} drift on {}: expected {}, found {}",
            resource, mismatch.field, mismatch.expected, mismatch.actual
        ));
    }
}

/// Prompts for password input (hidden).
pub fn prompt_password(prompt: &str) -> crate::BootstrapResult<String> {
    rpassword::prompt_password(prompt).map_err(crate::BootstrapError::Io)
}
