//! Configuration file loading and layering.

use std::io::Write;

use kc_bootstrap::config::{ConfigOverrides, OutputFormat};
use kc_bootstrap::{BootstrapConfig, BootstrapError};

/// File values replace defaults and overrides replace file values.
#[test]
fn test_file_then_overrides() -> anyhow::Result<()> {
    let mut file = tempfile::NamedTempFile::new()?;
    writeln!(
        file,
        r#"
server_url = "http://keycloak:8080"
realm = "staging"
output_format = "json"

[admin]
username = "bootstrap"
password = "s3cret"

[client]
client_id = "portal"
frontend_url = "https://portal.example.com"

[readiness]
max_attempts = 10
interval_secs = 5
"#
    )?;

    let config = BootstrapConfig::load(Some(file.path()))?.with_overrides(ConfigOverrides {
        realm: Some("production".to_string()),
        request_timeout_secs: Some(10),
        ..ConfigOverrides::default()
    });
    config.validate()?;

    assert_eq!(config.server_url, "http://keycloak:8080");
    assert_eq!(config.master_realm, "master");
    assert_eq!(config.realm, "production");
    assert_eq!(config.admin.username, "bootstrap");
    assert_eq!(config.readiness.max_attempts, 10);
    assert_eq!(config.request_timeout_secs, 10);
    assert_eq!(config.output_format, OutputFormat::Json);

    let desired = config.desired_client();
    assert_eq!(desired.client_id(), "portal");
    assert_eq!(
        desired.redirect_uris()[0],
        "https://portal.example.com/auth/callback"
    );

    Ok(())
}

/// An explicitly named file must exist.
#[test]
fn test_missing_explicit_file() {
    let dir = tempfile::tempdir().unwrap();
    let err = BootstrapConfig::load(Some(&dir.path().join("absent.toml"))).unwrap_err();
    assert!(matches!(err, BootstrapError::Config(_)));
    assert_eq!(err.exit_code(), 1);
}

/// A non-http server URL fails validation.
#[test]
fn test_rejects_non_http_server() {
    let config = BootstrapConfig {
        server_url: "ftp://keycloak:21".to_string(),
        ..BootstrapConfig::default()
    };
    assert!(matches!(config.validate(), Err(BootstrapError::Config(_))));
}
