//! # kc-bootstrap
//!
//! Bootstraps a Keycloak-compatible identity provider.
//!
//! This crate provides:
//! - Readiness polling of the provider
//! - Administrator login via the password grant
//! - Idempotent reconciliation of an OAuth client and realm settings
//! - Post-mutation verification and read-only inspection

#![forbid(unsafe_code)]
#![warn(missing_docs)]
#![allow(clippy::doc_markdown)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::uninlined_format_args)]
#![allow(clippy::struct_excessive_bools)]
#![allow(clippy::future_not_send)]
#![cfg_attr(test, allow(clippy::unwrap_used, clippy::panic, clippy::indexing_slicing))]

pub mod api;
pub mod cli;
pub mod commands;
pub mod config;
pub mod dto;
pub mod error;
pub mod inspect;
pub mod output;
pub mod readiness;
pub mod reconcile;
pub mod session;
pub mod verify;

pub use api::AdminClient;
pub use cli::Cli;
pub use config::BootstrapConfig;
pub use error::{BootstrapError, BootstrapResult};
pub use inspect::ReportOnlyInspector;
pub use readiness::{Readiness, ReadinessWaiter};
pub use reconcile::{ReconciliationOutcome, ResourceReconciler};
pub use session::{AdminSession, TokenAuthenticator};
pub use verify::{StateVerifier, Verification};
