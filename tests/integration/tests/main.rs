//! End-to-End Integration Tests
//!
//! These tests drive kc-bootstrap against a mocked admin API served by
//! wiremock, covering the full wait, login, reconcile and verify sequence.


#![allow(clippy::unwrap_used, clippy::expect_used)]
mod common;
mod bootstrap_flow;
mod config_loading;
mod readiness;
mod realm_settings;
