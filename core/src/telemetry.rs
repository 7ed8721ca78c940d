//! # Telemetry: Log Setup
//!
//! Flows log through `tracing`. This module installs the stdout subscriber
//! used by binaries and demos.

use tracing_subscriber::EnvFilter;

const DEFAULT_FILTER: &str = "info,spaceflow_runtime=debug";

/// Initialize a simple stdout tracing subscriber for development.
///
/// Honors `RUST_LOG`; falls back to info with debug transitions.
pub fn init_tracing() {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER));

    tracing_subscriber::fmt().with_env_filter(filter).init();
}

/// Like [`init_tracing`], but returns `false` instead of panicking when a
/// global subscriber is already installed (tests, embedding hosts).
pub fn try_init_tracing() -> bool {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_test_writer()
        .try_init()
        .is_ok()
}
