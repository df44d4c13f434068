// Shared helpers for the end-to-end scenarios

#![allow(dead_code)]

use std::sync::Once;
use storefront_e2e::{StorefrontConfig, StorefrontSession};

static TRACING: Once = Once::new();

/// Installs a fmt subscriber once per test binary; filter with RUST_LOG.
pub fn init_tracing() {
    TRACING.call_once(|| {
        let filter = tracing_subscriber::EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("storefront_e2e=info"));
        let _ = tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_test_writer()
            .try_init();
    });
}

/// Launches a session against `base_url`.
///
/// STOREFRONT_* variables still pick the browser and timeouts; the base URL
/// always points at the local stub.
pub async fn launch_session(base_url: &str) -> storefront_e2e::Result<StorefrontSession> {
    init_tracing();
    let config = StorefrontConfig::from_env()?.base_url(base_url)?;
    StorefrontSession::launch(&config).await
}
