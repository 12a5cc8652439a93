//! Application state shared across handlers.

use std::sync::Arc;

use crate::config::GatewayConfig;
use crate::shopify::StorefrontClient;

/// Application state shared across all handlers.
///
/// Cheaply cloneable via `Arc`.
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    config: GatewayConfig,
    storefront: StorefrontClient,
}

impl AppState {
    /// Create a new application state.
    #[must_use]
    pub fn new(config: GatewayConfig) -> Self {
        let storefront = StorefrontClient::new(&config.shopify);

        Self {
            inner: Arc::new(AppStateInner { config, storefront }),
        }
    }

    /// Get a reference to the gateway configuration.
    #[must_use]
    pub fn config(&self) -> &GatewayConfig {
        &self.inner.config
    }

    /// Get a reference to the Shopify Storefront API client.
    #[must_use]
    pub fn storefront(&self) -> &StorefrontClient {
        &self.inner.storefront
    }
}
