//! Shopify connector configuration.
//!
//! A connector instance is constructed per sync invocation from the
//! owning store's stored credentials; nothing here outlives one sync.

use orvio_connector::{ConnectorError, ConnectorResult};

/// Admin API version all requests are pinned to.
pub const API_VERSION: &str = "2024-10";

/// Configuration for one Shopify store connection.
#[derive(Debug, Clone)]
pub struct ShopifyConfig {
    /// The `*.myshopify.com` domain of the store.
    pub shop_domain: String,
    /// Admin API access token.
    pub access_token: String,
}

impl ShopifyConfig {
    pub fn new(shop_domain: impl Into<String>, access_token: impl Into<String>) -> Self {
        Self {
            shop_domain: shop_domain.into(),
            access_token: access_token.into(),
        }
    }

    /// Validate the configuration before any request is made.
    pub fn validate(&self) -> ConnectorResult<()> {
        if self.shop_domain.is_empty() {
            return Err(ConnectorError::invalid_configuration("empty shop domain"));
        }
        if !self.shop_domain.ends_with(".myshopify.com") {
            return Err(ConnectorError::invalid_configuration(format!(
                "not a myshopify.com domain: {}",
                self.shop_domain
            )));
        }
        if self.access_token.is_empty() {
            return Err(ConnectorError::invalid_configuration("empty access token"));
        }
        Ok(())
    }

    /// Base URL of the versioned Admin API.
    pub fn base_url(&self) -> String {
        format!("https://{}/admin/api/{API_VERSION}", self.shop_domain)
    }
}
