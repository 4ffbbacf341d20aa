//! Shopify Admin API connector.
//!
//! Each call is a single outbound request; non-success responses surface
//! as [`ConnectorError`] with the upstream status and body. Retry policy
//! belongs to the caller.

use chrono::{DateTime, Utc};
use reqwest::{header, Client, Method};
use serde::de::DeserializeOwned;
use serde_json::json;
use std::time::Duration;
use tracing::debug;

use orvio_connector::{ConnectorError, ConnectorResult, Page};

use crate::config::ShopifyConfig;
use crate::link;
use crate::records::{
    CustomersResponse, OrdersResponse, ProductsResponse, ShopifyCustomer, ShopifyOrder,
    ShopifyProduct,
};

/// Records requested per page, the Admin API maximum.
const PAGE_LIMIT: u32 = 250;

/// Webhook topics the ingestion endpoint consumes.
const WEBHOOK_TOPICS: &[&str] = &[
    "orders/create",
    "orders/updated",
    "products/create",
    "products/update",
    "products/delete",
    "customers/create",
    "customers/update",
    "app/uninstalled",
];

/// Connector for one Shopify store.
pub struct ShopifyConnector {
    config: ShopifyConfig,
    base_url: String,
    client: Client,
}

impl std::fmt::Debug for ShopifyConnector {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ShopifyConnector")
            .field("shop_domain", &self.config.shop_domain)
            .finish()
    }
}

impl ShopifyConnector {
    /// Create a connector from a store's stored credentials.
    pub fn new(config: ShopifyConfig) -> ConnectorResult<Self> {
        config.validate()?;

        let client = Client::builder()
            .timeout(Duration::from_secs(30))
            .connect_timeout(Duration::from_secs(10))
            .build()
            .map_err(|e| {
                ConnectorError::invalid_configuration(format!("failed to build HTTP client: {e}"))
            })?;

        let base_url = config.base_url();
        Ok(Self {
            config,
            base_url,
            client,
        })
    }

    /// Override the base URL (mock servers in tests).
    #[doc(hidden)]
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    /// Issue one request, returning the raw body and the `Link` header.
    async fn send(
        &self,
        method: Method,
        endpoint: &str,
        body: Option<serde_json::Value>,
    ) -> ConnectorResult<(String, Option<String>)> {
        let url = format!("{}{endpoint}", self.base_url);
        debug!(url = %url, method = %method, "shopify request");

        let mut request = self
            .client
            .request(method, &url)
            .header(header::CONTENT_TYPE, "application/json")
            .header("X-Shopify-Access-Token", &self.config.access_token);
        if let Some(json_body) = body {
            request = request.json(&json_body);
        }

        let response = request.send().await?;
        let status = response.status();
        let link_header = response
            .headers()
            .get(header::LINK)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string);
        let retry_after = response
            .headers()
            .get(header::RETRY_AFTER)
            .and_then(|v| v.to_str().ok())
            .and_then(|v| v.parse::<u64>().ok());
        let text = response.text().await?;

        if !status.is_success() {
            return Err(ConnectorError::from_status(
                status.as_u16(),
                retry_after,
                text,
            ));
        }

        Ok((text, link_header))
    }

    /// GET one page of a listing endpoint and decode its envelope.
    async fn get_page<T: DeserializeOwned>(
        &self,
        endpoint: &str,
    ) -> ConnectorResult<(T, Option<String>)> {
        let (body, link_header) = self.send(Method::GET, endpoint, None).await?;

        let decoded = serde_json::from_str(&body)
            .map_err(|e| ConnectorError::invalid_response(format!("{endpoint}: {e}")))?;
        let next = link_header.as_deref().and_then(link::next_page_info);

        Ok((decoded, next))
    }

    /// List one page of active products.
    ///
    /// Shopify rejects filters alongside `page_info`, so only the first
    /// page carries the `status=active` filter; the cursor encodes it for
    /// the rest.
    pub async fn list_products(
        &self,
        cursor: Option<String>,
    ) -> ConnectorResult<Page<ShopifyProduct>> {
        let endpoint = match cursor {
            Some(page_info) => format!("/products.json?limit={PAGE_LIMIT}&page_info={page_info}"),
            None => format!("/products.json?limit={PAGE_LIMIT}&status=active"),
        };

        let (response, next): (ProductsResponse, _) = self.get_page(&endpoint).await?;
        Ok(Page {
            records: response.products,
            next_cursor: next,
        })
    }

    /// List one page of orders created at or after `created_at_min`.
    pub async fn list_orders(
        &self,
        created_at_min: DateTime<Utc>,
        cursor: Option<String>,
    ) -> ConnectorResult<Page<ShopifyOrder>> {
        let endpoint = match cursor {
            Some(page_info) => format!("/orders.json?limit={PAGE_LIMIT}&page_info={page_info}"),
            None => format!(
                "/orders.json?status=any&created_at_min={}&limit={PAGE_LIMIT}",
                created_at_min.to_rfc3339()
            ),
        };

        let (response, next): (OrdersResponse, _) = self.get_page(&endpoint).await?;
        Ok(Page {
            records: response.orders,
            next_cursor: next,
        })
    }

    /// List one page of customers.
    pub async fn list_customers(
        &self,
        cursor: Option<String>,
    ) -> ConnectorResult<Page<ShopifyCustomer>> {
        let endpoint = match cursor {
            Some(page_info) => format!("/customers.json?limit={PAGE_LIMIT}&page_info={page_info}"),
            None => format!("/customers.json?limit={PAGE_LIMIT}"),
        };

        let (response, next): (CustomersResponse, _) = self.get_page(&endpoint).await?;
        Ok(Page {
            records: response.customers,
            next_cursor: next,
        })
    }

    /// Register the webhook subscriptions the ingestion endpoint consumes.
    pub async fn register_webhooks(&self, callback_url: &str) -> ConnectorResult<()> {
        for topic in WEBHOOK_TOPICS {
            let body = json!({
                "webhook": {
                    "topic": topic,
                    "address": format!("{callback_url}/api/webhooks/shopify"),
                    "format": "json",
                }
            });
            self.send(Method::POST, "/webhooks.json", Some(body)).await?;
        }
        Ok(())
    }
}
