//! Webhook event application.
//!
//! A verified webhook delivery applies the same idempotent-upsert
//! semantics as batch sync, for the single record in its payload. The
//! `app/uninstalled` event deactivates the store instead.

use serde_json::Value;
use sqlx::PgPool;
use std::fmt;
use std::str::FromStr;
use tracing::{info, instrument};

use orvio_connector::ConnectorError;
use orvio_connector_shopify::records::{ShopifyOrder, ShopifyProduct};
use orvio_db::models::{Product, ShopifyStore};

use crate::error::{SyncError, SyncResult};
use crate::map;
use crate::shopify::ingest_order;

/// The webhook topics the ingestion endpoint reacts to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WebhookTopic {
    OrderCreate,
    OrderUpdate,
    ProductCreate,
    ProductUpdate,
    ProductDelete,
    AppUninstalled,
}

impl FromStr for WebhookTopic {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "orders/create" => Ok(Self::OrderCreate),
            "orders/updated" => Ok(Self::OrderUpdate),
            "products/create" => Ok(Self::ProductCreate),
            "products/update" => Ok(Self::ProductUpdate),
            "products/delete" => Ok(Self::ProductDelete),
            "app/uninstalled" => Ok(Self::AppUninstalled),
            _ => Err(format!("unhandled webhook topic: {s}")),
        }
    }
}

impl fmt::Display for WebhookTopic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::OrderCreate => write!(f, "orders/create"),
            Self::OrderUpdate => write!(f, "orders/updated"),
            Self::ProductCreate => write!(f, "products/create"),
            Self::ProductUpdate => write!(f, "products/update"),
            Self::ProductDelete => write!(f, "products/delete"),
            Self::AppUninstalled => write!(f, "app/uninstalled"),
        }
    }
}

/// What applying one event did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Applied {
    OrderUpserted,
    ProductUpserted,
    ProductDeleted { existed: bool },
    StoreDeactivated,
    /// Topic the endpoint acknowledges but does not act on.
    Ignored,
}

fn decode<T: serde::de::DeserializeOwned>(topic: &str, payload: &Value) -> SyncResult<T> {
    serde_json::from_value(payload.clone()).map_err(|e| {
        SyncError::Connector(ConnectorError::invalid_response(format!(
            "webhook {topic} payload: {e}"
        )))
    })
}

/// The external record id of a payload. Delete payloads carry little
/// beyond the id, so this reads it directly instead of decoding a full
/// record.
fn external_id(payload: &Value) -> Option<String> {
    match payload.get("id")? {
        Value::Number(n) => Some(n.to_string()),
        Value::String(s) => Some(s.clone()),
        _ => None,
    }
}

/// Apply one verified webhook event for a store.
#[instrument(skip(pool, store, payload), fields(store_id = %store.id))]
pub async fn apply_webhook(
    pool: &PgPool,
    store: &ShopifyStore,
    topic: &str,
    payload: &Value,
) -> SyncResult<Applied> {
    let Ok(topic_kind) = topic.parse::<WebhookTopic>() else {
        info!(topic, "ignoring webhook topic");
        return Ok(Applied::Ignored);
    };

    match topic_kind {
        WebhookTopic::OrderCreate | WebhookTopic::OrderUpdate => {
            let order: ShopifyOrder = decode(topic, payload)?;
            ingest_order(pool, store.id, &order).await?;
            Ok(Applied::OrderUpserted)
        }
        WebhookTopic::ProductCreate | WebhookTopic::ProductUpdate => {
            let product: ShopifyProduct = decode(topic, payload)?;
            Product::upsert(pool, store.id, &map::product(&product)).await?;
            Ok(Applied::ProductUpserted)
        }
        WebhookTopic::ProductDelete => {
            let shopify_id = external_id(payload).ok_or_else(|| {
                SyncError::Connector(ConnectorError::invalid_response(
                    "webhook products/delete payload: missing id",
                ))
            })?;
            let existed = Product::delete_by_external(pool, store.id, &shopify_id).await?;
            Ok(Applied::ProductDeleted { existed })
        }
        WebhookTopic::AppUninstalled => {
            ShopifyStore::deactivate(pool, store.id).await?;
            info!(shop_domain = %store.shop_domain, "store deactivated on uninstall");
            Ok(Applied::StoreDeactivated)
        }
    }
}
