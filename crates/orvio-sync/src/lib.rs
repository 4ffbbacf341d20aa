//! orvio sync engine
//!
//! Drives connectors through full ingestion passes under tracked sync
//! runs, schedules all tenants' work with per-unit failure isolation,
//! and applies verified webhook events.

pub mod batch;
pub mod error;
pub mod map;
pub mod meta;
pub mod shopify;
pub mod webhook;

pub use batch::{run_scheduled, BatchReport, UnitOutcome};
pub use error::{SyncError, SyncResult};
pub use meta::sync_campaigns;
pub use shopify::{
    default_order_window, sync_customers, sync_orders, sync_products, DEFAULT_ORDER_WINDOW_DAYS,
};
pub use webhook::{apply_webhook, Applied, WebhookTopic};

use sqlx::PgPool;
use tracing::warn;

use orvio_connector_shopify::{ShopifyConfig, ShopifyConnector};
use orvio_db::models::ShopifyStore;

/// Kick off the first sync of a freshly connected store without blocking
/// the caller. Failures are captured in logs and sync run rows only.
pub fn spawn_initial_sync(pool: PgPool, store: ShopifyStore) {
    tokio::spawn(async move {
        let connector = match ShopifyConnector::new(ShopifyConfig::new(
            &store.shop_domain,
            &store.access_token,
        )) {
            Ok(connector) => connector,
            Err(e) => {
                warn!(store_id = %store.id, error = %e, "initial sync skipped");
                return;
            }
        };

        if let Err(e) = sync_products(&pool, &connector, store.id).await {
            warn!(store_id = %store.id, error = %e, "initial product sync failed");
        }
        if let Err(e) = sync_orders(&pool, &connector, store.id, default_order_window()).await {
            warn!(store_id = %store.id, error = %e, "initial order sync failed");
        }
    });
}
