//! Commerce ingestion passes.
//!
//! One function per `(store, resource)` pair. Each opens a sync run,
//! drains every page, upserts record by record, and closes the run:
//! `completed` with the item count, or `failed` with the error message
//! before the error is rethrown to the caller.

use chrono::{DateTime, Duration, Utc};
use sqlx::PgPool;
use tracing::{error, info, instrument};
use uuid::Uuid;

use orvio_connector::drain_pages;
use orvio_connector_shopify::records::ShopifyOrder;
use orvio_connector_shopify::ShopifyConnector;
use orvio_db::models::{
    Order, Product, RunOwner, ShopifyCustomer, SyncRun, SyncType,
};

use crate::error::SyncResult;
use crate::map;

/// Default trailing window for order syncs.
pub const DEFAULT_ORDER_WINDOW_DAYS: i64 = 30;

/// The default `created_at_min` for an order sync starting now.
pub fn default_order_window() -> DateTime<Utc> {
    Utc::now() - Duration::days(DEFAULT_ORDER_WINDOW_DAYS)
}

/// Run one ingestion body under a tracked sync run.
///
/// The run row is closed before any error propagates: the tracker write
/// is a durable side effect that must happen even when the run failed.
async fn tracked<F, Fut>(
    pool: &PgPool,
    owner: RunOwner,
    sync_type: SyncType,
    ingest: F,
) -> SyncResult<i64>
where
    F: FnOnce() -> Fut,
    Fut: std::future::Future<Output = SyncResult<i64>>,
{
    let run = SyncRun::start(pool, owner, sync_type).await?;

    match ingest().await {
        Ok(count) => {
            SyncRun::complete(pool, run.id, count).await?;
            Ok(count)
        }
        Err(e) => {
            if let Err(mark_err) = SyncRun::fail(pool, run.id, &e.to_string()).await {
                error!(run_id = %run.id, error = %mark_err, "failed to close sync run as failed");
            }
            Err(e)
        }
    }
}

/// Sync a store's active products. Returns the number upserted.
#[instrument(skip(pool, connector))]
pub async fn sync_products(
    pool: &PgPool,
    connector: &ShopifyConnector,
    store_id: Uuid,
) -> SyncResult<i64> {
    tracked(pool, RunOwner::Store(store_id), SyncType::Products, || async {
        let records = drain_pages(|cursor| connector.list_products(cursor)).await?;

        let mut count = 0i64;
        for record in &records {
            Product::upsert(pool, store_id, &map::product(record)).await?;
            count += 1;
        }

        info!(store_id = %store_id, count, "products synced");
        Ok(count)
    })
    .await
}

/// Ingest one order: resolve its customer and product references against
/// the local store, then upsert order and items together.
///
/// References that do not resolve stay NULL; the record is still stored.
/// A later sync of the referenced entity does not repair older rows.
pub(crate) async fn ingest_order(
    pool: &PgPool,
    store_id: Uuid,
    record: &ShopifyOrder,
) -> SyncResult<()> {
    let customer_id = match &record.customer {
        Some(customer) => {
            ShopifyCustomer::find_by_external(pool, store_id, &customer.id.to_string())
                .await?
                .map(|c| c.id)
        }
        None => None,
    };

    let mut items = Vec::with_capacity(record.line_items.len());
    for line_item in &record.line_items {
        let product_id = match line_item.product_id {
            Some(external_id) => {
                Product::find_by_external(pool, store_id, &external_id.to_string())
                    .await?
                    .map(|p| p.id)
            }
            None => None,
        };
        items.push(map::order_item(line_item, product_id));
    }

    Order::upsert(pool, store_id, &map::order(record, customer_id), &items).await?;
    Ok(())
}

/// Sync a store's orders created at or after `since`. Returns the number
/// upserted.
#[instrument(skip(pool, connector))]
pub async fn sync_orders(
    pool: &PgPool,
    connector: &ShopifyConnector,
    store_id: Uuid,
    since: DateTime<Utc>,
) -> SyncResult<i64> {
    tracked(pool, RunOwner::Store(store_id), SyncType::Orders, || async {
        let records = drain_pages(|cursor| connector.list_orders(since, cursor)).await?;

        let mut count = 0i64;
        for record in &records {
            ingest_order(pool, store_id, record).await?;
            count += 1;
        }

        info!(store_id = %store_id, count, "orders synced");
        Ok(count)
    })
    .await
}

/// Sync a store's customers. Returns the number upserted.
#[instrument(skip(pool, connector))]
pub async fn sync_customers(
    pool: &PgPool,
    connector: &ShopifyConnector,
    store_id: Uuid,
) -> SyncResult<i64> {
    tracked(pool, RunOwner::Store(store_id), SyncType::Customers, || async {
        let records = drain_pages(|cursor| connector.list_customers(cursor)).await?;

        let mut count = 0i64;
        for record in &records {
            ShopifyCustomer::upsert(pool, store_id, &map::customer(record)).await?;
            count += 1;
        }

        info!(store_id = %store_id, count, "customers synced");
        Ok(count)
    })
    .await
}
