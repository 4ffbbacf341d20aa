//! Batch scheduler driver.
//!
//! Enumerates every tenant's active sources and runs each unit of work
//! (store syncs, account syncs, anomaly passes, scoring passes), catching
//! failures at the unit boundary. One tenant's misconfigured credentials
//! must never block ingestion or metrics for any other tenant; the report
//! carries every unit's outcome side by side.
//!
//! The driver is stateless between invocations: everything durable lives
//! in sync run rows.

use serde::Serialize;
use serde_json::{json, Value};
use sqlx::PgPool;
use std::collections::BTreeMap;
use tracing::{instrument, warn};

use orvio_analytics::{detect_anomalies, score_products};
use orvio_connector_meta::{MetaConfig, MetaConnector};
use orvio_connector_shopify::{ShopifyConfig, ShopifyConnector};
use orvio_db::models::{MetaAdAccount, ShopifyStore, Tenant};

use crate::error::{SyncError, SyncResult};
use crate::meta::sync_campaigns;
use crate::shopify::{default_order_window, sync_orders, sync_products};

/// Outcome of one unit of work.
#[derive(Debug, Serialize)]
#[serde(untagged)]
pub enum UnitOutcome {
    Success(Value),
    Failed { error: String },
}

impl UnitOutcome {
    pub fn is_success(&self) -> bool {
        matches!(self, UnitOutcome::Success(_))
    }
}

/// Per-unit outcomes of one batch invocation.
#[derive(Debug, Default, Serialize)]
pub struct BatchReport {
    pub results: BTreeMap<String, UnitOutcome>,
}

impl BatchReport {
    /// Record one unit's outcome. An `Err` becomes a `Failed` entry and
    /// goes no further; this is the isolation seam of the driver.
    pub fn record<T: Serialize>(&mut self, key: impl Into<String>, result: SyncResult<T>) {
        let key = key.into();
        let outcome = match result {
            Ok(value) => UnitOutcome::Success(json!(value)),
            Err(e) => {
                warn!(unit = %key, error = %e, "batch unit failed");
                UnitOutcome::Failed {
                    error: e.to_string(),
                }
            }
        };
        self.results.insert(key, outcome);
    }

    /// Number of failed units.
    pub fn failed_units(&self) -> usize {
        self.results.values().filter(|o| !o.is_success()).count()
    }
}

async fn sync_store(pool: &PgPool, store: &ShopifyStore) -> SyncResult<Value> {
    let connector = ShopifyConnector::new(ShopifyConfig::new(
        &store.shop_domain,
        &store.access_token,
    ))?;

    let products = sync_products(pool, &connector, store.id).await?;
    let orders = sync_orders(pool, &connector, store.id, default_order_window()).await?;

    Ok(json!({ "products": products, "orders": orders }))
}

async fn sync_account(pool: &PgPool, account: &MetaAdAccount) -> SyncResult<Value> {
    let connector = MetaConnector::new(MetaConfig::new(
        &account.access_token,
        &account.meta_account_id,
    ))?;

    let campaigns = sync_campaigns(pool, &connector, account.id).await?;

    Ok(json!({ "campaigns": campaigns }))
}

/// Run one full scheduled pass: every active store, every active ad
/// account, then anomaly and scoring passes per tenant/store.
///
/// Only the enumeration queries can fail this function; unit failures are
/// recorded in the report and never propagate past it.
#[instrument(skip(pool))]
pub async fn run_scheduled(pool: &PgPool) -> Result<BatchReport, SyncError> {
    let mut report = BatchReport::default();

    let stores = ShopifyStore::list_active(pool).await?;
    for store in &stores {
        let result = sync_store(pool, store).await;
        report.record(format!("shopify_{}", store.shop_domain), result);
    }

    let accounts = MetaAdAccount::list_active(pool).await?;
    for account in &accounts {
        let result = sync_account(pool, account).await;
        report.record(format!("meta_{}", account.name), result);
    }

    let tenants = Tenant::list_ids(pool).await?;
    for tenant_id in tenants {
        let result = detect_anomalies(pool, tenant_id)
            .await
            .map(|findings| json!({ "count": findings.len() }))
            .map_err(SyncError::from);
        report.record(format!("anomalies_{tenant_id}"), result);
    }

    for store in &stores {
        let result = score_products(pool, store.id)
            .await
            .map(|scored| json!({ "scored": scored }))
            .map_err(SyncError::from);
        report.record(format!("scoring_{}", store.id), result);
    }

    Ok(report)
}
