//! Manual sync trigger.
//!
//! Synchronous, tenant-scoped: the caller picks a store and optionally a
//! resource filter, and gets per-type counts back. Unlike the batch
//! driver, the first failure surfaces as the error result.

use axum::extract::State;
use axum::Json;
use serde::Deserialize;
use serde_json::{json, Value};
use std::collections::BTreeMap;
use std::str::FromStr;
use uuid::Uuid;

use orvio_connector_shopify::{ShopifyConfig, ShopifyConnector};
use orvio_core::OrvioError;
use orvio_db::models::ShopifyStore;
use orvio_sync::{default_order_window, sync_customers, sync_orders, sync_products};

use crate::error::ApiResult;
use crate::state::AppState;
use crate::tenant::CurrentTenant;

/// Which resource types to sync.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SyncFilter {
    Products,
    Orders,
    Customers,
    All,
}

impl SyncFilter {
    fn includes_products(self) -> bool {
        matches!(self, Self::All | Self::Products)
    }

    fn includes_orders(self) -> bool {
        matches!(self, Self::All | Self::Orders)
    }

    fn includes_customers(self) -> bool {
        matches!(self, Self::All | Self::Customers)
    }
}

impl FromStr for SyncFilter {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "products" => Ok(Self::Products),
            "orders" => Ok(Self::Orders),
            "customers" => Ok(Self::Customers),
            "all" => Ok(Self::All),
            _ => Err(format!("unknown sync type: {s}")),
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct ManualSyncRequest {
    pub store_id: Uuid,
    #[serde(default)]
    pub sync_type: Option<String>,
}

/// POST /api/sync/shopify
pub async fn manual_sync(
    State(state): State<AppState>,
    CurrentTenant(tenant_id): CurrentTenant,
    Json(request): Json<ManualSyncRequest>,
) -> ApiResult<Json<Value>> {
    let filter = match request.sync_type.as_deref() {
        Some(raw) => raw
            .parse::<SyncFilter>()
            .map_err(|e| OrvioError::validation("sync_type", e))?,
        None => SyncFilter::All,
    };

    let store = ShopifyStore::find_for_tenant(&state.pool, tenant_id.as_uuid(), request.store_id)
        .await?
        .filter(|s| s.is_active)
        .ok_or_else(|| OrvioError::not_found("Store", request.store_id.to_string()))?;

    let connector = ShopifyConnector::new(ShopifyConfig::new(
        &store.shop_domain,
        &store.access_token,
    ))
    .map_err(orvio_sync::SyncError::from)?;

    let mut synced: BTreeMap<&str, i64> = BTreeMap::new();
    if filter.includes_products() {
        synced.insert(
            "products",
            sync_products(&state.pool, &connector, store.id).await?,
        );
    }
    if filter.includes_orders() {
        synced.insert(
            "orders",
            sync_orders(&state.pool, &connector, store.id, default_order_window()).await?,
        );
    }
    if filter.includes_customers() {
        synced.insert(
            "customers",
            sync_customers(&state.pool, &connector, store.id).await?,
        );
    }

    Ok(Json(json!({ "success": true, "data": { "synced": synced } })))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_filter_parsing() {
        assert_eq!("all".parse::<SyncFilter>(), Ok(SyncFilter::All));
        assert_eq!("orders".parse::<SyncFilter>(), Ok(SyncFilter::Orders));
        assert!("campaigns".parse::<SyncFilter>().is_err());
    }

    #[test]
    fn test_filter_inclusion() {
        assert!(SyncFilter::All.includes_products());
        assert!(SyncFilter::All.includes_orders());
        assert!(SyncFilter::All.includes_customers());

        assert!(SyncFilter::Orders.includes_orders());
        assert!(!SyncFilter::Orders.includes_products());
        assert!(!SyncFilter::Orders.includes_customers());
    }
}
