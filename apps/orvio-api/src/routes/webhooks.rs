//! Shopify webhook ingestion.
//!
//! Signature verification runs over the raw body with the store's own
//! secret, falling back to the app-wide one. A verified event applies the
//! same idempotent upsert as batch sync; application errors are logged
//! and acknowledged so the platform does not redeliver forever.

use axum::body::Bytes;
use axum::extract::State;
use axum::http::{HeaderMap, StatusCode};
use tracing::{info, warn};

use orvio_connector_shopify::webhook::{
    verify_signature, HMAC_HEADER, SHOP_DOMAIN_HEADER, TOPIC_HEADER,
};
use orvio_db::models::ShopifyStore;
use orvio_sync::apply_webhook;

use crate::state::AppState;

fn header<'a>(headers: &'a HeaderMap, name: &str) -> Option<&'a str> {
    headers.get(name).and_then(|v| v.to_str().ok())
}

/// POST /api/webhooks/shopify
pub async fn shopify_webhook(
    State(state): State<AppState>,
    headers: HeaderMap,
    body: Bytes,
) -> (StatusCode, &'static str) {
    let (Some(signature), Some(topic), Some(shop_domain)) = (
        header(&headers, HMAC_HEADER),
        header(&headers, TOPIC_HEADER),
        header(&headers, SHOP_DOMAIN_HEADER),
    ) else {
        return (StatusCode::BAD_REQUEST, "Missing headers");
    };

    let store = match ShopifyStore::find_by_domain(&state.pool, shop_domain).await {
        Ok(Some(store)) => store,
        Ok(None) => return (StatusCode::NOT_FOUND, "Not found"),
        Err(e) => {
            warn!(shop_domain, error = %e, "webhook store lookup failed");
            return (StatusCode::INTERNAL_SERVER_ERROR, "Internal error");
        }
    };

    let secret = store
        .webhook_secret
        .clone()
        .or_else(|| state.config.shopify_webhook_secret.clone());
    let Some(secret) = secret else {
        warn!(shop_domain, "no webhook secret configured for store");
        return (StatusCode::UNAUTHORIZED, "Unauthorized");
    };

    if !verify_signature(&secret, &body, signature) {
        return (StatusCode::UNAUTHORIZED, "Unauthorized");
    }

    let payload: serde_json::Value = match serde_json::from_slice(&body) {
        Ok(value) => value,
        Err(_) => return (StatusCode::BAD_REQUEST, "Invalid payload"),
    };

    match apply_webhook(&state.pool, &store, topic, &payload).await {
        Ok(applied) => {
            info!(shop_domain, topic, ?applied, "webhook applied");
        }
        Err(e) => {
            // Acknowledged anyway: redelivery would hit the same error.
            warn!(shop_domain, topic, error = %e, "webhook application failed");
        }
    }

    (StatusCode::OK, "OK")
}
