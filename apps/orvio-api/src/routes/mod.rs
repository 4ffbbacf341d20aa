//! Route table.

pub mod analytics;
pub mod cron;
pub mod sync;
pub mod webhooks;

use axum::routing::{get, post};
use axum::{Json, Router};
use serde_json::json;
use tower_http::trace::TraceLayer;

use crate::state::AppState;

/// Build the application router.
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/api/health", get(health))
        .route("/api/cron", get(cron::run_cron))
        .route("/api/sync/shopify", post(sync::manual_sync))
        .route("/api/webhooks/shopify", post(webhooks::shopify_webhook))
        .route("/api/analytics", get(analytics::dashboard))
        .route("/api/analytics/comparison", get(analytics::comparison))
        .route("/api/insights", get(analytics::insights))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

async fn health() -> Json<serde_json::Value> {
    Json(json!({ "status": "ok" }))
}
