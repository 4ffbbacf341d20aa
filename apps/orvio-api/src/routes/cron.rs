//! Scheduled batch trigger.
//!
//! Invoked periodically by an external scheduler with a shared secret.
//! The response is always a success envelope enumerating per-unit
//! outcomes; individual unit failures never fail the invocation.

use axum::extract::State;
use axum::http::{header, HeaderMap};
use axum::Json;
use chrono::Utc;
use serde_json::{json, Value};
use subtle::ConstantTimeEq;
use tracing::info;

use orvio_core::OrvioError;
use orvio_sync::run_scheduled;

use crate::error::ApiResult;
use crate::state::AppState;

fn authorized(headers: &HeaderMap, cron_secret: &str) -> bool {
    let Some(value) = headers
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
    else {
        return false;
    };

    let expected = format!("Bearer {cron_secret}");
    value.as_bytes().ct_eq(expected.as_bytes()).into()
}

/// GET /api/cron
pub async fn run_cron(State(state): State<AppState>, headers: HeaderMap) -> ApiResult<Json<Value>> {
    if !authorized(&headers, &state.config.cron_secret) {
        return Err(OrvioError::unauthorized("invalid cron secret").into());
    }

    let report = run_scheduled(&state.pool).await?;
    info!(
        units = report.results.len(),
        failed = report.failed_units(),
        "scheduled batch finished"
    );

    Ok(Json(json!({
        "success": true,
        "results": report.results,
        "timestamp": Utc::now(),
    })))
}
