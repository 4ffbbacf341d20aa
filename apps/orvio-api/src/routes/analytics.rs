//! Tenant-scoped analytics reads.

use axum::extract::{Query, State};
use axum::Json;
use chrono::{DateTime, Utc};
use serde::Deserialize;
use serde_json::{json, Value};

use orvio_analytics::{comparison_metrics, dashboard_metrics, ComparisonPeriod, DateRange};
use orvio_core::OrvioError;
use orvio_db::models::Insight;

use crate::error::ApiResult;
use crate::state::AppState;
use crate::tenant::CurrentTenant;

#[derive(Debug, Deserialize)]
pub struct RangeQuery {
    pub start: Option<DateTime<Utc>>,
    pub end: Option<DateTime<Utc>>,
}

/// GET /api/analytics
pub async fn dashboard(
    State(state): State<AppState>,
    CurrentTenant(tenant_id): CurrentTenant,
    Query(query): Query<RangeQuery>,
) -> ApiResult<Json<Value>> {
    let end = query.end.unwrap_or_else(Utc::now);
    let range = match query.start {
        Some(start) => {
            if start > end {
                return Err(OrvioError::validation("start", "start is after end").into());
            }
            DateRange { start, end }
        }
        None => DateRange::trailing_days(end, 30),
    };

    let metrics = dashboard_metrics(&state.pool, tenant_id.as_uuid(), &range).await?;
    Ok(Json(json!({ "success": true, "data": metrics })))
}

#[derive(Debug, Deserialize)]
pub struct ComparisonQuery {
    pub period: Option<String>,
}

/// GET /api/analytics/comparison
pub async fn comparison(
    State(state): State<AppState>,
    CurrentTenant(tenant_id): CurrentTenant,
    Query(query): Query<ComparisonQuery>,
) -> ApiResult<Json<Value>> {
    let period = match query.period.as_deref() {
        Some(raw) => raw
            .parse::<ComparisonPeriod>()
            .map_err(|e| OrvioError::validation("period", e))?,
        None => ComparisonPeriod::Month,
    };

    let result = comparison_metrics(&state.pool, tenant_id.as_uuid(), period).await?;
    Ok(Json(json!({ "success": true, "data": result })))
}

#[derive(Debug, Deserialize)]
pub struct InsightsQuery {
    pub limit: Option<i64>,
}

/// GET /api/insights
pub async fn insights(
    State(state): State<AppState>,
    CurrentTenant(tenant_id): CurrentTenant,
    Query(query): Query<InsightsQuery>,
) -> ApiResult<Json<Value>> {
    let limit = query.limit.unwrap_or(50).clamp(1, 200);
    let rows = Insight::list_recent(&state.pool, tenant_id.as_uuid(), limit).await?;
    Ok(Json(json!({ "success": true, "data": rows })))
}
