//! Insight model: persisted anomaly findings.
//!
//! Insights are write-once. Repeated detection of the same condition
//! across runs produces repeated rows; nothing updates or deletes them.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;
use sqlx::PgPool;
use std::fmt;
use uuid::Uuid;

/// Severity of a persisted finding.
///
/// Stored (and serialized) in the upper-case form the alerting surface
/// expects: `LOW` / `MEDIUM` / `HIGH` / `CRITICAL`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum InsightSeverity {
    Low,
    Medium,
    High,
    Critical,
}

impl fmt::Display for InsightSeverity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Low => write!(f, "LOW"),
            Self::Medium => write!(f, "MEDIUM"),
            Self::High => write!(f, "HIGH"),
            Self::Critical => write!(f, "CRITICAL"),
        }
    }
}

impl std::str::FromStr for InsightSeverity {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "LOW" => Ok(Self::Low),
            "MEDIUM" => Ok(Self::Medium),
            "HIGH" => Ok(Self::High),
            "CRITICAL" => Ok(Self::Critical),
            _ => Err(format!("Unknown severity: {s}")),
        }
    }
}

/// A persisted insight row.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Insight {
    pub id: Uuid,
    pub tenant_id: Uuid,
    pub insight_type: String,
    pub severity: String,
    pub title: String,
    pub summary: String,
    pub details: JsonValue,
    pub created_at: DateTime<Utc>,
}

/// Data for recording a new insight.
#[derive(Debug, Clone)]
pub struct CreateInsight {
    pub insight_type: String,
    pub severity: InsightSeverity,
    pub title: String,
    pub summary: String,
    pub details: JsonValue,
}

impl Insight {
    /// Record a finding. Insert only; insights are never mutated.
    pub async fn create(
        pool: &PgPool,
        tenant_id: Uuid,
        data: &CreateInsight,
    ) -> Result<Self, sqlx::Error> {
        sqlx::query_as(
            r"
            INSERT INTO insights (tenant_id, insight_type, severity, title, summary, details)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING *
            ",
        )
        .bind(tenant_id)
        .bind(&data.insight_type)
        .bind(data.severity.to_string())
        .bind(&data.title)
        .bind(&data.summary)
        .bind(&data.details)
        .fetch_one(pool)
        .await
    }

    /// Newest insights for a tenant.
    pub async fn list_recent(
        pool: &PgPool,
        tenant_id: Uuid,
        limit: i64,
    ) -> Result<Vec<Self>, sqlx::Error> {
        sqlx::query_as(
            r"
            SELECT * FROM insights
            WHERE tenant_id = $1
            ORDER BY created_at DESC
            LIMIT $2
            ",
        )
        .bind(tenant_id)
        .bind(limit)
        .fetch_all(pool)
        .await
    }
}
