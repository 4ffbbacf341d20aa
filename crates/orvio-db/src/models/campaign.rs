//! Meta ad campaign model, keyed by `(meta_campaign_id, ad_account_id)`.
//!
//! The performance columns are a rolling snapshot of the latest synced
//! insights, not a date-partitioned series.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::PgPool;
use uuid::Uuid;

/// An ingested ad campaign with its latest performance snapshot.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct MetaAdCampaign {
    pub id: Uuid,
    pub ad_account_id: Uuid,
    pub meta_campaign_id: String,
    pub name: String,
    pub objective: Option<String>,
    pub status: Option<String>,
    pub daily_budget: Option<Decimal>,
    pub lifetime_budget: Option<Decimal>,
    pub spend: Decimal,
    pub impressions: i64,
    pub clicks: i64,
    pub conversions: i64,
    pub revenue: Decimal,
    pub synced_at: DateTime<Utc>,
    pub created_at: DateTime<Utc>,
}

/// Mutable fields written on each ingestion pass.
#[derive(Debug, Clone)]
pub struct UpsertCampaign {
    pub meta_campaign_id: String,
    pub name: String,
    pub objective: Option<String>,
    pub status: Option<String>,
    pub daily_budget: Option<Decimal>,
    pub lifetime_budget: Option<Decimal>,
    pub spend: Decimal,
    pub impressions: i64,
    pub clicks: i64,
    pub conversions: i64,
    pub revenue: Decimal,
}

impl MetaAdCampaign {
    /// Idempotent upsert keyed on `(meta_campaign_id, ad_account_id)`.
    pub async fn upsert(
        pool: &PgPool,
        ad_account_id: Uuid,
        input: &UpsertCampaign,
    ) -> Result<Self, sqlx::Error> {
        sqlx::query_as(
            r"
            INSERT INTO meta_ad_campaigns (
                ad_account_id, meta_campaign_id, name, objective, status,
                daily_budget, lifetime_budget, spend, impressions, clicks,
                conversions, revenue
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12)
            ON CONFLICT (meta_campaign_id, ad_account_id) DO UPDATE SET
                name = EXCLUDED.name,
                objective = EXCLUDED.objective,
                status = EXCLUDED.status,
                daily_budget = EXCLUDED.daily_budget,
                lifetime_budget = EXCLUDED.lifetime_budget,
                spend = EXCLUDED.spend,
                impressions = EXCLUDED.impressions,
                clicks = EXCLUDED.clicks,
                conversions = EXCLUDED.conversions,
                revenue = EXCLUDED.revenue,
                synced_at = NOW()
            RETURNING *
            ",
        )
        .bind(ad_account_id)
        .bind(&input.meta_campaign_id)
        .bind(&input.name)
        .bind(&input.objective)
        .bind(&input.status)
        .bind(input.daily_budget)
        .bind(input.lifetime_budget)
        .bind(input.spend)
        .bind(input.impressions)
        .bind(input.clicks)
        .bind(input.conversions)
        .bind(input.revenue)
        .fetch_one(pool)
        .await
    }

    /// All campaigns across a tenant's ad accounts (metrics aggregation).
    pub async fn list_for_tenant(pool: &PgPool, tenant_id: Uuid) -> Result<Vec<Self>, sqlx::Error> {
        sqlx::query_as(
            r"
            SELECT c.* FROM meta_ad_campaigns c
            JOIN meta_ad_accounts a ON a.id = c.ad_account_id
            WHERE a.tenant_id = $1
            ORDER BY c.created_at
            ",
        )
        .bind(tenant_id)
        .fetch_all(pool)
        .await
    }

    /// Active campaigns across a tenant's ad accounts (anomaly detection).
    pub async fn list_active_for_tenant(
        pool: &PgPool,
        tenant_id: Uuid,
    ) -> Result<Vec<Self>, sqlx::Error> {
        sqlx::query_as(
            r"
            SELECT c.* FROM meta_ad_campaigns c
            JOIN meta_ad_accounts a ON a.id = c.ad_account_id
            WHERE a.tenant_id = $1 AND c.status = 'ACTIVE'
            ORDER BY c.synced_at DESC
            ",
        )
        .bind(tenant_id)
        .fetch_all(pool)
        .await
    }
}
