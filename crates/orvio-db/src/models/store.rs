//! Shopify store model: a tenant's connected commerce source.
//!
//! Stores hold the connection credentials the connector is constructed
//! from on each sync invocation. Deactivation (never deletion) halts
//! future sync attempts.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::PgPool;
use uuid::Uuid;

/// A connected Shopify store.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct ShopifyStore {
    pub id: Uuid,
    pub tenant_id: Uuid,
    pub shop_domain: String,
    #[serde(skip_serializing)]
    pub access_token: String,
    #[serde(skip_serializing)]
    pub webhook_secret: Option<String>,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Input for registering a newly connected store.
#[derive(Debug, Clone)]
pub struct CreateShopifyStore {
    pub shop_domain: String,
    pub access_token: String,
    pub webhook_secret: Option<String>,
}

impl ShopifyStore {
    /// Register a store for a tenant. Reconnecting an existing domain
    /// refreshes the credentials and reactivates the store.
    pub async fn create(
        pool: &PgPool,
        tenant_id: Uuid,
        input: &CreateShopifyStore,
    ) -> Result<Self, sqlx::Error> {
        sqlx::query_as(
            r"
            INSERT INTO shopify_stores (tenant_id, shop_domain, access_token, webhook_secret)
            VALUES ($1, $2, $3, $4)
            ON CONFLICT (shop_domain) DO UPDATE SET
                access_token = EXCLUDED.access_token,
                webhook_secret = EXCLUDED.webhook_secret,
                is_active = TRUE,
                updated_at = NOW()
            RETURNING *
            ",
        )
        .bind(tenant_id)
        .bind(&input.shop_domain)
        .bind(&input.access_token)
        .bind(&input.webhook_secret)
        .fetch_one(pool)
        .await
    }

    /// Find a store by id.
    pub async fn find_by_id(pool: &PgPool, id: Uuid) -> Result<Option<Self>, sqlx::Error> {
        sqlx::query_as(
            r"
            SELECT * FROM shopify_stores WHERE id = $1
            ",
        )
        .bind(id)
        .fetch_optional(pool)
        .await
    }

    /// Find a store by id, scoped to its owning tenant.
    pub async fn find_for_tenant(
        pool: &PgPool,
        tenant_id: Uuid,
        id: Uuid,
    ) -> Result<Option<Self>, sqlx::Error> {
        sqlx::query_as(
            r"
            SELECT * FROM shopify_stores WHERE id = $1 AND tenant_id = $2
            ",
        )
        .bind(id)
        .bind(tenant_id)
        .fetch_optional(pool)
        .await
    }

    /// Find a store by its shop domain (webhook routing).
    pub async fn find_by_domain(pool: &PgPool, domain: &str) -> Result<Option<Self>, sqlx::Error> {
        sqlx::query_as(
            r"
            SELECT * FROM shopify_stores WHERE shop_domain = $1
            ",
        )
        .bind(domain)
        .fetch_optional(pool)
        .await
    }

    /// List every active store across all tenants (batch scheduling).
    pub async fn list_active(pool: &PgPool) -> Result<Vec<Self>, sqlx::Error> {
        sqlx::query_as(
            r"
            SELECT * FROM shopify_stores WHERE is_active ORDER BY created_at
            ",
        )
        .fetch_all(pool)
        .await
    }

    /// Deactivate a store, halting future syncs. Idempotent.
    pub async fn deactivate(pool: &PgPool, id: Uuid) -> Result<bool, sqlx::Error> {
        let result = sqlx::query(
            r"
            UPDATE shopify_stores SET is_active = FALSE, updated_at = NOW() WHERE id = $1
            ",
        )
        .bind(id)
        .execute(pool)
        .await?;

        Ok(result.rows_affected() > 0)
    }
}
