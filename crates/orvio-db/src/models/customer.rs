//! Shopify customer model, keyed by `(shopify_id, store_id)`.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::PgPool;
use uuid::Uuid;

/// An ingested customer.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct ShopifyCustomer {
    pub id: Uuid,
    pub store_id: Uuid,
    pub shopify_id: String,
    pub email: Option<String>,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub total_spent: Decimal,
    pub orders_count: i32,
    pub tags: Vec<String>,
    pub created_at: DateTime<Utc>,
}

/// Mutable fields written on each ingestion pass.
#[derive(Debug, Clone)]
pub struct UpsertCustomer {
    pub shopify_id: String,
    pub email: Option<String>,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub total_spent: Decimal,
    pub orders_count: i32,
    pub tags: Vec<String>,
}

impl ShopifyCustomer {
    /// Idempotent upsert keyed on `(shopify_id, store_id)`.
    pub async fn upsert(
        pool: &PgPool,
        store_id: Uuid,
        input: &UpsertCustomer,
    ) -> Result<Self, sqlx::Error> {
        sqlx::query_as(
            r"
            INSERT INTO shopify_customers (
                store_id, shopify_id, email, first_name, last_name,
                total_spent, orders_count, tags
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            ON CONFLICT (shopify_id, store_id) DO UPDATE SET
                email = EXCLUDED.email,
                first_name = EXCLUDED.first_name,
                last_name = EXCLUDED.last_name,
                total_spent = EXCLUDED.total_spent,
                orders_count = EXCLUDED.orders_count,
                tags = EXCLUDED.tags
            RETURNING *
            ",
        )
        .bind(store_id)
        .bind(&input.shopify_id)
        .bind(&input.email)
        .bind(&input.first_name)
        .bind(&input.last_name)
        .bind(input.total_spent)
        .bind(input.orders_count)
        .bind(&input.tags)
        .fetch_one(pool)
        .await
    }

    /// Resolve a customer's internal id by its external identity.
    pub async fn find_by_external(
        pool: &PgPool,
        store_id: Uuid,
        shopify_id: &str,
    ) -> Result<Option<Self>, sqlx::Error> {
        sqlx::query_as(
            r"
            SELECT * FROM shopify_customers WHERE shopify_id = $1 AND store_id = $2
            ",
        )
        .bind(shopify_id)
        .bind(store_id)
        .fetch_optional(pool)
        .await
    }
}
