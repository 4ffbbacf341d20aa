//! Product model.
//!
//! Products are keyed by `(shopify_id, store_id)`, the upsert idempotency
//! key. The `score` column is owned by the product scorer and overwritten
//! wholesale on each scoring pass.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::PgPool;
use uuid::Uuid;

/// An ingested product.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Product {
    pub id: Uuid,
    pub store_id: Uuid,
    pub shopify_id: String,
    pub title: String,
    pub description: Option<String>,
    pub vendor: Option<String>,
    pub product_type: Option<String>,
    pub tags: Vec<String>,
    pub status: Option<String>,
    pub image_url: Option<String>,
    pub price: Decimal,
    pub compare_at_price: Option<Decimal>,
    pub inventory: i32,
    pub score: Option<Decimal>,
    pub synced_at: DateTime<Utc>,
    pub created_at: DateTime<Utc>,
}

/// Mutable fields written on each ingestion pass.
#[derive(Debug, Clone)]
pub struct UpsertProduct {
    pub shopify_id: String,
    pub title: String,
    pub description: Option<String>,
    pub vendor: Option<String>,
    pub product_type: Option<String>,
    pub tags: Vec<String>,
    pub status: Option<String>,
    pub image_url: Option<String>,
    pub price: Decimal,
    pub compare_at_price: Option<Decimal>,
    pub inventory: i32,
}

/// Aggregated trailing sales for one product (scoring input).
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct ProductSales {
    pub product_id: Uuid,
    pub items: i64,
    pub revenue: Decimal,
}

impl Product {
    /// Idempotent upsert keyed on `(shopify_id, store_id)`.
    ///
    /// The score is deliberately left untouched: scoring is a separate
    /// pass and ingestion must not reset it.
    pub async fn upsert(
        pool: &PgPool,
        store_id: Uuid,
        input: &UpsertProduct,
    ) -> Result<Self, sqlx::Error> {
        sqlx::query_as(
            r"
            INSERT INTO products (
                store_id, shopify_id, title, description, vendor, product_type,
                tags, status, image_url, price, compare_at_price, inventory
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12)
            ON CONFLICT (shopify_id, store_id) DO UPDATE SET
                title = EXCLUDED.title,
                description = EXCLUDED.description,
                vendor = EXCLUDED.vendor,
                product_type = EXCLUDED.product_type,
                tags = EXCLUDED.tags,
                status = EXCLUDED.status,
                image_url = EXCLUDED.image_url,
                price = EXCLUDED.price,
                compare_at_price = EXCLUDED.compare_at_price,
                inventory = EXCLUDED.inventory,
                synced_at = NOW()
            RETURNING *
            ",
        )
        .bind(store_id)
        .bind(&input.shopify_id)
        .bind(&input.title)
        .bind(&input.description)
        .bind(&input.vendor)
        .bind(&input.product_type)
        .bind(&input.tags)
        .bind(&input.status)
        .bind(&input.image_url)
        .bind(input.price)
        .bind(input.compare_at_price)
        .bind(input.inventory)
        .fetch_one(pool)
        .await
    }

    /// Resolve a product's internal id by its external identity.
    pub async fn find_by_external(
        pool: &PgPool,
        store_id: Uuid,
        shopify_id: &str,
    ) -> Result<Option<Self>, sqlx::Error> {
        sqlx::query_as(
            r"
            SELECT * FROM products WHERE shopify_id = $1 AND store_id = $2
            ",
        )
        .bind(shopify_id)
        .bind(store_id)
        .fetch_optional(pool)
        .await
    }

    /// Delete a product by its external identity (webhook `products/delete`).
    pub async fn delete_by_external(
        pool: &PgPool,
        store_id: Uuid,
        shopify_id: &str,
    ) -> Result<bool, sqlx::Error> {
        let result = sqlx::query(
            r"
            DELETE FROM products WHERE shopify_id = $1 AND store_id = $2
            ",
        )
        .bind(shopify_id)
        .bind(store_id)
        .execute(pool)
        .await?;

        Ok(result.rows_affected() > 0)
    }

    /// List all products of a store.
    pub async fn list_for_store(pool: &PgPool, store_id: Uuid) -> Result<Vec<Self>, sqlx::Error> {
        sqlx::query_as(
            r"
            SELECT * FROM products WHERE store_id = $1 ORDER BY created_at
            ",
        )
        .bind(store_id)
        .fetch_all(pool)
        .await
    }

    /// Overwrite the derived score. Always writes, even when unchanged.
    pub async fn set_score(pool: &PgPool, id: Uuid, score: Decimal) -> Result<(), sqlx::Error> {
        sqlx::query(
            r"
            UPDATE products SET score = $2 WHERE id = $1
            ",
        )
        .bind(id)
        .bind(score)
        .execute(pool)
        .await?;

        Ok(())
    }

    /// Per-product order-item counts and revenue for orders created since
    /// `since`, across one store. Item revenue is the durable snapshot
    /// `price * quantity` taken at ingestion time.
    pub async fn recent_sales(
        pool: &PgPool,
        store_id: Uuid,
        since: DateTime<Utc>,
    ) -> Result<Vec<ProductSales>, sqlx::Error> {
        sqlx::query_as(
            r"
            SELECT
                oi.product_id AS product_id,
                COUNT(*) AS items,
                COALESCE(SUM(oi.price * oi.quantity), 0) AS revenue
            FROM order_items oi
            JOIN orders o ON o.id = oi.order_id
            WHERE o.store_id = $1
                AND o.created_at >= $2
                AND oi.product_id IS NOT NULL
            GROUP BY oi.product_id
            ",
        )
        .bind(store_id)
        .bind(since)
        .fetch_all(pool)
        .await
    }
}
