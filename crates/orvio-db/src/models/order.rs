//! Order and order-item models.
//!
//! Orders are keyed by `(shopify_id, store_id)`. Order items have no
//! external id of their own, so re-ingesting an order replaces its items
//! wholesale inside the upsert transaction, which keeps re-ingestion
//! duplicate-free. Item price and quantity are a durable snapshot taken at
//! ingestion time, never recomputed from the live product.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::PgPool;
use uuid::Uuid;

/// An ingested order.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Order {
    pub id: Uuid,
    pub store_id: Uuid,
    pub shopify_id: String,
    pub customer_id: Option<Uuid>,
    pub total_price: Decimal,
    pub subtotal_price: Decimal,
    pub currency: String,
    pub financial_status: String,
    pub fulfillment_status: Option<String>,
    pub order_number: i64,
    pub created_at: DateTime<Utc>,
}

/// A line item belonging to exactly one order.
///
/// `product_id` is resolved at ingestion time; when the referenced product
/// has not been ingested yet the link stays NULL and the item is still
/// recorded with its denormalized title/price/quantity.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct OrderItem {
    pub id: Uuid,
    pub order_id: Uuid,
    pub product_id: Option<Uuid>,
    pub title: String,
    pub quantity: i32,
    pub price: Decimal,
}

/// Mutable order fields written on each ingestion pass.
#[derive(Debug, Clone)]
pub struct UpsertOrder {
    pub shopify_id: String,
    pub customer_id: Option<Uuid>,
    pub total_price: Decimal,
    pub subtotal_price: Decimal,
    pub currency: String,
    pub financial_status: String,
    pub fulfillment_status: Option<String>,
    pub order_number: i64,
    pub created_at: DateTime<Utc>,
}

/// A line item to record alongside its order.
#[derive(Debug, Clone)]
pub struct NewOrderItem {
    pub product_id: Option<Uuid>,
    pub title: String,
    pub quantity: i32,
    pub price: Decimal,
}

impl Order {
    /// Idempotent upsert keyed on `(shopify_id, store_id)`, replacing the
    /// order's items in the same transaction.
    ///
    /// On conflict only the mutable fields change; `customer_id`,
    /// `order_number` and `created_at` keep their first-ingested values.
    pub async fn upsert(
        pool: &PgPool,
        store_id: Uuid,
        input: &UpsertOrder,
        items: &[NewOrderItem],
    ) -> Result<Self, sqlx::Error> {
        let mut tx = pool.begin().await?;

        let order: Order = sqlx::query_as(
            r"
            INSERT INTO orders (
                store_id, shopify_id, customer_id, total_price, subtotal_price,
                currency, financial_status, fulfillment_status, order_number, created_at
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10)
            ON CONFLICT (shopify_id, store_id) DO UPDATE SET
                total_price = EXCLUDED.total_price,
                subtotal_price = EXCLUDED.subtotal_price,
                currency = EXCLUDED.currency,
                financial_status = EXCLUDED.financial_status,
                fulfillment_status = EXCLUDED.fulfillment_status
            RETURNING *
            ",
        )
        .bind(store_id)
        .bind(&input.shopify_id)
        .bind(input.customer_id)
        .bind(input.total_price)
        .bind(input.subtotal_price)
        .bind(&input.currency)
        .bind(&input.financial_status)
        .bind(&input.fulfillment_status)
        .bind(input.order_number)
        .bind(input.created_at)
        .fetch_one(&mut *tx)
        .await?;

        if !items.is_empty() {
            sqlx::query(
                r"
                DELETE FROM order_items WHERE order_id = $1
                ",
            )
            .bind(order.id)
            .execute(&mut *tx)
            .await?;

            for item in items {
                sqlx::query(
                    r"
                    INSERT INTO order_items (order_id, product_id, title, quantity, price)
                    VALUES ($1, $2, $3, $4, $5)
                    ",
                )
                .bind(order.id)
                .bind(item.product_id)
                .bind(&item.title)
                .bind(item.quantity)
                .bind(item.price)
                .execute(&mut *tx)
                .await?;
            }
        }

        tx.commit().await?;

        Ok(order)
    }

    /// Orders counted as revenue by the metrics aggregator: financial
    /// status paid or partially refunded, created within `[start, end]`
    /// inclusive, across every store of the tenant, chronological.
    pub async fn list_paid_between(
        pool: &PgPool,
        tenant_id: Uuid,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> Result<Vec<Self>, sqlx::Error> {
        sqlx::query_as(
            r"
            SELECT o.* FROM orders o
            JOIN shopify_stores s ON s.id = o.store_id
            WHERE s.tenant_id = $1
                AND o.created_at >= $2
                AND o.created_at <= $3
                AND o.financial_status IN ('paid', 'partially_refunded')
            ORDER BY o.created_at ASC
            ",
        )
        .bind(tenant_id)
        .bind(start)
        .bind(end)
        .fetch_all(pool)
        .await
    }
}

impl OrderItem {
    /// Items belonging to any of the given orders.
    pub async fn list_for_orders(
        pool: &PgPool,
        order_ids: &[Uuid],
    ) -> Result<Vec<Self>, sqlx::Error> {
        sqlx::query_as(
            r"
            SELECT * FROM order_items WHERE order_id = ANY($1)
            ",
        )
        .bind(order_ids)
        .fetch_all(pool)
        .await
    }
}
