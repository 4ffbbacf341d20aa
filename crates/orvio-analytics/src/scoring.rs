//! Composite product performance scoring.
//!
//! Each product of a store gets a 0-10 score from its trailing 30 days of
//! order items plus its inventory and pricing state. The score column is
//! overwritten unconditionally on every pass, never adjusted
//! incrementally.

use chrono::{Duration, Utc};
use rust_decimal::prelude::{FromPrimitive, ToPrimitive};
use rust_decimal::Decimal;
use sqlx::PgPool;
use std::collections::HashMap;
use tracing::{info, instrument};
use uuid::Uuid;

use orvio_db::models::Product;

use crate::error::AnalyticsResult;

/// The trailing window order items are counted over.
const SCORING_WINDOW_DAYS: i64 = 30;

/// Scoring inputs for one product.
#[derive(Debug, Clone, Default)]
pub struct ScoreInputs {
    /// Order items sold in the window.
    pub recent_order_items: i64,
    /// Revenue of those items (item price x quantity snapshots).
    pub recent_revenue: f64,
    pub inventory: i32,
    pub price: f64,
    pub compare_at_price: Option<f64>,
}

/// Composite 0-10 score, rounded to one decimal place.
///
/// `min(10, items*0.3 + revenue/100*0.3 + inventory_score*2 +
/// price_score*1.5)` where inventory_score is 1 when stock exists and
/// price_score is 1.2 when the product is visibly discounted.
pub fn composite_score(inputs: &ScoreInputs) -> f64 {
    let inventory_score = if inputs.inventory > 0 { 1.0 } else { 0.0 };
    let price_score = match inputs.compare_at_price {
        Some(compare_at) if inputs.price < compare_at => 1.2,
        _ => 1.0,
    };

    let raw = inputs.recent_order_items as f64 * 0.3
        + (inputs.recent_revenue / 100.0) * 0.3
        + inventory_score * 2.0
        + price_score * 1.5;

    (raw.min(10.0) * 10.0).round() / 10.0
}

/// Score every product of a store, overwriting each score. Returns the
/// number of products scored.
#[instrument(skip(pool))]
pub async fn score_products(pool: &PgPool, store_id: Uuid) -> AnalyticsResult<u64> {
    let since = Utc::now() - Duration::days(SCORING_WINDOW_DAYS);

    let sales = Product::recent_sales(pool, store_id, since).await?;
    let by_product: HashMap<Uuid, (i64, f64)> = sales
        .into_iter()
        .map(|s| (s.product_id, (s.items, s.revenue.to_f64().unwrap_or(0.0))))
        .collect();

    let products = Product::list_for_store(pool, store_id).await?;
    let mut scored = 0u64;

    for product in products {
        let (items, revenue) = by_product.get(&product.id).copied().unwrap_or((0, 0.0));
        let score = composite_score(&ScoreInputs {
            recent_order_items: items,
            recent_revenue: revenue,
            inventory: product.inventory,
            price: product.price.to_f64().unwrap_or(0.0),
            compare_at_price: product.compare_at_price.and_then(|p| p.to_f64()),
        });

        let score = Decimal::from_f64(score)
            .unwrap_or_default()
            .round_dp(1);
        Product::set_score(pool, product.id, score).await?;
        scored += 1;
    }

    info!(store_id = %store_id, scored, "scoring pass finished");

    Ok(scored)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_idle_product_scores_its_price_component_only() {
        // No stock, no discount, no sales: 0*0.3 + 0*0.3 + 0*2 + 1*1.5.
        let score = composite_score(&ScoreInputs {
            recent_order_items: 0,
            recent_revenue: 0.0,
            inventory: 0,
            price: 25.0,
            compare_at_price: None,
        });
        assert_eq!(score, 1.5);
    }

    #[test]
    fn test_selling_discounted_stocked_product() {
        // 2*0.3 + 0.5998*0.3 + 1*2 + 1.2*1.5 = 4.57994 -> 4.6.
        let score = composite_score(&ScoreInputs {
            recent_order_items: 2,
            recent_revenue: 59.98,
            inventory: 5,
            price: 29.99,
            compare_at_price: Some(39.99),
        });
        assert_eq!(score, 4.6);
    }

    #[test]
    fn test_compare_at_only_counts_when_above_price() {
        let base = ScoreInputs {
            inventory: 1,
            price: 30.0,
            ..ScoreInputs::default()
        };

        let not_discounted = composite_score(&ScoreInputs {
            compare_at_price: Some(30.0),
            ..base.clone()
        });
        assert_eq!(not_discounted, 3.5);

        let discounted = composite_score(&ScoreInputs {
            compare_at_price: Some(35.0),
            ..base
        });
        assert_eq!(discounted, 3.8);
    }

    #[test]
    fn test_score_clamps_at_ten() {
        let score = composite_score(&ScoreInputs {
            recent_order_items: 100,
            recent_revenue: 10000.0,
            inventory: 50,
            price: 10.0,
            compare_at_price: Some(20.0),
        });
        assert_eq!(score, 10.0);
    }

    #[test]
    fn test_score_rounds_to_one_decimal() {
        // 1*0.3 + 0.1*0.3 + 2 + 1.5 = 3.83 -> 3.8.
        let score = composite_score(&ScoreInputs {
            recent_order_items: 1,
            recent_revenue: 10.0,
            inventory: 3,
            price: 10.0,
            compare_at_price: None,
        });
        assert_eq!(score, 3.8);
    }
}
