//! Mapping from wire records to upsert inputs.
//!
//! The connectors hand over records exactly as the platforms shape them;
//! everything the internal schema needs (decimal money, split tag sets,
//! first-variant flattening) happens here, in one place.

use rust_decimal::Decimal;
use uuid::Uuid;

use orvio_connector_meta::records::{MetaCampaign, MetaInsights};
use orvio_connector_shopify::records::{
    ShopifyCustomer, ShopifyLineItem, ShopifyOrder, ShopifyProduct,
};
use orvio_db::models::{NewOrderItem, UpsertCampaign, UpsertCustomer, UpsertOrder, UpsertProduct};

/// Parse a platform money string, defaulting malformed or empty values
/// to zero.
pub fn parse_money(value: &str) -> Decimal {
    value.trim().parse().unwrap_or_default()
}

/// Split a Shopify tag string (`"summer, sale, new"`) into a tag set.
pub fn split_tags(tags: &str) -> Vec<String> {
    tags.split(", ")
        .filter(|t| !t.is_empty())
        .map(str::to_string)
        .collect()
}

/// Flatten a product to its upsert input. Price, compare-at price and
/// inventory come from the first variant.
pub fn product(p: &ShopifyProduct) -> UpsertProduct {
    let variant = p.variants.first();

    UpsertProduct {
        shopify_id: p.id.to_string(),
        title: p.title.clone(),
        description: p.body_html.clone(),
        vendor: p.vendor.clone(),
        product_type: p.product_type.clone(),
        tags: split_tags(&p.tags),
        status: p.status.clone(),
        image_url: p.image.as_ref().and_then(|i| i.src.clone()),
        price: variant
            .and_then(|v| v.price.as_deref())
            .map(parse_money)
            .unwrap_or_default(),
        compare_at_price: variant
            .and_then(|v| v.compare_at_price.as_deref())
            .and_then(|s| s.trim().parse().ok()),
        inventory: variant
            .and_then(|v| v.inventory_quantity)
            .unwrap_or(0)
            .clamp(i64::from(i32::MIN), i64::from(i32::MAX)) as i32,
    }
}

/// Map an order to its upsert input, with the customer reference already
/// resolved (or not) against the local store.
pub fn order(o: &ShopifyOrder, customer_id: Option<Uuid>) -> UpsertOrder {
    UpsertOrder {
        shopify_id: o.id.to_string(),
        customer_id,
        total_price: parse_money(&o.total_price),
        subtotal_price: parse_money(&o.subtotal_price),
        currency: if o.currency.is_empty() {
            "USD".to_string()
        } else {
            o.currency.clone()
        },
        financial_status: if o.financial_status.is_empty() {
            "pending".to_string()
        } else {
            o.financial_status.clone()
        },
        fulfillment_status: o.fulfillment_status.clone(),
        order_number: o.order_number,
        created_at: o.created_at,
    }
}

/// Map a line item, with the product reference already resolved (or not).
/// Price and quantity become the durable revenue snapshot for this item.
pub fn order_item(item: &ShopifyLineItem, product_id: Option<Uuid>) -> NewOrderItem {
    NewOrderItem {
        product_id,
        title: item.title.clone(),
        quantity: item.quantity.clamp(1, i64::from(i32::MAX)) as i32,
        price: parse_money(&item.price),
    }
}

/// Map a customer to its upsert input.
pub fn customer(c: &ShopifyCustomer) -> UpsertCustomer {
    UpsertCustomer {
        shopify_id: c.id.to_string(),
        email: c.email.clone(),
        first_name: c.first_name.clone(),
        last_name: c.last_name.clone(),
        total_spent: parse_money(&c.total_spent),
        orders_count: c.orders_count.clamp(0, i64::from(i32::MAX)) as i32,
        tags: split_tags(&c.tags),
    }
}

/// Merge a campaign listing and its insights into one snapshot upsert.
/// Budgets come out of the connector already in major units.
pub fn campaign(c: &MetaCampaign, insights: &MetaInsights) -> UpsertCampaign {
    UpsertCampaign {
        meta_campaign_id: c.id.clone(),
        name: c.name.clone(),
        objective: c.objective.clone(),
        status: c.status.clone(),
        daily_budget: c.daily_budget_major(),
        lifetime_budget: c.lifetime_budget_major(),
        spend: insights.spend(),
        impressions: insights.impressions(),
        clicks: insights.clicks(),
        conversions: insights.purchase_conversions(),
        revenue: insights.purchase_revenue(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dec(s: &str) -> Decimal {
        s.parse().unwrap()
    }

    #[test]
    fn test_split_tags() {
        assert_eq!(split_tags("summer, sale, new"), vec!["summer", "sale", "new"]);
        assert_eq!(split_tags(""), Vec::<String>::new());
        assert_eq!(split_tags("solo"), vec!["solo"]);
    }

    #[test]
    fn test_parse_money_defaults_to_zero() {
        assert_eq!(parse_money("19.99"), dec("19.99"));
        assert_eq!(parse_money(""), Decimal::ZERO);
        assert_eq!(parse_money("not-a-number"), Decimal::ZERO);
    }

    #[test]
    fn test_product_takes_first_variant() {
        let wire: ShopifyProduct = serde_json::from_str(
            r#"{
                "id": 42,
                "title": "Trail Mug",
                "body_html": "<p>Enamel</p>",
                "vendor": "Acme",
                "product_type": "Outdoor",
                "tags": "camping, enamel",
                "status": "active",
                "image": {"src": "https://cdn/img.png"},
                "variants": [
                    {"price": "24.99", "compare_at_price": "34.99", "inventory_quantity": 12},
                    {"price": "99.99", "inventory_quantity": 1}
                ]
            }"#,
        )
        .unwrap();

        let input = product(&wire);
        assert_eq!(input.shopify_id, "42");
        assert_eq!(input.price, dec("24.99"));
        assert_eq!(input.compare_at_price, Some(dec("34.99")));
        assert_eq!(input.inventory, 12);
        assert_eq!(input.tags, vec!["camping", "enamel"]);
        assert_eq!(input.image_url.as_deref(), Some("https://cdn/img.png"));
    }

    #[test]
    fn test_product_without_variants() {
        let wire: ShopifyProduct =
            serde_json::from_str(r#"{"id": 7, "title": "Ghost"}"#).unwrap();
        let input = product(&wire);
        assert_eq!(input.price, Decimal::ZERO);
        assert_eq!(input.compare_at_price, None);
        assert_eq!(input.inventory, 0);
    }

    #[test]
    fn test_order_mapping_keeps_snapshot_money() {
        let wire: ShopifyOrder = serde_json::from_str(
            r#"{
                "id": 9001,
                "total_price": "409.94",
                "subtotal_price": "398.00",
                "currency": "EUR",
                "financial_status": "paid",
                "order_number": 1001,
                "created_at": "2024-03-13T16:09:54Z"
            }"#,
        )
        .unwrap();

        let customer_id = Uuid::new_v4();
        let input = order(&wire, Some(customer_id));
        assert_eq!(input.shopify_id, "9001");
        assert_eq!(input.total_price, dec("409.94"));
        assert_eq!(input.currency, "EUR");
        assert_eq!(input.customer_id, Some(customer_id));
    }

    #[test]
    fn test_sparse_order_gets_defaults() {
        let wire: ShopifyOrder = serde_json::from_str(r#"{"id": 1}"#).unwrap();
        let input = order(&wire, None);
        assert_eq!(input.currency, "USD");
        assert_eq!(input.financial_status, "pending");
        assert_eq!(input.total_price, Decimal::ZERO);
    }

    #[test]
    fn test_order_item_revenue_snapshot() {
        let wire: ShopifyLineItem =
            serde_json::from_str(r#"{"title": "Mug", "quantity": 2, "price": "24.99"}"#).unwrap();
        let item = order_item(&wire, None);
        assert_eq!(item.quantity, 2);
        assert_eq!(item.price, dec("24.99"));
        assert!(item.product_id.is_none());
    }

    #[test]
    fn test_campaign_merges_insights_and_converts_budget() {
        let campaign_wire: MetaCampaign = serde_json::from_str(
            r#"{
                "id": "c1",
                "name": "Prospecting",
                "objective": "SALES",
                "status": "ACTIVE",
                "daily_budget": "5000"
            }"#,
        )
        .unwrap();
        let insights: MetaInsights = serde_json::from_str(
            r#"{
                "spend": "123.45",
                "impressions": "50000",
                "clicks": "320",
                "actions": [{"action_type": "offsite_conversion.fb_pixel_purchase", "value": "12"}],
                "action_values": [{"action_type": "offsite_conversion.fb_pixel_purchase", "value": "850.00"}]
            }"#,
        )
        .unwrap();

        let input = campaign(&campaign_wire, &insights);
        // 5000 wire cents -> 50 major units, converted exactly once.
        assert_eq!(input.daily_budget, Some(dec("50")));
        assert_eq!(input.lifetime_budget, None);
        assert_eq!(input.spend, dec("123.45"));
        assert_eq!(input.conversions, 12);
        assert_eq!(input.revenue, dec("850.00"));
    }

    #[test]
    fn test_campaign_with_failed_insights_degrades_to_zero() {
        let campaign_wire: MetaCampaign =
            serde_json::from_str(r#"{"id": "c2", "name": "Quiet"}"#).unwrap();
        let input = campaign(&campaign_wire, &MetaInsights::default());
        assert_eq!(input.spend, Decimal::ZERO);
        assert_eq!(input.impressions, 0);
        assert_eq!(input.daily_budget, None);
    }
}
