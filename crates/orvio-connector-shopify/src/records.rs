//! Wire types for the Shopify Admin API.
//!
//! Fields mirror the JSON the platform sends: numeric money as strings,
//! tags as one comma-space-separated string. Mapping into the internal
//! schema happens in the ingestion layer, not here.

use chrono::{DateTime, Utc};
use serde::Deserialize;

/// A product variant. Only the first variant feeds the internal product.
#[derive(Debug, Clone, Deserialize)]
pub struct ShopifyVariant {
    #[serde(default)]
    pub price: Option<String>,
    #[serde(default)]
    pub compare_at_price: Option<String>,
    #[serde(default)]
    pub inventory_quantity: Option<i64>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ShopifyImage {
    #[serde(default)]
    pub src: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ShopifyProduct {
    pub id: i64,
    pub title: String,
    #[serde(default)]
    pub body_html: Option<String>,
    #[serde(default)]
    pub vendor: Option<String>,
    #[serde(default)]
    pub product_type: Option<String>,
    /// Comma-space separated, e.g. `"summer, sale, new"`.
    #[serde(default)]
    pub tags: String,
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub image: Option<ShopifyImage>,
    #[serde(default)]
    pub variants: Vec<ShopifyVariant>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ShopifyLineItem {
    #[serde(default)]
    pub product_id: Option<i64>,
    pub title: String,
    #[serde(default = "default_quantity")]
    pub quantity: i64,
    #[serde(default)]
    pub price: String,
}

fn default_quantity() -> i64 {
    1
}

/// The customer reference embedded in an order payload.
#[derive(Debug, Clone, Deserialize)]
pub struct ShopifyCustomerRef {
    pub id: i64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ShopifyOrder {
    pub id: i64,
    #[serde(default)]
    pub total_price: String,
    #[serde(default)]
    pub subtotal_price: String,
    #[serde(default)]
    pub currency: String,
    #[serde(default)]
    pub financial_status: String,
    #[serde(default)]
    pub fulfillment_status: Option<String>,
    #[serde(default)]
    pub order_number: i64,
    #[serde(default)]
    pub customer: Option<ShopifyCustomerRef>,
    #[serde(default)]
    pub line_items: Vec<ShopifyLineItem>,
    #[serde(default = "Utc::now")]
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ShopifyCustomer {
    pub id: i64,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub first_name: Option<String>,
    #[serde(default)]
    pub last_name: Option<String>,
    #[serde(default)]
    pub total_spent: String,
    #[serde(default)]
    pub orders_count: i64,
    /// Comma-space separated, like product tags.
    #[serde(default)]
    pub tags: String,
}

// Response envelopes.

#[derive(Debug, Deserialize)]
pub struct ProductsResponse {
    pub products: Vec<ShopifyProduct>,
}

#[derive(Debug, Deserialize)]
pub struct OrdersResponse {
    pub orders: Vec<ShopifyOrder>,
}

#[derive(Debug, Deserialize)]
pub struct CustomersResponse {
    pub customers: Vec<ShopifyCustomer>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_order_deserializes_with_offset_timestamp() {
        let order: ShopifyOrder = serde_json::from_str(
            r#"{
                "id": 450789469,
                "total_price": "409.94",
                "subtotal_price": "398.00",
                "currency": "USD",
                "financial_status": "paid",
                "fulfillment_status": null,
                "order_number": 1001,
                "customer": {"id": 207119551},
                "line_items": [
                    {"product_id": 632910392, "title": "IPod Nano", "quantity": 2, "price": "199.00"}
                ],
                "created_at": "2024-03-13T16:09:54-04:00"
            }"#,
        )
        .unwrap();

        assert_eq!(order.id, 450789469);
        assert_eq!(order.customer.as_ref().unwrap().id, 207119551);
        assert_eq!(order.line_items.len(), 1);
        assert_eq!(order.created_at.to_rfc3339(), "2024-03-13T20:09:54+00:00");
    }

    #[test]
    fn test_sparse_webhook_product_payload() {
        // Webhook payloads can be much sparser than list responses.
        let product: ShopifyProduct = serde_json::from_str(
            r#"{
                "id": 788032119,
                "title": "Example T-Shirt",
                "variants": [{"price": "19.99", "inventory_quantity": 5}]
            }"#,
        )
        .unwrap();

        assert_eq!(product.tags, "");
        assert!(product.vendor.is_none());
        assert_eq!(product.variants[0].inventory_quantity, Some(5));
        assert!(product.variants[0].compare_at_price.is_none());
    }

    #[test]
    fn test_line_item_quantity_defaults_to_one() {
        let item: ShopifyLineItem =
            serde_json::from_str(r#"{"title": "Gift wrap", "price": "2.00"}"#).unwrap();
        assert_eq!(item.quantity, 1);
        assert!(item.product_id.is_none());
    }
}
