//! Connector tests against a local mock of the Admin API.
//!
//! Run with: `cargo test -p orvio-connector-shopify --features integration`

#![cfg(feature = "integration")]

use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

use orvio_connector::{drain_pages, ConnectorError};
use orvio_connector_shopify::{ShopifyConfig, ShopifyConnector};

fn connector_for(server: &MockServer) -> ShopifyConnector {
    ShopifyConnector::new(ShopifyConfig::new("acme.myshopify.com", "shpat_test"))
        .unwrap()
        .with_base_url(server.uri())
}

fn product_body(ids: &[i64]) -> serde_json::Value {
    serde_json::json!({
        "products": ids
            .iter()
            .map(|id| serde_json::json!({"id": id, "title": format!("Product {id}")}))
            .collect::<Vec<_>>()
    })
}

#[tokio::test]
async fn test_follows_link_cursors_to_exhaustion() {
    let server = MockServer::start().await;
    let next_link = format!(
        "<{}/products.json?limit=250&page_info=cursor-2>; rel=\"next\"",
        server.uri()
    );

    Mock::given(method("GET"))
        .and(path("/products.json"))
        .and(query_param("status", "active"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(product_body(&[1, 2]))
                .insert_header("Link", next_link.as_str()),
        )
        .expect(1)
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/products.json"))
        .and(query_param("page_info", "cursor-2"))
        .respond_with(ResponseTemplate::new(200).set_body_json(product_body(&[3])))
        .expect(1)
        .mount(&server)
        .await;

    let connector = connector_for(&server);
    let products = drain_pages(|cursor| connector.list_products(cursor))
        .await
        .unwrap();

    let ids: Vec<i64> = products.iter().map(|p| p.id).collect();
    assert_eq!(ids, vec![1, 2, 3]);
}

#[tokio::test]
async fn test_access_token_header_is_sent() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/customers.json"))
        .and(wiremock::matchers::header(
            "X-Shopify-Access-Token",
            "shpat_test",
        ))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "customers": [{"id": 7, "email": "a@example.com"}]
        })))
        .mount(&server)
        .await;

    let connector = connector_for(&server);
    let page = connector.list_customers(None).await.unwrap();
    assert_eq!(page.records.len(), 1);
    assert!(!page.has_more());
}

#[tokio::test]
async fn test_unauthorized_is_classified() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/products.json"))
        .respond_with(ResponseTemplate::new(401).set_body_string("{\"errors\":\"bad token\"}"))
        .mount(&server)
        .await;

    let err = connector_for(&server)
        .list_products(None)
        .await
        .unwrap_err();

    match err {
        ConnectorError::AuthenticationFailed { status, body } => {
            assert_eq!(status, 401);
            assert!(body.contains("bad token"));
        }
        other => panic!("expected AuthenticationFailed, got {other:?}"),
    }
}

#[tokio::test]
async fn test_rate_limit_carries_retry_after() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/orders.json"))
        .respond_with(
            ResponseTemplate::new(429)
                .insert_header("Retry-After", "2")
                .set_body_string("slow down"),
        )
        .mount(&server)
        .await;

    let err = connector_for(&server)
        .list_orders(chrono::Utc::now(), None)
        .await
        .unwrap_err();

    match &err {
        ConnectorError::RateLimited { retry_after, .. } => assert_eq!(*retry_after, Some(2)),
        other => panic!("expected RateLimited, got {other:?}"),
    }
    assert!(err.is_transient());
}
