//! Connector tests against a local mock of the Graph API.
//!
//! Run with: `cargo test -p orvio-connector-meta --features integration`

#![cfg(feature = "integration")]

use wiremock::matchers::{body_partial_json, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

use orvio_connector::drain_pages;
use orvio_connector_meta::{CreateCampaign, MetaConfig, MetaConnector};

fn connector_for(server: &MockServer) -> MetaConnector {
    MetaConnector::new(MetaConfig::new("EAAtoken", "1234567890"))
        .unwrap()
        .with_base_url(server.uri())
}

#[tokio::test]
async fn test_follows_after_cursors_to_exhaustion() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/act_1234567890/campaigns"))
        .and(query_param("after", "CURSOR1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "data": [{"id": "c3", "name": "Campaign 3"}],
            "paging": {"cursors": {"after": "CURSOR2"}}
        })))
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/act_1234567890/campaigns"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "data": [
                {"id": "c1", "name": "Campaign 1", "daily_budget": "5000"},
                {"id": "c2", "name": "Campaign 2"}
            ],
            "paging": {"cursors": {"after": "CURSOR1"}, "next": "https://graph/next"}
        })))
        .mount(&server)
        .await;

    let connector = connector_for(&server);
    let campaigns = drain_pages(|cursor| connector.list_campaigns(cursor))
        .await
        .unwrap();

    let ids: Vec<&str> = campaigns.iter().map(|c| c.id.as_str()).collect();
    assert_eq!(ids, vec!["c1", "c2", "c3"]);
}

#[tokio::test]
async fn test_missing_insights_default_to_zero() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/c1/insights"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(serde_json::json!({"data": []})),
        )
        .mount(&server)
        .await;

    let insights = connector_for(&server).campaign_insights("c1").await.unwrap();
    assert_eq!(insights.impressions(), 0);
    assert_eq!(insights.spend().to_string(), "0");
}

#[tokio::test]
async fn test_create_campaign_sends_budget_in_cents() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/act_1234567890/campaigns"))
        .and(body_partial_json(serde_json::json!({
            "daily_budget": 5000,
            "status": "PAUSED"
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({"id": "new1"})))
        .expect(1)
        .mount(&server)
        .await;

    let id = connector_for(&server)
        .create_campaign(&CreateCampaign {
            name: "Spring push".to_string(),
            objective: "SALES".to_string(),
            status: None,
            daily_budget: Some("50".parse().unwrap()),
            special_ad_categories: vec![],
        })
        .await
        .unwrap();

    assert_eq!(id, "new1");
}
