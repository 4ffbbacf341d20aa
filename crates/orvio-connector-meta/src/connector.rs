//! Meta Marketing API connector.
//!
//! Reads campaigns and insights, and writes back campaigns, ad sets, ads
//! and audiences. Budget amounts cross the wire in minor units; the
//! conversion lives in [`crate::money`] and is applied exactly once per
//! direction here.

use reqwest::{Client, Method};
use rust_decimal::Decimal;
use serde::de::DeserializeOwned;
use serde_json::{json, Value};
use std::time::Duration;
use tracing::debug;

use orvio_connector::{ConnectorError, ConnectorResult, Page};

use crate::config::{MetaConfig, API_VERSION, GRAPH_URL};
use crate::money::to_minor_units;
use crate::records::{CreatedObject, ListResponse, MetaCampaign, MetaInsights};

/// Campaigns requested per page.
const PAGE_LIMIT: u32 = 100;

const CAMPAIGN_FIELDS: &str =
    "id,name,objective,status,daily_budget,lifetime_budget,start_time,stop_time";
const INSIGHTS_FIELDS: &str = "spend,impressions,clicks,actions,action_values";

/// Parameters for creating a campaign.
#[derive(Debug, Clone)]
pub struct CreateCampaign {
    pub name: String,
    pub objective: String,
    /// Defaults to `PAUSED` so nothing spends before review.
    pub status: Option<String>,
    pub daily_budget: Option<Decimal>,
    pub special_ad_categories: Vec<String>,
}

/// Parameters for creating an ad set under a campaign.
#[derive(Debug, Clone)]
pub struct CreateAdSet {
    pub campaign_id: String,
    pub name: String,
    pub daily_budget: Decimal,
    pub targeting: Value,
    pub billing_event: Option<String>,
    pub optimization_goal: Option<String>,
}

/// Parameters for creating an ad under an ad set.
#[derive(Debug, Clone)]
pub struct CreateAd {
    pub ad_set_id: String,
    pub name: String,
    pub creative_id: String,
    pub status: Option<String>,
}

/// Parameters for creating a custom audience.
#[derive(Debug, Clone)]
pub struct CreateCustomAudience {
    pub name: String,
    pub description: Option<String>,
    pub subtype: String,
    pub customer_file_source: Option<String>,
}

/// Parameters for creating a lookalike audience.
#[derive(Debug, Clone)]
pub struct CreateLookalikeAudience {
    pub name: String,
    pub origin_audience_id: String,
    pub country: String,
    /// Similarity ratio, 0.01 to 0.20.
    pub ratio: f64,
}

/// Connector for one ad account.
pub struct MetaConnector {
    config: MetaConfig,
    base_url: String,
    client: Client,
}

impl std::fmt::Debug for MetaConnector {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MetaConnector")
            .field("ad_account_id", &self.config.ad_account_id)
            .finish()
    }
}

impl MetaConnector {
    /// Create a connector from an ad account's stored credentials.
    pub fn new(config: MetaConfig) -> ConnectorResult<Self> {
        config.validate()?;

        let client = Client::builder()
            .timeout(Duration::from_secs(30))
            .connect_timeout(Duration::from_secs(10))
            .build()
            .map_err(|e| {
                ConnectorError::invalid_configuration(format!("failed to build HTTP client: {e}"))
            })?;

        Ok(Self {
            config,
            base_url: format!("{GRAPH_URL}/{API_VERSION}"),
            client,
        })
    }

    /// Override the base URL (mock servers in tests).
    #[doc(hidden)]
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    /// Issue one request with the access token appended, decoding the
    /// response or classifying the failure.
    async fn send<T: DeserializeOwned>(
        &self,
        method: Method,
        endpoint: &str,
        body: Option<Value>,
    ) -> ConnectorResult<T> {
        let separator = if endpoint.contains('?') { '&' } else { '?' };
        let url = format!(
            "{}/{endpoint}{separator}access_token={}",
            self.base_url, self.config.access_token
        );
        debug!(endpoint = %endpoint, method = %method, "meta request");

        let mut request = self.client.request(method, &url);
        if let Some(json_body) = body {
            request = request.json(&json_body);
        }

        let response = request.send().await?;
        let status = response.status();
        let retry_after = response
            .headers()
            .get(reqwest::header::RETRY_AFTER)
            .and_then(|v| v.to_str().ok())
            .and_then(|v| v.parse::<u64>().ok());
        let text = response.text().await?;

        if !status.is_success() {
            return Err(ConnectorError::from_status(
                status.as_u16(),
                retry_after,
                text,
            ));
        }

        serde_json::from_str(&text)
            .map_err(|e| ConnectorError::invalid_response(format!("{endpoint}: {e}")))
    }

    /// List one page of the account's campaigns.
    pub async fn list_campaigns(
        &self,
        cursor: Option<String>,
    ) -> ConnectorResult<Page<MetaCampaign>> {
        let mut endpoint = format!(
            "{}/campaigns?fields={CAMPAIGN_FIELDS}&limit={PAGE_LIMIT}",
            self.config.account_path()
        );
        if let Some(after) = cursor {
            endpoint.push_str(&format!("&after={after}"));
        }

        let response: ListResponse<MetaCampaign> = self.send(Method::GET, &endpoint, None).await?;
        let next_cursor = response.next_cursor();

        Ok(Page {
            records: response.data,
            next_cursor,
        })
    }

    /// Latest insights for one campaign. An account with no delivery
    /// returns an empty data array; that maps to zeroed insights.
    pub async fn campaign_insights(&self, campaign_id: &str) -> ConnectorResult<MetaInsights> {
        let endpoint = format!("{campaign_id}/insights?fields={INSIGHTS_FIELDS}");
        let response: ListResponse<MetaInsights> = self.send(Method::GET, &endpoint, None).await?;

        Ok(response.data.into_iter().next().unwrap_or_default())
    }

    /// Latest insights across the whole account.
    pub async fn account_insights(&self) -> ConnectorResult<MetaInsights> {
        let endpoint = format!(
            "{}/insights?fields={INSIGHTS_FIELDS}",
            self.config.account_path()
        );
        let response: ListResponse<MetaInsights> = self.send(Method::GET, &endpoint, None).await?;

        Ok(response.data.into_iter().next().unwrap_or_default())
    }

    /// Create a campaign, returning its platform id.
    pub async fn create_campaign(&self, params: &CreateCampaign) -> ConnectorResult<String> {
        let mut body = json!({
            "name": params.name,
            "objective": params.objective,
            "status": params.status.as_deref().unwrap_or("PAUSED"),
            "special_ad_categories": params.special_ad_categories,
        });
        if let Some(budget) = params.daily_budget {
            body["daily_budget"] = json!(to_minor_units(budget));
        }

        let endpoint = format!("{}/campaigns", self.config.account_path());
        let created: CreatedObject = self.send(Method::POST, &endpoint, Some(body)).await?;
        Ok(created.id)
    }

    /// Update a campaign's delivery status.
    pub async fn update_campaign_status(
        &self,
        campaign_id: &str,
        status: &str,
    ) -> ConnectorResult<()> {
        let body = json!({ "status": status });
        let _: Value = self.send(Method::POST, campaign_id, Some(body)).await?;
        Ok(())
    }

    /// Create an ad set, returning its platform id.
    pub async fn create_ad_set(&self, params: &CreateAdSet) -> ConnectorResult<String> {
        let body = json!({
            "campaign_id": params.campaign_id,
            "name": params.name,
            "daily_budget": to_minor_units(params.daily_budget),
            "targeting": params.targeting,
            "billing_event": params.billing_event.as_deref().unwrap_or("IMPRESSIONS"),
            "optimization_goal": params
                .optimization_goal
                .as_deref()
                .unwrap_or("OFFSITE_CONVERSIONS"),
            "status": "PAUSED",
        });

        let endpoint = format!("{}/adsets", self.config.account_path());
        let created: CreatedObject = self.send(Method::POST, &endpoint, Some(body)).await?;
        Ok(created.id)
    }

    /// Create an ad, returning its platform id.
    pub async fn create_ad(&self, params: &CreateAd) -> ConnectorResult<String> {
        let body = json!({
            "adset_id": params.ad_set_id,
            "name": params.name,
            "creative": { "creative_id": params.creative_id },
            "status": params.status.as_deref().unwrap_or("PAUSED"),
        });

        let endpoint = format!("{}/ads", self.config.account_path());
        let created: CreatedObject = self.send(Method::POST, &endpoint, Some(body)).await?;
        Ok(created.id)
    }

    /// Create a custom audience, returning its platform id.
    pub async fn create_custom_audience(
        &self,
        params: &CreateCustomAudience,
    ) -> ConnectorResult<String> {
        let body = json!({
            "name": params.name,
            "description": params.description,
            "subtype": params.subtype,
            "customer_file_source": params
                .customer_file_source
                .as_deref()
                .unwrap_or("USER_PROVIDED_ONLY"),
        });

        let endpoint = format!("{}/customaudiences", self.config.account_path());
        let created: CreatedObject = self.send(Method::POST, &endpoint, Some(body)).await?;
        Ok(created.id)
    }

    /// Create a lookalike audience seeded from an existing one.
    pub async fn create_lookalike_audience(
        &self,
        params: &CreateLookalikeAudience,
    ) -> ConnectorResult<String> {
        let lookalike_spec = json!({
            "country": params.country,
            "ratio": params.ratio,
            "type": "similarity",
        });
        let body = json!({
            "name": params.name,
            "subtype": "LOOKALIKE",
            "origin_audience_id": params.origin_audience_id,
            "lookalike_spec": lookalike_spec.to_string(),
        });

        let endpoint = format!("{}/customaudiences", self.config.account_path());
        let created: CreatedObject = self.send(Method::POST, &endpoint, Some(body)).await?;
        Ok(created.id)
    }
}
