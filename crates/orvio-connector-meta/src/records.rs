//! Wire types for the Meta Marketing API.
//!
//! The Graph API returns every numeric metric as a string; parsing into
//! domain numbers happens through the accessors here, defaulting to zero
//! when the platform reports nothing.

use rust_decimal::Decimal;
use serde::Deserialize;

/// The action type that counts as a purchase conversion.
pub const PURCHASE_ACTION: &str = "offsite_conversion.fb_pixel_purchase";

/// A campaign as listed by the Graph API. Budgets are wire cents.
#[derive(Debug, Clone, Deserialize)]
pub struct MetaCampaign {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub objective: Option<String>,
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub daily_budget: Option<String>,
    #[serde(default)]
    pub lifetime_budget: Option<String>,
    #[serde(default)]
    pub start_time: Option<String>,
    #[serde(default)]
    pub stop_time: Option<String>,
}

impl MetaCampaign {
    /// Daily budget in major currency units. The wire value is cents; the
    /// conversion happens here, at the boundary, and nowhere else.
    pub fn daily_budget_major(&self) -> Option<Decimal> {
        self.daily_budget
            .as_deref()
            .and_then(crate::money::from_minor_units)
    }

    /// Lifetime budget in major currency units.
    pub fn lifetime_budget_major(&self) -> Option<Decimal> {
        self.lifetime_budget
            .as_deref()
            .and_then(crate::money::from_minor_units)
    }
}

/// One attributed action (or action value) bucket.
#[derive(Debug, Clone, Deserialize)]
pub struct MetaAction {
    pub action_type: String,
    pub value: String,
}

/// Insights for one campaign (or the whole account).
#[derive(Debug, Clone, Default, Deserialize)]
pub struct MetaInsights {
    #[serde(default)]
    pub spend: String,
    #[serde(default)]
    pub impressions: String,
    #[serde(default)]
    pub clicks: String,
    #[serde(default)]
    pub actions: Option<Vec<MetaAction>>,
    #[serde(default)]
    pub action_values: Option<Vec<MetaAction>>,
}

impl MetaInsights {
    pub fn spend(&self) -> Decimal {
        self.spend.parse().unwrap_or_default()
    }

    pub fn impressions(&self) -> i64 {
        self.impressions.parse().unwrap_or(0)
    }

    pub fn clicks(&self) -> i64 {
        self.clicks.parse().unwrap_or(0)
    }

    /// Purchase conversions attributed to the campaign.
    pub fn purchase_conversions(&self) -> i64 {
        find_action(self.actions.as_deref(), PURCHASE_ACTION)
            .and_then(|v| v.parse().ok())
            .unwrap_or(0)
    }

    /// Revenue attributed to purchase conversions.
    pub fn purchase_revenue(&self) -> Decimal {
        find_action(self.action_values.as_deref(), PURCHASE_ACTION)
            .and_then(|v| v.parse().ok())
            .unwrap_or_default()
    }
}

fn find_action<'a>(actions: Option<&'a [MetaAction]>, action_type: &str) -> Option<&'a str> {
    actions?
        .iter()
        .find(|a| a.action_type == action_type)
        .map(|a| a.value.as_str())
}

/// Graph API cursor block.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct PagingCursors {
    #[serde(default)]
    pub after: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Paging {
    #[serde(default)]
    pub cursors: PagingCursors,
    /// Present only when another page exists.
    #[serde(default)]
    pub next: Option<String>,
}

/// Generic `{"data": [...], "paging": {...}}` envelope.
#[derive(Debug, Deserialize)]
pub struct ListResponse<T> {
    pub data: Vec<T>,
    #[serde(default)]
    pub paging: Option<Paging>,
}

impl<T> ListResponse<T> {
    /// The cursor of the next page, when the platform says one exists.
    pub fn next_cursor(&self) -> Option<String> {
        let paging = self.paging.as_ref()?;
        if paging.next.is_some() {
            paging.cursors.after.clone()
        } else {
            None
        }
    }
}

/// `{"id": "..."}` envelope returned by create operations.
#[derive(Debug, Deserialize)]
pub struct CreatedObject {
    pub id: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_insights_parse_numeric_strings() {
        let insights: MetaInsights = serde_json::from_str(
            r#"{
                "spend": "123.45",
                "impressions": "50000",
                "clicks": "320",
                "actions": [
                    {"action_type": "link_click", "value": "320"},
                    {"action_type": "offsite_conversion.fb_pixel_purchase", "value": "12"}
                ],
                "action_values": [
                    {"action_type": "offsite_conversion.fb_pixel_purchase", "value": "850.00"}
                ]
            }"#,
        )
        .unwrap();

        assert_eq!(insights.spend().to_string(), "123.45");
        assert_eq!(insights.impressions(), 50000);
        assert_eq!(insights.clicks(), 320);
        assert_eq!(insights.purchase_conversions(), 12);
        assert_eq!(insights.purchase_revenue().to_string(), "850.00");
    }

    #[test]
    fn test_empty_insights_default_to_zero() {
        let insights = MetaInsights::default();
        assert_eq!(insights.spend(), Decimal::ZERO);
        assert_eq!(insights.impressions(), 0);
        assert_eq!(insights.clicks(), 0);
        assert_eq!(insights.purchase_conversions(), 0);
        assert_eq!(insights.purchase_revenue(), Decimal::ZERO);
    }

    #[test]
    fn test_non_purchase_actions_are_ignored() {
        let insights: MetaInsights = serde_json::from_str(
            r#"{"actions": [{"action_type": "post_engagement", "value": "99"}]}"#,
        )
        .unwrap();
        assert_eq!(insights.purchase_conversions(), 0);
    }

    #[test]
    fn test_budget_accessors_convert_cents_once() {
        let campaign: MetaCampaign = serde_json::from_str(
            r#"{"id": "c1", "name": "Push", "daily_budget": "5000"}"#,
        )
        .unwrap();
        assert_eq!(campaign.daily_budget_major(), Some(Decimal::from(50)));
        assert_eq!(campaign.lifetime_budget_major(), None);
    }

    #[test]
    fn test_next_cursor_requires_next_link() {
        let with_next: ListResponse<MetaCampaign> = serde_json::from_str(
            r#"{
                "data": [],
                "paging": {"cursors": {"after": "AAA"}, "next": "https://graph/..."}
            }"#,
        )
        .unwrap();
        assert_eq!(with_next.next_cursor(), Some("AAA".to_string()));

        // A trailing page still carries cursors, but no "next" link.
        let last: ListResponse<MetaCampaign> =
            serde_json::from_str(r#"{"data": [], "paging": {"cursors": {"after": "AAA"}}}"#)
                .unwrap();
        assert_eq!(last.next_cursor(), None);

        let no_paging: ListResponse<MetaCampaign> = serde_json::from_str(r#"{"data": []}"#).unwrap();
        assert_eq!(no_paging.next_cursor(), None);
    }
}
