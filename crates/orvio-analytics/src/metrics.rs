//! Dashboard metrics aggregation and period comparison.
//!
//! The aggregation itself is pure: the async entry points only load rows
//! and convert them into plain fact structs. Every ratio defaults to 0
//! when its denominator is 0, never NaN and never an error.

use chrono::{DateTime, Duration, NaiveDate, Utc};
use rust_decimal::prelude::ToPrimitive;
use serde::Serialize;
use sqlx::PgPool;
use std::str::FromStr;
use uuid::Uuid;

use orvio_db::models::{MetaAdCampaign, Order, OrderItem};

use crate::error::AnalyticsResult;

/// How many products/campaigns the dashboard rankings keep.
const TOP_N: usize = 10;

/// An inclusive time window.
#[derive(Debug, Clone, Copy)]
pub struct DateRange {
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
}

impl DateRange {
    /// The trailing `days` window ending at `end`.
    pub fn trailing_days(end: DateTime<Utc>, days: i64) -> Self {
        Self {
            start: end - Duration::days(days),
            end,
        }
    }
}

/// Comparison period for period-over-period metrics.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ComparisonPeriod {
    Day,
    Week,
    Month,
}

impl ComparisonPeriod {
    /// Length of the period in days.
    pub fn days(&self) -> i64 {
        match self {
            Self::Day => 1,
            Self::Week => 7,
            Self::Month => 30,
        }
    }
}

impl FromStr for ComparisonPeriod {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "day" => Ok(Self::Day),
            "week" => Ok(Self::Week),
            "month" => Ok(Self::Month),
            _ => Err(format!("Unknown comparison period: {s}")),
        }
    }
}

// ── Fact inputs ───────────────────────────────────────────────────────────

/// A paid order inside the window.
#[derive(Debug, Clone)]
pub struct OrderFacts {
    pub total_price: f64,
    pub created_at: DateTime<Utc>,
}

/// A line item belonging to one of those orders.
#[derive(Debug, Clone)]
pub struct ItemFacts {
    pub product_id: Option<Uuid>,
    pub title: String,
    pub quantity: i64,
    pub price: f64,
}

/// A campaign's latest performance snapshot.
#[derive(Debug, Clone)]
pub struct CampaignFacts {
    pub id: Uuid,
    pub name: String,
    pub spend: f64,
    pub impressions: i64,
    pub clicks: i64,
    pub conversions: i64,
    pub revenue: f64,
}

// ── Outputs ───────────────────────────────────────────────────────────────

/// Revenue of one calendar day (UTC) inside the window.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct DailyRevenue {
    pub date: NaiveDate,
    pub revenue: f64,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct TopProduct {
    /// Internal product id, or the denormalized title when no product
    /// link was resolvable at ingestion time.
    pub id: String,
    pub title: String,
    pub revenue: f64,
    pub orders: i64,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct TopCampaign {
    pub id: Uuid,
    pub name: String,
    pub spend: f64,
    pub revenue: f64,
    pub roas: f64,
}

/// Point-in-time dashboard metrics for one tenant and window.
#[derive(Debug, Clone, Serialize)]
pub struct DashboardMetrics {
    pub total_revenue: f64,
    pub total_spend: f64,
    pub roas: f64,
    pub total_orders: i64,
    pub average_order_value: f64,
    pub conversion_rate: f64,
    pub impressions: i64,
    pub clicks: i64,
    pub ctr: f64,
    pub cpc: f64,
    pub cpa: f64,
    pub revenue_by_day: Vec<DailyRevenue>,
    pub top_products: Vec<TopProduct>,
    pub top_campaigns: Vec<TopCampaign>,
}

/// Per-metric percent change between two windows.
#[derive(Debug, Clone, Serialize)]
pub struct MetricChanges {
    pub total_revenue: f64,
    pub total_spend: f64,
    pub roas: f64,
    pub total_orders: f64,
    pub average_order_value: f64,
    pub conversion_rate: f64,
    pub impressions: f64,
    pub clicks: f64,
    pub ctr: f64,
    pub cpc: f64,
    pub cpa: f64,
}

/// Current and previous window metrics plus the change per metric.
#[derive(Debug, Clone, Serialize)]
pub struct MetricsComparison {
    pub current: DashboardMetrics,
    pub previous: DashboardMetrics,
    pub changes: MetricChanges,
}

// ── Pure aggregation ──────────────────────────────────────────────────────

/// `numerator / denominator`, defaulting to 0 on a zero denominator.
fn ratio(numerator: f64, denominator: f64) -> f64 {
    if denominator > 0.0 {
        numerator / denominator
    } else {
        0.0
    }
}

/// Percent change from `previous` to `current`.
///
/// `(current - previous) / previous * 100` when previous > 0; `100` when
/// something appeared from nothing; `0` when both are 0. The asymmetry is
/// deliberate: it avoids division by zero while still signaling
/// "went from nothing to something" as a full positive change.
pub fn percent_change(current: f64, previous: f64) -> f64 {
    if previous > 0.0 {
        (current - previous) / previous * 100.0
    } else if current > 0.0 {
        100.0
    } else {
        0.0
    }
}

/// Aggregate one window's facts into dashboard metrics.
pub fn aggregate(
    orders: &[OrderFacts],
    items: &[ItemFacts],
    campaigns: &[CampaignFacts],
    range: &DateRange,
) -> DashboardMetrics {
    let total_revenue: f64 = orders.iter().map(|o| o.total_price).sum();
    let total_orders = orders.len() as i64;
    let average_order_value = ratio(total_revenue, total_orders as f64);

    let total_spend: f64 = campaigns.iter().map(|c| c.spend).sum();
    let impressions: i64 = campaigns.iter().map(|c| c.impressions).sum();
    let clicks: i64 = campaigns.iter().map(|c| c.clicks).sum();
    let conversions: i64 = campaigns.iter().map(|c| c.conversions).sum();

    let roas = ratio(total_revenue, total_spend);
    let ctr = ratio(clicks as f64, impressions as f64) * 100.0;
    let cpc = ratio(total_spend, clicks as f64);
    let cpa = ratio(total_spend, conversions as f64);
    let conversion_rate = ratio(conversions as f64, clicks as f64) * 100.0;

    DashboardMetrics {
        total_revenue,
        total_spend,
        roas,
        total_orders,
        average_order_value,
        conversion_rate,
        impressions,
        clicks,
        ctr,
        cpc,
        cpa,
        revenue_by_day: revenue_by_day(orders, range),
        top_products: top_products(items),
        top_campaigns: top_campaigns(campaigns),
    }
}

/// One bucket per UTC calendar day in the window, inclusive on both ends,
/// zero-revenue days included, chronological.
fn revenue_by_day(orders: &[OrderFacts], range: &DateRange) -> Vec<DailyRevenue> {
    let start = range.start.date_naive();
    let end = range.end.date_naive();

    let mut buckets = Vec::new();
    let mut day = start;
    while day <= end {
        let revenue = orders
            .iter()
            .filter(|o| o.created_at.date_naive() == day)
            .map(|o| o.total_price)
            .sum();
        buckets.push(DailyRevenue { date: day, revenue });
        day = match day.succ_opt() {
            Some(next) => next,
            None => break,
        };
    }

    buckets
}

/// Group items by product (falling back to title when no product link
/// resolved), rank by revenue descending, keep the top 10. Groups keep
/// discovery order on ties.
fn top_products(items: &[ItemFacts]) -> Vec<TopProduct> {
    let mut groups: Vec<TopProduct> = Vec::new();

    for item in items {
        let key = item
            .product_id
            .map(|id| id.to_string())
            .unwrap_or_else(|| item.title.clone());
        let revenue = item.price * item.quantity as f64;

        match groups.iter_mut().find(|g| g.id == key) {
            Some(group) => {
                group.revenue += revenue;
                group.orders += 1;
            }
            None => groups.push(TopProduct {
                id: key,
                title: item.title.clone(),
                revenue,
                orders: 1,
            }),
        }
    }

    groups.sort_by(|a, b| b.revenue.total_cmp(&a.revenue));
    groups.truncate(TOP_N);
    groups
}

/// Rank campaigns by ROAS descending (0 when spend is 0), keep the top
/// 10, stable on ties.
fn top_campaigns(campaigns: &[CampaignFacts]) -> Vec<TopCampaign> {
    let mut ranked: Vec<TopCampaign> = campaigns
        .iter()
        .map(|c| TopCampaign {
            id: c.id,
            name: c.name.clone(),
            spend: c.spend,
            revenue: c.revenue,
            roas: ratio(c.revenue, c.spend),
        })
        .collect();

    ranked.sort_by(|a, b| b.roas.total_cmp(&a.roas));
    ranked.truncate(TOP_N);
    ranked
}

/// Change per numeric metric between two windows.
pub fn changes_between(current: &DashboardMetrics, previous: &DashboardMetrics) -> MetricChanges {
    MetricChanges {
        total_revenue: percent_change(current.total_revenue, previous.total_revenue),
        total_spend: percent_change(current.total_spend, previous.total_spend),
        roas: percent_change(current.roas, previous.roas),
        total_orders: percent_change(current.total_orders as f64, previous.total_orders as f64),
        average_order_value: percent_change(
            current.average_order_value,
            previous.average_order_value,
        ),
        conversion_rate: percent_change(current.conversion_rate, previous.conversion_rate),
        impressions: percent_change(current.impressions as f64, previous.impressions as f64),
        clicks: percent_change(current.clicks as f64, previous.clicks as f64),
        ctr: percent_change(current.ctr, previous.ctr),
        cpc: percent_change(current.cpc, previous.cpc),
        cpa: percent_change(current.cpa, previous.cpa),
    }
}

// ── Loading ───────────────────────────────────────────────────────────────

fn decimal_to_f64(value: rust_decimal::Decimal) -> f64 {
    value.to_f64().unwrap_or(0.0)
}

fn campaign_facts(campaigns: Vec<MetaAdCampaign>) -> Vec<CampaignFacts> {
    campaigns
        .into_iter()
        .map(|c| CampaignFacts {
            id: c.id,
            name: c.name,
            spend: decimal_to_f64(c.spend),
            impressions: c.impressions,
            clicks: c.clicks,
            conversions: c.conversions,
            revenue: decimal_to_f64(c.revenue),
        })
        .collect()
}

/// Compute dashboard metrics for one tenant and window.
///
/// Orders are restricted to paid/partially refunded inside the window;
/// campaign snapshots are the latest synced values and are not
/// date-filtered (known limitation of the snapshot model).
pub async fn dashboard_metrics(
    pool: &PgPool,
    tenant_id: Uuid,
    range: &DateRange,
) -> AnalyticsResult<DashboardMetrics> {
    let orders = Order::list_paid_between(pool, tenant_id, range.start, range.end).await?;
    let order_ids: Vec<Uuid> = orders.iter().map(|o| o.id).collect();
    let items = OrderItem::list_for_orders(pool, &order_ids).await?;
    let campaigns = MetaAdCampaign::list_for_tenant(pool, tenant_id).await?;

    let order_facts: Vec<OrderFacts> = orders
        .into_iter()
        .map(|o| OrderFacts {
            total_price: decimal_to_f64(o.total_price),
            created_at: o.created_at,
        })
        .collect();
    let item_facts: Vec<ItemFacts> = items
        .into_iter()
        .map(|i| ItemFacts {
            product_id: i.product_id,
            title: i.title,
            quantity: i64::from(i.quantity),
            price: decimal_to_f64(i.price),
        })
        .collect();

    Ok(aggregate(
        &order_facts,
        &item_facts,
        &campaign_facts(campaigns),
        range,
    ))
}

/// Compute current-vs-previous window metrics for one tenant.
pub async fn comparison_metrics(
    pool: &PgPool,
    tenant_id: Uuid,
    period: ComparisonPeriod,
) -> AnalyticsResult<MetricsComparison> {
    let now = Utc::now();
    let days = period.days();

    let current_range = DateRange::trailing_days(now, days);
    let previous_range = DateRange {
        start: now - Duration::days(2 * days),
        end: current_range.start,
    };

    let current = dashboard_metrics(pool, tenant_id, &current_range).await?;
    let previous = dashboard_metrics(pool, tenant_id, &previous_range).await?;
    let changes = changes_between(&current, &previous);

    Ok(MetricsComparison {
        current,
        previous,
        changes,
    })
}
