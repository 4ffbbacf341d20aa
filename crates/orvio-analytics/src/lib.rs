//! orvio analytics
//!
//! Reads only the locally ingested data, never the external platforms,
//! and derives dashboard metrics, period comparisons, anomaly findings
//! and product scores from it.

pub mod anomaly;
pub mod copy;
pub mod error;
pub mod metrics;
pub mod scoring;

pub use anomaly::{detect_anomalies, evaluate_campaign, AnomalyType, CampaignSnapshot, Finding};
pub use error::{AnalyticsError, AnalyticsResult};
pub use metrics::{
    comparison_metrics, dashboard_metrics, ComparisonPeriod, DashboardMetrics, DateRange,
    MetricsComparison,
};
pub use scoring::{composite_score, score_products, ScoreInputs};
