//! Threshold-based anomaly detection over campaign snapshots.
//!
//! Each rule is independent; one campaign can emit zero, one, or several
//! findings in a single pass. Every finding is persisted as an insight
//! row and returned to the caller. Findings are not deduplicated against
//! prior runs: a condition that persists produces a row per pass.

use rust_decimal::prelude::ToPrimitive;
use serde::Serialize;
use sqlx::PgPool;
use std::fmt;
use tracing::{info, instrument};
use uuid::Uuid;

use orvio_db::models::{CreateInsight, Insight, InsightSeverity, MetaAdCampaign};

use crate::error::AnalyticsResult;

/// Classified anomaly types.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AnomalyType {
    CpaSpike,
    RoasDrop,
    CreativeFatigue,
}

impl fmt::Display for AnomalyType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::CpaSpike => write!(f, "CPA_SPIKE"),
            Self::RoasDrop => write!(f, "ROAS_DROP"),
            Self::CreativeFatigue => write!(f, "CREATIVE_FATIGUE"),
        }
    }
}

/// One detected anomaly.
#[derive(Debug, Clone, Serialize)]
pub struct Finding {
    #[serde(rename = "type")]
    pub anomaly_type: AnomalyType,
    pub severity: InsightSeverity,
    pub title: String,
    pub description: String,
    pub metric: String,
    pub current_value: f64,
    pub expected_value: f64,
    /// Percent deviation of the current value from the expected one.
    pub deviation: f64,
}

/// The slice of a campaign snapshot the rules read.
#[derive(Debug, Clone)]
pub struct CampaignSnapshot {
    pub name: String,
    pub spend: f64,
    pub impressions: i64,
    pub clicks: i64,
    pub conversions: i64,
    pub revenue: f64,
    pub daily_budget: f64,
}

/// Apply every rule to one campaign snapshot.
pub fn evaluate_campaign(c: &CampaignSnapshot) -> Vec<Finding> {
    let mut findings = Vec::new();

    // CPA spike: cost per acquisition ran past half the daily budget.
    if c.conversions > 0 && c.spend > 0.0 && c.daily_budget > 0.0 {
        let cpa = c.spend / c.conversions as f64;
        if cpa > c.daily_budget * 0.5 {
            let expected = c.daily_budget * 0.3;
            findings.push(Finding {
                anomaly_type: AnomalyType::CpaSpike,
                severity: if cpa > c.daily_budget {
                    InsightSeverity::Critical
                } else {
                    InsightSeverity::High
                },
                title: format!("CPA spike on {}", c.name),
                description: format!("CPA is ${cpa:.2}, significantly above target"),
                metric: "cpa".to_string(),
                current_value: cpa,
                expected_value: expected,
                deviation: (cpa - expected) / expected * 100.0,
            });
        }
    }

    // ROAS drop: the campaign spends more than it earns.
    if c.spend > 0.0 && c.revenue > 0.0 {
        let roas = c.revenue / c.spend;
        if roas < 1.0 {
            findings.push(Finding {
                anomaly_type: AnomalyType::RoasDrop,
                severity: if roas < 0.5 {
                    InsightSeverity::Critical
                } else {
                    InsightSeverity::High
                },
                title: format!("Low ROAS on {}", c.name),
                description: format!("ROAS is {roas:.2}x, spending more than earning"),
                metric: "roas".to_string(),
                current_value: roas,
                expected_value: 2.0,
                deviation: (2.0 - roas) / 2.0 * 100.0,
            });
        }
    }

    // Creative fatigue: meaningful delivery volume, almost no clicks.
    if c.impressions > 1000 && c.clicks > 0 {
        let ctr = c.clicks as f64 / c.impressions as f64 * 100.0;
        if ctr < 0.5 {
            findings.push(Finding {
                anomaly_type: AnomalyType::CreativeFatigue,
                severity: if ctr < 0.2 {
                    InsightSeverity::High
                } else {
                    InsightSeverity::Medium
                },
                title: format!("Low CTR on {}", c.name),
                description: format!("CTR is {ctr:.2}%, suggesting creative fatigue"),
                metric: "ctr".to_string(),
                current_value: ctr,
                expected_value: 1.5,
                deviation: (1.5 - ctr) / 1.5 * 100.0,
            });
        }
    }

    findings
}

fn snapshot_of(campaign: &MetaAdCampaign) -> CampaignSnapshot {
    CampaignSnapshot {
        name: campaign.name.clone(),
        spend: campaign.spend.to_f64().unwrap_or(0.0),
        impressions: campaign.impressions,
        clicks: campaign.clicks,
        conversions: campaign.conversions,
        revenue: campaign.revenue.to_f64().unwrap_or(0.0),
        daily_budget: campaign
            .daily_budget
            .and_then(|b| b.to_f64())
            .unwrap_or(0.0),
    }
}

/// Run the detector over a tenant's active campaigns, persisting each
/// finding as an insight row and returning them all.
#[instrument(skip(pool))]
pub async fn detect_anomalies(pool: &PgPool, tenant_id: Uuid) -> AnalyticsResult<Vec<Finding>> {
    let campaigns = MetaAdCampaign::list_active_for_tenant(pool, tenant_id).await?;

    let mut findings = Vec::new();
    for campaign in &campaigns {
        findings.extend(evaluate_campaign(&snapshot_of(campaign)));
    }

    for finding in &findings {
        Insight::create(
            pool,
            tenant_id,
            &CreateInsight {
                insight_type: finding.anomaly_type.to_string(),
                severity: finding.severity,
                title: finding.title.clone(),
                summary: finding.description.clone(),
                details: serde_json::to_value(finding).unwrap_or_default(),
            },
        )
        .await?;
    }

    info!(
        tenant_id = %tenant_id,
        campaigns = campaigns.len(),
        findings = findings.len(),
        "anomaly pass finished"
    );

    Ok(findings)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn quiet_campaign() -> CampaignSnapshot {
        CampaignSnapshot {
            name: "Prospecting US".to_string(),
            spend: 0.0,
            impressions: 0,
            clicks: 0,
            conversions: 0,
            revenue: 0.0,
            daily_budget: 0.0,
        }
    }

    #[test]
    fn test_healthy_campaign_emits_nothing() {
        let findings = evaluate_campaign(&CampaignSnapshot {
            spend: 100.0,
            impressions: 20000,
            clicks: 400,
            conversions: 10,
            revenue: 400.0,
            daily_budget: 100.0,
            ..quiet_campaign()
        });
        assert!(findings.is_empty());
    }

    #[test]
    fn test_roas_drop_critical_at_half() {
        // spend 100, revenue 50 -> roas 0.5, still < 1.0 but not < 0.5.
        let findings = evaluate_campaign(&CampaignSnapshot {
            spend: 100.0,
            revenue: 50.0,
            ..quiet_campaign()
        });
        assert_eq!(findings.len(), 1);
        let f = &findings[0];
        assert_eq!(f.anomaly_type, AnomalyType::RoasDrop);
        assert_eq!(f.current_value, 0.5);
        assert_eq!(f.severity, InsightSeverity::High);
        assert_eq!(f.expected_value, 2.0);
        assert_eq!(f.deviation, 75.0);

        let critical = evaluate_campaign(&CampaignSnapshot {
            spend: 100.0,
            revenue: 40.0,
            ..quiet_campaign()
        });
        assert_eq!(critical[0].severity, InsightSeverity::Critical);
    }

    #[test]
    fn test_roas_rule_skipped_without_revenue() {
        let findings = evaluate_campaign(&CampaignSnapshot {
            spend: 100.0,
            revenue: 0.0,
            ..quiet_campaign()
        });
        assert!(findings.is_empty());
    }

    #[test]
    fn test_cpa_spike_critical_above_budget() {
        // spend 500, 2 conversions -> cpa 250 > budget 100.
        let findings = evaluate_campaign(&CampaignSnapshot {
            spend: 500.0,
            conversions: 2,
            daily_budget: 100.0,
            ..quiet_campaign()
        });
        assert_eq!(findings.len(), 1);
        let f = &findings[0];
        assert_eq!(f.anomaly_type, AnomalyType::CpaSpike);
        assert_eq!(f.severity, InsightSeverity::Critical);
        assert_eq!(f.current_value, 250.0);
        assert_eq!(f.expected_value, 30.0);
    }

    #[test]
    fn test_cpa_spike_high_between_half_and_full_budget() {
        // cpa 80 sits between 50 and 100.
        let findings = evaluate_campaign(&CampaignSnapshot {
            spend: 160.0,
            conversions: 2,
            daily_budget: 100.0,
            ..quiet_campaign()
        });
        assert_eq!(findings[0].severity, InsightSeverity::High);
    }

    #[test]
    fn test_cpa_rule_needs_budget_and_conversions() {
        let no_budget = evaluate_campaign(&CampaignSnapshot {
            spend: 500.0,
            conversions: 2,
            daily_budget: 0.0,
            ..quiet_campaign()
        });
        assert!(no_budget.is_empty());

        let no_conversions = evaluate_campaign(&CampaignSnapshot {
            spend: 500.0,
            conversions: 0,
            daily_budget: 100.0,
            ..quiet_campaign()
        });
        assert!(no_conversions.is_empty());
    }

    #[test]
    fn test_creative_fatigue_high_below_point_two() {
        // 50000 impressions, 10 clicks -> ctr 0.02%.
        let findings = evaluate_campaign(&CampaignSnapshot {
            impressions: 50000,
            clicks: 10,
            ..quiet_campaign()
        });
        assert_eq!(findings.len(), 1);
        let f = &findings[0];
        assert_eq!(f.anomaly_type, AnomalyType::CreativeFatigue);
        assert_eq!(f.severity, InsightSeverity::High);
        assert!((f.current_value - 0.02).abs() < 1e-9);
    }

    #[test]
    fn test_creative_fatigue_medium_between_thresholds() {
        // ctr 0.3% sits between 0.2 and 0.5.
        let findings = evaluate_campaign(&CampaignSnapshot {
            impressions: 10000,
            clicks: 30,
            ..quiet_campaign()
        });
        assert_eq!(findings[0].severity, InsightSeverity::Medium);
    }

    #[test]
    fn test_fatigue_rule_needs_delivery_volume() {
        let findings = evaluate_campaign(&CampaignSnapshot {
            impressions: 1000,
            clicks: 1,
            ..quiet_campaign()
        });
        assert!(findings.is_empty());
    }

    #[test]
    fn test_one_campaign_can_emit_multiple_findings() {
        let findings = evaluate_campaign(&CampaignSnapshot {
            spend: 500.0,
            conversions: 2,
            daily_budget: 100.0,
            revenue: 100.0,
            impressions: 50000,
            clicks: 10,
            ..quiet_campaign()
        });
        let types: Vec<AnomalyType> = findings.iter().map(|f| f.anomaly_type).collect();
        assert_eq!(
            types,
            vec![
                AnomalyType::CpaSpike,
                AnomalyType::RoasDrop,
                AnomalyType::CreativeFatigue
            ]
        );
    }

    #[test]
    fn test_anomaly_type_wire_format() {
        assert_eq!(AnomalyType::CpaSpike.to_string(), "CPA_SPIKE");
        assert_eq!(
            serde_json::to_string(&AnomalyType::CreativeFatigue).unwrap(),
            "\"CREATIVE_FATIGUE\""
        );
    }
}
