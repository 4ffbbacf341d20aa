//! Ads ingestion pass.

use sqlx::PgPool;
use tracing::{error, info, instrument, warn};
use uuid::Uuid;

use orvio_connector::drain_pages;
use orvio_connector_meta::records::MetaInsights;
use orvio_connector_meta::MetaConnector;
use orvio_db::models::{MetaAdCampaign, RunOwner, SyncRun, SyncType};

use crate::error::SyncResult;
use crate::map;

/// Sync an ad account's campaigns with their latest insights. Returns the
/// number upserted.
///
/// A failed insights fetch degrades that campaign's snapshot to zeros
/// rather than failing the whole run; a failed campaign listing fails the
/// run.
#[instrument(skip(pool, connector))]
pub async fn sync_campaigns(
    pool: &PgPool,
    connector: &MetaConnector,
    ad_account_id: Uuid,
) -> SyncResult<i64> {
    let run = SyncRun::start(pool, RunOwner::AdAccount(ad_account_id), SyncType::Campaigns).await?;

    let outcome: SyncResult<i64> = async {
        let campaigns = drain_pages(|cursor| connector.list_campaigns(cursor)).await?;

        let mut count = 0i64;
        for campaign in &campaigns {
            let insights = match connector.campaign_insights(&campaign.id).await {
                Ok(insights) => insights,
                Err(e) => {
                    warn!(
                        campaign_id = %campaign.id,
                        error = %e,
                        "insights fetch failed, storing zeroed snapshot"
                    );
                    MetaInsights::default()
                }
            };

            MetaAdCampaign::upsert(pool, ad_account_id, &map::campaign(campaign, &insights))
                .await?;
            count += 1;
        }

        info!(ad_account_id = %ad_account_id, count, "campaigns synced");
        Ok(count)
    }
    .await;

    match outcome {
        Ok(count) => {
            SyncRun::complete(pool, run.id, count).await?;
            Ok(count)
        }
        Err(e) => {
            if let Err(mark_err) = SyncRun::fail(pool, run.id, &e.to_string()).await {
                error!(run_id = %run.id, error = %mark_err, "failed to close sync run as failed");
            }
            Err(e)
        }
    }
}
