//! Sync run model: one durable row per ingestion attempt.
//!
//! A run is created in `running` before the first external call, and moves
//! exactly once to `completed` or `failed`. Closed runs are immutable; a
//! retry always creates a fresh row.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::PgPool;
use std::fmt;
use uuid::Uuid;

/// The resource type one run ingests.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SyncType {
    Products,
    Orders,
    Customers,
    Campaigns,
}

impl fmt::Display for SyncType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Products => write!(f, "products"),
            Self::Orders => write!(f, "orders"),
            Self::Customers => write!(f, "customers"),
            Self::Campaigns => write!(f, "campaigns"),
        }
    }
}

impl std::str::FromStr for SyncType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "products" => Ok(Self::Products),
            "orders" => Ok(Self::Orders),
            "customers" => Ok(Self::Customers),
            "campaigns" => Ok(Self::Campaigns),
            _ => Err(format!("Unknown sync type: {s}")),
        }
    }
}

/// Status of a sync run.
///
/// There is no `pending` or `retrying`: each scheduled invocation is a
/// fresh run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SyncRunStatus {
    Running,
    Completed,
    Failed,
}

impl SyncRunStatus {
    /// Check if this status is terminal (the run has ended).
    #[must_use]
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Completed | Self::Failed)
    }
}

impl fmt::Display for SyncRunStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Running => write!(f, "running"),
            Self::Completed => write!(f, "completed"),
            Self::Failed => write!(f, "failed"),
        }
    }
}

impl std::str::FromStr for SyncRunStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "running" => Ok(Self::Running),
            "completed" => Ok(Self::Completed),
            "failed" => Ok(Self::Failed),
            _ => Err(format!("Unknown sync run status: {s}")),
        }
    }
}

/// The store or ad account a run belongs to. Exactly one is set.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunOwner {
    Store(Uuid),
    AdAccount(Uuid),
}

impl RunOwner {
    fn store_id(&self) -> Option<Uuid> {
        match self {
            Self::Store(id) => Some(*id),
            Self::AdAccount(_) => None,
        }
    }

    fn ad_account_id(&self) -> Option<Uuid> {
        match self {
            Self::Store(_) => None,
            Self::AdAccount(id) => Some(*id),
        }
    }
}

/// A sync run row.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct SyncRun {
    pub id: Uuid,
    pub store_id: Option<Uuid>,
    pub ad_account_id: Option<Uuid>,
    pub sync_type: String,
    pub status: String,
    pub items_count: i64,
    pub error: Option<String>,
    pub started_at: DateTime<Utc>,
    pub completed_at: Option<DateTime<Utc>>,
}

impl SyncRun {
    /// Get the status enum.
    pub fn status(&self) -> SyncRunStatus {
        self.status.parse().unwrap_or(SyncRunStatus::Running)
    }

    /// Open a fresh run in `running`, before any external call is made.
    pub async fn start(
        pool: &PgPool,
        owner: RunOwner,
        sync_type: SyncType,
    ) -> Result<Self, sqlx::Error> {
        sqlx::query_as(
            r"
            INSERT INTO sync_runs (store_id, ad_account_id, sync_type, status)
            VALUES ($1, $2, $3, 'running')
            RETURNING *
            ",
        )
        .bind(owner.store_id())
        .bind(owner.ad_account_id())
        .bind(sync_type.to_string())
        .fetch_one(pool)
        .await
    }

    /// Close a run as `completed` with its final item count.
    ///
    /// The `status = 'running'` guard makes closed runs immutable.
    pub async fn complete(
        pool: &PgPool,
        id: Uuid,
        items_count: i64,
    ) -> Result<Option<Self>, sqlx::Error> {
        sqlx::query_as(
            r"
            UPDATE sync_runs
            SET status = 'completed', items_count = $2, completed_at = NOW()
            WHERE id = $1 AND status = 'running'
            RETURNING *
            ",
        )
        .bind(id)
        .bind(items_count)
        .fetch_optional(pool)
        .await
    }

    /// Close a run as `failed` with the captured error message.
    pub async fn fail(pool: &PgPool, id: Uuid, error: &str) -> Result<Option<Self>, sqlx::Error> {
        sqlx::query_as(
            r"
            UPDATE sync_runs
            SET status = 'failed', error = $2, completed_at = NOW()
            WHERE id = $1 AND status = 'running'
            RETURNING *
            ",
        )
        .bind(id)
        .bind(error)
        .fetch_optional(pool)
        .await
    }

    /// Most recent runs for a store, newest first.
    pub async fn list_for_store(
        pool: &PgPool,
        store_id: Uuid,
        limit: i64,
    ) -> Result<Vec<Self>, sqlx::Error> {
        sqlx::query_as(
            r"
            SELECT * FROM sync_runs
            WHERE store_id = $1
            ORDER BY started_at DESC
            LIMIT $2
            ",
        )
        .bind(store_id)
        .bind(limit)
        .fetch_all(pool)
        .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sync_type_roundtrip() {
        for ty in [
            SyncType::Products,
            SyncType::Orders,
            SyncType::Customers,
            SyncType::Campaigns,
        ] {
            let parsed: SyncType = ty.to_string().parse().unwrap();
            assert_eq!(ty, parsed);
        }
        assert!("audiences".parse::<SyncType>().is_err());
    }

    #[test]
    fn test_status_roundtrip() {
        for status in [
            SyncRunStatus::Running,
            SyncRunStatus::Completed,
            SyncRunStatus::Failed,
        ] {
            let parsed: SyncRunStatus = status.to_string().parse().unwrap();
            assert_eq!(status, parsed);
        }
    }

    #[test]
    fn test_status_terminal() {
        assert!(!SyncRunStatus::Running.is_terminal());
        assert!(SyncRunStatus::Completed.is_terminal());
        assert!(SyncRunStatus::Failed.is_terminal());
    }

    #[test]
    fn test_owner_columns_are_exclusive() {
        let store = Uuid::new_v4();
        let account = Uuid::new_v4();

        let owner = RunOwner::Store(store);
        assert_eq!(owner.store_id(), Some(store));
        assert_eq!(owner.ad_account_id(), None);

        let owner = RunOwner::AdAccount(account);
        assert_eq!(owner.store_id(), None);
        assert_eq!(owner.ad_account_id(), Some(account));
    }
}
