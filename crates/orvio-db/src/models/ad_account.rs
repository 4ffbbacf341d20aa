//! Meta ad account model: a tenant's connected advertising source.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::PgPool;
use uuid::Uuid;

/// A connected Meta ad account.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct MetaAdAccount {
    pub id: Uuid,
    pub tenant_id: Uuid,
    pub name: String,
    pub meta_account_id: String,
    #[serde(skip_serializing)]
    pub access_token: String,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Input for registering a newly connected ad account.
#[derive(Debug, Clone)]
pub struct CreateMetaAdAccount {
    pub name: String,
    pub meta_account_id: String,
    pub access_token: String,
}

impl MetaAdAccount {
    /// Register an ad account for a tenant. Reconnecting refreshes the
    /// token and reactivates the account.
    pub async fn create(
        pool: &PgPool,
        tenant_id: Uuid,
        input: &CreateMetaAdAccount,
    ) -> Result<Self, sqlx::Error> {
        sqlx::query_as(
            r"
            INSERT INTO meta_ad_accounts (tenant_id, name, meta_account_id, access_token)
            VALUES ($1, $2, $3, $4)
            ON CONFLICT (meta_account_id, tenant_id) DO UPDATE SET
                name = EXCLUDED.name,
                access_token = EXCLUDED.access_token,
                is_active = TRUE,
                updated_at = NOW()
            RETURNING *
            ",
        )
        .bind(tenant_id)
        .bind(&input.name)
        .bind(&input.meta_account_id)
        .bind(&input.access_token)
        .fetch_one(pool)
        .await
    }

    /// Find an ad account by id.
    pub async fn find_by_id(pool: &PgPool, id: Uuid) -> Result<Option<Self>, sqlx::Error> {
        sqlx::query_as(
            r"
            SELECT * FROM meta_ad_accounts WHERE id = $1
            ",
        )
        .bind(id)
        .fetch_optional(pool)
        .await
    }

    /// List every active ad account across all tenants (batch scheduling).
    pub async fn list_active(pool: &PgPool) -> Result<Vec<Self>, sqlx::Error> {
        sqlx::query_as(
            r"
            SELECT * FROM meta_ad_accounts WHERE is_active ORDER BY created_at
            ",
        )
        .fetch_all(pool)
        .await
    }
}
