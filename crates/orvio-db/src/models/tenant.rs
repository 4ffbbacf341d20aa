//! Tenant model: the identity boundary that owns all other data.
//!
//! Tenants are created on first authenticated access by the (out of scope)
//! auth layer and are never hard-deleted.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::PgPool;
use uuid::Uuid;

/// A tenant row.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Tenant {
    pub id: Uuid,
    pub name: String,
    pub created_at: DateTime<Utc>,
}

impl Tenant {
    /// Create a new tenant.
    pub async fn create(pool: &PgPool, name: &str) -> Result<Self, sqlx::Error> {
        sqlx::query_as(
            r"
            INSERT INTO tenants (name)
            VALUES ($1)
            RETURNING id, name, created_at
            ",
        )
        .bind(name)
        .fetch_one(pool)
        .await
    }

    /// Find a tenant by id.
    pub async fn find_by_id(pool: &PgPool, id: Uuid) -> Result<Option<Self>, sqlx::Error> {
        sqlx::query_as(
            r"
            SELECT id, name, created_at FROM tenants WHERE id = $1
            ",
        )
        .bind(id)
        .fetch_optional(pool)
        .await
    }

    /// List all tenant ids, for batch passes that iterate every tenant.
    pub async fn list_ids(pool: &PgPool) -> Result<Vec<Uuid>, sqlx::Error> {
        sqlx::query_scalar(
            r"
            SELECT id FROM tenants ORDER BY created_at
            ",
        )
        .fetch_all(pool)
        .await
    }
}
