//! orvio database layer
//!
//! PostgreSQL persistence for tenants, commerce/ads sources, ingested
//! entities, sync runs and insights. Models follow a one-file-per-entity
//! layout with associated async methods taking a [`sqlx::PgPool`].

pub mod error;
pub mod models;

pub use error::DbError;

use sqlx::postgres::PgPoolOptions;
use sqlx::PgPool;
use std::time::Duration;

/// Embedded migrations, applied at startup.
pub static MIGRATOR: sqlx::migrate::Migrator = sqlx::migrate!();

/// Connect to the database with sensible pool defaults.
pub async fn connect(database_url: &str) -> Result<PgPool, DbError> {
    PgPoolOptions::new()
        .max_connections(10)
        .acquire_timeout(Duration::from_secs(10))
        .connect(database_url)
        .await
        .map_err(DbError::ConnectionFailed)
}

/// Apply pending migrations.
pub async fn run_migrations(pool: &PgPool) -> Result<(), DbError> {
    MIGRATOR.run(pool).await.map_err(DbError::MigrationFailed)
}
