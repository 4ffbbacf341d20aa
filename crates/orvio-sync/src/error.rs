//! Sync engine error types.

use thiserror::Error;
use uuid::Uuid;

use orvio_analytics::AnalyticsError;
use orvio_connector::ConnectorError;

/// Error raised while driving one sync unit.
#[derive(Debug, Error)]
pub enum SyncError {
    /// The connector call failed; carries the upstream status and body.
    #[error(transparent)]
    Connector(#[from] ConnectorError),

    /// A local store/database operation failed.
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    /// An analytics pass failed.
    #[error(transparent)]
    Analytics(#[from] AnalyticsError),

    /// The referenced store is missing or deactivated.
    #[error("store not found or inactive: {0}")]
    StoreNotFound(Uuid),

    /// The referenced ad account is missing or deactivated.
    #[error("ad account not found or inactive: {0}")]
    AccountNotFound(Uuid),
}

/// Result type for sync operations.
pub type SyncResult<T> = Result<T, SyncError>;
