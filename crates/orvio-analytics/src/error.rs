//! Analytics error types.

use thiserror::Error;

/// Error raised by analytics passes.
#[derive(Debug, Error)]
pub enum AnalyticsError {
    /// Database error.
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),
}

/// Result type for analytics operations.
pub type AnalyticsResult<T> = Result<T, AnalyticsError>;
