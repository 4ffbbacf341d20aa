//! API error type and response mapping.
//!
//! Every handler error serializes to the `{success: false, error}`
//! envelope with a status matching the taxonomy: 400 validation, 401
//! unauthorized, 403 tenant mismatch, 404 missing resource, 502 upstream
//! connector failure, 500 otherwise.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;
use thiserror::Error;
use tracing::error;

use orvio_analytics::AnalyticsError;
use orvio_connector::ConnectorError;
use orvio_core::OrvioError;
use orvio_sync::SyncError;

/// Error type for API handlers.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error(transparent)]
    Core(#[from] OrvioError),

    #[error(transparent)]
    Sync(#[from] SyncError),

    #[error(transparent)]
    Analytics(#[from] AnalyticsError),

    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),
}

/// Result type for API handlers.
pub type ApiResult<T> = Result<T, ApiError>;

impl ApiError {
    fn status_code(&self) -> StatusCode {
        match self {
            ApiError::Core(OrvioError::Unauthorized { .. }) => StatusCode::UNAUTHORIZED,
            ApiError::Core(OrvioError::NotFound { .. }) => StatusCode::NOT_FOUND,
            ApiError::Core(OrvioError::TenantMismatch { .. }) => StatusCode::FORBIDDEN,
            ApiError::Core(OrvioError::Validation { .. }) => StatusCode::BAD_REQUEST,
            ApiError::Sync(SyncError::StoreNotFound(_))
            | ApiError::Sync(SyncError::AccountNotFound(_)) => StatusCode::NOT_FOUND,
            ApiError::Sync(SyncError::Connector(e)) => connector_status(e),
            ApiError::Sync(_) | ApiError::Analytics(_) | ApiError::Database(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }
}

fn connector_status(error: &ConnectorError) -> StatusCode {
    match error {
        ConnectorError::InvalidConfiguration { .. } => StatusCode::BAD_REQUEST,
        _ => StatusCode::BAD_GATEWAY,
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let message = self.to_string();

        if status.is_server_error() {
            error!(status = %status, error = %message, "request failed");
        }

        (
            status,
            Json(json!({ "success": false, "error": message })),
        )
            .into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_mapping() {
        let unauthorized = ApiError::Core(OrvioError::Unauthorized { message: None });
        assert_eq!(unauthorized.status_code(), StatusCode::UNAUTHORIZED);

        let validation = ApiError::Core(OrvioError::validation("period", "unknown"));
        assert_eq!(validation.status_code(), StatusCode::BAD_REQUEST);

        let missing = ApiError::Sync(SyncError::StoreNotFound(uuid::Uuid::new_v4()));
        assert_eq!(missing.status_code(), StatusCode::NOT_FOUND);

        let upstream = ApiError::Sync(SyncError::Connector(ConnectorError::from_status(
            503,
            None,
            String::new(),
        )));
        assert_eq!(upstream.status_code(), StatusCode::BAD_GATEWAY);
    }
}
