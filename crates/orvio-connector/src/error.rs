//! Connector error types.
//!
//! Every connector call is a single outbound request; failures surface as
//! a typed error carrying the upstream HTTP status and raw response body.
//! Connectors retry nothing themselves; `is_transient` exists so callers
//! can build a retry policy, not so the connector can.

use thiserror::Error;

/// Error raised by a platform connector.
#[derive(Debug, Error)]
pub enum ConnectorError {
    /// The platform rejected the credentials (HTTP 401/403).
    #[error("authentication failed: HTTP {status}: {body}")]
    AuthenticationFailed { status: u16, body: String },

    /// The platform throttled the request (HTTP 429).
    #[error("rate limited: HTTP {status}")]
    RateLimited {
        status: u16,
        body: String,
        /// Seconds to wait, when the platform said so.
        retry_after: Option<u64>,
    },

    /// The requested resource does not exist upstream (HTTP 404).
    #[error("not found: HTTP {status}: {body}")]
    NotFound { status: u16, body: String },

    /// Any other non-success response from the platform.
    #[error("upstream error: HTTP {status}: {body}")]
    Upstream { status: u16, body: String },

    /// The request never produced a response.
    #[error("network error: {0}")]
    Network(#[from] reqwest::Error),

    /// The response arrived but could not be interpreted.
    #[error("invalid response: {message}")]
    InvalidResponse { message: String },

    /// The connector was constructed with unusable settings.
    #[error("invalid configuration: {message}")]
    InvalidConfiguration { message: String },
}

impl ConnectorError {
    /// Classify a non-success HTTP response.
    pub fn from_status(status: u16, retry_after: Option<u64>, body: String) -> Self {
        match status {
            401 | 403 => ConnectorError::AuthenticationFailed { status, body },
            404 => ConnectorError::NotFound { status, body },
            429 => ConnectorError::RateLimited {
                status,
                body,
                retry_after,
            },
            _ => ConnectorError::Upstream { status, body },
        }
    }

    /// The upstream HTTP status, when there was a response.
    pub fn status(&self) -> Option<u16> {
        match self {
            ConnectorError::AuthenticationFailed { status, .. }
            | ConnectorError::RateLimited { status, .. }
            | ConnectorError::NotFound { status, .. }
            | ConnectorError::Upstream { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// Check if a retry at some later point could plausibly succeed.
    pub fn is_transient(&self) -> bool {
        match self {
            ConnectorError::RateLimited { .. } | ConnectorError::Network(_) => true,
            ConnectorError::Upstream { status, .. } => *status >= 500,
            _ => false,
        }
    }

    /// Create an invalid-response error.
    pub fn invalid_response(message: impl Into<String>) -> Self {
        ConnectorError::InvalidResponse {
            message: message.into(),
        }
    }

    /// Create an invalid-configuration error.
    pub fn invalid_configuration(message: impl Into<String>) -> Self {
        ConnectorError::InvalidConfiguration {
            message: message.into(),
        }
    }
}

/// Result type for connector operations.
pub type ConnectorResult<T> = Result<T, ConnectorError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_classification_from_status() {
        assert!(matches!(
            ConnectorError::from_status(401, None, String::new()),
            ConnectorError::AuthenticationFailed { status: 401, .. }
        ));
        assert!(matches!(
            ConnectorError::from_status(403, None, String::new()),
            ConnectorError::AuthenticationFailed { status: 403, .. }
        ));
        assert!(matches!(
            ConnectorError::from_status(404, None, String::new()),
            ConnectorError::NotFound { .. }
        ));
        assert!(matches!(
            ConnectorError::from_status(429, Some(4), String::new()),
            ConnectorError::RateLimited {
                retry_after: Some(4),
                ..
            }
        ));
        assert!(matches!(
            ConnectorError::from_status(500, None, String::new()),
            ConnectorError::Upstream { status: 500, .. }
        ));
    }

    #[test]
    fn test_transient_classification() {
        assert!(ConnectorError::from_status(429, None, String::new()).is_transient());
        assert!(ConnectorError::from_status(503, None, String::new()).is_transient());
        assert!(!ConnectorError::from_status(400, None, String::new()).is_transient());
        assert!(!ConnectorError::from_status(401, None, String::new()).is_transient());
        assert!(!ConnectorError::invalid_response("bad json").is_transient());
    }

    #[test]
    fn test_status_accessor() {
        assert_eq!(
            ConnectorError::from_status(502, None, String::new()).status(),
            Some(502)
        );
        assert_eq!(ConnectorError::invalid_response("x").status(), None);
    }

    #[test]
    fn test_display_carries_status_and_body() {
        let err = ConnectorError::from_status(500, None, "boom".to_string());
        assert_eq!(err.to_string(), "upstream error: HTTP 500: boom");
    }
}
